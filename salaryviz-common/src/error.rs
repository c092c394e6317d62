use arrow::error::ArrowError;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, SalaryVizError>;

#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

/// A single malformed value in the input table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldParseError {
    /// 0-based data row index (header excluded)
    pub row: usize,
    pub column: String,
    /// Raw cell text, `None` when the cell was empty
    pub value: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "row {} column '{}': cannot parse {:?}: {}",
                self.row, self.column, value, self.reason
            ),
            None => write!(
                f,
                "row {} column '{}': {}",
                self.row, self.column, self.reason
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum SalaryVizError {
    #[error("Resource load error: {0}\n{1}")]
    ResourceLoadError(String, ErrorContext),

    #[error("Field parse error: {0}\n{1}")]
    FieldParseError(FieldParseError, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),

    #[error("External error: {0}\n{1}")]
    ExternalError(String, ErrorContext),

    #[error("Chart specification error: {0}\n{1}")]
    SpecificationError(String, ErrorContext),

    #[error("Arrow error: {0}\n{1}")]
    ArrowError(ArrowError, ErrorContext),

    #[error("IO Error: {0}\n{1}")]
    IOError(std::io::Error, ErrorContext),

    #[error("Serde JSON Error: {0}\n{1}")]
    SerdeJsonError(serde_json::Error, ErrorContext),
}

impl SalaryVizError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use SalaryVizError::*;
        match self {
            ResourceLoadError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::ResourceLoadError(msg, context)
            }
            FieldParseError(err, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::FieldParseError(err, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::InternalError(msg, context)
            }
            ExternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::ExternalError(msg, context)
            }
            SpecificationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::SpecificationError(msg, context)
            }
            ArrowError(err, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::ArrowError(err, context)
            }
            IOError(err, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::IOError(err, context)
            }
            SerdeJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                SalaryVizError::SerdeJsonError(err, context)
            }
        }
    }

    pub fn resource_load<S: Into<String>>(message: S) -> Self {
        Self::ResourceLoadError(message.into(), Default::default())
    }

    pub fn field_parse(err: FieldParseError) -> Self {
        Self::FieldParseError(err, Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }

    pub fn specification<S: Into<String>>(message: S) -> Self {
        Self::SpecificationError(message.into(), Default::default())
    }

    /// True for failures to reach or read the input resource
    pub fn is_resource_load(&self) -> bool {
        matches!(self, SalaryVizError::ResourceLoadError(..))
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<SalaryVizError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let salary_viz_error: SalaryVizError = err.into();
                Err(salary_viz_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(SalaryVizError::internal(context_fn().into())),
        }
    }
}

impl From<ArrowError> for SalaryVizError {
    fn from(err: ArrowError) -> Self {
        Self::ArrowError(err, Default::default())
    }
}

impl From<std::io::Error> for SalaryVizError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err, Default::default())
    }
}

impl From<serde_json::Error> for SalaryVizError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeJsonError(err, Default::default())
    }
}

pub trait ToExternalError<T> {
    fn external<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: std::error::Error> ToExternalError<T> for std::result::Result<T, E> {
    fn external<S: Into<String>>(self, context: S) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(err) => {
                let context = ErrorContext {
                    contexts: vec![context.into()],
                };
                Err(SalaryVizError::ExternalError(err.to_string(), context))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_stack_is_rendered_in_order() {
        let err = SalaryVizError::resource_load("data/missing.csv not found")
            .with_context(|| "Failed to open dataset")
            .with_context(|| "Failed to build chart state");
        let msg = err.to_string();
        assert!(msg.starts_with("Resource load error: data/missing.csv not found"));
        let first = msg.find("Context[0]: Failed to open dataset").unwrap();
        let second = msg.find("Context[1]: Failed to build chart state").unwrap();
        assert!(first < second);
        assert!(err.is_resource_load());
    }

    #[test]
    fn test_field_parse_error_display() {
        let err = FieldParseError {
            row: 4,
            column: "salary_in_usd".to_string(),
            value: Some("abc".to_string()),
            reason: "invalid float literal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "row 4 column 'salary_in_usd': cannot parse \"abc\": invalid float literal"
        );
    }
}
