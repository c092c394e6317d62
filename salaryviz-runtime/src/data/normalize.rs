use salaryviz_common::data::table::SalaryTable;
use salaryviz_common::data::{
    COMPANY_SIZE_COL, EMPLOYMENT_TYPE_COL, EXPERIENCE_LEVEL_COL, SALARY_COL, YEAR_COL,
};
use salaryviz_common::error::{FieldParseError, Result, SalaryVizError, ToExternalError};
use salaryviz_core::data::record::{RecordId, SalaryRecord};
use salaryviz_core::spec::chart::{MalformedRowPolicy, NormalizeConfig};
use std::str::FromStr;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    SALARY_COL,
    YEAR_COL,
    EXPERIENCE_LEVEL_COL,
    COMPANY_SIZE_COL,
    EMPLOYMENT_TYPE_COL,
];

/// Typed records plus every malformed value that was dropped on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub records: Vec<SalaryRecord>,
    pub errors: Vec<FieldParseError>,
    /// Data rows in the source table, malformed ones included
    pub total_rows: usize,
}

impl NormalizeReport {
    /// Distinct row indices that were dropped, ascending
    pub fn skipped_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.errors.iter().map(|e| e.row).collect();
        rows.dedup();
        rows
    }
}

/// Convert the raw text table into typed `SalaryRecord`s.
///
/// A record's id is its 0-based data row index, so normalizing the same table twice yields the
/// same ids. Extra columns are ignored. A missing required column is a specification error
/// regardless of `config`.
pub fn normalize_table(table: &SalaryTable, config: &NormalizeConfig) -> Result<NormalizeReport> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !table.has_column(name))
        .collect();
    if !missing.is_empty() {
        return Err(SalaryVizError::specification(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let columns = REQUIRED_COLUMNS
        .iter()
        .map(|name| table.string_column(name))
        .collect::<Result<Vec<_>>>()?;
    let [salary, year, experience, size, employment] = columns.as_slice() else {
        return Err(SalaryVizError::internal("Unexpected number of columns"));
    };

    let total_rows = table.num_rows();
    let mut report = NormalizeReport {
        records: Vec::with_capacity(total_rows),
        errors: Vec::new(),
        total_rows,
    };

    for row in 0..total_rows {
        let mut row_errors = Vec::new();
        let salary_value = parse_field::<f64>(row, SALARY_COL, salary[row], &mut row_errors)
            .and_then(|v| check_finite(row, salary[row], v, &mut row_errors));
        let year_value = parse_field::<i32>(row, YEAR_COL, year[row], &mut row_errors);
        let experience_value =
            required_text(row, EXPERIENCE_LEVEL_COL, experience[row], &mut row_errors);
        let size_value = required_text(row, COMPANY_SIZE_COL, size[row], &mut row_errors);
        let employment_value =
            required_text(row, EMPLOYMENT_TYPE_COL, employment[row], &mut row_errors);

        match (salary_value, year_value, experience_value, size_value, employment_value) {
            (Some(salary), Some(year), Some(experience), Some(size), Some(employment))
                if row_errors.is_empty() =>
            {
                let id = u32::try_from(row)
                    .external(format!("Row index {row} does not fit a record id"))?;
                report.records.push(SalaryRecord {
                    id: RecordId(id),
                    salary,
                    year,
                    experience_level: experience.to_string(),
                    company_size: size.to_string(),
                    employment_type: employment.to_string(),
                });
            }
            _ => match config.malformed_rows {
                MalformedRowPolicy::Fail => {
                    let first = row_errors.into_iter().next().ok_or_else(|| {
                        SalaryVizError::internal(format!("Row {row} rejected without an error"))
                    })?;
                    return Err(SalaryVizError::field_parse(first));
                }
                MalformedRowPolicy::Skip => {
                    for err in &row_errors {
                        log::warn!("Skipping malformed row: {err}");
                    }
                    report.errors.extend(row_errors);
                }
            },
        }
    }

    log::info!(
        "Normalized {} of {} rows ({} malformed values)",
        report.records.len(),
        total_rows,
        report.errors.len()
    );
    Ok(report)
}

fn parse_field<T>(
    row: usize,
    column: &str,
    raw: Option<&str>,
    errors: &mut Vec<FieldParseError>,
) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text = required_text(row, column, raw, errors)?;
    match text.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(FieldParseError {
                row,
                column: column.to_string(),
                value: raw.map(String::from),
                reason: err.to_string(),
            });
            None
        }
    }
}

fn check_finite(
    row: usize,
    raw: Option<&str>,
    value: f64,
    errors: &mut Vec<FieldParseError>,
) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        errors.push(FieldParseError {
            row,
            column: SALARY_COL.to_string(),
            value: raw.map(String::from),
            reason: "value is not finite".to_string(),
        });
        None
    }
}

fn required_text<'a>(
    row: usize,
    column: &str,
    raw: Option<&'a str>,
    errors: &mut Vec<FieldParseError>,
) -> Option<&'a str> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text),
        _ => {
            errors.push(FieldParseError {
                row,
                column: column.to_string(),
                value: None,
                reason: "missing value".to_string(),
            });
            None
        }
    }
}
