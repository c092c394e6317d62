use ahash::RandomState;
use arrow::{
    array::{Array, AsArray},
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};

use crate::error::{Result, ResultWithContext, SalaryVizError};

#[cfg(feature = "prettyprint")]
use arrow::util::pretty::pretty_format_batches;
use std::{
    hash::{Hash, Hasher},
    io::Cursor,
    sync::Arc,
};

/// Rows per record batch when reading CSV input
pub const CSV_BATCH_SIZE: usize = 8192;

/// Raw tabular input where every column is kept as nullable text.
///
/// Typing of individual columns happens later, row by row, so that a single malformed cell
/// can be reported without failing the whole read.
#[derive(Clone, Debug)]
pub struct SalaryTable {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl SalaryTable {
    pub fn try_new(schema: SchemaRef, partitions: Vec<RecordBatch>) -> Result<Self> {
        if schema
            .fields
            .iter()
            .any(|f| f.data_type() != &DataType::Utf8)
        {
            return Err(SalaryVizError::internal(
                "SalaryTable columns must all have type Utf8",
            ));
        }
        if partitions
            .iter()
            .all(|batch| batch.schema().fields == schema.fields)
        {
            Ok(Self {
                schema,
                batches: partitions,
            })
        } else {
            Err(SalaryVizError::internal(
                "Mismatch between schema and batches",
            ))
        }
    }

    /// Parse CSV text with a header row. All columns are read as text; empty cells are null.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(SalaryVizError::resource_load("CSV input is empty"));
        }

        let (inferred, _) = Format::default()
            .with_header(true)
            .with_truncated_rows(true)
            .infer_schema(Cursor::new(bytes), Some(0))
            .with_context(|| "Failed to read CSV header")?;

        if inferred.fields().is_empty() {
            return Err(SalaryVizError::resource_load("CSV input has no header row"));
        }

        let schema = Arc::new(Schema::new(
            inferred
                .fields()
                .iter()
                .map(|f| Field::new(f.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        // Short rows read as trailing nulls and are reported per row during normalization
        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .with_truncated_rows(true)
            .with_batch_size(CSV_BATCH_SIZE)
            .build(Cursor::new(bytes))?;

        let batches = reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| "Failed to read CSV rows")?;

        Self::try_new(schema, batches)
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|batch| batch.num_rows()).sum()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.index_of(name).is_ok()
    }

    /// Values of a column across all batches, in row order
    pub fn string_column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let index = self
            .schema
            .index_of(name)
            .map_err(|_| SalaryVizError::specification(format!("Missing column '{name}'")))?;

        let mut values = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let array = batch.column(index).as_string_opt::<i32>().with_context(|| {
                format!("Column '{name}' is not a string column")
            })?;
            values.extend(array.iter());
        }
        Ok(values)
    }

    #[cfg(feature = "prettyprint")]
    pub fn pretty_format(&self, max_rows: Option<usize>) -> Result<String> {
        let batches = match max_rows {
            Some(n) => self
                .batches
                .iter()
                .scan(0usize, |seen, batch| {
                    let keep = batch.num_rows().min(n.saturating_sub(*seen));
                    *seen += keep;
                    Some(batch.slice(0, keep))
                })
                .collect::<Vec<_>>(),
            None => self.batches.clone(),
        };
        pretty_format_batches(&batches)
            .with_context(|| String::from("Failed to pretty print"))
            .map(|s| s.to_string())
    }

    /// Content fingerprint, stable across loads of identical input
    pub fn get_hash(&self) -> u64 {
        RandomState::with_seed(123).hash_one(self)
    }
}

impl Hash for SalaryTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);

        for batch in &self.batches {
            batch.num_rows().hash(state);
            for column in batch.columns() {
                if let Some(strings) = column.as_string_opt::<i32>() {
                    for value in strings.iter() {
                        value.hash(state);
                    }
                } else {
                    column.len().hash(state);
                }
            }
        }
    }
}
