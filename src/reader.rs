//! Decoding of CSV data files into [`Table`]s

use crate::table::Table;
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{Field, Schema},
    error::ArrowError,
};
use regex::Regex;
use std::{
    collections::HashSet,
    path::Path,
    sync::{Arc, OnceLock},
};
use thiserror::Error;

/// Field contents that are interpreted as missing values
const NULL_PATTERN: &str = r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$";

/// Number of rows decoded at once before concatenation
const BATCH_SIZE: usize = 1024;

/// Problems that can arise while decoding CSV data
#[derive(Debug, Error)]
pub enum ReadError {
    /// Failed to read the input
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed CSV, e.g. a record with more fields than the header
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// The input does not even contain a header row
    #[error("no columns to parse")]
    Empty,
}

/// Read a CSV file with a header row into a table
pub async fn read_csv_file(path: &Path) -> Result<Table, ReadError> {
    let bytes = tokio::fs::read(path).await?;
    read_csv(&bytes)
}

/// Read CSV data with a header row into a table
///
/// Rows are kept in input order. Short rows are padded with missing values.
/// Each column gets the narrowest type that all of its present values fit.
pub fn read_csv(bytes: &[u8]) -> Result<Table, ReadError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ReadError::Empty);
    }

    // Infer column types from the whole file
    let format = Format::default()
        .with_header(true)
        .with_null_regex(null_regex().clone())
        .with_truncated_rows(true);
    let (inferred, _num_records) = format.infer_schema(bytes, None)?;
    if inferred.fields().is_empty() {
        return Err(ReadError::Empty);
    }

    // Column names come from the header row, made unique
    let names = column_names(inferred.fields().iter().map(|field| field.name().as_str()));
    let fields = (inferred.fields().iter().zip(names))
        .map(|(field, name)| {
            log::trace!("Inferred column {name:?} as {}", field.data_type());
            Field::new(name, field.data_type().clone(), true)
        })
        .collect::<Vec<_>>();
    let schema = Arc::new(Schema::new(fields));

    // Decode records and glue the batches back together
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(bytes)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Regex matching the fields that are treated as missing values
fn null_regex() -> &'static Regex {
    static NULL_REGEX: OnceLock<Regex> = OnceLock::new();
    NULL_REGEX.get_or_init(|| Regex::new(NULL_PATTERN).expect("null marker pattern is valid"))
}

/// Turn header fields into unique column names
///
/// Empty header fields become `Unnamed: <index>`. Later duplicates are
/// suffixed with `.1`, `.2`...
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .enumerate()
        .map(|(idx, name)| {
            let name = if name.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name.to_owned()
            };
            let mut unique = name.clone();
            let mut suffix = 0;
            while !seen.insert(unique.clone()) {
                suffix += 1;
                unique = format!("{name}.{suffix}");
            }
            unique
        })
        .collect()
}
