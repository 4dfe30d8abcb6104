//! Loaded tables and their label-free counterpart
//!
//! A loaded dataset is an Arrow [`RecordBatch`]: named, typed columns of equal
//! length, with rows in file order.

use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Float64Type, Int64Type},
    error::ArrowError,
    record_batch::RecordBatch,
    util::{
        display::{ArrayFormatter, FormatOptions},
        pretty::pretty_format_batches,
    },
};
use serde::Serialize;
use std::{cmp::Ordering, fmt};

/// Labeled columns read from one CSV file
pub type Table = RecordBatch;

/// Column names, in header order
pub fn column_names(table: &Table) -> Vec<&str> {
    (table.schema_ref().fields().iter())
        .map(|field| field.name().as_str())
        .collect()
}

/// Table made of the first `n` rows
pub fn head(table: &Table, n: usize) -> Table {
    table.slice(0, n.min(table.num_rows()))
}

/// Render a table as aligned text, followed by its dimensions
pub fn pretty(table: &Table) -> Result<String, ArrowError> {
    let grid = pretty_format_batches(std::slice::from_ref(table))?;
    Ok(format!(
        "{grid}\n[{} rows x {} columns]",
        table.num_rows(),
        table.num_columns()
    ))
}

/// Values of a column, as dynamically typed values
///
/// Integer, float, boolean and string columns map to the matching [`Value`]
/// variant. Other column types (e.g. dates) are rendered as strings.
pub fn column_values(column: &dyn Array) -> Vec<Value> {
    match column.data_type() {
        DataType::Int64 => (column.as_primitive::<Int64Type>().iter())
            .map(|v| v.map_or(Value::Null, Value::Int))
            .collect(),
        DataType::Float64 => (column.as_primitive::<Float64Type>().iter())
            .map(|v| v.map_or(Value::Null, Value::Float))
            .collect(),
        DataType::Boolean => (column.as_boolean().iter())
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        DataType::Utf8 => (column.as_string::<i32>().iter())
            .map(|v| v.map_or(Value::Null, |s| Value::Str(s.into())))
            .collect(),
        DataType::Null => vec![Value::Null; column.len()],
        other => match ArrayFormatter::try_new(column, &FormatOptions::default()) {
            Ok(formatter) => (0..column.len())
                .map(|row| {
                    if column.is_null(row) {
                        Value::Null
                    } else {
                        Value::Str(formatter.value(row).to_string().into())
                    }
                })
                .collect(),
            Err(e) => {
                log::warn!("Cannot render {other} column values, treating them as missing: {e}");
                vec![Value::Null; column.len()]
            }
        },
    }
}

/// Drop column labels, keeping a row-major grid of dynamically typed values
pub fn to_array(table: &Table) -> RawArray {
    let columns = (table.columns().iter())
        .map(|column| column_values(column.as_ref()))
        .collect::<Vec<_>>();
    let mut values = Vec::with_capacity(table.num_rows() * columns.len());
    for row in 0..table.num_rows() {
        values.extend(columns.iter().map(|column| column[row].clone()));
    }
    RawArray {
        values,
        num_columns: columns.len(),
    }
}

/// Dynamically typed value from a table
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Box<str>),
}
//
impl Value {
    /// Truth that this is a missing value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Total order: missing values, then booleans, then numbers, then strings
    ///
    /// Integers and floats are compared by numerical value.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Position of this kind of value in the total order
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Str(_) => 3,
        }
    }
}
//
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NaN"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Label-free 2D array of dynamically typed values, stored row-major
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawArray {
    /// Concatenated rows
    values: Vec<Value>,

    /// Length of each row
    num_columns: usize,
}
//
impl RawArray {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        let num_rows = if self.num_columns == 0 {
            0
        } else {
            self.values.len() / self.num_columns
        };
        (num_rows, self.num_columns)
    }

    /// Value at a given position, if in bounds
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        if column >= self.num_columns {
            return None;
        }
        self.values.get(row * self.num_columns + column)
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.values.chunks(self.num_columns.max(1))
    }
}
