//! Descriptive statistics over loaded tables

use crate::{
    table::{self, Table, Value},
    Result,
};
use anyhow::Context;
use arrow::array::ArrayRef;
use rayon::prelude::*;
use std::{
    cmp::{Ordering, Reverse},
    collections::HashMap,
    fmt,
};

/// Number of occurences of each present value of a column
///
/// Results are sorted by decreasing count. Values with the same count are
/// listed in order of first appearance. Missing values are not counted.
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let values = table::column_values(lookup(table, column)?.as_ref());

    // Count values in parallel, remembering where each value was first seen
    let counts = (values.par_iter().enumerate())
        .filter(|(_row, value)| !value.is_null())
        .fold(HashMap::<String, (usize, usize)>::new, |mut counts, (row, value)| {
            let (count, first_row) = counts.entry(value.to_string()).or_insert((0, row));
            *count += 1;
            *first_row = (*first_row).min(row);
            counts
        })
        .reduce(HashMap::new, |mut counts1, counts2| {
            for (value, (count, first_row)) in counts2 {
                let (total, first) = counts1.entry(value).or_insert((0, first_row));
                *total += count;
                *first = (*first).min(first_row);
            }
            counts1
        });

    // Order by decreasing count, then by first appearance
    let mut counts = counts.into_iter().collect::<Vec<_>>();
    counts.sort_unstable_by_key(|(_value, (count, first_row))| (Reverse(*count), *first_row));
    Ok(counts
        .into_iter()
        .map(|(value, (count, _first_row))| (value, count))
        .collect())
}

/// Number of rows for each combination of values of several columns
///
/// Rows where any of the columns has a missing value are skipped. Results are
/// sorted by key, comparing values by type (numbers numerically, strings
/// lexicographically) rather than by their text rendering.
pub fn group_sizes(table: &Table, columns: &[&str]) -> Result<Vec<(Vec<Value>, usize)>> {
    let columns = (columns.iter())
        .map(|name| Ok(table::column_values(lookup(table, name)?.as_ref())))
        .collect::<Result<Vec<_>>>()?;

    // Collect complete keys, then sort them so that equal keys are adjacent
    let mut keys = (0..table.num_rows())
        .filter_map(|row| {
            let key = (columns.iter())
                .map(|column| column[row].clone())
                .collect::<Vec<_>>();
            (!key.iter().any(Value::is_null)).then_some(key)
        })
        .collect::<Vec<_>>();
    keys.sort_by(|key1, key2| compare_keys(key1, key2));

    // Count runs of equal keys
    let mut groups = Vec::<(Vec<Value>, usize)>::new();
    for key in keys {
        match groups.last_mut() {
            Some((last, count)) if compare_keys(last, &key).is_eq() => *count += 1,
            _ => groups.push((key, 1)),
        }
    }
    Ok(groups)
}

/// Lexicographic comparison of group keys
fn compare_keys(key1: &[Value], key2: &[Value]) -> Ordering {
    (key1.iter().zip(key2))
        .map(|(value1, value2)| value1.total_cmp(value2))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Look up a column, failing with the list of known columns
fn lookup<'table>(table: &'table Table, name: &str) -> Result<&'table ArrayRef> {
    table.column_by_name(name).with_context(|| {
        let known = table::column_names(table).join(", ");
        format!("no column named {name:?}, known columns are: {known}")
    })
}

/// Horizontal bar chart rendered as text
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BarChart {
    /// Title displayed above the chart
    pub title: Box<str>,

    /// Meaning of the bar labels
    pub x_label: Box<str>,

    /// Meaning of the bar lengths
    pub y_label: Box<str>,

    /// Label and value of each bar, in display order
    pub bars: Vec<(String, usize)>,

    /// Length of the longest bar, in characters
    pub width: usize,
}
//
impl BarChart {
    /// Set up a chart with the default width
    pub fn new(
        title: impl Into<Box<str>>,
        x_label: impl Into<Box<str>>,
        y_label: impl Into<Box<str>>,
        bars: Vec<(String, usize)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            bars,
            width: 50,
        }
    }
}
//
impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let label_width = (self.bars.iter())
            .map(|(label, _)| label.chars().count())
            .chain(std::iter::once(self.x_label.chars().count()))
            .max()
            .unwrap_or(0);
        writeln!(f, "{:<label_width$} | {}", self.x_label, self.y_label)?;
        let max = self.bars.iter().map(|(_, value)| *value).max().unwrap_or(0);
        for (label, value) in &self.bars {
            // Round to the nearest character, but never hide a nonzero bar
            let len = if max == 0 {
                0
            } else {
                ((value * self.width + max / 2) / max).max(usize::from(*value > 0))
            };
            writeln!(f, "{label:<label_width$} | {} {value}", "#".repeat(len))?;
        }
        Ok(())
    }
}
