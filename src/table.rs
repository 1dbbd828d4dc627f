//! In-memory tabular data.
//!
//! A [`Table`] is a header plus row-major cells. Every transformation takes
//! the table by value and hands back a new one, so each pipeline step can be
//! tested on its own.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDateTime;
use std::fmt;

use crate::config::{MISSING_MARKERS, TIMESTAMP_OUTPUT_FORMAT};

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
    Time(NaiveDateTime),
}

impl Value {
    /// Interprets a raw CSV field. Missing markers become [`Value::Missing`],
    /// anything that parses as a float becomes [`Value::Number`].
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_nan() => Value::Missing,
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Hashable form used by joins. Missing cells have no key and never match.
    pub(crate) fn join_key(&self) -> Option<JoinKey> {
        match self {
            Value::Missing => None,
            Value::Number(n) if n.is_nan() => None,
            // -0.0 and 0.0 compare equal, so they must hash equal
            Value::Number(n) if *n == 0.0 => Some(JoinKey::Number(0.0f64.to_bits())),
            Value::Number(n) => Some(JoinKey::Number(n.to_bits())),
            Value::Text(s) => Some(JoinKey::Text(s.clone())),
            Value::Time(t) => Some(JoinKey::Time(*t)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Time(t) => write!(f, "{}", t.format(TIMESTAMP_OUTPUT_FORMAT)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum JoinKey {
    Number(u64),
    Text(String),
    Time(NaiveDateTime),
}

/// A rectangular table of [`Value`]s with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table, rejecting rows whose width does not match the header.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row {} has {} fields, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`, like a dataframe shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`] but fails with the column name.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| anyhow!("expected column `{name}` is missing"))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Extracts a fully numeric column. Missing or textual cells are an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx].as_f64().ok_or_else(|| {
                    anyhow!(
                        "column `{name}` row {} is not numeric: {:?}",
                        i + 1,
                        row[idx]
                    )
                })
            })
            .collect()
    }

    /// Keeps the first `n` rows in their original order.
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Drops every row that has at least one missing cell.
    pub fn drop_missing(self) -> Self {
        self.filter_rows(|row| !row.iter().any(Value::is_missing))
    }

    pub fn filter_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| keep(row.as_slice()));
        self
    }

    /// Appends a column. `values` must have one entry per row.
    pub fn with_column(mut self, name: &str, values: Vec<Value>) -> Result<Self> {
        if self.column_index(name).is_some() {
            bail!("column `{name}` already exists");
        }
        if values.len() != self.rows.len() {
            bail!(
                "column `{name}` has {} values for {} rows",
                values.len(),
                self.rows.len()
            );
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// Rewrites every cell of one column in place.
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Result<Self>
    where
        F: FnMut(Value) -> Value,
    {
        let idx = self.require_column(name)?;
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[idx], Value::Missing);
            row[idx] = f(cell);
        }
        Ok(self)
    }

    /// Number of missing cells per column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let count = self.rows.iter().filter(|row| row[idx].is_missing()).count();
                (name.clone(), count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Table {
        Table::with_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Number(1.0), Value::Text("x".into())],
                vec![Value::Missing, Value::Text("y".into())],
                vec![Value::Number(3.0), Value::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_raw_classifies_cells() {
        assert_eq!(Value::from_raw(""), Value::Missing);
        assert_eq!(Value::from_raw(" NaN "), Value::Missing);
        assert_eq!(Value::from_raw("2.5"), Value::Number(2.5));
        assert_eq!(Value::from_raw("7"), Value::Number(7.0));
        assert_eq!(Value::from_raw("winter"), Value::Text("winter".into()));
    }

    #[test]
    fn test_display_round_trips_common_cells() {
        let t = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(Value::Time(t).to_string(), "2023-01-01 10:00:00");
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = Table::new(vec!["a".into()]);
        assert!(table.push_row(vec![Value::Missing, Value::Missing]).is_err());
    }

    #[test]
    fn test_drop_missing_keeps_complete_rows() {
        let table = sample().drop_missing();
        assert_eq!(table.height(), 1);
        assert_eq!(table.rows()[0][0], Value::Number(1.0));
    }

    #[test]
    fn test_head_truncates_in_order() {
        let table = sample().head(2);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows()[1][1], Value::Text("y".into()));
        assert_eq!(sample().head(10).height(), 3);
    }

    #[test]
    fn test_missing_counts_per_column() {
        let counts = sample().missing_counts();
        assert_eq!(counts, vec![("a".to_string(), 1), ("b".to_string(), 1)]);
    }

    #[test]
    fn test_numeric_column_rejects_missing() {
        assert!(sample().numeric_column("a").is_err());
        let complete = sample().drop_missing();
        assert_eq!(complete.numeric_column("a").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_require_column_names_the_column() {
        let err = sample().require_column("risk").unwrap_err();
        assert!(err.to_string().contains("risk"));
    }

    #[test]
    fn test_with_column_checks_length() {
        assert!(sample().with_column("c", vec![Value::Missing]).is_err());
        let table = sample()
            .with_column("c", vec![Value::Missing; 3])
            .unwrap();
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_join_key_treats_signed_zero_as_equal() {
        assert_eq!(
            Value::Number(-0.0).join_key(),
            Value::Number(0.0).join_key()
        );
        assert_eq!(Value::Missing.join_key(), None);
    }
}
