//! Equality joins between two [`Table`]s.
//!
//! Output rows follow the left table's order, and within one left row the
//! right table's order. When the key column has the same name on both sides
//! it appears once. Any other column present on both sides is renamed with
//! the `_x` / `_y` suffixes.

use anyhow::Result;
use std::collections::{HashMap, HashSet};

use crate::config::{LEFT_SUFFIX, RIGHT_SUFFIX};
use crate::table::{JoinKey, Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Every left row survives; unmatched rows get missing right-side cells.
    Left,
    /// Only rows with a match on both sides survive.
    Inner,
}

/// Joins `left` and `right` where `left[left_on] == right[right_on]`.
///
/// Missing keys never match anything, including other missing keys.
///
/// # Errors
///
/// Returns an error if either key column is absent.
pub fn join(
    left: &Table,
    right: &Table,
    left_on: &str,
    right_on: &str,
    kind: JoinKind,
) -> Result<Table> {
    let left_key = left.require_column(left_on)?;
    let right_key = right.require_column(right_on)?;
    let shared_key = left_on == right_on;

    let right_keep: Vec<usize> = (0..right.width())
        .filter(|&idx| !(shared_key && idx == right_key))
        .collect();

    let columns = joined_columns(left, right, &right_keep, shared_key.then_some(left_on));

    let mut index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows().iter().enumerate() {
        if let Some(key) = row[right_key].join_key() {
            index.entry(key).or_default().push(row_idx);
        }
    }

    let mut out = Table::new(columns);
    for left_row in left.rows() {
        let matches = left_row[left_key]
            .join_key()
            .and_then(|key| index.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if matches.is_empty() {
            if kind == JoinKind::Left {
                let mut row = left_row.clone();
                row.extend(right_keep.iter().map(|_| Value::Missing));
                out.push_row(row)?;
            }
            continue;
        }

        for &right_idx in matches {
            let right_row = &right.rows()[right_idx];
            let mut row = left_row.clone();
            row.extend(right_keep.iter().map(|&idx| right_row[idx].clone()));
            out.push_row(row)?;
        }
    }

    Ok(out)
}

fn joined_columns(
    left: &Table,
    right: &Table,
    right_keep: &[usize],
    shared_key: Option<&str>,
) -> Vec<String> {
    let left_names: HashSet<&str> = left.columns().iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = right_keep
        .iter()
        .map(|&idx| right.columns()[idx].as_str())
        .collect();

    let overlaps = |name: &str| {
        Some(name) != shared_key && left_names.contains(name) && right_names.contains(name)
    };

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|name| {
            if overlaps(name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect();

    columns.extend(right_keep.iter().map(|&idx| {
        let name = &right.columns()[idx];
        if overlaps(name.as_str()) {
            format!("{name}{RIGHT_SUFFIX}")
        } else {
            name.clone()
        }
    }));

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn left_table() -> Table {
        Table::with_rows(
            vec!["month".into(), "risk".into(), "hours".into()],
            vec![
                vec![num(1.0), num(0.0), num(0.5)],
                vec![num(2.0), num(1.0), num(1.5)],
                vec![Value::Missing, num(1.0), num(2.5)],
                vec![num(9.0), num(0.0), num(3.5)],
            ],
        )
        .unwrap()
    }

    fn right_table() -> Table {
        Table::with_rows(
            vec!["month".into(), "hours".into(), "rat_arrival_number".into()],
            vec![
                vec![num(2.0), num(10.0), num(3.0)],
                vec![num(1.0), num(11.0), num(0.0)],
                vec![num(2.0), num(12.0), num(5.0)],
                vec![Value::Missing, num(13.0), num(8.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_inner_join_on_shared_key_suffixes_overlaps() {
        let joined = join(&left_table(), &right_table(), "month", "month", JoinKind::Inner).unwrap();

        assert_eq!(
            joined.columns(),
            &["month", "risk", "hours_x", "hours_y", "rat_arrival_number"]
        );
        // month 1 matches once, month 2 matches twice in right order
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.rows()[0][4], num(0.0));
        assert_eq!(joined.rows()[1][3], num(10.0));
        assert_eq!(joined.rows()[2][3], num(12.0));
    }

    #[test]
    fn test_missing_keys_never_match() {
        let joined = join(&left_table(), &right_table(), "month", "month", JoinKind::Inner).unwrap();
        assert!(joined.rows().iter().all(|row| !row[0].is_missing()));
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let left = Table::with_rows(
            vec!["slot".into(), "season".into()],
            vec![
                vec![text("a"), text("winter")],
                vec![text("b"), text("spring")],
                vec![Value::Missing, text("summer")],
            ],
        )
        .unwrap();
        let right = Table::with_rows(
            vec!["key".into(), "rat_minutes".into()],
            vec![vec![text("b"), num(4.0)]],
        )
        .unwrap();

        let joined = join(&left, &right, "slot", "key", JoinKind::Left).unwrap();

        assert_eq!(joined.height(), left.height());
        assert_eq!(joined.columns(), &["slot", "season", "key", "rat_minutes"]);
        assert_eq!(joined.rows()[0][3], Value::Missing);
        assert_eq!(joined.rows()[1][3], num(4.0));
        assert_eq!(joined.rows()[2][2], Value::Missing);
    }

    #[test]
    fn test_join_requires_key_columns() {
        let err = join(&left_table(), &right_table(), "season", "month", JoinKind::Inner)
            .unwrap_err();
        assert!(err.to_string().contains("season"));
    }
}
