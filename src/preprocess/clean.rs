//! Presence flag derivation and column-aware missing-value fills.

use anyhow::Result;

use crate::config::{
    LEFT_SUFFIX, RAT_MINUTES_COLUMN, RAT_PRESENT_COLUMN, RIGHT_SUFFIX, UNKNOWN_FILL_COLUMNS,
    UNKNOWN_LABEL, ZERO_FILL_COLUMNS,
};
use crate::table::{Table, Value};

/// A rat counts as present only when its minutes are known and positive.
pub fn is_rat_present(rat_minutes: &Value) -> bool {
    matches!(rat_minutes.as_f64(), Some(minutes) if minutes > 0.0)
}

/// Appends the `rat_present` flag (1 or 0) computed from `rat_minutes`.
///
/// Must run before [`fill_missing`] so that a missing match reads as absent
/// rather than as a filled zero.
pub fn derive_rat_present(table: Table) -> Result<Table> {
    let flags: Vec<Value> = table
        .column(RAT_MINUTES_COLUMN)?
        .into_iter()
        .map(|cell| Value::Number(if is_rat_present(cell) { 1.0 } else { 0.0 }))
        .collect();

    table.with_column(RAT_PRESENT_COLUMN, flags)
}

/// Fills missing cells by column meaning: zero for the observation counts,
/// `"Unknown"` for the categorical labels. Timestamp columns are untouched.
///
/// Columns renamed by a join (`month_x`, `month_y`) are filled like their
/// base name. Absent columns are skipped.
pub fn fill_missing(table: Table) -> Result<Table> {
    let zero_targets = fill_targets(&table, ZERO_FILL_COLUMNS);
    let unknown_targets = fill_targets(&table, UNKNOWN_FILL_COLUMNS);

    let mut table = table;
    for name in &zero_targets {
        table = table.map_column(name, |cell| match cell {
            Value::Missing => Value::Number(0.0),
            other => other,
        })?;
    }
    for name in &unknown_targets {
        table = table.map_column(name, |cell| match cell {
            Value::Missing => Value::Text(UNKNOWN_LABEL.to_string()),
            other => other,
        })?;
    }

    Ok(table)
}

fn fill_targets(table: &Table, bases: &[&str]) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|name| {
            bases.iter().any(|base| {
                name.as_str() == *base
                    || name
                        .strip_prefix(base)
                        .is_some_and(|rest| rest == LEFT_SUFFIX || rest == RIGHT_SUFFIX)
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rat_present_rule() {
        assert!(is_rat_present(&Value::Number(0.5)));
        assert!(!is_rat_present(&Value::Number(0.0)));
        assert!(!is_rat_present(&Value::Number(-1.0)));
        assert!(!is_rat_present(&Value::Missing));
        assert!(!is_rat_present(&Value::Text("3".into())));
    }

    #[test]
    fn test_derive_rat_present_flags_each_row() {
        let table = Table::with_rows(
            vec!["rat_minutes".into()],
            vec![
                vec![Value::Number(2.0)],
                vec![Value::Number(0.0)],
                vec![Value::Missing],
            ],
        )
        .unwrap();

        let table = derive_rat_present(table).unwrap();
        let flags = table.numeric_column("rat_present").unwrap();

        assert_eq!(flags, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_derive_rat_present_requires_rat_minutes() {
        let table = Table::new(vec!["bat_landing_number".into()]);
        let err = derive_rat_present(table).unwrap_err();
        assert!(err.to_string().contains("rat_minutes"));
    }

    #[test]
    fn test_fill_missing_is_column_semantic() {
        let table = Table::with_rows(
            vec![
                "rat_minutes".into(),
                "season".into(),
                "month_x".into(),
                "start_time".into(),
                "habit".into(),
            ],
            vec![vec![
                Value::Missing,
                Value::Missing,
                Value::Missing,
                Value::Missing,
                Value::Missing,
            ]],
        )
        .unwrap();

        let table = fill_missing(table).unwrap();
        let row = &table.rows()[0];

        assert_eq!(row[0], Value::Number(0.0));
        assert_eq!(row[1], Value::Text("Unknown".into()));
        assert_eq!(row[2], Value::Text("Unknown".into()));
        assert!(row[3].is_missing());
        assert!(row[4].is_missing());
    }

    #[test]
    fn test_fill_missing_leaves_present_values() {
        let table = Table::with_rows(
            vec!["food_availability".into(), "month".into()],
            vec![vec![Value::Number(3.5), Value::Number(4.0)]],
        )
        .unwrap();

        let filled = fill_missing(table.clone()).unwrap();

        assert_eq!(filled, table);
    }

    #[test]
    fn test_fill_targets_ignores_lookalike_names() {
        let table = Table::new(vec!["months".into(), "month_y".into(), "season".into()]);
        assert_eq!(
            fill_targets(&table, UNKNOWN_FILL_COLUMNS),
            vec!["month_y".to_string(), "season".to_string()]
        );
    }
}
