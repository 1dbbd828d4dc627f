//! Fixed-width time bucketing.

use anyhow::{Result, bail};
use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::table::{Table, Value};

/// Rounds `t` down to the start of its enclosing `minutes`-wide interval,
/// aligned to the Unix epoch. Sub-second precision is dropped.
///
/// # Panics
///
/// Panics if `minutes` is not positive.
pub fn floor_to_interval(t: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    assert!(minutes > 0, "bucket width must be positive, got {minutes}");
    let width = minutes * 60;
    let offset = t.and_utc().timestamp().rem_euclid(width);
    t - TimeDelta::seconds(offset) - TimeDelta::nanoseconds(i64::from(t.nanosecond()))
}

/// Appends `bucket_column` holding `source_column` floored to `minutes`.
/// Unknown source times stay unknown.
pub fn add_bucket_column(
    table: Table,
    source_column: &str,
    bucket_column: &str,
    minutes: i64,
) -> Result<Table> {
    if minutes <= 0 {
        bail!("bucket width must be positive, got {minutes} minutes");
    }

    let buckets: Vec<Value> = table
        .column(source_column)?
        .into_iter()
        .map(|cell| match cell.as_time() {
            Some(t) => Value::Time(floor_to_interval(t, minutes)),
            None => Value::Missing,
        })
        .collect();

    table.with_column(bucket_column, buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_floor_rounds_down_to_half_hour() {
        assert_eq!(floor_to_interval(at(10, 12, 0), 30), at(10, 0, 0));
        assert_eq!(floor_to_interval(at(10, 30, 0), 30), at(10, 30, 0));
        assert_eq!(floor_to_interval(at(10, 59, 59), 30), at(10, 30, 0));
        assert_eq!(floor_to_interval(at(0, 0, 1), 30), at(0, 0, 0));
    }

    #[test]
    fn test_floor_drops_subseconds() {
        let t = at(10, 0, 0) + TimeDelta::milliseconds(250);
        assert_eq!(floor_to_interval(t, 30), at(10, 0, 0));
    }

    #[test]
    fn test_floor_is_idempotent() {
        for (h, m, s) in [(0, 0, 0), (10, 12, 0), (13, 47, 31), (23, 59, 59)] {
            let once = floor_to_interval(at(h, m, s), 30);
            assert_eq!(floor_to_interval(once, 30), once);
        }
    }

    #[test]
    fn test_floor_before_epoch() {
        let t = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 45, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        assert_eq!(floor_to_interval(t, 30), expected);
    }

    #[test]
    fn test_add_bucket_column_keeps_unknown_times() {
        let table = Table::with_rows(
            vec!["start_time".into()],
            vec![vec![Value::Time(at(10, 12, 0))], vec![Value::Missing]],
        )
        .unwrap();

        let table = add_bucket_column(table, "start_time", "time_30min", 30).unwrap();

        assert_eq!(table.columns(), &["start_time", "time_30min"]);
        assert_eq!(table.rows()[0][1], Value::Time(at(10, 0, 0)));
        assert_eq!(table.rows()[1][1], Value::Missing);
    }

    #[test]
    fn test_add_bucket_column_rejects_zero_width() {
        let table = Table::new(vec!["start_time".into()]);
        assert!(add_bucket_column(table, "start_time", "b", 0).is_err());
    }
}
