//! Day counting and partition naming.
//!
//! Partition boundaries live in MySQL's `TO_DAYS()` unit: whole days counted
//! from year 0. Everything that compares a boundary read back from
//! `information_schema` against one we computed goes through [`MysqlDay`], so
//! the two sides can never drift apart.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// `TO_DAYS('0001-01-01')` is 366; chrono's `num_days_from_ce` calls the same
/// date day 1. The difference is the 366 days of year 0.
const TO_DAYS_OFFSET: i64 = 365;

/// A whole-day count in MySQL's `TO_DAYS()` convention.
///
/// Monotonic in the calendar date, one unit per day. This is the equality key
/// for partition matching: two partitions with the same `MysqlDay` boundary
/// are the same partition, whatever they are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MysqlDay(i64);

impl MysqlDay {
    /// Day count of a calendar date, matching `TO_DAYS(date)` on the server.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(i64::from(date.num_days_from_ce()) + TO_DAYS_OFFSET)
    }

    /// Wrap a raw day count read back from `information_schema`.
    pub fn from_raw(days: i64) -> Self {
        Self(days)
    }

    /// The calendar date this day count falls on, if it is representable.
    ///
    /// Boundaries we compute always round-trip; a raw value far outside the
    /// calendar (or the `start` sentinel's `0`) does not.
    pub fn date(self) -> Option<NaiveDate> {
        let days = i32::try_from(self.0 - TO_DAYS_OFFSET).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days)
    }

    /// The raw day count.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MysqlDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical partition name for the partition covering `date`.
///
/// Fixed-width date token behind a literal `from` marker, e.g. `from20100107`.
/// Unique per calendar day; never collides with the `start`/`future`
/// sentinels.
pub fn partition_name(date: NaiveDate) -> String {
    format!("from{}", date.format("%Y%m%d"))
}
