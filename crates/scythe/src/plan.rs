//! Desired partition layout for a retention window.
//!
//! The layout is a pure function of (today, retention, current minimum
//! boundary) and is recomputed from scratch on every pass; nothing is
//! maintained incrementally.

use crate::clock::{self, MysqlDay};
use crate::error::Error;
use chrono::{Days, NaiveDate};

/// One non-sentinel partition: a stable name plus its exclusive upper bound.
///
/// The partition named for day `d` holds every row whose `created_at` falls
/// on `d`; its boundary is the day count of `d + 1`, the first excluded day.
/// Descriptors are never mutated, only superseded by the next recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    pub name: String,
    pub boundary: MysqlDay,
}

impl PartitionDescriptor {
    /// Descriptor for the partition covering `day`.
    pub fn for_day(day: NaiveDate) -> Result<Self, Error> {
        let next = day.succ_opt().ok_or(Error::BoundaryOutOfRange(
            MysqlDay::from_date(day),
        ))?;
        Ok(Self {
            name: clock::partition_name(day),
            boundary: MysqlDay::from_date(next),
        })
    }
}

/// Compute the ordered list of partitions that should exist for `today`.
///
/// One partition per day from `today - (retention_days - 1)` through `today`,
/// ascending, so the oldest row still inside the window at the start of today
/// has a home. Exactly `retention_days` descriptors when `current` puts no
/// floor on the window.
///
/// When the table's oldest existing boundary is already above part of the
/// naive window (older partitions were dropped under a longer retention, or
/// retention was shortened), the purged days are left out rather than
/// recreated: a desired partition is kept only if its boundary is at least
/// the minimum boundary among `current`. The effective window being shorter
/// than `retention_days` is surfaced as a warning.
pub fn plan(
    today: NaiveDate,
    retention_days: u32,
    current: &[PartitionDescriptor],
) -> Result<Vec<PartitionDescriptor>, Error> {
    if retention_days == 0 {
        return Err(Error::InvalidRetention {
            days: retention_days,
        });
    }

    let floor = current.iter().map(|p| p.boundary).min();

    let mut desired = Vec::with_capacity(retention_days as usize);
    let mut truncated = 0usize;
    for back in (0..retention_days).rev() {
        let day = today
            .checked_sub_days(Days::new(u64::from(back)))
            .ok_or(Error::InvalidRetention {
                days: retention_days,
            })?;
        let descriptor = PartitionDescriptor::for_day(day)?;
        if let Some(floor) = floor {
            if descriptor.boundary < floor {
                truncated += 1;
                continue;
            }
        }
        desired.push(descriptor);
    }

    if truncated > 0 {
        tracing::warn!(
            truncated,
            retention_days,
            "window truncated below existing minimum boundary; purged history is not recreated"
        );
    }

    Ok(desired)
}
