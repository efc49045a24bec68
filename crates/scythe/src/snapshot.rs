//! Ingestion of the table's live partition list.
//!
//! The store hands back every partition of the table, sentinels included.
//! Ingestion checks the structural invariants (exactly one `start`, one
//! `future`, numeric boundaries everywhere else, no duplicates) and strips
//! the sentinels so they can never reach the differ.

use crate::clock::MysqlDay;
use crate::error::Error;
use crate::plan::PartitionDescriptor;
use std::collections::HashSet;
use std::fmt;

/// The two structural partitions bounding the table at -inf/+inf.
///
/// Modeled apart from [`PartitionDescriptor`] so "never diff or drop a
/// sentinel" holds by construction rather than by runtime comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// First partition, `VALUES LESS THAN (0)`.
    Start,
    /// Open-ended catch-all, `VALUES LESS THAN MAXVALUE`.
    Future,
}

impl Sentinel {
    /// Reserved partition name.
    pub fn name(self) -> &'static str {
        match self {
            Sentinel::Start => "start",
            Sentinel::Future => "future",
        }
    }

    /// Classify a partition name read back from the table.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Sentinel::Start),
            "future" => Some(Sentinel::Future),
            _ => None,
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boundary of one partition as read from `information_schema.partitions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBoundary {
    /// `PARTITION_DESCRIPTION` was a day count.
    Days(i64),
    /// `PARTITION_DESCRIPTION` was the literal `MAXVALUE`.
    MaxValue,
}

/// One row of partition metadata, before validation.
#[derive(Debug, Clone)]
pub struct RawPartition {
    pub name: String,
    pub boundary: Option<RawBoundary>,
}

impl RawPartition {
    pub fn new(name: impl Into<String>, boundary: Option<RawBoundary>) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }
}

/// Validate a raw partition listing and strip the sentinels.
///
/// Input order is preserved; the caller reads partitions in ordinal order so
/// the result is ascending by boundary for a well-formed table.
pub fn ingest(raw: Vec<RawPartition>) -> Result<Vec<PartitionDescriptor>, Error> {
    let mut saw_start = false;
    let mut saw_future = false;
    let mut seen = HashSet::new();
    let mut current = Vec::with_capacity(raw.len().saturating_sub(2));

    for partition in raw {
        match Sentinel::from_name(&partition.name) {
            Some(Sentinel::Start) => {
                saw_start = true;
                continue;
            }
            Some(Sentinel::Future) => {
                saw_future = true;
                continue;
            }
            None => {}
        }

        let boundary = match partition.boundary {
            Some(RawBoundary::Days(days)) => MysqlDay::from_raw(days),
            Some(RawBoundary::MaxValue) => {
                return Err(Error::UnexpectedMaxValue {
                    name: partition.name,
                });
            }
            None => {
                return Err(Error::MissingBoundary {
                    name: partition.name,
                });
            }
        };

        if !seen.insert(boundary) {
            return Err(Error::DuplicateBoundary {
                name: partition.name,
                boundary,
            });
        }

        current.push(PartitionDescriptor {
            name: partition.name,
            boundary,
        });
    }

    if !saw_start {
        return Err(Error::MissingSentinel(Sentinel::Start));
    }
    if !saw_future {
        return Err(Error::MissingSentinel(Sentinel::Future));
    }

    Ok(current)
}
