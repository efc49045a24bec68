use crate::clock::MysqlDay;
use crate::snapshot::Sentinel;
use std::fmt;
use thiserror::Error;

/// Boxed error from the partition store, whatever client backs it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which of the two generated statements a pass was applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// The `REORGANIZE PARTITION future INTO (...)` create path.
    Reorganize,
    /// The `DROP PARTITION ...` drop path.
    Drop,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Reorganize => write!(f, "reorganize"),
            StatementKind::Drop => write!(f, "drop"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Retention must cover at least one day, and the window must fit the
    /// calendar.
    #[error("invalid retention: {days} day(s)")]
    InvalidRetention { days: u32 },

    /// A non-sentinel partition came back without a numeric boundary.
    #[error("partition `{name}` has no numeric boundary")]
    MissingBoundary { name: String },

    /// A non-sentinel partition is bounded by MAXVALUE; only `future` may be.
    #[error("partition `{name}` is bounded by MAXVALUE")]
    UnexpectedMaxValue { name: String },

    /// Two partitions share a boundary; the snapshot is malformed.
    #[error("duplicate partition boundary {boundary} on `{name}`")]
    DuplicateBoundary { name: String, boundary: MysqlDay },

    /// The table no longer has its `start`/`future` structural partition.
    /// Someone altered the partitioning outside this engine; not
    /// auto-corrected.
    #[error("table is missing its `{0}` sentinel partition")]
    MissingSentinel(Sentinel),

    /// A sentinel reached the create/drop sets; refusing to touch it.
    #[error("sentinel partition `{0}` leaked into the reconciliation plan")]
    SentinelInPlan(Sentinel),

    /// A computed boundary does not fall on a representable calendar date.
    #[error("boundary {0} does not correspond to a calendar date")]
    BoundaryOutOfRange(MysqlDay),

    /// Reading partition metadata from the table failed.
    #[error("failed to read partition metadata: {0}")]
    Snapshot(#[source] BoxError),

    /// Applying a generated statement failed. When the reorganize statement
    /// fails the drop statement is never attempted.
    #[error("failed to apply {statement} statement: {source}")]
    Execute {
        statement: StatementKind,
        #[source]
        source: BoxError,
    },
}
