//! Rolling day-partition reconciliation for MySQL range-partitioned tables.
//!
//! A table partitioned by `TO_DAYS(created_at)` keeps one partition per
//! calendar day inside a retention window, bracketed by two structural
//! partitions: `start` below the window and the open-ended `future`
//! catch-all above it. On every pass this crate derives the layout that
//! should exist for "today", diffs it against the table's live partitions,
//! and produces the DDL delta:
//!
//! - new days are added by reorganizing the `future` catch-all (range
//!   partitioning cannot insert in the middle or append past the tail);
//! - expired days are dropped wholesale, after the create path succeeded.
//!
//! The computation is pure: "today", the retention length, and the current
//! partition snapshot are explicit inputs, so every pass is deterministic
//! and testable without a clock. The only side effects - reading
//! `information_schema` and executing the generated statements - sit behind
//! the [`PartitionStore`] trait; `scythe-mysql` provides the live
//! implementation.
//!
//! ```ignore
//! let reconciler = Reconciler::new("events", store);
//! let plan = reconciler.reconcile(today, 7).await?;
//! ```

mod clock;
pub mod ddl;
mod diff;
mod error;
mod plan;
mod reconcile;
mod snapshot;

pub use clock::{MysqlDay, partition_name};
pub use diff::{ReconciliationPlan, diff};
pub use error::{BoxError, Error, StatementKind};
pub use plan::{PartitionDescriptor, plan};
pub use reconcile::{PartitionStore, Reconciler};
pub use snapshot::{RawBoundary, RawPartition, Sentinel, ingest};

/// Result type for scythe operations.
pub type Result<T> = std::result::Result<T, Error>;
