//! One reconciliation pass: read, plan, diff, apply.
//!
//! The pass is a stateless transaction. Nothing computed here survives into
//! the next pass; a retry after any failure re-reads the table, since a
//! partially applied pass changes what "current" means.

use crate::ddl;
use crate::diff::{self, ReconciliationPlan};
use crate::error::{BoxError, Error, StatementKind};
use crate::plan;
use crate::snapshot::{self, RawPartition};
use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;

/// The two side-effecting operations the engine needs from its environment.
///
/// Implemented for a live MySQL pool in `scythe-mysql`; tests plug in an
/// in-memory store. Both operations are awaited sequentially, never
/// concurrently: executing DDL invalidates the metadata snapshot it was
/// computed from.
pub trait PartitionStore: Send + Sync {
    /// Read the table's full partition listing, sentinels included, in
    /// ordinal order.
    fn read_partitions<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawPartition>, BoxError>> + Send + 'a>>;

    /// Apply one generated DDL statement.
    fn execute<'a>(
        &'a self,
        sql: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

/// Drives reconciliation passes for a single table against a store.
///
/// Holds no state between passes. Serializing concurrent reconcilers across
/// processes is the caller's concern; at most one pass per table at a time
/// is assumed.
pub struct Reconciler<S> {
    table: String,
    store: S,
}

impl<S: PartitionStore> Reconciler<S> {
    pub fn new(table: impl Into<String>, store: S) -> Self {
        Self {
            table: table.into(),
            store,
        }
    }

    /// The table this reconciler maintains.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run one pass for `today` and a retention window of `retention_days`.
    ///
    /// Apply order is create-then-drop, so every in-range row has a home
    /// before any capacity is removed. If the reorganize statement fails the
    /// drop statement is not attempted: capacity is still short, and
    /// dropping would make it worse. Returns the plan that was applied.
    pub async fn reconcile(
        &self,
        today: NaiveDate,
        retention_days: u32,
    ) -> Result<ReconciliationPlan, Error> {
        let raw = self
            .store
            .read_partitions()
            .await
            .map_err(Error::Snapshot)?;
        let current = snapshot::ingest(raw)?;
        tracing::debug!(
            table = %self.table,
            partitions = current.len(),
            "read partition snapshot"
        );

        let desired = plan::plan(today, retention_days, &current)?;
        let plan = diff::diff(&desired, &current);
        if plan.is_empty() {
            tracing::debug!(table = %self.table, "partitions already match the window");
            return Ok(plan);
        }

        if let Some(sql) = ddl::reorganize_future(&self.table, &plan.to_create)? {
            self.apply(StatementKind::Reorganize, &sql).await?;
        }
        if let Some(sql) = ddl::drop_partitions(&self.table, &plan.to_drop)? {
            self.apply(StatementKind::Drop, &sql).await?;
        }

        tracing::info!(
            table = %self.table,
            created = plan.to_create.len(),
            dropped = plan.to_drop.len(),
            "reconciled partition window"
        );
        Ok(plan)
    }

    async fn apply(&self, statement: StatementKind, sql: &str) -> Result<(), Error> {
        tracing::debug!(table = %self.table, kind = %statement, sql = %sql, "applying statement");
        self.store
            .execute(sql)
            .await
            .map_err(|source| Error::Execute { statement, source })
    }
}
