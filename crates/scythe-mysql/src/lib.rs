//! MySQL collaborator for the scythe reconciliation engine.
//!
//! Provides the live [`PartitionStore`]: partition metadata reads from
//! `information_schema.partitions` and DDL execution over a `sqlx` MySQL
//! pool, with every statement logged via tracing. Also home to the initial
//! table setup and the interval scheduler driving periodic passes.

pub mod config;
pub mod scheduler;
pub mod setup;

use scythe::{BoxError, PartitionStore, RawBoundary, RawPartition};
use sqlx::Row;
use sqlx::mysql::MySqlPool;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tracing::Instrument;

/// Anything that can go wrong in the binary's paths: engine, store, or
/// configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] scythe::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mysql error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// `information_schema` returned a row with a NULL partition name,
    /// which is how an unpartitioned table lists itself.
    #[error("table `{0}` is not partitioned")]
    NotPartitioned(String),

    #[error("unreadable boundary `{value}` on partition `{name}`")]
    BadBoundary { name: String, value: String },
}

/// Partition names and boundaries for one table in the pool's schema,
/// in ordinal (ascending boundary) order. Sentinels included.
const PARTITION_QUERY: &str = "\
    SELECT partition_name AS name, partition_description AS boundary \
    FROM information_schema.partitions \
    WHERE table_schema = DATABASE() AND table_name = ? \
    ORDER BY partition_ordinal_position";

/// Live [`PartitionStore`] over a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    table: String,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// The pool, for setup and teardown statements outside a pass.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_partitions(&self) -> Result<Vec<RawPartition>, StoreError> {
        let span = tracing::debug_span!(
            "db.query",
            table = %self.table,
            rows = tracing::field::Empty,
        );
        let rows = sqlx::query(PARTITION_QUERY)
            .bind(&self.table)
            .fetch_all(&self.pool)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());

        let mut partitions = Vec::with_capacity(rows.len());
        for row in rows {
            let name: Option<String> = row.try_get("name")?;
            let name = name.ok_or_else(|| StoreError::NotPartitioned(self.table.clone()))?;
            let description: Option<String> = row.try_get("boundary")?;
            let boundary = match description.as_deref() {
                None => None,
                Some(value) => Some(parse_boundary(&name, value)?),
            };
            partitions.push(RawPartition::new(name, boundary));
        }
        Ok(partitions)
    }

    async fn run_statement(&self, sql: &str) -> Result<(), StoreError> {
        let span = tracing::debug_span!(
            "db.execute",
            sql = %sql,
            affected = tracing::field::Empty,
        );
        let result = sqlx::query(sql)
            .execute(&self.pool)
            .instrument(span.clone())
            .await?;
        span.record("affected", result.rows_affected());
        Ok(())
    }
}

/// Parse a `PARTITION_DESCRIPTION` value: a day count for bounded
/// partitions, the literal `MAXVALUE` for the catch-all.
fn parse_boundary(name: &str, value: &str) -> Result<RawBoundary, StoreError> {
    if value == "MAXVALUE" {
        return Ok(RawBoundary::MaxValue);
    }
    value
        .parse::<i64>()
        .map(RawBoundary::Days)
        .map_err(|_| StoreError::BadBoundary {
            name: name.to_string(),
            value: value.to_string(),
        })
}

impl PartitionStore for MySqlStore {
    fn read_partitions<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawPartition>, BoxError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.fetch_partitions().await?) })
    }

    fn execute<'a>(
        &'a self,
        sql: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.run_statement(sql).await?) })
    }
}
