//! Initial table creation and teardown.
//!
//! The created table starts with the `start` sentinel, a full retention
//! window ending today, and the `future` catch-all, so the first
//! reconciliation pass is already a no-op.

use crate::{MySqlStore, StoreError};
use chrono::NaiveDate;
use scythe::ddl::{partition_clause, quote_ident, sentinel_clause};
use scythe::{Sentinel, plan};

/// `CREATE TABLE IF NOT EXISTS` with the full initial partition layout.
pub fn create_table_sql(
    table: &str,
    today: NaiveDate,
    retention_days: u32,
) -> Result<String, scythe::Error> {
    let window = plan(today, retention_days, &[])?;

    let mut clauses = Vec::with_capacity(window.len() + 2);
    clauses.push(sentinel_clause(Sentinel::Start));
    for partition in &window {
        clauses.push(partition_clause(partition)?);
    }
    clauses.push(sentinel_clause(Sentinel::Future));

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n\
         \x20 `id` INTEGER NOT NULL AUTO_INCREMENT,\n\
         \x20 `data` VARCHAR(255) NOT NULL,\n\
         \x20 `created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
         \x20 PRIMARY KEY (`id`, `created_at`)\n\
         )\n\
         PARTITION BY RANGE (TO_DAYS(`created_at`)) (\n\
         \x20 {clauses}\n\
         );",
        table = quote_ident(table),
        clauses = clauses.join(",\n  ")
    ))
}

/// Create the table if it does not exist yet.
pub async fn create_table(
    store: &MySqlStore,
    table: &str,
    today: NaiveDate,
    retention_days: u32,
) -> Result<(), crate::Error> {
    let sql = create_table_sql(table, today, retention_days)?;
    tracing::info!(table, retention_days, "creating table");
    sqlx::query(&sql)
        .execute(store.pool())
        .await
        .map_err(StoreError::from)?;
    Ok(())
}

/// Drop the table outright. Test/teardown helper; never part of a pass.
pub async fn drop_table(store: &MySqlStore, table: &str) -> Result<(), StoreError> {
    let sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));
    tracing::info!(table, "dropping table");
    sqlx::query(&sql).execute(store.pool()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_brackets_the_window() {
        let today = NaiveDate::from_ymd_opt(2011, 1, 31).unwrap();
        let sql = create_table_sql("test", today, 7).unwrap();
        insta::assert_snapshot!(sql, @r"
CREATE TABLE IF NOT EXISTS `test` (
  `id` INTEGER NOT NULL AUTO_INCREMENT,
  `data` VARCHAR(255) NOT NULL,
  `created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`, `created_at`)
)
PARTITION BY RANGE (TO_DAYS(`created_at`)) (
  PARTITION `start` VALUES LESS THAN (0),
  PARTITION `from20110125` VALUES LESS THAN (TO_DAYS('2011-01-26')),
  PARTITION `from20110126` VALUES LESS THAN (TO_DAYS('2011-01-27')),
  PARTITION `from20110127` VALUES LESS THAN (TO_DAYS('2011-01-28')),
  PARTITION `from20110128` VALUES LESS THAN (TO_DAYS('2011-01-29')),
  PARTITION `from20110129` VALUES LESS THAN (TO_DAYS('2011-01-30')),
  PARTITION `from20110130` VALUES LESS THAN (TO_DAYS('2011-01-31')),
  PARTITION `from20110131` VALUES LESS THAN (TO_DAYS('2011-02-01')),
  PARTITION `future` VALUES LESS THAN MAXVALUE
);
");
    }

    #[test]
    fn invalid_retention_propagates() {
        let today = NaiveDate::from_ymd_opt(2011, 1, 31).unwrap();
        assert!(create_table_sql("test", today, 0).is_err());
    }
}
