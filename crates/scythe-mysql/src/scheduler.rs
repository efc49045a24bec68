//! Interval scheduler driving reconciliation passes.
//!
//! The pass itself takes "today" as an explicit input; this is the one
//! place the wall clock is read. A failed pass is logged and the loop
//! moves on: the next tick re-reads the table, which is the whole retry
//! policy - a timed-out statement leaves the table in unknown state, and
//! only a fresh snapshot can say what is left to do.

use crate::MySqlStore;
use chrono::Local;
use scythe::Reconciler;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Run reconciliation passes forever, one per `every` interval.
///
/// The interval is expected to be much shorter than a day (hourly by
/// default), so most passes are no-ops; the day the window rolls over, one
/// pass advances it. Never returns.
pub async fn run(store: MySqlStore, table: String, retention_days: u32, every: Duration) {
    let reconciler = Reconciler::new(table, store);
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        table = %reconciler.table(),
        retention_days,
        interval_secs = every.as_secs(),
        "partition scheduler started"
    );

    loop {
        interval.tick().await;
        let today = Local::now().date_naive();
        match reconciler.reconcile(today, retention_days).await {
            Ok(plan) if plan.is_empty() => {
                tracing::debug!(%today, "partitions already current");
            }
            Ok(plan) => {
                tracing::info!(
                    %today,
                    created = plan.to_create.len(),
                    dropped = plan.to_drop.len(),
                    "partition window advanced"
                );
            }
            Err(error) => {
                tracing::error!(%today, %error, "reconciliation pass failed; will retry next tick");
            }
        }
    }
}
