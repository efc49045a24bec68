//! End-to-end reconciliation passes against an in-memory store.

use chrono::NaiveDate;
use scythe::{
    BoxError, Error, MysqlDay, PartitionStore, RawBoundary, RawPartition, Reconciler,
    StatementKind, partition_name,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Store serving a fixed partition listing and recording executed DDL.
#[derive(Clone)]
struct MockStore {
    partitions: Vec<RawPartition>,
    executed: Arc<Mutex<Vec<String>>>,
    fail_reorganize: bool,
}

impl MockStore {
    fn new(partitions: Vec<RawPartition>) -> Self {
        Self {
            partitions,
            executed: Arc::new(Mutex::new(Vec::new())),
            fail_reorganize: false,
        }
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl PartitionStore for MockStore {
    fn read_partitions<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawPartition>, BoxError>> + Send + 'a>> {
        let partitions = self.partitions.clone();
        Box::pin(async move { Ok(partitions) })
    }

    fn execute<'a>(
        &'a self,
        sql: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_reorganize && sql.contains("REORGANIZE") {
                return Err("statement timeout".into());
            }
            self.executed.lock().unwrap().push(sql.to_string());
            Ok(())
        })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Full listing for a window of `days` partitions ending on `last`,
/// bracketed by the sentinels, the way `information_schema` returns it.
fn listing(last: NaiveDate, days: u64) -> Vec<RawPartition> {
    let mut rows = vec![RawPartition::new("start", Some(RawBoundary::Days(0)))];
    for back in (0..days).rev() {
        let day = last - chrono::Days::new(back);
        let boundary = MysqlDay::from_date(day.succ_opt().unwrap());
        rows.push(RawPartition::new(
            partition_name(day),
            Some(RawBoundary::Days(boundary.value())),
        ));
    }
    rows.push(RawPartition::new("future", Some(RawBoundary::MaxValue)));
    rows
}

#[tokio::test]
async fn steady_state_pass_is_a_no_op() {
    let store = MockStore::new(listing(date(2010, 1, 7), 7));
    let reconciler = Reconciler::new("test", store.clone());

    let plan = reconciler.reconcile(date(2010, 1, 7), 7).await.unwrap();

    assert!(plan.is_empty());
    assert!(store.executed().is_empty());
}

#[tokio::test]
async fn advancing_one_day_creates_then_drops() {
    // Window ending 2010-01-07 on disk, clock now at 2010-01-08.
    let store = MockStore::new(listing(date(2010, 1, 7), 7));
    let reconciler = Reconciler::new("test", store.clone());

    let plan = reconciler.reconcile(date(2010, 1, 8), 7).await.unwrap();

    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].name, "from20100108");
    assert_eq!(plan.to_drop.len(), 1);
    assert_eq!(plan.to_drop[0].name, "from20100101");

    let executed = store.executed();
    assert_eq!(executed.len(), 2);
    assert!(executed[0].contains("REORGANIZE PARTITION `future`"));
    assert!(executed[0].contains("PARTITION `from20100108` VALUES LESS THAN (TO_DAYS('2010-01-09'))"));
    assert!(executed[1].contains("DROP PARTITION `from20100101`"));
}

#[tokio::test]
async fn empty_window_is_created_in_one_statement() {
    // Freshly created table: sentinels only.
    let store = MockStore::new(vec![
        RawPartition::new("start", Some(RawBoundary::Days(0))),
        RawPartition::new("future", Some(RawBoundary::MaxValue)),
    ]);
    let reconciler = Reconciler::new("test", store.clone());

    let plan = reconciler.reconcile(date(2017, 4, 16), 5).await.unwrap();

    assert_eq!(plan.to_create.len(), 5);
    assert!(plan.to_drop.is_empty());
    let executed = store.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains("from20170412"));
    assert!(executed[0].contains("from20170416"));
}

#[tokio::test]
async fn failed_reorganize_skips_the_drop() {
    let mut store = MockStore::new(listing(date(2010, 1, 7), 7));
    store.fail_reorganize = true;
    let reconciler = Reconciler::new("test", store.clone());

    let err = reconciler.reconcile(date(2010, 1, 8), 7).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Execute {
            statement: StatementKind::Reorganize,
            ..
        }
    ));
    // Capacity is still short; nothing may be dropped.
    assert!(store.executed().is_empty());
}

#[tokio::test]
async fn missing_sentinel_aborts_before_any_ddl() {
    let mut rows = listing(date(2010, 1, 7), 7);
    rows.pop(); // lose `future`
    let store = MockStore::new(rows);
    let reconciler = Reconciler::new("test", store.clone());

    let err = reconciler.reconcile(date(2010, 1, 8), 7).await.unwrap_err();

    assert!(matches!(err, Error::MissingSentinel(_)));
    assert!(store.executed().is_empty());
}

#[tokio::test]
async fn rerunning_after_apply_is_idempotent() {
    // The state the previous test's statements would produce.
    let store = MockStore::new(listing(date(2010, 1, 8), 7));
    let reconciler = Reconciler::new("test", store.clone());

    let plan = reconciler.reconcile(date(2010, 1, 8), 7).await.unwrap();

    assert!(plan.is_empty());
    assert!(store.executed().is_empty());
}
