//! Rolling-partition maintenance for one MySQL table.
//!
//! Usage:
//!   scythe          - run reconciliation passes on the configured interval
//!   scythe init     - create the table with its initial partition layout
//!   scythe once     - run a single pass and print the applied plan
//!
//! Configuration comes from the environment (or a `.env` file):
//! `DATABASE_URL`, `PARTITION_TABLE`, `DATA_RETENTION_DAYS`,
//! `RECONCILE_INTERVAL_SECS`.

use chrono::Local;
use scythe::Reconciler;
use scythe_mysql::config::Config;
use scythe_mysql::{MySqlStore, scheduler, setup};
use sqlx::mysql::MySqlPool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scythe=info".parse()?)
                .add_directive("scythe_mysql=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let pool = MySqlPool::connect(&config.database_url).await?;
    let store = MySqlStore::new(pool, config.table.clone());

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("init") => {
            let today = Local::now().date_naive();
            setup::create_table(&store, &config.table, today, config.retention_days).await?;
            println!("created `{}`", config.table);
        }
        Some("once") => {
            let reconciler = Reconciler::new(config.table.clone(), store);
            let today = Local::now().date_naive();
            let plan = reconciler.reconcile(today, config.retention_days).await?;
            print!("{plan}");
        }
        Some(other) => {
            eprintln!("unknown command: {other}");
            eprintln!("usage: scythe [init|once]");
            std::process::exit(1);
        }
        None => {
            scheduler::run(store, config.table, config.retention_days, config.interval).await;
        }
    }

    Ok(())
}
