//! DDL generation for applying a reconciliation plan.
//!
//! A range-partitioned table only allows subdividing the open-ended tail,
//! so the create path never emits a raw `ADD PARTITION`: it reorganizes the
//! `future` catch-all into the new partitions plus a fresh catch-all.
//! Boundaries are rendered as `TO_DAYS('<date>')` expressions over literal
//! calendar dates, never pre-computed integers, so the server's own day
//! counting stays authoritative.

use crate::error::Error;
use crate::plan::PartitionDescriptor;
use crate::snapshot::Sentinel;

/// Backtick-quote a MySQL identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render one `PARTITION ... VALUES LESS THAN (TO_DAYS('...'))` clause.
pub fn partition_clause(partition: &PartitionDescriptor) -> Result<String, Error> {
    let date = partition
        .boundary
        .date()
        .ok_or(Error::BoundaryOutOfRange(partition.boundary))?;
    Ok(format!(
        "PARTITION {} VALUES LESS THAN (TO_DAYS('{}'))",
        quote_ident(&partition.name),
        date.format("%Y-%m-%d")
    ))
}

/// Render the clause for a structural partition.
pub fn sentinel_clause(sentinel: Sentinel) -> String {
    match sentinel {
        Sentinel::Start => format!(
            "PARTITION {} VALUES LESS THAN (0)",
            quote_ident(Sentinel::Start.name())
        ),
        Sentinel::Future => format!(
            "PARTITION {} VALUES LESS THAN MAXVALUE",
            quote_ident(Sentinel::Future.name())
        ),
    }
}

fn reject_sentinels(partitions: &[PartitionDescriptor]) -> Result<(), Error> {
    for p in partitions {
        if let Some(sentinel) = Sentinel::from_name(&p.name) {
            return Err(Error::SentinelInPlan(sentinel));
        }
    }
    Ok(())
}

/// Statement subdividing the `future` catch-all into the partitions to
/// create, ascending by boundary, plus a fresh catch-all.
///
/// Returns `None` for an empty create set: the pass runs far more often
/// than the day boundary moves, so the common case is a true no-op, not an
/// empty statement sent to the server.
pub fn reorganize_future(
    table: &str,
    to_create: &[PartitionDescriptor],
) -> Result<Option<String>, Error> {
    if to_create.is_empty() {
        return Ok(None);
    }
    reject_sentinels(to_create)?;

    let mut ordered: Vec<&PartitionDescriptor> = to_create.iter().collect();
    ordered.sort_by_key(|p| p.boundary);

    let mut clauses = Vec::with_capacity(ordered.len() + 1);
    for partition in ordered {
        clauses.push(partition_clause(partition)?);
    }
    clauses.push(sentinel_clause(Sentinel::Future));

    Ok(Some(format!(
        "ALTER TABLE {}\n  REORGANIZE PARTITION {} INTO (\n    {}\n  );",
        quote_ident(table),
        quote_ident(Sentinel::Future.name()),
        clauses.join(",\n    ")
    )))
}

/// Statement dropping every expired partition in one go.
///
/// The differ never sees sentinels, but this re-asserts the invariant:
/// a `start`/`future` name in the drop set is refused outright.
pub fn drop_partitions(
    table: &str,
    to_drop: &[PartitionDescriptor],
) -> Result<Option<String>, Error> {
    if to_drop.is_empty() {
        return Ok(None);
    }
    reject_sentinels(to_drop)?;

    let names: Vec<String> = to_drop.iter().map(|p| quote_ident(&p.name)).collect();
    Ok(Some(format!(
        "ALTER TABLE {}\n  DROP PARTITION {};",
        quote_ident(table),
        names.join(", ")
    )))
}
