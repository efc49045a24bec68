//! Partition diffing - compare the desired layout against the table's
//! current partitions and produce the minimal create/drop delta.
//!
//! Matching is strictly by boundary value. Names are informational: a
//! renamed naming scheme must not register as churn, so two descriptors
//! with equal boundaries are the same partition whatever they are called.

use crate::plan::PartitionDescriptor;
use std::collections::HashSet;
use std::fmt;

/// The delta between desired and current, discarded once applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Desired partitions absent from the table, ascending by boundary.
    /// The reorganize statement requires this order.
    pub to_create: Vec<PartitionDescriptor>,
    /// Existing partitions no longer inside the window.
    pub to_drop: Vec<PartitionDescriptor>,
}

impl ReconciliationPlan {
    /// Returns true if the table already matches the desired layout.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_drop.is_empty()
    }
}

impl fmt::Display for ReconciliationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No changes needed.");
        }
        for p in &self.to_create {
            writeln!(f, "  + {} (less than {})", p.name, p.boundary)?;
        }
        for p in &self.to_drop {
            writeln!(f, "  - {} (less than {})", p.name, p.boundary)?;
        }
        Ok(())
    }
}

/// Compute the create/drop delta between two partition lists.
///
/// Idempotent: diffing a layout against itself, or re-running a pass before
/// the day boundary has moved, yields an empty plan. `desired` arrives from
/// the planner already ascending; that order is preserved in `to_create`.
pub fn diff(
    desired: &[PartitionDescriptor],
    current: &[PartitionDescriptor],
) -> ReconciliationPlan {
    let desired_boundaries: HashSet<_> = desired.iter().map(|p| p.boundary).collect();
    let current_boundaries: HashSet<_> = current.iter().map(|p| p.boundary).collect();

    let to_create = desired
        .iter()
        .filter(|p| !current_boundaries.contains(&p.boundary))
        .cloned()
        .collect();

    let to_drop = current
        .iter()
        .filter(|p| !desired_boundaries.contains(&p.boundary))
        .cloned()
        .collect();

    ReconciliationPlan { to_create, to_drop }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MysqlDay;

    fn descriptor(name: &str, boundary: i64) -> PartitionDescriptor {
        PartitionDescriptor {
            name: name.to_string(),
            boundary: MysqlDay::from_raw(boundary),
        }
    }

    fn window(first_boundary: i64, days: usize) -> Vec<PartitionDescriptor> {
        (0..days)
            .map(|i| descriptor(&format!("p{}", i), first_boundary + i as i64))
            .collect()
    }

    #[test]
    fn identical_layouts_diff_empty() {
        let layout = window(734139, 7);
        let plan = diff(&layout, &layout);
        assert!(plan.is_empty());
    }

    #[test]
    fn advancing_one_day_rolls_the_window() {
        // Seven-day window ending 2010-01-07, clock advanced to 2010-01-08:
        // one new partition at the head, one expired at the tail.
        let current: Vec<_> = (0..7)
            .map(|i| descriptor(&format!("from2010010{}", i + 1), 734139 + i as i64))
            .collect();
        let desired: Vec<_> = (0..7)
            .map(|i| descriptor(&format!("from2010010{}", i + 2), 734140 + i as i64))
            .collect();

        let plan = diff(&desired, &current);
        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_create[0].boundary, MysqlDay::from_raw(734146));
        assert_eq!(plan.to_drop.len(), 1);
        assert_eq!(plan.to_drop[0].name, "from20100101");
    }

    #[test]
    fn empty_current_creates_everything() {
        let desired = window(736797, 5);
        let plan = diff(&desired, &[]);
        assert_eq!(plan.to_create, desired);
        assert!(plan.to_drop.is_empty());
    }

    #[test]
    fn matching_ignores_names() {
        // Same boundaries under a different naming scheme: no churn.
        let desired = vec![descriptor("from20100101", 734139)];
        let current = vec![descriptor("p_2010_01_01", 734139)];
        let plan = diff(&desired, &current);
        assert!(plan.is_empty());
    }

    #[test]
    fn create_set_stays_ascending() {
        let desired = window(734139, 5);
        let current = vec![desired[2].clone()];
        let plan = diff(&desired, &current);
        let boundaries: Vec<i64> = plan.to_create.iter().map(|p| p.boundary.value()).collect();
        assert_eq!(boundaries, vec![734139, 734140, 734142, 734143]);
    }

    #[test]
    fn diffing_twice_is_stable() {
        let desired = window(734140, 7);
        let current = window(734139, 7);
        assert_eq!(diff(&desired, &current), diff(&desired, &current));
    }
}
