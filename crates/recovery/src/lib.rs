//! Recovery advisor for deadlocked states.
//!
//! Consumes the deadlocked set reported by a detector and searches for
//! ways out:
//!
//! - [`find_minimal_termination_set`]: smallest-cardinality sets of
//!   processes whose termination makes the remainder safe, verified
//!   against the matrix detector. All sets of the minimal size are
//!   returned, none larger.
//! - [`suggest_preemption`]: advisory-only list of resources each
//!   deadlocked process holds, for operators preferring rollback over
//!   termination. No feasibility check is performed.
//!
//! The termination search is brute force over subsets,
//! O(2^|deadlocked|) worst case. Deadlocked sets are small in practice,
//! the subset tests are independent, and they are fanned out across a
//! rayon pool; the collected output is identical to the sequential
//! enumeration order.

mod combinations;
mod report;
mod suggestion;

pub use report::format_report;
pub use suggestion::{Suggestion, SuggestionKind};

use combinations::combinations;
use gridlock_engine::{matrix, wfg};
use gridlock_types::{ProcessId, ResourceId, SystemState};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Beyond this many deadlocked processes the subset search gets
/// genuinely exponential; warn the caller instead of silently churning.
const SEARCH_WARN_THRESHOLD: usize = 20;

/// Which detector feeds [`suggest_recovery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detector {
    /// Work/Finish matrix detection (any instance counts).
    #[default]
    Matrix,
    /// Wait-for graph cycle detection (single-instance states).
    WaitForGraph,
}

/// Find every minimal-cardinality termination set that breaks the
/// deadlock.
///
/// Subset sizes are tried in increasing order; within a size,
/// combinations are enumerated lexicographically over the sorted id
/// list. The first size with at least one working subset wins and
/// *all* working subsets of that size are returned. Minimal cardinality
/// is guaranteed; ranking among equal-size solutions is not.
pub fn find_minimal_termination_set(
    state: &SystemState,
    deadlocked: &BTreeSet<ProcessId>,
) -> Vec<Suggestion> {
    if deadlocked.is_empty() {
        return Vec::new();
    }
    if deadlocked.len() > SEARCH_WARN_THRESHOLD {
        warn!(
            deadlocked = deadlocked.len(),
            "termination search is exponential in the deadlocked set; consider capping it"
        );
    }

    let sorted: Vec<ProcessId> = deadlocked.iter().copied().collect();

    for size in 1..=sorted.len() {
        let candidates = combinations(&sorted, size);
        debug!(size, candidates = candidates.len(), "trying termination sets");

        // Each subset test is independent; ordered collect keeps the
        // output identical to the sequential enumeration.
        let working: Vec<Suggestion> = candidates
            .par_iter()
            .filter_map(|subset| {
                let terminated: BTreeSet<ProcessId> = subset.iter().copied().collect();
                let check = matrix::can_recover(state, &terminated);
                check
                    .recoverable
                    .then(|| Suggestion::terminate(terminated, &check.trace))
            })
            .collect();

        if !working.is_empty() {
            return working;
        }
    }

    Vec::new()
}

/// List preemption alternatives for each deadlocked process, ascending
/// by id: every resource type it holds a positive allocation of.
///
/// Advisory only: preemption requires rolling the victim back, and no
/// safety check is run here.
pub fn suggest_preemption(
    state: &SystemState,
    deadlocked: &BTreeSet<ProcessId>,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for &id in deadlocked {
        let Some(row) = state.row_of(id) else {
            continue;
        };

        let held: Vec<(ResourceId, u32)> = state
            .resource_types()
            .iter()
            .enumerate()
            .filter(|(j, _)| state.allocation_row(row)[*j] > 0)
            .map(|(j, rt)| (rt.id, state.allocation_row(row)[j]))
            .collect();

        if !held.is_empty() {
            suggestions.push(Suggestion::preempt(id, &held));
        }
    }

    suggestions
}

/// Full advisor pass: detect with the chosen detector, then produce
/// termination suggestions followed by preemption alternatives.
/// Returns an empty list when the state is not deadlocked.
pub fn suggest_recovery(state: &SystemState, detector: Detector) -> Vec<Suggestion> {
    let deadlocked = match detector {
        Detector::Matrix => {
            let outcome = matrix::detect(state);
            if !outcome.deadlocked {
                return Vec::new();
            }
            outcome.deadlocked_processes
        }
        Detector::WaitForGraph => {
            let outcome = wfg::detect(state);
            if !outcome.deadlocked {
                return Vec::new();
            }
            outcome.deadlocked_processes
        }
    };

    let mut suggestions = find_minimal_termination_set(state, &deadlocked);
    suggestions.extend(suggest_preemption(state, &deadlocked));
    suggestions
}
