//! Matrix-based deadlock detection (Work/Finish algorithm).
//!
//! The textbook detection algorithm for multi-instance resources:
//!
//! 1. `Work = Available`, `Finish[i] = false` for all i.
//! 2. Scan rows in ascending id order; admit the first unfinished
//!    process whose entire request fits in `Work`.
//! 3. On admission, fold the process's allocation back into `Work` and
//!    restart the scan from row 0.
//! 4. When a full scan admits nobody, every unfinished process is
//!    deadlocked.
//!
//! The lowest-id-first tie-break is load-bearing: it is what makes
//! `execution_order` and the trace reproducible. O(n²·m) worst case.

use crate::vector::{fmt_vec, vec_add, vec_le};
use gridlock_types::{ProcessId, SystemState};
use std::collections::BTreeSet;
use tracing::debug;

/// Result of a matrix detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixOutcome {
    /// Whether any process can never finish.
    pub deadlocked: bool,
    /// Ids of the processes left with `finish == false`.
    pub deadlocked_processes: BTreeSet<ProcessId>,
    /// Final finish vector, in row order.
    pub finish: Vec<bool>,
    /// Process ids in the order they were admitted.
    pub execution_order: Vec<ProcessId>,
    /// Step-by-step account of the run.
    pub trace: Vec<String>,
}

/// Result of a hypothetical-termination recovery check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCheck {
    /// True iff the surviving processes can all finish.
    pub recoverable: bool,
    /// Explanation of the check.
    pub trace: Vec<String>,
}

/// Run Work/Finish detection over a validated state.
///
/// Total over any valid state, including degenerate ones (zero
/// processes, zero resource types, all-zero matrices).
pub fn detect(state: &SystemState) -> MatrixOutcome {
    let n = state.n();
    let m = state.m();

    let mut trace = Vec::new();
    trace.push("=== Matrix-Based Deadlock Detection ===".to_string());
    trace.push(format!("System: {n} processes, {m} resource types"));
    trace.push(String::new());

    trace.push("Initial state:".to_string());
    trace.push(format!("  Available: {}", fmt_vec(state.available())));
    trace.push("  Allocation matrix:".to_string());
    for i in 0..n {
        trace.push(format!(
            "    {}: {}",
            state.process_id(i),
            fmt_vec(state.allocation_row(i))
        ));
    }
    trace.push("  Request matrix:".to_string());
    for i in 0..n {
        trace.push(format!(
            "    {}: {}",
            state.process_id(i),
            fmt_vec(state.request_row(i))
        ));
    }
    trace.push(String::new());

    trace.push("Step 1: Initialize".to_string());
    let mut work: Vec<u32> = state.available().to_vec();
    let mut finish = vec![false; n];
    let mut execution_order = Vec::new();

    trace.push(format!("  Work = Available = {}", fmt_vec(&work)));
    trace.push(format!("  Finish = [false; {n}]"));
    trace.push(String::new());

    trace.push("Step 2-4: Admit processes whose request fits in Work".to_string());
    let mut iteration = 1u32;
    loop {
        // Lowest unfinished row whose request is satisfiable right now.
        let admitted = (0..n).find(|&i| !finish[i] && vec_le(state.request_row(i), &work));

        let Some(i) = admitted else {
            break;
        };

        let id = state.process_id(i);
        finish[i] = true;
        execution_order.push(id);

        trace.push(format!("  Iteration {iteration}:"));
        trace.push(format!(
            "    Found {id}: Request = {} <= Work = {}",
            fmt_vec(state.request_row(i)),
            fmt_vec(&work)
        ));

        let old_work = work;
        work = vec_add(&old_work, state.allocation_row(i));
        trace.push(format!(
            "    {id} finishes and releases Allocation = {}",
            fmt_vec(state.allocation_row(i))
        ));
        trace.push(format!(
            "    Work = {} + {} = {}",
            fmt_vec(&old_work),
            fmt_vec(state.allocation_row(i)),
            fmt_vec(&work)
        ));
        trace.push(format!("    Finish[{id}] = true"));
        trace.push(String::new());

        iteration += 1;
        // Restart the scan from row 0 on the next round (the released
        // allocation may unblock a lower-id process).
    }

    trace.push("Step 5: Check for deadlock".to_string());
    let deadlocked_processes: BTreeSet<ProcessId> = (0..n)
        .filter(|&i| !finish[i])
        .map(|i| state.process_id(i))
        .collect();

    if deadlocked_processes.is_empty() {
        trace.push("  All processes finished (Finish[i] = true for all i)".to_string());
        trace.push(String::new());
        trace.push("Result: NO DEADLOCK".to_string());
        if !execution_order.is_empty() {
            let order: Vec<String> = execution_order.iter().map(ProcessId::to_string).collect();
            trace.push(format!("  Safe execution sequence: {}", order.join(" -> ")));
        }
    } else {
        trace.push("  Processes that cannot finish (Finish[i] = false):".to_string());
        for &id in &deadlocked_processes {
            let i = state.row_of(id).expect("deadlocked id comes from this state");
            trace.push(format!(
                "    {id}: Request = {} > Work = {} (cannot be satisfied)",
                fmt_vec(state.request_row(i)),
                fmt_vec(&work)
            ));
        }
        trace.push(String::new());
        trace.push("Result: DEADLOCK DETECTED".to_string());
        let names: Vec<String> = deadlocked_processes
            .iter()
            .map(ProcessId::to_string)
            .collect();
        trace.push(format!("  Deadlocked processes: {{{}}}", names.join(", ")));
    }

    debug!(
        n,
        m,
        deadlocked = !deadlocked_processes.is_empty(),
        admitted = execution_order.len(),
        "matrix detection finished"
    );

    MatrixOutcome {
        deadlocked: !deadlocked_processes.is_empty(),
        deadlocked_processes,
        finish,
        execution_order,
        trace,
    }
}

/// Check whether terminating `terminated` lets the rest of the system
/// finish.
///
/// The terminated processes' allocations are released into the
/// available pool and a fresh, validated state containing only the
/// survivors is re-analyzed (terminated rows are removed, not zeroed).
/// Terminating every process is trivially recoverable.
pub fn can_recover(state: &SystemState, terminated: &BTreeSet<ProcessId>) -> RecoveryCheck {
    let mut trace = Vec::new();
    let names: Vec<String> = terminated.iter().map(ProcessId::to_string).collect();
    trace.push(format!(
        "Checking recovery by terminating: {{{}}}",
        names.join(", ")
    ));

    // Release everything the terminated processes hold.
    let mut available: Vec<u32> = state.available().to_vec();
    for &id in terminated {
        if let Some(i) = state.row_of(id) {
            available = vec_add(&available, state.allocation_row(i));
        }
    }
    trace.push(format!("  Available after release: {}", fmt_vec(&available)));

    let survivors: Vec<usize> = (0..state.n())
        .filter(|&i| !terminated.contains(&state.process_id(i)))
        .collect();
    if survivors.is_empty() {
        trace.push("  All processes terminated.".to_string());
        return RecoveryCheck {
            recoverable: true,
            trace,
        };
    }

    let processes = survivors
        .iter()
        .map(|&i| state.processes()[i].clone())
        .collect();
    let allocation = survivors
        .iter()
        .map(|&i| state.allocation_row(i).to_vec())
        .collect();
    let request = survivors
        .iter()
        .map(|&i| state.request_row(i).to_vec())
        .collect();

    // Releasing whole rows keeps every per-resource sum intact, so the
    // reduced state cannot fail validation.
    let reduced = SystemState::new(
        processes,
        state.resource_types().to_vec(),
        available,
        allocation,
        request,
    )
    .expect("reduced state preserves conservation and bounds");

    let outcome = detect(&reduced);
    if outcome.deadlocked {
        trace.push("  Remaining processes are still deadlocked.".to_string());
    } else {
        trace.push("  Remaining processes can all finish.".to_string());
        let order: Vec<String> = outcome
            .execution_order
            .iter()
            .map(ProcessId::to_string)
            .collect();
        trace.push(format!("  Execution order: {}", order.join(" -> ")));
    }

    RecoveryCheck {
        recoverable: !outcome.deadlocked,
        trace,
    }
}
