//! End-to-end checks of the advisor's minimality contract.

use gridlock_engine::matrix;
use gridlock_recovery::{find_minimal_termination_set, suggest_recovery, Detector, SuggestionKind};
use gridlock_types::{Process, ProcessId, ResourceType, SystemState};
use std::collections::BTreeSet;

fn state(
    totals: &[u32],
    available: &[u32],
    allocation: &[&[u32]],
    request: &[&[u32]],
) -> SystemState {
    let processes = (0..allocation.len() as u32).map(Process::numbered).collect();
    let resources = totals
        .iter()
        .enumerate()
        .map(|(j, &t)| ResourceType::numbered(j as u32, t))
        .collect();
    SystemState::new(
        processes,
        resources,
        available.to_vec(),
        allocation.iter().map(|r| r.to_vec()).collect(),
        request.iter().map(|r| r.to_vec()).collect(),
    )
    .unwrap()
}

/// Exhaustively confirm that no subset of `deadlocked` smaller than
/// `k` recovers the state.
fn assert_no_smaller_solution(s: &SystemState, deadlocked: &BTreeSet<ProcessId>, k: usize) {
    let ids: Vec<ProcessId> = deadlocked.iter().copied().collect();
    // Bitmask enumeration is fine at test scale.
    for mask in 0u32..(1 << ids.len()) {
        let subset: BTreeSet<ProcessId> = ids
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &id)| id)
            .collect();
        if !subset.is_empty() && subset.len() < k {
            assert!(
                !matrix::can_recover(s, &subset).recoverable,
                "subset {subset:?} smaller than k={k} should not recover"
            );
        }
    }
}

#[test]
fn minimal_size_one_on_a_three_ring() {
    let s = state(
        &[1, 1, 1],
        &[0, 0, 0],
        &[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]],
        &[&[0, 1, 0], &[0, 0, 1], &[1, 0, 0]],
    );
    let outcome = matrix::detect(&s);
    assert!(outcome.deadlocked);

    let suggestions = find_minimal_termination_set(&s, &outcome.deadlocked_processes);
    assert!(!suggestions.is_empty());
    let k = suggestions[0].processes.len();
    assert_eq!(k, 1);
    assert!(suggestions.iter().all(|sug| sug.processes.len() == k));

    // Every returned subset actually recovers.
    for suggestion in &suggestions {
        assert!(matrix::can_recover(&s, &suggestion.processes).recoverable);
    }
}

#[test]
fn minimal_size_two_needs_a_victim_per_cycle() {
    // Two disjoint 2-cycles.
    let s = state(
        &[1, 1, 1, 1],
        &[0, 0, 0, 0],
        &[
            &[1, 0, 0, 0],
            &[0, 1, 0, 0],
            &[0, 0, 1, 0],
            &[0, 0, 0, 1],
        ],
        &[
            &[0, 1, 0, 0],
            &[1, 0, 0, 0],
            &[0, 0, 0, 1],
            &[0, 0, 1, 0],
        ],
    );
    let outcome = matrix::detect(&s);
    let suggestions = find_minimal_termination_set(&s, &outcome.deadlocked_processes);

    let k = suggestions[0].processes.len();
    assert_eq!(k, 2);
    assert_no_smaller_solution(&s, &outcome.deadlocked_processes, k);
    for suggestion in &suggestions {
        assert!(matrix::can_recover(&s, &suggestion.processes).recoverable);
    }
}

#[test]
fn advisor_output_is_deterministic() {
    let s = state(&[3], &[1], &[&[1], &[1]], &[&[2], &[2]]);
    let first = suggest_recovery(&s, Detector::Matrix);
    let second = suggest_recovery(&s, Detector::Matrix);
    assert_eq!(first, second);
}

#[test]
fn advisor_includes_preemption_alternatives() {
    let s = state(
        &[1, 1],
        &[0, 0],
        &[&[1, 0], &[0, 1]],
        &[&[0, 1], &[1, 0]],
    );
    let suggestions = suggest_recovery(&s, Detector::Matrix);
    assert!(suggestions
        .iter()
        .any(|sug| sug.kind == SuggestionKind::Preempt));
    assert!(suggestions
        .iter()
        .any(|sug| sug.kind == SuggestionKind::Terminate));
}
