//! The advisor's output record.

use gridlock_types::{ProcessId, ResourceId};
use std::collections::BTreeSet;
use std::fmt;

/// What kind of action a suggestion proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Terminate the listed processes, releasing their allocations.
    Terminate,
    /// Preempt resources from a process (requires rollback).
    Preempt,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionKind::Terminate => write!(f, "terminate"),
            SuggestionKind::Preempt => write!(f, "preempt"),
        }
    }
}

/// A single recovery action proposed by the advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Terminate or preempt.
    pub kind: SuggestionKind,
    /// The processes the action applies to.
    pub processes: BTreeSet<ProcessId>,
    /// Resources involved (preemption only).
    pub resources: Option<BTreeSet<ResourceId>>,
    /// One-line summary for lists and menus.
    pub description: String,
    /// Full explanation, including the recovery-check trace for
    /// termination suggestions.
    pub explanation: String,
}

impl Suggestion {
    /// Build a termination suggestion from a verified subset and the
    /// trace of its recovery check.
    pub(crate) fn terminate(processes: BTreeSet<ProcessId>, check_trace: &[String]) -> Self {
        let names: Vec<String> = processes.iter().map(ProcessId::to_string).collect();
        let names = names.join(", ");

        let mut explanation = format!(
            "Terminating {names} releases their allocated resources.\nAfter termination:\n"
        );
        explanation.push_str(&check_trace.join("\n"));

        Self {
            kind: SuggestionKind::Terminate,
            description: format!(
                "Terminate {} process(es): {names}",
                processes.len()
            ),
            processes,
            resources: None,
            explanation,
        }
    }

    /// Build a preemption suggestion for one process and the resources
    /// it holds.
    pub(crate) fn preempt(process: ProcessId, held: &[(ResourceId, u32)]) -> Self {
        let held_desc: Vec<String> = held
            .iter()
            .map(|(rid, count)| format!("{count}x{rid}"))
            .collect();
        let held_desc = held_desc.join(", ");

        Self {
            kind: SuggestionKind::Preempt,
            processes: [process].into_iter().collect(),
            resources: Some(held.iter().map(|(rid, _)| *rid).collect()),
            description: format!("Preempt resources from {process}: {held_desc}"),
            explanation: format!(
                "Preempt resources from {process}: {held_desc}\n\
                 These instances can be reallocated to other waiting processes.\n\
                 Note: {process} must be rolled back and restarted later."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_description() {
        let s = Suggestion::terminate(
            [ProcessId::new(0), ProcessId::new(2)].into_iter().collect(),
            &["Checking recovery".to_string()],
        );
        assert_eq!(s.description, "Terminate 2 process(es): P0, P2");
        assert!(s.explanation.contains("Checking recovery"));
        assert!(s.resources.is_none());
    }

    #[test]
    fn test_preempt_description() {
        let s = Suggestion::preempt(
            ProcessId::new(1),
            &[(ResourceId::new(0), 2), (ResourceId::new(3), 1)],
        );
        assert_eq!(s.description, "Preempt resources from P1: 2xR0, 1xR3");
        assert_eq!(
            s.resources,
            Some([ResourceId::new(0), ResourceId::new(3)].into_iter().collect())
        );
        assert!(s.explanation.contains("rolled back"));
    }
}
