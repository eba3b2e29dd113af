//! Built-in sample datasets.
//!
//! Small, hand-checked states for demonstrations and for exercising
//! both detectors. Names are stable; the CLI's `validate-samples`
//! command asserts the expected verdict of each.

use crate::schema::SnapshotError;
use gridlock_types::{Process, ResourceType, StateBuilder, SystemState};

struct Sample {
    name: &'static str,
    build: fn() -> SystemState,
    /// Expected matrix-detector verdict, pinned by the CLI validator.
    deadlocked: bool,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "single-instance-deadlock",
        build: single_instance_deadlock,
        deadlocked: true,
    },
    Sample {
        name: "single-instance-safe",
        build: single_instance_safe,
        deadlocked: false,
    },
    Sample {
        name: "multi-instance-deadlock",
        build: multi_instance_deadlock,
        deadlocked: true,
    },
    Sample {
        name: "multi-instance-safe",
        build: multi_instance_safe,
        deadlocked: false,
    },
    Sample {
        name: "empty-template",
        build: empty_template,
        deadlocked: false,
    },
];

/// Names of all built-in samples, in registry order.
pub fn sample_names() -> Vec<&'static str> {
    SAMPLES.iter().map(|s| s.name).collect()
}

/// Build a sample by name.
///
/// # Errors
///
/// [`SnapshotError::UnknownSample`] when no sample has that name. This
/// is a lookup error, distinguishable from state validation.
pub fn load_sample(name: &str) -> Result<SystemState, SnapshotError> {
    SAMPLES
        .iter()
        .find(|s| s.name == name)
        .map(|s| (s.build)())
        .ok_or_else(|| SnapshotError::UnknownSample {
            name: name.to_string(),
            available: sample_names(),
        })
}

/// Expected matrix verdict for a sample, for validation tooling.
pub fn expected_deadlock(name: &str) -> Option<bool> {
    SAMPLES.iter().find(|s| s.name == name).map(|s| s.deadlocked)
}

fn finalized(builder: &StateBuilder) -> SystemState {
    builder.build().expect("built-in samples are valid")
}

/// Classic circular wait: P0 holds R0 wants R1, P1 holds R1 wants R2,
/// P2 holds R2 wants R0.
fn single_instance_deadlock() -> SystemState {
    let mut b = StateBuilder::with_dimensions(3, 3);
    b.available(vec![0, 0, 0])
        .allocation(vec![
            vec![1, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
        ])
        .request(vec![
            vec![0, 1, 0],
            vec![0, 0, 1],
            vec![1, 0, 0],
        ]);
    finalized(&b)
}

/// Same allocations, but P1 and P2 want nothing: they finish, then P0
/// gets R1.
fn single_instance_safe() -> SystemState {
    let mut b = StateBuilder::with_dimensions(3, 3);
    b.available(vec![0, 0, 0])
        .allocation(vec![
            vec![1, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
        ])
        .request(vec![
            vec![0, 1, 0],
            vec![0, 0, 0],
            vec![0, 0, 0],
        ]);
    finalized(&b)
}

/// Two instances of each resource, fully allocated, every process
/// waiting on instances nobody will release.
fn multi_instance_deadlock() -> SystemState {
    let mut b = StateBuilder::new();
    for i in 0..3 {
        b.push_process(Process::numbered(i));
    }
    for j in 0..3 {
        b.push_resource(ResourceType::numbered(j, 2));
    }
    b.available(vec![0, 0, 0])
        .allocation(vec![
            vec![1, 0, 1],
            vec![1, 1, 0],
            vec![0, 1, 1],
        ])
        .request(vec![
            vec![1, 1, 0],
            vec![0, 1, 1],
            vec![1, 0, 1],
        ]);
    finalized(&b)
}

/// The Banker's-algorithm safe state: five processes, pool [10, 5, 7].
fn multi_instance_safe() -> SystemState {
    let mut b = StateBuilder::new();
    for i in 0..5 {
        b.push_process(Process::numbered(i));
    }
    b.push_resource(ResourceType::numbered(0, 10));
    b.push_resource(ResourceType::numbered(1, 5));
    b.push_resource(ResourceType::numbered(2, 7));
    b.available(vec![3, 3, 2])
        .allocation(vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ])
        .request(vec![
            vec![0, 0, 0],
            vec![1, 0, 2],
            vec![0, 0, 0],
            vec![1, 0, 0],
            vec![0, 0, 2],
        ]);
    finalized(&b)
}

/// Blank 3×3 single-instance template: everything free, nothing asked.
fn empty_template() -> SystemState {
    finalized(&StateBuilder::with_dimensions(3, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_builds() {
        for name in sample_names() {
            let state = load_sample(name).unwrap();
            assert!(state.n() > 0, "sample {name} should have processes");
        }
    }

    #[test]
    fn test_unknown_sample_is_a_lookup_error() {
        let err = load_sample("does-not-exist").unwrap_err();
        match err {
            SnapshotError::UnknownSample { name, available } => {
                assert_eq!(name, "does-not-exist");
                assert!(available.contains(&"empty-template"));
            }
            other => panic!("expected UnknownSample, got {other:?}"),
        }
    }

    #[test]
    fn test_single_instance_flags() {
        assert!(load_sample("single-instance-deadlock")
            .unwrap()
            .is_single_instance());
        assert!(!load_sample("multi-instance-safe")
            .unwrap()
            .is_single_instance());
    }

    #[test]
    fn test_expected_verdicts_are_registered() {
        assert_eq!(expected_deadlock("single-instance-deadlock"), Some(true));
        assert_eq!(expected_deadlock("multi-instance-safe"), Some(false));
        assert_eq!(expected_deadlock("nope"), None);
    }
}
