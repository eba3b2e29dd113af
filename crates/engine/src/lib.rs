//! Deadlock detection engine.
//!
//! Two independent detectors over a validated
//! [`SystemState`](gridlock_types::SystemState):
//!
//! - [`matrix`]: the Work/Finish safety algorithm. Correct for any
//!   instance count per resource type, and the oracle behind recovery
//!   checks.
//! - [`wfg`]: wait-for graph construction and cycle extraction. A
//!   sound deadlock test only when every resource type has exactly one
//!   instance; on multi-instance states it still runs but reports a
//!   *possible* deadlock and says so in its trace.
//!
//! Both detectors are pure, synchronous, and total over valid states:
//! the same input always yields the same outcome, execution order, and
//! trace. There is no clock, randomness, or shared mutable state
//! anywhere in this crate. Every outcome carries a `trace`, an
//! ordered list of human-readable steps suitable for direct display.

pub mod matrix;
pub mod wfg;

mod vector;

pub use matrix::{MatrixOutcome, RecoveryCheck};
pub use wfg::{Cycle, WaitForEdge, WfgOutcome};
