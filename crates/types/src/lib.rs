//! Core types for gridlock deadlock analysis.
//!
//! This crate provides the foundational data model consumed by every
//! other workspace crate:
//!
//! - **Identifiers**: [`ProcessId`], [`ResourceId`]
//! - **State model**: [`Process`], [`ResourceType`], [`SystemState`]
//! - **Construction**: [`StateBuilder`] for form-like editing, with
//!   validation deferred to a single `build()` call
//! - **Errors**: [`ValidationError`] for everything a malformed state
//!   can be rejected for
//!
//! # Design Philosophy
//!
//! This crate is self-contained with minimal dependencies. It does not
//! depend on any other workspace crates, making it the foundation layer.
//!
//! A [`SystemState`] is an immutable, validated snapshot. Construction
//! is the ingestion boundary: every loader (CLI, snapshot file, test
//! fixture) goes through [`SystemState::new`] or [`StateBuilder::build`]
//! and surfaces the same error set. There is no way to obtain a
//! partially valid state.

mod builder;
mod identifiers;
mod state;

pub use builder::StateBuilder;
pub use identifiers::{ProcessId, ResourceId};
pub use state::{Process, ResourceType, SystemState, ValidationError};
