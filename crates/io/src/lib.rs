//! Snapshot persistence and sample datasets.
//!
//! The persisted form is a versioned JSON document with snake_case
//! keys, round-tripping losslessly through [`Snapshot`]. Deserializing
//! never yields a [`SystemState`](gridlock_types::SystemState)
//! directly: ingestion goes through [`from_snapshot`], which funnels
//! everything into `SystemState::new` so a hand-edited file surfaces
//! exactly the same validation errors as any other loader.
//!
//! Lookup and I/O failures ([`SnapshotError::Io`],
//! [`SnapshotError::UnknownSample`], ...) are a separate error class
//! from state validation, which arrives wrapped as
//! [`SnapshotError::Invalid`].

mod samples;
mod schema;

pub use samples::{expected_deadlock, load_sample, sample_names};
pub use schema::{
    from_snapshot, load, save, to_snapshot, Snapshot, SnapshotError, SCHEMA_VERSION,
};
