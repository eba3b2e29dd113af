//! Versioned JSON schema for system-state snapshots.

use gridlock_types::{Process, ProcessId, ResourceId, ResourceType, SystemState, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Schema version written to every snapshot. Bump on incompatible
/// layout changes.
pub const SCHEMA_VERSION: &str = "1.0";

/// Errors from the snapshot/sample layer.
///
/// Distinct from [`ValidationError`]: these cover the document and its
/// transport, while a structurally fine document with bad numbers
/// fails as [`SnapshotError::Invalid`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the file failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not the JSON we expect.
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no schema_version field.
    #[error("snapshot is missing schema_version")]
    MissingSchemaVersion,

    /// The document declares a version this build cannot read.
    #[error("unsupported schema_version {found:?} (expected {SCHEMA_VERSION:?})")]
    UnsupportedSchemaVersion {
        /// Version string found in the document.
        found: String,
    },

    /// The document parsed but the state inside it is invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No built-in sample has the requested name.
    #[error("unknown sample {name:?}; available: {available:?}")]
    UnknownSample {
        /// The requested name.
        name: String,
        /// All registered sample names.
        available: Vec<&'static str>,
    },
}

/// A process entry in the persisted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDoc {
    /// Process id.
    pub pid: u32,
    /// Display name.
    pub name: String,
}

/// A resource-type entry in the persisted form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTypeDoc {
    /// Resource id.
    pub rid: u32,
    /// Display name.
    pub name: String,
    /// Total instances in the system.
    pub instances: u32,
}

/// The persisted exchange form of a system state.
///
/// Integer cells are signed so that malformed hand-edited files reach
/// the state validator (and its specific error) instead of dying in
/// serde with a type error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Layout version, currently [`SCHEMA_VERSION`].
    pub schema_version: String,
    /// Processes, in row order.
    pub processes: Vec<ProcessDoc>,
    /// Resource types, in column order.
    pub resource_types: Vec<ResourceTypeDoc>,
    /// The available vector.
    pub available: Vec<i64>,
    /// The allocation matrix.
    pub allocation: Vec<Vec<i64>>,
    /// The request matrix.
    pub request: Vec<Vec<i64>>,
}

/// Convert a validated state into its persisted form.
pub fn to_snapshot(state: &SystemState) -> Snapshot {
    Snapshot {
        schema_version: SCHEMA_VERSION.to_string(),
        processes: state
            .processes()
            .iter()
            .map(|p| ProcessDoc {
                pid: p.id.as_u32(),
                name: p.name.clone(),
            })
            .collect(),
        resource_types: state
            .resource_types()
            .iter()
            .map(|rt| ResourceTypeDoc {
                rid: rt.id.as_u32(),
                name: rt.name.clone(),
                instances: rt.total_instances,
            })
            .collect(),
        available: state.available().iter().map(|&v| i64::from(v)).collect(),
        allocation: sign_matrix(state.allocation()),
        request: sign_matrix(state.request()),
    }
}

/// Validate a persisted document into a state.
///
/// # Errors
///
/// Version mismatches surface as snapshot errors; bad dimensions or
/// numbers surface as the validator's own [`ValidationError`], wrapped.
pub fn from_snapshot(snapshot: Snapshot) -> Result<SystemState, SnapshotError> {
    if snapshot.schema_version.is_empty() {
        return Err(SnapshotError::MissingSchemaVersion);
    }
    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(SnapshotError::UnsupportedSchemaVersion {
            found: snapshot.schema_version,
        });
    }

    let processes = snapshot
        .processes
        .into_iter()
        .map(|p| Process {
            id: ProcessId::new(p.pid),
            name: p.name,
        })
        .collect();
    let resource_types = snapshot
        .resource_types
        .into_iter()
        .map(|rt| ResourceType {
            id: ResourceId::new(rt.rid),
            name: rt.name,
            total_instances: rt.instances,
        })
        .collect();

    let available = unsign_vector("available", &snapshot.available)?;
    let allocation = unsign_matrix("allocation", &snapshot.allocation)?;
    let request = unsign_matrix("request", &snapshot.request)?;

    let state = SystemState::new(processes, resource_types, available, allocation, request)?;
    Ok(state)
}

/// Write a state to `path` as pretty-printed JSON.
pub fn save(state: &SystemState, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&to_snapshot(state))?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Read and validate a state from a JSON snapshot file.
pub fn load(path: impl AsRef<Path>) -> Result<SystemState, SnapshotError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;

    // Surface a missing version as our error, not serde's generic
    // "missing field" message. Non-object documents are not "missing
    // a version", they are malformed; let the typed parse say so.
    let value: serde_json::Value = serde_json::from_str(&json)?;
    if value.is_object() && value.get("schema_version").is_none() {
        return Err(SnapshotError::MissingSchemaVersion);
    }

    let snapshot: Snapshot = serde_json::from_value(value)?;
    let state = from_snapshot(snapshot)?;
    debug!(path = %path.display(), n = state.n(), m = state.m(), "snapshot loaded");
    Ok(state)
}

fn sign_matrix(rows: &[Vec<u32>]) -> Vec<Vec<i64>> {
    rows.iter()
        .map(|row| row.iter().map(|&v| i64::from(v)).collect())
        .collect()
}

fn unsign_vector(name: &str, values: &[i64]) -> Result<Vec<u32>, ValidationError> {
    values
        .iter()
        .enumerate()
        .map(|(j, &v)| {
            u32::try_from(v).map_err(|_| ValidationError::NegativeEntry {
                cell: format!("{name}[{j}]"),
                value: v,
            })
        })
        .collect()
}

fn unsign_matrix(name: &str, rows: &[Vec<i64>]) -> Result<Vec<Vec<u32>>, ValidationError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &v)| {
                    u32::try_from(v).map_err(|_| ValidationError::NegativeEntry {
                        cell: format!("{name}[{i}][{j}]"),
                        value: v,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::load_sample;

    #[test]
    fn test_round_trip_preserves_everything() {
        let state = load_sample("multi-instance-safe").unwrap();
        let snapshot = to_snapshot(&state);
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);

        let back = from_snapshot(snapshot).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let state = load_sample("empty-template").unwrap();
        let mut snapshot = to_snapshot(&state);
        snapshot.schema_version = "9.9".to_string();

        let err = from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedSchemaVersion { found } if found == "9.9"
        ));
    }

    #[test]
    fn test_negative_cell_surfaces_as_validation_error() {
        let state = load_sample("empty-template").unwrap();
        let mut snapshot = to_snapshot(&state);
        snapshot.allocation[1][2] = -4;

        let err = from_snapshot(snapshot).unwrap_err();
        match err {
            SnapshotError::Invalid(ValidationError::NegativeEntry { cell, value }) => {
                assert_eq!(cell, "allocation[1][2]");
                assert_eq!(value, -4);
            }
            other => panic!("expected NegativeEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_conservation_violation_surfaces_through_snapshot() {
        let state = load_sample("single-instance-deadlock").unwrap();
        let mut snapshot = to_snapshot(&state);
        snapshot.available[0] = 5; // breaks conservation

        let err = from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Invalid(ValidationError::Conservation { .. })
        ));
    }

    #[test]
    fn test_wire_format_keys_are_stable() {
        // The original tooling reads these exact snake_case keys; a
        // rename here is a format break.
        let state = load_sample("single-instance-deadlock").unwrap();
        let json = serde_json::to_value(to_snapshot(&state)).unwrap();

        assert!(json.get("schema_version").is_some());
        assert!(json.get("processes").is_some());
        assert!(json.get("resource_types").is_some());
        assert_eq!(json["processes"][0]["pid"], 0);
        assert_eq!(json["resource_types"][0]["instances"], 1);
        assert_eq!(json["available"][0], 0);
    }
}
