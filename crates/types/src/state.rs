//! The validated system state snapshot.
//!
//! Follows standard OS textbook notation: n processes, m resource
//! types, an `Available[m]` vector and `Allocation[n][m]` /
//! `Request[n][m]` matrices. The invariants are checked atomically at
//! construction; a [`SystemState`] that exists is valid.

use crate::identifiers::{ProcessId, ResourceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A process in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Process identity. All lookups key on this, not on the row index.
    pub id: ProcessId,
    /// Human-readable name (e.g. "P0").
    pub name: String,
}

impl Process {
    /// Create a process with the conventional "P{id}" name.
    pub fn numbered(id: u32) -> Self {
        Self {
            id: ProcessId::new(id),
            name: format!("P{id}"),
        }
    }
}

/// A resource type with a fixed instance count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Resource identity.
    pub id: ResourceId,
    /// Human-readable name (e.g. "R0").
    pub name: String,
    /// Total instances of this resource type in the system.
    pub total_instances: u32,
}

impl ResourceType {
    /// Create a resource type with the conventional "R{id}" name.
    pub fn numbered(id: u32, total_instances: u32) -> Self {
        Self {
            id: ResourceId::new(id),
            name: format!("R{id}"),
            total_instances,
        }
    }
}

/// Everything a snapshot can be rejected for at construction.
///
/// Construction fails fast on the first violation and never yields a
/// partially valid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The available vector length does not match the resource count.
    #[error("available vector must have {expected} entries, got {got}")]
    AvailableLength {
        /// Number of resource types (m).
        expected: usize,
        /// Actual vector length.
        got: usize,
    },

    /// A matrix has the wrong number of rows.
    #[error("{matrix} matrix must have {expected} rows, got {got}")]
    MatrixRows {
        /// "allocation" or "request".
        matrix: &'static str,
        /// Number of processes (n).
        expected: usize,
        /// Actual row count.
        got: usize,
    },

    /// A matrix row has the wrong number of columns.
    #[error("{matrix}[{row}] must have {expected} columns, got {got}")]
    MatrixColumns {
        /// "allocation" or "request".
        matrix: &'static str,
        /// Offending row index.
        row: usize,
        /// Number of resource types (m).
        expected: usize,
        /// Actual column count.
        got: usize,
    },

    /// A cell holds a negative value. Only reachable through the signed
    /// surfaces (builder, snapshot file); the core matrices are unsigned.
    #[error("negative entry at {cell}: {value}")]
    NegativeEntry {
        /// Location, e.g. "allocation[1][2]" or "available[0]".
        cell: String,
        /// The offending value.
        value: i64,
    },

    /// Available plus allocated instances do not add up to the declared
    /// total for a resource type.
    #[error(
        "resource {resource}: available ({available}) + allocated ({allocated}) \
         != total instances ({total})"
    )]
    Conservation {
        /// The unbalanced resource.
        resource: ResourceId,
        /// Free instances.
        available: u32,
        /// Sum of the allocation column (wider than the cells so the
        /// sum itself can never wrap).
        allocated: u64,
        /// Declared total.
        total: u32,
    },

    /// A single request exceeds the total instances of its resource
    /// type, which could never be satisfied.
    #[error("{process} requests {requested} of {resource} but only {total} exist")]
    RequestExceedsTotal {
        /// The over-asking process.
        process: ProcessId,
        /// The requested resource.
        resource: ResourceId,
        /// Requested instance count.
        requested: u32,
        /// Declared total.
        total: u32,
    },
}

/// Immutable, validated snapshot of the resource-allocation state.
///
/// Fields are private; derived states (e.g. after a hypothetical
/// termination) are built as fresh validated instances, never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemState {
    processes: Vec<Process>,
    resource_types: Vec<ResourceType>,
    available: Vec<u32>,
    allocation: Vec<Vec<u32>>,
    request: Vec<Vec<u32>>,
}

impl SystemState {
    /// Validate and construct a snapshot.
    ///
    /// Checks, in order: dimensions of `available`, `allocation` and
    /// `request`; conservation (`available[j] + Σ allocation[i][j] ==
    /// total_instances[j]` for every resource j); and boundedness
    /// (`request[i][j] <= total_instances[j]`).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered. On error no
    /// state is produced.
    pub fn new(
        processes: Vec<Process>,
        resource_types: Vec<ResourceType>,
        available: Vec<u32>,
        allocation: Vec<Vec<u32>>,
        request: Vec<Vec<u32>>,
    ) -> Result<Self, ValidationError> {
        let n = processes.len();
        let m = resource_types.len();

        if available.len() != m {
            return Err(ValidationError::AvailableLength {
                expected: m,
                got: available.len(),
            });
        }
        for (matrix, rows) in [("allocation", &allocation), ("request", &request)] {
            if rows.len() != n {
                return Err(ValidationError::MatrixRows {
                    matrix,
                    expected: n,
                    got: rows.len(),
                });
            }
            for (row, cols) in rows.iter().enumerate() {
                if cols.len() != m {
                    return Err(ValidationError::MatrixColumns {
                        matrix,
                        row,
                        expected: m,
                        got: cols.len(),
                    });
                }
            }
        }

        for (j, rt) in resource_types.iter().enumerate() {
            // Summed in u64: n rows of u32::MAX cannot wrap, so absurd
            // column sums are reported instead of overflowing here.
            let allocated: u64 = allocation.iter().map(|row| u64::from(row[j])).sum();
            if u64::from(available[j]) + allocated != u64::from(rt.total_instances) {
                return Err(ValidationError::Conservation {
                    resource: rt.id,
                    available: available[j],
                    allocated,
                    total: rt.total_instances,
                });
            }
        }

        for (i, row) in request.iter().enumerate() {
            for (j, rt) in resource_types.iter().enumerate() {
                if row[j] > rt.total_instances {
                    return Err(ValidationError::RequestExceedsTotal {
                        process: processes[i].id,
                        resource: rt.id,
                        requested: row[j],
                        total: rt.total_instances,
                    });
                }
            }
        }

        Ok(Self {
            processes,
            resource_types,
            available,
            allocation,
            request,
        })
    }

    /// Number of processes (n).
    pub fn n(&self) -> usize {
        self.processes.len()
    }

    /// Number of resource types (m).
    pub fn m(&self) -> usize {
        self.resource_types.len()
    }

    /// The processes, in row order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// The resource types, in column order.
    pub fn resource_types(&self) -> &[ResourceType] {
        &self.resource_types
    }

    /// The `Available[m]` vector.
    pub fn available(&self) -> &[u32] {
        &self.available
    }

    /// The `Allocation[n][m]` matrix.
    pub fn allocation(&self) -> &[Vec<u32>] {
        &self.allocation
    }

    /// The `Request[n][m]` matrix.
    pub fn request(&self) -> &[Vec<u32>] {
        &self.request
    }

    /// The allocation row for the process at row index `i`.
    pub fn allocation_row(&self, i: usize) -> &[u32] {
        &self.allocation[i]
    }

    /// The request row for the process at row index `i`.
    pub fn request_row(&self, i: usize) -> &[u32] {
        &self.request[i]
    }

    /// The id of the process at row index `i`.
    pub fn process_id(&self, i: usize) -> ProcessId {
        self.processes[i].id
    }

    /// Iterate over process ids in row order.
    pub fn process_ids(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.processes.iter().map(|p| p.id)
    }

    /// Row index of a process id, if it is present in this snapshot.
    pub fn row_of(&self, id: ProcessId) -> Option<usize> {
        self.processes.iter().position(|p| p.id == id)
    }

    /// True iff every resource type has exactly one instance.
    ///
    /// Gates which detector is semantically valid: wait-for graph cycle
    /// detection is only a sound deadlock test for single-instance
    /// states.
    pub fn is_single_instance(&self) -> bool {
        self.resource_types.iter().all(|rt| rt.total_instances == 1)
    }
}
