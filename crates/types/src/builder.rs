//! Unvalidated, form-like state editing.
//!
//! UI-style collaborators edit cells one at a time and only get a
//! [`SystemState`] out of an explicit [`StateBuilder::build`] call. The
//! core never accepts partially edited data: invariants are checked at
//! the finalize step, not while editing.

use crate::state::{Process, ResourceType, SystemState, ValidationError};

/// Mutable draft of a system state.
///
/// Cells are signed so that a draft can hold whatever a form or a
/// hand-edited file contains; negative values are rejected at
/// [`build`](StateBuilder::build) as
/// [`ValidationError::NegativeEntry`].
#[derive(Debug, Clone, Default)]
pub struct StateBuilder {
    processes: Vec<Process>,
    resource_types: Vec<ResourceType>,
    available: Vec<i64>,
    allocation: Vec<Vec<i64>>,
    request: Vec<Vec<i64>>,
}

impl StateBuilder {
    /// Empty draft with no processes or resource types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-instance empty template: n numbered processes, m numbered
    /// resource types with one instance each, everything free and
    /// nothing requested.
    pub fn with_dimensions(num_processes: u32, num_resources: u32) -> Self {
        let mut builder = Self::new();
        for i in 0..num_processes {
            builder.push_process(Process::numbered(i));
        }
        for j in 0..num_resources {
            builder.push_resource(ResourceType::numbered(j, 1));
        }
        builder
    }

    /// Append a process row (allocation and request rows grow with it).
    pub fn push_process(&mut self, process: Process) -> &mut Self {
        self.processes.push(process);
        self.allocation.push(vec![0; self.resource_types.len()]);
        self.request.push(vec![0; self.resource_types.len()]);
        self
    }

    /// Append a resource column. The new column starts fully available.
    pub fn push_resource(&mut self, resource: ResourceType) -> &mut Self {
        self.available.push(i64::from(resource.total_instances));
        self.resource_types.push(resource);
        for row in &mut self.allocation {
            row.push(0);
        }
        for row in &mut self.request {
            row.push(0);
        }
        self
    }

    /// Overwrite the declared total for resource column `j`.
    pub fn set_total_instances(&mut self, j: usize, total: u32) -> &mut Self {
        self.resource_types[j].total_instances = total;
        self
    }

    /// Overwrite one entry of the available vector.
    pub fn set_available(&mut self, j: usize, value: i64) -> &mut Self {
        self.available[j] = value;
        self
    }

    /// Overwrite one allocation cell.
    pub fn set_allocation(&mut self, i: usize, j: usize, value: i64) -> &mut Self {
        self.allocation[i][j] = value;
        self
    }

    /// Overwrite one request cell.
    pub fn set_request(&mut self, i: usize, j: usize, value: i64) -> &mut Self {
        self.request[i][j] = value;
        self
    }

    /// Replace the whole available vector.
    pub fn available(&mut self, available: Vec<i64>) -> &mut Self {
        self.available = available;
        self
    }

    /// Replace the whole allocation matrix.
    pub fn allocation(&mut self, allocation: Vec<Vec<i64>>) -> &mut Self {
        self.allocation = allocation;
        self
    }

    /// Replace the whole request matrix.
    pub fn request(&mut self, request: Vec<Vec<i64>>) -> &mut Self {
        self.request = request;
        self
    }

    /// Finalize: reject negatives, then run full [`SystemState::new`]
    /// validation. The draft is left untouched and can be fixed up and
    /// rebuilt after an error.
    pub fn build(&self) -> Result<SystemState, ValidationError> {
        let available = unsign_vector("available", &self.available)?;
        let allocation = unsign_matrix("allocation", &self.allocation)?;
        let request = unsign_matrix("request", &self.request)?;

        SystemState::new(
            self.processes.clone(),
            self.resource_types.clone(),
            available,
            allocation,
            request,
        )
    }
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
