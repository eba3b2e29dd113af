//! Identifier newtypes.
//!
//! Raw integers are easy to mix up when a function takes both a process
//! and a resource index; the newtypes make the signatures self-checking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a process. Ids are dense `0..n-1` by construction
/// convention in all built-in samples; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Create a new process id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Get the id as a row/column index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<u32> for ProcessId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifies a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Create a new resource id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Get the id as a row/column index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_follows_textbook_notation() {
        assert_eq!(ProcessId::new(3).to_string(), "P3");
        assert_eq!(ResourceId::new(0).to_string(), "R0");
    }

    #[test]
    fn test_ids_are_ordered() {
        assert!(ProcessId::new(1) < ProcessId::new(2));
        assert!(ResourceId::new(0) < ResourceId::new(7));
    }
}
