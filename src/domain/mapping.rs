//! Local to global index mapping
use std::ops::Range;

/// Maps the local indices of the DOFs owned by a rank to global DOF numbers.
///
/// Each rank owns a contiguous range of global DOF numbers, so the mapping
/// is a shift by the first DOF of the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalToGlobalMapping {
    start: usize,
    len: usize,
}

impl LocalToGlobalMapping {
    /// Create the mapping of `len` DOFs starting at global DOF `start`
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// The first global DOF
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of local DOFs
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The global DOF numbers, in local order
    pub fn indices(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Global DOF number of a local index
    pub fn global(&self, local: usize) -> Option<usize> {
        if local < self.len {
            Some(self.start + local)
        } else {
            None
        }
    }

    /// Local index of a global DOF number, if it is owned
    pub fn local(&self, global: usize) -> Option<usize> {
        if self.indices().contains(&global) {
            Some(global - self.start)
        } else {
            None
        }
    }
}
