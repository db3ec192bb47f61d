//! Single rank communicator
use crate::traits::{CommScalar, DomainComm};

/// A communicator with a single rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl SerialComm {
    /// Create a communicator
    pub fn new() -> Self {
        Self
    }
}

impl DomainComm for SerialComm {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn exchange<T: CommScalar>(&self, send: &[Vec<T>]) -> Vec<Vec<T>> {
        send.to_vec()
    }
    fn gather_broadcast(&self, value: usize) -> Vec<usize> {
        vec![value]
    }
    fn all_reduce_max(&self, value: i64) -> i64 {
        value
    }
}
