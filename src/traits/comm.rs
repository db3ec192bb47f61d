//! Communication between ranks
#[cfg(feature = "mpi")]
use mpi::traits::Equivalence;

#[cfg(feature = "mpi")]
/// A value that can be exchanged between ranks
pub trait CommScalar: Copy + Default + Send + 'static + Equivalence {}
#[cfg(not(feature = "mpi"))]
/// A value that can be exchanged between ranks
pub trait CommScalar: Copy + Default + Send + 'static {}

impl CommScalar for f64 {}
impl CommScalar for i64 {}
impl CommScalar for usize {}

/// The collective operations used by a computational domain.
///
/// Every rank must call the same operations in the same order.
pub trait DomainComm {
    /// The rank of this process
    fn rank(&self) -> usize;

    /// The number of ranks
    fn size(&self) -> usize;

    /// Personalised exchange: `send[p]` is delivered to rank `p`.
    ///
    /// Entry `p` of the result holds the values rank `p` sent to this rank.
    fn exchange<T: CommScalar>(&self, send: &[Vec<T>]) -> Vec<Vec<T>>;

    /// Gather one value per rank on rank 0 and broadcast the result to all ranks
    fn gather_broadcast(&self, value: usize) -> Vec<usize>;

    /// The maximum of a value over all ranks
    fn all_reduce_max(&self, value: i64) -> i64;
}
