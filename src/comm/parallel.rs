//! MPI communicator
use crate::traits::{CommScalar, DomainComm};
use mpi::{
    collective::SystemOperation,
    request::WaitGuard,
    traits::{Communicator, CommunicatorCollectives, Destination, Root, Source},
};

/// A communicator backed by MPI.
pub struct MpiComm<'a, C: Communicator> {
    comm: &'a C,
}

impl<'a, C: Communicator> MpiComm<'a, C> {
    /// Wrap an MPI communicator
    pub fn new(comm: &'a C) -> Self {
        Self { comm }
    }

    /// The underlying MPI communicator
    pub fn comm(&self) -> &'a C {
        self.comm
    }
}

impl<'a, C: Communicator> DomainComm for MpiComm<'a, C> {
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn exchange<T: CommScalar>(&self, send: &[Vec<T>]) -> Vec<Vec<T>> {
        let rank = self.rank();
        let mut received = vec![vec![]; self.size()];
        received[rank] = send[rank].clone();
        mpi::request::scope(|scope| {
            let _guards = send
                .iter()
                .enumerate()
                .filter(|(p, _)| *p != rank)
                .map(|(p, values)| {
                    WaitGuard::from(
                        self.comm
                            .process_at_rank(p as i32)
                            .immediate_send(scope, &values[..]),
                    )
                })
                .collect::<Vec<_>>();
            for (p, values) in received.iter_mut().enumerate() {
                if p != rank {
                    let (v, _status) = self.comm.process_at_rank(p as i32).receive_vec::<T>();
                    *values = v;
                }
            }
        });
        received
    }

    fn gather_broadcast(&self, value: usize) -> Vec<usize> {
        let root = self.comm.process_at_rank(0);
        let mut values = vec![0; self.size()];
        if self.rank() == 0 {
            root.gather_into_root(&value, &mut values[..]);
        } else {
            root.gather_into(&value);
        }
        root.broadcast_into(&mut values[..]);
        values
    }

    fn all_reduce_max(&self, value: i64) -> i64 {
        let mut max = 0;
        self.comm
            .all_reduce_into(&value, &mut max, SystemOperation::max());
        max
    }
}
