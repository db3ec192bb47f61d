//! Ranks running as threads of one process
use crate::traits::{CommScalar, DomainComm};
use crossbeam_channel::{unbounded, Receiver, Sender};
use itertools::izip;
use std::any::Any;

type Message = Box<dyn Any + Send>;

/// A communicator whose ranks are threads of the current process.
///
/// Every ordered pair of ranks is connected by an unbounded channel, so
/// messages between two ranks arrive in the order they were sent and sends
/// never block.
pub struct ThreadComm {
    rank: usize,
    senders: Vec<Sender<Message>>,
    receivers: Vec<Receiver<Message>>,
}

impl ThreadComm {
    /// Create the communicators of `size` ranks; entry `r` belongs to rank `r`
    pub fn create(size: usize) -> Vec<ThreadComm> {
        let mut senders = (0..size)
            .map(|_| Vec::with_capacity(size))
            .collect::<Vec<_>>();
        let mut receivers = (0..size)
            .map(|_| Vec::with_capacity(size))
            .collect::<Vec<_>>();
        for from in senders.iter_mut() {
            for to in receivers.iter_mut() {
                let (s, r) = unbounded::<Message>();
                from.push(s);
                to.push(r);
            }
        }
        izip!(senders, receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| ThreadComm {
                rank,
                senders,
                receivers,
            })
            .collect()
    }

    /// Run `f` on `size` ranks, each in its own thread, and collect the
    /// results in rank order
    pub fn run<R, F>(size: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(ThreadComm) -> R + Sync,
    {
        let f = &f;
        std::thread::scope(|scope| {
            let handles = Self::create(size)
                .into_iter()
                .map(|comm| scope.spawn(move || f(comm)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(e) => std::panic::resume_unwind(e),
                })
                .collect()
        })
    }

    fn send<T: Send + 'static>(&self, to: usize, values: Vec<T>) {
        if self.senders[to].send(Box::new(values)).is_err() {
            panic!("Rank {to} has left the communicator.");
        }
    }

    fn receive<T: 'static>(&self, from: usize) -> Vec<T> {
        let message = match self.receivers[from].recv() {
            Ok(message) => message,
            Err(_) => panic!("Rank {from} has left the communicator."),
        };
        match message.downcast::<Vec<T>>() {
            Ok(values) => *values,
            Err(_) => panic!("Mismatched collective: unexpected message from rank {from}."),
        }
    }
}

impl DomainComm for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn exchange<T: CommScalar>(&self, send: &[Vec<T>]) -> Vec<Vec<T>> {
        assert_eq!(send.len(), self.size());
        for (p, values) in send.iter().enumerate() {
            if p != self.rank {
                self.send(p, values.clone());
            }
        }
        (0..self.size())
            .map(|p| {
                if p == self.rank {
                    send[p].clone()
                } else {
                    self.receive(p)
                }
            })
            .collect()
    }

    fn gather_broadcast(&self, value: usize) -> Vec<usize> {
        if self.rank == 0 {
            let mut values = vec![value];
            for p in 1..self.size() {
                values.extend(self.receive::<usize>(p));
            }
            for p in 1..self.size() {
                self.send(p, values.clone());
            }
            values
        } else {
            self.send(0, vec![value]);
            self.receive(0)
        }
    }

    fn all_reduce_max(&self, value: i64) -> i64 {
        if self.rank == 0 {
            let mut max = value;
            for p in 1..self.size() {
                max = self.receive::<i64>(p).into_iter().fold(max, i64::max);
            }
            for p in 1..self.size() {
                self.send(p, vec![max]);
            }
            max
        } else {
            self.send(0, vec![value]);
            self.receive::<i64>(0)[0]
        }
    }
}
