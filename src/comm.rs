//! Communicators

#[cfg(feature = "mpi")]
mod parallel;
mod serial;
mod threaded;

#[cfg(feature = "mpi")]
pub use parallel::MpiComm;
pub use serial::SerialComm;
pub use threaded::ThreadComm;
