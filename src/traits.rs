//! Trait definitions

mod activity;
mod comm;
mod formation;

pub use activity::ElementActivityPredicate;
pub use comm::{CommScalar, DomainComm};
pub use formation::Formation;
