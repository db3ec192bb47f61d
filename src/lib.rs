//! Basin DOF
//!
//! Distributed computational domains over a stratigraphic column: active
//! elements and nodes at a given age, degenerate segment handling, global
//! DOF numbering across ranks and sparsity counts for the system matrix.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod activity;
pub mod column;
pub mod comm;
pub mod domain;
pub mod grid;
pub mod sparsity;
pub mod traits;
pub mod types;
