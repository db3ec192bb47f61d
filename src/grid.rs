//! Lateral partition, element grids and distributed arrays

mod array;
mod element;
mod formation_grid;
mod ghosted_vector;
mod lateral;

pub use array::Array3;
pub use element::GeneralElement;
pub use formation_grid::FormationElementGrid;
pub use ghosted_vector::GhostedVector;
pub use lateral::{LateralBox, LateralGrid};
