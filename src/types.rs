//! Types specific to basin-dof

use std::fmt;
use std::str::FromStr;

/// The DOF number of a node that is not part of the computational domain.
///
/// Negative so that it can never collide with a real DOF number.
pub const NULL_DOF_NUMBER: i64 = -9999;

/// Segments no thicker than this are degenerate.
pub const DEPOSITING_THICKNESS_TOLERANCE: f64 = 0.001;

/// Number of nodes of a hexahedral element.
pub const NODES_PER_ELEMENT: usize = 8;

/// Errors raised while setting up a computational domain.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The name of a DOF ordering was not recognised
    #[error("Unknown DOF ordering: {0}")]
    UnknownDofOrdering(String),
    /// The lateral partition and the communicator disagree on the number of ranks
    #[error("Lateral partition has {grid} ranks but the communicator has {comm}")]
    PartitionMismatch {
        /// Number of ranks in the lateral partition
        grid: usize,
        /// Number of ranks in the communicator
        comm: usize,
    },
    /// The lateral partition could not be built
    #[error("Invalid lateral partition: {0}")]
    InvalidPartition(String),
}

/// The kind of a layer in the stratigraphic column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A sedimentary layer
    Sediment,
    /// The crust
    Crust,
    /// The mantle; segments have no deposition history
    Mantle,
}

/// The order in which active nodes receive ascending DOF numbers.
///
/// The ordering only changes the bandwidth of the system matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DofOrdering {
    /// `i` outermost, `k` innermost
    Ijk,
    /// `k` outermost, `j` innermost
    Kij,
    /// `k` outermost, `i` innermost
    #[default]
    Kji,
}

impl DofOrdering {
    /// All orderings
    pub const ALL: [DofOrdering; 3] = [DofOrdering::Ijk, DofOrdering::Kij, DofOrdering::Kji];
}

impl fmt::Display for DofOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DofOrdering::Ijk => "ijk",
            DofOrdering::Kij => "kij",
            DofOrdering::Kji => "kji",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DofOrdering {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ijk" => Ok(DofOrdering::Ijk),
            "kij" => Ok(DofOrdering::Kij),
            "kji" => Ok(DofOrdering::Kji),
            _ => Err(DomainError::UnknownDofOrdering(s.to_string())),
        }
    }
}

/// A vertical face of a hexahedral element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// The top face
    Shallow,
    /// The bottom face
    Deep,
}

/// A reference to an element stored in one of the per-layer element grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle {
    /// Index of the layer in the stratigraphic column
    pub layer: usize,
    /// Index of the element in the layer's element grid
    pub index: usize,
}

/// Options used when creating a computational domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainOptions {
    /// Ordering used to number the DOFs
    pub dof_ordering: DofOrdering,
    /// Segments no thicker than this are collapsed onto the node above
    pub thickness_tolerance: f64,
}

impl Default for DomainOptions {
    fn default() -> Self {
        Self {
            dof_ordering: DofOrdering::default(),
            thickness_tolerance: DEPOSITING_THICKNESS_TOLERANCE,
        }
    }
}

impl DomainOptions {
    /// Set the DOF ordering
    pub fn with_dof_ordering(mut self, dof_ordering: DofOrdering) -> Self {
        self.dof_ordering = dof_ordering;
        self
    }

    /// Set the thickness tolerance
    pub fn with_thickness_tolerance(mut self, thickness_tolerance: f64) -> Self {
        self.thickness_tolerance = thickness_tolerance;
        self
    }
}
