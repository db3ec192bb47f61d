//! Hexahedral elements
use crate::types::{ElementHandle, Face, NODES_PER_ELEMENT, NULL_DOF_NUMBER};

/// Lateral offsets of the nodes of each horizontal face.
const LATERAL_OFFSETS: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// A hexahedral element of a layer.
///
/// Nodes 0 to 3 form the deep face and nodes 4 to 7 the shallow face. On
/// each face the nodes run through the columns `(i, j)`, `(i + 1, j)`,
/// `(i + 1, j + 1)` and `(i, j + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralElement {
    position: [usize; 3],
    layer: usize,
    valid: bool,
    node_i: [usize; NODES_PER_ELEMENT],
    node_j: [usize; NODES_PER_ELEMENT],
    node_k: [usize; NODES_PER_ELEMENT],
    dofs: [i64; NODES_PER_ELEMENT],
    neighbours: [Option<ElementHandle>; 2],
}

impl GeneralElement {
    pub(crate) fn new(layer: usize, i: usize, j: usize, k: usize, valid: bool) -> Self {
        let mut node_i = [0; NODES_PER_ELEMENT];
        let mut node_j = [0; NODES_PER_ELEMENT];
        for (n, (di, dj)) in LATERAL_OFFSETS.iter().chain(LATERAL_OFFSETS.iter()).enumerate() {
            node_i[n] = i + di;
            node_j[n] = j + dj;
        }
        Self {
            position: [i, j, k],
            layer,
            valid,
            node_i,
            node_j,
            node_k: [0; NODES_PER_ELEMENT],
            dofs: [NULL_DOF_NUMBER; NODES_PER_ELEMENT],
            neighbours: [None, None],
        }
    }

    /// Lateral position in the `i` direction
    pub fn i(&self) -> usize {
        self.position[0]
    }

    /// Lateral position in the `j` direction
    pub fn j(&self) -> usize {
        self.position[1]
    }

    /// Segment of the layer that the element occupies
    pub fn k(&self) -> usize {
        self.position[2]
    }

    /// Index of the element's layer in the stratigraphic column
    pub fn layer_index(&self) -> usize {
        self.layer
    }

    /// Check if all four corner columns are part of the modelled footprint
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Column of node `n` in the `i` direction
    pub fn node_i(&self, n: usize) -> usize {
        self.node_i[n]
    }

    /// Column of node `n` in the `j` direction
    pub fn node_j(&self, n: usize) -> usize {
        self.node_j[n]
    }

    /// Depth index of node `n`
    pub fn node_k(&self, n: usize) -> usize {
        self.node_k[n]
    }

    /// Global DOF number of node `n`
    pub fn dof(&self, n: usize) -> i64 {
        self.dofs[n]
    }

    /// Global DOF numbers of all nodes
    pub fn dofs(&self) -> &[i64; NODES_PER_ELEMENT] {
        &self.dofs
    }

    /// The lateral columns of the element's corners
    pub fn corner_columns(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..4).map(|n| (self.node_i[n], self.node_j[n]))
    }

    /// The element adjacent across a vertical face
    pub fn neighbour(&self, face: Face) -> Option<ElementHandle> {
        self.neighbours[Self::face_index(face)]
    }

    /// Set the element adjacent across a vertical face
    pub fn set_neighbour(&mut self, face: Face, neighbour: Option<ElementHandle>) {
        self.neighbours[Self::face_index(face)] = neighbour;
    }

    pub(crate) fn set_node_k(&mut self, n: usize, k: usize) {
        self.node_k[n] = k;
    }

    pub(crate) fn set_dof(&mut self, n: usize, dof: i64) {
        self.dofs[n] = dof;
    }

    fn face_index(face: Face) -> usize {
        match face {
            Face::Shallow => 0,
            Face::Deep => 1,
        }
    }
}
