//! Element grid of a single layer
use crate::grid::{Array3, GeneralElement, LateralBox, LateralGrid};
use crate::types::{ElementHandle, Face, NODES_PER_ELEMENT, NULL_DOF_NUMBER};

/// The elements of one layer over the lateral elements owned by this rank.
///
/// The grid owns its elements; everything else refers to them through
/// [`ElementHandle`]s.
#[derive(Debug, Clone)]
pub struct FormationElementGrid {
    layer: usize,
    lateral: Option<LateralBox>,
    length_k: usize,
    elements: Vec<GeneralElement>,
}

impl FormationElementGrid {
    /// Create the elements of layer `layer` with `length_k` segments
    pub fn new(layer: usize, length_k: usize, grid: &LateralGrid) -> Self {
        let lateral = grid.local_element_box();
        let mut elements = Vec::with_capacity(lateral.map_or(0, |b| b.len()) * length_k);
        if let Some(b) = lateral {
            for (i, j) in b.columns() {
                let valid = grid.node_is_defined(i, j)
                    && grid.node_is_defined(i + 1, j)
                    && grid.node_is_defined(i + 1, j + 1)
                    && grid.node_is_defined(i, j + 1);
                let first = elements.len();
                for k in 0..length_k {
                    let mut element = GeneralElement::new(layer, i, j, k, valid);
                    if k > 0 {
                        element.set_neighbour(Face::Deep, Some(ElementHandle { layer, index: first + k - 1 }));
                    }
                    if k + 1 < length_k {
                        element.set_neighbour(Face::Shallow, Some(ElementHandle { layer, index: first + k + 1 }));
                    }
                    elements.push(element);
                }
            }
        }
        Self {
            layer,
            lateral,
            length_k,
            elements,
        }
    }

    /// Index of the layer in the stratigraphic column
    pub fn layer_index(&self) -> usize {
        self.layer
    }

    /// The lateral elements covered, if this rank owns any
    pub fn lateral_box(&self) -> Option<&LateralBox> {
        self.lateral.as_ref()
    }

    /// Number of segments in the layer
    pub fn length_k(&self) -> usize {
        self.length_k
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the grid has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Index of element `(i, j, k)` in the grid
    pub fn index_of(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let b = self.lateral.as_ref()?;
        if b.contains(i, j) && k < self.length_k {
            Some(((i - b.first_i) * b.length_j() + (j - b.first_j)) * self.length_k + k)
        } else {
            None
        }
    }

    /// Get element `(i, j, k)`
    pub fn element(&self, i: usize, j: usize, k: usize) -> Option<&GeneralElement> {
        self.index_of(i, j, k).map(|n| &self.elements[n])
    }

    /// Get element `(i, j, k)` mutably
    pub fn element_mut(&mut self, i: usize, j: usize, k: usize) -> Option<&mut GeneralElement> {
        self.index_of(i, j, k).map(|n| &mut self.elements[n])
    }

    /// Get an element by its index
    pub fn get(&self, index: usize) -> Option<&GeneralElement> {
        self.elements.get(index)
    }

    /// Get an element by its index mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut GeneralElement> {
        self.elements.get_mut(index)
    }

    /// The handle of the element with the given index
    pub fn handle(&self, index: usize) -> ElementHandle {
        ElementHandle {
            layer: self.layer,
            index,
        }
    }

    /// The elements, `i` outermost and `k` innermost
    pub fn elements(&self) -> &[GeneralElement] {
        &self.elements
    }

    /// Iterate over the elements, `i` outermost and `k` innermost
    pub fn iter(&self) -> std::slice::Iter<'_, GeneralElement> {
        self.elements.iter()
    }

    /// Handle of the top element of column `(i, j)`
    pub fn top_element(&self, i: usize, j: usize) -> Option<ElementHandle> {
        self.length_k
            .checked_sub(1)
            .and_then(|k| self.index_of(i, j, k))
            .map(|n| self.handle(n))
    }

    /// Handle of the bottom element of column `(i, j)`
    pub fn bottom_element(&self, i: usize, j: usize) -> Option<ElementHandle> {
        self.index_of(i, j, 0).map(|n| self.handle(n))
    }

    pub(crate) fn reset_dofs(&mut self) {
        for element in self.elements.iter_mut() {
            for n in 0..NODES_PER_ELEMENT {
                element.set_dof(n, NULL_DOF_NUMBER);
            }
        }
    }

    /// Set the depth index of every element node.
    ///
    /// `layer_top` is the logical level of the top node of the layer.
    pub(crate) fn set_element_node_k_values(&mut self, depth_indices: &Array3<i64>, layer_top: usize) {
        let layer_bottom = layer_top - self.length_k;
        for element in self.elements.iter_mut() {
            let bottom = layer_bottom + element.k();
            for n in 0..NODES_PER_ELEMENT {
                let level = if n < 4 { bottom } else { bottom + 1 };
                let index = depth_indices[[element.node_i(n), element.node_j(n), level]];
                // Unmodelled columns keep the logical level.
                let k = if index == NULL_DOF_NUMBER {
                    level
                } else {
                    index as usize
                };
                element.set_node_k(n, k);
            }
        }
    }
}
