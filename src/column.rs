//! The stratigraphic column

mod history;

pub use history::ThicknessHistoryLayer;

use crate::traits::Formation;

/// The ordered layers between a top and a bottom layer.
///
/// Layer 0 is the youngest; every layer is older than the layers above it.
#[derive(Debug)]
pub struct StratigraphicColumn<'a, L: Formation> {
    layers: Vec<&'a L>,
}

impl<'a, L: Formation> Clone for StratigraphicColumn<'a, L> {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
        }
    }
}

impl<'a, L: Formation> StratigraphicColumn<'a, L> {
    /// Create the column of `layers[top..=bottom]`.
    ///
    /// The top layer must not lie below the bottom layer.
    pub fn new(layers: &'a [L], top: usize, bottom: usize) -> Self {
        Self::from_layers(
            layers
                .get(top..=bottom)
                .map(|l| l.iter().collect())
                .unwrap_or_default(),
        )
    }

    /// Create a column from layers ordered top to bottom
    pub fn from_layers(layers: Vec<&'a L>) -> Self {
        Self { layers }
    }

    /// Number of layers in the column
    pub fn number_of_layers(&self) -> usize {
        self.layers.len()
    }

    /// Get a layer
    pub fn layer(&self, index: usize) -> &'a L {
        self.layers[index]
    }

    /// Iterate over the layers, top to bottom
    pub fn layers(&self) -> impl Iterator<Item = &'a L> + '_ {
        self.layers.iter().copied()
    }

    /// Index of the first layer whose name is `name`
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    /// Index of the youngest layer that exists at `age`
    pub fn top_layer_index(&self, age: f64) -> Option<usize> {
        self.layers.iter().position(|l| l.is_deposited(age))
    }

    /// Number of element levels in depth at `age`
    pub fn number_of_logical_elements_in_depth(&self, age: f64) -> usize {
        self.layers
            .iter()
            .filter(|l| l.is_deposited(age))
            .map(|l| l.number_of_segments())
            .sum()
    }

    /// Number of node levels in depth at `age`; zero if no layer exists yet
    pub fn number_of_logical_nodes_in_depth(&self, age: f64) -> usize {
        if self.top_layer_index(age).is_some() {
            self.number_of_logical_elements_in_depth(age) + 1
        } else {
            0
        }
    }

    /// Number of element levels in depth once every layer has been deposited
    pub fn maximum_number_of_elements_in_depth(&self) -> usize {
        self.layers.iter().map(|l| l.number_of_segments()).sum()
    }
}
