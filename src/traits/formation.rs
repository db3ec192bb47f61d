//! Layers of the stratigraphic column
use crate::types::LayerKind;

/// A layer of the stratigraphic column.
///
/// Segment `k` of a layer lies between its nodes `k` (bottom) and `k + 1`
/// (top); segment 0 is the deepest.
pub trait Formation {
    /// The name of the layer
    fn name(&self) -> &str;

    /// The kind of the layer
    fn kind(&self) -> LayerKind;

    /// The age at which deposition of the layer starts
    fn deposition_start_age(&self) -> f64;

    /// The number of segments (element levels) in the layer
    fn number_of_segments(&self) -> usize;

    /// The thickness of segment `k` of column `(i, j)` at `age`
    fn depositing_thickness(&self, i: usize, j: usize, k: usize, age: f64) -> f64;

    /// The depth of node `k` of column `(i, j)`
    fn depth(&self, i: usize, j: usize, k: usize) -> f64;

    /// Check if this layer is the mantle
    fn is_mantle(&self) -> bool {
        self.kind() == LayerKind::Mantle
    }

    /// Check if this layer exists at `age`
    fn is_deposited(&self, age: f64) -> bool {
        self.deposition_start_age() > age
    }

    /// The thickness of segment `k` used to detect degenerate segments.
    ///
    /// The mantle has no deposition history, so its segment thickness comes
    /// from the node depths.
    fn segment_thickness(&self, i: usize, j: usize, k: usize, age: f64) -> f64 {
        if self.is_mantle() {
            self.depth(i, j, k) - self.depth(i, j, k + 1)
        } else {
            self.depositing_thickness(i, j, k, age)
        }
    }
}
