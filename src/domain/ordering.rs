//! Traversal of the owned nodes
use crate::grid::LateralBox;
use crate::types::DofOrdering;
use itertools::iproduct;

impl DofOrdering {
    /// Iterate over the nodes `[i, j, k]` of a lateral box with `length_k`
    /// levels in this ordering
    pub fn traverse(self, lateral: LateralBox, length_k: usize) -> Box<dyn Iterator<Item = [usize; 3]>> {
        let is = lateral.first_i..=lateral.last_i;
        let js = lateral.first_j..=lateral.last_j;
        let ks = 0..length_k;
        match self {
            DofOrdering::Ijk => Box::new(iproduct!(is, js, ks).map(|(i, j, k)| [i, j, k])),
            DofOrdering::Kij => Box::new(iproduct!(ks, is, js).map(|(k, i, j)| [i, j, k])),
            DofOrdering::Kji => Box::new(iproduct!(ks, js, is).map(|(k, j, i)| [i, j, k])),
        }
    }
}
