//! Sparsity of the system matrix
use crate::domain::ComputationalDomain;
use crate::grid::{Array3, LateralGrid};
use crate::traits::{DomainComm, Formation};
use crate::types::NULL_DOF_NUMBER;
use itertools::{iproduct, Itertools};
use rayon::prelude::*;
use std::ops::Range;

/// The number of non-zeros in each locally owned row of the system matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixNonZeros {
    /// Non-zeros in columns owned by this rank
    pub local: Vec<usize>,
    /// Non-zeros in columns owned by other ranks
    pub ghost: Vec<usize>,
}

impl MatrixNonZeros {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.local.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Total number of local non-zeros
    pub fn total_local(&self) -> usize {
        self.local.iter().sum()
    }

    /// Total number of ghost non-zeros
    pub fn total_ghost(&self) -> usize {
        self.ghost.iter().sum()
    }
}

/// Computes the non-zero counts used to preallocate the system matrix.
///
/// The row of a node couples it to every DOF in the 3x3 block of columns
/// around it, over the levels between its nearest active neighbours below and
/// above. When the levels under the node collapse onto it, the range reaches
/// down to the level under the lowest collapsed one.
///
/// The counts are an upper bound on the couplings of the active elements.
/// They are exact for a full stencil, but a degenerate segment above the node
/// or an inactive element in a neighbouring column can add entries that are
/// never assembled.
pub struct MatrixNonZeroCalculator;

impl MatrixNonZeroCalculator {
    /// Count the non-zeros of every owned row.
    ///
    /// Each owned DOF has `block_size` rows and every coupling contributes
    /// `block_size` non-zeros.
    pub fn compute<L: Formation, C: DomainComm>(
        domain: &ComputationalDomain<'_, L, C>,
        block_size: usize,
    ) -> MatrixNonZeros {
        let Some(dofs) = domain.dof_numbers() else {
            return MatrixNonZeros::default();
        };
        let stencil = Stencil {
            grid: domain.grid(),
            depth_indices: domain.depth_indices(),
            active_nodes: domain.active_nodes(),
            dofs: dofs.values(),
            owned: domain.local_start_dof()
                ..domain.local_start_dof() + domain.local_number_of_active_nodes(),
        };

        let rows = domain
            .local_nodes()
            .into_par_iter()
            .map(|node| stencil.count(node))
            .collect::<Vec<_>>();

        let mut non_zeros = MatrixNonZeros {
            local: Vec::with_capacity(rows.len() * block_size),
            ghost: Vec::with_capacity(rows.len() * block_size),
        };
        for (local, ghost) in rows {
            for _ in 0..block_size {
                non_zeros.local.push(local * block_size);
                non_zeros.ghost.push(ghost * block_size);
            }
        }
        non_zeros
    }
}

struct Stencil<'s> {
    grid: &'s LateralGrid,
    depth_indices: &'s Array3<i64>,
    active_nodes: &'s Array3<bool>,
    dofs: &'s Array3<i64>,
    owned: Range<usize>,
}

impl<'s> Stencil<'s> {
    /// The nearest active levels below and above `k` in column `(i, j)`
    fn vertical_range(&self, i: usize, j: usize, k: usize) -> (usize, usize) {
        let column = self.active_nodes.column(i, j);
        let indices = self.depth_indices.column(i, j);
        // Segments collapsed onto `k` still carry elements touching it.
        let lowest = (0..k)
            .rev()
            .take_while(|m| indices[*m] == k as i64)
            .last()
            .unwrap_or(k);
        let fallback = if lowest < k { lowest.saturating_sub(1) } else { k };
        let below = (0..k).rev().find(|m| column[*m]).unwrap_or(fallback);
        let above = (k + 1..column.len()).find(|m| column[*m]).unwrap_or(k);
        (below, above)
    }

    /// Local and ghost couplings of node `(i, j, k)`
    fn count(&self, [i, j, k]: [usize; 3]) -> (usize, usize) {
        let (below, above) = self.vertical_range(i, j, k);
        let is = i.saturating_sub(1)..=(i + 1).min(self.grid.number_of_nodes_i() - 1);
        let js = j.saturating_sub(1)..=(j + 1).min(self.grid.number_of_nodes_j() - 1);
        let (local, ghost): (Vec<_>, Vec<_>) = iproduct!(is, js, below..=above)
            .filter(|(ni, nj, _)| self.grid.node_is_defined(*ni, *nj))
            .filter_map(|(ni, nj, level)| {
                let index = self.depth_indices[[ni, nj, level]];
                if index == NULL_DOF_NUMBER {
                    return None;
                }
                let dof = self.dofs[[ni, nj, index as usize]];
                if dof == NULL_DOF_NUMBER {
                    None
                } else {
                    Some(dof as usize)
                }
            })
            .unique()
            .partition(|dof| self.owned.contains(dof));
        (local.len(), ghost.len())
    }
}
