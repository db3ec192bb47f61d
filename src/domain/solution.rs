//! Moving values between a solution vector and the logical grid
use crate::domain::ComputationalDomain;
use crate::grid::Array3;
use crate::traits::{DomainComm, Formation};
use crate::types::NULL_DOF_NUMBER;

/// Maps between the local part of a solution vector, indexed by local DOF,
/// and values at the logical nodes `(i, j, k)` owned by a rank.
pub struct SolutionVectorMapping<'d, 'a, L: Formation, C: DomainComm> {
    domain: &'d ComputationalDomain<'a, L, C>,
}

impl<'d, 'a, L: Formation, C: DomainComm> SolutionVectorMapping<'d, 'a, L, C> {
    /// Create a mapping for a numbered domain
    pub fn new(domain: &'d ComputationalDomain<'a, L, C>) -> Self {
        Self { domain }
    }

    /// The local DOF of logical node `(i, j, k)`.
    ///
    /// Collapsed nodes share the DOF of the node above them.
    pub fn local_dof(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let dofs = self.domain.dof_numbers()?;
        let level = self.domain.depth_indices().get(i, j, k)?;
        if level == NULL_DOF_NUMBER {
            return None;
        }
        let dof = dofs.values().get(i, j, level as usize)?;
        self.domain
            .local_to_global_mapping()?
            .local(usize::try_from(dof).ok()?)
    }

    /// The values of the local solution at the owned logical nodes.
    ///
    /// Nodes without a DOF take `null_value`.
    pub fn to_logical(&self, solution: &[f64], null_value: f64) -> Array3<f64> {
        let owned = self.domain.grid().local_box();
        let length_k = self.domain.number_of_nodes_in_depth();
        let mut values = Array3::new(owned, length_k, null_value);
        for (i, j) in owned.columns() {
            for k in 0..length_k {
                if let Some(dof) = self.local_dof(i, j, k) {
                    values[[i, j, k]] = solution[dof];
                }
            }
        }
        values
    }

    /// Write the values at the owned active nodes into the local solution
    pub fn from_logical(&self, values: &Array3<f64>, solution: &mut [f64]) {
        for [i, j, k] in self.domain.local_nodes() {
            if let (Some(dof), Some(value)) = (self.local_dof(i, j, k), values.get(i, j, k)) {
                solution[dof] = value;
            }
        }
    }
}
