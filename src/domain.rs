//! The computational domain
//!
//! A [`ComputationalDomain`] tracks which elements and nodes of a
//! stratigraphic column take part in a computation at a given age, and
//! numbers the degrees of freedom of the active nodes consistently across
//! all ranks.

mod mapping;
mod ordering;
mod solution;

pub use mapping::LocalToGlobalMapping;
pub use solution::SolutionVectorMapping;

use crate::column::StratigraphicColumn;
use crate::grid::{Array3, FormationElementGrid, GeneralElement, GhostedVector, LateralGrid};
use crate::traits::{DomainComm, ElementActivityPredicate, Formation};
use crate::types::{
    DofOrdering, DomainError, DomainOptions, ElementHandle, Face, NODES_PER_ELEMENT,
    NULL_DOF_NUMBER,
};
use log::{log, Level};

/// The active part of a stratigraphic column and the numbering of its DOFs.
///
/// Nodes are addressed by logical position `(i, j, k)`, where `k` counts node
/// levels upwards from the bottom of the column. Segments thinner than the
/// thickness tolerance collapse onto the node above them: the depth index of
/// a node is the level of the node that carries its DOF.
pub struct ComputationalDomain<'a, L: Formation, C: DomainComm> {
    column: StratigraphicColumn<'a, L>,
    grid: &'a LateralGrid,
    comm: &'a C,
    predicate: Box<dyn ElementActivityPredicate + 'a>,
    options: DomainOptions,
    layers: Vec<FormationElementGrid>,
    maximum_number_of_elements: usize,
    current_age: Option<f64>,
    number_of_nodes_in_depth: usize,
    depth_indices: Array3<i64>,
    active_nodes: Array3<bool>,
    active_elements: Vec<ElementHandle>,
    dofs: Option<GhostedVector<'a, i64>>,
    local_to_global: Option<LocalToGlobalMapping>,
    active_node_counts: Vec<usize>,
    local_start_dof: usize,
    maximum_degenerate_segments: usize,
}

impl<'a, L: Formation, C: DomainComm> ComputationalDomain<'a, L, C> {
    /// Create a domain over a stratigraphic column.
    ///
    /// The domain is empty until [`ComputationalDomain::reset_age`] is called.
    pub fn new(
        column: StratigraphicColumn<'a, L>,
        grid: &'a LateralGrid,
        comm: &'a C,
        predicate: impl ElementActivityPredicate + 'a,
        options: DomainOptions,
    ) -> Result<Self, DomainError> {
        if grid.size() != comm.size() {
            return Err(DomainError::PartitionMismatch {
                grid: grid.size(),
                comm: comm.size(),
            });
        }
        if grid.rank() != comm.rank() {
            return Err(DomainError::InvalidPartition(format!(
                "lateral grid of rank {} used on rank {}",
                grid.rank(),
                comm.rank()
            )));
        }

        let mut layers = (0..column.number_of_layers())
            .map(|l| FormationElementGrid::new(l, column.layer(l).number_of_segments(), grid))
            .collect::<Vec<_>>();
        link_elements_vertically(&mut layers);
        let maximum_number_of_elements = layers.iter().map(|layer| layer.len()).sum();

        Ok(Self {
            column,
            grid,
            comm,
            predicate: Box::new(predicate),
            options,
            layers,
            maximum_number_of_elements,
            current_age: None,
            number_of_nodes_in_depth: 0,
            depth_indices: Array3::new(grid.local_ghosted_box(), 0, NULL_DOF_NUMBER),
            active_nodes: Array3::new(grid.local_box(), 0, false),
            active_elements: Vec::with_capacity(maximum_number_of_elements),
            dofs: None,
            local_to_global: None,
            active_node_counts: vec![0; comm.size()],
            local_start_dof: 0,
            maximum_degenerate_segments: 0,
        })
    }

    /// Recompute the active domain and its DOF numbering at `age`.
    ///
    /// Collective: every rank must call this with the same age. With
    /// `verbose` set, a summary is logged at info level; otherwise at debug
    /// level.
    pub fn reset_age(&mut self, age: f64, verbose: bool) {
        let level = if verbose { Level::Info } else { Level::Debug };
        let number_of_nodes = self.column.number_of_logical_nodes_in_depth(age);
        self.current_age = Some(age);

        if self.column.number_of_layers() == 0 || number_of_nodes <= 1 {
            log!(level, "Age {age}: computational domain is empty");
            self.clear();
            return;
        }
        log!(level, "Age {age}: {number_of_nodes} nodes in depth");

        self.resize(number_of_nodes);
        self.number_depth_indices(age, level);
        self.set_element_node_depth_indices(age);
        self.determine_active_elements(age, level);
        self.determine_active_nodes(level);
        self.number_global_dofs();
        self.assign_element_global_dof_numbers();
        self.number_local_to_global_mapping();

        if self.comm.rank() + 1 == self.comm.size() {
            log!(
                level,
                "Age {age}: {} DOFs in total",
                self.global_number_of_active_nodes()
            );
        }
    }

    fn clear(&mut self) {
        self.number_of_nodes_in_depth = 0;
        self.active_elements.clear();
        self.active_node_counts.iter_mut().for_each(|count| *count = 0);
        self.local_start_dof = 0;
        self.maximum_degenerate_segments = 0;
        self.depth_indices = Array3::new(self.grid.local_ghosted_box(), 0, NULL_DOF_NUMBER);
        self.active_nodes = Array3::new(self.grid.local_box(), 0, false);
        self.dofs = None;
        self.local_to_global = None;
        for layer in self.layers.iter_mut() {
            layer.reset_dofs();
        }
    }

    fn resize(&mut self, number_of_nodes: usize) {
        if self.dofs.is_none() || self.number_of_nodes_in_depth != number_of_nodes {
            self.dofs = Some(GhostedVector::new(self.grid, number_of_nodes, NULL_DOF_NUMBER));
        }
        self.number_of_nodes_in_depth = number_of_nodes;
        self.depth_indices = Array3::new(
            self.grid.local_ghosted_box(),
            number_of_nodes,
            NULL_DOF_NUMBER,
        );
        self.active_nodes = Array3::new(self.grid.local_box(), number_of_nodes, false);
    }

    /// Indices of the deposited layers, top to bottom
    fn deposited_layers(&self, age: f64) -> Vec<usize> {
        (0..self.column.number_of_layers())
            .filter(|l| self.column.layer(*l).is_deposited(age))
            .collect()
    }

    fn number_depth_indices(&mut self, age: f64, level: Level) {
        let deposited = self.deposited_layers(age);
        let top = self.number_of_nodes_in_depth - 1;
        let tolerance = self.options.thickness_tolerance;
        let owned = self.grid.local_box();
        let mut real_segments = 0;
        let mut degenerate_segments = 0;
        let mut maximum_run = 0i64;

        for (i, j) in self.grid.local_ghosted_box().columns() {
            if !self.grid.node_is_defined(i, j) {
                continue;
            }
            let counted = owned.contains(i, j);
            let column = self.depth_indices.column_mut(i, j);
            column[top] = top as i64;
            let mut global_k = top;
            for l in deposited.iter() {
                let layer = self.column.layer(*l);
                for k in (0..layer.number_of_segments()).rev() {
                    global_k -= 1;
                    if layer.segment_thickness(i, j, k, age) > tolerance {
                        column[global_k] = global_k as i64;
                        if counted {
                            real_segments += 1;
                        }
                    } else {
                        column[global_k] = column[global_k + 1];
                        maximum_run = maximum_run.max(column[global_k + 1] - global_k as i64);
                        if counted {
                            degenerate_segments += 1;
                        }
                    }
                }
            }
        }

        self.maximum_degenerate_segments = self.comm.all_reduce_max(maximum_run).max(0) as usize;
        log!(
            level,
            "Rank {}: {real_segments} segments, {degenerate_segments} degenerate segments, longest degenerate run {}",
            self.comm.rank(),
            self.maximum_degenerate_segments
        );
    }

    fn set_element_node_depth_indices(&mut self, age: f64) {
        let mut layer_top = self.number_of_nodes_in_depth - 1;
        for l in self.deposited_layers(age) {
            let layer = &mut self.layers[l];
            layer.set_element_node_k_values(&self.depth_indices, layer_top);
            layer_top -= layer.length_k();
        }
    }

    fn determine_active_elements(&mut self, age: f64, level: Level) {
        self.active_elements.clear();
        self.active_elements.reserve(self.maximum_number_of_elements);
        for l in self.deposited_layers(age) {
            let formation = self.column.layer(l);
            let layer = &self.layers[l];
            let before = self.active_elements.len();
            for (index, element) in layer.iter().enumerate() {
                if self.predicate.is_active(formation, element, age) {
                    self.active_elements.push(layer.handle(index));
                }
            }
            log!(
                level,
                "Rank {}: layer {} has {} active elements",
                self.comm.rank(),
                formation.name(),
                self.active_elements.len() - before
            );
        }
    }

    fn determine_active_nodes(&mut self, level: Level) {
        let mut activity = GhostedVector::new(self.grid, self.number_of_nodes_in_depth, 0.0);
        for handle in self.active_elements.iter() {
            let element = self.element(*handle);
            for n in 0..NODES_PER_ELEMENT {
                activity[[element.node_i(n), element.node_j(n), element.node_k(n)]] += 1.0;
            }
        }
        activity.scatter_add(self.comm);
        activity.update_ghosts(self.comm);

        let mut count = 0;
        for (i, j) in self.grid.local_box().columns() {
            if !self.grid.node_is_defined(i, j) {
                continue;
            }
            for k in 0..self.number_of_nodes_in_depth {
                if activity[[i, j, k]] > 0.0 {
                    self.active_nodes[[i, j, k]] = true;
                    count += 1;
                }
            }
        }

        self.active_node_counts = self.comm.gather_broadcast(count);
        self.local_start_dof = self.active_node_counts[..self.comm.rank()].iter().sum();
        log!(
            level,
            "Rank {}: {count} active nodes, first DOF {}",
            self.comm.rank(),
            self.local_start_dof
        );
    }

    fn number_global_dofs(&mut self) {
        let Some(dofs) = self.dofs.as_mut() else {
            return;
        };
        dofs.fill(NULL_DOF_NUMBER);
        let mut next = self.local_start_dof as i64;
        for [i, j, k] in self
            .options
            .dof_ordering
            .traverse(self.grid.local_box(), self.number_of_nodes_in_depth)
        {
            if self.grid.node_is_defined(i, j) && self.active_nodes[[i, j, k]] {
                dofs[[i, j, k]] = next;
                next += 1;
            }
        }
        debug_assert_eq!(
            (next - self.local_start_dof as i64) as usize,
            self.active_node_counts[self.comm.rank()]
        );
        dofs.update_ghosts(self.comm);
    }

    fn assign_element_global_dof_numbers(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.reset_dofs();
        }
        let Some(dofs) = self.dofs.as_ref() else {
            return;
        };
        for handle in self.active_elements.iter() {
            if let Some(element) = self.layers[handle.layer].get_mut(handle.index) {
                for n in 0..NODES_PER_ELEMENT {
                    let dof = dofs[[element.node_i(n), element.node_j(n), element.node_k(n)]];
                    debug_assert_ne!(dof, NULL_DOF_NUMBER);
                    element.set_dof(n, dof);
                }
            }
        }
    }

    fn number_local_to_global_mapping(&mut self) {
        self.local_to_global = Some(LocalToGlobalMapping::new(
            self.local_start_dof,
            self.local_number_of_active_nodes(),
        ));
    }

    /// The stratigraphic column
    pub fn column(&self) -> &StratigraphicColumn<'a, L> {
        &self.column
    }

    /// The lateral grid
    pub fn grid(&self) -> &'a LateralGrid {
        self.grid
    }

    /// The communicator
    pub fn comm(&self) -> &'a C {
        self.comm
    }

    /// The options the domain was created with
    pub fn options(&self) -> &DomainOptions {
        &self.options
    }

    /// The DOF ordering
    pub fn dof_ordering(&self) -> DofOrdering {
        self.options.dof_ordering
    }

    /// The age of the last call to [`ComputationalDomain::reset_age`]
    pub fn current_age(&self) -> Option<f64> {
        self.current_age
    }

    /// Check if the domain has any nodes at the current age
    pub fn is_active(&self) -> bool {
        self.dofs.is_some()
    }

    /// Number of logical node levels in depth at the current age
    pub fn number_of_nodes_in_depth(&self) -> usize {
        self.number_of_nodes_in_depth
    }

    /// Number of elements of all layers once fully deposited
    pub fn maximum_number_of_elements(&self) -> usize {
        self.maximum_number_of_elements
    }

    /// The element grid of layer `l`
    pub fn layer_grid(&self, l: usize) -> &FormationElementGrid {
        &self.layers[l]
    }

    /// Get an element.
    ///
    /// Panics if the handle does not refer to an element of this domain.
    pub fn element(&self, handle: ElementHandle) -> &GeneralElement {
        &self.layers[handle.layer].elements()[handle.index]
    }

    /// Number of active elements on this rank
    pub fn local_number_of_active_elements(&self) -> usize {
        self.active_elements.len()
    }

    /// Active element `index` on this rank
    pub fn active_element(&self, index: usize) -> &GeneralElement {
        self.element(self.active_elements[index])
    }

    /// Handles of the active elements on this rank
    pub fn active_element_handles(&self) -> &[ElementHandle] {
        &self.active_elements
    }

    /// Iterate over the active elements on this rank
    pub fn active_elements(&self) -> impl Iterator<Item = &GeneralElement> + '_ {
        self.active_elements.iter().map(|h| self.element(*h))
    }

    /// Depth indices of the nodes on this rank, ghosts included
    pub fn depth_indices(&self) -> &Array3<i64> {
        &self.depth_indices
    }

    /// Activity of the owned nodes
    pub fn active_nodes(&self) -> &Array3<bool> {
        &self.active_nodes
    }

    /// Check if owned node `(i, j, k)` is active
    pub fn is_node_active(&self, i: usize, j: usize, k: usize) -> bool {
        self.active_nodes.get(i, j, k).unwrap_or(false)
    }

    /// The global DOF number of every node on this rank, ghosts included
    pub fn dof_numbers(&self) -> Option<&GhostedVector<'a, i64>> {
        self.dofs.as_ref()
    }

    /// The global DOF number of node `(i, j, k)`, if it is on this rank and active
    pub fn dof_number(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        self.dofs
            .as_ref()
            .and_then(|dofs| dofs.values().get(i, j, k))
            .filter(|dof| *dof != NULL_DOF_NUMBER)
            .map(|dof| dof as usize)
    }

    /// The local to global mapping of the owned DOFs
    pub fn local_to_global_mapping(&self) -> Option<&LocalToGlobalMapping> {
        self.local_to_global.as_ref()
    }

    /// Number of active nodes owned by this rank
    pub fn local_number_of_active_nodes(&self) -> usize {
        self.active_node_counts[self.comm.rank()]
    }

    /// Number of active nodes over all ranks
    pub fn global_number_of_active_nodes(&self) -> usize {
        self.active_node_counts.iter().sum()
    }

    /// Number of active nodes owned by each rank
    pub fn active_node_counts(&self) -> &[usize] {
        &self.active_node_counts
    }

    /// The first global DOF owned by this rank
    pub fn local_start_dof(&self) -> usize {
        self.local_start_dof
    }

    /// The first global DOF owned by each rank
    pub fn start_dofs(&self) -> Vec<usize> {
        self.active_node_counts
            .iter()
            .scan(0, |start, count| {
                let first = *start;
                *start += count;
                Some(first)
            })
            .collect()
    }

    /// The rank that owns a global DOF
    pub fn owner_of_dof(&self, dof: usize) -> Option<usize> {
        let mut start = 0;
        for (rank, count) in self.active_node_counts.iter().enumerate() {
            if dof < start + count {
                return Some(rank);
            }
            start += count;
        }
        None
    }

    /// The longest run of consecutive degenerate segments over all ranks
    pub fn maximum_degenerate_segments(&self) -> usize {
        self.maximum_degenerate_segments
    }

    /// The active owned nodes `[i, j, k]` in DOF order
    pub fn local_nodes(&self) -> Vec<[usize; 3]> {
        self.options
            .dof_ordering
            .traverse(self.grid.local_box(), self.number_of_nodes_in_depth)
            .filter(|[i, j, k]| self.is_node_active(*i, *j, *k))
            .collect()
    }
}

/// Link the bottom element of every layer to the top element of the layer below.
fn link_elements_vertically(layers: &mut [FormationElementGrid]) {
    for l in 1..layers.len() {
        let (above, below) = layers.split_at_mut(l);
        let above = &mut above[l - 1];
        let below = &mut below[0];
        let columns = match above.lateral_box() {
            Some(b) => b.columns().collect::<Vec<_>>(),
            None => continue,
        };
        for (i, j) in columns {
            if let (Some(deep), Some(shallow)) = (above.bottom_element(i, j), below.top_element(i, j)) {
                if let Some(e) = above.get_mut(deep.index) {
                    e.set_neighbour(Face::Deep, Some(shallow));
                }
                if let Some(e) = below.get_mut(shallow.index) {
                    e.set_neighbour(Face::Shallow, Some(deep));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::activity::ElementThicknessActivityPredicate;
    use crate::column::ThicknessHistoryLayer;
    use crate::comm::SerialComm;
    use crate::types::LayerKind;

    #[test]
    fn test_partition_mismatch() {
        let layers = vec![ThicknessHistoryLayer::new("a", LayerKind::Sediment, 10.0, 0.0, 2, 2, 1, 1.0)];
        let grid = LateralGrid::new(2, 2, 2, 1, 0).unwrap();
        let result = ComputationalDomain::new(
            StratigraphicColumn::new(&layers, 0, 0),
            &grid,
            &SerialComm,
            ElementThicknessActivityPredicate::default(),
            DomainOptions::default(),
        );
        assert_eq!(
            result.err(),
            Some(DomainError::PartitionMismatch { grid: 2, comm: 1 })
        );
    }

    #[test]
    fn test_linking() {
        let layers = vec![
            ThicknessHistoryLayer::new("a", LayerKind::Sediment, 10.0, 0.0, 2, 2, 2, 1.0),
            ThicknessHistoryLayer::new("b", LayerKind::Sediment, 20.0, 10.0, 2, 2, 3, 1.0),
        ];
        let grid = LateralGrid::serial(2, 2).unwrap();
        let domain = ComputationalDomain::new(
            StratigraphicColumn::new(&layers, 0, 1),
            &grid,
            &SerialComm,
            ElementThicknessActivityPredicate::default(),
            DomainOptions::default(),
        )
        .unwrap();
        assert_eq!(domain.maximum_number_of_elements(), 5);
        let bottom_of_a = domain.layer_grid(0).bottom_element(0, 0).unwrap();
        let top_of_b = domain.layer_grid(1).top_element(0, 0).unwrap();
        assert_eq!(domain.element(bottom_of_a).neighbour(Face::Deep), Some(top_of_b));
        assert_eq!(domain.element(top_of_b).neighbour(Face::Shallow), Some(bottom_of_a));
        assert!(!domain.is_active());
        assert_eq!(domain.current_age(), None);
    }

    #[test]
    fn test_owner_of_dof() {
        let layers = vec![ThicknessHistoryLayer::new("a", LayerKind::Sediment, 10.0, 0.0, 2, 2, 1, 1.0)];
        let grid = LateralGrid::serial(2, 2).unwrap();
        let mut domain = ComputationalDomain::new(
            StratigraphicColumn::new(&layers, 0, 0),
            &grid,
            &SerialComm,
            ElementThicknessActivityPredicate::default(),
            DomainOptions::default(),
        )
        .unwrap();
        domain.reset_age(0.0, false);
        assert_eq!(domain.global_number_of_active_nodes(), 8);
        assert_eq!(domain.owner_of_dof(7), Some(0));
        assert_eq!(domain.owner_of_dof(8), None);
        assert_eq!(domain.start_dofs(), vec![0]);
        assert_eq!(domain.dof_number(0, 0, 0), Some(0));
        assert_eq!(domain.dof_number(1, 0, 0), Some(1));
        assert_eq!(domain.dof_number(0, 0, 1), Some(4));
    }
}
