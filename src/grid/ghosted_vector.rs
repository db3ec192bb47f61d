//! Distributed vectors with a ghost halo
use crate::grid::{Array3, LateralBox, LateralGrid};
use crate::traits::{CommScalar, DomainComm};
use std::ops::{AddAssign, Index, IndexMut};

/// A distributed vector with one entry per logical node `(i, j, k)`.
///
/// Each rank stores its owned columns together with its ghost halo. Owned
/// entries are the rank's part of the global vector; ghost entries are copies
/// that are only consistent after [`GhostedVector::update_ghosts`].
#[derive(Debug, Clone)]
pub struct GhostedVector<'a, T: CommScalar> {
    grid: &'a LateralGrid,
    values: Array3<T>,
}

/// Columns owned by `owner` that are in the ghost halo of `ghoster`.
fn shared_columns(grid: &LateralGrid, owner: usize, ghoster: usize) -> Option<LateralBox> {
    if owner == ghoster {
        None
    } else {
        grid.ghosted_box(ghoster)
            .intersection(&grid.owned_box(owner))
    }
}

impl<'a, T: CommScalar> GhostedVector<'a, T> {
    /// Create a vector with `length_k` entries per column, all set to `value`
    pub fn new(grid: &'a LateralGrid, length_k: usize, value: T) -> Self {
        Self {
            grid,
            values: Array3::new(grid.local_ghosted_box(), length_k, value),
        }
    }

    /// Number of entries per column
    pub fn length_k(&self) -> usize {
        self.values.length_k()
    }

    /// Number of entries owned by this rank
    pub fn owned_len(&self) -> usize {
        self.grid.local_box().len() * self.length_k()
    }

    /// The local entries, ghosts included
    pub fn values(&self) -> &Array3<T> {
        &self.values
    }

    /// Set every local entry to `value`
    pub fn fill(&mut self, value: T) {
        self.values.fill(value);
    }

    /// The owned entries, column by column
    pub fn owned_values(&self) -> Vec<T> {
        self.grid
            .local_box()
            .columns()
            .flat_map(|(i, j)| self.values.column(i, j).iter().copied())
            .collect()
    }

    /// Update the ghost entries from their owners.
    ///
    /// Collective.
    pub fn update_ghosts<C: DomainComm>(&mut self, comm: &C) {
        if self.length_k() == 0 {
            return;
        }
        let rank = comm.rank();
        let send = (0..comm.size())
            .map(|p| self.pack(shared_columns(self.grid, rank, p)))
            .collect::<Vec<_>>();
        let received = comm.exchange(&send);
        for (p, values) in received.iter().enumerate() {
            if let Some(columns) = shared_columns(self.grid, p, rank) {
                for ((i, j), chunk) in columns.columns().zip(values.chunks(self.length_k())) {
                    self.values.column_mut(i, j).copy_from_slice(chunk);
                }
            }
        }
    }

    fn pack(&self, columns: Option<LateralBox>) -> Vec<T> {
        match columns {
            Some(columns) => columns
                .columns()
                .flat_map(|(i, j)| self.values.column(i, j).iter().copied())
                .collect(),
            None => vec![],
        }
    }
}

impl<'a, T: CommScalar + AddAssign> GhostedVector<'a, T> {
    /// Add the ghost entries of every rank into the owned entries they copy.
    ///
    /// Afterwards each owned entry is the sum of the contributions of all
    /// ranks that hold it. Ghost entries are left unchanged. Collective.
    pub fn scatter_add<C: DomainComm>(&mut self, comm: &C) {
        if self.length_k() == 0 {
            return;
        }
        let rank = comm.rank();
        let send = (0..comm.size())
            .map(|p| self.pack(shared_columns(self.grid, p, rank)))
            .collect::<Vec<_>>();
        let received = comm.exchange(&send);
        for (p, values) in received.iter().enumerate() {
            if let Some(columns) = shared_columns(self.grid, rank, p) {
                for ((i, j), chunk) in columns.columns().zip(values.chunks(self.length_k())) {
                    for (v, r) in self.values.column_mut(i, j).iter_mut().zip(chunk) {
                        *v += *r;
                    }
                }
            }
        }
    }
}

impl<'a, T: CommScalar> Index<[usize; 3]> for GhostedVector<'a, T> {
    type Output = T;

    fn index(&self, index: [usize; 3]) -> &T {
        &self.values[index]
    }
}

impl<'a, T: CommScalar> IndexMut<[usize; 3]> for GhostedVector<'a, T> {
    fn index_mut(&mut self, index: [usize; 3]) -> &mut T {
        &mut self.values[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::comm::{SerialComm, ThreadComm};

    #[test]
    fn test_serial_vector() {
        let grid = LateralGrid::serial(3, 2).unwrap();
        let mut v = GhostedVector::new(&grid, 2, 1.0);
        v[[2, 1, 1]] = 3.0;
        v.scatter_add(&SerialComm);
        v.update_ghosts(&SerialComm);
        assert_eq!(v.owned_len(), 12);
        assert_eq!(v[[2, 1, 1]], 3.0);
        assert_eq!(v.owned_values().iter().sum::<f64>(), 14.0);
    }

    #[test]
    fn test_scatter_add_and_update() {
        // Every rank adds one to every local entry, ghosts included.
        let results = ThreadComm::run(4, |comm| {
            let grid = LateralGrid::new(5, 5, 2, 2, comm.rank()).unwrap();
            let mut v = GhostedVector::new(&grid, 3, 1.0);
            v.scatter_add(&comm);
            v.update_ghosts(&comm);
            let b = grid.local_ghosted_box();
            b.columns()
                .map(|(i, j)| ((i, j), v[[i, j, 2]]))
                .collect::<Vec<_>>()
        });
        // Count how many ranks hold each column.
        let mut holders = std::collections::HashMap::new();
        for rank in 0..4 {
            let grid = LateralGrid::new(5, 5, 2, 2, rank).unwrap();
            for c in grid.local_ghosted_box().columns() {
                *holders.entry(c).or_insert(0.0) += 1.0;
            }
        }
        for values in results {
            for (c, value) in values {
                assert_eq!(value, holders[&c]);
            }
        }
    }

    #[test]
    fn test_update_ghosts() {
        let results = ThreadComm::run(2, |comm| {
            let grid = LateralGrid::new(4, 2, 2, 1, comm.rank()).unwrap();
            let mut v = GhostedVector::new(&grid, 1, -1i64);
            for (i, j) in grid.local_box().columns() {
                v[[i, j, 0]] = (10 * i + j) as i64;
            }
            v.update_ghosts(&comm);
            grid.local_ghosted_box()
                .columns()
                .map(|(i, j)| v[[i, j, 0]] == (10 * i + j) as i64)
                .all(|ok| ok)
        });
        assert_eq!(results, vec![true, true]);
    }
}
