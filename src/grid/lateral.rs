//! Block partition of the lateral plane
use crate::types::DomainError;
use itertools::iproduct;
use log::warn;

/// An inclusive rectangle of lateral node columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LateralBox {
    /// First column in the `i` direction
    pub first_i: usize,
    /// Last column in the `i` direction
    pub last_i: usize,
    /// First column in the `j` direction
    pub first_j: usize,
    /// Last column in the `j` direction
    pub last_j: usize,
}

impl LateralBox {
    /// Create a box
    pub fn new(first_i: usize, last_i: usize, first_j: usize, last_j: usize) -> Self {
        debug_assert!(first_i <= last_i && first_j <= last_j);
        Self {
            first_i,
            last_i,
            first_j,
            last_j,
        }
    }

    /// Number of columns in the `i` direction
    pub fn length_i(&self) -> usize {
        self.last_i - self.first_i + 1
    }

    /// Number of columns in the `j` direction
    pub fn length_j(&self) -> usize {
        self.last_j - self.first_j + 1
    }

    /// Number of columns in the box
    pub fn len(&self) -> usize {
        self.length_i() * self.length_j()
    }

    /// A box always contains at least one column
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if the box contains column `(i, j)`
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (self.first_i..=self.last_i).contains(&i) && (self.first_j..=self.last_j).contains(&j)
    }

    /// The columns contained in both boxes
    pub fn intersection(&self, other: &LateralBox) -> Option<LateralBox> {
        let first_i = self.first_i.max(other.first_i);
        let last_i = self.last_i.min(other.last_i);
        let first_j = self.first_j.max(other.first_j);
        let last_j = self.last_j.min(other.last_j);
        if first_i <= last_i && first_j <= last_j {
            Some(LateralBox::new(first_i, last_i, first_j, last_j))
        } else {
            None
        }
    }

    /// Iterate over the columns, `i` outermost
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize)> {
        iproduct!(self.first_i..=self.last_i, self.first_j..=self.last_j)
    }
}

/// A 2D block partition of the lateral node plane.
///
/// Every rank owns a rectangle of node columns over the full depth, plus a
/// ghost halo one column wide in `i` and `j`. The partition and the mask of
/// modelled columns are replicated on every rank.
#[derive(Debug, Clone, PartialEq)]
pub struct LateralGrid {
    number_of_nodes_i: usize,
    number_of_nodes_j: usize,
    starts_i: Vec<usize>,
    starts_j: Vec<usize>,
    rank: usize,
    defined: Vec<bool>,
}

impl LateralGrid {
    /// Create a partition that splits the nodes as evenly as possible over
    /// `processes_i * processes_j` ranks
    pub fn new(
        number_of_nodes_i: usize,
        number_of_nodes_j: usize,
        processes_i: usize,
        processes_j: usize,
        rank: usize,
    ) -> Result<Self, DomainError> {
        if processes_i == 0 || processes_j == 0 {
            return Err(DomainError::InvalidPartition(
                "at least one process is needed in each direction".to_string(),
            ));
        }
        let starts_i = (0..=processes_i)
            .map(|p| p * number_of_nodes_i / processes_i)
            .collect::<Vec<_>>();
        let starts_j = (0..=processes_j)
            .map(|p| p * number_of_nodes_j / processes_j)
            .collect::<Vec<_>>();
        Self::from_starts(number_of_nodes_i, number_of_nodes_j, starts_i, starts_j, rank)
    }

    /// Create a partition owned entirely by a single rank
    pub fn serial(number_of_nodes_i: usize, number_of_nodes_j: usize) -> Result<Self, DomainError> {
        Self::new(number_of_nodes_i, number_of_nodes_j, 1, 1, 0)
    }

    /// Create a partition from the first column owned by each process row and column.
    ///
    /// `starts_i` has one entry per process in the `i` direction plus a final
    /// entry equal to `number_of_nodes_i`; likewise for `starts_j`.
    pub fn from_starts(
        number_of_nodes_i: usize,
        number_of_nodes_j: usize,
        starts_i: Vec<usize>,
        starts_j: Vec<usize>,
        rank: usize,
    ) -> Result<Self, DomainError> {
        for (starts, n, direction) in [
            (&starts_i, number_of_nodes_i, "i"),
            (&starts_j, number_of_nodes_j, "j"),
        ] {
            if starts.len() < 2 || starts[0] != 0 || starts[starts.len() - 1] != n {
                return Err(DomainError::InvalidPartition(format!(
                    "starts in {direction} must run from 0 to {n}"
                )));
            }
            if starts.windows(2).any(|w| w[0] >= w[1]) {
                return Err(DomainError::InvalidPartition(format!(
                    "every process must own at least one column in {direction}"
                )));
            }
        }
        let size = (starts_i.len() - 1) * (starts_j.len() - 1);
        if rank >= size {
            return Err(DomainError::InvalidPartition(format!(
                "rank {rank} is outside a partition of {size} ranks"
            )));
        }
        let grid = Self {
            number_of_nodes_i,
            number_of_nodes_j,
            starts_i,
            starts_j,
            rank,
            defined: vec![true; number_of_nodes_i * number_of_nodes_j],
        };
        if grid.local_element_box().is_none() {
            warn!("Rank {rank} owns no lateral elements.");
        }
        Ok(grid)
    }

    /// Number of node columns in the `i` direction
    pub fn number_of_nodes_i(&self) -> usize {
        self.number_of_nodes_i
    }

    /// Number of node columns in the `j` direction
    pub fn number_of_nodes_j(&self) -> usize {
        self.number_of_nodes_j
    }

    /// The rank this partition was created for
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks in the partition
    pub fn size(&self) -> usize {
        self.processes_i() * self.processes_j()
    }

    /// Number of processes in the `i` direction
    pub fn processes_i(&self) -> usize {
        self.starts_i.len() - 1
    }

    /// Number of processes in the `j` direction
    pub fn processes_j(&self) -> usize {
        self.starts_j.len() - 1
    }

    /// Mark column `(i, j)` as modelled or not
    pub fn set_node_defined(&mut self, i: usize, j: usize, defined: bool) {
        let n = i * self.number_of_nodes_j + j;
        self.defined[n] = defined;
    }

    /// Check if column `(i, j)` is part of the modelled footprint
    pub fn node_is_defined(&self, i: usize, j: usize) -> bool {
        i < self.number_of_nodes_i
            && j < self.number_of_nodes_j
            && self.defined[i * self.number_of_nodes_j + j]
    }

    /// The rank that owns column `(i, j)`
    pub fn owner(&self, i: usize, j: usize) -> usize {
        let pi = self.starts_i.partition_point(|s| *s <= i) - 1;
        let pj = self.starts_j.partition_point(|s| *s <= j) - 1;
        pj * self.processes_i() + pi
    }

    /// The columns owned by `rank`
    pub fn owned_box(&self, rank: usize) -> LateralBox {
        let pi = rank % self.processes_i();
        let pj = rank / self.processes_i();
        LateralBox::new(
            self.starts_i[pi],
            self.starts_i[pi + 1] - 1,
            self.starts_j[pj],
            self.starts_j[pj + 1] - 1,
        )
    }

    /// The columns owned by `rank` together with its ghost halo
    pub fn ghosted_box(&self, rank: usize) -> LateralBox {
        let owned = self.owned_box(rank);
        LateralBox::new(
            owned.first_i.saturating_sub(1),
            (owned.last_i + 1).min(self.number_of_nodes_i - 1),
            owned.first_j.saturating_sub(1),
            (owned.last_j + 1).min(self.number_of_nodes_j - 1),
        )
    }

    /// The lateral elements owned by `rank`.
    ///
    /// Element `(i, j)` spans columns `i..=i + 1` and `j..=j + 1` and belongs
    /// to the owner of column `(i, j)`.
    pub fn element_box(&self, rank: usize) -> Option<LateralBox> {
        if self.number_of_nodes_i < 2 || self.number_of_nodes_j < 2 {
            return None;
        }
        let owned = self.owned_box(rank);
        let last_i = owned.last_i.min(self.number_of_nodes_i - 2);
        let last_j = owned.last_j.min(self.number_of_nodes_j - 2);
        if owned.first_i > last_i || owned.first_j > last_j {
            None
        } else {
            Some(LateralBox::new(owned.first_i, last_i, owned.first_j, last_j))
        }
    }

    /// The columns owned by this rank
    pub fn local_box(&self) -> LateralBox {
        self.owned_box(self.rank)
    }

    /// The columns owned by this rank together with its ghost halo
    pub fn local_ghosted_box(&self) -> LateralBox {
        self.ghosted_box(self.rank)
    }

    /// The lateral elements owned by this rank
    pub fn local_element_box(&self) -> Option<LateralBox> {
        self.element_box(self.rank)
    }

    /// First column of this rank in the `i` direction
    pub fn first_i(&self, include_ghosts: bool) -> usize {
        self.local_range(include_ghosts).first_i
    }

    /// Last column of this rank in the `i` direction
    pub fn last_i(&self, include_ghosts: bool) -> usize {
        self.local_range(include_ghosts).last_i
    }

    /// First column of this rank in the `j` direction
    pub fn first_j(&self, include_ghosts: bool) -> usize {
        self.local_range(include_ghosts).first_j
    }

    /// Last column of this rank in the `j` direction
    pub fn last_j(&self, include_ghosts: bool) -> usize {
        self.local_range(include_ghosts).last_j
    }

    fn local_range(&self, include_ghosts: bool) -> LateralBox {
        if include_ghosts {
            self.local_ghosted_box()
        } else {
            self.local_box()
        }
    }
}
