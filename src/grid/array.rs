//! Dense three-dimensional arrays over a lateral box
use crate::grid::LateralBox;
use std::ops::{Index, IndexMut};

/// A dense array indexed by global `[i, j, k]`.
///
/// The lateral indices are global column indices inside the array's box; `k`
/// runs from 0 to `length_k - 1`. Each column is stored contiguously.
#[derive(Debug, Clone, PartialEq)]
pub struct Array3<T> {
    lateral: LateralBox,
    length_k: usize,
    data: Vec<T>,
}

impl<T: Copy> Array3<T> {
    /// Create an array with every entry set to `value`
    pub fn new(lateral: LateralBox, length_k: usize, value: T) -> Self {
        Self {
            lateral,
            length_k,
            data: vec![value; lateral.len() * length_k],
        }
    }

    /// The lateral box covered by the array
    pub fn lateral_box(&self) -> &LateralBox {
        &self.lateral
    }

    /// Number of entries in depth
    pub fn length_k(&self) -> usize {
        self.length_k
    }

    /// Set every entry to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Get an entry, or `None` if the index is outside the array
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<T> {
        if self.lateral.contains(i, j) && k < self.length_k {
            Some(self.data[self.offset(i, j, k)])
        } else {
            None
        }
    }

    /// The entries of column `(i, j)`, from `k = 0` upwards
    pub fn column(&self, i: usize, j: usize) -> &[T] {
        let start = self.offset(i, j, 0);
        &self.data[start..start + self.length_k]
    }

    /// Mutable entries of column `(i, j)`, from `k = 0` upwards
    pub fn column_mut(&mut self, i: usize, j: usize) -> &mut [T] {
        let start = self.offset(i, j, 0);
        &mut self.data[start..start + self.length_k]
    }

    /// All entries, column by column
    pub fn data(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(self.lateral.contains(i, j));
        debug_assert!(k < self.length_k || (k == 0 && self.length_k == 0));
        ((i - self.lateral.first_i) * self.lateral.length_j() + (j - self.lateral.first_j))
            * self.length_k
            + k
    }
}

impl<T: Copy> Index<[usize; 3]> for Array3<T> {
    type Output = T;

    fn index(&self, [i, j, k]: [usize; 3]) -> &T {
        &self.data[self.offset(i, j, k)]
    }
}

impl<T: Copy> IndexMut<[usize; 3]> for Array3<T> {
    fn index_mut(&mut self, [i, j, k]: [usize; 3]) -> &mut T {
        let n = self.offset(i, j, k);
        &mut self.data[n]
    }
}
