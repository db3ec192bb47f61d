//! Layers with a prescribed thickness history
use crate::traits::Formation;
use crate::types::LayerKind;

/// A layer whose segments grow linearly over prescribed deposition intervals.
///
/// Each segment has a present-day thickness per lateral column and an
/// interval `(start, end)` of ages during which it is deposited: it has no
/// thickness at ages at or before `start` and its full thickness from `end`
/// onwards. The depth of a node is the depth of the top of the layer plus the
/// present-day thickness of every segment above it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThicknessHistoryLayer {
    name: String,
    kind: LayerKind,
    number_of_nodes_i: usize,
    number_of_nodes_j: usize,
    segments: usize,
    thickness: Vec<f64>,
    intervals: Vec<(f64, f64)>,
    top_depth: f64,
}

impl ThicknessHistoryLayer {
    /// Create a layer of uniform thickness.
    ///
    /// The deposition interval `[start_age, end_age]` is split evenly between
    /// the segments, deepest first. Every segment has thickness `thickness`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        kind: LayerKind,
        start_age: f64,
        end_age: f64,
        number_of_nodes_i: usize,
        number_of_nodes_j: usize,
        segments: usize,
        thickness: f64,
    ) -> Self {
        let step = if segments > 0 {
            (start_age - end_age) / segments as f64
        } else {
            0.0
        };
        let intervals = (0..segments)
            .map(|k| {
                (
                    start_age - k as f64 * step,
                    start_age - (k + 1) as f64 * step,
                )
            })
            .collect();
        Self {
            name: name.to_string(),
            kind,
            number_of_nodes_i,
            number_of_nodes_j,
            segments,
            thickness: vec![thickness; number_of_nodes_i * number_of_nodes_j * segments],
            intervals,
            top_depth: 0.0,
        }
    }

    /// Set the depth of the top of the layer
    pub fn with_top_depth(mut self, top_depth: f64) -> Self {
        self.top_depth = top_depth;
        self
    }

    /// Set the present-day thickness of segment `k` of column `(i, j)`
    pub fn set_thickness(&mut self, i: usize, j: usize, k: usize, thickness: f64) {
        let index = self.index(i, j, k);
        self.thickness[index] = thickness;
    }

    /// Set the present-day thickness of every segment of column `(i, j)`
    pub fn set_column_thickness(&mut self, i: usize, j: usize, thickness: f64) {
        for k in 0..self.segments {
            self.set_thickness(i, j, k, thickness);
        }
    }

    /// Set the deposition interval of segment `k`
    pub fn set_deposition_interval(&mut self, k: usize, start_age: f64, end_age: f64) {
        self.intervals[k] = (start_age, end_age);
    }

    /// The deposition interval of segment `k`
    pub fn deposition_interval(&self, k: usize) -> (f64, f64) {
        self.intervals[k]
    }

    /// The present-day thickness of segment `k` of column `(i, j)`
    pub fn thickness(&self, i: usize, j: usize, k: usize) -> f64 {
        self.thickness[self.index(i, j, k)]
    }

    fn index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.number_of_nodes_i && j < self.number_of_nodes_j && k < self.segments);
        (i * self.number_of_nodes_j + j) * self.segments + k
    }
}

impl Formation for ThicknessHistoryLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn deposition_start_age(&self) -> f64 {
        self.intervals
            .iter()
            .map(|(start, _)| *start)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn number_of_segments(&self) -> usize {
        self.segments
    }

    fn depositing_thickness(&self, i: usize, j: usize, k: usize, age: f64) -> f64 {
        let (start, end) = self.intervals[k];
        let thickness = self.thickness(i, j, k);
        if age >= start {
            0.0
        } else if age <= end {
            thickness
        } else {
            thickness * (start - age) / (start - end)
        }
    }

    fn depth(&self, i: usize, j: usize, k: usize) -> f64 {
        self.top_depth
            + (k..self.segments)
                .map(|m| self.thickness(i, j, m))
                .sum::<f64>()
    }
}
