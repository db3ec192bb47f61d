//! Element activity predicates
use crate::grid::GeneralElement;
use crate::traits::{ElementActivityPredicate, Formation};
use crate::types::{LayerKind, DEPOSITING_THICKNESS_TOLERANCE};

/// Active if the element is valid and thicker than a tolerance at any of its
/// four corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementThicknessActivityPredicate {
    tolerance: f64,
}

impl ElementThicknessActivityPredicate {
    /// Create a predicate
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// The thickness tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for ElementThicknessActivityPredicate {
    fn default() -> Self {
        Self::new(DEPOSITING_THICKNESS_TOLERANCE)
    }
}

impl ElementActivityPredicate for ElementThicknessActivityPredicate {
    fn is_active(&self, formation: &dyn Formation, element: &GeneralElement, age: f64) -> bool {
        element.is_valid()
            && element
                .corner_columns()
                .any(|(i, j)| formation.segment_thickness(i, j, element.k(), age) > self.tolerance)
    }
}

/// Active if the element belongs to a sediment layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SedimentElementActivityPredicate;

impl ElementActivityPredicate for SedimentElementActivityPredicate {
    fn is_active(&self, formation: &dyn Formation, _element: &GeneralElement, _age: f64) -> bool {
        formation.kind() == LayerKind::Sediment
    }
}

/// Active if every one of its predicates is active.
///
/// An empty composite accepts every element.
#[derive(Default)]
pub struct CompositeActivityPredicate<'a> {
    predicates: Vec<Box<dyn ElementActivityPredicate + 'a>>,
}

impl<'a> CompositeActivityPredicate<'a> {
    /// Create an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate
    pub fn compose(mut self, predicate: impl ElementActivityPredicate + 'a) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Number of predicates
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Check if the composite has no predicates
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<'a> ElementActivityPredicate for CompositeActivityPredicate<'a> {
    fn is_active(&self, formation: &dyn Formation, element: &GeneralElement, age: f64) -> bool {
        self.predicates
            .iter()
            .all(|p| p.is_active(formation, element, age))
    }
}
