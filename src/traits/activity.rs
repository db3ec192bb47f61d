//! Element activity
use crate::grid::GeneralElement;
use crate::traits::Formation;

/// Decides whether an element is part of the active domain at an age.
pub trait ElementActivityPredicate {
    /// Check if `element` of `formation` is active at `age`
    fn is_active(&self, formation: &dyn Formation, element: &GeneralElement, age: f64) -> bool;
}

impl<F> ElementActivityPredicate for F
where
    F: Fn(&dyn Formation, &GeneralElement, f64) -> bool,
{
    fn is_active(&self, formation: &dyn Formation, element: &GeneralElement, age: f64) -> bool {
        self(formation, element, age)
    }
}
