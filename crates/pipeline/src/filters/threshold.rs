//! Numeric threshold predicates (year-after, rating-at-least, gross-below, ...).

use crate::fields::NumericField;
use crate::traits::Predicate;
use data_loader::MovieRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// value > bound
    Above,
    /// value < bound
    Below,
    /// value >= bound
    AtLeast,
}

impl Comparison {
    fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            Comparison::Above => value > bound,
            Comparison::Below => value < bound,
            Comparison::AtLeast => value >= bound,
        }
    }
}

/// Keeps records whose `field` compares against `bound`.
///
/// Records without the field are dropped.
pub struct NumericThreshold {
    name: String,
    field: NumericField,
    comparison: Comparison,
    bound: f64,
}

impl NumericThreshold {
    pub fn new(field: NumericField, comparison: Comparison, bound: f64) -> Self {
        Self {
            name: format!("{:?}{:?}", field, comparison),
            field,
            comparison,
            bound,
        }
    }
}

impl Predicate for NumericThreshold {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, movie: &MovieRecord) -> bool {
        self.field
            .value(movie)
            .is_some_and(|value| self.comparison.holds(value, self.bound))
    }
}
