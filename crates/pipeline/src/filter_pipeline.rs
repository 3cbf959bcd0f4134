//! The FilterPipeline holds the conjunction of all predicates in a query.
//!
//! Records are streamed through lazily and keep their input order, so two
//! runs over the same file always produce the same sequence.

use crate::traits::Predicate;
use data_loader::MovieRecord;
use tracing;

/// AND of every predicate added to it.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_predicate(TextPredicate::new(TextMatch::TitleContains, "rain"))
///     .add_predicate(NumericThreshold::new(NumericField::Year, Comparison::Above, 1990.0));
///
/// let matching: Vec<&MovieRecord> = pipeline.apply(store.records()).collect();
/// ```
pub struct FilterPipeline {
    predicates: Vec<Box<dyn Predicate>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline. It matches every record.
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Add a predicate to the pipeline (builder pattern).
    pub fn add_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Add an already boxed predicate, as produced by the flag registry
    pub fn push(&mut self, predicate: Box<dyn Predicate>) {
        self.predicates.push(predicate);
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Names of the predicates in insertion order
    pub fn predicate_names(&self) -> Vec<&str> {
        self.predicates.iter().map(|p| p.name()).collect()
    }

    /// True when every predicate accepts `movie`
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(movie))
    }

    /// Lazily yield the records that satisfy every predicate, in input order
    pub fn apply<'a>(
        &'a self,
        records: &'a [MovieRecord],
    ) -> impl Iterator<Item = &'a MovieRecord> + 'a {
        records.iter().filter(move |movie| self.matches(movie))
    }

    /// Materialize `apply` and log the input and output counts
    pub fn collect<'a>(&self, records: &'a [MovieRecord]) -> Vec<&'a MovieRecord> {
        tracing::debug!(
            "Applying {} predicates {:?} (input count: {})",
            self.predicates.len(),
            self.predicate_names(),
            records.len()
        );
        let matched: Vec<&'a MovieRecord> = records
            .iter()
            .filter(|movie| self.matches(movie))
            .collect();
        tracing::debug!("Filter pipeline done (output count: {})", matched.len());
        matched
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("predicates", &self.predicate_names())
            .finish()
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
