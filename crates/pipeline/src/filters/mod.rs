//! Predicate implementations for the filter pipeline.
//!
//! Every filter flag in the registry builds one of these.

pub mod text;
pub mod threshold;

// Re-export for convenience
pub use text::{TextMatch, TextPredicate};
pub use threshold::{Comparison, NumericThreshold};
