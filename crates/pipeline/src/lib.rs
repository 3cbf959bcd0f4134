//! Query pipeline for the movie dataset.
//!
//! This crate provides:
//! - Predicate trait and implementations for record filtering
//! - FlagRegistry mapping each `--flag` to a FlagHandler
//! - FilterPipeline for composing predicates
//! - Top-N ranking and grouped insights over the filtered set
//!
//! ## Architecture
//! A query is processed in stages:
//! 1. `QueryRequest::from_args` resolves every flag through the registry
//! 2. The FilterPipeline keeps records matching all predicates, in order
//! 3. Optionally a RankingSpec or InsightSpec reduces the matches
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FlagRegistry, QueryRequest};
//!
//! let registry = FlagRegistry::standard();
//! let request = QueryRequest::from_args(&["--title", "rain", "--year-after", "1990"], &registry)?;
//! let outcome = request.run(store.records());
//! println!("{} movies matched", outcome.matched);
//! ```

pub mod error;
pub mod fields;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod ranking;
pub mod insights;
pub mod registry;
pub mod query;

// Re-export main types
pub use error::{QueryError, Result};
pub use fields::NumericField;
pub use traits::{FlagHandler, Predicate};
pub use filter_pipeline::FilterPipeline;
pub use ranking::{Direction, RankingKey, RankingSpec, TOP_N_LIMIT};
pub use insights::{Aggregation, FieldAverage, GroupBy, GroupKey, GroupSummary, InsightSpec};
pub use registry::{FlagAction, FlagRegistry};
pub use query::{QueryMode, QueryOutcome, QueryRequest, QueryResult};
