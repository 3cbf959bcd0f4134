//! Core traits for the query pipeline.
//!
//! `Predicate` is a single filter over records. `FlagHandler` is the
//! strategy object behind one command-line flag: it turns the flag's value
//! into a `FlagAction` (a predicate, a ranking, an insight or an output
//! destination).

use crate::error::Result;
use crate::registry::FlagAction;
use data_loader::MovieRecord;

/// A pure test over one record.
///
/// ## Design Note
/// - Absent fields make the record non-matching; `matches` never fails
/// - `Send + Sync` so a built pipeline can be shared if ever needed
pub trait Predicate: Send + Sync {
    /// Returns the name of this predicate (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `movie` satisfies this predicate
    fn matches(&self, movie: &MovieRecord) -> bool;
}

/// Behavior attached to one `--flag` name.
pub trait FlagHandler: Send + Sync {
    /// Flag as typed on the command line, including the leading `--`
    fn flag(&self) -> &'static str;

    /// Placeholder for the value in usage text, e.g. `YEAR`
    fn value_name(&self) -> &'static str;

    /// One-line description for usage text
    fn help(&self) -> &'static str;

    /// Parse `value` into this flag's action.
    ///
    /// # Returns
    /// * `Ok(FlagAction)` - What the query should do with the flag
    /// * `Err(QueryError::InvalidValue)` - If the value does not parse
    fn build(&self, value: &str) -> Result<FlagAction>;
}
