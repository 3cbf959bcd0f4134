//! Flag registry: one `FlagHandler` per supported `--flag`, keyed by name.
//!
//! New flags are added by registering another handler; nothing else in the
//! query path branches on flag names.

use crate::error::{QueryError, Result};
use crate::fields::NumericField;
use crate::filters::{Comparison, NumericThreshold, TextMatch, TextPredicate};
use crate::insights::InsightSpec;
use crate::ranking::{RankingKey, RankingSpec};
use crate::traits::{FlagHandler, Predicate};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What a flag contributes to the query
pub enum FlagAction {
    Filter(Box<dyn Predicate>),
    Rank(RankingSpec),
    Insight(InsightSpec),
    Output(PathBuf),
}

impl std::fmt::Debug for FlagAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagAction::Filter(p) => f.debug_tuple("Filter").field(&p.name()).finish(),
            FlagAction::Rank(spec) => f.debug_tuple("Rank").field(spec).finish(),
            FlagAction::Insight(spec) => f.debug_tuple("Insight").field(spec).finish(),
            FlagAction::Output(path) => f.debug_tuple("Output").field(path).finish(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Text flag (`--title`, `--actor`, ...)
pub struct TextFlag {
    pub flag: &'static str,
    pub help: &'static str,
    pub kind: TextMatch,
}

impl FlagHandler for TextFlag {
    fn flag(&self) -> &'static str {
        self.flag
    }

    fn value_name(&self) -> &'static str {
        "TEXT"
    }

    fn help(&self) -> &'static str {
        self.help
    }

    fn build(&self, value: &str) -> Result<FlagAction> {
        let needle = value.trim();
        if needle.is_empty() {
            return Err(QueryError::invalid(self.flag, value, "expected non-empty text"));
        }
        Ok(FlagAction::Filter(Box::new(TextPredicate::new(self.kind, needle))))
    }
}

/// Numeric threshold flag (`--year-after`, `--votes`, ...)
pub struct ThresholdFlag {
    pub flag: &'static str,
    pub help: &'static str,
    pub field: NumericField,
    pub comparison: Comparison,
}

impl ThresholdFlag {
    fn parse_bound(&self, value: &str) -> Result<f64> {
        let text = value.trim();
        if self.field.is_integral() {
            text.parse::<i64>()
                .map(|n| n as f64)
                .map_err(|_| QueryError::invalid(self.flag, value, "expected a whole number"))
        } else {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(QueryError::invalid(self.flag, value, "expected a number")),
            }
        }
    }
}

impl FlagHandler for ThresholdFlag {
    fn flag(&self) -> &'static str {
        self.flag
    }

    fn value_name(&self) -> &'static str {
        "NUMBER"
    }

    fn help(&self) -> &'static str {
        self.help
    }

    fn build(&self, value: &str) -> Result<FlagAction> {
        let bound = self.parse_bound(value)?;
        Ok(FlagAction::Filter(Box::new(NumericThreshold::new(
            self.field,
            self.comparison,
            bound,
        ))))
    }
}

/// `--top-ten <key>`
pub struct TopTenFlag;

impl FlagHandler for TopTenFlag {
    fn flag(&self) -> &'static str {
        "--top-ten"
    }

    fn value_name(&self) -> &'static str {
        "KEY"
    }

    fn help(&self) -> &'static str {
        "top 10 by highest-rated | lowest-rated | most-popular | highest-grossing | longest-runtime | best-meta-score | hidden-gems"
    }

    fn build(&self, value: &str) -> Result<FlagAction> {
        let key = RankingKey::parse(value).ok_or_else(|| {
            let known: Vec<&str> = RankingKey::ALL.iter().map(|k| k.name()).collect();
            QueryError::invalid(self.flag(), value, format!("expected one of {}", known.join(", ")))
        })?;
        Ok(FlagAction::Rank(RankingSpec::new(key)))
    }
}

/// `--insights <group>[:<aggregation>]`
pub struct InsightsFlag;

impl FlagHandler for InsightsFlag {
    fn flag(&self) -> &'static str {
        "--insights"
    }

    fn value_name(&self) -> &'static str {
        "GROUP[:AGG]"
    }

    fn help(&self) -> &'static str {
        "group by year | genre | genre-by-year; AGG is summary (default) | count | avg-<field>"
    }

    fn build(&self, value: &str) -> Result<FlagAction> {
        InsightSpec::parse(value)
            .map(FlagAction::Insight)
            .ok_or_else(|| {
                QueryError::invalid(
                    self.flag(),
                    value,
                    "expected year, genre or genre-by-year, optionally followed by :count, :summary or :avg-<field>",
                )
            })
    }
}

/// `--output <path>`
pub struct OutputFlag;

impl FlagHandler for OutputFlag {
    fn flag(&self) -> &'static str {
        "--output"
    }

    fn value_name(&self) -> &'static str {
        "FILE"
    }

    fn help(&self) -> &'static str {
        "write all fields to FILE (.json, .csv, otherwise plain text) instead of the console"
    }

    fn build(&self, value: &str) -> Result<FlagAction> {
        let path = value.trim();
        if path.is_empty() {
            return Err(QueryError::invalid(self.flag(), value, "expected a file path"));
        }
        Ok(FlagAction::Output(PathBuf::from(path)))
    }
}

// =============================================================================
// FlagRegistry
// =============================================================================

/// Map from flag name to its handler
pub struct FlagRegistry {
    handlers: BTreeMap<&'static str, Box<dyn FlagHandler>>,
}

impl FlagRegistry {
    /// Registry with no flags
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Add a handler (builder pattern). A later handler for the same flag
    /// replaces the earlier one.
    pub fn register(mut self, handler: impl FlagHandler + 'static) -> Self {
        self.handlers.insert(handler.flag(), Box::new(handler));
        self
    }

    /// Every flag the `movie-query` binary understands
    pub fn standard() -> Self {
        use Comparison::{Above, AtLeast, Below};
        use NumericField::{Gross, MetaScore, Rating, Runtime, Votes, Year};

        let text = |flag, help, kind| TextFlag { flag, help, kind };
        let threshold = |flag, help, field, comparison| ThresholdFlag {
            flag,
            help,
            field,
            comparison,
        };

        Self::new()
            .register(text("--title", "title contains TEXT", TextMatch::TitleContains))
            .register(text("--actor", "TEXT is one of the top-billed actors", TextMatch::CastMember))
            .register(text("--director", "directed by TEXT", TextMatch::Director))
            .register(text("--genre", "TEXT is one of the movie's genres", TextMatch::Genre))
            .register(text("--age-rating", "certificate equals TEXT (e.g. PG-13)", TextMatch::AgeRating))
            .register(threshold("--year-after", "released after year", Year, Above))
            .register(threshold("--year-before", "released before year", Year, Below))
            .register(threshold("--rating", "IMDb rating at least", Rating, AtLeast))
            .register(threshold("--rating-above", "IMDb rating above", Rating, Above))
            .register(threshold("--rating-below", "IMDb rating below", Rating, Below))
            .register(threshold("--meta-score", "meta score at least", MetaScore, AtLeast))
            .register(threshold("--score-above", "meta score above", MetaScore, Above))
            .register(threshold("--score-below", "meta score below", MetaScore, Below))
            .register(threshold("--votes", "vote count at least", Votes, AtLeast))
            .register(threshold("--votes-above", "vote count above", Votes, Above))
            .register(threshold("--votes-below", "vote count below", Votes, Below))
            .register(threshold("--runtime-above", "runtime above (minutes)", Runtime, Above))
            .register(threshold("--runtime-below", "runtime below (minutes)", Runtime, Below))
            .register(threshold("--gross-above", "gross revenue above (USD)", Gross, Above))
            .register(threshold("--gross-below", "gross revenue below (USD)", Gross, Below))
            .register(TopTenFlag)
            .register(InsightsFlag)
            .register(OutputFlag)
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.handlers.contains_key(flag)
    }

    /// Resolve `flag` and build its action from `value`
    pub fn build(&self, flag: &str, value: &str) -> Result<FlagAction> {
        let handler = self
            .handlers
            .get(flag)
            .ok_or_else(|| QueryError::UnknownFlag {
                flag: flag.to_string(),
            })?;
        handler.build(value)
    }

    /// Usage lines, one per flag, sorted by flag name
    pub fn help_text(&self) -> String {
        let width = self
            .handlers
            .values()
            .map(|h| h.flag().len() + h.value_name().len() + 1)
            .max()
            .unwrap_or(0);

        self.handlers
            .values()
            .map(|h| {
                let usage = format!("{} {}", h.flag(), h.value_name());
                format!("  {:<width$}  {}\n", usage, h.help(), width = width)
            })
            .collect()
    }
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;

    fn build_filter(registry: &FlagRegistry, flag: &str, value: &str) -> Box<dyn Predicate> {
        match registry.build(flag, value).unwrap() {
            FlagAction::Filter(predicate) => predicate,
            other => panic!("expected a filter for {flag}, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_flag() {
        let registry = FlagRegistry::standard();
        let err = registry.build("--budget", "10").unwrap_err();
        assert_eq!(err, QueryError::UnknownFlag { flag: "--budget".to_string() });
    }

    #[test]
    fn test_invalid_numeric_values() {
        let registry = FlagRegistry::standard();

        assert!(matches!(
            registry.build("--year-after", "nineteen-ninety"),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            registry.build("--votes", "10.5"),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            registry.build("--rating", "NaN"),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(registry.build("--rating", "8.5").is_ok());
    }

    #[test]
    fn test_filter_flags_build_predicates() {
        let registry = FlagRegistry::standard();
        let mut movie = MovieRecord::new("The Rainmaker", 7.2, 70_000);
        movie.year = Some(1997);
        movie.age_rating = Some("PG-13".to_string());

        assert!(build_filter(&registry, "--title", "RAIN").matches(&movie));
        assert!(build_filter(&registry, "--year-after", "1990").matches(&movie));
        assert!(!build_filter(&registry, "--year-before", "1990").matches(&movie));
        assert!(build_filter(&registry, "--age-rating", "pg-13").matches(&movie));
        assert!(build_filter(&registry, "--votes", "70000").matches(&movie));
        assert!(!build_filter(&registry, "--votes-above", "70000").matches(&movie));
        assert!(!build_filter(&registry, "--gross-above", "0").matches(&movie));
    }

    #[test]
    fn test_mode_and_output_flags() {
        let registry = FlagRegistry::standard();

        match registry.build("--top-ten", "hidden-gems").unwrap() {
            FlagAction::Rank(spec) => assert_eq!(spec.key, RankingKey::HiddenGems),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            registry.build("--insights", "year").unwrap(),
            FlagAction::Insight(_)
        ));
        assert!(matches!(
            registry.build("--output", "out.json").unwrap(),
            FlagAction::Output(_)
        ));
        assert!(matches!(
            registry.build("--top-ten", "cheapest"),
            Err(QueryError::InvalidValue { .. })
        ));
        assert!(matches!(
            registry.build("--title", "   "),
            Err(QueryError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_ranking_direction_comes_from_key() {
        use crate::ranking::Direction;
        let registry = FlagRegistry::standard();

        let direction = |key: &str| match registry.build("--top-ten", key).unwrap() {
            FlagAction::Rank(spec) => spec.direction,
            other => panic!("unexpected {other:?}"),
        };

        assert_eq!(direction("lowest-rated"), Direction::Ascending);
        assert_eq!(direction("highest-rated"), Direction::Descending);
        assert_eq!(direction("hidden-gems"), Direction::Descending);
    }

    #[test]
    fn test_custom_registration() {
        let registry = FlagRegistry::new().register(TextFlag {
            flag: "--starring",
            help: "alias for --actor",
            kind: TextMatch::CastMember,
        });

        assert!(registry.contains("--starring"));
        assert!(!registry.contains("--actor"));
        assert!(registry.help_text().contains("--starring TEXT"));
    }
}
