//! Turning raw command-line tokens into a runnable query.
//!
//! Token layout: `[DATA_FILE] [--flag value]...`. The first token is the
//! data file when it does not start with `--`; every flag must be followed
//! by a value that does not itself start with `--`.

use crate::error::{QueryError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::insights::{GroupSummary, InsightSpec};
use crate::ranking::RankingSpec;
use crate::registry::{FlagAction, FlagRegistry};
use data_loader::MovieRecord;
use std::path::{Path, PathBuf};

const FLAG_PREFIX: &str = "--";

/// How the filtered records are reduced before output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryMode {
    /// Filtered records as they are, in input order
    Filter,
    TopN(RankingSpec),
    Insights(InsightSpec),
}

/// A fully parsed invocation
#[derive(Debug)]
pub struct QueryRequest {
    pub data_file: Option<PathBuf>,
    pub pipeline: FilterPipeline,
    pub mode: QueryMode,
    /// File destination; `None` means console
    pub output: Option<PathBuf>,
}

/// Result rows of a query
#[derive(Debug)]
pub enum QueryResult<'a> {
    Movies(Vec<&'a MovieRecord>),
    Groups(Vec<GroupSummary>),
}

impl QueryResult<'_> {
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Movies(movies) => movies.len(),
            QueryResult::Groups(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct QueryOutcome<'a> {
    /// How many records passed the filters, before ranking or grouping
    pub matched: usize,
    pub result: QueryResult<'a>,
}

impl QueryRequest {
    /// Parse tokens (program name already stripped) against `registry`.
    ///
    /// # Errors
    /// * `UnknownFlag` - flag not in the registry
    /// * `MissingValue` - flag without a value
    /// * `UnexpectedArgument` - bare token where a flag was expected
    /// * `InvalidValue` - value the flag cannot parse
    /// * `ConflictingModes` - more than one of --top-ten / --insights
    /// * `DuplicateFlag` - --output given twice
    pub fn from_args<S: AsRef<str>>(args: &[S], registry: &FlagRegistry) -> Result<Self> {
        let mut request = QueryRequest {
            data_file: None,
            pipeline: FilterPipeline::new(),
            mode: QueryMode::Filter,
            output: None,
        };
        let mut mode_flag: Option<&str> = None;

        let mut tokens = args.iter().map(<S as AsRef<str>>::as_ref).peekable();
        if let Some(first) = tokens.next_if(|token| !token.starts_with(FLAG_PREFIX)) {
            request.data_file = Some(PathBuf::from(first));
        }

        while let Some(flag) = tokens.next() {
            if !flag.starts_with(FLAG_PREFIX) {
                return Err(QueryError::UnexpectedArgument {
                    token: flag.to_string(),
                });
            }
            if !registry.contains(flag) {
                return Err(QueryError::UnknownFlag {
                    flag: flag.to_string(),
                });
            }
            let value = tokens
                .next_if(|value| !value.starts_with(FLAG_PREFIX))
                .ok_or_else(|| QueryError::MissingValue {
                    flag: flag.to_string(),
                })?;

            match registry.build(flag, value)? {
                FlagAction::Filter(predicate) => request.pipeline.push(predicate),
                FlagAction::Rank(spec) => {
                    request.set_mode(&mut mode_flag, flag, QueryMode::TopN(spec))?
                }
                FlagAction::Insight(spec) => {
                    request.set_mode(&mut mode_flag, flag, QueryMode::Insights(spec))?
                }
                FlagAction::Output(path) => {
                    if request.output.is_some() {
                        return Err(QueryError::DuplicateFlag {
                            flag: flag.to_string(),
                        });
                    }
                    request.output = Some(path);
                }
            }
        }

        Ok(request)
    }

    fn set_mode<'a>(
        &mut self,
        mode_flag: &mut Option<&'a str>,
        flag: &'a str,
        mode: QueryMode,
    ) -> Result<()> {
        if let Some(first) = mode_flag {
            return Err(QueryError::ConflictingModes {
                first: first.to_string(),
                second: flag.to_string(),
            });
        }
        *mode_flag = Some(flag);
        self.mode = mode;
        Ok(())
    }

    /// Data file from the command line, or `default` when none was given
    pub fn data_file_or<'a>(&'a self, default: &'a Path) -> &'a Path {
        self.data_file.as_deref().unwrap_or(default)
    }

    pub fn has_filters(&self) -> bool {
        !self.pipeline.is_empty()
    }

    /// Filter `records`, then rank or group according to the mode
    pub fn run<'a>(&self, records: &'a [MovieRecord]) -> QueryOutcome<'a> {
        let matched = self.pipeline.collect(records);
        let count = matched.len();

        let result = match self.mode {
            QueryMode::Filter => QueryResult::Movies(matched),
            QueryMode::TopN(spec) => QueryResult::Movies(spec.rank(matched)),
            QueryMode::Insights(spec) => QueryResult::Groups(spec.summarize(matched)),
        };

        QueryOutcome {
            matched: count,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::RankingKey;

    fn parse(args: &[&str]) -> Result<QueryRequest> {
        QueryRequest::from_args(args, &FlagRegistry::standard())
    }

    #[test]
    fn test_no_arguments() {
        let request = parse(&[]).unwrap();
        assert!(request.data_file.is_none());
        assert!(!request.has_filters());
        assert_eq!(request.mode, QueryMode::Filter);
        assert!(request.output.is_none());
        assert_eq!(
            request.data_file_or(Path::new("default.csv")),
            Path::new("default.csv")
        );
    }

    #[test]
    fn test_data_file_and_flags() {
        let request = parse(&["movies.csv", "--title", "rain", "--actor", "Tom Cruise"]).unwrap();
        assert_eq!(request.data_file, Some(PathBuf::from("movies.csv")));
        assert_eq!(request.pipeline.len(), 2);
    }

    #[test]
    fn test_mode_and_output() {
        let request = parse(&["--top-ten", "most-popular", "--output", "top.json"]).unwrap();
        assert_eq!(
            request.mode,
            QueryMode::TopN(RankingSpec::new(RankingKey::MostPopular))
        );
        assert_eq!(request.output, Some(PathBuf::from("top.json")));
    }

    #[test]
    fn test_conflicting_modes() {
        let err = parse(&["--top-ten", "highest-rated", "--insights", "year"]).unwrap_err();
        assert_eq!(
            err,
            QueryError::ConflictingModes {
                first: "--top-ten".to_string(),
                second: "--insights".to_string(),
            }
        );
        assert!(matches!(
            parse(&["--insights", "year", "--insights", "genre"]),
            Err(QueryError::ConflictingModes { .. })
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(
            parse(&["--title"]).unwrap_err(),
            QueryError::MissingValue { flag: "--title".to_string() }
        );
        assert_eq!(
            parse(&["--title", "--actor", "x"]).unwrap_err(),
            QueryError::MissingValue { flag: "--title".to_string() }
        );
        assert_eq!(
            parse(&["movies.csv", "stray"]).unwrap_err(),
            QueryError::UnexpectedArgument { token: "stray".to_string() }
        );
        assert_eq!(
            parse(&["--colour", "red"]).unwrap_err(),
            QueryError::UnknownFlag { flag: "--colour".to_string() }
        );
        assert!(matches!(
            parse(&["--output", "a.csv", "--output", "b.csv"]),
            Err(QueryError::DuplicateFlag { .. })
        ));
    }

    #[test]
    fn test_run_filters_then_ranks() {
        let mut low = MovieRecord::new("Low", 6.0, 100);
        low.year = Some(2001);
        let mut high = MovieRecord::new("High", 9.0, 100);
        high.year = Some(2002);
        let mut old = MovieRecord::new("Old", 9.5, 100);
        old.year = Some(1950);
        let records = vec![low, high, old];

        let request = parse(&["--year-after", "2000", "--top-ten", "highest-rated"]).unwrap();
        let outcome = request.run(&records);

        assert_eq!(outcome.matched, 2);
        match outcome.result {
            QueryResult::Movies(movies) => {
                let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
                assert_eq!(titles, vec!["High", "Low"]);
            }
            QueryResult::Groups(_) => panic!("expected movies"),
        }
    }
}
