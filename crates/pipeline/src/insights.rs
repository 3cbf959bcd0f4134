//! Grouped insight statistics over a filtered record set.
//!
//! `--insights year` prints one row per release year with the movie count
//! and average rating, gross and runtime. The aggregation can be narrowed
//! with a suffix: `year:count`, `genre:avg-meta-score`.
//!
//! Every record lands in exactly one group, so group counts add up to the
//! number of records.

use crate::fields::NumericField;
use data_loader::MovieRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Fields averaged by the default `summary` aggregation
const SUMMARY_FIELDS: [NumericField; 3] = [
    NumericField::Rating,
    NumericField::Gross,
    NumericField::Runtime,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupBy {
    Year,
    /// The movie's full genre list, e.g. "Crime, Drama"
    Genre,
    GenreByYear,
}

impl GroupBy {
    pub fn name(self) -> &'static str {
        match self {
            GroupBy::Year => "year",
            GroupBy::Genre => "genre",
            GroupBy::GenreByYear => "genre-by-year",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [GroupBy::Year, GroupBy::Genre, GroupBy::GenreByYear]
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(name))
    }

    /// The single key `movie` belongs to under this grouping
    fn key(self, movie: &MovieRecord) -> GroupKey {
        match self {
            GroupBy::Year => GroupKey::Year(movie.year),
            GroupBy::Genre => GroupKey::Genre(genre_list(movie)),
            GroupBy::GenreByYear => GroupKey::GenreYear(genre_list(movie), movie.year),
        }
    }
}

/// Case-folded genre name: "sci-fi" and "Sci-Fi" share a group
fn normalize_genre(genre: &str) -> String {
    let mut out = String::with_capacity(genre.len());
    let mut word_start = true;
    for c in genre.trim().chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = !c.is_alphanumeric();
    }
    out
}

/// Every genre of `movie`, normalized, in dataset order
fn genre_list(movie: &MovieRecord) -> String {
    movie
        .genres
        .iter()
        .map(|g| normalize_genre(g))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Aggregation {
    /// Count plus average rating, gross and runtime
    Summary,
    Count,
    Average(NumericField),
}

impl Aggregation {
    /// `summary`, `count` or `avg-<field>`
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "summary" => Some(Aggregation::Summary),
            "count" => Some(Aggregation::Count),
            other => other
                .strip_prefix("avg-")
                .and_then(NumericField::parse)
                .map(Aggregation::Average),
        }
    }

    fn fields(self) -> Vec<NumericField> {
        match self {
            Aggregation::Summary => SUMMARY_FIELDS.to_vec(),
            Aggregation::Count => Vec::new(),
            Aggregation::Average(field) => vec![field],
        }
    }
}

/// Group a summary row belongs to. Ordered ascending; unknown years and
/// movies without genres come first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKey {
    Year(Option<u16>),
    Genre(String),
    GenreYear(String, Option<u16>),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = |y: &Option<u16>| y.map_or_else(|| "unknown".to_string(), |y| y.to_string());
        let genre = |g: &String| if g.is_empty() { "unknown".to_string() } else { g.clone() };
        match self {
            GroupKey::Year(y) => write!(f, "{}", year(y)),
            GroupKey::Genre(g) => write!(f, "{}", genre(g)),
            GroupKey::GenreYear(g, y) => write!(f, "{} {}", genre(g), year(y)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAverage {
    pub field: NumericField,
    /// `None` when no record in the group has the field
    pub value: Option<f64>,
}

/// One output row of an insight query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub count: usize,
    pub averages: Vec<FieldAverage>,
}

impl GroupSummary {
    pub fn average(&self, field: NumericField) -> Option<f64> {
        self.averages
            .iter()
            .find(|avg| avg.field == field)
            .and_then(|avg| avg.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsightSpec {
    pub group_by: GroupBy,
    pub aggregation: Aggregation,
}

impl InsightSpec {
    pub fn new(group_by: GroupBy, aggregation: Aggregation) -> Self {
        Self {
            group_by,
            aggregation,
        }
    }

    /// `<group>` or `<group>:<aggregation>`, e.g. `year`, `genre:avg-gross`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (group, aggregation) = match value.split_once(':') {
            Some((group, aggregation)) => (group, Aggregation::parse(aggregation.trim())?),
            None => (value, Aggregation::Summary),
        };
        Some(Self::new(GroupBy::parse(group.trim())?, aggregation))
    }

    /// Group `movies` and compute the aggregation for each group.
    ///
    /// # Returns
    /// One summary per distinct key, ordered by key ascending. Empty input
    /// gives an empty vector.
    pub fn summarize<'a, I>(&self, movies: I) -> Vec<GroupSummary>
    where
        I: IntoIterator<Item = &'a MovieRecord>,
    {
        let mut groups: BTreeMap<GroupKey, Vec<&MovieRecord>> = BTreeMap::new();
        for movie in movies {
            groups.entry(self.group_by.key(movie)).or_default().push(movie);
        }

        let fields = self.aggregation.fields();
        let summaries: Vec<GroupSummary> = groups
            .into_iter()
            .map(|(key, members)| GroupSummary {
                count: members.len(),
                averages: fields
                    .iter()
                    .map(|&field| FieldAverage {
                        field,
                        value: average(&members, field),
                    })
                    .collect(),
                key,
            })
            .collect();

        tracing::debug!(
            "Grouped by {} (group count: {})",
            self.group_by.name(),
            summaries.len()
        );
        summaries
    }
}

/// Mean of `field` over the members that have it
fn average(members: &[&MovieRecord], field: NumericField) -> Option<f64> {
    let (sum, n) = members
        .iter()
        .filter_map(|movie| field.value(movie))
        .fold((0.0, 0usize), |(sum, n), value| (sum + value, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}
