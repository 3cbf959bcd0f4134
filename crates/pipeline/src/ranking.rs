//! Top-N ranking of a filtered record set.
//!
//! ## Algorithm
//! 1. Drop records the key cannot rank (missing field, zero votes for
//!    hidden gems)
//! 2. Compute the sort value of each remaining record
//! 3. Stable sort by that value, so ties keep input order
//! 4. Truncate to the limit (never more than `TOP_N_LIMIT`)

use crate::fields::NumericField;
use data_loader::MovieRecord;
use serde::Serialize;
use std::fmt;

/// Largest result a top-N query can return
pub const TOP_N_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// What a top-N list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingKey {
    HighestRated,
    LowestRated,
    MostPopular,
    HighestGrossing,
    LongestRuntime,
    BestMetaScore,
    /// Rating divided by vote count: well rated but rarely voted on
    HiddenGems,
}

impl RankingKey {
    pub const ALL: [RankingKey; 7] = [
        RankingKey::HighestRated,
        RankingKey::LowestRated,
        RankingKey::MostPopular,
        RankingKey::HighestGrossing,
        RankingKey::LongestRuntime,
        RankingKey::BestMetaScore,
        RankingKey::HiddenGems,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RankingKey::HighestRated => "highest-rated",
            RankingKey::LowestRated => "lowest-rated",
            RankingKey::MostPopular => "most-popular",
            RankingKey::HighestGrossing => "highest-grossing",
            RankingKey::LongestRuntime => "longest-runtime",
            RankingKey::BestMetaScore => "best-meta-score",
            RankingKey::HiddenGems => "hidden-gems",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Natural direction of the key
    pub fn direction(self) -> Direction {
        match self {
            RankingKey::LowestRated => Direction::Ascending,
            _ => Direction::Descending,
        }
    }

    /// Whether `movie` can take part in this ranking at all
    pub fn is_eligible(self, movie: &MovieRecord) -> bool {
        match self {
            RankingKey::HiddenGems => movie.votes > 0,
            key => key.field().is_some_and(|field| field.value(movie).is_some()),
        }
    }

    /// Sort value for an eligible record
    fn sort_value(self, movie: &MovieRecord) -> Option<f64> {
        match self {
            RankingKey::HiddenGems => Some(movie.rating / movie.votes as f64),
            key => key.field().and_then(|field| field.value(movie)),
        }
    }

    fn field(self) -> Option<NumericField> {
        match self {
            RankingKey::HighestRated | RankingKey::LowestRated => Some(NumericField::Rating),
            RankingKey::MostPopular => Some(NumericField::Votes),
            RankingKey::HighestGrossing => Some(NumericField::Gross),
            RankingKey::LongestRuntime => Some(NumericField::Runtime),
            RankingKey::BestMetaScore => Some(NumericField::MetaScore),
            RankingKey::HiddenGems => None,
        }
    }
}

impl fmt::Display for RankingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sort key, its direction and the result cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingSpec {
    pub key: RankingKey,
    pub direction: Direction,
    pub limit: usize,
}

impl RankingSpec {
    /// Ranking in the key's natural direction, capped at `TOP_N_LIMIT`
    pub fn new(key: RankingKey) -> Self {
        Self {
            key,
            direction: key.direction(),
            limit: TOP_N_LIMIT,
        }
    }

    /// Lower the cap; values above `TOP_N_LIMIT` are clamped
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(TOP_N_LIMIT);
        self
    }

    /// Rank `movies` and return at most `limit` of them.
    ///
    /// # Arguments
    /// * `movies` - Filtered records, in input order
    ///
    /// # Returns
    /// Up to `limit` records sorted by the key; ties keep input order
    pub fn rank<'a, I>(&self, movies: I) -> Vec<&'a MovieRecord>
    where
        I: IntoIterator<Item = &'a MovieRecord>,
    {
        let mut scored: Vec<(f64, &'a MovieRecord)> = movies
            .into_iter()
            .filter(|movie| self.key.is_eligible(movie))
            .filter_map(|movie| self.key.sort_value(movie).map(|value| (value, movie)))
            .collect();

        // sort_by is stable, which gives the tie-breaking on input order
        match self.direction {
            Direction::Descending => scored.sort_by(|a, b| b.0.total_cmp(&a.0)),
            Direction::Ascending => scored.sort_by(|a, b| a.0.total_cmp(&b.0)),
        }
        scored.truncate(self.limit);

        tracing::debug!(
            "Ranked by {} (output count: {})",
            self.key,
            scored.len()
        );
        scored.into_iter().map(|(_, movie)| movie).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: f64, votes: u64) -> MovieRecord {
        MovieRecord::new(title, rating, votes)
    }

    #[test]
    fn test_highest_rated_is_capped_and_sorted() {
        let movies: Vec<MovieRecord> = (0..15)
            .map(|i| movie(&format!("Movie {i}"), 5.0 + i as f64 * 0.2, 1_000))
            .collect();

        let ranked = RankingSpec::new(RankingKey::HighestRated).rank(&movies);

        assert_eq!(ranked.len(), TOP_N_LIMIT);
        assert_eq!(ranked[0].title, "Movie 14");
        assert!(ranked.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let movies = vec![movie("First", 8.0, 10), movie("Second", 8.0, 20), movie("Third", 9.0, 5)];

        let ranked = RankingSpec::new(RankingKey::HighestRated).rank(&movies);
        let titles: Vec<&str> = ranked.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "First", "Second"]);

        let ranked = RankingSpec::new(RankingKey::LowestRated).rank(&movies);
        let titles: Vec<&str> = ranked.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_hidden_gems_excludes_zero_votes() {
        let movies = vec![
            movie("Blockbuster", 8.5, 2_000_000),
            movie("Nobody Voted", 9.9, 0),
            movie("Gem", 8.1, 30_000),
        ];

        let ranked = RankingSpec::new(RankingKey::HiddenGems).rank(&movies);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "Gem");
        assert!(ranked.iter().all(|m| m.votes > 0));
    }

    #[test]
    fn test_missing_key_field_is_excluded() {
        let mut earner = movie("Earner", 7.0, 100);
        earner.gross = Some(5_000_000);
        let movies = vec![movie("Unknown Gross", 9.0, 100), earner];

        let ranked = RankingSpec::new(RankingKey::HighestGrossing).rank(&movies);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Earner");
    }

    #[test]
    fn test_fewer_than_limit_is_not_padded() {
        let movies = vec![movie("Only", 7.5, 10)];
        assert_eq!(RankingSpec::new(RankingKey::MostPopular).rank(&movies).len(), 1);

        let empty: Vec<MovieRecord> = Vec::new();
        assert!(RankingSpec::new(RankingKey::MostPopular).rank(&empty).is_empty());
    }

    #[test]
    fn test_limit_is_clamped() {
        let spec = RankingSpec::new(RankingKey::HighestRated).with_limit(50);
        assert_eq!(spec.limit, TOP_N_LIMIT);
        assert_eq!(spec.with_limit(3).limit, 3);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(RankingKey::parse("hidden-gems"), Some(RankingKey::HiddenGems));
        assert_eq!(RankingKey::parse("Highest-Rated"), Some(RankingKey::HighestRated));
        assert_eq!(RankingKey::parse("cheapest"), None);
    }
}
