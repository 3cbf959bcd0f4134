//! Core domain types for the movie dataset.
//!
//! `MovieRecord` is the flat, read-only view of one CSV row. `RecordStore`
//! owns every record in input order and is the only thing the query
//! pipeline reads from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Movie Record
// =============================================================================

/// One movie from the dataset.
///
/// Optional fields are `None` when the source cell was empty or not a
/// number. Nothing here is mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub poster_link: Option<String>,
    pub title: String,
    /// Release year. One row in the IMDb Top 1000 carries "PG" here.
    pub year: Option<u16>,
    /// Certificate such as "PG-13", "R" or "U"
    pub age_rating: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u16>,
    /// A movie usually has several genres ("Drama, Crime")
    pub genres: Vec<String>,
    /// IMDb rating, 0.0 - 10.0
    pub rating: f64,
    pub overview: String,
    /// Metacritic score, 0 - 100
    pub meta_score: Option<u8>,
    pub director: String,
    /// Top-billed actors by billing slot (Star1..Star4). An empty string
    /// marks a blank slot before a filled one; trailing blanks are dropped.
    pub cast: Vec<String>,
    pub votes: u64,
    /// Gross revenue in USD
    pub gross: Option<u64>,
}

impl MovieRecord {
    /// Minimal record for tests and fixtures; every optional field is empty.
    pub fn new(title: impl Into<String>, rating: f64, votes: u64) -> Self {
        Self {
            poster_link: None,
            title: title.into(),
            year: None,
            age_rating: None,
            runtime: None,
            genres: Vec::new(),
            rating,
            overview: String::new(),
            meta_score: None,
            director: String::new(),
            cast: Vec::new(),
            votes,
            gross: None,
        }
    }

    /// Named cast members, skipping blank billing slots
    pub fn cast_members(&self) -> impl Iterator<Item = &str> {
        self.cast
            .iter()
            .map(String::as_str)
            .filter(|actor| !actor.is_empty())
    }

    /// Case-insensitive membership test over the cast
    pub fn has_cast_member(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.cast_members().any(|actor| actor.to_lowercase() == name)
    }

    /// Case-insensitive membership test over the genres
    pub fn has_genre(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();
        self.genres.iter().any(|g| g.to_lowercase() == genre)
    }
}

// =============================================================================
// RecordStore
// =============================================================================

/// In-memory, ordered collection of every record in the data file.
///
/// Records are kept in input order; the store hands out slices and
/// references, never owned copies.
#[derive(Debug, Default)]
pub struct RecordStore {
    pub(crate) source: Option<PathBuf>,
    pub(crate) records: Vec<MovieRecord>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already parsed records, keeping their order
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self {
            source: None,
            records,
        }
    }

    /// All records in input order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Record at `position` in input order
    pub fn get(&self, position: usize) -> Option<&MovieRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path the store was loaded from, if it came from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
