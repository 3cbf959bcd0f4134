//! Case-insensitive text predicates.
//!
//! The needle is lowercased once at construction; records are compared
//! against it on every call.

use crate::traits::Predicate;
use data_loader::MovieRecord;

/// Which text field a `TextPredicate` looks at and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Title contains the needle
    TitleContains,
    /// Some cast member equals the needle
    CastMember,
    /// Director equals the needle
    Director,
    /// Some genre equals the needle
    Genre,
    /// Certificate equals the needle
    AgeRating,
}

impl TextMatch {
    fn name(self) -> &'static str {
        match self {
            TextMatch::TitleContains => "TitleContains",
            TextMatch::CastMember => "CastMember",
            TextMatch::Director => "Director",
            TextMatch::Genre => "Genre",
            TextMatch::AgeRating => "AgeRating",
        }
    }
}

pub struct TextPredicate {
    kind: TextMatch,
    needle: String,
}

impl TextPredicate {
    /// # Arguments
    /// * `kind` - Field and match style
    /// * `needle` - Text to look for; compared case-insensitively
    pub fn new(kind: TextMatch, needle: &str) -> Self {
        Self {
            kind,
            needle: needle.to_lowercase(),
        }
    }
}

impl Predicate for TextPredicate {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn matches(&self, movie: &MovieRecord) -> bool {
        match self.kind {
            TextMatch::TitleContains => movie.title.to_lowercase().contains(&self.needle),
            TextMatch::CastMember => movie.has_cast_member(&self.needle),
            TextMatch::Director => {
                !movie.director.is_empty() && movie.director.to_lowercase() == self.needle
            }
            TextMatch::Genre => movie.has_genre(&self.needle),
            TextMatch::AgeRating => movie
                .age_rating
                .as_ref()
                .is_some_and(|rating| rating.to_lowercase() == self.needle),
        }
    }
}
