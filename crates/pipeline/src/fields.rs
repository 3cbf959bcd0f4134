//! Numeric fields of a `MovieRecord` that thresholds, rankings and
//! averages can work on.

use data_loader::MovieRecord;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericField {
    Year,
    Rating,
    MetaScore,
    Votes,
    Runtime,
    Gross,
}

impl NumericField {
    pub const ALL: [NumericField; 6] = [
        NumericField::Year,
        NumericField::Rating,
        NumericField::MetaScore,
        NumericField::Votes,
        NumericField::Runtime,
        NumericField::Gross,
    ];

    /// Value of this field on `movie`, `None` when the field is absent
    pub fn value(self, movie: &MovieRecord) -> Option<f64> {
        match self {
            NumericField::Year => movie.year.map(f64::from),
            NumericField::Rating => Some(movie.rating),
            NumericField::MetaScore => movie.meta_score.map(f64::from),
            NumericField::Votes => Some(movie.votes as f64),
            NumericField::Runtime => movie.runtime.map(f64::from),
            NumericField::Gross => movie.gross.map(|g| g as f64),
        }
    }

    /// Whether user-supplied bounds must be whole numbers
    pub fn is_integral(self) -> bool {
        !matches!(self, NumericField::Rating)
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericField::Year => "year",
            NumericField::Rating => "rating",
            NumericField::MetaScore => "meta-score",
            NumericField::Votes => "votes",
            NumericField::Runtime => "runtime",
            NumericField::Gross => "gross",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
