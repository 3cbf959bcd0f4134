//! Parser for the IMDb Top 1000 CSV schema.
//!
//! Header: `Poster_Link,Series_Title,Released_Year,Certificate,Runtime,Genre,
//! IMDB_Rating,Overview,Meta_score,Director,Star1,Star2,Star3,Star4,
//! No_of_Votes,Gross`
//!
//! Cells arrive as text (`"142 min"`, `"Drama, Crime"`, `"28,341,469"`) and
//! are normalized into a `MovieRecord`. The same schema is used for CSV
//! export so a written file loads back through `parse_movies` unchanged.

use crate::error::{DataLoadError, Result};
use crate::types::MovieRecord;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One CSV row exactly as it appears on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMovieRow {
    #[serde(rename = "Poster_Link", default)]
    pub poster_link: String,
    #[serde(rename = "Series_Title")]
    pub series_title: String,
    #[serde(rename = "Released_Year")]
    pub released_year: String,
    #[serde(rename = "Certificate")]
    pub certificate: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "IMDB_Rating")]
    pub imdb_rating: String,
    #[serde(rename = "Overview")]
    pub overview: String,
    #[serde(rename = "Meta_score")]
    pub meta_score: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Star1")]
    pub star1: String,
    #[serde(rename = "Star2")]
    pub star2: String,
    #[serde(rename = "Star3")]
    pub star3: String,
    #[serde(rename = "Star4")]
    pub star4: String,
    #[serde(rename = "No_of_Votes")]
    pub no_of_votes: String,
    #[serde(rename = "Gross")]
    pub gross: String,
}

/// Parse every row of a CSV stream into records, keeping input order
///
/// `source` only labels error messages (usually the file path).
pub fn parse_movies<R: Read>(reader: R, source: &str) -> Result<Vec<MovieRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut movies = Vec::new();
    for (idx, row) in csv_reader.deserialize::<RawMovieRow>().enumerate() {
        let row = row.map_err(|source_err| DataLoadError::Csv {
            path: source.to_string(),
            source: source_err,
        })?;
        movies.push(row_to_record(row, source, idx + 1)?);
    }
    Ok(movies)
}

/// Write records back out in the input schema, header first
pub fn write_movies_csv<'a, W, I>(writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a MovieRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut wrote_row = false;
    for record in records {
        csv_writer
            .serialize(record_to_row(record))
            .map_err(csv_write_error)?;
        wrote_row = true;
    }
    if !wrote_row {
        // serialize() emits the header lazily; an empty export still needs it
        csv_writer
            .write_record(CSV_HEADER)
            .map_err(csv_write_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Column order of the dataset
pub const CSV_HEADER: [&str; 16] = [
    "Poster_Link",
    "Series_Title",
    "Released_Year",
    "Certificate",
    "Runtime",
    "Genre",
    "IMDB_Rating",
    "Overview",
    "Meta_score",
    "Director",
    "Star1",
    "Star2",
    "Star3",
    "Star4",
    "No_of_Votes",
    "Gross",
];

fn csv_write_error(err: csv::Error) -> DataLoadError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
        other => DataLoadError::InvalidValue {
            field: "csv export".to_string(),
            value: format!("{:?}", other),
        },
    }
}

/// Convert one raw row into a record
///
/// Empty or non-numeric optional cells become `None`. Required cells
/// (title, rating, votes) fail the whole load with row context.
pub fn row_to_record(row: RawMovieRow, file: &str, row_no: usize) -> Result<MovieRecord> {
    let parse_error = |reason: String| DataLoadError::ParseError {
        file: file.to_string(),
        row: row_no,
        reason,
    };

    if row.series_title.is_empty() {
        return Err(parse_error("Missing title".to_string()));
    }

    let rating: f64 = row
        .imdb_rating
        .parse()
        .map_err(|e| parse_error(format!("Invalid IMDB_Rating '{}': {}", row.imdb_rating, e)))?;
    if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
        return Err(parse_error(format!("IMDB_Rating {} outside 0-10", rating)));
    }

    let votes = parse_grouped_number(&row.no_of_votes)
        .ok_or_else(|| parse_error(format!("Invalid No_of_Votes '{}'", row.no_of_votes)))?;

    let meta_score = match parse_meta_score(&row.meta_score) {
        Ok(score) => score,
        Err(value) => return Err(parse_error(format!("Meta_score {} outside 0-100", value))),
    };

    let mut cast: Vec<String> = vec![row.star1, row.star2, row.star3, row.star4];
    while cast.last().is_some_and(|star| star.is_empty()) {
        cast.pop();
    }

    Ok(MovieRecord {
        poster_link: non_empty(row.poster_link),
        title: row.series_title,
        year: row.released_year.parse().ok(),
        age_rating: non_empty(row.certificate),
        runtime: extract_runtime(&row.runtime),
        genres: split_genres(&row.genre),
        rating,
        overview: row.overview,
        meta_score,
        director: row.director,
        cast,
        votes,
        gross: parse_grouped_number(&row.gross),
    })
}

/// Inverse of `row_to_record`
pub fn record_to_row(record: &MovieRecord) -> RawMovieRow {
    let star = |i: usize| record.cast.get(i).cloned().unwrap_or_default();
    RawMovieRow {
        poster_link: record.poster_link.clone().unwrap_or_default(),
        series_title: record.title.clone(),
        released_year: record.year.map(|y| y.to_string()).unwrap_or_default(),
        certificate: record.age_rating.clone().unwrap_or_default(),
        runtime: record
            .runtime
            .map(|minutes| format!("{} min", minutes))
            .unwrap_or_default(),
        genre: record.genres.join(", "),
        imdb_rating: record.rating.to_string(),
        overview: record.overview.clone(),
        meta_score: record.meta_score.map(|s| s.to_string()).unwrap_or_default(),
        director: record.director.clone(),
        star1: star(0),
        star2: star(1),
        star3: star(2),
        star4: star(3),
        no_of_votes: record.votes.to_string(),
        gross: record.gross.map(format_grouped_number).unwrap_or_default(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// "142 min" -> Some(142)
fn extract_runtime(s: &str) -> Option<u16> {
    s.split_whitespace().next()?.parse().ok()
}

/// "Drama, Crime" -> ["Drama", "Crime"]
fn split_genres(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// "28,341,469" -> Some(28341469); empty -> None
fn parse_grouped_number(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

/// 28341469 -> "28,341,469"
fn format_grouped_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Meta scores show up as "80" or "80.0"; empty means not scored.
///
/// Returns `Err` with the offending value when it is a number outside 0-100.
fn parse_meta_score(s: &str) -> std::result::Result<Option<u8>, f64> {
    let Ok(value) = s.parse::<f64>() else {
        return Ok(None);
    };
    if !(0.0..=100.0).contains(&value) {
        return Err(value);
    }
    Ok(Some(value.round() as u8))
}
