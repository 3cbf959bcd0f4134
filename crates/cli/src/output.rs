//! Console view and file export of query results.
//!
//! The console shows a condensed view (title, year, rating, votes, runtime,
//! genres, director, cast). File export always carries every field; the
//! format follows the destination's extension.

use colored::Colorize;
use data_loader::{write_movies_csv, DataLoadError, MovieRecord};
use pipeline::{GroupSummary, NumericField, QueryMode, QueryOutcome, QueryRequest, QueryResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Destination could not be created or written
    #[error("Cannot write output file {path}: {source}")]
    OutputWriteFailure {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {path} as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {path} as CSV: {reason}")]
    Csv { path: String, reason: String },
}

/// File format picked from the output path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ExportFormat::Json,
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Text,
        }
    }
}

// =============================================================================
// File export
// =============================================================================

/// Write `result` to `path` with every field intact
pub fn export(result: &QueryResult<'_>, path: &Path) -> Result<(), ExportError> {
    let label = path.display().to_string();
    let write_failure = |source: io::Error| ExportError::OutputWriteFailure {
        path: label.clone(),
        source,
    };

    let file = File::create(path).map_err(write_failure)?;
    let mut writer = BufWriter::new(file);
    write_result(&mut writer, ExportFormat::from_path(path), result, &label)?;
    writer.flush().map_err(write_failure)?;

    tracing::info!("Exported {} rows to {}", result.len(), label);
    Ok(())
}

/// Encode `result` in `format` onto any writer
pub fn write_result<W: Write>(
    writer: W,
    format: ExportFormat,
    result: &QueryResult<'_>,
    label: &str,
) -> Result<(), ExportError> {
    let io_failure = |source: io::Error| ExportError::OutputWriteFailure {
        path: label.to_string(),
        source,
    };
    let json_failure = |source: serde_json::Error| ExportError::Json {
        path: label.to_string(),
        source,
    };
    let csv_failure = |reason: String| ExportError::Csv {
        path: label.to_string(),
        reason,
    };

    match (format, result) {
        (ExportFormat::Json, QueryResult::Movies(movies)) => {
            serde_json::to_writer_pretty(writer, movies).map_err(json_failure)
        }
        (ExportFormat::Json, QueryResult::Groups(groups)) => {
            serde_json::to_writer_pretty(writer, groups).map_err(json_failure)
        }
        (ExportFormat::Csv, QueryResult::Movies(movies)) => {
            write_movies_csv(writer, movies.iter().copied()).map_err(|err| match err {
                DataLoadError::IoError(source) => io_failure(source),
                other => csv_failure(other.to_string()),
            })
        }
        (ExportFormat::Csv, QueryResult::Groups(groups)) => {
            write_groups_csv(writer, groups).map_err(|err| match err.into_kind() {
                csv::ErrorKind::Io(source) => io_failure(source),
                other => csv_failure(format!("{:?}", other)),
            })
        }
        (ExportFormat::Text, QueryResult::Movies(movies)) => {
            write_movies_text(writer, movies).map_err(io_failure)
        }
        (ExportFormat::Text, QueryResult::Groups(groups)) => {
            write_groups_text(writer, groups).map_err(io_failure)
        }
    }
}

const TEXT_COLUMNS: [&str; 13] = [
    "poster_link",
    "title",
    "year",
    "age_rating",
    "runtime",
    "genres",
    "rating",
    "overview",
    "meta_score",
    "director",
    "cast",
    "votes",
    "gross",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Tab-separated, one header line then one line per movie
fn write_movies_text<W: Write>(mut writer: W, movies: &[&MovieRecord]) -> io::Result<()> {
    writeln!(writer, "{}", TEXT_COLUMNS.join("\t"))?;
    for movie in movies {
        let fields = [
            opt(&movie.poster_link),
            movie.title.clone(),
            opt(&movie.year),
            opt(&movie.age_rating),
            opt(&movie.runtime),
            movie.genres.join(", "),
            movie.rating.to_string(),
            movie.overview.clone(),
            opt(&movie.meta_score),
            movie.director.clone(),
            movie.cast_members().collect::<Vec<_>>().join(", "),
            movie.votes.to_string(),
            opt(&movie.gross),
        ];
        writeln!(writer, "{}", fields.join("\t"))?;
    }
    writer.flush()
}

/// Average columns present in the summaries (all rows share the same set)
fn group_fields(groups: &[GroupSummary]) -> Vec<NumericField> {
    groups
        .first()
        .map(|g| g.averages.iter().map(|avg| avg.field).collect())
        .unwrap_or_default()
}

fn write_groups_csv<W: Write>(writer: W, groups: &[GroupSummary]) -> csv::Result<()> {
    let fields = group_fields(groups);
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["group".to_string(), "count".to_string()];
    header.extend(fields.iter().map(|f| format!("avg_{}", f.name().replace('-', "_"))));
    csv_writer.write_record(&header)?;

    for group in groups {
        let mut row = vec![group.key.to_string(), group.count.to_string()];
        row.extend(fields.iter().map(|&f| opt(&group.average(f))));
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_groups_text<W: Write>(mut writer: W, groups: &[GroupSummary]) -> io::Result<()> {
    for group in groups {
        writeln!(writer, "{}", render_group(group))?;
    }
    writer.flush()
}

// =============================================================================
// Console
// =============================================================================

/// Write the condensed view of a query outcome to `out` (stdout in the
/// binary). Stops at the first write error.
pub fn print_console<W: Write>(
    out: &mut W,
    outcome: &QueryOutcome<'_>,
    request: &QueryRequest,
) -> io::Result<()> {
    if request.has_filters() {
        writeln!(
            out,
            "{}",
            format!("Found {} movies matching the filter flags", outcome.matched).bold()
        )?;
    }

    match request.mode {
        QueryMode::Filter => {}
        QueryMode::TopN(spec) => writeln!(
            out,
            "{}",
            format!("Top {} by {}:", spec.limit, spec.key).bold().blue()
        )?,
        QueryMode::Insights(spec) => writeln!(
            out,
            "{}",
            format!("Insights by {}:", spec.group_by.name()).bold().blue()
        )?,
    }

    match &outcome.result {
        QueryResult::Movies(movies) => {
            for (idx, movie) in movies.iter().enumerate() {
                writeln!(out, "{}", render_movie(idx + 1, movie))?;
            }
            writeln!(out, "Printed {} movies to terminal", movies.len())?;
        }
        QueryResult::Groups(groups) => {
            for group in groups {
                writeln!(out, "{}", render_group(group))?;
            }
            writeln!(out, "Printed {} groups to terminal", groups.len())?;
        }
    }
    out.flush()
}

/// A closed reader (`movie-query | head`) ends console output without an error
pub fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed early");
            Ok(())
        }
        other => other,
    }
}

/// Three-line condensed entry for one movie
pub fn render_movie(rank: usize, movie: &MovieRecord) -> String {
    let year = movie
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let runtime = movie
        .runtime
        .map(|m| format!(" - {} min", m))
        .unwrap_or_default();

    let mut lines = vec![format!(
        "{}. {}{} - IMDb {} ({} votes){}",
        rank.to_string().green(),
        movie.title.bold(),
        year,
        movie.rating,
        movie.votes,
        runtime
    )];

    let mut details = Vec::new();
    if !movie.genres.is_empty() {
        details.push(movie.genres.join(", "));
    }
    if !movie.director.is_empty() {
        details.push(format!("Directed by {}", movie.director));
    }
    if !details.is_empty() {
        lines.push(format!("   {}", details.join(" | ")));
    }
    let cast: Vec<&str> = movie.cast_members().collect();
    if !cast.is_empty() {
        lines.push(format!("   Starring: {}", cast.join(", ")));
    }
    lines.join("\n")
}

/// One line per insight group
pub fn render_group(group: &GroupSummary) -> String {
    let mut parts = vec![
        format!("{}", group.key.to_string().cyan()),
        format!("movies: {}", group.count),
    ];
    for avg in &group.averages {
        parts.push(format!(
            "avg {}: {}",
            avg.field,
            format_average(avg.field, avg.value)
        ));
    }
    parts.join(" | ")
}

fn format_average(field: NumericField, value: Option<f64>) -> String {
    let Some(value) = value else {
        return "n/a".to_string();
    };
    match field {
        NumericField::Rating => format!("{:.2}", value),
        NumericField::MetaScore => format!("{:.1}", value),
        NumericField::Gross => format!("${:.0}", value),
        NumericField::Runtime => format!("{:.0} min", value),
        NumericField::Votes | NumericField::Year => format!("{:.0}", value),
    }
}
