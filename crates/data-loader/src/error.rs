//! Error types for the data-loader crate.
//!
//! Every failure carries enough context (path, row, column) for the CLI to
//! print a message the user can act on without a backtrace.

use thiserror::Error;

/// Errors that can occur while loading and parsing the movie dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Data file is missing or cannot be opened
    #[error("Cannot read data file {path}: {source}")]
    InputNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error occurred while reading an already opened file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file (bad quoting, wrong column count, ...)
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A row was well-formed CSV but one of its fields could not be converted
    ///
    /// `row` is 1-based and counts data rows, not the header.
    #[error("Parse error at row {row} in {file}: {reason}")]
    ParseError {
        file: String,
        row: usize,
        reason: String,
    },

    /// A field parsed but falls outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
