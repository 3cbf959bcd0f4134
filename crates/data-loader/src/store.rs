//! RecordStore loading.
//!
//! Opens the data file, runs it through the CSV parser and wraps the result
//! in a `RecordStore`. Loading is all-or-nothing: one bad row fails the load.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::RecordStore;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Dataset used when no data file is given on the command line
pub const DEFAULT_DATA_FILE: &str = "data/imdb_top_1000.csv";

impl RecordStore {
    /// Load every movie from a CSV file in the IMDb Top 1000 schema
    ///
    /// A missing or unreadable file is reported as `InputNotFound` with the
    /// path, so the CLI can name it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading movie dataset from {:?}", path);

        let label = path.display().to_string();
        let file = File::open(path).map_err(|source| DataLoadError::InputNotFound {
            path: label.clone(),
            source,
        })?;

        let records = parser::parse_movies(BufReader::new(file), &label)?;
        tracing::info!("Loaded {} movies", records.len());

        Ok(Self {
            source: Some(path.to_path_buf()),
            records,
        })
    }
}
