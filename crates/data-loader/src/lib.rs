//! # Data Loader Crate
//!
//! Loads the IMDb Top 1000 movie dataset (CSV) into memory.
//!
//! ## Main Components
//!
//! - **types**: `MovieRecord` and the ordered `RecordStore`
//! - **parser**: CSV rows to records and back (export uses the same schema)
//! - **store**: Loading a `RecordStore` from a file
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RecordStore;
//! use std::path::Path;
//!
//! let store = RecordStore::load_from_file(Path::new("data/imdb_top_1000.csv"))?;
//! for movie in store.records() {
//!     println!("{} ({:?}) {}", movie.title, movie.year, movie.rating);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{parse_movies, write_movies_csv};
pub use store::DEFAULT_DATA_FILE;
pub use types::{MovieRecord, RecordStore};
