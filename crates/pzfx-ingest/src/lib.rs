//! Flat-table ingestion.
//!
//! Loads CSV files into Polars `DataFrame`s and classifies their columns so
//! front ends can offer grouping and data column choices.

pub mod columns;
pub mod csv;
pub mod error;

pub use columns::{ColumnKinds, sample_rows};
pub use csv::{CANDIDATE_SEPARATORS, IngestOptions, detect_separator, read_csv_frame};
pub use error::{IngestError, Result};
