//! CSV reading into a Polars `DataFrame`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Separators tried when none is configured, in tie-break order.
pub const CANDIDATE_SEPARATORS: [u8; 3] = [b',', b'\t', b';'];

/// Options for [`read_csv_frame`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Field separator; detected from the header line when `None`.
    pub separator: Option<u8>,
    /// Read at most this many data rows.
    pub n_rows: Option<usize>,
}

impl IngestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    #[must_use]
    pub fn with_n_rows(mut self, n_rows: usize) -> Self {
        self.n_rows = Some(n_rows);
        self
    }
}

/// Read a CSV file with a single header row.
pub fn read_csv_frame(path: &Path, options: &IngestOptions) -> Result<DataFrame> {
    let header = read_header_line(path)?;
    let separator = match options.separator {
        Some(separator) => separator,
        None => detect_separator(&header),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(options.n_rows)
        .with_infer_schema_length(Some(100))
        .map_parse_options(|parse| parse.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.get_column_names().iter().any(|name| name.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    debug!(
        path = %path.display(),
        separator = %char::from(separator).escape_default(),
        rows = df.height(),
        columns = df.width(),
        "read csv"
    );
    Ok(df)
}

/// Pick the candidate separator that occurs most often outside quotes.
///
/// Falls back to a comma when none occurs.
pub fn detect_separator(header: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_SEPARATORS.len()];
    let mut in_quotes = false;
    for byte in header.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(index) = CANDIDATE_SEPARATORS.iter().position(|c| *c == byte) {
            counts[index] += 1;
        }
    }
    let best = counts
        .iter()
        .enumerate()
        .fold(0, |best, (index, count)| if *count > counts[best] { index } else { best });
    CANDIDATE_SEPARATORS[best]
}

fn read_header_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| IngestError::read(path, e))?;
    let line = line.strip_prefix('\u{feff}').unwrap_or(&line).trim_end();
    if line.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_separator() {
        assert_eq!(detect_separator("a,b,c"), b',');
        assert_eq!(detect_separator("a\tb\tc"), b'\t');
        assert_eq!(detect_separator("a;b;c"), b';');
        assert_eq!(detect_separator("\"x;y\",b,c"), b',');
        assert_eq!(detect_separator("single"), b',');
    }
}
