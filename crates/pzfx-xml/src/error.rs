//! Error types for `.pzfx` file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing `.pzfx` files.
#[derive(Debug, Error)]
pub enum PzfxError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// XML syntax error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Well-formed XML that is not a Prism document.
    #[error("malformed Prism file: {message}")]
    Malformed { message: String },

    /// Table names must be unique within a file.
    #[error("duplicate table name: {name}")]
    DuplicateTable { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `.pzfx` operations.
pub type Result<T> = std::result::Result<T, PzfxError>;

impl PzfxError {
    /// Create a Malformed error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<std::str::Utf8Error> for PzfxError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::malformed(format!("invalid UTF-8 text: {err}"))
    }
}

impl From<tempfile::PersistError> for PzfxError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
