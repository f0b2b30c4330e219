use polars::prelude::PolarsError;
use thiserror::Error;

use pzfx_model::ConfigurationError;

#[derive(Debug, Error)]
pub enum TransformError {
    /// The grouping request was invalid; nothing was built.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),

    #[error("table '{name}' already exists")]
    DuplicateTable { name: String },

    #[error("table '{name}' not found")]
    UnknownTable { name: String },
}

impl TransformError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
