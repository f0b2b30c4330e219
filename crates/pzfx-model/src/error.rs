use thiserror::Error;

/// Invalid or ambiguous grouping parameters.
///
/// These are fatal: they abort a transform before any table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("both a grouping column and a column list were given for the {axis} axis")]
    ConflictingAxis { axis: &'static str },

    #[error("column lists were given for both the sub-group and row-group axes")]
    ListOnBothAxes,

    #[error("no data columns selected")]
    NoDataColumns,

    #[error("column '{column}' not found in input table")]
    UnknownColumn { column: String },

    #[error("column '{column}' listed more than once")]
    DuplicateColumn { column: String },

    #[error("column '{column}' is used both for grouping and as a data column")]
    GroupColumnIsData { column: String },

    #[error("table name must not be empty")]
    EmptyTableName,
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
