//! Column classification and row sampling.

use polars::prelude::{DataFrame, DataType};
use serde::{Deserialize, Serialize};

/// Columns split by what they can be used for.
///
/// Numeric columns are candidates for data columns, categorical columns for
/// grouping. Columns of any other dtype appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnKinds {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnKinds {
    pub fn detect(df: &DataFrame) -> Self {
        let mut kinds = Self::default();
        for column in df.get_columns() {
            let name = column.name().to_string();
            match column.dtype() {
                DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64 => kinds.numeric.push(name),
                DataType::String => kinds.categorical.push(name),
                _ => {}
            }
        }
        kinds
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.iter().any(|n| n == name)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical.iter().any(|n| n == name)
    }
}

/// The first `n` rows of `df`.
pub fn sample_rows(df: &DataFrame, n: usize) -> DataFrame {
    df.head(Some(n))
}
