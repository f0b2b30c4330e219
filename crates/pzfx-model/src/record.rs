use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::group::GroupKey;

/// One ravelled observation.
///
/// Within a single ravel pass, `row_index` plus the three group keys
/// identify a point uniquely unless the source data itself has duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Position of the originating row in the source table.
    pub row_index: usize,
    pub main_value: GroupKey,
    pub sub_value: GroupKey,
    pub row_value: GroupKey,
    pub value: CellValue,
    /// Data column the value was read from.
    pub source_column: String,
}
