//! Structural checks shared by the nest and extract directions.
//!
//! None of these fail: anomalies become [`ConsistencyWarning`]s.

use std::collections::HashSet;

use pzfx_model::{ConsistencyWarning, Table, WarningKind, WarningLocation};

/// Subcolumns with fewer populated cells than the row axis.
pub fn check_row_counts(table: &Table) -> Vec<ConsistencyWarning> {
    let axis_len = table.row_axis.len();
    let mut warnings = Vec::new();
    for y_column in &table.y_columns {
        for sub in &y_column.subcolumns {
            let populated = sub.populated_count();
            if populated < axis_len {
                warnings.push(ConsistencyWarning::new(
                    WarningKind::RowCountMismatch,
                    WarningLocation::table(&table.name)
                        .with_y_column(&y_column.title)
                        .with_subcolumn(&sub.label),
                    format!("{populated} of {axis_len} rows populated"),
                ));
            }
        }
    }
    warnings
}

/// Subcolumns whose stored cell count differs from the row axis length.
pub fn check_subcolumn_lengths(table: &Table) -> Vec<ConsistencyWarning> {
    let axis_len = table.row_axis.len();
    let mut warnings = Vec::new();
    for y_column in &table.y_columns {
        for sub in &y_column.subcolumns {
            if sub.cells.len() != axis_len {
                warnings.push(ConsistencyWarning::new(
                    WarningKind::RowCountMismatch,
                    WarningLocation::table(&table.name)
                        .with_y_column(&y_column.title)
                        .with_subcolumn(&sub.label),
                    format!(
                        "subcolumn holds {} cells for a {axis_len}-row axis",
                        sub.cells.len()
                    ),
                ));
            }
        }
    }
    warnings
}

/// Claim `name` in `used`, suffixing `_{n}` when it is taken.
///
/// Shared by flat column names and table names. Returns the final name and
/// whether a suffix was needed.
pub fn unique_name(name: &str, used: &mut HashSet<String>) -> (String, bool) {
    if used.insert(name.to_string()) {
        return (name.to_string(), false);
    }
    let mut n = 1;
    loop {
        let candidate = format!("{name}_{n}");
        if used.insert(candidate.clone()) {
            return (candidate, true);
        }
        n += 1;
    }
}
