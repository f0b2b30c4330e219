//! Data model for grouped Prism tables.
//!
//! The hierarchy nests `Table -> YColumn -> Subcolumn -> cells`, with a
//! [`RowLabelAxis`] held once per table so that cell position `i` in every
//! subcolumn refers to the same logical row.
//!
//! - **cell**: scalar cell values and the missing-value marker
//! - **group**: grouping requests, resolved specs, and group keys
//! - **record**: ravelled point records
//! - **table**: the Table / YColumn / Subcolumn hierarchy
//! - **warning**: structural warnings collected by the consistency checker
//! - **error**: configuration errors

pub mod cell;
pub mod error;
pub mod group;
pub mod record;
pub mod table;
pub mod warning;

pub use cell::{CellValue, format_number};
pub use error::{ConfigurationError, Result};
pub use group::{ALL_LABEL, AxisSpec, CollisionPolicy, GroupKey, GroupRequest, GroupSpec, NestOptions};
pub use record::PointRecord;
pub use table::{RowLabelAxis, Subcolumn, Table, YColumn};
pub use warning::{ConsistencyReport, ConsistencyWarning, WarningKind, WarningLocation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_kind() {
        let mut report = ConsistencyReport::default();
        report.push(ConsistencyWarning::new(
            WarningKind::KeyCollision,
            WarningLocation::table("Data"),
            "duplicate cell",
        ));
        report.push(ConsistencyWarning::new(
            WarningKind::RowCountMismatch,
            WarningLocation::table("Data").with_y_column("Control"),
            "short subcolumn",
        ));
        report.push(ConsistencyWarning::new(
            WarningKind::RowCountMismatch,
            WarningLocation::table("Data").with_y_column("DrugA"),
            "short subcolumn",
        ));
        assert_eq!(report.count(WarningKind::KeyCollision), 1);
        assert_eq!(report.count(WarningKind::RowCountMismatch), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn table_serializes() {
        let mut table = Table::new("Data", RowLabelAxis::labelled(vec!["0".into(), "24".into()]));
        table.append_subcolumn("Control", ALL_LABEL, vec![CellValue::Number(10.5)]);
        let json = serde_json::to_string(&table).expect("serialize table");
        let round: Table = serde_json::from_str(&json).expect("deserialize table");
        assert_eq!(round, table);
    }
}
