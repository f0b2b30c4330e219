//! Raveler: flat frame rows into tagged point records.

use std::collections::HashMap;

use polars::prelude::{DataFrame, PolarsResult};
use tracing::debug;

use pzfx_model::{AxisSpec, GroupKey, GroupSpec, PointRecord};

use crate::values::{column_cells, column_labels};

/// Flatten every row of `frame` into one record per data column.
///
/// Records come out in row order, then `data_columns` order. Rows whose
/// grouping labels are null are kept under the empty label.
pub fn ravel(frame: &DataFrame, spec: &GroupSpec) -> PolarsResult<Vec<PointRecord>> {
    let main_labels = spec
        .main_key
        .as_deref()
        .map(|column| column_labels(frame, column))
        .transpose()?;
    let sub_labels = spec
        .sub_key
        .label_column()
        .map(|column| column_labels(frame, column))
        .transpose()?;
    let row_labels = spec
        .row_key
        .label_column()
        .map(|column| column_labels(frame, column))
        .transpose()?;
    let data = spec
        .data_columns
        .iter()
        .map(|column| column_cells(frame, column))
        .collect::<PolarsResult<Vec<_>>>()?;

    let qualify = spec.qualifies_sub_labels();
    let columns_as_subs = spec.data_columns_as_subcolumns();
    let mut ordinals: HashMap<(GroupKey, GroupKey), usize> = HashMap::new();
    let mut records = Vec::with_capacity(frame.height() * spec.data_columns.len());

    for row_index in 0..frame.height() {
        let main_value = match &main_labels {
            Some(labels) => GroupKey::Label(labels[row_index].clone()),
            None => GroupKey::All,
        };
        for (column, cells) in spec.data_columns.iter().zip(&data) {
            let sub_value = match (&spec.sub_key, &sub_labels) {
                (AxisSpec::Column(_), Some(labels)) if qualify => {
                    GroupKey::Label(format!("{column}:{}", labels[row_index]))
                }
                (AxisSpec::Column(_), Some(labels)) => {
                    GroupKey::Label(labels[row_index].clone())
                }
                (AxisSpec::Columns(_), _) => GroupKey::Label(column.clone()),
                _ if columns_as_subs => GroupKey::Label(column.clone()),
                _ => GroupKey::All,
            };
            let row_value = match (&spec.row_key, &row_labels) {
                (AxisSpec::Column(_), Some(labels)) => GroupKey::Label(labels[row_index].clone()),
                (AxisSpec::Columns(_), _) => GroupKey::Label(column.clone()),
                _ => {
                    let ordinal = ordinals
                        .entry((main_value.clone(), sub_value.clone()))
                        .or_insert(0);
                    *ordinal += 1;
                    GroupKey::Position(*ordinal)
                }
            };
            records.push(PointRecord {
                row_index,
                main_value: main_value.clone(),
                sub_value,
                row_value,
                value: cells[row_index].clone(),
                source_column: column.clone(),
            });
        }
    }

    debug!(
        rows = frame.height(),
        records = records.len(),
        "ravelled frame"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
    use pzfx_model::CellValue;

    use super::*;

    fn spec(main: Option<&str>, sub: AxisSpec, row: AxisSpec, cols: &[&str]) -> GroupSpec {
        GroupSpec {
            main_key: main.map(str::to_string),
            sub_key: sub,
            row_key: row,
            data_columns: cols.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("treatment".into(), ["Control", "Control", "DrugA"]).into_column(),
            Series::new("time".into(), [0i64, 24, 0]).into_column(),
            Series::new("r1".into(), [1.0, 2.0, 3.0]).into_column(),
            Series::new("r2".into(), [Some(4.0), None, Some(6.0)]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn records_follow_row_then_column_order() {
        let spec = spec(
            Some("treatment"),
            AxisSpec::Columns(vec!["r1".into(), "r2".into()]),
            AxisSpec::Column("time".into()),
            &["r1", "r2"],
        );
        let records = ravel(&frame(), &spec).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].source_column, "r1");
        assert_eq!(records[1].source_column, "r2");
        assert_eq!(records[1].sub_value, GroupKey::Label("r2".into()));
        assert_eq!(records[2].row_value, GroupKey::Label("24".into()));
        assert_eq!(records[3].value, CellValue::Missing);
        assert_eq!(records[4].main_value, GroupKey::Label("DrugA".into()));
    }

    #[test]
    fn unconfigured_rows_stack_by_ordinal() {
        let spec = spec(Some("treatment"), AxisSpec::None, AxisSpec::None, &["r1"]);
        let records = ravel(&frame(), &spec).unwrap();
        let rows: Vec<_> = records.iter().map(|r| r.row_value.clone()).collect();
        assert_eq!(
            rows,
            vec![GroupKey::Position(1), GroupKey::Position(2), GroupKey::Position(1)]
        );
        assert!(records.iter().all(|r| r.sub_value == GroupKey::All));
    }

    #[test]
    fn several_columns_without_sub_axis_become_subcolumns() {
        let spec = spec(None, AxisSpec::None, AxisSpec::None, &["r1", "r2"]);
        let records = ravel(&frame(), &spec).unwrap();
        assert_eq!(records[0].main_value, GroupKey::All);
        assert_eq!(records[0].sub_value, GroupKey::Label("r1".into()));
        assert_eq!(records[1].sub_value, GroupKey::Label("r2".into()));
        assert_eq!(records[2].row_value, GroupKey::Position(2));
    }

    #[test]
    fn label_sub_axis_is_qualified_with_several_columns() {
        let spec = spec(None, AxisSpec::Column("time".into()), AxisSpec::None, &["r1", "r2"]);
        let records = ravel(&frame(), &spec).unwrap();
        assert_eq!(records[0].sub_value, GroupKey::Label("r1:0".into()));
        assert_eq!(records[1].sub_value, GroupKey::Label("r2:0".into()));
    }

    #[test]
    fn list_row_axis_uses_column_names() {
        let spec = spec(
            Some("treatment"),
            AxisSpec::None,
            AxisSpec::Columns(vec!["r1".into(), "r2".into()]),
            &["r1", "r2"],
        );
        let records = ravel(&frame(), &spec).unwrap();
        assert_eq!(records[0].sub_value, GroupKey::All);
        assert_eq!(records[0].row_value, GroupKey::Label("r1".into()));
        assert_eq!(records[1].row_value, GroupKey::Label("r2".into()));
    }

    #[test]
    fn null_group_labels_become_empty() {
        let frame = DataFrame::new(vec![
            Series::new("group".into(), [Some("a"), None]).into_column(),
            Series::new("y".into(), [1.0, 2.0]).into_column(),
        ])
        .unwrap();
        let spec = spec(Some("group"), AxisSpec::None, AxisSpec::None, &["y"]);
        let records = ravel(&frame, &spec).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].main_value, GroupKey::Label(String::new()));
    }
}
