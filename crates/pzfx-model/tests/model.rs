//! Table invariants and the serialized form of grouping parameters.

use pzfx_model::{
    CellValue, CollisionPolicy, ConsistencyReport, ConsistencyWarning, GroupRequest, NestOptions,
    RowLabelAxis, Table, WarningKind, WarningLocation,
};
use serde_json::json;

fn numbers(values: &[f64]) -> Vec<CellValue> {
    values.iter().copied().map(CellValue::Number).collect()
}

#[test]
fn labelled_axis_pads_short_subcolumns() {
    let mut table = Table::new("Growth", RowLabelAxis::labelled(vec!["0".into(), "24".into()]));
    let warnings = table.append_subcolumn("Control", "All", numbers(&[1.0]));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::RowCountMismatch);
    assert_eq!(table.cell(0, 0, 1), Some(&CellValue::Missing));
    assert_eq!(table.shape(), (2, 1));
}

#[test]
fn synthetic_axis_grows_with_longest_subcolumn() {
    let mut table = Table::new("Scatter", RowLabelAxis::positional(0));
    assert!(table.append_subcolumn("A", "All", numbers(&[1.0, 2.0])).is_empty());
    assert!(table.append_subcolumn("B", "All", numbers(&[3.0, 4.0, 5.0])).is_empty());
    assert_eq!(table.row_axis.labels, vec!["1", "2", "3"]);
    assert_eq!(table.cell(0, 0, 2), Some(&CellValue::Missing));
    assert_eq!(table.cell(1, 0, 2), Some(&CellValue::Number(5.0)));
}

#[test]
fn replicates_counts_widest_y_column() {
    let mut table = Table::new("Reps", RowLabelAxis::positional(1));
    table.append_subcolumn("A", "1", numbers(&[1.0]));
    table.append_subcolumn("A", "2", numbers(&[2.0]));
    table.append_subcolumn("B", "1", numbers(&[3.0]));
    assert_eq!(table.replicates(), 2);
    assert_eq!(table.y_titles(), vec!["A", "B"]);
}

#[test]
fn group_request_reads_from_json() {
    let request: GroupRequest = serde_json::from_value(json!({
        "groupby": "treatment",
        "rowgroupby": "time",
        "cols": ["value"]
    }))
    .unwrap();
    assert_eq!(
        request,
        GroupRequest::new()
            .with_groupby("treatment")
            .with_rowgroupby("time")
            .with_cols(["value"])
    );
    assert!(request.subgroupcols.is_empty());
}

#[test]
fn nest_options_use_snake_case_policy() {
    let options = NestOptions::default().with_collision_policy(CollisionPolicy::KeepFirst);
    let value = serde_json::to_value(options).unwrap();
    assert_eq!(value, json!({ "collision_policy": "keep_first" }));
}

#[test]
fn warning_location_omits_unset_levels() {
    let mut report = ConsistencyReport::default();
    report.push(ConsistencyWarning::new(
        WarningKind::KeyCollision,
        WarningLocation::table("T").with_y_column("A"),
        "two values for one cell",
    ));
    let value = serde_json::to_value(&report.warnings[0].location).unwrap();
    assert_eq!(value, json!({ "table": "T", "y_column": "A" }));
    assert_eq!(report.count(WarningKind::KeyCollision), 1);
}

#[test]
fn cell_text_round_trip() {
    assert_eq!(CellValue::from_text("1.5"), CellValue::Number(1.5));
    assert_eq!(CellValue::from_text(""), CellValue::Missing);
    assert_eq!(CellValue::from_text("n/a"), CellValue::Text("n/a".into()));
    assert_eq!(CellValue::Number(2.0).render().as_deref(), Some("2"));
}
