//! Property-based tests for the ravel / nest / extract transforms.
//!
//! Verified properties:
//! 1. **Round trip**: grid-shaped input survives nest then extract unchanged
//! 2. **Restack**: `extract_long` plus `restack_request` rebuilds the same table
//! 3. **No panics**: collisions and gaps only ever produce warnings

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use pzfx_model::{CellValue, GroupRequest, WarningKind};
use pzfx_transform::{build_table, extract, extract_long, restack_request};

// =============================================================================
// Test Strategies
// =============================================================================

fn cell() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (-1.0e6f64..1.0e6).prop_map(Some),
        1 => Just(None),
    ]
}

/// A full group x time grid of optional values.
fn grid() -> impl Strategy<Value = (usize, usize, Vec<Option<f64>>)> {
    (1usize..4, 1usize..6).prop_flat_map(|(groups, times)| {
        (
            Just(groups),
            Just(times),
            prop::collection::vec(cell(), groups * times),
        )
    })
}

fn grid_frame(groups: usize, times: usize, values: &[Option<f64>]) -> DataFrame {
    let mut group_col = Vec::new();
    let mut time_col = Vec::new();
    for g in 0..groups {
        for t in 0..times {
            group_col.push(format!("G{g}"));
            time_col.push((t * 12) as i64);
        }
    }
    DataFrame::new(vec![
        Series::new("group".into(), group_col).into_column(),
        Series::new("time".into(), time_col).into_column(),
        Series::new("y".into(), values.to_vec()).into_column(),
    ])
    .expect("frame")
}

/// Unstructured rows: few distinct keys so collisions are common.
fn loose_rows() -> impl Strategy<Value = Vec<(u8, u8, Option<f64>)>> {
    prop::collection::vec((0u8..3, 0u8..3, cell()), 1..30)
}

fn loose_frame(rows: &[(u8, u8, Option<f64>)]) -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            "group".into(),
            rows.iter().map(|r| format!("g{}", r.0)).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "rep".into(),
            rows.iter().map(|r| format!("r{}", r.1)).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new("y".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()).into_column(),
    ])
    .expect("frame")
}

// =============================================================================
// Round Trip
// =============================================================================

proptest! {
    #[test]
    fn grid_round_trips_through_extract((groups, times, values) in grid()) {
        let frame = grid_frame(groups, times, &values);
        let request = GroupRequest::new()
            .with_groupby("group")
            .with_rowgroupby("time")
            .with_cols(["y"]);
        let outcome = build_table("T", &request, &frame).expect("build");
        prop_assert_eq!(outcome.report.count(WarningKind::KeyCollision), 0);

        let (flat, report) = extract(&outcome.table).expect("extract");
        prop_assert!(report.is_clean());
        prop_assert_eq!(flat.height(), times);
        prop_assert_eq!(flat.width(), groups);
        for g in 0..groups {
            for t in 0..times {
                let expected = match values[g * times + t] {
                    Some(v) => CellValue::Number(v),
                    None => CellValue::Missing,
                };
                prop_assert_eq!(&flat.row_labels[t], &(t * 12).to_string());
                prop_assert_eq!(flat.value(&format!("G{g}"), t), Some(expected));
            }
        }
    }

    #[test]
    fn long_form_restacks_into_same_table(rows in loose_rows(), by_rep in any::<bool>()) {
        let frame = loose_frame(&rows);
        let request = if by_rep {
            GroupRequest::new().with_groupby("group").with_rowgroupby("rep").with_cols(["y"])
        } else {
            GroupRequest::new().with_groupby("group").with_subgroupby("rep").with_cols(["y"])
        };
        let original = build_table("T", &request, &frame).expect("build").table;

        let long = extract_long(&original).expect("long");
        let rebuilt = build_table("T", &restack_request(&original), &long).expect("rebuild");
        prop_assert_eq!(rebuilt.report.count(WarningKind::KeyCollision), 0);
        prop_assert_eq!(rebuilt.table, original);
    }

    #[test]
    fn collisions_never_fail(rows in loose_rows()) {
        let frame = loose_frame(&rows);
        let request = GroupRequest::new()
            .with_groupby("group")
            .with_rowgroupby("rep")
            .with_cols(["y"]);
        let outcome = build_table("T", &request, &frame).expect("build");
        let cells: usize = outcome
            .table
            .y_columns
            .iter()
            .map(|y| y.subcolumns.iter().map(|s| s.cells.len()).sum::<usize>())
            .sum();
        prop_assert_eq!(cells, outcome.table.row_axis.len() * outcome.table.y_columns.len());
        prop_assert!(extract(&outcome.table).is_ok());
    }
}
