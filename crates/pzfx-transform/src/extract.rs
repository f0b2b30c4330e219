//! Extractor: a [`Table`] back into flat form.
//!
//! Two shapes are produced. [`extract`] gives the wide form a user sees in a
//! preview, one column per subcolumn indexed by row label. [`extract_long`]
//! gives the tidy form that [`restack_request`] can nest back into the same
//! table.

use std::collections::HashSet;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use pzfx_model::{
    ALL_LABEL, CellValue, ConsistencyReport, ConsistencyWarning, GroupRequest, Table, WarningKind,
    WarningLocation,
};

use crate::consistency::{check_subcolumn_lengths, unique_name};

pub const LONG_MAIN: &str = "main";
pub const LONG_SUB: &str = "sub";
pub const LONG_ROW: &str = "row";
pub const LONG_VALUE: &str = "value";

/// Wide flat form of a table: value columns plus the row labels as index.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    pub row_labels: Vec<String>,
    pub data: DataFrame,
}

impl FlatTable {
    pub fn height(&self) -> usize {
        self.row_labels.len()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Cell at `row` of `column`, converted back from its stored dtype.
    pub fn value(&self, column: &str, row: usize) -> Option<CellValue> {
        let column = self.data.column(column).ok()?;
        let value = column.get(row).ok()?;
        Some(crate::values::any_to_cell(value))
    }

    /// Single frame with the row labels as the first column.
    pub fn with_row_labels(&self, name: &str) -> PolarsResult<DataFrame> {
        let mut frame = self.data.clone();
        frame.insert_column(
            0,
            Series::new(name.into(), self.row_labels.clone()).into_column(),
        )?;
        Ok(frame)
    }
}

/// Wide extraction: one column per (YColumn, subcolumn) pair.
pub fn extract(table: &Table) -> PolarsResult<(FlatTable, ConsistencyReport)> {
    let axis_len = table.row_axis.len();
    let mut report = ConsistencyReport::default();
    report.extend(check_subcolumn_lengths(table));

    let mut used = HashSet::new();
    let mut columns: Vec<Column> = Vec::new();
    for y_column in &table.y_columns {
        let lone_all = y_column.subcolumns.len() == 1 && y_column.subcolumns[0].label == ALL_LABEL;
        for sub in &y_column.subcolumns {
            let base = if lone_all {
                y_column.title.clone()
            } else {
                format!("{}:{}", y_column.title, sub.label)
            };
            let (name, renamed) = unique_name(&base, &mut used);
            if renamed {
                report.push(ConsistencyWarning::new(
                    WarningKind::KeyCollision,
                    WarningLocation::table(&table.name)
                        .with_y_column(&y_column.title)
                        .with_subcolumn(&sub.label),
                    format!("column name `{base}` already used; renamed to `{name}`"),
                ));
            }
            let mut cells: Vec<&CellValue> = sub.cells.iter().take(axis_len).collect();
            cells.resize(axis_len, &CellValue::Missing);
            columns.push(cells_to_column(&name, &cells));
        }
    }

    let data = DataFrame::new(columns)?;
    Ok((
        FlatTable {
            row_labels: table.row_axis.labels.clone(),
            data,
        },
        report,
    ))
}

/// Tidy extraction with one row per cell, missing cells included.
///
/// The `row` column is omitted when the row axis is synthetic; stacking
/// order then reproduces the positions.
pub fn extract_long(table: &Table) -> PolarsResult<DataFrame> {
    let mut mains = Vec::new();
    let mut subs = Vec::new();
    let mut rows = Vec::new();
    let mut values: Vec<&CellValue> = Vec::new();
    for y_column in &table.y_columns {
        for sub in &y_column.subcolumns {
            for (index, label) in table.row_axis.labels.iter().enumerate() {
                mains.push(y_column.title.as_str());
                subs.push(sub.label.as_str());
                rows.push(label.as_str());
                values.push(sub.cells.get(index).unwrap_or(&CellValue::Missing));
            }
        }
    }

    let mut columns = vec![
        Series::new(LONG_MAIN.into(), mains).into_column(),
        Series::new(LONG_SUB.into(), subs).into_column(),
    ];
    if !table.row_axis.synthetic {
        columns.push(Series::new(LONG_ROW.into(), rows).into_column());
    }
    columns.push(cells_to_column(LONG_VALUE, &values));
    DataFrame::new(columns)
}

/// Grouping request that nests an [`extract_long`] frame back into `table`.
pub fn restack_request(table: &Table) -> GroupRequest {
    let request = GroupRequest::new()
        .with_groupby(LONG_MAIN)
        .with_subgroupby(LONG_SUB)
        .with_cols([LONG_VALUE]);
    if table.row_axis.synthetic {
        request
    } else {
        request.with_rowgroupby(LONG_ROW)
    }
}

/// Float64 when every cell is numeric or missing, String otherwise.
fn cells_to_column(name: &str, cells: &[&CellValue]) -> Column {
    let numeric = cells
        .iter()
        .all(|cell| matches!(cell, CellValue::Number(_) | CellValue::Missing));
    if numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_f64()).collect();
        Series::new(name.into(), values).into_column()
    } else {
        let values: Vec<Option<String>> = cells.iter().map(|cell| cell.render()).collect();
        Series::new(name.into(), values).into_column()
    }
}
