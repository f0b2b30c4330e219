//! Hierarchy builder: point records into a [`Table`].

use std::collections::HashMap;

use tracing::warn;

use pzfx_model::{
    CellValue, CollisionPolicy, ConsistencyReport, ConsistencyWarning, GroupKey, NestOptions,
    PointRecord, RowLabelAxis, Subcolumn, Table, WarningKind, WarningLocation, YColumn,
};

use crate::consistency::check_row_counts;

/// A built table and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct NestOutcome {
    pub table: Table,
    pub report: ConsistencyReport,
}

/// Fold `records` into a table named `name`.
///
/// YColumns, subcolumns and row labels appear in first-occurrence order.
/// When every record carries a positional row key the axis is the synthetic
/// `1..=N` range.
pub fn nest(name: &str, records: &[PointRecord], options: NestOptions) -> NestOutcome {
    let positional = records.iter().all(|r| r.row_value.is_position());
    let row_axis = if positional {
        let len = records
            .iter()
            .filter_map(|r| match r.row_value {
                GroupKey::Position(k) => Some(k),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        RowLabelAxis::positional(len)
    } else {
        let mut labels: Vec<String> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for record in records {
            let label = record.row_value.label();
            if !seen.contains_key(&label) {
                seen.insert(label.clone(), labels.len());
                labels.push(label);
            }
        }
        RowLabelAxis::labelled(labels)
    };
    let row_index: HashMap<&str, usize> = row_axis
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let axis_len = row_axis.len();
    let mut table = Table::new(name, row_axis.clone());
    let mut y_index: HashMap<String, usize> = HashMap::new();
    let mut sub_index: HashMap<(usize, String), usize> = HashMap::new();
    // source row of the record currently occupying each populated cell
    let mut occupants: HashMap<(usize, usize, usize), usize> = HashMap::new();
    let mut report = ConsistencyReport::default();

    for record in records {
        let title = record.main_value.label();
        let y = *y_index.entry(title.clone()).or_insert_with(|| {
            table.y_columns.push(YColumn::new(title.clone()));
            table.y_columns.len() - 1
        });
        let label = record.sub_value.label();
        let s = *sub_index.entry((y, label.clone())).or_insert_with(|| {
            let subs = &mut table.y_columns[y].subcolumns;
            subs.push(Subcolumn::new(label.clone(), axis_len));
            subs.len() - 1
        });
        let row_label = record.row_value.label();
        let Some(&r) = row_index.get(row_label.as_str()) else {
            continue;
        };
        if record.value.is_missing() {
            continue;
        }

        let cell = &mut table.y_columns[y].subcolumns[s].cells[r];
        match occupants.get(&(y, s, r)).copied() {
            None => {
                *cell = record.value.clone();
                occupants.insert((y, s, r), record.row_index);
            }
            Some(previous_row) => {
                let (kept, discarded) = match options.collision_policy {
                    CollisionPolicy::KeepLast => {
                        let replaced = std::mem::replace(cell, record.value.clone());
                        occupants.insert((y, s, r), record.row_index);
                        (record.value.clone(), replaced)
                    }
                    CollisionPolicy::KeepFirst => (cell.clone(), record.value.clone()),
                };
                report.push(collision_warning(
                    WarningLocation::table(name)
                        .with_y_column(&title)
                        .with_subcolumn(&label)
                        .with_row(&row_label),
                    previous_row,
                    record.row_index,
                    &kept,
                    &discarded,
                ));
            }
        }
    }

    report.extend(check_row_counts(&table));
    for warning in &report.warnings {
        warn!(kind = %warning.kind, location = %warning.location, "{}", warning.detail);
    }
    NestOutcome { table, report }
}

fn collision_warning(
    location: WarningLocation,
    first_row: usize,
    second_row: usize,
    kept: &CellValue,
    discarded: &CellValue,
) -> ConsistencyWarning {
    ConsistencyWarning::new(
        WarningKind::KeyCollision,
        location,
        format!(
            "source rows {first_row} and {second_row} map to the same cell; \
             kept {kept}, discarded {discarded}"
        ),
    )
}
