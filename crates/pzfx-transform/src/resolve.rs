//! Group specification resolver.
//!
//! Validates a raw [`GroupRequest`] against an input frame and normalizes it
//! into one canonical [`GroupSpec`]. Pure: no logging side effects beyond a
//! debug event, no mutation of inputs.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;

use pzfx_model::{AxisSpec, ConfigurationError, GroupRequest, GroupSpec};

pub fn resolve_group_spec(
    request: &GroupRequest,
    frame: &DataFrame,
) -> Result<GroupSpec, ConfigurationError> {
    let sub_key = resolve_axis(
        "sub-group",
        request.subgroupby.as_deref(),
        &request.subgroupcols,
    )?;
    let row_key = resolve_axis(
        "row-group",
        request.rowgroupby.as_deref(),
        &request.rowgroupcols,
    )?;
    if sub_key.is_list() && row_key.is_list() {
        return Err(ConfigurationError::ListOnBothAxes);
    }

    ensure_unique(&request.cols)?;
    let mut data_columns: Vec<String> = request.cols.clone();
    for axis in [&sub_key, &row_key] {
        if let AxisSpec::Columns(columns) = axis {
            for column in columns {
                if !data_columns.contains(column) {
                    data_columns.push(column.clone());
                }
            }
        }
    }
    if data_columns.is_empty() {
        return Err(ConfigurationError::NoDataColumns);
    }

    let main_key = non_empty(request.groupby.as_deref()).map(str::to_string);
    let group_columns: Vec<&str> = main_key
        .as_deref()
        .into_iter()
        .chain(sub_key.label_column())
        .chain(row_key.label_column())
        .collect();

    for column in group_columns
        .iter()
        .copied()
        .chain(data_columns.iter().map(String::as_str))
    {
        if frame.get_column_index(column).is_none() {
            return Err(ConfigurationError::UnknownColumn {
                column: column.to_string(),
            });
        }
    }
    if let Some(column) = group_columns
        .iter()
        .find(|column| data_columns.iter().any(|data| data == *column))
    {
        return Err(ConfigurationError::GroupColumnIsData {
            column: (*column).to_string(),
        });
    }

    let spec = GroupSpec {
        main_key,
        sub_key,
        row_key,
        data_columns,
    };
    debug!(
        main = ?spec.main_key,
        sub = ?spec.sub_key,
        row = ?spec.row_key,
        data_columns = spec.data_columns.len(),
        "resolved group spec"
    );
    Ok(spec)
}

fn resolve_axis(
    axis: &'static str,
    label: Option<&str>,
    list: &[String],
) -> Result<AxisSpec, ConfigurationError> {
    match (non_empty(label), list.is_empty()) {
        (Some(_), false) => Err(ConfigurationError::ConflictingAxis { axis }),
        (Some(column), true) => Ok(AxisSpec::Column(column.to_string())),
        (None, false) => {
            ensure_unique(list)?;
            Ok(AxisSpec::Columns(list.to_vec()))
        }
        (None, true) => Ok(AxisSpec::None),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn ensure_unique(columns: &[String]) -> Result<(), ConfigurationError> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(ConfigurationError::DuplicateColumn {
                column: column.clone(),
            });
        }
    }
    Ok(())
}
