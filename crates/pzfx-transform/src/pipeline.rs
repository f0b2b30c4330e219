//! Resolve, ravel and nest in one call.

use polars::prelude::DataFrame;
use tracing::{debug, debug_span};

use pzfx_model::{ConfigurationError, ConsistencyReport, GroupRequest, NestOptions};

use crate::error::Result;
use crate::extract::{FlatTable, extract};
use crate::nest::{NestOutcome, nest};
use crate::ravel::ravel;
use crate::resolve::resolve_group_spec;

/// Build a table from a flat frame with default nest options.
pub fn build_table(name: &str, request: &GroupRequest, frame: &DataFrame) -> Result<NestOutcome> {
    build_table_with_options(name, request, frame, NestOptions::default())
}

pub fn build_table_with_options(
    name: &str,
    request: &GroupRequest,
    frame: &DataFrame,
    options: NestOptions,
) -> Result<NestOutcome> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::EmptyTableName.into());
    }
    let span = debug_span!("build_table", table = %name, rows = frame.height());
    let _guard = span.enter();

    let spec = resolve_group_spec(request, frame)?;
    let records = ravel(frame, &spec)?;
    let outcome = nest(name, &records, options);
    let (rows, y_columns) = outcome.table.shape();
    debug!(
        rows,
        y_columns,
        replicates = outcome.table.replicates(),
        warnings = outcome.report.len(),
        "built table"
    );
    Ok(outcome)
}

/// Nest into a detached table and flatten it again.
///
/// Nothing is stored; the returned report merges the nest and extract
/// warnings in that order.
pub fn preview(
    name: &str,
    request: &GroupRequest,
    frame: &DataFrame,
) -> Result<(FlatTable, ConsistencyReport)> {
    let NestOutcome { table, mut report } = build_table(name, request, frame)?;
    let (flat, extract_report) = extract(&table)?;
    report.extend(extract_report.into_warnings());
    Ok((flat, report))
}
