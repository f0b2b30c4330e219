//! File-level operations behind each subcommand.
//!
//! Each function reads its inputs from disk, drives the transform engine and
//! returns plain data for the caller to print.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use polars::prelude::{CsvWriter, SerWriter};
use tracing::{info, info_span};

use pzfx_ingest::{ColumnKinds, IngestOptions, read_csv_frame, sample_rows};
use pzfx_model::{ConsistencyReport, GroupRequest, NestOptions};
use pzfx_transform::{FlatTable, PrismDocument, preview};
use pzfx_xml::{LoadOptions, SaveOptions, load_document, save_document};

/// Name of the row-label column when a flat table is written out.
pub const ROW_LABEL_COLUMN: &str = "row";

/// Everything `convert` needs.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Defaults to the input file stem.
    pub table_name: Option<String>,
    pub group: GroupRequest,
    pub nest: NestOptions,
    pub ingest: IngestOptions,
    pub backup: bool,
    /// Existing document to add the new table to.
    pub append_to: Option<PathBuf>,
}

/// Outcome of a successful `convert`.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub output: PathBuf,
    pub table: TableSummary,
    pub table_count: usize,
    pub report: ConsistencyReport,
}

/// Shape of one table in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub y_columns: usize,
    pub replicates: usize,
    pub labelled_rows: bool,
}

impl TableSummary {
    fn of(table: &pzfx_model::Table) -> Self {
        let (rows, y_columns) = table.shape();
        Self {
            name: table.name.clone(),
            rows,
            y_columns,
            replicates: table.replicates(),
            labelled_rows: !table.row_axis.synthetic,
        }
    }
}

pub fn convert(request: &ConvertRequest) -> Result<ConvertResult> {
    let table_name = request
        .table_name
        .clone()
        .unwrap_or_else(|| default_table_name(&request.input));
    let span = info_span!("convert", table = %table_name);
    let _guard = span.enter();

    let frame = read_csv_frame(&request.input, &request.ingest)
        .with_context(|| format!("read {}", request.input.display()))?;

    let (mut document, mut report) = match &request.append_to {
        Some(path) => {
            let tables = load_document(path, &LoadOptions::default())
                .with_context(|| format!("load {}", path.display()))?;
            PrismDocument::from_tables(tables)
        }
        None => (PrismDocument::new(), ConsistencyReport::default()),
    };

    let built = document
        .add_table_with_options(&table_name, &request.group, &frame, request.nest)
        .with_context(|| format!("build table '{table_name}'"))?;
    report.extend(built.into_warnings());
    let table = document
        .table(&table_name)
        .map(TableSummary::of)
        .ok_or_else(|| anyhow!("table '{table_name}' missing after build"))?;

    let options = SaveOptions::default().with_backup(request.backup);
    save_document(&request.output, document.list_tables(), &options)
        .with_context(|| format!("write {}", request.output.display()))?;
    info!(
        output = %request.output.display(),
        tables = document.len(),
        warnings = report.len(),
        "conversion complete"
    );

    Ok(ConvertResult {
        output: request.output.clone(),
        table,
        table_count: document.len(),
        report,
    })
}

/// What `preview_file` shows before anything is written.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub kinds: ColumnKinds,
    pub flat: FlatTable,
    pub report: ConsistencyReport,
}

/// Build and flatten a table from the first `sample` rows of `input`,
/// without writing anything.
pub fn preview_file(
    input: &Path,
    group: &GroupRequest,
    ingest: &IngestOptions,
    sample: Option<usize>,
) -> Result<PreviewResult> {
    let frame = read_csv_frame(input, ingest)
        .with_context(|| format!("read {}", input.display()))?;
    let frame = match sample {
        Some(n) => sample_rows(&frame, n),
        None => frame,
    };
    let kinds = ColumnKinds::detect(&frame);
    let name = default_table_name(input);
    let (flat, report) = preview(&name, group, &frame).context("build preview")?;
    Ok(PreviewResult {
        kinds,
        flat,
        report,
    })
}

pub fn list_tables(path: &Path) -> Result<Vec<TableSummary>> {
    let tables = load_document(path, &LoadOptions::default())
        .with_context(|| format!("load {}", path.display()))?;
    Ok(tables.iter().map(TableSummary::of).collect())
}

/// Flatten one table of a document; the first table when `name` is `None`.
pub fn show_table(path: &Path, name: Option<&str>) -> Result<(String, FlatTable, ConsistencyReport)> {
    let (document, mut report) = PrismDocument::from_tables(
        load_document(path, &LoadOptions::default())
            .with_context(|| format!("load {}", path.display()))?,
    );
    let name = match name {
        Some(name) => name.to_string(),
        None => document
            .table_names()
            .first()
            .map(|name| (*name).to_string())
            .ok_or_else(|| anyhow!("{} contains no tables", path.display()))?,
    };
    let (flat, extracted) = document
        .to_flat_table(&name)
        .with_context(|| format!("extract table '{name}'"))?;
    report.extend(extracted.into_warnings());
    Ok((name, flat, report))
}

/// Write a flat table as CSV with the row labels first.
pub fn write_flat_csv(flat: &FlatTable, path: &Path) -> Result<()> {
    let mut frame = flat
        .with_row_labels(ROW_LABEL_COLUMN)
        .context("attach row labels")?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn default_table_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| "Data 1".to_string())
}
