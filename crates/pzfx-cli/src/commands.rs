use anyhow::{Result, anyhow};

use pzfx_cli::workflow::{
    ConvertRequest, ConvertResult, PreviewResult, TableSummary, convert, list_tables,
    preview_file, show_table, write_flat_csv,
};
use pzfx_ingest::IngestOptions;
use pzfx_model::{CollisionPolicy, ConsistencyReport, GroupRequest, NestOptions};
use pzfx_transform::FlatTable;

use crate::cli::{ConvertArgs, GroupArgs, PreviewArgs, ShowArgs, TablesArgs};

impl GroupArgs {
    fn group_request(&self) -> GroupRequest {
        GroupRequest {
            groupby: self.groupby.clone(),
            subgroupby: self.subgroupby.clone(),
            subgroupcols: self.subgroupcols.clone(),
            rowgroupby: self.rowgroupby.clone(),
            rowgroupcols: self.rowgroupcols.clone(),
            cols: self.cols.clone(),
        }
    }

    fn nest_options(&self) -> NestOptions {
        let policy = if self.keep_first {
            CollisionPolicy::KeepFirst
        } else {
            CollisionPolicy::KeepLast
        };
        NestOptions::default().with_collision_policy(policy)
    }

    fn ingest_options(&self) -> Result<IngestOptions> {
        let mut options = IngestOptions::new();
        if let Some(separator) = self.separator {
            let byte = u8::try_from(separator)
                .ok()
                .filter(u8::is_ascii)
                .ok_or_else(|| anyhow!("separator must be a single ASCII character"))?;
            options = options.with_separator(byte);
        }
        Ok(options)
    }
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let request = ConvertRequest {
        input: args.input.clone(),
        output: args.output.clone(),
        table_name: args.table_name.clone(),
        group: args.group.group_request(),
        nest: args.group.nest_options(),
        ingest: args.group.ingest_options()?,
        backup: args.backup,
        append_to: args.append_to.clone(),
    };
    convert(&request)
}

pub fn run_preview(args: &PreviewArgs) -> Result<PreviewResult> {
    preview_file(
        &args.input,
        &args.group.group_request(),
        &args.group.ingest_options()?,
        args.sample,
    )
}

pub fn run_tables(args: &TablesArgs) -> Result<Vec<TableSummary>> {
    list_tables(&args.file)
}

pub fn run_show(args: &ShowArgs) -> Result<(String, FlatTable, ConsistencyReport)> {
    let (name, flat, report) = show_table(&args.file, args.table.as_deref())?;
    if let Some(path) = &args.csv {
        write_flat_csv(&flat, path)?;
    }
    Ok((name, flat, report))
}
