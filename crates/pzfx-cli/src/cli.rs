//! CLI argument definitions for `pzfx`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pzfx",
    version,
    about = "Build GraphPad Prism (.pzfx) files from flat CSV data",
    long_about = "Group flat CSV data into GraphPad Prism tables.\n\n\
                  Rows are split into Y columns by --groupby, into replicate\n\
                  subcolumns by --subgroupby or --subgroupcols, and onto row\n\
                  labels by --rowgroupby or --rowgroupcols."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a CSV file into a Prism table and write a .pzfx file.
    Convert(ConvertArgs),

    /// Show the flat table a grouping would produce, without writing anything.
    Preview(PreviewArgs),

    /// List the tables in a .pzfx file.
    Tables(TablesArgs),

    /// Print one table of a .pzfx file in flat form.
    Show(ShowArgs),
}

/// Grouping and input options shared by `convert` and `preview`.
#[derive(Args)]
pub struct GroupArgs {
    /// Column whose values become Y columns.
    #[arg(long = "groupby", value_name = "COLUMN")]
    pub groupby: Option<String>,

    /// Column whose values become replicate subcolumns.
    #[arg(long = "subgroupby", value_name = "COLUMN")]
    pub subgroupby: Option<String>,

    /// Data columns that each become one subcolumn.
    #[arg(long = "subgroupcols", value_name = "COLUMNS", value_delimiter = ',')]
    pub subgroupcols: Vec<String>,

    /// Column whose values become row labels.
    #[arg(long = "rowgroupby", value_name = "COLUMN")]
    pub rowgroupby: Option<String>,

    /// Data columns that each become one row.
    #[arg(long = "rowgroupcols", value_name = "COLUMNS", value_delimiter = ',')]
    pub rowgroupcols: Vec<String>,

    /// Data columns to tabulate.
    #[arg(long = "cols", value_name = "COLUMNS", value_delimiter = ',')]
    pub cols: Vec<String>,

    /// Keep the first value when two rows land on the same cell (default: last).
    #[arg(long = "keep-first")]
    pub keep_first: bool,

    /// CSV field separator (default: detected from the header).
    #[arg(long = "separator", value_name = "CHAR")]
    pub separator: Option<char>,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output .pzfx file.
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    pub output: PathBuf,

    /// Table name (default: input file stem).
    #[arg(long = "table-name", value_name = "NAME")]
    pub table_name: Option<String>,

    #[command(flatten)]
    pub group: GroupArgs,

    /// Copy an existing output file to <OUT>.bak before overwriting it.
    #[arg(long = "backup")]
    pub backup: bool,

    /// Add the table to the tables of an existing .pzfx file.
    #[arg(long = "append-to", value_name = "FILE")]
    pub append_to: Option<PathBuf>,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub group: GroupArgs,

    /// Only use the first N rows of the input.
    #[arg(long = "sample", value_name = "N")]
    pub sample: Option<usize>,
}

#[derive(Args)]
pub struct TablesArgs {
    /// Prism file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Prism file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Table to show (default: the first table).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Also write the flat table to this CSV file.
    #[arg(long = "csv", value_name = "OUT")]
    pub csv: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
