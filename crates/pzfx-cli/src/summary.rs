use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pzfx_cli::workflow::{ConvertResult, ROW_LABEL_COLUMN, TableSummary};
use pzfx_ingest::ColumnKinds;
use pzfx_model::{ConsistencyReport, WarningKind};
use pzfx_transform::FlatTable;

/// Rows printed before a flat table is cut off.
const MAX_DISPLAY_ROWS: usize = 50;

pub fn print_convert_summary(result: &ConvertResult) {
    println!("Output: {}", result.output.display());
    println!("Tables in file: {}", result.table_count);
    let mut table = Table::new();
    table.set_header(summary_header());
    apply_summary_table_style(&mut table);
    align_numbers(&mut table);
    table.add_row(summary_row(&result.table));
    println!("{table}");
    print_warnings(&result.report);
}

pub fn print_table_list(tables: &[TableSummary]) {
    if tables.is_empty() {
        println!("No tables.");
        return;
    }
    let mut table = Table::new();
    table.set_header(summary_header());
    apply_summary_table_style(&mut table);
    align_numbers(&mut table);
    for summary in tables {
        table.add_row(summary_row(summary));
    }
    println!("{table}");
}

pub fn print_flat_table(title: &str, flat: &FlatTable) {
    println!("{title}");
    let names = flat.column_names();
    let mut table = Table::new();
    let mut header = vec![header_cell(ROW_LABEL_COLUMN)];
    header.extend(names.iter().map(|name| header_cell(name)));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=names.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (row, label) in flat.row_labels.iter().take(MAX_DISPLAY_ROWS).enumerate() {
        let mut cells = vec![Cell::new(label).add_attribute(Attribute::Bold)];
        for name in &names {
            match flat.value(name, row) {
                Some(value) if !value.is_missing() => cells.push(Cell::new(value)),
                _ => cells.push(dim_cell("-")),
            }
        }
        table.add_row(cells);
    }
    println!("{table}");
    if flat.height() > MAX_DISPLAY_ROWS {
        println!("... {} more rows", flat.height() - MAX_DISPLAY_ROWS);
    }
}

pub fn print_column_kinds(kinds: &ColumnKinds) {
    let list = |names: &[String]| {
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    };
    println!("Numeric columns: {}", list(&kinds.numeric));
    println!("Categorical columns: {}", list(&kinds.categorical));
    println!();
}

pub fn print_warnings(report: &ConsistencyReport) {
    if report.is_clean() {
        return;
    }
    println!();
    println!(
        "Warnings: {} row count mismatch, {} key collision",
        report.count(WarningKind::RowCountMismatch),
        report.count(WarningKind::KeyCollision)
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Location"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for warning in &report.warnings {
        let color = match warning.kind {
            WarningKind::RowCountMismatch => Color::Yellow,
            WarningKind::KeyCollision => Color::Red,
        };
        table.add_row(vec![
            Cell::new(warning.kind).fg(color),
            Cell::new(&warning.location),
            Cell::new(&warning.detail),
        ]);
    }
    println!("{table}");
}

fn summary_header() -> Vec<Cell> {
    vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Y columns"),
        header_cell("Replicates"),
        header_cell("Row labels"),
    ]
}

fn summary_row(summary: &TableSummary) -> Vec<Cell> {
    vec![
        Cell::new(&summary.name)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.rows),
        Cell::new(summary.y_columns),
        Cell::new(summary.replicates),
        if summary.labelled_rows {
            Cell::new("labelled")
        } else {
            dim_cell("positional")
        },
    ]
}

fn align_numbers(table: &mut Table) {
    for index in 1..=3 {
        align_column(table, index, CellAlignment::Right);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
