//! Integration tests for the file-level workflow.

use std::fs;
use std::path::{Path, PathBuf};

use pzfx_cli::workflow::{
    ConvertRequest, convert, list_tables, preview_file, show_table, write_flat_csv,
};
use pzfx_ingest::IngestOptions;
use pzfx_model::{CellValue, GroupRequest, NestOptions, WarningKind};

const TIME_COURSE: &str = "treatment,time,value\n\
                           Control,0,10.5\n\
                           Control,24,15.2\n\
                           DrugA,0,12.1\n\
                           DrugA,24,25.8\n";

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

fn time_course_request(input: PathBuf, output: PathBuf) -> ConvertRequest {
    ConvertRequest {
        input,
        output,
        table_name: None,
        group: GroupRequest::new()
            .with_groupby("treatment")
            .with_rowgroupby("time")
            .with_cols(["value"]),
        nest: NestOptions::default(),
        ingest: IngestOptions::default(),
        backup: false,
        append_to: None,
    }
}

#[test]
fn convert_writes_readable_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let output = dir.path().join("out.pzfx");

    let result = convert(&time_course_request(input, output.clone())).expect("convert");
    assert_eq!(result.table.name, "time_course");
    assert_eq!(result.table.rows, 2);
    assert_eq!(result.table.y_columns, 2);
    assert!(result.table.labelled_rows);
    assert!(result.report.is_clean());

    let tables = list_tables(&output).expect("list");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0], result.table);

    let (name, flat, _) = show_table(&output, None).expect("show");
    assert_eq!(name, "time_course");
    assert_eq!(flat.column_names(), vec!["Control", "DrugA"]);
    assert_eq!(flat.value("DrugA", 1), Some(CellValue::Number(25.8)));
}

#[test]
fn append_adds_table_and_rejects_duplicates() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let output = dir.path().join("out.pzfx");
    convert(&time_course_request(input.clone(), output.clone())).expect("first");

    let mut second = time_course_request(input.clone(), output.clone());
    second.table_name = Some("Second".into());
    second.append_to = Some(output.clone());
    second.backup = true;
    let result = convert(&second).expect("append");
    assert_eq!(result.table_count, 2);
    assert!(pzfx_xml::backup_path(&output).exists());

    let names: Vec<String> = list_tables(&output)
        .expect("list")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["time_course", "Second"]);

    let mut duplicate = time_course_request(input, output.clone());
    duplicate.append_to = Some(output);
    let err = convert(&duplicate).expect_err("duplicate");
    assert!(format!("{err:#}").contains("already exists"));
}

#[test]
fn configuration_errors_surface() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let output = dir.path().join("out.pzfx");

    let mut request = time_course_request(input, output.clone());
    request.group = GroupRequest::new()
        .with_subgroupby("time")
        .with_subgroupcols(["value"]);
    let err = convert(&request).expect_err("conflict");
    assert!(format!("{err:#}").contains("sub-group"));
    assert!(!output.exists());
}

#[test]
fn preview_samples_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let group = GroupRequest::new().with_groupby("treatment").with_cols(["value"]);

    let preview =
        preview_file(&input, &group, &IngestOptions::default(), Some(3)).expect("preview");
    assert_eq!(preview.kinds.categorical, vec!["treatment"]);
    assert!(preview.kinds.is_numeric("value"));
    let flat = &preview.flat;
    assert_eq!(flat.column_names(), vec!["Control", "DrugA"]);
    assert_eq!(flat.height(), 2);
    assert_eq!(flat.value("DrugA", 1), Some(CellValue::Missing));
    assert_eq!(preview.report.count(WarningKind::RowCountMismatch), 1);
}

#[test]
fn show_writes_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let output = dir.path().join("out.pzfx");
    convert(&time_course_request(input, output.clone())).expect("convert");

    let (_, flat, _) = show_table(&output, Some("time_course")).expect("show");
    let csv = dir.path().join("flat.csv");
    write_flat_csv(&flat, &csv).expect("csv");
    let text = fs::read_to_string(&csv).expect("read csv");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("row,Control,DrugA"));
    assert_eq!(lines.next(), Some("0,10.5,12.1"));
}

#[test]
fn append_keeps_tables_with_repeated_titles() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), "time_course.csv", TIME_COURSE);
    let existing = write_csv(
        dir.path(),
        "existing.pzfx",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<GraphPadPrismFile PrismXMLVersion="5.00">
  <Table ID="Table0"><Title>Data 1</Title>
    <YColumn><Title>A</Title><Subcolumn><d>1</d></Subcolumn></YColumn>
  </Table>
  <Table ID="Table1"><Title>Data 1</Title>
    <YColumn><Title>B</Title><Subcolumn><d>2</d><d>3</d></Subcolumn></YColumn>
  </Table>
</GraphPadPrismFile>
"#,
    );
    let output = dir.path().join("out.pzfx");

    let mut request = time_course_request(input, output.clone());
    request.table_name = Some("Extra".into());
    request.append_to = Some(existing);
    let result = convert(&request).expect("append");
    assert_eq!(result.table_count, 3);
    assert_eq!(result.report.count(WarningKind::KeyCollision), 1);

    let tables = list_tables(&output).expect("list");
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Data 1", "Data 1_1", "Extra"]);
    assert_eq!(tables[1].rows, 2);

    let (_, flat, _) = show_table(&output, Some("Data 1_1")).expect("show");
    assert_eq!(flat.value("B", 1), Some(CellValue::Number(3.0)));
}
