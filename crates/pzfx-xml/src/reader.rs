//! `.pzfx` reader.
//!
//! Elements are matched by local name so both namespaced and plain files
//! load. Only the parts that map onto the table model are kept; layouts,
//! graphs, analyses and styling are skipped.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use pzfx_model::{ALL_LABEL, CellValue, RowLabelAxis, Subcolumn, Table, YColumn};

use crate::error::{PzfxError, Result};

#[derive(Debug, Default)]
struct RawSubcolumn {
    label: Option<String>,
    cells: Vec<CellValue>,
}

#[derive(Debug, Default)]
struct RawYColumn {
    title: String,
    subcolumns: Vec<RawSubcolumn>,
}

#[derive(Debug, Default)]
struct RawTable {
    id: Option<String>,
    title: String,
    row_titles: Option<Vec<String>>,
    y_columns: Vec<RawYColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    RowTitles,
    YColumn,
    /// X columns and any other column kind the model has no place for.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    TableTitle,
    ColumnTitle,
    Cell,
}

/// Read every data table of a Prism document.
///
/// Tables come back in `TableSequence` order when the file has one,
/// otherwise in document order.
pub fn read_pzfx<R: BufRead>(reader: R) -> Result<Vec<Table>> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut seen_root = false;
    let mut sequence: Vec<String> = Vec::new();
    let mut in_sequence = false;
    let mut tables: Vec<RawTable> = Vec::new();
    let mut current: Option<RawTable> = None;
    let mut section = Section::None;
    let mut in_subcolumn = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();
    let mut depth = 0usize;
    let mut table_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"GraphPadPrismFile" => seen_root = true,
                    b"TableSequence" => in_sequence = true,
                    b"Ref" if in_sequence => {
                        if let Some(id) = attribute(&e, b"ID")? {
                            sequence.push(id);
                        }
                    }
                    b"Table" => {
                        current = Some(RawTable {
                            id: attribute(&e, b"ID")?,
                            ..RawTable::default()
                        });
                        section = Section::None;
                        table_depth = depth;
                    }
                    b"Title" if current.is_some() && capture.is_none() => {
                        capture = match section {
                            Section::YColumn => Some(Capture::ColumnTitle),
                            Section::None if depth == table_depth + 1 => Some(Capture::TableTitle),
                            _ => None,
                        };
                        text.clear();
                    }
                    b"XColumn" | b"XAdvancedColumn" if current.is_some() => {
                        section = Section::Other;
                    }
                    b"RowTitlesColumn" => {
                        if let Some(table) = current.as_mut() {
                            table.row_titles = Some(Vec::new());
                            section = Section::RowTitles;
                        }
                    }
                    b"YColumn" => {
                        if let Some(table) = current.as_mut() {
                            table.y_columns.push(RawYColumn::default());
                            section = Section::YColumn;
                        }
                    }
                    b"Subcolumn" if section != Section::None => {
                        in_subcolumn = true;
                        start_subcolumn(current.as_mut(), section, &e)?;
                    }
                    b"d" if in_subcolumn => {
                        capture = Some(Capture::Cell);
                        text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match e.local_name().as_ref() {
                b"Ref" if in_sequence => {
                    if let Some(id) = attribute(&e, b"ID")? {
                        sequence.push(id);
                    }
                }
                b"Subcolumn" if section != Section::None => {
                    start_subcolumn(current.as_mut(), section, &e)?;
                }
                b"d" if in_subcolumn => push_cell(current.as_mut(), section, ""),
                _ => {}
            },
            Event::Text(e) if capture.is_some() => {
                text.push_str(std::str::from_utf8(&e)?);
            }
            Event::CData(e) if capture.is_some() => {
                text.push_str(std::str::from_utf8(&e)?);
            }
            Event::GeneralRef(e) if capture.is_some() => {
                resolve_entity(std::str::from_utf8(&e)?, &mut text)?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"TableSequence" => in_sequence = false,
                    b"Title" if matches!(capture, Some(Capture::TableTitle | Capture::ColumnTitle)) => {
                        let title = text.trim().to_string();
                        if let Some(table) = current.as_mut() {
                            match capture {
                                Some(Capture::ColumnTitle) => {
                                    if let Some(y) = table.y_columns.last_mut() {
                                        y.title = title;
                                    }
                                }
                                _ => table.title = title,
                            }
                        }
                        capture = None;
                    }
                    b"d" if capture == Some(Capture::Cell) => {
                        push_cell(current.as_mut(), section, &text);
                        capture = None;
                    }
                    b"Subcolumn" => in_subcolumn = false,
                    b"RowTitlesColumn" | b"YColumn" | b"XColumn" | b"XAdvancedColumn" => {
                        section = Section::None;
                    }
                    b"Table" => {
                        if let Some(table) = current.take() {
                            tables.push(table);
                        }
                        section = Section::None;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(PzfxError::malformed("missing GraphPadPrismFile root element"));
    }

    let ordered = order_by_sequence(tables, &sequence);
    debug!(tables = ordered.len(), "read prism document");
    Ok(ordered.into_iter().map(build_table).collect())
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

/// Append the text an `&name;` reference stands for.
fn resolve_entity(name: &str, out: &mut String) -> Result<()> {
    let resolved = match name.strip_prefix('#') {
        Some(code) => {
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32).map(|ch| out.push(ch))
        }
        None => resolve_predefined_entity(name).map(|text| out.push_str(text)),
    };
    resolved.ok_or_else(|| PzfxError::malformed(format!("unknown entity `&{name};`")))
}

fn start_subcolumn(
    table: Option<&mut RawTable>,
    section: Section,
    element: &BytesStart<'_>,
) -> Result<()> {
    if section != Section::YColumn {
        return Ok(());
    }
    if let Some(y) = table.and_then(|t| t.y_columns.last_mut()) {
        y.subcolumns.push(RawSubcolumn {
            label: attribute(element, b"Label")?,
            cells: Vec::new(),
        });
    }
    Ok(())
}

fn push_cell(table: Option<&mut RawTable>, section: Section, raw: &str) {
    let Some(table) = table else {
        return;
    };
    match section {
        Section::RowTitles => {
            if let Some(titles) = table.row_titles.as_mut() {
                titles.push(raw.trim().to_string());
            }
        }
        Section::YColumn => {
            if let Some(sub) = table
                .y_columns
                .last_mut()
                .and_then(|y| y.subcolumns.last_mut())
            {
                sub.cells.push(CellValue::from_text(raw));
            }
        }
        Section::None | Section::Other => {}
    }
}

fn order_by_sequence(mut tables: Vec<RawTable>, sequence: &[String]) -> Vec<RawTable> {
    if sequence.is_empty() {
        return tables;
    }
    let mut ordered = Vec::with_capacity(tables.len());
    for id in sequence {
        if let Some(index) = tables.iter().position(|t| t.id.as_deref() == Some(id.as_str())) {
            ordered.push(tables.remove(index));
        }
    }
    // tables missing from the sequence keep document order
    ordered.extend(tables);
    ordered
}

fn build_table(raw: RawTable) -> Table {
    let longest = raw
        .y_columns
        .iter()
        .flat_map(|y| y.subcolumns.iter().map(|s| s.cells.len()))
        .max()
        .unwrap_or(0);
    let row_axis = match raw.row_titles {
        Some(mut labels) => {
            if labels.len() < longest {
                debug!(
                    table = %raw.title,
                    titles = labels.len(),
                    rows = longest,
                    "padding row titles"
                );
                labels.resize(longest, String::new());
            }
            RowLabelAxis::labelled(labels)
        }
        None => RowLabelAxis::positional(longest),
    };
    let axis_len = row_axis.len();

    let mut table = Table::new(raw.title, row_axis);
    for raw_y in raw.y_columns {
        let lone = raw_y.subcolumns.len() == 1;
        let mut y_column = YColumn::new(raw_y.title);
        for (index, raw_sub) in raw_y.subcolumns.into_iter().enumerate() {
            let label = raw_sub.label.unwrap_or_else(|| {
                if lone {
                    ALL_LABEL.to_string()
                } else {
                    (index + 1).to_string()
                }
            });
            let mut cells = raw_sub.cells;
            cells.resize(axis_len, CellValue::Missing);
            y_column.subcolumns.push(Subcolumn { label, cells });
        }
        table.y_columns.push(y_column);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRISM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GraphPadPrismFile xmlns="http://graphpad.com/prism/Prism.htm" PrismXMLVersion="5.00">
  <Created><OriginalVersion CreatedByProgram="GraphPad Prism" CreatedByVersion="9.0"/></Created>
  <InfoSequence><Ref ID="Info0" Selected="1"/></InfoSequence>
  <Info ID="Info0"><Title>Project info 1</Title></Info>
  <TableSequence>
    <Ref ID="Table1"/>
    <Ref ID="Table0" Selected="1"/>
  </TableSequence>
  <Table ID="Table0" XFormat="none" YFormat="replicates" Replicates="2" TableType="OneWay">
    <Title>First</Title>
    <YColumn Width="81" Decimals="2" Subcolumns="2">
      <Title>Control</Title>
      <Subcolumn><d>1</d><d>2</d><d/></Subcolumn>
      <Subcolumn><d>3</d></Subcolumn>
    </YColumn>
  </Table>
  <Table ID="Table1" XFormat="none" YFormat="replicates" Replicates="1" TableType="TwoWay">
    <Title>Second &amp; last</Title>
    <RowTitlesColumn Width="81"><Subcolumn><d>0</d><d>24</d></Subcolumn></RowTitlesColumn>
    <YColumn Width="81" Decimals="2" Subcolumns="1">
      <Title><TextAlign align="Center">Drug&#65;</TextAlign></Title>
      <Subcolumn><d>12.1</d><d>n.d.</d></Subcolumn>
    </YColumn>
  </Table>
</GraphPadPrismFile>
"#;

    #[test]
    fn reads_tables_in_sequence_order() {
        let tables = read_pzfx(PRISM_SAMPLE.as_bytes()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "Second & last");
        assert_eq!(tables[1].name, "First");
    }

    #[test]
    fn labels_default_when_absent() {
        let tables = read_pzfx(PRISM_SAMPLE.as_bytes()).unwrap();
        let first = &tables[1];
        assert!(first.row_axis.synthetic);
        assert_eq!(first.row_axis.len(), 3);
        let control = &first.y_columns[0];
        assert_eq!(control.subcolumns[0].label, "1");
        assert_eq!(control.subcolumns[1].label, "2");
        assert_eq!(
            control.subcolumns[1].cells,
            vec![CellValue::Number(3.0), CellValue::Missing, CellValue::Missing]
        );

        let second = &tables[0];
        assert_eq!(second.y_columns[0].subcolumns[0].label, ALL_LABEL);
    }

    #[test]
    fn row_titles_and_text_cells() {
        let tables = read_pzfx(PRISM_SAMPLE.as_bytes()).unwrap();
        let second = &tables[0];
        assert!(!second.row_axis.synthetic);
        assert_eq!(second.row_axis.labels, vec!["0", "24"]);
        assert_eq!(second.y_columns[0].title, "DrugA");
        assert_eq!(
            second.y_columns[0].subcolumns[0].cells,
            vec![CellValue::Number(12.1), CellValue::Text("n.d.".into())]
        );
    }

    #[test]
    fn x_column_titles_do_not_rename_table() {
        let xml = r#"<GraphPadPrismFile PrismXMLVersion="5.00">
  <Table ID="Table0" XFormat="numbers" YFormat="replicates" Replicates="1" TableType="XY">
    <Title>Dose response</Title>
    <XColumn Width="81" Subcolumns="1" Decimals="0">
      <Title>Dose</Title>
      <Subcolumn><d>1</d><d>10</d></Subcolumn>
    </XColumn>
    <YColumn Width="81" Decimals="2" Subcolumns="1">
      <Title>Response</Title>
      <Subcolumn><d>0.5</d><d>0.9</d></Subcolumn>
    </YColumn>
  </Table>
</GraphPadPrismFile>"#;
        let tables = read_pzfx(xml.as_bytes()).unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.name, "Dose response");
        assert_eq!(table.y_titles(), vec!["Response"]);
        assert_eq!(table.y_columns[0].subcolumns.len(), 1);
        assert_eq!(
            table.y_columns[0].subcolumns[0].cells,
            vec![CellValue::Number(0.5), CellValue::Number(0.9)]
        );
    }

    #[test]
    fn rejects_non_prism_xml() {
        let err = read_pzfx("<html><body/></html>".as_bytes()).unwrap_err();
        assert!(matches!(err, PzfxError::Malformed { .. }));
    }
}
