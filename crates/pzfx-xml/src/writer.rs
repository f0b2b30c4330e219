//! `.pzfx` writer.
//!
//! Every node is emitted as a typed quick-xml event; cell text and titles
//! are escaped by the writer.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use pzfx_model::{CellValue, Table};

use crate::error::{PzfxError, Result};
use crate::options::SaveOptions;
use crate::{LABEL_ATTR, LABEL_NS, PRISM_NS, PRISM_XML_VERSION};

const COLUMN_WIDTH: &str = "81";
const DECIMALS: &str = "2";

/// Write `tables` as a complete Prism document.
pub fn write_pzfx<W: Write>(writer: W, tables: &[Table], options: &SaveOptions) -> Result<()> {
    let mut seen = BTreeSet::new();
    for table in tables {
        if !seen.insert(table.name.as_str()) {
            return Err(PzfxError::DuplicateTable {
                name: table.name.clone(),
            });
        }
    }

    let mut xml = if options.indent > 0 {
        Writer::new_with_indent(writer, b' ', options.indent)
    } else {
        Writer::new(writer)
    };

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("GraphPadPrismFile");
    root.push_attribute(("xmlns", PRISM_NS));
    root.push_attribute(("xmlns:pzfx", LABEL_NS));
    root.push_attribute(("PrismXMLVersion", PRISM_XML_VERSION));
    xml.write_event(Event::Start(root))?;

    write_created(&mut xml)?;

    xml.write_event(Event::Start(BytesStart::new("TableSequence")))?;
    for index in 0..tables.len() {
        let id = table_id(index);
        let mut reference = BytesStart::new("Ref");
        reference.push_attribute(("ID", id.as_str()));
        if index == 0 {
            reference.push_attribute(("Selected", "1"));
        }
        xml.write_event(Event::Empty(reference))?;
    }
    xml.write_event(Event::End(BytesEnd::new("TableSequence")))?;

    for (index, table) in tables.iter().enumerate() {
        write_table(&mut xml, &table_id(index), table)?;
    }

    xml.write_event(Event::End(BytesEnd::new("GraphPadPrismFile")))?;
    xml.into_inner().flush()?;
    Ok(())
}

fn table_id(index: usize) -> String {
    format!("Table{index}")
}

fn write_created<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    xml.write_event(Event::Start(BytesStart::new("Created")))?;
    let mut version = BytesStart::new("OriginalVersion");
    version.push_attribute(("CreatedByProgram", "pzfx"));
    version.push_attribute(("CreatedByVersion", env!("CARGO_PKG_VERSION")));
    version.push_attribute(("DateTime", timestamp.as_str()));
    xml.write_event(Event::Empty(version))?;
    xml.write_event(Event::End(BytesEnd::new("Created")))?;
    Ok(())
}

fn write_table<W: Write>(xml: &mut Writer<W>, id: &str, table: &Table) -> Result<()> {
    let replicates = table.replicates().max(1).to_string();
    let table_type = if table.row_axis.synthetic {
        "OneWay"
    } else {
        "TwoWay"
    };
    let mut start = BytesStart::new("Table");
    start.push_attribute(("ID", id));
    start.push_attribute(("XFormat", "none"));
    start.push_attribute(("YFormat", "replicates"));
    start.push_attribute(("Replicates", replicates.as_str()));
    start.push_attribute(("TableType", table_type));
    xml.write_event(Event::Start(start))?;
    write_title(xml, &table.name)?;

    if !table.row_axis.synthetic {
        let mut titles = BytesStart::new("RowTitlesColumn");
        titles.push_attribute(("Width", COLUMN_WIDTH));
        xml.write_event(Event::Start(titles))?;
        xml.write_event(Event::Start(BytesStart::new("Subcolumn")))?;
        for label in &table.row_axis.labels {
            write_d(xml, Some(label))?;
        }
        xml.write_event(Event::End(BytesEnd::new("Subcolumn")))?;
        xml.write_event(Event::End(BytesEnd::new("RowTitlesColumn")))?;
    }

    for y_column in &table.y_columns {
        let count = y_column.subcolumns.len().to_string();
        let mut start = BytesStart::new("YColumn");
        start.push_attribute(("Width", COLUMN_WIDTH));
        start.push_attribute(("Decimals", DECIMALS));
        start.push_attribute(("Subcolumns", count.as_str()));
        xml.write_event(Event::Start(start))?;
        write_title(xml, &y_column.title)?;
        for sub in &y_column.subcolumns {
            let mut start = BytesStart::new("Subcolumn");
            start.push_attribute((LABEL_ATTR, sub.label.as_str()));
            xml.write_event(Event::Start(start))?;
            for cell in &sub.cells {
                write_cell(xml, cell)?;
            }
            xml.write_event(Event::End(BytesEnd::new("Subcolumn")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("YColumn")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("Table")))?;
    Ok(())
}

fn write_title<W: Write>(xml: &mut Writer<W>, title: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("Title")))?;
    xml.write_event(Event::Text(BytesText::new(title)))?;
    xml.write_event(Event::End(BytesEnd::new("Title")))?;
    Ok(())
}

fn write_cell<W: Write>(xml: &mut Writer<W>, cell: &CellValue) -> Result<()> {
    write_d(xml, cell.render().as_deref())
}

fn write_d<W: Write>(xml: &mut Writer<W>, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) if !text.is_empty() => {
            xml.write_event(Event::Start(BytesStart::new("d")))?;
            xml.write_event(Event::Text(BytesText::new(text)))?;
            xml.write_event(Event::End(BytesEnd::new("d")))?;
        }
        _ => xml.write_event(Event::Empty(BytesStart::new("d")))?,
    }
    Ok(())
}
