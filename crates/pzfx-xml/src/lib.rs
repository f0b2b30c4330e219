//! GraphPad Prism (`.pzfx`) document reader and writer.
//!
//! The Prism XML format stores each data table as a row-title column plus a
//! list of Y columns, each holding one or more replicate subcolumns of `<d>`
//! cells. This crate maps that layout onto [`pzfx_model::Table`] in both
//! directions.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pzfx_model::{CellValue, RowLabelAxis, Table};
//! use pzfx_xml::{LoadOptions, SaveOptions, load_document, save_document};
//!
//! let mut table = Table::new("Time course", RowLabelAxis::labelled(vec!["0".into(), "24".into()]));
//! table.append_subcolumn("Control", "All", vec![CellValue::Number(10.5), CellValue::Number(15.2)]);
//!
//! save_document(Path::new("out.pzfx"), &[table], &SaveOptions::default()).unwrap();
//! let tables = load_document(Path::new("out.pzfx"), &LoadOptions::default()).unwrap();
//! assert_eq!(tables[0].name, "Time course");
//! ```
//!
//! Subcolumn labels have no place in the Prism schema; they are kept in a
//! `pzfx:Label` attribute that Prism ignores.

pub mod error;
pub mod file;
pub mod options;
pub mod reader;
pub mod writer;

pub use error::{PzfxError, Result};
pub use file::{backup_path, load_document, save_document};
pub use options::{LoadOptions, SaveOptions};
pub use reader::read_pzfx;
pub use writer::write_pzfx;

/// Default namespace of Prism XML documents.
pub const PRISM_NS: &str = "http://graphpad.com/prism/Prism.htm";
/// `PrismXMLVersion` written on the root element.
pub const PRISM_XML_VERSION: &str = "5.00";
/// Namespace of the subcolumn label attribute.
pub const LABEL_NS: &str = "urn:pzfx:labels";
pub(crate) const LABEL_ATTR: &str = "pzfx:Label";
