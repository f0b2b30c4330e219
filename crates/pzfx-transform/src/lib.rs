//! Transforms between flat tables and grouped Prism tables.
//!
//! The forward direction runs in three stages:
//!
//! - **resolve**: validate a [`GroupRequest`] against the input frame
//! - **ravel**: flatten rows into [`PointRecord`]s tagged with group keys
//! - **nest**: fold records into the Table -> YColumn -> Subcolumn hierarchy
//!
//! **extract** is the inverse, and **consistency** holds the checks both
//! directions share. [`PrismDocument`] owns an ordered set of tables and
//! exposes the table-management operations.
//!
//! [`GroupRequest`]: pzfx_model::GroupRequest
//! [`PointRecord`]: pzfx_model::PointRecord

pub mod consistency;
pub mod document;
pub mod error;
pub mod extract;
pub mod nest;
pub mod pipeline;
pub mod ravel;
pub mod resolve;
pub mod values;

pub use document::PrismDocument;
pub use error::{Result, TransformError};
pub use extract::{FlatTable, LONG_MAIN, LONG_ROW, LONG_SUB, LONG_VALUE, extract, extract_long, restack_request};
pub use nest::{NestOutcome, nest};
pub use pipeline::{build_table, build_table_with_options, preview};
pub use ravel::ravel;
pub use resolve::resolve_group_spec;
