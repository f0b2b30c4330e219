//! Ordered, named collection of tables.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tracing::{info, warn};

use pzfx_model::{
    ConsistencyReport, ConsistencyWarning, GroupRequest, NestOptions, Table, WarningKind,
    WarningLocation,
};

use crate::consistency::unique_name;
use crate::error::{Result, TransformError};
use crate::extract::{FlatTable, extract};
use crate::pipeline::build_table_with_options;

/// The in-memory counterpart of a `.pzfx` file.
///
/// Table names are unique and tables keep insertion order, which is the
/// order they are written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrismDocument {
    tables: Vec<Table>,
}

impl PrismDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap tables read from a file.
    ///
    /// Prism allows two tables with the same title; a repeated name is kept
    /// under a `_{n}` suffix and reported as a `KeyCollision`.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> (Self, ConsistencyReport) {
        let mut document = Self::new();
        let mut report = ConsistencyReport::default();
        let mut used = HashSet::new();
        for mut table in tables {
            let (name, renamed) = unique_name(&table.name, &mut used);
            if renamed {
                let warning = ConsistencyWarning::new(
                    WarningKind::KeyCollision,
                    WarningLocation::table(&name),
                    format!("table name '{}' repeated; renamed to '{name}'", table.name),
                );
                warn!(location = %warning.location, "{}", warning.detail);
                report.push(warning);
                table.rename(name);
            }
            document.tables.push(table);
        }
        (document, report)
    }

    pub fn add_table(
        &mut self,
        name: &str,
        request: &GroupRequest,
        frame: &DataFrame,
    ) -> Result<ConsistencyReport> {
        self.add_table_with_options(name, request, frame, NestOptions::default())
    }

    /// Build a table and append it. Fails when `name` is already taken.
    pub fn add_table_with_options(
        &mut self,
        name: &str,
        request: &GroupRequest,
        frame: &DataFrame,
        options: NestOptions,
    ) -> Result<ConsistencyReport> {
        if self.position(name).is_some() {
            return Err(TransformError::DuplicateTable {
                name: name.to_string(),
            });
        }
        let outcome = build_table_with_options(name, request, frame, options)?;
        info!(table = %name, warnings = outcome.report.len(), "added table");
        self.tables.push(outcome.table);
        Ok(outcome.report)
    }

    /// Build a table and put it in place of the one with the same name,
    /// appending when there is none.
    pub fn replace_table(
        &mut self,
        name: &str,
        request: &GroupRequest,
        frame: &DataFrame,
        options: NestOptions,
    ) -> Result<ConsistencyReport> {
        let outcome = build_table_with_options(name, request, frame, options)?;
        match self.position(name) {
            Some(index) => self.tables[index] = outcome.table,
            None => self.tables.push(outcome.table),
        }
        Ok(outcome.report)
    }

    /// Append a table built elsewhere.
    pub fn insert_table(&mut self, table: Table) -> Result<()> {
        if self.position(&table.name).is_some() {
            return Err(TransformError::DuplicateTable { name: table.name });
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn remove_table(&mut self, name: &str) -> Result<Table> {
        let index = self.position(name).ok_or_else(|| TransformError::UnknownTable {
            name: name.to_string(),
        })?;
        Ok(self.tables.remove(index))
    }

    pub fn list_tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn to_flat_table(&self, name: &str) -> Result<(FlatTable, ConsistencyReport)> {
        let table = self.table(name).ok_or_else(|| TransformError::UnknownTable {
            name: name.to_string(),
        })?;
        Ok(extract(table)?)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }
}
