//! Structural warnings.
//!
//! Warnings describe anomalies in the source data. They never abort a
//! transform; callers decide whether to surface them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A subcolumn has fewer (or more) populated cells than the row axis.
    RowCountMismatch,
    /// Two values mapped to the same cell or the same output column name.
    KeyCollision,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCountMismatch => f.write_str("row count mismatch"),
            Self::KeyCollision => f.write_str("key collision"),
        }
    }
}

/// Where in the hierarchy a warning applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningLocation {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcolumn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
}

impl WarningLocation {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_y_column(mut self, title: impl Into<String>) -> Self {
        self.y_column = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_subcolumn(mut self, label: impl Into<String>) -> Self {
        self.subcolumn = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_row(mut self, label: impl Into<String>) -> Self {
        self.row = Some(label.into());
        self
    }
}

impl fmt::Display for WarningLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;
        if let Some(y) = &self.y_column {
            write!(f, " / {y}")?;
        }
        if let Some(sub) = &self.subcolumn {
            write!(f, " / {sub}")?;
        }
        if let Some(row) = &self.row {
            write!(f, " @ row {row}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyWarning {
    pub kind: WarningKind,
    pub location: WarningLocation,
    pub detail: String,
}

impl ConsistencyWarning {
    pub fn new(kind: WarningKind, location: WarningLocation, detail: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.detail)
    }
}

/// Ordered collection of warnings from one transform call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub warnings: Vec<ConsistencyWarning>,
}

impl ConsistencyReport {
    pub fn push(&mut self, warning: ConsistencyWarning) {
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = ConsistencyWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<ConsistencyWarning> {
        self.warnings
    }
}
