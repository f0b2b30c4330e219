//! Grouping configuration.
//!
//! A [`GroupRequest`] carries the raw, possibly contradictory parameters a
//! caller supplies; the resolver turns it into a canonical [`GroupSpec`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of the synthetic single group used when an axis is unconfigured.
pub const ALL_LABEL: &str = "All";

/// Resolved group value for one axis of a point record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum GroupKey {
    /// Synthetic single group for an unconfigured axis.
    All,
    /// Label read from a grouping column, or a data column name for list-form axes.
    Label(String),
    /// 1-based positional index, used on the row axis when no row grouping applies.
    Position(usize),
}

impl GroupKey {
    pub fn label(&self) -> String {
        match self {
            Self::All => ALL_LABEL.to_string(),
            Self::Label(label) => label.clone(),
            Self::Position(index) => index.to_string(),
        }
    }

    pub fn is_position(&self) -> bool {
        matches!(self, Self::Position(_))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// How a sub-group or row-group axis is derived.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "form", content = "columns", rename_all = "snake_case")]
pub enum AxisSpec {
    #[default]
    None,
    /// Label form: group values are read per row from this column.
    Column(String),
    /// List form: each listed data column is its own group value.
    Columns(Vec<String>),
}

impl AxisSpec {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::Columns(_))
    }

    pub fn label_column(&self) -> Option<&str> {
        match self {
            Self::Column(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Canonical grouping specification produced by the resolver.
///
/// At most one form is set per axis and `data_columns` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub main_key: Option<String>,
    pub sub_key: AxisSpec,
    pub row_key: AxisSpec,
    pub data_columns: Vec<String>,
}

impl GroupSpec {
    /// True when each data column becomes its own subcolumn even though no
    /// sub-grouping was requested.
    pub fn data_columns_as_subcolumns(&self) -> bool {
        self.sub_key.is_none() && !self.row_key.is_list() && self.data_columns.len() > 1
    }

    /// True when label-form sub groups must be qualified with the data column
    /// name to stay distinct.
    pub fn qualifies_sub_labels(&self) -> bool {
        self.sub_key.label_column().is_some()
            && !self.row_key.is_list()
            && self.data_columns.len() > 1
    }
}

/// Raw grouping parameters as supplied by a caller.
///
/// Empty lists mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub groupby: Option<String>,
    pub subgroupby: Option<String>,
    #[serde(default)]
    pub subgroupcols: Vec<String>,
    pub rowgroupby: Option<String>,
    #[serde(default)]
    pub rowgroupcols: Vec<String>,
    #[serde(default)]
    pub cols: Vec<String>,
}

impl GroupRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_groupby(mut self, column: impl Into<String>) -> Self {
        self.groupby = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_subgroupby(mut self, column: impl Into<String>) -> Self {
        self.subgroupby = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_subgroupcols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subgroupcols = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_rowgroupby(mut self, column: impl Into<String>) -> Self {
        self.rowgroupby = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_rowgroupcols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rowgroupcols = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_cols<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cols = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// What to do when two records land on the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later record overwrites the earlier one.
    #[default]
    KeepLast,
    /// The first record wins; later ones are discarded.
    KeepFirst,
}

/// Options for the hierarchy builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestOptions {
    pub collision_policy: CollisionPolicy,
}

impl NestOptions {
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }
}
