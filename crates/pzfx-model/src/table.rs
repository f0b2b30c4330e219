//! The Table -> YColumn -> Subcolumn hierarchy.
//!
//! Ownership is strictly top-down. The row axis lives on the table so that
//! cell position `i` in every subcolumn refers to the same logical row.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::warning::{ConsistencyWarning, WarningKind, WarningLocation};

/// Ordered row labels shared by every subcolumn of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLabelAxis {
    pub labels: Vec<String>,
    /// Labels are generated `1..=N` indices rather than user-supplied.
    pub synthetic: bool,
}

impl RowLabelAxis {
    pub fn labelled(labels: Vec<String>) -> Self {
        Self {
            labels,
            synthetic: false,
        }
    }

    pub fn positional(len: usize) -> Self {
        Self {
            labels: (1..=len).map(|i| i.to_string()).collect(),
            synthetic: true,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    fn grow_positional(&mut self, len: usize) {
        while self.labels.len() < len {
            self.labels.push((self.labels.len() + 1).to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcolumn {
    pub label: String,
    pub cells: Vec<CellValue>,
}

impl Subcolumn {
    /// A subcolumn of `len` missing cells.
    pub fn new(label: impl Into<String>, len: usize) -> Self {
        Self {
            label: label.into(),
            cells: vec![CellValue::Missing; len],
        }
    }

    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_missing()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YColumn {
    pub title: String,
    pub subcolumns: Vec<Subcolumn>,
}

impl YColumn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subcolumns: Vec::new(),
        }
    }

    pub fn subcolumn_mut(&mut self, label: &str) -> Option<&mut Subcolumn> {
        self.subcolumns.iter_mut().find(|s| s.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub row_axis: RowLabelAxis,
    pub y_columns: Vec<YColumn>,
}

impl Table {
    pub fn new(name: impl Into<String>, row_axis: RowLabelAxis) -> Self {
        Self {
            name: name.into(),
            row_axis,
            y_columns: Vec::new(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn y_titles(&self) -> Vec<&str> {
        self.y_columns.iter().map(|y| y.title.as_str()).collect()
    }

    /// Largest subcolumn count across YColumns.
    pub fn replicates(&self) -> usize {
        self.y_columns
            .iter()
            .map(|y| y.subcolumns.len())
            .max()
            .unwrap_or(0)
    }

    /// `(rows, y_columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_axis.len(), self.y_columns.len())
    }

    pub fn cell(&self, y_index: usize, sub_index: usize, row: usize) -> Option<&CellValue> {
        self.y_columns
            .get(y_index)?
            .subcolumns
            .get(sub_index)?
            .cells
            .get(row)
    }

    /// Append a subcolumn, creating the YColumn when absent.
    ///
    /// Cells are fitted to the row axis: a labelled axis pads or truncates,
    /// a synthetic axis grows to fit and pads every other subcolumn. A label
    /// already present in the YColumn is replaced.
    pub fn append_subcolumn(
        &mut self,
        y_title: &str,
        label: &str,
        mut cells: Vec<CellValue>,
    ) -> Vec<ConsistencyWarning> {
        let mut warnings = Vec::new();
        let location = WarningLocation::table(&self.name)
            .with_y_column(y_title)
            .with_subcolumn(label);

        if self.row_axis.synthetic && cells.len() > self.row_axis.len() {
            self.row_axis.grow_positional(cells.len());
            let len = self.row_axis.len();
            for sub in self.y_columns.iter_mut().flat_map(|y| y.subcolumns.iter_mut()) {
                sub.cells.resize(len, CellValue::Missing);
            }
        }

        let axis_len = self.row_axis.len();
        if cells.len() != axis_len {
            warnings.push(ConsistencyWarning::new(
                WarningKind::RowCountMismatch,
                location.clone(),
                format!(
                    "appended {} cells to a {axis_len}-row axis",
                    cells.len()
                ),
            ));
            cells.resize(axis_len, CellValue::Missing);
        }

        let position = match self.y_columns.iter().position(|y| y.title == y_title) {
            Some(position) => position,
            None => {
                self.y_columns.push(YColumn::new(y_title));
                self.y_columns.len() - 1
            }
        };
        let y_column = &mut self.y_columns[position];
        match y_column.subcolumn_mut(label) {
            Some(existing) => {
                warnings.push(ConsistencyWarning::new(
                    WarningKind::KeyCollision,
                    location,
                    "subcolumn label already present; replaced",
                ));
                existing.cells = cells;
            }
            None => y_column.subcolumns.push(Subcolumn {
                label: label.to_string(),
                cells,
            }),
        }
        warnings
    }
}
