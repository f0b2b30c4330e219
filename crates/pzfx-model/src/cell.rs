//! Scalar cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell in a subcolumn.
///
/// `Missing` is the sentinel for absent cells; it is what a freshly
/// allocated subcolumn is filled with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Parse raw text into a cell.
    ///
    /// Blank text and `NaN` are missing, anything else that parses as `f64`
    /// is a number, everything else is kept as text.
    ///
    /// ```
    /// use pzfx_model::CellValue;
    ///
    /// assert_eq!(CellValue::from_text("  "), CellValue::Missing);
    /// assert_eq!(CellValue::from_text("12.5"), CellValue::Number(12.5));
    /// assert_eq!(CellValue::from_text("n.d."), CellValue::Text("n.d.".into()));
    /// ```
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_nan() => Self::Missing,
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text form used in files and flat tables; `None` for missing cells.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Number(value) => Some(format_number(*value)),
            Self::Text(text) => Some(text.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

/// Formats a number without trailing zeros.
///
/// ```
/// use pzfx_model::format_number;
///
/// assert_eq!(format_number(24.0), "24");
/// assert_eq!(format_number(100.0), "100");
/// assert_eq!(format_number(10.50), "10.5");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // Display for f64 is already the shortest round-trip form ("24", "10.5").
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_trims_before_parsing() {
        assert_eq!(CellValue::from_text(" 3 "), CellValue::Number(3.0));
        assert_eq!(CellValue::from_text(" ok "), CellValue::Text("ok".into()));
        assert_eq!(CellValue::from_text("NaN"), CellValue::Missing);
    }

    #[test]
    fn render_skips_missing() {
        assert_eq!(CellValue::Missing.render(), None);
        assert_eq!(CellValue::Number(1.25).render(), Some("1.25".into()));
        assert_eq!(CellValue::Text("x".into()).render(), Some("x".into()));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(CellValue::from(None), CellValue::Missing);
        assert_eq!(CellValue::from(Some(2.0)), CellValue::Number(2.0));
    }
}
