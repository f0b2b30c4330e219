//! Polars `AnyValue` conversions.
//!
//! Group labels are always strings; data values become [`CellValue`]s.

use polars::prelude::{AnyValue, DataFrame, PolarsResult};

use pzfx_model::{CellValue, format_number};

/// Render an `AnyValue` as a group label.
///
/// Nulls render as the empty string so that rows are never dropped for a
/// missing group label.
///
/// ```
/// use polars::prelude::AnyValue;
/// use pzfx_transform::values::any_to_label;
///
/// assert_eq!(any_to_label(AnyValue::Null), "");
/// assert_eq!(any_to_label(AnyValue::Int32(24)), "24");
/// assert_eq!(any_to_label(AnyValue::Float64(24.0)), "24");
/// assert_eq!(any_to_label(AnyValue::String("DrugA")), "DrugA");
/// ```
pub fn any_to_label(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_number(f64::from(v)),
        AnyValue::Float64(v) => format_number(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Convert an `AnyValue` into a cell.
///
/// NaN is treated as missing, matching how dataframe libraries mark absent
/// numeric values. Strings go through [`CellValue::from_text`].
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => float_cell(f64::from(v)),
        AnyValue::Float64(v) => float_cell(v),
        AnyValue::String(s) => CellValue::from_text(s),
        AnyValue::StringOwned(s) => CellValue::from_text(&s),
        AnyValue::Boolean(b) => CellValue::Text(b.to_string()),
        other => CellValue::from_text(&other.to_string()),
    }
}

fn float_cell(value: f64) -> CellValue {
    if value.is_nan() {
        CellValue::Missing
    } else {
        CellValue::Number(value)
    }
}

/// All values of a column rendered as group labels.
pub fn column_labels(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let column = df.column(name)?;
    let mut labels = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        labels.push(any_to_label(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(labels)
}

/// All values of a column converted to cells.
pub fn column_cells(df: &DataFrame, name: &str) -> PolarsResult<Vec<CellValue>> {
    let column = df.column(name)?;
    let mut cells = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        cells.push(any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_for_numeric_values() {
        assert_eq!(any_to_label(AnyValue::Int64(-3)), "-3");
        assert_eq!(any_to_label(AnyValue::Float64(0.5)), "0.5");
        assert_eq!(any_to_label(AnyValue::UInt8(7)), "7");
        assert_eq!(any_to_label(AnyValue::Boolean(true)), "true");
    }

    #[test]
    fn cells_from_numbers() {
        assert_eq!(any_to_cell(AnyValue::Int32(4)), CellValue::Number(4.0));
        assert_eq!(any_to_cell(AnyValue::Float64(1.5)), CellValue::Number(1.5));
        assert_eq!(any_to_cell(AnyValue::Float64(f64::NAN)), CellValue::Missing);
        assert_eq!(any_to_cell(AnyValue::Null), CellValue::Missing);
    }

    #[test]
    fn cells_from_strings() {
        assert_eq!(any_to_cell(AnyValue::String("2.5")), CellValue::Number(2.5));
        assert_eq!(any_to_cell(AnyValue::String("")), CellValue::Missing);
        assert_eq!(
            any_to_cell(AnyValue::String("BLQ")),
            CellValue::Text("BLQ".to_string())
        );
    }
}
