// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Series-point units in the InfluxDB 0.8 series format.
//!
//! Wire form of one series:
//! ```text
//! {"name":"cpu","columns":["time","idle","user"],"points":[[1700000000000,80,12.5]]}
//! ```

use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::mem::size_of;

/// Name of the leading timestamp column.
pub const TIME_COLUMN: &str = "time";

/// A value that can be stored in a series column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Boolean value.
    Boolean(bool),
}

impl FieldValue {
    /// Map a dynamic JSON value onto a column value.
    ///
    /// Numbers that fit `i64` stay integers, other numbers become floats.
    /// Unsigned integers above `i64::MAX` therefore lose precision: the
    /// store has no unsigned 64-bit column type, and the nearest `f64` is
    /// written instead.
    /// `null`, arrays and objects have no column form and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Integer(i))
                } else {
                    n.as_f64().map(FieldValue::Float)
                }
            }
            serde_json::Value::String(s) => Some(FieldValue::String(s.clone())),
            serde_json::Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }

    /// Heap bytes owned by this value.
    fn heap_size(&self) -> usize {
        match self {
            FieldValue::String(s) => s.len(),
            _ => 0,
        }
    }
}

/// Anything the host buffer can account for by size.
///
/// `as_any` lets the writer check that a unit really is one of its own
/// series before it goes on the wire.
pub trait Sizer: Any + Send + Sync + fmt::Debug {
    /// Estimated encoded size in bytes.
    fn size(&self) -> usize;

    /// Upcast for identity checks.
    fn as_any(&self) -> &dyn Any;
}

/// One row written into one named series.
///
/// Always holds exactly one point whose length matches `columns`, with
/// `columns[0] == "time"`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    columns: Vec<String>,
    points: Vec<Vec<FieldValue>>,
}

impl Series {
    /// Start a series whose only column is `time`.
    pub(crate) fn new(name: impl Into<String>, time_ms: i64) -> Self {
        Self {
            name: name.into(),
            columns: vec![TIME_COLUMN.to_string()],
            points: vec![vec![FieldValue::Integer(time_ms)]],
        }
    }

    /// Append one column and its value to the row.
    pub(crate) fn push(&mut self, column: impl Into<String>, value: FieldValue) {
        self.columns.push(column.into());
        self.points[0].push(value);
    }

    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names, `time` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Point rows (always exactly one).
    pub fn points(&self) -> &[Vec<FieldValue>] {
        &self.points
    }

    /// The single point row.
    pub fn row(&self) -> &[FieldValue] {
        &self.points[0]
    }
}

impl Sizer for Series {
    fn size(&self) -> usize {
        let columns: usize = self
            .columns
            .iter()
            .map(|c| size_of::<String>() + c.len())
            .sum();
        let points: usize = self
            .points
            .iter()
            .map(|row| {
                size_of::<Vec<FieldValue>>()
                    + row
                        .iter()
                        .map(|v| size_of::<FieldValue>() + v.heap_size())
                        .sum::<usize>()
            })
            .sum();
        size_of::<Self>() + self.name.len() + columns + points
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cpu() -> Series {
        let mut s = Series::new("cpu", 1_700_000_000_000);
        s.push("idle", FieldValue::Integer(80));
        s.push("user", FieldValue::Float(12.5));
        s
    }

    #[test]
    fn test_field_value_from_json_types() {
        assert_eq!(FieldValue::from_json(&json!(42)), Some(FieldValue::Integer(42)));
        assert_eq!(FieldValue::from_json(&json!(-7)), Some(FieldValue::Integer(-7)));
        assert_eq!(FieldValue::from_json(&json!(1.5)), Some(FieldValue::Float(1.5)));
        assert_eq!(
            FieldValue::from_json(&json!("x")),
            Some(FieldValue::String("x".into()))
        );
        assert_eq!(FieldValue::from_json(&json!(true)), Some(FieldValue::Boolean(true)));
    }

    #[test]
    fn test_field_value_large_unsigned_becomes_float() {
        let v = FieldValue::from_json(&json!(u64::MAX));
        assert!(matches!(v, Some(FieldValue::Float(_))), "got {:?}", v);
    }

    #[test]
    fn test_field_value_non_scalars_rejected() {
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!([1, 2])), None);
        assert_eq!(FieldValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_series_wire_format() {
        let body = serde_json::to_string(&cpu()).expect("serialize series");
        assert_eq!(
            body,
            r#"{"name":"cpu","columns":["time","idle","user"],"points":[[1700000000000,80,12.5]]}"#
        );
    }

    #[test]
    fn test_series_shape() {
        let s = cpu();
        assert_eq!(s.name(), "cpu");
        assert_eq!(s.columns()[0], TIME_COLUMN);
        assert_eq!(s.points().len(), 1);
        assert_eq!(s.row().len(), s.columns().len());
        assert_eq!(s.row()[0], FieldValue::Integer(1_700_000_000_000));
    }

    #[test]
    fn test_size_is_deterministic() {
        assert_eq!(cpu().size(), cpu().size());
    }

    #[test]
    fn test_size_grows_with_content() {
        let base = cpu();
        let mut wider = cpu();
        wider.push("system", FieldValue::Float(1.0));
        let mut longer = cpu();
        longer.push("note", FieldValue::String("x".repeat(256)));

        assert!(wider.size() > base.size());
        assert!(longer.size() > wider.size());
        assert!(Series::new("a-much-longer-series-name", 0).size() > Series::new("a", 0).size());
    }

    #[test]
    fn test_sizer_downcast() {
        let unit: Box<dyn Sizer> = Box::new(cpu());
        let series = unit.as_any().downcast_ref::<Series>().expect("series");
        assert_eq!(series.name(), "cpu");
    }
}
