// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular records and typed field access.
//!
//! Datasets arrive as ordered sequences of [`Record`]s. Field names from the
//! chart spec are resolved once per render into a [`FieldBinding`]; all
//! downstream geometry goes through the binding's typed accessors instead of
//! string lookups scattered through layout math. Contract violations (a
//! named field absent from the data) surface here, before any layout runs.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// A scalar cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A numeric value.
    Num(f64),
    /// A string value.
    Str(String),
}

impl Value {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Str(s) => Some(s),
        }
    }

    /// Renders the value as label text (numbers use `{}` formatting).
    pub fn display(&self) -> String {
        match self {
            Self::Num(n) => format!("{n}"),
            Self::Str(s) => s.clone(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One data row: an ordered list of `(field, value)` pairs.
///
/// Field order is preserved but irrelevant to layout; lookup is by name,
/// first match wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field (builder style).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the record carries the named field.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

/// A field-resolution failure, reported before layout begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingError {
    /// The spec named an empty category field.
    EmptyCategoryField,
    /// The spec named an empty value field.
    EmptyValueField,
    /// A named field is absent from every record of a non-empty dataset.
    FieldNotFound(String),
}

impl core::fmt::Display for BindingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyCategoryField => write!(f, "category field name is empty"),
            Self::EmptyValueField => write!(f, "value field name is empty"),
            Self::FieldNotFound(name) => {
                write!(f, "field {name:?} not found in any record")
            }
        }
    }
}

impl core::error::Error for BindingError {}

/// Field names resolved and validated against a dataset.
///
/// All value coercion rules live here: a missing or non-numeric value field
/// reads as `0.0` (baseline computation always needs a number), and numeric
/// category/series cells are rendered to label text.
#[derive(Clone, Debug)]
pub struct FieldBinding {
    category: String,
    value: String,
    series: Option<String>,
}

impl FieldBinding {
    /// Resolves field names against the dataset.
    ///
    /// Empty field names and fields absent from every record of a non-empty
    /// dataset are contract violations. The series field is optional; when
    /// named it is validated like the others.
    pub fn resolve(
        category: &str,
        value: &str,
        series: Option<&str>,
        records: &[Record],
    ) -> Result<Self, BindingError> {
        if category.is_empty() {
            return Err(BindingError::EmptyCategoryField);
        }
        if value.is_empty() {
            return Err(BindingError::EmptyValueField);
        }
        if !records.is_empty() {
            for field in [category, value].into_iter().chain(series) {
                if !records.iter().any(|r| r.has(field)) {
                    return Err(BindingError::FieldNotFound(field.to_string()));
                }
            }
        }
        Ok(Self {
            category: category.to_string(),
            value: value.to_string(),
            series: series.map(ToString::to_string),
        })
    }

    /// Returns `true` when a series field is bound.
    pub fn has_series(&self) -> bool {
        self.series.is_some()
    }

    /// A copy of this binding with the series field dropped (used by the
    /// faceting sub-pass, where each facet is a single-series chart).
    pub fn without_series(&self) -> Self {
        Self {
            category: self.category.clone(),
            value: self.value.clone(),
            series: None,
        }
    }

    /// The category label of a record (missing field reads as `""`).
    pub fn category_of(&self, record: &Record) -> String {
        record
            .get(&self.category)
            .map(Value::display)
            .unwrap_or_default()
    }

    /// The numeric value of a record; missing or non-finite reads as `0.0`.
    pub fn value_of(&self, record: &Record) -> f64 {
        coerce_finite(record.get(&self.value))
    }

    /// The series label of a record, if a series field is bound.
    pub fn series_of(&self, record: &Record) -> Option<String> {
        let field = self.series.as_deref()?;
        Some(record.get(field).map(Value::display).unwrap_or_default())
    }

    /// Reads an arbitrary named numeric column (used by overlays).
    ///
    /// Returns `None` when the field is missing or not a finite number, so
    /// overlay filtering can distinguish "absent" from "zero".
    pub fn numeric_column(record: &Record, field: &str) -> Option<f64> {
        let v = record.get(field)?.as_f64()?;
        v.is_finite().then_some(v)
    }
}

fn coerce_finite(value: Option<&Value>) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn rows() -> Vec<Record> {
        vec![
            Record::new().with("country", "A").with("value", 10.0),
            Record::new().with("country", "B").with("value", -5.0),
        ]
    }

    #[test]
    fn resolve_validates_before_layout() {
        let rows = rows();
        assert!(FieldBinding::resolve("country", "value", None, &rows).is_ok());
        assert!(matches!(
            FieldBinding::resolve("nation", "value", None, &rows),
            Err(BindingError::FieldNotFound(name)) if name == "nation"
        ));
        assert!(matches!(
            FieldBinding::resolve("", "value", None, &rows),
            Err(BindingError::EmptyCategoryField)
        ));
    }

    #[test]
    fn missing_and_non_finite_values_read_as_zero() {
        let binding = FieldBinding::resolve("country", "value", None, &rows()).unwrap();
        let missing = Record::new().with("country", "C");
        let nan = Record::new().with("country", "D").with("value", f64::NAN);
        assert_eq!(binding.value_of(&missing), 0.0);
        assert_eq!(binding.value_of(&nan), 0.0);
    }

    #[test]
    fn numeric_column_distinguishes_absent_from_zero() {
        let r = Record::new().with("lo", 0.0);
        assert_eq!(FieldBinding::numeric_column(&r, "lo"), Some(0.0));
        assert_eq!(FieldBinding::numeric_column(&r, "hi"), None);
    }
}
