//! Row mapper
//!
//! Turns a metadata record into one row of a documentation table: exactly
//! the schema's columns, in schema order, each coerced to its column type.

pub mod analysis;
pub mod coerce;
pub mod rules;

use crate::subcomponent::Subcomponent;
use crate::template::TableSchema;
use serde::Serialize;
use sfmeta_common::metadata::MetadataRecord;

/// Typed value of one column in a proposed row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Title(String),
    Text(String),
    Checkbox(bool),
    Select(Option<String>),
    Number(Option<f64>),
}

impl PropertyValue {
    /// Empty text, `false`, or null
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Title(s) | PropertyValue::Text(s) => s.is_empty(),
            PropertyValue::Checkbox(b) => !b,
            PropertyValue::Select(s) => s.is_none(),
            PropertyValue::Number(n) => n.is_none(),
        }
    }

    /// Display string used for keys and signatures
    pub fn display(&self) -> String {
        match self {
            PropertyValue::Title(s) | PropertyValue::Text(s) => s.clone(),
            PropertyValue::Checkbox(b) => b.to_string(),
            PropertyValue::Select(s) => s.clone().unwrap_or_default(),
            PropertyValue::Number(n) => n.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

/// A proposed row: `(column, value)` pairs in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedRow {
    pub values: Vec<(String, PropertyValue)>,
}

impl MappedRow {
    pub fn new(values: Vec<(String, PropertyValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&PropertyValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut PropertyValue> {
        self.values
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// All values in column order; identical rows share a signature
    pub fn signature(&self) -> String {
        self.values
            .iter()
            .map(|(_, value)| format!("{:?}", value))
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }

    /// Every value empty
    pub fn is_vacuous(&self) -> bool {
        self.values.iter().all(|(_, value)| value.is_empty())
    }

    /// Display value of the key column(s), `" / "`-joined; `None` when every
    /// part is empty
    pub fn key(&self, key_columns: &[&str]) -> Option<String> {
        let parts: Vec<String> = key_columns
            .iter()
            .map(|column| self.get(column).map(PropertyValue::display).unwrap_or_default())
            .collect();

        if parts.iter().all(|p| p.trim().is_empty()) {
            return None;
        }

        Some(
            parts
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" / "),
        )
    }

    /// Fill this row's empty columns from `other`; returns how many were filled
    pub fn absorb(&mut self, other: &MappedRow) -> usize {
        let mut filled = 0;
        for (column, value) in self.values.iter_mut() {
            if value.is_empty() {
                if let Some(incoming) = other.get(column).filter(|v| !v.is_empty()) {
                    *value = incoming.clone();
                    filled += 1;
                }
            }
        }
        filled
    }
}

/// Map one record to a row of `schema`.
///
/// `siblings` are the other records of the same table; validation rules use
/// them for merge analysis.
pub fn map_row(
    sub: Subcomponent,
    schema: &TableSchema,
    record: &MetadataRecord,
    siblings: &[MetadataRecord],
) -> MappedRow {
    let values = schema
        .columns
        .iter()
        .map(|column| {
            let raw = rules::rule_value(sub, &column.name, record, siblings)
                .unwrap_or_else(|| rules::fallback(record, &column.name));
            (column.name.clone(), coerce::coerce(raw.as_ref(), column))
        })
        .collect();

    MappedRow::new(values)
}

/// Map every record of a table, each seeing the others as siblings
pub fn map_rows(sub: Subcomponent, schema: &TableSchema, records: &[MetadataRecord]) -> Vec<MappedRow> {
    records
        .iter()
        .map(|record| map_row(sub, schema, record, records))
        .collect()
}
