//! Detail values parsed from metadata XML

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered bag of detail values keyed by XML element name
pub type Details = BTreeMap<String, DetailValue>;

/// A value found in a metadata detail bag.
///
/// Repeated XML elements become [`DetailValue::Seq`], elements with children
/// become [`DetailValue::Map`] and text-only elements become
/// [`DetailValue::String`]. Parsers keep XML text as strings; booleans and
/// numbers appear when records are built programmatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<DetailValue>),
    Map(Details),
}

impl DetailValue {
    /// Interpret the value as a boolean flag.
    ///
    /// Only `true` and the string `"true"` (any case, surrounding whitespace
    /// ignored) count as set. Everything else, including `"1"` and `"yes"`,
    /// is false.
    pub fn to_boolean(&self) -> bool {
        match self {
            DetailValue::Bool(b) => *b,
            DetailValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Display form used for text columns.
    ///
    /// Sequences are joined with `", "`, skipping empty items; maps render as
    /// `key: value` pairs separated by `"; "`.
    pub fn as_text(&self) -> String {
        match self {
            DetailValue::String(s) => s.clone(),
            DetailValue::Bool(b) => b.to_string(),
            DetailValue::Number(n) => format_number(*n),
            DetailValue::Seq(items) => items
                .iter()
                .map(DetailValue::as_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            DetailValue::Map(map) => map
                .iter()
                .map(|(k, v)| (k, v.as_text()))
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DetailValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Details> {
        match self {
            DetailValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Child value of a map entry
    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Treat single values and sequences uniformly.
    ///
    /// XML with one `<fieldPermissions>` element parses to a single map, with
    /// several to a sequence; callers always want a list.
    pub fn as_seq(&self) -> Vec<&DetailValue> {
        match self {
            DetailValue::Seq(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// First element of a sequence, or the value itself
    pub fn first(&self) -> Option<&DetailValue> {
        match self {
            DetailValue::Seq(items) => items.first(),
            other => Some(other),
        }
    }

    /// True for empty strings, empty collections and `false`
    pub fn is_empty(&self) -> bool {
        match self {
            DetailValue::String(s) => s.trim().is_empty(),
            DetailValue::Bool(b) => !b,
            DetailValue::Number(_) => false,
            DetailValue::Seq(items) => items.iter().all(DetailValue::is_empty),
            DetailValue::Map(map) => map.is_empty(),
        }
    }

    /// Append `value` under `key`, turning repeated keys into a sequence
    pub fn push_child(map: &mut Details, key: String, value: DetailValue) {
        match map.remove(&key) {
            None => {
                map.insert(key, value);
            },
            Some(DetailValue::Seq(mut items)) => {
                items.push(value);
                map.insert(key, DetailValue::Seq(items));
            },
            Some(existing) => {
                map.insert(key, DetailValue::Seq(vec![existing, value]));
            },
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::String(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::String(value)
    }
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        DetailValue::Bool(value)
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        DetailValue::Number(value)
    }
}

impl<T: Into<DetailValue>> From<Vec<T>> for DetailValue {
    fn from(values: Vec<T>) -> Self {
        DetailValue::Seq(values.into_iter().map(Into::into).collect())
    }
}
