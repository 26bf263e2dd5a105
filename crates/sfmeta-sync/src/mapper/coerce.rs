//! Coercion of raw detail values into typed column values

use super::PropertyValue;
use crate::template::{Column, ColumnType, SelectOption};
use sfmeta_common::metadata::DetailValue;

/// Coerce a raw value to the column's type.
///
/// Absent values become the empty value of the type. Selects only ever take
/// one of the column's own options.
pub fn coerce(raw: Option<&DetailValue>, column: &Column) -> PropertyValue {
    match &column.column_type {
        ColumnType::Title => PropertyValue::Title(text(raw)),
        ColumnType::Text => PropertyValue::Text(text(raw)),
        ColumnType::Checkbox => PropertyValue::Checkbox(raw.is_some_and(DetailValue::to_boolean)),
        ColumnType::Number => PropertyValue::Number(number(raw)),
        ColumnType::Select(options) => PropertyValue::Select(select(&text(raw), options)),
    }
}

fn text(raw: Option<&DetailValue>) -> String {
    raw.map(DetailValue::as_text).unwrap_or_default()
}

fn number(raw: Option<&DetailValue>) -> Option<f64> {
    match raw? {
        DetailValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        other => other
            .as_text()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
    }
}

/// Case-insensitive match against the option names
pub fn select(value: &str, options: &[SelectOption]) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    options
        .iter()
        .find(|option| option.name.eq_ignore_ascii_case(value))
        .map(|option| option.name.clone())
}

/// Salesforce field type to the field table's `Type` option
pub fn field_type_option(sf_type: &str) -> &'static str {
    match sf_type.trim() {
        "Text" | "TextArea" | "EncryptedText" | "AutoNumber" => "Text",
        "Number" | "Summary" => "Number",
        "Date" => "Date",
        "DateTime" | "Time" => "DateTime",
        "Checkbox" | "Boolean" => "Boolean",
        "Picklist" => "Picklist",
        "MultiselectPicklist" => "Multi-Select Picklist",
        "Lookup" | "MasterDetail" | "Hierarchy" | "MetadataRelationship" | "ExternalLookup"
        | "IndirectLookup" => "Reference",
        "Currency" => "Currency",
        "Percent" => "Percent",
        "Email" => "Email",
        "Phone" => "Phone",
        "Url" | "URL" => "URL",
        "LongTextArea" => "Long Text Area",
        "Html" => "Rich Text Area",
        "Location" => "Location",
        _ => "Other",
    }
}
