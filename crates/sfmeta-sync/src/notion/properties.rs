//! Property encoding and decoding

use crate::mapper::PropertyValue;
use crate::store::RemoteValue;
use crate::template::{ColumnType, TableSchema};
use serde_json::{json, Map, Value};

/// Characters per rich-text segment accepted by the API
pub const MAX_SEGMENT_CHARS: usize = 2000;

/// Split text into rich-text segments of at most [`MAX_SEGMENT_CHARS`]
pub fn rich_text(content: &str) -> Value {
    if content.is_empty() {
        return json!([]);
    }

    let chars: Vec<char> = content.chars().collect();
    let segments: Vec<Value> = chars
        .chunks(MAX_SEGMENT_CHARS)
        .map(|chunk| {
            let text: String = chunk.iter().collect();
            json!({"type": "text", "text": {"content": text}})
        })
        .collect();
    Value::Array(segments)
}

/// Request body for one property value
pub fn encode_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(s) => json!({"title": rich_text(s)}),
        PropertyValue::Text(s) => json!({"rich_text": rich_text(s)}),
        PropertyValue::Checkbox(b) => json!({"checkbox": b}),
        PropertyValue::Select(Some(name)) => json!({"select": {"name": name}}),
        PropertyValue::Select(None) => json!({"select": null}),
        PropertyValue::Number(n) => json!({"number": n}),
    }
}

/// Properties object for a create or update request
pub fn encode_properties<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a (String, PropertyValue)>,
{
    let map: Map<String, Value> = values
        .into_iter()
        .map(|(column, value)| (column.clone(), encode_value(value)))
        .collect();
    Value::Object(map)
}

/// Properties object of a `create database` request
pub fn encode_schema(schema: &TableSchema) -> Value {
    let map: Map<String, Value> = schema
        .columns
        .iter()
        .map(|column| {
            let definition = match &column.column_type {
                ColumnType::Title => json!({"title": {}}),
                ColumnType::Text => json!({"rich_text": {}}),
                ColumnType::Checkbox => json!({"checkbox": {}}),
                ColumnType::Number => json!({"number": {}}),
                ColumnType::Select(options) => {
                    let options: Vec<Value> = options
                        .iter()
                        .map(|o| match &o.color {
                            Some(color) => json!({"name": o.name, "color": color}),
                            None => json!({"name": o.name}),
                        })
                        .collect();
                    json!({"select": {"options": options}})
                },
            };
            (column.name.clone(), definition)
        })
        .collect();
    Value::Object(map)
}

/// Concatenated `plain_text` (or `text.content`) of a rich-text array
pub fn plain_text(segments: &Value) -> String {
    segments
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("plain_text")
                        .or_else(|| item.get("text").and_then(|t| t.get("content")))
                        .and_then(Value::as_str)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Decode one property of a retrieved page
pub fn decode_value(property: &Value) -> RemoteValue {
    let kind = property.get("type").and_then(Value::as_str).unwrap_or_default();
    let inner = property.get(kind);

    match kind {
        "title" => RemoteValue::Title(inner.map(plain_text).unwrap_or_default()),
        "rich_text" => RemoteValue::Text(inner.map(plain_text).unwrap_or_default()),
        "select" => RemoteValue::Select(
            inner
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        "checkbox" => RemoteValue::Checkbox(inner.and_then(Value::as_bool)),
        "number" => RemoteValue::Number(inner.and_then(Value::as_f64)),
        _ => RemoteValue::Other,
    }
}
