//! Block encoding
//!
//! List blocks expand to one list-item block per entry.

use crate::notion::properties::rich_text;
use crate::template::Block;
use serde_json::{json, Map, Value};

/// Children accepted per append or create request
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

fn block_value(kind: &str, body: Value) -> Value {
    let mut map = Map::new();
    map.insert("object".into(), json!("block"));
    map.insert("type".into(), json!(kind));
    map.insert(kind.to_string(), body);
    Value::Object(map)
}

fn text_block(kind: &str, text: &str) -> Value {
    block_value(kind, json!({"rich_text": rich_text(text)}))
}

/// Encode one block as one or more request blocks
pub fn encode_block(block: &Block) -> Vec<Value> {
    match block {
        Block::Heading { level, text } => {
            let kind = match level {
                1 => "heading_1",
                2 => "heading_2",
                _ => "heading_3",
            };
            vec![text_block(kind, text)]
        },
        Block::Paragraph { text } => vec![text_block("paragraph", text)],
        Block::BulletedList { items } => items
            .iter()
            .map(|item| text_block("bulleted_list_item", item))
            .collect(),
        Block::NumberedList { items } => items
            .iter()
            .map(|item| text_block("numbered_list_item", item))
            .collect(),
        Block::Code { language, text } => vec![block_value(
            "code",
            json!({"rich_text": rich_text(text), "language": language}),
        )],
        Block::Quote { text } => vec![text_block("quote", text)],
        Block::Callout { icon, text } => vec![block_value(
            "callout",
            json!({
                "rich_text": rich_text(text),
                "icon": {"type": "emoji", "emoji": icon}
            }),
        )],
        Block::Divider => vec![block_value("divider", json!({}))],
        // Tables are created through the databases endpoint
        Block::Database { .. } => Vec::new(),
    }
}

/// Encode a block sequence in order
pub fn encode_blocks(blocks: &[Block]) -> Vec<Value> {
    blocks.iter().flat_map(encode_block).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        let encoded = encode_block(&Block::heading(2, "Fields"));
        assert_eq!(encoded[0]["type"], "heading_2");
        assert_eq!(encoded[0]["heading_2"]["rich_text"][0]["text"]["content"], "Fields");
    }

    #[test]
    fn test_list_items_expand() {
        let encoded = encode_blocks(&[Block::bullets(&["a", "b"]), Block::numbered(&["c"])]);
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0]["type"], "bulleted_list_item");
        assert_eq!(encoded[1]["bulleted_list_item"]["rich_text"][0]["text"]["content"], "b");
        assert_eq!(encoded[2]["type"], "numbered_list_item");
    }

    #[test]
    fn test_code_and_divider() {
        let code = encode_block(&Block::code("sql", "SELECT Id FROM Account"));
        assert_eq!(code[0]["code"]["language"], "sql");

        let divider = encode_block(&Block::divider());
        assert_eq!(divider[0]["type"], "divider");
    }

    #[test]
    fn test_table_position_is_not_encoded() {
        let encoded = encode_blocks(&[
            Block::paragraph("before"),
            Block::Database { table: "fields".into() },
            Block::paragraph("after"),
        ]);
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[1]["paragraph"]["rich_text"][0]["text"]["content"], "after");
    }

    #[test]
    fn test_callout_icon() {
        let callout = encode_block(&Block::callout("💡", "Tip"));
        assert_eq!(callout[0]["callout"]["icon"]["emoji"], "💡");
    }
}
