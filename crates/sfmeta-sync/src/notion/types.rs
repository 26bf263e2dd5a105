//! Response shapes of the remote API
//!
//! Only the fields the engine reads are modeled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A paginated list response
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Any created or retrieved object: page, database or block
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A page with its raw properties
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A database with its property schema
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildTitle {
    #[serde(default)]
    pub title: String,
}

/// A block as listed by the children endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BlockObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub child_database: Option<ChildTitle>,
    #[serde(default)]
    pub child_page: Option<ChildTitle>,
}

impl BlockObject {
    /// Title of a child database or child page block
    pub fn child_title(&self) -> Option<&str> {
        match self.kind.as_str() {
            "child_database" => self.child_database.as_ref().map(|c| c.title.as_str()),
            "child_page" => self.child_page.as_ref().map(|c| c.title.as_str()),
            _ => None,
        }
        .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_defaults() {
        let list: ListResponse = serde_json::from_value(json!({"object": "list"})).unwrap();
        assert!(list.results.is_empty());
        assert!(!list.has_more);
        assert!(list.next_cursor.is_none());
    }

    #[test]
    fn test_block_child_title() {
        let block: BlockObject = serde_json::from_value(json!({
            "id": "b1",
            "type": "child_database",
            "child_database": {"title": "🏷️ Account - All Fields"}
        }))
        .unwrap();
        assert_eq!(block.child_title(), Some("🏷️ Account - All Fields"));

        let para: BlockObject =
            serde_json::from_value(json!({"id": "b2", "type": "paragraph", "paragraph": {}})).unwrap();
        assert_eq!(para.child_title(), None);
    }

    #[test]
    fn test_database_schema_types() {
        let db: DatabaseObject = serde_json::from_value(json!({
            "id": "db",
            "properties": {
                "Name": {"id": "title", "type": "title", "title": {}},
                "API Name": {"id": "x", "type": "rich_text", "rich_text": {}}
            }
        }))
        .unwrap();
        assert_eq!(db.properties["Name"].kind, "title");
        assert_eq!(db.properties["API Name"].kind, "rich_text");
    }
}
