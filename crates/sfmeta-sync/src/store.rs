//! Remote document store abstraction
//!
//! The reconciliation engine and the orchestrator only talk to the remote
//! workspace through [`DocumentStore`]. [`crate::notion::NotionClient`]
//! implements it over HTTP; tests use in-memory stores.

use crate::error::Result;
use crate::mapper::{MappedRow, PropertyValue};
use crate::template::{Block, TableSchema};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// Id (and url when known) of a remote page or database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RemoteRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Where a new page goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Page(String),
    Database(String),
    Workspace,
}

/// Request to create a page
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePage {
    pub parent: ParentRef,
    /// Name of the title property: `title` for page parents, the database's
    /// title column for database parents
    pub title_property: String,
    pub title: String,
    pub properties: Vec<(String, PropertyValue)>,
    pub children: Vec<Block>,
}

impl CreatePage {
    pub fn new(parent: ParentRef, title: impl Into<String>) -> Self {
        Self {
            parent,
            title_property: "title".to_string(),
            title: title.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Column names of an existing database
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseSchema {
    pub title_property: String,
    pub columns: Vec<String>,
}

impl DatabaseSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// A property value as read back from the remote store
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteValue {
    Title(String),
    Text(String),
    Select(Option<String>),
    /// `None` when the remote value is not a boolean
    Checkbox(Option<bool>),
    Number(Option<f64>),
    /// Property types the engine never writes
    Other,
}

impl RemoteValue {
    /// Whether a proposal may fill this value.
    ///
    /// Empty title/text, unset select, non-boolean checkbox and null number
    /// are blank. `false` and `0` are real values.
    pub fn is_blank(&self) -> bool {
        match self {
            RemoteValue::Title(s) | RemoteValue::Text(s) => s.is_empty(),
            RemoteValue::Select(s) => s.is_none(),
            RemoteValue::Checkbox(b) => b.is_none(),
            RemoteValue::Number(n) => n.is_none(),
            RemoteValue::Other => false,
        }
    }

    pub fn display(&self) -> String {
        match self {
            RemoteValue::Title(s) | RemoteValue::Text(s) => s.clone(),
            RemoteValue::Select(s) => s.clone().unwrap_or_default(),
            RemoteValue::Checkbox(b) => b.map(|b| b.to_string()).unwrap_or_default(),
            RemoteValue::Number(n) => n.map(|n| n.to_string()).unwrap_or_default(),
            RemoteValue::Other => String::new(),
        }
    }
}

/// A row (page) of a remote database
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemotePage {
    pub id: String,
    pub url: Option<String>,
    pub properties: HashMap<String, RemoteValue>,
}

impl RemotePage {
    /// Absent properties are blank
    pub fn is_blank(&self, column: &str) -> bool {
        self.properties.get(column).is_none_or(RemoteValue::is_blank)
    }

    /// Display value of the key column(s), matching [`MappedRow::key`]
    pub fn key(&self, key_columns: &[&str]) -> Option<String> {
        let parts: Vec<String> = key_columns
            .iter()
            .map(|column| {
                self.properties
                    .get(*column)
                    .map(RemoteValue::display)
                    .unwrap_or_default()
            })
            .filter(|p| !p.trim().is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}

/// Index pages by key; pages without a key are left out and later pages
/// with a repeated key are ignored
pub fn index_by_key(pages: Vec<RemotePage>, key_columns: &[&str]) -> HashMap<String, RemotePage> {
    let mut index = HashMap::with_capacity(pages.len());
    for page in pages {
        if let Some(key) = page.key(key_columns) {
            index.entry(key).or_insert(page);
        }
    }
    index
}

/// Remote operations used by the sync engine
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First page visible to the integration, if any
    async fn search_first_page(&self) -> Result<Option<RemoteRef>>;

    async fn create_page(&self, page: CreatePage) -> Result<RemoteRef>;

    async fn append_blocks(&self, block_id: &str, blocks: &[Block]) -> Result<()>;

    /// Create an inline database under a page
    async fn create_database(&self, parent_page_id: &str, schema: &TableSchema) -> Result<RemoteRef>;

    async fn database_schema(&self, database_id: &str) -> Result<DatabaseSchema>;

    /// Every row of a database, all result pages concatenated
    async fn query_database(&self, database_id: &str) -> Result<Vec<RemotePage>>;

    /// First row whose text property equals `value`
    async fn find_page_by_property(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Option<RemoteRef>>;

    /// Child databases of a page, title -> id
    async fn child_databases(&self, page_id: &str) -> Result<HashMap<String, String>>;

    /// Child pages of a page, title -> id
    async fn child_pages(&self, page_id: &str) -> Result<HashMap<String, String>>;

    async fn create_row(&self, database_id: &str, row: &MappedRow) -> Result<RemoteRef>;

    /// Set the given properties of a page, leaving the rest untouched
    async fn update_page(&self, page_id: &str, values: &[(String, PropertyValue)]) -> Result<()>;
}
