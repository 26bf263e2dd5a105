//! HTTP client for the document workspace API
//!
//! Speaks the Notion REST API (or any proxy exposing the same routes) and
//! implements [`DocumentStore`] on top of it.

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::mapper::{MappedRow, PropertyValue};
use crate::notion::blocks::{encode_blocks, MAX_CHILDREN_PER_REQUEST};
use crate::notion::endpoints::{self, PAGE_SIZE};
use crate::notion::pagination::fetch_all;
use crate::notion::properties::{decode_value, encode_properties, encode_schema, rich_text};
use crate::notion::types::{BlockObject, DatabaseObject, ListResponse, ObjectRef, PageObject};
use crate::store::{CreatePage, DatabaseSchema, DocumentStore, ParentRef, RemotePage, RemoteRef};
use crate::template::{Block, TableSchema};
use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// HTTP-backed document store
#[derive(Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
}

impl NotionClient {
    /// Create a client from sync configuration
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "notion-version",
            header::HeaderValue::from_str(&config.api_version)
                .map_err(|e| SyncError::config(format!("invalid API version header: {}", e)))?,
        );
        if let Some(token) = &config.token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| SyncError::config(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(&SyncConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode the JSON response.
    ///
    /// A non-success status becomes [`SyncError::Remote`] carrying the
    /// response body.
    async fn request<T: DeserializeOwned>(&self, method: Method, url: &str, body: Option<&Value>) -> Result<T> {
        debug!(method = %method, url = %url, "Remote request");

        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SyncError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| SyncError::malformed(format!("{}: {}", url, e)))
    }

    async fn list_children(&self, block_id: &str) -> Result<Vec<BlockObject>> {
        let results = fetch_all(|cursor| async move {
            let url = endpoints::block_children_url(&self.base_url, block_id, cursor.as_deref());
            self.request::<ListResponse>(Method::GET, &url, None).await
        })
        .await?;

        results
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| SyncError::malformed(format!("block: {}", e))))
            .collect()
    }

    async fn query_pages(&self, database_id: &str, filter: Option<Value>) -> Result<Vec<PageObject>> {
        let url = endpoints::database_query_url(&self.base_url, database_id);
        let results = fetch_all(|cursor| {
            let mut body = Map::new();
            body.insert("page_size".into(), json!(PAGE_SIZE));
            if let Some(cursor) = cursor {
                body.insert("start_cursor".into(), json!(cursor));
            }
            if let Some(filter) = &filter {
                body.insert("filter".into(), filter.clone());
            }
            let url = url.clone();
            async move { self.request::<ListResponse>(Method::POST, &url, Some(&Value::Object(body))).await }
        })
        .await?;

        results
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| SyncError::malformed(format!("page: {}", e))))
            .collect()
    }

    async fn append_encoded(&self, block_id: &str, children: &[Value]) -> Result<()> {
        let url = endpoints::block_append_url(&self.base_url, block_id);
        for batch in children.chunks(MAX_CHILDREN_PER_REQUEST) {
            let body = json!({ "children": batch });
            self.request::<Value>(Method::PATCH, &url, Some(&body)).await?;
        }
        Ok(())
    }
}

fn to_remote_ref(object: ObjectRef) -> RemoteRef {
    RemoteRef {
        id: object.id,
        url: object.url,
    }
}

fn parent_json(parent: &ParentRef) -> Value {
    match parent {
        ParentRef::Page(id) => json!({"type": "page_id", "page_id": id}),
        ParentRef::Database(id) => json!({"type": "database_id", "database_id": id}),
        ParentRef::Workspace => json!({"type": "workspace", "workspace": true}),
    }
}

fn to_remote_page(page: PageObject) -> RemotePage {
    RemotePage {
        id: page.id,
        url: page.url,
        properties: page
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), decode_value(value)))
            .collect(),
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn search_first_page(&self) -> Result<Option<RemoteRef>> {
        let url = endpoints::search_url(&self.base_url);
        let body = json!({
            "filter": {"property": "object", "value": "page"},
            "page_size": 1
        });
        let list: ListResponse = self.request(Method::POST, &url, Some(&body)).await?;

        list.results
            .into_iter()
            .next()
            .map(|v| {
                serde_json::from_value::<ObjectRef>(v)
                    .map(to_remote_ref)
                    .map_err(|e| SyncError::malformed(format!("search result: {}", e)))
            })
            .transpose()
    }

    async fn create_page(&self, page: CreatePage) -> Result<RemoteRef> {
        let mut properties = encode_properties(&page.properties);
        if let Value::Object(map) = &mut properties {
            map.insert(page.title_property.clone(), json!({"title": rich_text(&page.title)}));
        }

        let children = encode_blocks(&page.children);
        let (first, rest) = children.split_at(children.len().min(MAX_CHILDREN_PER_REQUEST));

        let body = json!({
            "parent": parent_json(&page.parent),
            "properties": properties,
            "children": first,
        });

        let url = endpoints::pages_url(&self.base_url);
        let created: ObjectRef = self.request(Method::POST, &url, Some(&body)).await?;
        debug!(page_id = %created.id, title = %page.title, blocks = children.len(), "Created page");

        if !rest.is_empty() {
            self.append_encoded(&created.id, rest).await?;
        }

        Ok(to_remote_ref(created))
    }

    async fn append_blocks(&self, block_id: &str, blocks: &[Block]) -> Result<()> {
        self.append_encoded(block_id, &encode_blocks(blocks)).await
    }

    async fn create_database(&self, parent_page_id: &str, schema: &TableSchema) -> Result<RemoteRef> {
        let body = json!({
            "parent": {"type": "page_id", "page_id": parent_page_id},
            "title": rich_text(&schema.title),
            "is_inline": true,
            "properties": encode_schema(schema),
        });

        let url = endpoints::databases_url(&self.base_url);
        let created: ObjectRef = self.request(Method::POST, &url, Some(&body)).await?;
        Ok(to_remote_ref(created))
    }

    async fn database_schema(&self, database_id: &str) -> Result<DatabaseSchema> {
        let url = endpoints::database_url(&self.base_url, database_id);
        let database: DatabaseObject = self.request(Method::GET, &url, None).await?;

        let title_property = database
            .properties
            .iter()
            .find(|(_, schema)| schema.kind == "title")
            .map(|(name, _)| name.clone())
            .ok_or_else(|| SyncError::malformed(format!("database {} has no title property", database.id)))?;

        let mut columns: Vec<String> = database.properties.into_keys().collect();
        columns.sort();

        Ok(DatabaseSchema {
            title_property,
            columns,
        })
    }

    async fn query_database(&self, database_id: &str) -> Result<Vec<RemotePage>> {
        let pages = self.query_pages(database_id, None).await?;
        Ok(pages.into_iter().map(to_remote_page).collect())
    }

    async fn find_page_by_property(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Option<RemoteRef>> {
        let filter = json!({"property": property, "rich_text": {"equals": value}});
        let pages = self.query_pages(database_id, Some(filter)).await?;

        Ok(pages.into_iter().next().map(|page| RemoteRef {
            id: page.id,
            url: page.url,
        }))
    }

    async fn child_databases(&self, page_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .list_children(page_id)
            .await?
            .into_iter()
            .filter(|block| block.kind == "child_database")
            .filter_map(|block| block.child_title().map(str::to_string).map(|title| (title, block.id)))
            .collect())
    }

    async fn child_pages(&self, page_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .list_children(page_id)
            .await?
            .into_iter()
            .filter(|block| block.kind == "child_page")
            .filter_map(|block| block.child_title().map(str::to_string).map(|title| (title, block.id)))
            .collect())
    }

    async fn create_row(&self, database_id: &str, row: &MappedRow) -> Result<RemoteRef> {
        let body = json!({
            "parent": {"type": "database_id", "database_id": database_id},
            "properties": encode_properties(&row.values),
        });

        let url = endpoints::pages_url(&self.base_url);
        let created: ObjectRef = self.request(Method::POST, &url, Some(&body)).await?;
        Ok(to_remote_ref(created))
    }

    async fn update_page(&self, page_id: &str, values: &[(String, PropertyValue)]) -> Result<()> {
        let body = json!({ "properties": encode_properties(values) });
        let url = endpoints::page_url(&self.base_url, page_id);
        self.request::<Value>(Method::PATCH, &url, Some(&body)).await?;
        Ok(())
    }
}
