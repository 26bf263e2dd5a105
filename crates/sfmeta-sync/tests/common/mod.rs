//! Shared test helpers: an in-memory document store and record builders

#![allow(dead_code)]

use async_trait::async_trait;
use sfmeta_common::metadata::{MetadataRecord, PermissionKind, RecordKind};
use sfmeta_sync::error::{Result, SyncError};
use sfmeta_sync::mapper::{MappedRow, PropertyValue};
use sfmeta_sync::store::{CreatePage, DatabaseSchema, DocumentStore, RemotePage, RemoteRef, RemoteValue};
use sfmeta_sync::template::{Block, TableSchema};
use sfmeta_sync::{RetryPolicy, SyncConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn to_remote(value: &PropertyValue) -> RemoteValue {
    match value {
        PropertyValue::Title(s) => RemoteValue::Title(s.clone()),
        PropertyValue::Text(s) => RemoteValue::Text(s.clone()),
        PropertyValue::Checkbox(b) => RemoteValue::Checkbox(Some(*b)),
        PropertyValue::Select(s) => RemoteValue::Select(s.clone()),
        PropertyValue::Number(n) => RemoteValue::Number(*n),
    }
}

#[derive(Debug, Clone)]
pub struct CreatedPage {
    pub id: String,
    pub request: CreatePage,
}

#[derive(Default)]
struct State {
    next_id: usize,
    rows: HashMap<String, Vec<RemotePage>>,
    schemas: HashMap<String, DatabaseSchema>,
    child_databases: HashMap<String, HashMap<String, String>>,
    child_pages: HashMap<String, HashMap<String, String>>,
    pages: Vec<CreatedPage>,
    databases: Vec<(String, String, TableSchema)>,
    appended: Vec<(String, Vec<Block>)>,
    /// Page-level writes in call order
    events: Vec<String>,
    search_result: Option<String>,
    /// Text value -> remaining failures of create_row for rows carrying it
    failing_rows: HashMap<String, usize>,
    failing_databases: Vec<String>,
}

/// In-memory [`DocumentStore`] with call counters and failure injection
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<State>,
    pub queries: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub create_attempts: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}-{}", prefix, state.next_id)
    }

    /// Make `search_first_page` return this page
    pub fn with_search_result(self, page_id: &str) -> Self {
        self.state.lock().unwrap().search_result = Some(page_id.to_string());
        self
    }

    /// Register a database usable as parent of main pages
    pub fn add_parent_database(&self, id: &str, title_property: &str, columns: &[&str]) {
        let mut all: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        all.push(title_property.to_string());
        self.state.lock().unwrap().schemas.insert(
            id.to_string(),
            DatabaseSchema {
                title_property: title_property.to_string(),
                columns: all,
            },
        );
    }

    /// Insert an existing row into a table
    pub fn seed_row(&self, database_id: &str, properties: &[(&str, RemoteValue)]) -> String {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state, "row");
        state.rows.entry(database_id.to_string()).or_default().push(RemotePage {
            id: id.clone(),
            url: None,
            properties: properties.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });
        id
    }

    /// Attach an existing child database to a page
    pub fn seed_child_database(&self, page_id: &str, title: &str, database_id: &str) {
        self.state
            .lock()
            .unwrap()
            .child_databases
            .entry(page_id.to_string())
            .or_default()
            .insert(title.to_string(), database_id.to_string());
    }

    pub fn seed_child_page(&self, parent_id: &str, title: &str, page_id: &str) {
        self.state
            .lock()
            .unwrap()
            .child_pages
            .entry(parent_id.to_string())
            .or_default()
            .insert(title.to_string(), page_id.to_string());
    }

    /// Fail `create_row` for rows carrying `value`, `times` times
    pub fn fail_rows_with(&self, value: &str, times: usize) {
        self.state
            .lock()
            .unwrap()
            .failing_rows
            .insert(value.to_string(), times);
    }

    /// Fail `create_database` for tables whose title contains `fragment`
    pub fn fail_databases_titled(&self, fragment: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_databases
            .push(fragment.to_string());
    }

    pub fn rows(&self, database_id: &str) -> Vec<RemotePage> {
        self.state
            .lock()
            .unwrap()
            .rows
            .get(database_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Blocks appended to pages, as (page, blocks)
    pub fn appended(&self) -> Vec<(String, Vec<Block>)> {
        self.state.lock().unwrap().appended.clone()
    }

    /// "page {title}", "table {title}" and "blocks {count}" in call order
    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn pages(&self) -> Vec<CreatedPage> {
        self.state.lock().unwrap().pages.clone()
    }

    /// Created databases as (parent page, id, schema)
    pub fn databases(&self) -> Vec<(String, String, TableSchema)> {
        self.state.lock().unwrap().databases.clone()
    }

    pub fn database_id(&self, title: &str) -> Option<String> {
        self.databases()
            .into_iter()
            .find(|(_, _, schema)| schema.title == title)
            .map(|(_, id, _)| id)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.creates() + self.updates()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn search_first_page(&self) -> Result<Option<RemoteRef>> {
        Ok(self.state.lock().unwrap().search_result.clone().map(RemoteRef::new))
    }

    async fn create_page(&self, page: CreatePage) -> Result<RemoteRef> {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state, "page");

        if let sfmeta_sync::store::ParentRef::Page(parent) = &page.parent {
            state
                .child_pages
                .entry(parent.clone())
                .or_default()
                .insert(page.title.clone(), id.clone());
        }
        if let sfmeta_sync::store::ParentRef::Database(db) = &page.parent {
            let mut properties: HashMap<String, RemoteValue> =
                page.properties.iter().map(|(k, v)| (k.clone(), to_remote(v))).collect();
            properties.insert(page.title_property.clone(), RemoteValue::Title(page.title.clone()));
            state.rows.entry(db.clone()).or_default().push(RemotePage {
                id: id.clone(),
                url: None,
                properties,
            });
        }

        let event = format!("page {}", page.title);
        state.events.push(event);
        state.pages.push(CreatedPage {
            id: id.clone(),
            request: page,
        });
        Ok(RemoteRef::new(id.clone()).with_url(format!("https://example.test/{}", id)))
    }

    async fn append_blocks(&self, block_id: &str, blocks: &[Block]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(format!("blocks {}", blocks.len()));
        state.appended.push((block_id.to_string(), blocks.to_vec()));
        Ok(())
    }

    async fn create_database(&self, parent_page_id: &str, schema: &TableSchema) -> Result<RemoteRef> {
        let mut state = self.state.lock().unwrap();
        if state.failing_databases.iter().any(|f| schema.title.contains(f.as_str())) {
            return Err(SyncError::Remote {
                status: 400,
                body: "validation_error".into(),
            });
        }

        let id = Self::next_id(&mut state, "db");
        state.events.push(format!("table {}", schema.title));
        state
            .child_databases
            .entry(parent_page_id.to_string())
            .or_default()
            .insert(schema.title.clone(), id.clone());
        state
            .databases
            .push((parent_page_id.to_string(), id.clone(), schema.clone()));
        Ok(RemoteRef::new(id))
    }

    async fn database_schema(&self, database_id: &str) -> Result<DatabaseSchema> {
        self.state
            .lock()
            .unwrap()
            .schemas
            .get(database_id)
            .cloned()
            .ok_or(SyncError::Remote {
                status: 404,
                body: "object_not_found".into(),
            })
    }

    async fn query_database(&self, database_id: &str) -> Result<Vec<RemotePage>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows(database_id))
    }

    async fn find_page_by_property(
        &self,
        database_id: &str,
        property: &str,
        value: &str,
    ) -> Result<Option<RemoteRef>> {
        Ok(self
            .rows(database_id)
            .into_iter()
            .find(|page| page.properties.get(property).map(RemoteValue::display).as_deref() == Some(value))
            .map(|page| RemoteRef::new(page.id)))
    }

    async fn child_databases(&self, page_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .child_databases
            .get(page_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn child_pages(&self, page_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .child_pages
            .get(page_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_row(&self, database_id: &str, row: &MappedRow) -> Result<RemoteRef> {
        self.create_attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        let failing = row.values.iter().find_map(|(_, v)| {
            let display = v.display();
            state.failing_rows.get(&display).filter(|n| **n > 0).map(|_| display)
        });
        if let Some(value) = failing {
            if let Some(remaining) = state.failing_rows.get_mut(&value) {
                *remaining -= 1;
            }
            return Err(SyncError::Remote {
                status: 503,
                body: "service_unavailable".into(),
            });
        }

        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = Self::next_id(&mut state, "row");
        state.rows.entry(database_id.to_string()).or_default().push(RemotePage {
            id: id.clone(),
            url: None,
            properties: row.values.iter().map(|(k, v)| (k.clone(), to_remote(v))).collect(),
        });
        Ok(RemoteRef::new(id))
    }

    async fn update_page(&self, page_id: &str, values: &[(String, PropertyValue)]) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let page = state
            .rows
            .values_mut()
            .flat_map(|rows| rows.iter_mut())
            .find(|page| page.id == page_id)
            .ok_or(SyncError::Remote {
                status: 404,
                body: "object_not_found".into(),
            })?;
        for (column, value) in values {
            page.properties.insert(column.clone(), to_remote(value));
        }
        Ok(())
    }
}

/// Retry policy with short delays
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base: Duration::from_millis(10),
        timeout: Duration::from_secs(30),
    }
}

pub fn fast_config() -> SyncConfig {
    SyncConfig {
        retry_base_ms: 10,
        ..SyncConfig::default()
    }
}

pub fn field(api_name: &str, label: &str, sf_type: &str) -> MetadataRecord {
    MetadataRecord::new(RecordKind::Field, api_name)
        .with_label(label)
        .with_detail("type", sf_type)
}

pub fn field_permission(field: &str, readable: bool, editable: bool) -> MetadataRecord {
    MetadataRecord::new(RecordKind::ProfilePermission(PermissionKind::FieldPermissions), field)
        .with_detail("field", field)
        .with_detail("readable", if readable { "true" } else { "false" })
        .with_detail("editable", if editable { "true" } else { "false" })
}
