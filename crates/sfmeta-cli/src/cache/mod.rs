//! Local cache of parsed metadata
//!
//! Uses SQLite for entities and their component records. Writes are upserts;
//! components that disappear from a later parse are kept.

pub mod records;

pub use records::{ComponentRow, EntityRow};

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use sfmeta_common::metadata::{EntityKind, ParsedEntity, ParsedFlow, ParsedObject, ParsedProfile};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cache manager with SQLite backend
pub struct CacheManager {
    pool: SqlitePool,
    db_path: PathBuf,
    chunk_size: usize,
}

/// Summary line of a cached entity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CachedEntity {
    pub kind: String,
    pub api_name: String,
    pub label: Option<String>,
    pub last_modified: String,
    pub components: i64,
}

impl CacheManager {
    /// Open (or create) the cache database named by the configuration
    pub async fn new(config: &CliConfig) -> Result<Self> {
        if let Some(parent) = config.cache_db.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.cache_db)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        Self::migrate(&pool).await?;
        debug!(path = %config.cache_db.display(), "Opened metadata cache");

        Ok(Self {
            pool,
            db_path: config.cache_db.clone(),
            chunk_size: config.chunk_size,
        })
    }

    /// Cache held in memory, dropped with the manager
    pub async fn in_memory(chunk_size: usize) -> Result<Self> {
        // One connection, since every in-memory connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::migrate(&pool).await?;

        Ok(Self {
            pool,
            db_path: PathBuf::from(":memory:"),
            chunk_size,
        })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| CliError::cache(format!("Migration failed: {}", e)))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub async fn store_object(&self, object: &ParsedObject) -> Result<i64> {
        self.store(&ParsedEntity::Object(object.clone())).await
    }

    pub async fn store_profile(&self, profile: &ParsedProfile) -> Result<i64> {
        self.store(&ParsedEntity::Profile(profile.clone())).await
    }

    pub async fn store_flow(&self, flow: &ParsedFlow) -> Result<i64> {
        self.store(&ParsedEntity::Flow(flow.clone())).await
    }

    /// Upsert an entity and all of its components in one transaction.
    ///
    /// Returns the entity id.
    pub async fn store(&self, entity: &ParsedEntity) -> Result<i64> {
        let kind = entity.kind();
        let head = records::head(entity);
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let entity_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO entities (kind, api_name, label, description, details_json, last_modified)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(kind, api_name) DO UPDATE SET
                label = excluded.label,
                description = excluded.description,
                details_json = excluded.details_json,
                last_modified = excluded.last_modified
            RETURNING id
            "#,
        )
        .bind(kind.as_str())
        .bind(&head.api_name)
        .bind(&head.label)
        .bind(&head.description)
        .bind(serde_json::to_string(&head.details)?)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = 0usize;
        for (sub, component_records) in records::components(entity) {
            for (position, record) in component_records.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO components
                        (entity_id, component, api_name, label, description, details_json, position, last_modified)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(entity_id, component, api_name) DO UPDATE SET
                        label = excluded.label,
                        description = excluded.description,
                        details_json = excluded.details_json,
                        position = excluded.position,
                        last_modified = excluded.last_modified
                    "#,
                )
                .bind(entity_id)
                .bind(sub.template_name())
                .bind(&record.api_name)
                .bind(&record.label)
                .bind(&record.description)
                .bind(serde_json::to_string(&record.details)?)
                .bind(position as i64)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
                stored += 1;
            }
        }

        tx.commit().await?;

        info!(kind = %kind, api_name = %head.api_name, components = stored, "Cached entity");
        Ok(entity_id)
    }

    /// Load a cached entity, `None` when it was never stored
    pub async fn load(&self, kind: EntityKind, api_name: &str) -> Result<Option<ParsedEntity>> {
        let entity = sqlx::query_as::<_, EntityRow>(
            r#"
            SELECT id, kind, api_name, label, description, details_json, last_modified
            FROM entities WHERE kind = ?1 AND api_name = ?2
            "#,
        )
        .bind(kind.as_str())
        .bind(api_name)
        .fetch_optional(&self.pool)
        .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, ComponentRow>(
            r#"
            SELECT component, api_name, label, description, details_json
            FROM components
            WHERE entity_id = ?1
            ORDER BY component, position, id
            "#,
        )
        .bind(entity.id)
        .fetch_all(&self.pool)
        .await?;

        records::assemble(kind, entity, rows, self.chunk_size).map(Some)
    }

    pub async fn load_object(&self, api_name: &str) -> Result<Option<ParsedObject>> {
        Ok(match self.load(EntityKind::Object, api_name).await? {
            Some(ParsedEntity::Object(object)) => Some(object),
            _ => None,
        })
    }

    pub async fn load_profile(&self, api_name: &str) -> Result<Option<ParsedProfile>> {
        Ok(match self.load(EntityKind::Profile, api_name).await? {
            Some(ParsedEntity::Profile(profile)) => Some(profile),
            _ => None,
        })
    }

    pub async fn load_flow(&self, api_name: &str) -> Result<Option<ParsedFlow>> {
        Ok(match self.load(EntityKind::Flow, api_name).await? {
            Some(ParsedEntity::Flow(flow)) => Some(flow),
            _ => None,
        })
    }

    /// Cached entities, optionally of one kind, ordered by kind and name
    pub async fn list_entities(&self, kind: Option<EntityKind>) -> Result<Vec<CachedEntity>> {
        let entries = sqlx::query_as::<_, CachedEntity>(
            r#"
            SELECT e.kind, e.api_name, e.label, e.last_modified, COUNT(c.id) AS components
            FROM entities e
            LEFT JOIN components c ON c.entity_id = e.id
            WHERE ?1 IS NULL OR e.kind = ?1
            GROUP BY e.id
            ORDER BY e.kind, e.api_name
            "#,
        )
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sfmeta_common::metadata::{DetailValue, MetadataRecord, PermissionKind, RecordKind};
    use sfmeta_common::Chunked;
    use tempfile::TempDir;

    fn account() -> ParsedObject {
        let mut object = ParsedObject::new(
            MetadataRecord::new(RecordKind::Object, "Account")
                .with_label("Account")
                .with_detail("sharingModel", "ReadWrite"),
        );
        object.fields = vec![
            MetadataRecord::new(RecordKind::Field, "Phone")
                .with_label("Account Phone")
                .with_detail("type", "Phone")
                .with_detail("required", "true"),
            MetadataRecord::new(RecordKind::Field, "Rating__c").with_detail("length", DetailValue::Number(3.0)),
        ];
        object.list_views = vec![MetadataRecord::new(RecordKind::ListView, "AllAccounts")];
        object
    }

    fn sales_profile(rows: usize, chunk_size: usize) -> ParsedProfile {
        let records: Vec<MetadataRecord> = (0..rows)
            .map(|i| {
                let field = format!("Account.F{}__c", i);
                MetadataRecord::new(RecordKind::ProfilePermission(PermissionKind::FieldPermissions), &field)
                    .with_detail("field", field.as_str())
                    .with_detail("readable", "true")
            })
            .collect();
        let mut profile = ParsedProfile::new(MetadataRecord::new(RecordKind::Profile, "Sales_User"));
        profile
            .permissions
            .insert(PermissionKind::FieldPermissions, Chunked::new(records, chunk_size).unwrap());
        profile
    }

    #[tokio::test]
    async fn test_store_and_load_object() {
        let cache = CacheManager::in_memory(100).await.unwrap();
        let object = account();

        cache.store_object(&object).await.unwrap();
        let loaded = cache.load_object("Account").await.unwrap().unwrap();

        assert_eq!(loaded, object);
        assert!(cache.load_object("Contact").await.unwrap().is_none());
        assert!(cache.load_flow("Account").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_is_rechunked_on_load() {
        let cache = CacheManager::in_memory(40).await.unwrap();
        cache.store_profile(&sales_profile(150, 100)).await.unwrap();

        let loaded = cache.load_profile("Sales_User").await.unwrap().unwrap();
        let chunked = &loaded.permissions[&PermissionKind::FieldPermissions];
        assert_eq!(chunked.len(), 150);
        assert_eq!(chunked.chunks().len(), 4);
        assert_eq!(chunked.chunks()[0][0].api_name, "Account.F0__c");
    }

    #[tokio::test]
    async fn test_restore_upserts_without_deleting() {
        let cache = CacheManager::in_memory(100).await.unwrap();
        let mut object = account();
        let first_id = cache.store_object(&object).await.unwrap();

        object.object.label = Some("Customer Account".into());
        object.fields = vec![MetadataRecord::new(RecordKind::Field, "Phone").with_label("Main Phone")];
        let second_id = cache.store_object(&object).await.unwrap();
        assert_eq!(first_id, second_id);

        let loaded = cache.load_object("Account").await.unwrap().unwrap();
        assert_eq!(loaded.object.label.as_deref(), Some("Customer Account"));
        // Rating__c is stale but kept
        assert_eq!(loaded.fields.len(), 2);
        let phone = loaded.fields.iter().find(|f| f.api_name == "Phone").unwrap();
        assert_eq!(phone.label.as_deref(), Some("Main Phone"));
    }

    #[tokio::test]
    async fn test_list_entities_by_kind() {
        let cache = CacheManager::in_memory(100).await.unwrap();
        cache.store_object(&account()).await.unwrap();
        cache.store_profile(&sales_profile(5, 100)).await.unwrap();

        let all = cache.list_entities(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, "object");
        assert_eq!(all[0].components, 3);

        let profiles = cache.list_entities(Some(EntityKind::Profile)).await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].api_name, "Sales_User");
        assert_eq!(profiles[0].components, 5);
    }

    #[tokio::test]
    async fn test_file_cache_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = CliConfig {
            cache_db: temp_dir.path().join("nested").join("cache.db"),
            chunk_size: 100,
        };

        {
            let cache = CacheManager::new(&config).await.unwrap();
            cache.store_object(&account()).await.unwrap();
        }

        let reopened = CacheManager::new(&config).await.unwrap();
        assert!(reopened.load_object("Account").await.unwrap().is_some());
        assert!(config.cache_db.exists());
    }
}
