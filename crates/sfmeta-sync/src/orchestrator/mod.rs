//! Sync orchestrator
//!
//! Drives one entity through
//! `resolve parent -> ensure main page -> (ensure table -> populate table -> append trailing blocks)*`.
//!
//! A new main page is created with the overview blocks up to the first table
//! position. Each table is then created in page order and the blocks that
//! follow its position are appended after it, so tables land where the
//! overview places them.
//!
//! The parent is resolved once per orchestrator and shared by every entity.
//! A failing table is recorded and the remaining tables proceed; a failing
//! entity is recorded by [`Orchestrator::sync_batch`] and the batch
//! proceeds.

pub mod report;
pub mod unit;

pub use report::{BatchReport, EntitySyncReport, RemoteContainer, TableOutcome, UnitFailure};
pub use unit::{unit_context, unit_records, PageLayout};

use crate::config::{ParentSetting, SyncConfig};
use crate::error::{Result, SyncError};
use crate::mapper::{map_rows, PropertyValue};
use crate::reconcile::{with_retry, Reconciler, TableReport, TableTarget};
use crate::store::{CreatePage, DocumentStore, ParentRef, RemoteRef};
use crate::subcomponent::Subcomponent;
use crate::template::{render, validate_context, Block, RenderContext, TemplateRegistry};
use sfmeta_common::metadata::{MetadataRecord, ParsedEntity};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Column matched against the entity api_name when the parent is a database
pub const API_NAME_COLUMN: &str = "API Name";

pub struct Orchestrator {
    store: Arc<dyn DocumentStore>,
    registry: TemplateRegistry,
    config: SyncConfig,
    reconciler: Reconciler,
    parent: OnceCell<ParentRef>,
    run_id: Uuid,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, registry: TemplateRegistry, config: SyncConfig) -> Self {
        let reconciler = Reconciler::from_config(Arc::clone(&store), &config);
        Self {
            store,
            registry,
            config,
            reconciler,
            parent: OnceCell::new(),
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Parent location of every main page, resolved on first use
    pub async fn resolve_parent(&self) -> Result<&ParentRef> {
        self.parent.get_or_try_init(|| self.discover_parent()).await
    }

    async fn discover_parent(&self) -> Result<ParentRef> {
        match &self.config.parent {
            ParentSetting::Database(id) => {
                info!(database_id = %id, "Using configured parent database");
                return Ok(ParentRef::Database(id.clone()));
            },
            ParentSetting::Page(id) => {
                info!(page_id = %id, "Using configured parent page");
                return Ok(ParentRef::Page(id.clone()));
            },
            ParentSetting::Discover => {},
        }

        let policy = self.reconciler.policy();
        if let Some(found) = with_retry(policy, "search pages", || self.store.search_first_page()).await? {
            info!(page_id = %found.id, "Using first accessible page as parent");
            return Ok(ParentRef::Page(found.id));
        }

        let request = CreatePage::new(ParentRef::Workspace, self.config.root_title.clone());
        let created = with_retry(policy, "create root page", || self.store.create_page(request.clone())).await?;
        info!(page_id = %created.id, title = %self.config.root_title, "Created workspace root page");
        Ok(ParentRef::Page(created.id))
    }

    /// Sync one entity: main page, then every non-empty table
    pub async fn sync_entity(&self, unit: &ParsedEntity) -> Result<EntitySyncReport> {
        let kind = unit.kind();
        let span = info_span!(
            "sync_entity",
            run_id = %self.run_id,
            kind = %kind,
            api_name = %unit.api_name()
        );

        async move {
            if unit.api_name().trim().is_empty() {
                return Err(SyncError::Validation {
                    template: format!("{}/overview", kind),
                    missing: vec!["api_name".to_string()],
                });
            }

            let context = unit_context(unit);
            let (container, layout) = self.ensure_main_page(unit, &context).await?;

            let label = format!("list databases of {}", unit.api_name());
            let mut databases = with_retry(self.reconciler.policy(), &label, || {
                self.store.child_databases(&container.id)
            })
            .await?;

            let mut tables = Vec::new();
            for (sub, trailing) in layout.table_order(kind) {
                let records = usable_records(unit, sub);
                if records.is_empty() {
                    debug!(table = %sub, "No records, skipping table");
                    self.append_trailing(&container.id, sub, &trailing).await;
                    continue;
                }

                let outcome = match self.sync_table(sub, &context, &container.id, &mut databases, records).await {
                    Ok((table, database, report)) => TableOutcome::Populated {
                        table,
                        database,
                        report,
                    },
                    Err(e) => {
                        error!(table = %sub, error = %e, "Table sync failed");
                        TableOutcome::Failed {
                            table: sub.to_string(),
                            error: e.to_string(),
                        }
                    },
                };
                tables.push(outcome);
                self.append_trailing(&container.id, sub, &trailing).await;
            }

            let report = EntitySyncReport {
                run_id: self.run_id,
                kind: kind.to_string(),
                api_name: unit.api_name().to_string(),
                container,
                tables,
            };

            info!(
                page_id = %report.container.id,
                tables = report.tables.len(),
                rows_written = report.rows_written(),
                failed_tables = report.failed_tables(),
                failed_rows = report.failed_rows(),
                "Entity synced"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Sync every unit in order; a failing unit is recorded and skipped
    pub async fn sync_batch(&self, units: &[ParsedEntity]) -> BatchReport {
        self.sync_batch_with(units, |_, _| {}).await
    }

    /// [`Orchestrator::sync_batch`] calling `on_unit` after each unit with
    /// the unit and whether it synced
    pub async fn sync_batch_with<F>(&self, units: &[ParsedEntity], mut on_unit: F) -> BatchReport
    where
        F: FnMut(&ParsedEntity, bool),
    {
        let started_at = chrono::Utc::now();
        let mut synced = Vec::with_capacity(units.len());
        let mut failed = Vec::new();

        for unit in units {
            match self.sync_entity(unit).await {
                Ok(report) => {
                    synced.push(report);
                    on_unit(unit, true);
                },
                Err(e) => {
                    error!(
                        run_id = %self.run_id,
                        kind = %unit.kind(),
                        api_name = %unit.api_name(),
                        error = %e,
                        "Entity sync failed"
                    );
                    failed.push(UnitFailure {
                        kind: unit.kind().to_string(),
                        api_name: unit.api_name().to_string(),
                        error: e.to_string(),
                    });
                    on_unit(unit, false);
                },
            }
        }

        info!(
            run_id = %self.run_id,
            synced = synced.len(),
            failed = failed.len(),
            "Batch complete"
        );

        BatchReport {
            run_id: self.run_id,
            started_at,
            finished_at: chrono::Utc::now(),
            synced,
            failed,
        }
    }

    /// Main page of the unit. A newly created page also yields the layout of
    /// the overview blocks still to be placed around its tables.
    async fn ensure_main_page(
        &self,
        unit: &ParsedEntity,
        context: &RenderContext,
    ) -> Result<(RemoteContainer, PageLayout)> {
        let kind = unit.kind();
        let api_name = unit.api_name();

        let overview = self.registry.overview(kind)?;
        validate_context(&format!("{}/overview", kind), overview, context)?;
        let rendered = render(overview, context);
        let title = rendered.title.clone().unwrap_or_else(|| api_name.to_string());

        let parent = self.resolve_parent().await?;
        let policy = self.reconciler.policy();

        let (existing, mut request) = match parent {
            ParentRef::Database(db) => {
                let schema = with_retry(policy, "read parent database", || self.store.database_schema(db)).await?;
                let has_api_name = schema.has_column(API_NAME_COLUMN);

                let existing = if has_api_name {
                    with_retry(policy, "find main page", || {
                        self.store.find_page_by_property(db, API_NAME_COLUMN, api_name)
                    })
                    .await?
                } else {
                    None
                };

                let mut request = CreatePage::new(parent.clone(), title.clone());
                request.title_property = schema.title_property;
                if has_api_name {
                    request
                        .properties
                        .push((API_NAME_COLUMN.to_string(), PropertyValue::Text(api_name.to_string())));
                }
                (existing, request)
            },
            ParentRef::Page(page_id) => {
                let pages = with_retry(policy, "list child pages", || self.store.child_pages(page_id)).await?;
                let existing = pages.get(&title).map(|id| RemoteRef::new(id.clone()));
                (existing, CreatePage::new(parent.clone(), title.clone()))
            },
            ParentRef::Workspace => (None, CreatePage::new(parent.clone(), title.clone())),
        };

        if let Some(found) = existing {
            info!(page_id = %found.id, title = %title, "Reusing main page");
            let container = RemoteContainer {
                id: found.id,
                url: found.url,
                created: false,
            };
            return Ok((container, PageLayout::default()));
        }

        let mut layout = PageLayout::split(kind, rendered.blocks);
        request.children = std::mem::take(&mut layout.lead);
        let created = with_retry(policy, "create main page", || self.store.create_page(request.clone())).await?;
        info!(page_id = %created.id, title = %title, "Created main page");

        let container = RemoteContainer {
            id: created.id,
            url: created.url,
            created: true,
        };
        Ok((container, layout))
    }

    /// Overview blocks placed after a table. A failure leaves the page
    /// incomplete but does not fail the entity.
    async fn append_trailing(&self, page_id: &str, sub: Subcomponent, blocks: &[Block]) {
        if blocks.is_empty() {
            return;
        }

        let label = format!("append blocks after {}", sub);
        let result = with_retry(self.reconciler.policy(), &label, || self.store.append_blocks(page_id, blocks)).await;
        if let Err(e) = result {
            warn!(table = %sub, blocks = blocks.len(), error = %e, "Failed to append overview blocks");
        }
    }

    async fn sync_table(
        &self,
        sub: Subcomponent,
        context: &RenderContext,
        page_id: &str,
        databases: &mut HashMap<String, String>,
        records: Vec<MetadataRecord>,
    ) -> Result<(String, RemoteContainer, TableReport)> {
        let descriptor = self.registry.table(sub)?;
        validate_context(&sub.to_string(), descriptor, context)?;
        let schema = render(descriptor, context)
            .table
            .ok_or_else(|| SyncError::InvalidTemplate {
                name: sub.to_string(),
                reason: "template has no table".to_string(),
            })?;

        let database = match databases.get(&schema.title) {
            Some(id) => {
                debug!(table = %schema.title, database_id = %id, "Reusing table");
                RemoteContainer {
                    id: id.clone(),
                    url: None,
                    created: false,
                }
            },
            None => {
                let label = format!("create table {}", schema.title);
                let created = with_retry(self.reconciler.policy(), &label, || {
                    self.store.create_database(page_id, &schema)
                })
                .await?;
                info!(table = %schema.title, database_id = %created.id, "Created table");
                databases.insert(schema.title.clone(), created.id.clone());
                RemoteContainer {
                    id: created.id,
                    url: created.url,
                    created: true,
                }
            },
        };

        let rows = map_rows(sub, &schema, &records);
        let target = TableTarget {
            id: &database.id,
            title: &schema.title,
            key_columns: sub.key_columns(),
        };
        let report = self.reconciler.populate(target, rows).await?;

        Ok((schema.title, database, report))
    }
}

/// Records of one table, without those lacking an api_name
fn usable_records(unit: &ParsedEntity, sub: Subcomponent) -> Vec<MetadataRecord> {
    let mut records = unit_records(unit, sub);
    let before = records.len();
    records.retain(MetadataRecord::has_api_name);

    let dropped = before - records.len();
    if dropped > 0 {
        warn!(table = %sub, dropped, "Skipping records without an api_name");
    }
    records
}
