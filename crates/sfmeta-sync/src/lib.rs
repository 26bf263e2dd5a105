//! sfmeta Sync Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Projects parsed Salesforce metadata into documentation pages and tables
//! of a Notion-compatible workspace.
//!
//! # Overview
//!
//! - **Templates**: page and table descriptors with `{PLACEHOLDER}` rendering
//! - **Mapper**: metadata records to typed table rows
//! - **Reconciliation**: idempotent, non-destructive upserts with windowed
//!   concurrency, per-attempt timeout and linear-backoff retry
//! - **Store**: the [`store::DocumentStore`] seam and its HTTP implementation
//!   in [`notion`]
//! - **Orchestrator**: parent resolution, main page, tables, per-table
//!   failure isolation
//!
//! # Example
//!
//! ```no_run
//! use sfmeta_sync::{NotionClient, Orchestrator, SyncConfig, TemplateRegistry};
//! use std::sync::Arc;
//!
//! # async fn run(objects: Vec<sfmeta_common::metadata::ParsedEntity>) -> sfmeta_sync::Result<()> {
//! let config = SyncConfig::from_env()?;
//! let client = Arc::new(NotionClient::new(&config)?);
//! let orchestrator = Orchestrator::new(client, TemplateRegistry::builtin(), config);
//!
//! let report = orchestrator.sync_batch(&objects).await;
//! println!("{} synced, {} failed", report.synced.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod notion;
pub mod orchestrator;
pub mod reconcile;
pub mod store;
pub mod subcomponent;
pub mod template;

// Re-export commonly used types
pub use config::{ParentSetting, SyncConfig};
pub use error::{Result, SyncError};
pub use mapper::{map_row, map_rows, MappedRow, PropertyValue};
pub use notion::NotionClient;
pub use orchestrator::{BatchReport, EntitySyncReport, Orchestrator, TableOutcome};
pub use reconcile::{Reconciler, RetryPolicy, TableReport, TableTarget};
pub use store::DocumentStore;
pub use subcomponent::Subcomponent;
pub use template::TemplateRegistry;
