//! Sync outcome reports

use crate::reconcile::TableReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A remote page or database the sync wrote into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteContainer {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// False when an existing container was reused
    pub created: bool,
}

/// Result of one table
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Populated {
        table: String,
        database: RemoteContainer,
        report: TableReport,
    },
    Failed {
        table: String,
        error: String,
    },
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Populated { table, .. } | TableOutcome::Failed { table, .. } => table,
        }
    }

    /// Whether the table failed or any of its rows did
    pub fn has_failures(&self) -> bool {
        match self {
            TableOutcome::Populated { report, .. } => !report.is_clean(),
            TableOutcome::Failed { .. } => true,
        }
    }
}

/// Result of one entity
#[derive(Debug, Clone, Serialize)]
pub struct EntitySyncReport {
    pub run_id: Uuid,
    pub kind: String,
    pub api_name: String,
    pub container: RemoteContainer,
    pub tables: Vec<TableOutcome>,
}

impl EntitySyncReport {
    pub fn failed_tables(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| matches!(t, TableOutcome::Failed { .. }))
            .count()
    }

    pub fn failed_rows(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match t {
                TableOutcome::Populated { report, .. } => report.failures.len(),
                TableOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn rows_written(&self) -> usize {
        self.tables
            .iter()
            .map(|t| match t {
                TableOutcome::Populated { report, .. } => report.written(),
                TableOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// An entity that could not be synced at all
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitFailure {
    pub kind: String,
    pub api_name: String,
    pub error: String,
}

/// Result of a batch of entities
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub synced: Vec<EntitySyncReport>,
    pub failed: Vec<UnitFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.synced.len() + self.failed.len()
    }

    /// True when the batch was non-empty and no entity succeeded
    pub fn all_failed(&self) -> bool {
        self.synced.is_empty() && !self.failed.is_empty()
    }
}
