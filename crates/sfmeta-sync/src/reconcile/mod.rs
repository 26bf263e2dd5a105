//! Reconciliation engine
//!
//! Writes proposed rows into a remote table without ever destroying remote
//! data:
//!
//! 1. identical proposals are dropped, as are rows with no values at all
//! 2. existing rows are fetched once and indexed by key
//! 3. rows without a key are skipped; rows sharing a key are coalesced
//! 4. new keys are created; existing rows only get their blank columns filled
//! 5. writes run in fixed windows, each row with timeout and retry
//!
//! A row that still fails after its retries is recorded in the
//! [`TableReport`] and the rest of the table proceeds.

pub mod retry;

pub use retry::{with_retry, with_timeout, RetryPolicy};

use crate::config::SyncConfig;
use crate::error::Result;
use crate::mapper::{MappedRow, PropertyValue};
use crate::store::{index_by_key, DocumentStore, RemotePage};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Remote table a population call writes to
#[derive(Debug, Clone, Copy)]
pub struct TableTarget<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub key_columns: &'a [&'a str],
}

/// A row that could not be written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub table: String,
    pub key: String,
    pub error: String,
}

/// Outcome counts of one population call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableReport {
    pub table: String,
    pub created: usize,
    pub patched: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub vacuous: usize,
    pub keyless: usize,
    pub coalesced: usize,
    pub failures: Vec<RowFailure>,
}

impl TableReport {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Rows that caused a network write
    pub fn written(&self) -> usize {
        self.created + self.patched
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What to do with one surviving row
#[derive(Debug, Clone, PartialEq)]
enum RowAction {
    Create {
        key: String,
        row: MappedRow,
    },
    Patch {
        key: String,
        page_id: String,
        values: Vec<(String, PropertyValue)>,
    },
}

impl RowAction {
    fn key(&self) -> &str {
        match self {
            RowAction::Create { key, .. } | RowAction::Patch { key, .. } => key,
        }
    }
}

enum RowOutcome {
    Created,
    Patched,
    Failed(RowFailure),
}

/// Columns the proposal can fill on an existing row
fn update_set(existing: &RemotePage, proposal: &MappedRow) -> Vec<(String, PropertyValue)> {
    proposal
        .values
        .iter()
        .filter(|(column, value)| !value.is_empty() && existing.is_blank(column))
        .cloned()
        .collect()
}

/// Reconciles proposed rows against remote tables
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn DocumentStore>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl Reconciler {
    pub fn new(store: Arc<dyn DocumentStore>, policy: RetryPolicy, concurrency: usize) -> Self {
        Self {
            store,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &SyncConfig) -> Self {
        Self::new(store, RetryPolicy::from_config(config), config.concurrency)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Upsert `rows` into `table`.
    ///
    /// Only a failure to read the existing rows is returned as an error;
    /// per-row failures are collected in the report.
    pub async fn populate(&self, table: TableTarget<'_>, rows: Vec<MappedRow>) -> Result<TableReport> {
        let mut report = TableReport::new(table.title);
        let proposed = rows.len();

        // Deduplicate identical proposals
        let mut seen = HashSet::with_capacity(rows.len());
        let mut unique = Vec::with_capacity(rows.len());
        for row in rows {
            if seen.insert(row.signature()) {
                unique.push(row);
            } else {
                report.duplicates += 1;
            }
        }

        // Drop rows with nothing to write
        let before = unique.len();
        unique.retain(|row| !row.is_vacuous());
        report.vacuous = before - unique.len();

        if unique.is_empty() {
            debug!(table = %table.title, proposed, "Nothing to populate");
            return Ok(report);
        }

        let existing = self.fetch_existing(table).await?;

        // Key rows, coalescing repeated keys into the first occurrence
        let mut keyed: Vec<(String, MappedRow)> = Vec::with_capacity(unique.len());
        let mut positions: HashMap<String, usize> = HashMap::new();
        for row in unique {
            let Some(key) = row.key(table.key_columns) else {
                warn!(
                    table = %table.title,
                    key_columns = ?table.key_columns,
                    "Skipping row without a key"
                );
                report.keyless += 1;
                continue;
            };

            match positions.get(&key) {
                Some(&idx) => {
                    let filled = keyed[idx].1.absorb(&row);
                    debug!(table = %table.title, key = %key, filled, "Coalesced row with repeated key");
                    report.coalesced += 1;
                },
                None => {
                    positions.insert(key.clone(), keyed.len());
                    keyed.push((key, row));
                },
            }
        }

        // Plan
        let mut actions = Vec::with_capacity(keyed.len());
        for (key, row) in keyed {
            match existing.get(&key) {
                None => actions.push(RowAction::Create { key, row }),
                Some(page) => {
                    let values = update_set(page, &row);
                    if values.is_empty() {
                        debug!(table = %table.title, key = %key, page_id = %page.id, "Row up to date, skipping");
                        report.skipped += 1;
                    } else {
                        actions.push(RowAction::Patch {
                            key,
                            page_id: page.id.clone(),
                            values,
                        });
                    }
                },
            }
        }

        // Execute in fixed windows
        for window in actions.chunks(self.concurrency) {
            let outcomes = join_all(window.iter().map(|action| self.execute(table, action))).await;
            for outcome in outcomes {
                match outcome {
                    RowOutcome::Created => report.created += 1,
                    RowOutcome::Patched => report.patched += 1,
                    RowOutcome::Failed(failure) => report.failures.push(failure),
                }
            }
        }

        info!(
            table = %table.title,
            proposed,
            created = report.created,
            patched = report.patched,
            skipped = report.skipped,
            duplicates = report.duplicates,
            vacuous = report.vacuous,
            keyless = report.keyless,
            coalesced = report.coalesced,
            failed = report.failures.len(),
            "Populated table"
        );

        Ok(report)
    }

    async fn fetch_existing(&self, table: TableTarget<'_>) -> Result<HashMap<String, RemotePage>> {
        let label = format!("query {}", table.title);
        let pages = with_retry(&self.policy, &label, || self.store.query_database(table.id)).await?;
        debug!(table = %table.title, rows = pages.len(), "Fetched existing rows");
        Ok(index_by_key(pages, table.key_columns))
    }

    async fn execute(&self, table: TableTarget<'_>, action: &RowAction) -> RowOutcome {
        let result = match action {
            RowAction::Create { key, row } => {
                let label = format!("create row '{}' in {}", key, table.title);
                with_retry(&self.policy, &label, || self.store.create_row(table.id, row))
                    .await
                    .map(|created| {
                        info!(table = %table.title, key = %key, page_id = %created.id, "Created row");
                        RowOutcome::Created
                    })
            },
            RowAction::Patch {
                key,
                page_id,
                values,
            } => {
                let label = format!("patch row '{}' in {}", key, table.title);
                with_retry(&self.policy, &label, || self.store.update_page(page_id, values))
                    .await
                    .map(|()| {
                        let columns: Vec<&str> = values.iter().map(|(c, _)| c.as_str()).collect();
                        info!(table = %table.title, key = %key, page_id = %page_id, columns = ?columns, "Filled blank columns");
                        RowOutcome::Patched
                    })
            },
        };

        result.unwrap_or_else(|e| {
            warn!(table = %table.title, key = %action.key(), error = %e, "Row failed");
            RowOutcome::Failed(RowFailure {
                table: table.title.to_string(),
                key: action.key().to_string(),
                error: e.to_string(),
            })
        })
    }
}
