//! `sfmeta sync` command implementation
//!
//! Parses every source, caches it unless `--no-cache` is given, and syncs
//! the entities in order. A source that fails to parse is reported with the
//! unit failures of the sync itself; the command only fails when nothing
//! could be synced. An unusable cache is logged and skipped.

use super::parse::parse_path;
use crate::cache::CacheManager;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::progress::create_progress_bar;
use crate::SyncCommand;
use colored::Colorize;
use sfmeta_common::metadata::{EntityKind, ParsedEntity};
use sfmeta_ingest::discover_object_dirs;
use sfmeta_sync::orchestrator::UnitFailure;
use sfmeta_sync::{BatchReport, EntitySyncReport, NotionClient, Orchestrator, SyncConfig, TableOutcome, TemplateRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Build an orchestrator over the HTTP client from environment settings
pub fn orchestrator() -> Result<Orchestrator> {
    let config = SyncConfig::from_env()?;
    let client = Arc::new(NotionClient::new(&config)?);
    Ok(Orchestrator::new(client, TemplateRegistry::builtin(), config))
}

/// Sources named by the command, with their kind
pub fn sources(target: &SyncCommand) -> Result<(EntityKind, Vec<PathBuf>)> {
    match target {
        SyncCommand::Object { paths, objects_path } => {
            let mut all = paths.clone();
            if let Some(root) = objects_path {
                all.extend(discover_object_dirs(root)?);
            }
            if all.is_empty() {
                return Err(CliError::usage("give object directories or --objects-path"));
            }
            Ok((EntityKind::Object, all))
        },
        SyncCommand::Profile { paths } => Ok((EntityKind::Profile, paths.clone())),
        SyncCommand::Flow { paths } => Ok((EntityKind::Flow, paths.clone())),
    }
}

fn source_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    name.split('.').next().unwrap_or_default().to_string()
}

/// Parse, cache and sync every source
pub async fn run(target: &SyncCommand, no_cache: bool) -> Result<()> {
    let config = CliConfig::from_env()?;
    let (kind, paths) = sources(target)?;
    let orchestrator = orchestrator()?;

    let mut entities: Vec<ParsedEntity> = Vec::with_capacity(paths.len());
    let mut parse_failures = Vec::new();
    for path in &paths {
        match parse_path(kind, path, config.chunk_size) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse source");
                parse_failures.push(UnitFailure {
                    kind: kind.to_string(),
                    api_name: source_name(path),
                    error: e.to_string(),
                });
            },
        }
    }

    if !no_cache && !entities.is_empty() {
        cache_entities(&config, &entities).await;
    }

    let progress = create_progress_bar(entities.len() as u64, &format!("Syncing {} entities", kind));
    let mut report = orchestrator
        .sync_batch_with(&entities, |unit, _| {
            progress.set_message(format!("Synced {} {}", kind, unit.api_name()));
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    report.failed.extend(parse_failures);
    info!(run_id = %report.run_id, total = report.total(), "Sync finished");

    print_batch(&report);

    if report.all_failed() {
        return Err(CliError::BatchFailed(report.total()));
    }
    Ok(())
}

/// Store parsed entities in the local cache; failures never stop the sync
async fn cache_entities(config: &CliConfig, entities: &[ParsedEntity]) {
    let cache = match CacheManager::new(config).await {
        Ok(cache) => cache,
        Err(e) => {
            warn!(path = %config.cache_db.display(), error = %e, "Cache unavailable, syncing without it");
            return;
        },
    };

    for entity in entities {
        if let Err(e) = cache.store(entity).await {
            warn!(kind = %entity.kind(), api_name = %entity.api_name(), error = %e, "Failed to cache entity");
        }
    }
}

/// Print one entity's result
pub fn print_entity(report: &EntitySyncReport) {
    let marker = if report.failed_tables() + report.failed_rows() == 0 {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!("{} {} {}", marker, report.kind, report.api_name.cyan().bold());
    if let Some(url) = &report.container.url {
        println!("  Page:   {}", url);
    }

    for table in &report.tables {
        match table {
            TableOutcome::Populated { table, report, .. } => {
                println!(
                    "  {:<40} created {}, patched {}, unchanged {}",
                    table, report.created, report.patched, report.skipped
                );
                for failure in &report.failures {
                    println!("    {} {}: {}", "failed".red(), failure.key, failure.error);
                }
            },
            TableOutcome::Failed { table, error } => {
                println!("  {:<40} {} {}", table, "failed:".red(), error);
            },
        }
    }
}

/// Print a batch summary
pub fn print_batch(report: &BatchReport) {
    for entity in &report.synced {
        print_entity(entity);
    }
    for failure in &report.failed {
        println!(
            "{} {} {}: {}",
            "✗".red(),
            failure.kind,
            failure.api_name.bold(),
            failure.error
        );
    }

    println!();
    println!("{}", "Summary:".cyan().bold());
    println!("  Run:     {}", report.run_id);
    println!("  Synced:  {}", report.synced.len());
    println!("  Failed:  {}", report.failed.len());
    println!(
        "  Rows:    {}",
        report.synced.iter().map(EntitySyncReport::rows_written).sum::<usize>()
    );
}
