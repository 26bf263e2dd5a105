//! `sfmeta push` command implementation

use super::sync::{orchestrator, print_entity};
use crate::cache::CacheManager;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::progress::create_spinner;
use sfmeta_common::metadata::EntityKind;
use tracing::info;

/// Sync a cached entity without re-parsing it
pub async fn run(kind: EntityKind, api_name: &str) -> Result<()> {
    let config = CliConfig::from_env()?;
    let cache = CacheManager::new(&config).await?;

    let entity = cache
        .load(kind, api_name)
        .await?
        .ok_or_else(|| CliError::not_cached(kind.as_str(), api_name))?;

    let orchestrator = orchestrator()?;
    info!(run_id = %orchestrator.run_id(), kind = %kind, api_name, "Pushing cached entity");

    let spinner = create_spinner(&format!("Syncing {} {}...", kind, api_name));
    let result = orchestrator.sync_entity(&entity).await;
    spinner.finish_and_clear();

    print_entity(&result?);
    Ok(())
}
