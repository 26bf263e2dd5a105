//! `sfmeta cache` command implementation

use super::parse::parse_source;
use crate::cache::CacheManager;
use crate::config::CliConfig;
use crate::error::Result;
use crate::SourceCommand;
use colored::Colorize;

/// Parse a source and upsert it into the local cache
pub async fn run(source: &SourceCommand) -> Result<()> {
    let config = CliConfig::from_env()?;
    let entity = parse_source(source, config.chunk_size)?;

    let cache = CacheManager::new(&config).await?;
    cache.store(&entity).await?;

    println!(
        "{} {} {}",
        "Cached".green().bold(),
        entity.kind(),
        entity.api_name().cyan()
    );
    println!("  Cache: {}", cache.db_path().display());
    Ok(())
}
