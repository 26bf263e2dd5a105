//! `sfmeta status` command implementation
//!
//! Shows the entities held in the local cache.

use crate::cache::CacheManager;
use crate::config::CliConfig;
use crate::error::Result;
use colored::Colorize;
use sfmeta_common::metadata::EntityKind;

/// List cached entities
pub async fn run(kind: Option<EntityKind>) -> Result<()> {
    let config = CliConfig::from_env()?;
    let cache = CacheManager::new(&config).await?;

    let entries = cache.list_entities(kind).await?;

    if entries.is_empty() {
        println!("No cached entities found.");
        println!("Run 'sfmeta cache <kind> <path>' to cache metadata.");
        return Ok(());
    }

    println!("{}", "Cached Entities:".cyan().bold());
    println!();

    for entry in &entries {
        println!("{} {}", entry.kind, entry.api_name.green());
        if let Some(label) = entry.label.as_deref().filter(|l| !l.is_empty()) {
            println!("  Label:      {}", label);
        }
        println!("  Components: {}", entry.components);
        println!("  Updated:    {}", entry.last_modified);
        println!();
    }

    println!("{}", "Summary:".cyan().bold());
    println!("  Total entities: {}", entries.len());
    println!("  Cache:          {}", cache.db_path().display());

    Ok(())
}
