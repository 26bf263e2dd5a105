//! `sfmeta parse` command implementation
//!
//! Parses one object directory, profile or flow and prints it as JSON.

use crate::config::CliConfig;
use crate::error::Result;
use crate::SourceCommand;
use sfmeta_common::metadata::{EntityKind, ParsedEntity};
use sfmeta_ingest::{parse_flow, parse_object, parse_profile};
use std::path::Path;

/// Parse a single source into an entity
pub fn parse_source(source: &SourceCommand, chunk_size: usize) -> Result<ParsedEntity> {
    let entity = match source {
        SourceCommand::Object { path } => ParsedEntity::Object(parse_object(path)?),
        SourceCommand::Profile { path } => ParsedEntity::Profile(parse_profile(path, chunk_size)?),
        SourceCommand::Flow { path } => ParsedEntity::Flow(parse_flow(path)?),
    };
    Ok(entity)
}

/// Parse a path of a known kind
pub fn parse_path(kind: EntityKind, path: &Path, chunk_size: usize) -> Result<ParsedEntity> {
    let path = path.to_path_buf();
    let source = match kind {
        EntityKind::Object => SourceCommand::Object { path },
        EntityKind::Profile => SourceCommand::Profile { path },
        EntityKind::Flow => SourceCommand::Flow { path },
    };
    parse_source(&source, chunk_size)
}

/// Print the parsed source as pretty JSON
pub async fn run(source: &SourceCommand) -> Result<()> {
    let config = CliConfig::from_env()?;
    let entity = parse_source(source, config.chunk_size)?;

    println!("{}", serde_json::to_string_pretty(&entity)?);
    Ok(())
}
