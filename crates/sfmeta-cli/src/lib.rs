//! sfmeta CLI Library
//!
//! Command-line interface for documenting Salesforce metadata in a Notion
//! workspace.
//!
//! # Overview
//!
//! - **Parsing**: print parsed objects, profiles and flows (`sfmeta parse`)
//! - **Caching**: keep parsed metadata in a local SQLite cache (`sfmeta cache`)
//! - **Syncing**: parse, cache and document entities (`sfmeta sync`)
//! - **Pushing**: document an entity straight from the cache (`sfmeta push`)
//! - **Templates**: inspect the built-in templates (`sfmeta templates`)
//! - **Status**: list cached entities (`sfmeta status`)

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::CliConfig;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use sfmeta_common::metadata::EntityKind;
use std::path::PathBuf;

/// sfmeta - Salesforce metadata documentation sync
#[derive(Parser, Debug)]
#[command(name = "sfmeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the command reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse metadata and print it as JSON
    Parse {
        #[command(subcommand)]
        source: SourceCommand,
    },

    /// Parse metadata and store it in the local cache
    Cache {
        #[command(subcommand)]
        source: SourceCommand,
    },

    /// Parse, cache and sync metadata to the workspace
    Sync {
        #[command(subcommand)]
        target: SyncCommand,

        /// Skip the local cache
        #[arg(long, global = true)]
        no_cache: bool,
    },

    /// Sync an entity loaded from the local cache
    Push {
        /// Entity kind
        #[arg(value_enum)]
        kind: KindArg,

        /// API name of the cached entity
        api_name: String,
    },

    /// Inspect documentation templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// List cached entities
    Status {
        /// Only show entities of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
}

/// A single metadata source
#[derive(Subcommand, Debug, Clone)]
pub enum SourceCommand {
    /// Object directory, e.g. objects/Account
    Object { path: PathBuf },

    /// Profile file, e.g. profiles/Admin.profile-meta.xml
    Profile { path: PathBuf },

    /// Flow file, e.g. flows/Lead_Assignment.flow-meta.xml
    Flow { path: PathBuf },
}

/// Batches of metadata sources to sync
#[derive(Subcommand, Debug, Clone)]
pub enum SyncCommand {
    /// Object directories, or every object under --objects-path
    Object {
        /// Object directories
        paths: Vec<PathBuf>,

        /// Objects root; every sub-directory holding an object file is synced
        #[arg(long, env = "SFMETA_OBJECTS_PATH")]
        objects_path: Option<PathBuf>,
    },

    /// Profile files
    Profile {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Flow files
    Flow {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    /// List kinds and their template names
    List,

    /// Render a template with sample values
    Render {
        /// Entity kind
        #[arg(value_enum)]
        kind: KindArg,

        /// Template name, e.g. overview or fields
        name: String,
    },
}

/// Entity kind as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Object,
    Profile,
    Flow,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Object => EntityKind::Object,
            KindArg::Profile => EntityKind::Profile,
            KindArg::Flow => EntityKind::Flow,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_objects_path() {
        let cli = Cli::try_parse_from(["sfmeta", "sync", "--no-cache", "object", "--objects-path", "objects"])
            .unwrap();
        match cli.command {
            Some(Commands::Sync {
                target: SyncCommand::Object { paths, objects_path },
                no_cache,
            }) => {
                assert!(no_cache);
                assert!(paths.is_empty());
                assert_eq!(objects_path, Some(PathBuf::from("objects")));
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_push() {
        let cli = Cli::try_parse_from(["sfmeta", "push", "profile", "Admin"]).unwrap();
        match cli.command {
            Some(Commands::Push { kind, api_name }) => {
                assert_eq!(EntityKind::from(kind), EntityKind::Profile);
                assert_eq!(api_name, "Admin");
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_profile_sync_requires_paths() {
        assert!(Cli::try_parse_from(["sfmeta", "sync", "profile"]).is_err());
    }
}
