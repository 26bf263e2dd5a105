//! sfmeta-ingest - parse Salesforce metadata and print the result

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sfmeta_common::chunk::DEFAULT_CHUNK_SIZE;
use sfmeta_common::logging::{init_logging, LogConfig};
use sfmeta_common::metadata::PermissionKind;
use sfmeta_ingest::{object, profile};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sfmeta-ingest")]
#[command(author, version, about = "Parse Salesforce metadata exports")]
struct Cli {
    #[command(subcommand)]
    source: Source,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Source {
    /// Parse an object directory (or every object under --all)
    Object {
        /// Object directory, e.g. objects/Account
        path: PathBuf,

        /// Treat PATH as an objects root and parse every sub-directory
        #[arg(long)]
        all: bool,
    },

    /// Parse a profile file
    Profile {
        path: PathBuf,

        /// Items per permission chunk
        #[arg(long, env = "SFMETA_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Print chunk and summary lines instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Parse a flow file
    Flow { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::cli("sfmeta-ingest", cli.verbose).merge_env()?;
    init_logging(&log_config)?;

    match cli.source {
        Source::Object { path, all } => {
            if all {
                let mut parsed = Vec::new();
                for dir in object::discover_object_dirs(&path)? {
                    match object::parse_object(&dir) {
                        Ok(obj) => parsed.push(obj),
                        Err(e) => tracing::warn!(path = %dir.display(), error = %e, "Skipping object"),
                    }
                }
                print_json(&parsed)?;
            } else {
                print_json(&object::parse_object(&path)?)?;
            }
        },

        Source::Profile {
            path,
            chunk_size,
            summary,
        } => {
            if summary {
                let mut totals: BTreeMap<PermissionKind, usize> = BTreeMap::new();
                profile::parse_profile_with(&path, chunk_size, |kind, chunk| {
                    *totals.entry(kind).or_default() += chunk.len();
                    println!("[CHUNK] {}: {} items", kind, chunk.len());
                })?;
                println!("---");
                for (kind, total) in totals {
                    println!("[SUMMARY] {}: {} items", kind, total);
                }
            } else {
                print_json(&profile::parse_profile(&path, chunk_size)?)?;
            }
        },

        Source::Flow { path } => print_json(&sfmeta_ingest::parse_flow(&path)?)?,
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize parse result")?;
    println!("{}", json);
    Ok(())
}
