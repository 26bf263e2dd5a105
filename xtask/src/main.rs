//! Build automation tasks for sfmeta
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for sfmeta", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<sfmeta_cli::Cli>();

    let content = format!(
        r#"# sfmeta CLI Reference

Generated from the CLI source code on {}.

## Overview

sfmeta parses Salesforce metadata in source format (objects, profiles and
flows), keeps it in a local SQLite cache and documents it in a Notion
workspace: one page per entity and one table per subcomponent. Re-running a
sync only fills blank cells and adds missing rows; existing values are never
overwritten.

## Quick Start

```bash
# Point at the workspace
export NOTION_TOKEN=secret_...
export NOTION_ROOT_PAGE_ID=...

# Preview a template
sfmeta templates render object fields

# Sync every object of a project
sfmeta sync object --objects-path force-app/main/default/objects

# Sync a profile and a flow
sfmeta sync profile force-app/main/default/profiles/Admin.profile-meta.xml
sfmeta sync flow force-app/main/default/flows/Lead_Assignment.flow-meta.xml

# Re-sync a cached entity without re-parsing
sfmeta push object Account
```

## Commands

{}

## Environment Variables

- `NOTION_API_URL` - Workspace API base (default: `https://api.notion.com/v1`, fallback `MCP_API_URL`)
- `NOTION_TOKEN` - Bearer token
- `NOTION_VERSION` - API version header (default: `2022-06-28`)
- `NOTION_DATABASE_ID` - Parent database of documentation pages
- `NOTION_ROOT_PAGE_ID` - Parent page, used when no database id is set
- `SFMETA_CONCURRENCY` - Rows written concurrently per window (default: 3)
- `SFMETA_MAX_ATTEMPTS` - Attempts per remote write (default: 3)
- `SFMETA_RETRY_BASE_MS` - Linear backoff unit (default: 1000)
- `SFMETA_REQUEST_TIMEOUT_SECS` - Per-attempt ceiling (default: 30)
- `SFMETA_CHUNK_SIZE` - Profile permission chunk size (default: 100)
- `SFMETA_CACHE_DB` - Cache database path
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT` - Logging

---

*This documentation is generated. To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
