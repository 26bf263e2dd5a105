//! sfmeta CLI - Main entry point

use clap::Parser;
use sfmeta_cli::commands;
use sfmeta_cli::{Cli, Commands, TemplatesCommand};
use sfmeta_common::logging::{init_logging, LogConfig};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Settings from .env apply to every command
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    let log_config = LogConfig::cli("sfmeta", cli.verbose);

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> sfmeta_cli::Result<()> {
    let Some(ref command) = cli.command else {
        unreachable!("Command should have been validated in main");
    };

    match command {
        Commands::Parse { source } => commands::parse::run(source).await,

        Commands::Cache { source } => commands::cache::run(source).await,

        Commands::Sync { target, no_cache } => commands::sync::run(target, *no_cache).await,

        Commands::Push { kind, api_name } => commands::push::run((*kind).into(), api_name).await,

        Commands::Templates { command } => match command {
            TemplatesCommand::List => commands::templates::list().await,
            TemplatesCommand::Render { kind, name } => {
                commands::templates::render_template((*kind).into(), name).await
            },
        },

        Commands::Status { kind } => commands::status::run(kind.map(Into::into)).await,
    }
}
