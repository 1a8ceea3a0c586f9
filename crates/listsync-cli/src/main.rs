//! listsync CLI - browse a remote record list from the terminal
//!
//! Records are cached locally so the list stays usable offline.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;
use listsync_core::config::ClientConfig;

use crate::cli::{Cli, Commands};
use crate::commands::clear::run_clear;
use crate::commands::common::resolve_config;
use crate::commands::layout::run_layout;
use crate::commands::list::run_list;
use crate::commands::refresh::run_refresh;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("listsync=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let flags = ClientConfig {
        endpoint_url: cli.endpoint,
        refresh_interval_secs: match cli.command {
            Commands::Watch { interval } => interval,
            _ => None,
        },
        request_timeout_secs: None,
        db_path: cli.db_path,
    };
    let config = resolve_config(flags, cli.config.as_deref())?;

    match cli.command {
        Commands::Watch { .. } => run_watch(&config).await?,
        Commands::List { group, json } => run_list(group, json, &config.db_path).await?,
        Commands::Refresh => {
            run_refresh(&config).await?;
        }
        Commands::Layout { mode } => {
            run_layout(mode, &config.db_path).await?;
        }
        Commands::Clear => run_clear(&config.db_path).await?,
    }

    Ok(())
}
