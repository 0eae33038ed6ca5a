//! Property search MCP server
//!
//! This binary provides the command-line interface for propsearch.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use propsearch_core::config::Config;
use propsearch_elasticsearch::{create_search_backend, spawn_readiness_probe};
use propsearch_geocoding::Geocoder;
use propsearch_mcp_server::{run_mcp_server, PropertiesMcpServer};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "propsearch")]
#[command(about = "Real-estate property search tools over MCP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (default)
    Serve,
    /// Load and validate the configuration, then print it with secrets redacted
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.config.as_deref()).await,
        Commands::CheckConfig => check_config(cli.config.as_deref()),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

/// Initialize logging system
///
/// One JSON object per line on stderr; stdout carries the MCP framing.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "propsearch={level},propsearch_core={level},propsearch_elasticsearch={level},\
             propsearch_geocoding={level},propsearch_mcp_server={level}"
        ))
    });

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn check_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    eprintln!("{config:#?}");
    info!("Configuration is valid");
    Ok(())
}

/// Start the MCP server
async fn serve(config_path: Option<&Path>) -> Result<()> {
    info!("Preparing to start property search MCP server...");

    let config = load_config(config_path)?;
    info!("Loaded configuration: {config:?}");

    let backend = create_search_backend(&config).context("Failed to create search backend")?;

    // Advisory only; the server registers its tools without waiting
    let _probe = spawn_readiness_probe(
        backend.clone(),
        config.inference_id.clone(),
        config.probe_timeout_secs,
    );

    let geocoder = Geocoder::from_config(&config).context("Failed to create geocoder")?;
    let server = PropertiesMcpServer::new(backend, geocoder, config.template_id.clone());

    run_mcp_server(server)
        .await
        .context("MCP server terminated with an error")?;

    info!("MCP server shut down cleanly");
    Ok(())
}
