//! Bland Mock API - CLI Entry Point

use anyhow::Result;
use bland_mock_api::{server, ConfigLoader, RequestDispatcher};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "bland-mock-api",
    about = "Configuration-driven mock server for REST and GraphQL endpoints",
    version
)]
struct Args {
    /// Path to a configuration file or a directory of them
    #[arg(short, long, default_value = "./demos")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print a sample configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration, list endpoints and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Print sample config if requested
    if args.print_config {
        println!("{}", include_str!("../demos/default-config.toml"));
        return Ok(());
    }

    // Load configuration
    info!(path = %args.config.display(), "Loading configuration");
    let mut loader = ConfigLoader::new();
    loader.load_from_path(&args.config)?;
    let config = loader.into_config();
    config.validate()?;
    info!(endpoints = config.endpoints.len(), "Loaded configuration");

    // Register health check, endpoints and GraphQL
    let dispatcher = RequestDispatcher::from_config(&config)?;

    // Validate and exit if requested
    if args.validate {
        println!(
            "Configuration is valid ({} endpoints defined)",
            dispatcher.endpoints().len()
        );
        for endpoint in dispatcher.endpoints() {
            println!("  {:<7} {} -> {}", endpoint.method, endpoint.path, endpoint.status);
        }
        if let Some(graphql) = config.graphql.as_ref().filter(|g| g.enabled) {
            println!(
                "  GraphQL {} ({} types, {} queries, {} mutations)",
                graphql.path(),
                graphql.types.len(),
                graphql.queries.len(),
                graphql.mutations.len()
            );
        }
        return Ok(());
    }

    // Run server
    server::serve(&config.server, dispatcher).await
}
