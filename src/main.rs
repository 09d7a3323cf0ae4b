use clap::{Parser, Subcommand};
use configuration::load_config;
// Import database types directly from the database crate
use database::connection::{connect, run_migrations};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Bourse trading simulator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (DATABASE_URL lives there).
    dotenvy::dotenv().ok();

    // Initialize structured logging. `RUST_LOG` controls the filter.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A paper-trading brokerage: virtual cash, real quotes, an append-only ledger.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address override (e.g. "127.0.0.1:8080"). Defaults to the
    /// host/port from config.toml.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

/// Loads configuration, prepares the database, and runs the web server.
async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    config.validate()?;

    let db_pool = connect(config.database.max_connections).await?;
    run_migrations(&db_pool).await?;

    let addr = match args.addr {
        Some(addr) => addr,
        None => SocketAddr::new(config.server.host.parse()?, config.server.port),
    };

    tracing::info!(%addr, "starting bourse server");
    web_server::run_server(config, db_pool, addr).await
}
