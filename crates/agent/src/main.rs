//! Balise agent - standalone error ingest binary
//!
//! This binary runs the stateless ingest endpoint, receiving error records
//! over HTTP and writing them to the process log via `tracing`.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "balise-agent", version, about = "Balise error ingest agent")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = balise_agent::DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the ingest server (default)
    Run,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balise_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Run server (default behavior regardless of subcommand)
    if let Err(e) = balise_agent::serve(args.port, Arc::new(balise_agent::TracingSink)).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
