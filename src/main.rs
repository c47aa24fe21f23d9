//! Skygraph Command Line Interface
//!
//! Builds reply graphs from Bluesky author feeds and expands conversation
//! threads.

use skygraph::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "skygraph=info".into()),
        )
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
