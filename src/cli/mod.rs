//! Command-line interface for skygraph.
//!
//! Thin async wrappers over the library: login from the environment (or an
//! interactive prompt), fetch, build, print.

pub mod args;
pub mod commands;

use crate::Result;

pub use args::Command;

/// Main entry point for the CLI application
pub async fn run() -> Result<()> {
    let command = args::parse_args();

    match command {
        Command::Graph { actor } => commands::graph(&actor).await,
        Command::Thread { uri, depth } => commands::thread(&uri, depth).await,
        Command::Timeline { limit } => commands::timeline(limit).await,
    }
}
