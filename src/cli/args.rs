//! Command-line argument parsing for skygraph.

use crate::graph::thread::DEFAULT_THREAD_DEPTH;
use std::env;
use std::process;

/// Command-line interface commands
#[derive(Debug)]
pub enum Command {
    /// Fetch an actor's full feed and print its reply graph.
    Graph { actor: String },
    /// Expand a thread and print its post list and subgraph.
    Thread { uri: String, depth: u16 },
    /// Print one page of the home timeline.
    Timeline { limit: u16 },
}

/// Parse command line arguments into a Command
pub fn parse_args() -> Command {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "graph" => {
            if args.len() < 3 {
                eprintln!("Error: graph requires an actor (handle or DID)");
                eprintln!("Usage: skygraph graph <actor>");
                process::exit(1);
            }
            Command::Graph {
                actor: args[2].clone(),
            }
        }

        "thread" => {
            if args.len() < 3 {
                eprintln!("Error: thread requires an at:// URI");
                eprintln!("Usage: skygraph thread <at-uri> [--depth N]");
                process::exit(1);
            }
            let depth = parse_flag_value(&args, "--depth").unwrap_or(DEFAULT_THREAD_DEPTH);
            Command::Thread {
                uri: args[2].clone(),
                depth,
            }
        }

        "timeline" => {
            let limit = parse_flag_value(&args, "--limit").unwrap_or(50);
            Command::Timeline { limit }
        }

        "help" | "--help" | "-h" => {
            print_usage();
            process::exit(0);
        }

        other => {
            eprintln!("Error: unknown command '{}'", other);
            print_usage();
            process::exit(1);
        }
    }
}

/// Parses `--flag N` from the argument list.
fn parse_flag_value(args: &[String], flag: &str) -> Option<u16> {
    let pos = args.iter().position(|a| a == flag)?;
    match args.get(pos + 1).map(|v| v.parse::<u16>()) {
        Some(Ok(value)) => Some(value),
        _ => {
            eprintln!("Error: {} requires a numeric value", flag);
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("skygraph - Bluesky reply-graph client");
    eprintln!();
    eprintln!("Usage: skygraph <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  graph <actor>              Build the reply graph of an actor's feed");
    eprintln!("  thread <at-uri> [--depth N]  Expand the thread containing a post");
    eprintln!("  timeline [--limit N]       Show one page of the home timeline");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKYGRAPH_SERVICE           PDS base URL (default https://bsky.social)");
    eprintln!("  SKYGRAPH_IDENTIFIER        Login handle or DID");
    eprintln!("  SKYGRAPH_APP_PASSWORD      App password (prompted when unset)");
}
