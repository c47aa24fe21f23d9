//! Command implementations for the skygraph CLI.

use crate::api::{fetch_all_posts, XrpcClient};
use crate::config::Config;
use crate::error::{Result, SkygraphError};
use crate::graph::thread;
use crate::view::FeedView;
use rpassword::prompt_password;
use std::io::{self, Write};
use tracing::info;

/// Logs in using environment config, prompting for whatever is missing.
async fn login_client(config: &Config) -> Result<XrpcClient> {
    let mut client = XrpcClient::with_service(&config.service);

    let identifier = match &config.identifier {
        Some(id) => id.clone(),
        None => prompt_line("Identifier (handle or DID): ")?,
    };
    let password = match &config.app_password {
        Some(pw) => pw.clone(),
        None => prompt_password("App password: ")
            .map_err(|e| SkygraphError::auth(format!("failed to read password: {}", e)))?,
    };

    client.login(&identifier, &password).await?;
    Ok(client)
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim().to_string();
    if trimmed.is_empty() {
        return Err(SkygraphError::invalid_input("empty identifier"));
    }
    Ok(trimmed)
}

/// Execute graph command: fetch the actor's whole feed, build the reply
/// graph, and print a summary.
pub async fn graph(actor: &str) -> Result<()> {
    let config = Config::from_env();
    let client = login_client(&config).await?;

    info!(actor, "fetching full author feed");
    let entries = fetch_all_posts(&client, actor).await;

    let mut view = FeedView::new();
    view.refresh(entries);
    let graph = view.personal_graph();

    println!("Graph for {}", actor);
    println!("  posts:  {}", view.all_posts().len());
    println!("  nodes:  {} ({} stubs)", graph.len(), graph.stub_count());
    println!("  edges:  {}", graph.links.len());

    // Conversation hot spots: posts drawing the most replies in this feed.
    let mut fan_in: Vec<_> = graph
        .reverse_adjacency
        .iter()
        .map(|(id, sources)| (id, sources.len()))
        .collect();
    fan_in.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (id, count) in fan_in.iter().take(5) {
        let label = graph
            .node(id)
            .and_then(|n| n.post.as_ref())
            .and_then(|p| p.text())
            .unwrap_or("<no content>");
        println!("  {:3} replies <- {} {:.60}", count, id, label);
    }

    Ok(())
}

/// Execute thread command: expand a thread and print the ordered posts.
pub async fn thread(uri: &str, depth: u16) -> Result<()> {
    let config = Config::from_env();
    let client = login_client(&config).await?;

    let snapshot = thread::expand(&client, uri, depth).await?;

    println!("Thread for {}", uri);
    println!(
        "  {} posts, {} nodes, {} edges",
        snapshot.posts.len(),
        snapshot.graph.len(),
        snapshot.graph.links.len()
    );
    for post in &snapshot.posts {
        println!(
            "  @{}: {}",
            post.author.handle,
            post.text().unwrap_or("<no content>")
        );
    }

    Ok(())
}

/// Execute timeline command: print one page of the home timeline.
pub async fn timeline(limit: u16) -> Result<()> {
    let config = Config::from_env();
    let client = login_client(&config).await?;

    let page = client.get_timeline(limit, None).await?;
    let mut log = crate::timeline::TimelineLog::new();
    log.extend_down(page.feed, page.cursor);

    for entry in log.posts() {
        let marker = if entry.is_repost() { "[rt] " } else { "" };
        println!(
            "{}@{}: {}",
            marker,
            entry.post.author.handle,
            entry.post.text().unwrap_or("<no content>")
        );
    }
    if let Some(cursor) = log.cursor() {
        println!("-- more available (cursor {})", cursor);
    }

    Ok(())
}
