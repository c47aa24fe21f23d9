//! # skygraph - Bluesky reply-graph client
//!
//! A client for the Bluesky/AT Protocol network that renders an author's
//! feed as a reply graph: every post becomes a node (grouped by author),
//! every reply becomes a directed edge to its parent, and focusing a post
//! expands the full conversation thread around it.
//!
//! ## Architecture
//!
//! - **API layer** ([`api`]): a small XRPC client (sessions, author feeds,
//!   the home timeline, post threads) behind `FeedSource`/`ThreadSource`
//!   capability traits, so builders never depend on the transport.
//! - **Graph core** ([`graph`]): stateless builders that fold a flat feed
//!   into a node/edge graph with adjacency indices, and flatten a recursive
//!   thread view into an ordered post list plus subgraph.
//! - **View state** ([`view`]): the graph/post-list a renderer displays,
//!   with sequence-guarded focus so racing thread fetches cannot commit
//!   stale results.
//! - **Timeline** ([`timeline`]): segment-based timeline loading with
//!   cross-segment deduplication and a ranking seam.
//!
//! ## Example
//!
//! ```rust,no_run
//! use skygraph::api::{fetch_all_posts, XrpcClient};
//! use skygraph::view::FeedView;
//!
//! # async fn example() -> skygraph::Result<()> {
//! let mut client = XrpcClient::new();
//! client.login("alice.bsky.social", "app-password").await?;
//!
//! let entries = fetch_all_posts(&client, "alice.bsky.social").await;
//! let mut view = FeedView::new();
//! view.refresh(entries);
//!
//! let graph = view.display_graph();
//! println!("{} posts, {} reply edges", graph.len(), graph.links.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod timeline;
pub mod view;

pub use error::{Result, SkygraphError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
