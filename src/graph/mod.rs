//! Reply-graph construction from feeds and threads.
//!
//! Two stateless builders share the data model in [`types`]:
//!
//! - [`feed::feed_to_graph`] folds a flat author feed into a reply graph.
//! - [`thread::expand`] fetches one post's full thread and flattens it into
//!   an ordered post list plus a subgraph scoped to that thread.
//!
//! Both allocate fresh values per call; no graph state is shared between
//! calls.

pub mod feed;
pub mod thread;
pub mod types;

pub use feed::feed_to_graph;
pub use thread::{expand, thread_to_post_list, thread_to_subgraph, ThreadSnapshot};
pub use types::{Edge, Graph, Node};
