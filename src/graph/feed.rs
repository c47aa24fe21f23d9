//! Feed-to-graph construction.
//!
//! Folds a flat, paginated author feed into a reply graph: one node per
//! post, one directed edge per reply-parent reference. Repost attributions
//! and conversation-root references never create edges; reposts indicate
//! visibility, not conversational structure.
//!
//! The builder is a stateless function: it allocates and returns a fresh
//! [`Graph`] per call and retains nothing between calls.

use crate::api::types::{FeedViewPost, PostId};
use crate::graph::types::{Graph, Node};
use std::collections::HashSet;
use tracing::debug;

/// Builds a reply graph from an ordered sequence of feed entries.
///
/// Two passes over the input:
///
/// 1. Every entry contributes a node keyed by its post CID. A CID seen a
///    second time (reposts surfacing the same post again, pagination
///    overlap) is skipped; the first occurrence's node wins.
/// 2. Every entry carrying a reply reference contributes an edge from the
///    post to its parent. A parent that never appeared as its own feed
///    entry gets a node synthesized from the parent view embedded in the
///    reply reference, so every edge endpoint has a node.
///
/// Entries without a valid CID are a caller precondition, not a handled
/// error.
pub fn feed_to_graph(entries: &[FeedViewPost]) -> Graph {
    let mut graph = Graph::new();
    let mut seen: HashSet<PostId> = HashSet::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.post.cid.clone()) {
            graph.push_node(Node::from_post(entry.post.clone()));
        }
    }

    for entry in entries {
        let Some(reply) = &entry.reply else {
            continue;
        };
        let parent_id = reply.parent.cid.clone();
        if seen.insert(parent_id.clone()) {
            graph.push_node(Node::from_post(reply.parent.clone()));
        }
        graph.push_edge(entry.post.cid.clone(), parent_id);
    }

    debug!(
        nodes = graph.len(),
        links = graph.links.len(),
        "built feed graph"
    );
    graph
}
