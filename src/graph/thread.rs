//! Thread expansion: flattening a recursive thread view into an ordered
//! post list and a reply subgraph.
//!
//! The thread view returned by the data source may be rooted at the
//! requested post or anywhere above it; both walks here follow `parent`
//! links upward regardless of the starting depth. Traversal is iterative
//! over explicit work stacks so pathologically deep threads cannot exhaust
//! the call stack, while preserving ancestor-then-self-then-replies
//! sequencing.

use crate::api::ThreadSource;
use crate::api::types::{PostId, PostView, ThreadNode, ThreadViewPost};
use crate::error::{Result, SkygraphError};
use crate::graph::types::{Graph, Node};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Default reply depth requested from the thread source.
pub const DEFAULT_THREAD_DEPTH: u16 = 100;

/// An expanded thread: the ordered post list and subgraph produced from one
/// fetched thread view. Both are snapshots of the same view and mutually
/// consistent.
#[derive(Debug, Clone)]
pub struct ThreadSnapshot {
    /// Posts with ancestors before descendants, siblings in source order.
    pub posts: Vec<PostView>,
    /// Reply subgraph scoped to this thread.
    pub graph: Graph,
}

/// Fetches and expands the thread containing `uri`.
///
/// A thread root the source reports as missing (or blocked from the viewer)
/// yields [`SkygraphError::ThreadNotFound`] with no partial output, so the
/// caller can keep its previously displayed graph.
#[instrument(skip(source), fields(uri = uri))]
pub async fn expand<S: ThreadSource>(source: &S, uri: &str, depth: u16) -> Result<ThreadSnapshot> {
    let node = source.post_thread(uri, depth).await?;
    let thread = match node {
        ThreadNode::Post(view) => view,
        ThreadNode::NotFound { uri } | ThreadNode::Blocked { uri } => {
            return Err(SkygraphError::thread_not_found(uri));
        }
    };

    let posts = thread_to_post_list(&thread);
    let graph = thread_to_subgraph(&thread);
    debug!(
        posts = posts.len(),
        nodes = graph.len(),
        links = graph.links.len(),
        "expanded thread"
    );
    Ok(ThreadSnapshot { posts, graph })
}

/// Walk steps for the post-list traversal.
enum ListStep<'a> {
    Visit(&'a ThreadViewPost),
    Emit(&'a ThreadViewPost),
}

/// Flattens a thread view into a single ordered post list.
///
/// Pre-order: ancestors first (following `parent` links to the top), then
/// the post itself, then each resolved reply subtree in source order.
/// Unresolved markers are filtered out. No de-duplication across visits:
/// the view is a tree under normal data-source behavior.
pub fn thread_to_post_list(thread: &ThreadViewPost) -> Vec<PostView> {
    let mut posts = Vec::new();
    let mut stack = vec![ListStep::Visit(thread)];

    while let Some(step) = stack.pop() {
        match step {
            ListStep::Visit(view) => {
                // Replies are pushed first (reversed) so they pop after the
                // emit; the parent is pushed last so it pops first.
                for reply in view.replies.iter().rev().filter_map(ThreadNode::as_post) {
                    stack.push(ListStep::Visit(reply));
                }
                stack.push(ListStep::Emit(view));
                if let Some(parent) = view.parent.as_ref().and_then(ThreadNode::as_post) {
                    stack.push(ListStep::Visit(parent));
                }
            }
            ListStep::Emit(view) => posts.push(view.post.clone()),
        }
    }

    posts
}

/// Walk steps for the subgraph traversal.
enum GraphStep<'a> {
    Visit(&'a ThreadViewPost),
    Link {
        source: PostId,
        target: PostId,
        next: &'a ThreadViewPost,
    },
}

/// Builds a reply subgraph from a thread view.
///
/// Each post contributes exactly one node (first occurrence wins). Edges go
/// from a post to each of its resolved replies, and from a resolved parent
/// to the post, updating both adjacency maps symmetrically.
pub fn thread_to_subgraph(thread: &ThreadViewPost) -> Graph {
    let mut graph = Graph::new();
    let mut seen: HashSet<PostId> = HashSet::new();
    let mut stack = vec![GraphStep::Visit(thread)];

    while let Some(step) = stack.pop() {
        match step {
            GraphStep::Visit(view) => {
                if seen.insert(view.post.cid.clone()) {
                    graph.push_node(Node::from_post(view.post.clone()));
                }
                // Follow-ups run in source order: replies downward, then the
                // parent upward; pushed reversed for the LIFO stack.
                if let Some(parent) = view.parent.as_ref().and_then(ThreadNode::as_post) {
                    stack.push(GraphStep::Link {
                        source: parent.post.cid.clone(),
                        target: view.post.cid.clone(),
                        next: parent,
                    });
                }
                for reply in view.replies.iter().rev().filter_map(ThreadNode::as_post) {
                    stack.push(GraphStep::Link {
                        source: view.post.cid.clone(),
                        target: reply.post.cid.clone(),
                        next: reply,
                    });
                }
            }
            GraphStep::Link {
                source,
                target,
                next,
            } => {
                // The endpoint node may not exist yet; the Visit pushed here
                // creates it before any consumer observes the graph.
                graph.push_edge(source, target);
                stack.push(GraphStep::Visit(next));
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ActorId, Profile};

    fn post(cid: &str, did: &str) -> PostView {
        PostView {
            uri: format!("at://{}/app.bsky.feed.post/{}", did, cid),
            cid: PostId::new(cid),
            author: Profile {
                did: ActorId::new(did),
                handle: format!("{}.test", did),
                display_name: None,
                avatar: None,
            },
            record: serde_json::json!({ "text": cid }),
            reply_count: 0,
            repost_count: 0,
            like_count: 0,
            indexed_at: String::new(),
        }
    }

    fn leaf(cid: &str) -> ThreadViewPost {
        ThreadViewPost::leaf(post(cid, "did:plc:author"))
    }

    fn cids(posts: &[PostView]) -> Vec<&str> {
        posts.iter().map(|p| p.cid.as_str()).collect()
    }

    /// Chain root <- mid <- leaf, requested at the leaf.
    fn ancestor_chain() -> ThreadViewPost {
        let mut mid = leaf("mid");
        mid.parent = Some(ThreadNode::Post(Box::new(leaf("root"))));
        let mut requested = leaf("leaf");
        requested.parent = Some(ThreadNode::Post(Box::new(mid)));
        requested
    }

    #[test]
    fn test_post_list_ancestors_before_self() {
        let posts = thread_to_post_list(&ancestor_chain());
        assert_eq!(cids(&posts), vec!["root", "mid", "leaf"]);
    }

    #[test]
    fn test_post_list_replies_in_source_order() {
        let mut thread = leaf("root");
        let mut r1 = leaf("r1");
        r1.replies = vec![ThreadNode::Post(Box::new(leaf("r1a")))];
        thread.replies = vec![
            ThreadNode::Post(Box::new(r1)),
            ThreadNode::NotFound {
                uri: "at://gone".into(),
            },
            ThreadNode::Post(Box::new(leaf("r2"))),
        ];

        let posts = thread_to_post_list(&thread);
        assert_eq!(cids(&posts), vec!["root", "r1", "r1a", "r2"]);
    }

    #[test]
    fn test_post_list_single_post() {
        let posts = thread_to_post_list(&leaf("only"));
        assert_eq!(cids(&posts), vec!["only"]);
    }

    #[test]
    fn test_post_list_deep_thread_does_not_overflow() {
        // A reply chain far deeper than any recursive walk could survive.
        let mut thread = leaf("p0");
        for i in 1..50_000 {
            let mut deeper = leaf(&format!("p{}", i));
            deeper.replies = vec![ThreadNode::Post(Box::new(thread))];
            thread = deeper;
        }
        let posts = thread_to_post_list(&thread);
        assert_eq!(posts.len(), 50_000);
        assert_eq!(posts[0].cid.as_str(), "p49999");
    }

    #[test]
    fn test_subgraph_nodes_and_edges() {
        let mut thread = leaf("root");
        thread.replies = vec![
            ThreadNode::Post(Box::new(leaf("r1"))),
            ThreadNode::Post(Box::new(leaf("r2"))),
        ];

        let graph = thread_to_subgraph(&thread);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.links.len(), 2);
        // Reply edges run from the post to each reply.
        assert_eq!(
            graph.replies_to(&PostId::new("root")),
            &[PostId::new("r1"), PostId::new("r2")]
        );
        assert_eq!(graph.replied_by(&PostId::new("r1")), &[PostId::new("root")]);
    }

    #[test]
    fn test_subgraph_parent_edge_orientation() {
        let graph = thread_to_subgraph(&ancestor_chain());
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.links.len(), 2);
        // Ancestor edges run parent -> child, same orientation as reply
        // edges running post -> reply.
        assert!(graph
            .links
            .contains(&crate::graph::types::Edge::new("mid".into(), "leaf".into())));
        assert!(graph
            .links
            .contains(&crate::graph::types::Edge::new("root".into(), "mid".into())));
    }

    #[test]
    fn test_subgraph_deduplicates_nodes() {
        // The requested post has both an ancestor and replies; every post is
        // visited once even though edges are discovered from both sides.
        let mut requested = ancestor_chain();
        requested.replies = vec![ThreadNode::Post(Box::new(leaf("child")))];

        let graph = thread_to_subgraph(&requested);
        let mut ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["child", "leaf", "mid", "root"]);
    }

    #[test]
    fn test_subgraph_ignores_unresolved_markers() {
        let mut thread = leaf("root");
        thread.parent = Some(ThreadNode::NotFound {
            uri: "at://gone".into(),
        });
        thread.replies = vec![ThreadNode::Blocked {
            uri: "at://blocked".into(),
        }];

        let graph = thread_to_subgraph(&thread);
        assert_eq!(graph.len(), 1);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_snapshot_posts_and_graph_agree() {
        let mut requested = ancestor_chain();
        requested.replies = vec![ThreadNode::Post(Box::new(leaf("child")))];

        let posts = thread_to_post_list(&requested);
        let graph = thread_to_subgraph(&requested);
        for post in &posts {
            assert!(graph.contains_node(&post.cid), "missing {}", post.cid);
        }
    }
}
