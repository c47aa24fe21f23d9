//! Reply-graph data model.
//!
//! A [`Graph`] is the node/edge representation handed to the rendering layer:
//! nodes are posts (colored by author), directed edges mean "source replies
//! to target", and both adjacency maps are kept as exact transposes of each
//! other so consumers can walk the conversation in either direction.
//!
//! Graphs are built fresh per call by the feed and thread builders and are
//! owned exclusively by the caller that requested them.

use crate::api::types::{ActorId, PostId, PostView};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the reply graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The post's CID.
    pub id: PostId,
    /// The author's DID, used for grouping/coloring.
    pub group: ActorId,
    /// The full post view. `None` marks a stub node: a post referenced as a
    /// reply parent but never independently fetched. Stubs carry no
    /// renderable content but are valid, permanent graph participants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostView>,
}

impl Node {
    /// Creates a node from a fetched post.
    pub fn from_post(post: PostView) -> Self {
        Self {
            id: post.cid.clone(),
            group: post.author.did.clone(),
            post: Some(post),
        }
    }

    /// Creates a stub node for a post that was only ever referenced.
    pub fn stub(id: PostId, group: ActorId) -> Self {
        Self {
            id,
            group,
            post: None,
        }
    }

    /// Returns true if this node has no fetched post behind it.
    pub fn is_stub(&self) -> bool {
        self.post.is_none()
    }
}

/// A directed reply edge: `source` replies to `target`.
///
/// At most one edge exists per ordered pair because each post has at most
/// one reply parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The replying post.
    pub source: PostId,
    /// The post being replied to.
    pub target: PostId,
}

impl Edge {
    /// Creates an edge from `source` to `target`.
    pub fn new(source: PostId, target: PostId) -> Self {
        Self { source, target }
    }
}

/// A reply graph with adjacency indices.
///
/// Invariants:
/// - `adjacency[a]` contains `b` iff an edge `{source: a, target: b}` exists,
///   and `reverse_adjacency` is the exact transpose.
/// - Every `PostId` appearing in an edge or adjacency entry has a
///   corresponding node (possibly a stub).
/// - Node order is insertion order, which keeps rendering deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in insertion order.
    pub nodes: Vec<Node>,
    /// Edges in insertion order.
    pub links: Vec<Edge>,
    /// Outgoing adjacency: source id to the targets it replies to.
    pub adjacency: HashMap<PostId, Vec<PostId>>,
    /// Incoming adjacency: target id to the sources replying to it.
    pub reverse_adjacency: HashMap<PostId, Vec<PostId>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if a node with the given id exists.
    pub fn contains_node(&self, id: &PostId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    /// Appends a node without any duplicate check. Builders that need
    /// first-occurrence-wins semantics track seen ids themselves.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends an edge and updates both adjacency maps symmetrically.
    ///
    /// Callers must ensure both endpoints have nodes (pushing a stub first
    /// if needed) to preserve the graph invariant.
    pub fn push_edge(&mut self, source: PostId, target: PostId) {
        self.adjacency
            .entry(source.clone())
            .or_default()
            .push(target.clone());
        self.reverse_adjacency
            .entry(target.clone())
            .or_default()
            .push(source.clone());
        self.links.push(Edge::new(source, target));
    }

    /// Builds a `PostId -> node position` lookup for O(1) focus resolution.
    ///
    /// This index is a consumer-side convenience rebuilt per graph; on
    /// duplicate ids (which builders prevent) the first occurrence wins.
    pub fn node_index(&self) -> HashMap<PostId, usize> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (pos, node) in self.nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(pos);
        }
        index
    }

    /// Looks up a node by id via linear scan. Use [`Graph::node_index`] when
    /// resolving many lookups against the same graph.
    pub fn node(&self, id: &PostId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns the ids this post replies to (usually zero or one).
    pub fn replies_to(&self, id: &PostId) -> &[PostId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the ids of posts replying to this one.
    pub fn replied_by(&self, id: &PostId) -> &[PostId] {
        self.reverse_adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Counts stub nodes.
    pub fn stub_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_stub()).count()
    }
}
