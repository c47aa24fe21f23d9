//! View-layer state: the current graph, post list, and focus.
//!
//! [`FeedView`] owns what a renderer displays: the full personal graph
//! built from the author feed, plus an optional thread snapshot that
//! replaces it while a post is focused. Focus requests are asynchronous
//! (they trigger a thread fetch), so each request takes a monotonically
//! increasing ticket; only the highest ticket seen may commit its result.
//! A stale response resolving after a newer request is discarded instead
//! of overwriting the newer thread, and a failed expansion never clears
//! the previously displayed state.

use crate::api::types::{FeedViewPost, PostId, PostView};
use crate::graph::types::{Graph, Node};
use crate::graph::{feed_to_graph, ThreadSnapshot};
use std::collections::HashMap;
use tracing::{debug, info};

/// Display state for a feed and its reply graph.
#[derive(Debug, Default)]
pub struct FeedView {
    /// Every entry fetched for the actor, in feed order.
    all_posts: Vec<FeedViewPost>,
    /// Graph over `all_posts`.
    personal_graph: Graph,
    /// CID to node-position lookup for the personal graph.
    node_index: HashMap<PostId, usize>,
    /// The focused post and its thread snapshot, when present.
    focused: Option<(PostId, ThreadSnapshot)>,
    /// Highest focus ticket handed out.
    last_issued: u64,
    /// Ticket of the most recently committed focus.
    last_committed: u64,
}

impl FeedView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feed, rebuilding the personal graph and node index.
    /// Any focused thread is cleared; it belonged to the old feed.
    pub fn refresh(&mut self, entries: Vec<FeedViewPost>) {
        self.personal_graph = feed_to_graph(&entries);
        self.node_index = self.personal_graph.node_index();
        self.all_posts = entries;
        self.focused = None;
        info!(
            posts = self.all_posts.len(),
            nodes = self.personal_graph.len(),
            links = self.personal_graph.links.len(),
            "feed view refreshed"
        );
    }

    /// Resolves a focus target: the node for `id`, if the personal graph
    /// has one with a fetched post behind it. Stub nodes have no URI to
    /// expand, so focusing one resolves to nothing.
    pub fn resolve_focus(&self, id: &PostId) -> Option<&Node> {
        self.node_index
            .get(id)
            .map(|&pos| &self.personal_graph.nodes[pos])
            .filter(|node| !node.is_stub())
    }

    /// Begins a focus request, returning the ticket the eventual
    /// [`FeedView::commit_focus`] must present.
    pub fn begin_focus(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Commits a resolved thread snapshot for `id`.
    ///
    /// Returns true if the commit was applied. A ticket older than one
    /// already committed (or already superseded by a newer issue that
    /// committed first) is rejected, so whichever request the user made
    /// last wins regardless of response order.
    pub fn commit_focus(&mut self, ticket: u64, id: PostId, snapshot: ThreadSnapshot) -> bool {
        if ticket <= self.last_committed {
            debug!(ticket, last_committed = self.last_committed, "stale focus result discarded");
            return false;
        }
        self.last_committed = ticket;
        self.focused = Some((id, snapshot));
        true
    }

    /// Clears any focused thread, reverting to the full personal graph.
    pub fn clear_focus(&mut self) {
        // Tickets still in flight are invalidated by advancing the
        // committed watermark past everything issued so far.
        self.last_committed = self.last_issued;
        self.focused = None;
    }

    /// Returns the focused post id, if any.
    pub fn focused_post_id(&self) -> Option<&PostId> {
        self.focused.as_ref().map(|(id, _)| id)
    }

    /// Returns the graph to display: the focused thread's subgraph when a
    /// focus is committed, else the full personal graph.
    pub fn display_graph(&self) -> &Graph {
        match &self.focused {
            Some((_, snapshot)) => &snapshot.graph,
            None => &self.personal_graph,
        }
    }

    /// Returns the posts to display alongside the graph.
    pub fn display_posts(&self) -> Vec<&PostView> {
        match &self.focused {
            Some((_, snapshot)) => snapshot.posts.iter().collect(),
            None => self.all_posts.iter().map(|entry| &entry.post).collect(),
        }
    }

    /// The full personal graph, regardless of focus.
    pub fn personal_graph(&self) -> &Graph {
        &self.personal_graph
    }

    /// The full feed, regardless of focus.
    pub fn all_posts(&self) -> &[FeedViewPost] {
        &self.all_posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ActorId, Profile, ReplyRef};

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

    fn feed() -> Vec<FeedViewPost> {
        let p1 = post("p1", "did:plc:alice");
        vec![
            FeedViewPost::from_post(p1.clone()),
            FeedViewPost {
                post: post("p2", "did:plc:bob"),
                reply: Some(ReplyRef {
                    parent: p1.clone(),
                    root: p1,
                }),
                reason: None,
            },
        ]
    }

    fn snapshot_of(cid: &str) -> ThreadSnapshot {
        let p = post(cid, "did:plc:alice");
        let mut graph = Graph::new();
        graph.push_node(Node::from_post(p.clone()));
        ThreadSnapshot {
            posts: vec![p],
            graph,
        }
    }

    #[test]
    fn test_refresh_builds_graph_and_index() {
        let mut view = FeedView::new();
        view.refresh(feed());

        assert_eq!(view.personal_graph().len(), 2);
        assert_eq!(view.personal_graph().links.len(), 1);
        assert!(view.resolve_focus(&PostId::new("p1")).is_some());
        assert!(view.resolve_focus(&PostId::new("missing")).is_none());
        assert_eq!(view.display_posts().len(), 2);
    }

    #[test]
    fn test_commit_focus_swaps_display() {
        let mut view = FeedView::new();
        view.refresh(feed());

        let ticket = view.begin_focus();
        assert!(view.commit_focus(ticket, PostId::new("p1"), snapshot_of("p1")));

        assert_eq!(view.focused_post_id(), Some(&PostId::new("p1")));
        assert_eq!(view.display_graph().len(), 1);
        assert_eq!(view.display_posts().len(), 1);

        view.clear_focus();
        assert!(view.focused_post_id().is_none());
        assert_eq!(view.display_graph().len(), 2);
    }

    #[test]
    fn test_stale_focus_result_is_discarded() {
        let mut view = FeedView::new();
        view.refresh(feed());

        let first = view.begin_focus();
        let second = view.begin_focus();

        // The newer request resolves first and commits.
        assert!(view.commit_focus(second, PostId::new("p2"), snapshot_of("p2")));
        // The older one resolves later and must not overwrite it.
        assert!(!view.commit_focus(first, PostId::new("p1"), snapshot_of("p1")));
        assert_eq!(view.focused_post_id(), Some(&PostId::new("p2")));
    }

    #[test]
    fn test_in_order_commits_both_apply() {
        let mut view = FeedView::new();
        view.refresh(feed());

        let first = view.begin_focus();
        assert!(view.commit_focus(first, PostId::new("p1"), snapshot_of("p1")));
        let second = view.begin_focus();
        assert!(view.commit_focus(second, PostId::new("p2"), snapshot_of("p2")));
        assert_eq!(view.focused_post_id(), Some(&PostId::new("p2")));
    }

    #[test]
    fn test_clear_focus_invalidates_inflight_tickets() {
        let mut view = FeedView::new();
        view.refresh(feed());

        let inflight = view.begin_focus();
        view.clear_focus();
        // The user unfocused before the fetch resolved; its result is stale.
        assert!(!view.commit_focus(inflight, PostId::new("p1"), snapshot_of("p1")));
        assert!(view.focused_post_id().is_none());
    }

    #[test]
    fn test_failed_focus_leaves_previous_display() {
        let mut view = FeedView::new();
        view.refresh(feed());

        let ticket = view.begin_focus();
        assert!(view.commit_focus(ticket, PostId::new("p1"), snapshot_of("p1")));

        // A later request fails before commit; the caller simply never
        // commits, and the earlier display survives.
        let _failed = view.begin_focus();
        assert_eq!(view.focused_post_id(), Some(&PostId::new("p1")));
        assert_eq!(view.display_graph().len(), 1);
    }

    #[test]
    fn test_refresh_clears_focus() {
        let mut view = FeedView::new();
        view.refresh(feed());
        let ticket = view.begin_focus();
        view.commit_focus(ticket, PostId::new("p1"), snapshot_of("p1"));

        view.refresh(feed());
        assert!(view.focused_post_id().is_none());
    }
}
