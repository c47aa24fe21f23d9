//! AT Protocol lexicon types used by the client.
//!
//! This is the subset of `app.bsky.feed.*` and `app.bsky.actor.*` that the
//! graph builder consumes: author feed entries, reply references, repost
//! attributions, and the recursive thread view returned by
//! `app.bsky.feed.getPostThread`.
//!
//! All types deserialize from the lexicon's camelCase JSON. Thread nodes are
//! polymorphic on the wire (`$type` discriminator) and are modeled here as a
//! tagged enum so traversal code cannot dereference a not-found marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-addressed identifier of a post (its CID).
///
/// Unique per post and stable across fetches. This is the primary key for
/// every graph map in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    /// Creates a post ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Decentralized identifier of an account (a DID).
///
/// Used only as a grouping attribute on graph nodes, never as a join key
/// for edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    /// Creates an actor ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Basic profile view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The account's DID.
    pub did: ActorId,
    /// The account's handle (e.g. `alice.bsky.social`).
    pub handle: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A hydrated view of a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// The post's AT URI (`at://did/app.bsky.feed.post/rkey`).
    pub uri: String,
    /// The post's CID.
    pub cid: PostId,
    /// The post's author.
    pub author: Profile,
    /// The raw post record; `record.text` carries the post text.
    pub record: serde_json::Value,
    /// Number of direct replies.
    #[serde(default)]
    pub reply_count: u64,
    /// Number of reposts.
    #[serde(default)]
    pub repost_count: u64,
    /// Number of likes.
    #[serde(default)]
    pub like_count: u64,
    /// When the post was indexed by the service.
    #[serde(default)]
    pub indexed_at: String,
}

impl PostView {
    /// Returns the post text from the record, if present.
    pub fn text(&self) -> Option<&str> {
        self.record.get("text").and_then(|v| v.as_str())
    }
}

/// Back-references carried by a post that is itself a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRef {
    /// The post being directly replied to.
    pub parent: PostView,
    /// The root of the conversation. Never used to create edges.
    pub root: PostView,
}

/// Repost attribution on a feed entry.
///
/// Indicates visibility, not conversational structure: reposts never
/// contribute edges to the reply graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRepost {
    /// The account that reposted.
    pub by: Profile,
    /// When the repost was indexed.
    #[serde(default)]
    pub indexed_at: String,
}

/// One item from a paginated author feed or timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedViewPost {
    /// The post itself.
    pub post: PostView,
    /// Present when the post is a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,
    /// Present when the entry represents a repost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonRepost>,
}

impl FeedViewPost {
    /// Wraps a bare post as a feed entry.
    pub fn from_post(post: PostView) -> Self {
        Self {
            post,
            reply: None,
            reason: None,
        }
    }

    /// Returns true if this entry represents a repost rather than an
    /// original post.
    pub fn is_repost(&self) -> bool {
        self.reason.is_some()
    }
}

/// One page of a paginated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    /// Entries in this page, newest first.
    pub feed: Vec<FeedViewPost>,
    /// Continuation token; absent on the final page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A node in the recursive thread view.
///
/// The service marks unresolvable or blocked posts inline rather than
/// omitting them; modeling the marker as an enum variant keeps traversals
/// from treating one as a real post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ThreadNode {
    /// A resolved post with its parent chain and nested replies.
    #[serde(rename = "app.bsky.feed.defs#threadViewPost")]
    Post(Box<ThreadViewPost>),
    /// The referenced post could not be found.
    #[serde(rename = "app.bsky.feed.defs#notFoundPost")]
    NotFound {
        /// URI of the missing post.
        uri: String,
    },
    /// The referenced post is blocked from the viewer.
    #[serde(rename = "app.bsky.feed.defs#blockedPost")]
    Blocked {
        /// URI of the blocked post.
        uri: String,
    },
}

impl ThreadNode {
    /// Returns the inner thread view if this node is a resolved post.
    pub fn as_post(&self) -> Option<&ThreadViewPost> {
        match self {
            ThreadNode::Post(view) => Some(view),
            _ => None,
        }
    }

    /// Returns true if this node is a resolved post.
    pub fn is_post(&self) -> bool {
        matches!(self, ThreadNode::Post(_))
    }
}

/// A post within a thread, with its ancestor link and nested replies.
///
/// The data source decides whether the returned tree is rooted at the
/// absolute conversation root or at the requested post; consumers walk
/// `parent` links upward regardless of starting depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadViewPost {
    /// The post at this position in the thread.
    pub post: PostView,
    /// The post this one replies to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ThreadNode>,
    /// Direct replies, in the order supplied by the data source.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ThreadNode>,
}

impl ThreadViewPost {
    /// Creates a leaf thread view around a single post.
    pub fn leaf(post: PostView) -> Self {
        Self {
            post,
            parent: None,
            replies: Vec::new(),
        }
    }

    /// Returns the replies that resolved to real posts, in source order.
    pub fn resolved_replies(&self) -> impl Iterator<Item = &ThreadViewPost> {
        self.replies.iter().filter_map(ThreadNode::as_post)
    }
}

impl Drop for ThreadViewPost {
    /// Drains the nested parent/reply boxes with an explicit stack.
    ///
    /// The derived drop glue recurses once per nesting level, so a
    /// sufficiently deep ancestor or reply chain would exhaust the thread
    /// stack when the value is dropped. Detaching every child before it is
    /// freed keeps each individual drop a leaf.
    fn drop(&mut self) {
        let mut stack: Vec<ThreadNode> = Vec::new();
        if let Some(parent) = self.parent.take() {
            stack.push(parent);
        }
        stack.append(&mut self.replies);

        while let Some(node) = stack.pop() {
            if let ThreadNode::Post(mut view) = node {
                if let Some(parent) = view.parent.take() {
                    stack.push(parent);
                }
                stack.append(&mut view.replies);
            }
        }
    }
}
