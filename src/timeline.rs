//! Timeline assembly from paginated loads.
//!
//! A timeline is loaded in segments: "load more" appends a page below the
//! existing ones (continuing from the last cursor), and "refresh" prepends
//! a fresh page above them. Posts already present in an older segment are
//! dropped when a new segment merges in, so reposts and pagination overlap
//! never render twice.
//!
//! Ranking is a delegation seam: [`FeedRanker`] reorders a segment's posts
//! before it is merged. The only in-crate ranker is [`Chronological`];
//! embedding/AI scorers are external collaborators behind the same trait.

use crate::api::types::{FeedViewPost, PostId};
use std::collections::HashSet;
use tracing::debug;

/// Reorders a batch of posts before display.
pub trait FeedRanker {
    /// Returns the posts in display order.
    fn rank(&self, posts: Vec<FeedViewPost>) -> Vec<FeedViewPost>;
}

/// Keeps the service's chronological order unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chronological;

impl FeedRanker for Chronological {
    fn rank(&self, posts: Vec<FeedViewPost>) -> Vec<FeedViewPost> {
        posts
    }
}

/// One loaded page of the timeline.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Monotonic load sequence, used to identify the segment.
    pub load_seq: u64,
    /// Posts in this segment, already ranked and deduplicated.
    pub posts: Vec<FeedViewPost>,
    /// Cursor for loading the page after this one.
    pub cursor: Option<String>,
}

/// Ordered segments forming the displayed timeline.
#[derive(Debug, Default)]
pub struct TimelineLog {
    segments: Vec<Segment>,
    next_seq: u64,
}

impl TimelineLog {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all loaded segments.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Returns true if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.posts.is_empty())
    }

    /// Cursor to continue loading downward: the last segment's.
    pub fn cursor(&self) -> Option<&str> {
        self.segments.last().and_then(|s| s.cursor.as_deref())
    }

    /// All posts in display order.
    pub fn posts(&self) -> impl Iterator<Item = &FeedViewPost> {
        self.segments.iter().flat_map(|s| s.posts.iter())
    }

    /// Number of posts across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.posts.len()).sum()
    }

    fn seen_cids(&self) -> HashSet<PostId> {
        self.posts().map(|p| p.post.cid.clone()).collect()
    }

    fn merge(&mut self, posts: Vec<FeedViewPost>, cursor: Option<String>, prepend: bool) {
        let seen = self.seen_cids();
        let before = posts.len();
        let deduped: Vec<FeedViewPost> = posts
            .into_iter()
            .filter(|p| !seen.contains(&p.post.cid))
            .collect();
        debug!(
            kept = deduped.len(),
            dropped = before - deduped.len(),
            prepend,
            "timeline segment merged"
        );

        self.next_seq += 1;
        let segment = Segment {
            load_seq: self.next_seq,
            posts: deduped,
            cursor,
        };
        if prepend {
            self.segments.insert(0, segment);
        } else {
            self.segments.push(segment);
        }
    }

    /// Appends a page loaded below the existing segments ("load more").
    pub fn extend_down(&mut self, posts: Vec<FeedViewPost>, cursor: Option<String>) {
        self.merge(posts, cursor, false);
    }

    /// Prepends a freshly loaded page above the existing segments
    /// ("refresh"). Its cursor is kept with the segment but downward
    /// continuation still follows the last segment's cursor.
    pub fn refresh_up(&mut self, posts: Vec<FeedViewPost>, cursor: Option<String>) {
        self.merge(posts, cursor, true);
    }
}
