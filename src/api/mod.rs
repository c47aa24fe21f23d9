//! AT Protocol client surface.
//!
//! [`types`] holds the lexicon subset, [`session`] the authentication
//! state, and [`client`] the reqwest-backed XRPC implementation. The
//! [`FeedSource`] and [`ThreadSource`] traits are the capability seams the
//! graph builders consume, so tests and alternative transports can stand in
//! for the live service.

pub mod client;
pub mod session;
pub mod types;

use crate::error::Result;
use tracing::error;
use types::{FeedPage, FeedViewPost, ThreadNode};

pub use client::XrpcClient;
pub use session::Session;

/// Capability to fetch pages of an author's feed.
pub trait FeedSource {
    /// Fetches one page of the actor's feed, continuing from `cursor` when
    /// present.
    fn author_feed(
        &self,
        actor: &str,
        cursor: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FeedPage>> + Send;
}

/// Capability to fetch the full thread containing a post.
pub trait ThreadSource {
    /// Fetches the thread view for `uri`, descending up to `depth` reply
    /// levels. Fails with a thread-not-found error when the root cannot be
    /// located.
    fn post_thread(
        &self,
        uri: &str,
        depth: u16,
    ) -> impl std::future::Future<Output = Result<ThreadNode>> + Send;
}

/// Fetches every page of an actor's feed, concatenating pages in call order
/// until the source stops returning a cursor.
///
/// There is no cap on total pages, so an unbounded feed implies unbounded
/// latency and memory; the source terminating the cursor is the only bound.
/// If any page fails, the accumulated pages are discarded and an empty feed
/// is returned rather than a partial one, so an incomplete graph is never
/// presented as complete.
pub async fn fetch_all_posts<S: FeedSource>(source: &S, actor: &str) -> Vec<FeedViewPost> {
    let mut posts = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = match source.author_feed(actor, cursor.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                error!(actor, error = %e, "feed pagination failed, discarding partial feed");
                return Vec::new();
            }
        };
        posts.extend(page.feed);
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkygraphError;
    use std::sync::Mutex;
    use types::{ActorId, PostId, PostView, Profile};

    fn post(cid: &str) -> FeedViewPost {
        FeedViewPost::from_post(PostView {
            uri: format!("at://did:plc:a/app.bsky.feed.post/{}", cid),
            cid: PostId::new(cid),
            author: Profile {
                did: ActorId::new("did:plc:a"),
                handle: "a.test".into(),
                display_name: None,
                avatar: None,
            },
            record: serde_json::json!({ "text": cid }),
            reply_count: 0,
            repost_count: 0,
            like_count: 0,
            indexed_at: String::new(),
        })
    }

    /// Feed source serving scripted pages, failing where a page is `None`.
    struct ScriptedFeed {
        pages: Mutex<Vec<Option<FeedPage>>>,
    }

    impl ScriptedFeed {
        fn new(pages: Vec<Option<FeedPage>>) -> Self {
            Self {
                pages: Mutex::new(pages),
            }
        }
    }

    impl FeedSource for ScriptedFeed {
        async fn author_feed(&self, _actor: &str, _cursor: Option<&str>) -> Result<FeedPage> {
            let mut pages = self.pages.lock().unwrap();
            match pages.remove(0) {
                Some(page) => Ok(page),
                None => Err(SkygraphError::fetch_failed("scripted failure")),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_all_posts_follows_cursor() {
        let source = ScriptedFeed::new(vec![
            Some(FeedPage {
                feed: vec![post("p1"), post("p2")],
                cursor: Some("c1".into()),
            }),
            Some(FeedPage {
                feed: vec![post("p3")],
                cursor: None,
            }),
        ]);

        let posts = fetch_all_posts(&source, "a.test").await;
        let cids: Vec<&str> = posts.iter().map(|p| p.post.cid.as_str()).collect();
        assert_eq!(cids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_fetch_all_posts_discards_partial_feed_on_failure() {
        let source = ScriptedFeed::new(vec![
            Some(FeedPage {
                feed: vec![post("p1")],
                cursor: Some("c1".into()),
            }),
            None,
        ]);

        let posts = fetch_all_posts(&source, "a.test").await;
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_posts_single_page() {
        let source = ScriptedFeed::new(vec![Some(FeedPage {
            feed: vec![post("p1")],
            cursor: None,
        })]);

        let posts = fetch_all_posts(&source, "a.test").await;
        assert_eq!(posts.len(), 1);
    }
}
