//! Reqwest-backed XRPC client for the Bluesky service.
//!
//! Implements the handful of lexicon methods the graph builders need:
//! session creation/refresh, author feeds, the home timeline, and post
//! threads. Query-style methods are HTTP GETs against
//! `<service>/xrpc/<nsid>`; procedures are POSTs. Error bodies follow the
//! XRPC convention `{ "error": ..., "message": ... }`.

use crate::api::session::Session;
use crate::api::types::{FeedPage, ThreadNode};
use crate::api::{FeedSource, ThreadSource};
use crate::error::{Result, SkygraphError};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Default service endpoint.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// Feed page size cap imposed by the service.
pub const MAX_FEED_PAGE_LIMIT: u16 = 100;

/// XRPC error body.
#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl XrpcErrorBody {
    fn describe(&self) -> String {
        match (&self.error, &self.message) {
            (Some(e), Some(m)) => format!("{}: {}", e, m),
            (Some(e), None) => e.clone(),
            (None, Some(m)) => m.clone(),
            (None, None) => "unknown XRPC error".to_string(),
        }
    }
}

/// Client for a Bluesky PDS, holding the HTTP client and session state.
#[derive(Debug)]
pub struct XrpcClient {
    client: reqwest::Client,
    service: String,
    session: Option<Session>,
}

impl XrpcClient {
    /// Creates a client against the default service.
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Creates a client against a custom service URL.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            service: service.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    /// Returns the current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Resumes a previously created session.
    pub fn resume_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    fn xrpc_url(&self, nsid: &str) -> String {
        format!("{}/xrpc/{}", self.service, nsid)
    }

    fn bearer(&self) -> Result<&str> {
        self.session
            .as_ref()
            .map(|s| s.access_jwt.as_str())
            .ok_or_else(|| SkygraphError::session("not logged in"))
    }

    /// Maps a non-success response to a crate error, reading the XRPC error
    /// body when one is present.
    async fn into_error(response: reqwest::Response) -> SkygraphError {
        let status = response.status();
        let detail = match response.json::<XrpcErrorBody>().await {
            Ok(body) => body.describe(),
            Err(_) => status.to_string(),
        };
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            SkygraphError::auth(detail)
        } else {
            SkygraphError::fetch_failed(detail)
        }
    }

    /// Performs an authenticated GET query, deserializing the response.
    async fn query<T: for<'de> Deserialize<'de>>(
        &self,
        nsid: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.xrpc_url(nsid))
            .bearer_auth(self.bearer()?)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::into_error(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| SkygraphError::serialization(format!("invalid {} response: {}", nsid, e)))
    }

    /// Logs in with an identifier (handle or DID) and app password.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<&Session> {
        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::into_error(response).await;
            warn!(identifier, error = %err, "login failed");
            return Err(err);
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| SkygraphError::serialization(format!("invalid session response: {}", e)))?;
        info!(handle = %session.handle, did = %session.did, "session created");
        Ok(self.session.insert(session))
    }

    /// Exchanges the refresh token for a new session.
    #[instrument(skip(self))]
    pub async fn refresh_session(&mut self) -> Result<&Session> {
        let refresh_jwt = self
            .session
            .as_ref()
            .map(|s| s.refresh_jwt.clone())
            .ok_or_else(|| SkygraphError::session("no session to refresh"))?;

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.refreshSession"))
            .bearer_auth(refresh_jwt)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::into_error(response).await);
        }
        let session: Session = response
            .json()
            .await
            .map_err(|e| SkygraphError::serialization(format!("invalid session response: {}", e)))?;
        info!(handle = %session.handle, "session refreshed");
        Ok(self.session.insert(session))
    }

    /// Fetches one page of the home timeline.
    #[instrument(skip(self))]
    pub async fn get_timeline(&self, limit: u16, cursor: Option<&str>) -> Result<FeedPage> {
        let mut params = vec![("limit", limit.min(MAX_FEED_PAGE_LIMIT).to_string())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        self.query("app.bsky.feed.getTimeline", &params).await
    }
}

impl Default for XrpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for XrpcClient {
    async fn author_feed(&self, actor: &str, cursor: Option<&str>) -> Result<FeedPage> {
        let mut params = vec![
            ("actor", actor.to_string()),
            ("limit", MAX_FEED_PAGE_LIMIT.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        self.query("app.bsky.feed.getAuthorFeed", &params).await
    }
}

/// Response wrapper for `app.bsky.feed.getPostThread`.
#[derive(Debug, Deserialize)]
struct ThreadResponse {
    thread: ThreadNode,
}

impl ThreadSource for XrpcClient {
    async fn post_thread(&self, uri: &str, depth: u16) -> Result<ThreadNode> {
        let params = vec![("uri", uri.to_string()), ("depth", depth.to_string())];
        let response: ThreadResponse = self.query("app.bsky.feed.getPostThread", &params).await?;
        Ok(response.thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xrpc_url_construction() {
        let client = XrpcClient::with_service("https://pds.example.com/");
        assert_eq!(
            client.xrpc_url("app.bsky.feed.getAuthorFeed"),
            "https://pds.example.com/xrpc/app.bsky.feed.getAuthorFeed"
        );
    }

    #[test]
    fn test_bearer_requires_session() {
        let client = XrpcClient::new();
        assert!(client.bearer().is_err());

        let mut client = XrpcClient::new();
        client.resume_session(Session {
            access_jwt: "token".into(),
            refresh_jwt: "refresh".into(),
            did: "did:plc:x".into(),
            handle: "x.test".into(),
        });
        assert_eq!(client.bearer().unwrap(), "token");
    }

    #[test]
    fn test_error_body_description() {
        let body: XrpcErrorBody = serde_json::from_value(serde_json::json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        }))
        .unwrap();
        assert_eq!(
            body.describe(),
            "AuthenticationRequired: Invalid identifier or password"
        );

        let sparse: XrpcErrorBody = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(sparse.describe(), "unknown XRPC error");
    }

    #[test]
    fn test_thread_response_deserialization() {
        let response: ThreadResponse = serde_json::from_value(serde_json::json!({
            "thread": {
                "$type": "app.bsky.feed.defs#notFoundPost",
                "uri": "at://did:plc:x/app.bsky.feed.post/gone"
            }
        }))
        .unwrap();
        assert!(!response.thread.is_post());
    }
}
