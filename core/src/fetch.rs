//! Async execution of content queries.
//!
//! # Design
//! `Transport` is the only seam that touches the network. `ContentApi`
//! composes build, execute, parse, and extract for the three page-facing
//! operations. There is exactly one round trip per query: no retries and no
//! timeout beyond what the transport itself enforces.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::ContentClient;
use crate::error::ContentError;
use crate::extract::{extract_post, extract_posts};
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{self, QueryDocument};
use crate::types::{ParsedResponse, Post, PostAndMorePosts};

/// Executes one `HttpRequest`. Non-2xx statuses are returned as data, not as
/// errors; only a missing response is an `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ContentError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ContentError> {
        (**self).execute(request).await
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ContentError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// The blog's read-only content API.
#[derive(Debug, Clone)]
pub struct ContentApi<T> {
    client: ContentClient,
    transport: T,
}

impl ContentApi<ReqwestTransport> {
    /// Convenience constructor using a default `reqwest` client.
    pub fn with_reqwest(client: ContentClient) -> Self {
        Self::new(client, ReqwestTransport::new())
    }
}

impl<T: Transport> ContentApi<T> {
    pub fn new(client: ContentClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    /// Send `query` once in the given mode and return the parsed body.
    pub async fn fetch_query(&self, query: &QueryDocument, preview: bool) -> Result<ParsedResponse, ContentError> {
        let request = self.client.build_query(query, preview)?;
        debug!(url = %request.url, preview, tags = ?request.cache.tags(), "sending content query");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "content query answered");
        self.client.parse_response(response)
    }

    /// A single post by slug, including unpublished drafts.
    pub async fn get_preview_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let response = self.fetch_query(&query::preview_post_by_slug(slug), true).await?;
        Ok(extract_post(&response))
    }

    /// Every post with a slug, newest first.
    pub async fn get_all_posts(&self, preview: bool) -> Result<Vec<Post>, ContentError> {
        let response = self.fetch_query(&query::all_posts(preview), preview).await?;
        Ok(extract_posts(&response))
    }

    /// The post at `slug` plus up to two other posts, newest first. Both
    /// queries run concurrently; either failing fails the whole call.
    pub async fn get_post_and_more_posts(&self, slug: &str, preview: bool) -> Result<PostAndMorePosts, ContentError> {
        let post_query = query::post_by_slug(slug, preview);
        let more_query = query::more_posts(slug, preview);
        let (post, more) = tokio::try_join!(
            self.fetch_query(&post_query, preview),
            self.fetch_query(&more_query, preview),
        )?;
        Ok(PostAndMorePosts {
            post: extract_post(&post),
            more_posts: extract_posts(&more),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, PREVIEW_ACCESS_TOKEN_VAR, SPACE_ID_VAR};
    use crate::http::CachePolicy;
    use std::sync::Mutex;

    /// Answers every request with the same canned response and records what
    /// it was asked to send.
    struct FakeTransport {
        status: u16,
        body: String,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ContentError> {
            self.sent.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                status_text: String::new(),
                body: self.body.clone(),
            })
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ContentError> {
            Err(ContentError::Network("connection refused".to_string()))
        }
    }

    const TWO_POSTS: &str = r#"{"data":{"postCollection":{"items":[{"slug":"a","date":"2024-02-01"},{"slug":"b","date":"2024-01-01"}]}}}"#;

    fn client(credentials: Credentials) -> ContentClient {
        ContentClient::new("https://graphql.example.com", credentials)
    }

    fn full_client() -> ContentClient {
        client(Credentials::new("space1", "delivery", "preview"))
    }

    #[tokio::test]
    async fn get_all_posts_extracts_items() {
        let fake = FakeTransport::new(200, TWO_POSTS);
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        let posts = api.get_all_posts(false).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug.as_deref(), Some("a"));

        let sent = fake.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("slug_exists: true"));
        assert_eq!(sent[0].cache, CachePolicy::Tagged(vec!["posts".to_string()]));
    }

    #[tokio::test]
    async fn missing_config_never_reaches_transport() {
        let fake = FakeTransport::new(200, TWO_POSTS);
        let only_space = |name: &str| (name == SPACE_ID_VAR).then(|| "space1".to_string());
        let api = ContentApi::new(client(Credentials::from_lookup(only_space)), Arc::clone(&fake));

        let err = api.get_preview_post_by_slug("a").await.unwrap_err();
        assert!(matches!(err, ContentError::MissingConfig { setting: PREVIEW_ACCESS_TOKEN_VAR }));
        let err = api.get_post_and_more_posts("a", true).await.unwrap_err();
        assert!(matches!(err, ContentError::MissingConfig { .. }));
        assert!(fake.sent().is_empty());
    }

    #[tokio::test]
    async fn get_post_and_more_posts_sends_two_queries_in_same_mode() {
        let fake = FakeTransport::new(200, TWO_POSTS);
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        let result = api.get_post_and_more_posts("hello-world", true).await.unwrap();
        assert_eq!(result.post.unwrap().slug.as_deref(), Some("a"));
        assert_eq!(result.more_posts.len(), 2);

        let sent = fake.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|r| r.header("authorization") == Some("Bearer preview")));
        assert!(sent.iter().all(|r| r.cache == CachePolicy::NoStore));
        assert!(sent.iter().any(|r| r.body.contains(r#"slug: \"hello-world\""#)));
        assert!(sent.iter().any(|r| r.body.contains(r#"slug_not_in: [\"hello-world\"]"#)));
    }

    #[tokio::test]
    async fn preview_lookup_of_unknown_slug_is_none() {
        let fake = FakeTransport::new(200, r#"{"data":{"postCollection":{"items":[]}}}"#);
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        assert!(api.get_preview_post_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let fake = FakeTransport::new(500, "<html>down</html>");
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        let err = api.get_all_posts(false).await.unwrap_err();
        assert!(matches!(err, ContentError::Http { status: 500, .. }));
        assert_eq!(fake.sent().len(), 1, "no retry");
    }

    #[tokio::test]
    async fn unexpected_shape_degrades_to_empty() {
        let fake = FakeTransport::new(200, r#"{"data":{"somethingElse":{}}}"#);
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        assert!(api.get_all_posts(false).await.unwrap().is_empty());
        let result = api.get_post_and_more_posts("a", false).await.unwrap();
        assert_eq!(result, PostAndMorePosts::default());
    }

    #[tokio::test]
    async fn network_failure_is_reported() {
        let api = ContentApi::new(full_client(), Unreachable);
        let err = api.get_all_posts(true).await.unwrap_err();
        assert!(matches!(err, ContentError::Network(_)));
    }

    #[tokio::test]
    async fn repeated_queries_yield_identical_results() {
        let fake = FakeTransport::new(200, TWO_POSTS);
        let api = ContentApi::new(full_client(), Arc::clone(&fake));
        let first = api.get_all_posts(false).await.unwrap();
        let second = api.get_all_posts(false).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fake.sent()[0].body, fake.sent()[1].body);
    }
}
