//! Stateless request builder and response parser for the content endpoint.
//!
//! # Design
//! `ContentClient` holds the endpoint and the startup credentials and nothing
//! else. `build_*` methods resolve the credential for the requested mode and
//! produce an `HttpRequest`; `parse_response` classifies an `HttpResponse`.
//! A configuration error therefore surfaces before a request value exists,
//! let alone a network call.

use crate::config::Credentials;
use crate::error::ContentError;
use crate::http::{CachePolicy, HttpRequest, HttpResponse, POSTS_CACHE_TAG};
use crate::query::{self, QueryDocument};
use crate::types::ParsedResponse;

/// Longest body excerpt carried by [`ContentError::Http`].
pub const HTTP_ERROR_SNIPPET: usize = 200;
/// Longest body excerpt carried by [`ContentError::MalformedResponse`].
pub const MALFORMED_SNIPPET: usize = 500;

#[derive(Debug, Clone)]
pub struct ContentClient {
    endpoint: String,
    credentials: Credentials,
}

impl ContentClient {
    pub fn new(endpoint: &str, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the POST request carrying `query` in `preview` or published mode.
    pub fn build_query(&self, query: &QueryDocument, preview: bool) -> Result<HttpRequest, ContentError> {
        let (space_id, token) = self.credentials.resolve(preview)?;
        let body = serde_json::json!({ "query": query.as_str() }).to_string();
        let cache = if preview {
            CachePolicy::NoStore
        } else {
            CachePolicy::Tagged(vec![POSTS_CACHE_TAG.to_string()])
        };
        Ok(HttpRequest {
            url: format!("{}/content/v1/spaces/{space_id}", self.endpoint),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {token}")),
            ],
            body,
            cache,
        })
    }

    pub fn build_preview_post_by_slug(&self, slug: &str) -> Result<HttpRequest, ContentError> {
        self.build_query(&query::preview_post_by_slug(slug), true)
    }

    pub fn build_all_posts(&self, preview: bool) -> Result<HttpRequest, ContentError> {
        self.build_query(&query::all_posts(preview), preview)
    }

    pub fn build_post_by_slug(&self, slug: &str, preview: bool) -> Result<HttpRequest, ContentError> {
        self.build_query(&query::post_by_slug(slug, preview), preview)
    }

    pub fn build_more_posts(&self, slug: &str, preview: bool) -> Result<HttpRequest, ContentError> {
        self.build_query(&query::more_posts(slug, preview), preview)
    }

    /// Classify a response: status first, then JSON. The parsed value is
    /// returned as-is; shape checks belong to the extractor.
    pub fn parse_response(&self, response: HttpResponse) -> Result<ParsedResponse, ContentError> {
        if !response.is_success() {
            return Err(ContentError::Http {
                status: response.status,
                status_text: response.status_text,
                body: truncate(&response.body, HTTP_ERROR_SNIPPET),
            });
        }
        serde_json::from_str(&response.body)
            .map(ParsedResponse::new)
            .map_err(|_| ContentError::MalformedResponse {
                snippet: truncate(&response.body, MALFORMED_SNIPPET),
            })
    }
}

/// First `max` characters of `text`, never splitting a code point.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
