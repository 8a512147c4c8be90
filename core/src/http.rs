//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ContentClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; whoever owns the network
//! (a `Transport`, a test harness, an embedding framework) runs the round
//! trip in between.

/// Cache partition tag attached to every published request.
pub const POSTS_CACHE_TAG: &str = "posts";

/// How the embedding framework may cache the result of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    /// Cacheable; purge by any of these tags when content changes.
    Tagged(Vec<String>),
    /// Always live. Used for preview requests, which must reflect drafts.
    NoStore,
}

impl CachePolicy {
    /// Tags the embedding framework should register, empty for `NoStore`.
    pub fn tags(&self) -> &[String] {
        match self {
            CachePolicy::Tagged(tags) => tags,
            CachePolicy::NoStore => &[],
        }
    }
}

/// A POST request to the content endpoint, described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub cache: CachePolicy,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data. `body` is the full text,
/// whatever its content type.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
