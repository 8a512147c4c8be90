//! Error types for the content client.
//!
//! # Design
//! Every variant here is fatal to the calling operation. Shape mismatches in
//! an otherwise valid response are not errors at all: the extractor logs them
//! and degrades to an empty result.

use thiserror::Error;

/// Errors returned while building, sending, or parsing a content query.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A required setting is absent or empty. Raised before any request exists.
    #[error("missing {setting} environment variable")]
    MissingConfig { setting: &'static str },

    /// The backend answered with a non-2xx status. `body` holds at most the
    /// first 200 characters of the response.
    #[error("content query failed: {status} {status_text} - {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A 2xx body that is not JSON. `snippet` holds at most the first 500
    /// characters.
    #[error("failed to parse JSON response from content endpoint, response start: {snippet}")]
    MalformedResponse { snippet: String },

    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("network error: {0}")]
    Network(String),
}
