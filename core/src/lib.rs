//! Read-only data access for the blog's headless content backend.
//!
//! # Overview
//! Builds query documents for the post collection, sends them to the
//! content endpoint with the right credential for published or preview mode,
//! classifies the response, and reshapes it into post records for the page
//! renderer.
//!
//! # Design
//! - `query` builds documents; pure string construction.
//! - `ContentClient` is stateless apart from endpoint and credentials. It
//!   splits each round trip into `build_*` (produces an `HttpRequest`) and
//!   `parse_response` (consumes an `HttpResponse`), so the I/O boundary is
//!   explicit and everything up to it is deterministic.
//! - `Transport` executes requests; `ContentApi` composes the three
//!   page-facing operations on top of it.
//! - `extract` never fails: shape mismatches are logged and degrade to
//!   `None` or an empty list.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod query;
pub mod types;

pub use client::ContentClient;
pub use config::Credentials;
pub use error::ContentError;
pub use extract::{extract_post, extract_posts};
pub use fetch::{ContentApi, ReqwestTransport, Transport};
pub use http::{CachePolicy, HttpRequest, HttpResponse};
pub use query::QueryDocument;
pub use types::{Asset, Author, ParsedResponse, Post, PostAndMorePosts, RichText};
