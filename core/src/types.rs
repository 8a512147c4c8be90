//! Post records and the loosely-typed parsed response.
//!
//! # Design
//! Every post field is optional: the backend decides what it returns and the
//! renderer decides what it needs. `ParsedResponse` keeps the raw JSON and
//! exposes presence-checked navigation instead of a fixed schema, so a shape
//! change surfaces in the extractor rather than as a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the collection field under `data`.
pub const POST_COLLECTION: &str = "postCollection";

/// A single blog post as returned by the content backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub cover_image: Option<Asset>,
    pub date: Option<String>,
    pub author: Option<Author>,
    pub excerpt: Option<String>,
    pub content: Option<RichText>,
}

/// An uploaded media asset. Only the URL is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Asset {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Author {
    pub name: Option<String>,
    pub picture: Option<Asset>,
}

/// Structured body content. The document tree is passed through untouched
/// for the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RichText {
    pub json: Value,
}

/// Result of the post-plus-related-posts operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostAndMorePosts {
    pub post: Option<Post>,
    pub more_posts: Vec<Post>,
}

/// A successfully parsed response body, shape not yet checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse(Value);

impl ParsedResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// `data.postCollection.items`, if every level is present and `items` is
    /// an array.
    pub fn post_items(&self) -> Option<&[Value]> {
        self.0
            .get("data")?
            .get(POST_COLLECTION)?
            .get("items")?
            .as_array()
            .map(Vec::as_slice)
    }

    /// Messages from a top-level GraphQL `errors` array, empty when absent.
    pub fn error_messages(&self) -> Vec<&str> {
        self.0
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}
