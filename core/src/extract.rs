//! Reshape a parsed response into post records.
//!
//! Neither function fails. A response without `data.postCollection.items`
//! is logged and becomes `None` or an empty list so the page still renders.

use tracing::{error, warn};

use crate::types::{ParsedResponse, Post};

/// First item of `data.postCollection.items`, if any.
pub fn extract_post(response: &ParsedResponse) -> Option<Post> {
    log_graphql_errors(response);
    let item = response.post_items()?.first()?;
    match serde_json::from_value(item.clone()) {
        Ok(post) => Some(post),
        Err(e) => {
            warn!(error = %e, "ignoring malformed post item");
            None
        }
    }
}

/// All items of `data.postCollection.items`, or an empty list when the path
/// is missing or not a list. Items that are not post objects (the backend
/// sends `null` for entries it cannot resolve) are logged and skipped.
pub fn extract_posts(response: &ParsedResponse) -> Vec<Post> {
    log_graphql_errors(response);
    let Some(items) = response.post_items() else {
        error!(response = %response.as_value(), "failed to fetch posts: no data.postCollection.items");
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value(item.clone())
                .map_err(|e| warn!(index, error = %e, "skipping malformed post item"))
                .ok()
        })
        .collect()
}

fn log_graphql_errors(response: &ParsedResponse) {
    let messages = response.error_messages();
    if !messages.is_empty() {
        warn!(errors = ?messages, "content backend reported query errors");
    }
}
