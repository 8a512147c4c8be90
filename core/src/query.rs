//! Query documents for the post collection.
//!
//! Each builder returns a fresh [`QueryDocument`] that embeds
//! [`POST_FIELDS`]. Slugs are spliced into the document as escaped string
//! literals; the backend contract takes the query as a single string.

use std::fmt;

/// Field selection shared by every post query.
pub const POST_FIELDS: &str = r"
  slug
  title
  coverImage {
    url
  }
  date
  author {
    ... on Author {
      name
      picture {
        url
      }
    }
  }
  excerpt
  content {
    json
  }
";

/// Number of related posts returned alongside a single post.
pub const MORE_POSTS_LIMIT: u32 = 2;

/// A complete, immutable query document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument(String);

impl QueryDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One post by exact slug, limit 1.
pub fn post_by_slug(slug: &str, preview: bool) -> QueryDocument {
    collection_query(
        &format!("where: {{ slug: {} }}, preview: {preview}, limit: 1", string_literal(slug)),
    )
}

/// One draft-or-published post by slug. Same shape as [`post_by_slug`] with
/// preview forced on.
pub fn preview_post_by_slug(slug: &str) -> QueryDocument {
    post_by_slug(slug, true)
}

/// Every post that has a slug, newest first.
pub fn all_posts(preview: bool) -> QueryDocument {
    collection_query(&format!(
        "where: {{ slug_exists: true }}, order: date_DESC, preview: {preview}"
    ))
}

/// Up to [`MORE_POSTS_LIMIT`] posts other than `slug`, newest first.
pub fn more_posts(slug: &str, preview: bool) -> QueryDocument {
    collection_query(&format!(
        "where: {{ slug_not_in: [{}] }}, order: date_DESC, preview: {preview}, limit: {MORE_POSTS_LIMIT}",
        string_literal(slug)
    ))
}

fn collection_query(arguments: &str) -> QueryDocument {
    QueryDocument(format!(
        "query {{\n  postCollection({arguments}) {{\n    items {{{POST_FIELDS}    }}\n  }}\n}}"
    ))
}

/// Quote `value` as a GraphQL string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
