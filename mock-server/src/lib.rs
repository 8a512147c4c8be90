//! In-memory stand-in for the content backend's query endpoint.
//!
//! Serves `POST /content/v1/spaces/{space_id}` with bearer-token checks and
//! a small interpreter for the clauses the blog client emits: slug equality,
//! `slug_exists`, `slug_not_in`, `order: date_DESC`, `preview` and `limit`.
//! Unpublished posts are only visible to preview queries made with the
//! preview token.

use std::sync::{Arc, LazyLock};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Failure modes the server can be told to simulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// 500 with an HTML error page.
    ServerError,
    /// 200 with an HTML body.
    HtmlOk,
    /// 200 with JSON that lacks `data.postCollection.items`.
    MissingItems,
}

#[derive(Clone, Debug)]
pub struct StoredPost {
    pub published: bool,
    pub fields: Value,
}

impl StoredPost {
    pub fn published(fields: Value) -> Self {
        Self { published: true, fields }
    }

    pub fn draft(fields: Value) -> Self {
        Self { published: false, fields }
    }

    fn slug(&self) -> Option<&str> {
        self.fields.get("slug").and_then(Value::as_str)
    }

    fn date(&self) -> &str {
        self.fields.get("date").and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub struct Backend {
    pub space_id: String,
    pub access_token: String,
    pub preview_access_token: String,
    pub posts: Vec<StoredPost>,
    pub fault: Option<Fault>,
}

impl Backend {
    pub fn new(space_id: &str, access_token: &str, preview_access_token: &str) -> Self {
        Self {
            space_id: space_id.to_string(),
            access_token: access_token.to_string(),
            preview_access_token: preview_access_token.to_string(),
            posts: Vec::new(),
            fault: None,
        }
    }

    pub fn with_posts(mut self, posts: Vec<StoredPost>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }
}

/// Three published posts and one draft, dated so that the draft is newest.
pub fn sample_posts() -> Vec<StoredPost> {
    let post = |slug: &str, title: &str, date: &str| {
        json!({
            "slug": slug,
            "title": title,
            "coverImage": { "url": format!("https://images.example.com/{slug}.jpg") },
            "date": date,
            "author": {
                "name": "Ada Lovelace",
                "picture": { "url": "https://images.example.com/ada.jpg" }
            },
            "excerpt": format!("{title}, in brief."),
            "content": {
                "json": {
                    "nodeType": "document",
                    "content": [{
                        "nodeType": "paragraph",
                        "content": [{ "nodeType": "text", "value": title, "marks": [] }]
                    }]
                }
            }
        })
    };
    vec![
        StoredPost::published(post("hello-world", "Hello World", "2024-03-01T00:00:00.000Z")),
        StoredPost::published(post("second-post", "Second Post", "2024-02-01T00:00:00.000Z")),
        StoredPost::published(post("third-post", "Third Post", "2024-01-01T00:00:00.000Z")),
        StoredPost::draft(post("draft-post", "Draft Post", "2024-04-01T00:00:00.000Z")),
    ]
}

#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Filter, order and paging clauses recognised in a query document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub slug: Option<String>,
    pub slug_not_in: Option<String>,
    pub slug_exists: bool,
    pub newest_first: bool,
    pub preview: bool,
    pub limit: Option<usize>,
}

static SLUG_EQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bslug:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex"));
static SLUG_NOT_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bslug_not_in:\s*\[?\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex")
});
static SLUG_EXISTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bslug_exists:\s*true").expect("valid regex"));
static ORDER_DATE_DESC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\border:\s*date_DESC").expect("valid regex"));
static PREVIEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpreview:\s*true").expect("valid regex"));
static LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blimit:\s*(\d+)").expect("valid regex"));

impl Selection {
    pub fn parse(query: &str) -> Self {
        let capture = |re: &Regex| re.captures(query).map(|c| unescape(&c[1]));
        Self {
            slug: capture(&SLUG_EQ),
            slug_not_in: capture(&SLUG_NOT_IN),
            slug_exists: SLUG_EXISTS.is_match(query),
            newest_first: ORDER_DATE_DESC.is_match(query),
            preview: PREVIEW.is_match(query),
            limit: LIMIT.captures(query).and_then(|c| c[1].parse().ok()),
        }
    }

    fn select(&self, posts: &[StoredPost]) -> Vec<Value> {
        let mut matched: Vec<&StoredPost> = posts
            .iter()
            .filter(|p| p.published || self.preview)
            .filter(|p| self.slug.as_deref().is_none_or(|s| p.slug() == Some(s)))
            .filter(|p| self.slug_not_in.as_deref().is_none_or(|s| p.slug() != Some(s)))
            .filter(|p| !self.slug_exists || p.slug().is_some())
            .collect();
        if self.newest_first {
            matched.sort_by(|a, b| b.date().cmp(a.date()));
        }
        matched
            .into_iter()
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|p| p.fields.clone())
            .collect()
    }
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

pub fn app(backend: Backend) -> Router {
    Router::new()
        .route("/content/v1/spaces/{space_id}", post(run_query))
        .with_state(Arc::new(backend))
}

pub async fn run(listener: TcpListener, backend: Backend) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, space_id = %backend.space_id, "mock content backend listening");
    }
    axum::serve(listener, app(backend)).await
}

fn graphql_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errors": [{ "message": message }], "data": null }))).into_response()
}

fn html(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/html")], body).into_response()
}

async fn run_query(
    State(backend): State<Arc<Backend>>,
    Path(space_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<QueryRequest>,
) -> Response {
    if space_id != backend.space_id {
        return graphql_error(StatusCode::NOT_FOUND, "The resource could not be found.");
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let is_preview_token = token == Some(backend.preview_access_token.as_str());
    if !is_preview_token && token != Some(backend.access_token.as_str()) {
        return graphql_error(StatusCode::UNAUTHORIZED, "Access token invalid.");
    }

    let selection = Selection::parse(&request.query);
    debug!(?selection, "interpreted query");
    if selection.preview && !is_preview_token {
        return graphql_error(
            StatusCode::UNAUTHORIZED,
            "Preview queries require a preview access token.",
        );
    }

    match backend.fault {
        Some(Fault::ServerError) => {
            return html(
                StatusCode::INTERNAL_SERVER_ERROR,
                "<html><head><title>500 Internal Server Error</title></head><body>upstream failure</body></html>",
            );
        }
        Some(Fault::HtmlOk) => {
            return html(StatusCode::OK, "<html><body>maintenance</body></html>");
        }
        Some(Fault::MissingItems) => {
            return Json(json!({ "data": { "postCollection": null } })).into_response();
        }
        None => {}
    }

    let items = selection.select(&backend.posts);
    Json(json!({ "data": { "postCollection": { "items": items } } })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(items: &[Value]) -> Vec<&str> {
        items.iter().filter_map(|i| i["slug"].as_str()).collect()
    }

    #[test]
    fn parse_recognises_slug_equality() {
        let sel = Selection::parse(r#"postCollection(where: { slug: "hello-world" }, preview: false, limit: 1)"#);
        assert_eq!(sel.slug.as_deref(), Some("hello-world"));
        assert!(!sel.preview);
        assert_eq!(sel.limit, Some(1));
        assert!(sel.slug_not_in.is_none());
    }

    #[test]
    fn parse_recognises_exclusion_in_list_and_scalar_form() {
        let list = Selection::parse(r#"where: { slug_not_in: ["a"] }, order: date_DESC, limit: 2"#);
        assert_eq!(list.slug_not_in.as_deref(), Some("a"));
        assert!(list.slug.is_none());
        assert!(list.newest_first);

        let scalar = Selection::parse(r#"where: { slug_not_in: "a" }"#);
        assert_eq!(scalar.slug_not_in.as_deref(), Some("a"));
    }

    #[test]
    fn parse_unescapes_slug() {
        let sel = Selection::parse(r#"where: { slug: "a\"b\\c" }"#);
        assert_eq!(sel.slug.as_deref(), Some(r#"a"b\c"#));
    }

    #[test]
    fn select_hides_drafts_outside_preview() {
        let published = Selection { slug_exists: true, newest_first: true, ..Default::default() };
        assert_eq!(
            slugs(&published.select(&sample_posts())),
            vec!["hello-world", "second-post", "third-post"]
        );

        let preview = Selection { preview: true, ..published };
        assert_eq!(slugs(&preview.select(&sample_posts()))[0], "draft-post");
    }

    #[test]
    fn select_applies_exclusion_and_limit() {
        let sel = Selection {
            slug_not_in: Some("hello-world".to_string()),
            newest_first: true,
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(slugs(&sel.select(&sample_posts())), vec!["second-post", "third-post"]);
    }
}
