//! Credentials and endpoint settings, resolved once at startup.
//!
//! Nothing in the client reads the process environment after construction;
//! `Credentials::from_env` is the only place that does.

use crate::error::ContentError;

pub const SPACE_ID_VAR: &str = "CONTENTFUL_SPACE_ID";
pub const ACCESS_TOKEN_VAR: &str = "CONTENTFUL_ACCESS_TOKEN";
pub const PREVIEW_ACCESS_TOKEN_VAR: &str = "CONTENTFUL_PREVIEW_ACCESS_TOKEN";
pub const ENDPOINT_VAR: &str = "CONTENTFUL_GRAPHQL_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://graphql.contentful.com";

/// Space identifier plus the two access tokens.
///
/// Every field may be absent: which ones are required depends on the mode of
/// each request, so absence is reported per request by
/// [`Credentials::resolve`] rather than at load time.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    space_id: Option<String>,
    access_token: Option<String>,
    preview_access_token: Option<String>,
}

impl Credentials {
    pub fn new(
        space_id: impl Into<String>,
        access_token: impl Into<String>,
        preview_access_token: impl Into<String>,
    ) -> Self {
        Self {
            space_id: non_empty(Some(space_id.into())),
            access_token: non_empty(Some(access_token.into())),
            preview_access_token: non_empty(Some(preview_access_token.into())),
        }
    }

    /// Read the `CONTENTFUL_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            space_id: non_empty(lookup(SPACE_ID_VAR)),
            access_token: non_empty(lookup(ACCESS_TOKEN_VAR)),
            preview_access_token: non_empty(lookup(PREVIEW_ACCESS_TOKEN_VAR)),
        }
    }

    /// Select the space id and the token for `preview` mode.
    ///
    /// The space id is checked first, so a fully empty configuration reports
    /// `CONTENTFUL_SPACE_ID`.
    pub fn resolve(&self, preview: bool) -> Result<(&str, &str), ContentError> {
        let space_id = self.space_id.as_deref().ok_or(ContentError::MissingConfig {
            setting: SPACE_ID_VAR,
        })?;
        let (token, setting) = if preview {
            (self.preview_access_token.as_deref(), PREVIEW_ACCESS_TOKEN_VAR)
        } else {
            (self.access_token.as_deref(), ACCESS_TOKEN_VAR)
        };
        let token = token.ok_or(ContentError::MissingConfig { setting })?;
        Ok((space_id, token))
    }
}

// Tokens must never end up in logs through a stray `{:?}`.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("space_id", &self.space_id)
            .field("access_token", &redact(&self.access_token))
            .field("preview_access_token", &redact(&self.preview_access_token))
            .finish()
    }
}

/// Endpoint base URL from `CONTENTFUL_GRAPHQL_ENDPOINT`, falling back to the
/// public content API host.
pub fn endpoint_from_env() -> String {
    non_empty(std::env::var(ENDPOINT_VAR).ok()).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
