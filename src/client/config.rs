//! Where requests go. The browser build of this flow talks to its own origin and
//! accepts an optional API base override; the native client has no page origin,
//! so the origin is explicit here and the override keeps the same meaning:
//! when set, it prefixes every request path instead of the origin.
//! Configuration values are public; the session credential lives elsewhere.

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Origin used when none is configured (the dev server that proxies the API).
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    origin: Url,
    api_base: Option<String>,
}

impl ClientConfig {
    /// Build a config from an origin and an optional API base override.
    ///
    /// A relative override such as `/api` is resolved against the origin; an
    /// absolute one replaces it. Blank overrides are treated as unset.
    ///
    /// # Errors
    /// Returns an error if the origin is not an absolute http(s) URL, or if the
    /// override cannot be turned into one.
    pub fn new(origin: &str, api_base: Option<&str>) -> Result<Self> {
        let origin = parse_http_url(origin).context("invalid origin")?;

        let api_base = match api_base.and_then(normalize_value) {
            Some(base) if base.starts_with('/') => Some(build_url_with_base(
                origin.as_str(),
                &base,
            )),
            Some(base) => {
                parse_http_url(&base).context("invalid API base")?;
                Some(base)
            }
            None => None,
        };

        let config = Self { origin, api_base };
        // Fail early rather than on the first request.
        config
            .endpoint_url("/")
            .context("API base cannot be combined with request paths")?;

        Ok(config)
    }

    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    #[must_use]
    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Base every request path is prefixed with.
    #[must_use]
    pub fn base(&self) -> &str {
        self.api_base.as_deref().unwrap_or_else(|| self.origin.as_str())
    }

    /// Prefix `path` with the effective base.
    ///
    /// # Errors
    /// Returns an error if the combined string is not a valid URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&build_url_with_base(self.base(), path))
    }
}

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("unsupported scheme {scheme}")),
    }
    if url.host().is_none() {
        return Err(anyhow!("no host specified"));
    }
    Ok(url)
}

/// Joins a base URL and a path with exactly one slash at the seam, keeping any
/// path the base already carries.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

pub(crate) fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
