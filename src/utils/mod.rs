//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Resolve a relative or absolute href against a base URL.
pub fn resolve(base: &Url, href: &str) -> Result<Url> {
    Ok(base.join(href.trim())?)
}

/// Resolve an href against a base URL, returning the URL as a string.
pub fn resolve_url(base: &Url, href: &str) -> Result<String> {
    resolve(base, href).map(String::from)
}
