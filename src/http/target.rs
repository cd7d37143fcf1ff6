//! Target URL extraction from the request path.
//!
//! # Responsibilities
//! - Strip the leading separator and default the scheme to `http://`
//! - Parse the remainder as an absolute URL
//! - Reject root requests and unparseable targets with 412
//!
//! # Design Decisions
//! - A bare host like `localhost:8181` is accepted; anything already
//!   starting with `http` is taken verbatim
//! - The root path is answered with a structured error rather than a
//!   landing page
//! - Diagnostics carry the requested string as given, not the parser's
//!   normalized form

use axum::http::{Method, StatusCode};
use serde_json::json;
use url::Url;

use crate::http::error::{FailureKind, ProxyError};

const DEFAULT_SCHEME: &str = "http://";

/// A resolved forwarding destination.
#[derive(Debug, Clone)]
pub struct Target {
    /// Parsed absolute URL, used to dispatch the outbound request.
    pub url: Url,
    /// The scheme-prefixed string as requested, kept for diagnostics.
    pub requested: String,
}

/// Resolve the destination URL encoded in the request path.
///
/// `/example.com/x` becomes `http://example.com/x`.
pub fn resolve(method: &Method, path: &str) -> Result<Target, ProxyError> {
    if path.is_empty() || path == "/" {
        return Err(ProxyError::new(
            FailureKind::MissingTarget,
            StatusCode::PRECONDITION_FAILED,
            "URL not provided",
        )
        .detail("method", json!(method.as_str()))
        .detail("requestedURL", json!(path)));
    }

    let raw = path.strip_prefix('/').unwrap_or(path);
    let requested = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    };

    match Url::parse(&requested) {
        Ok(url) => Ok(Target { url, requested }),
        Err(err) => Err(ProxyError::new(
            FailureKind::MalformedTarget,
            StatusCode::PRECONDITION_FAILED,
            err.to_string(),
        )
        .detail("method", json!(method.as_str()))
        .detail("requestedURL", json!(requested))),
    }
}
