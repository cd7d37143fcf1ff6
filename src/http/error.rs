//! Structured failure envelope for the proxy pipeline.
//!
//! # Responsibilities
//! - Carry a status code, a message, and a diagnostic detail map
//! - Serialize as the `{"error": {...}}` envelope clients parse
//! - Classify failures for logging
//!
//! # Design Decisions
//! - Every failure is terminal and request-scoped; nothing is retried,
//!   a proxy must not replay non-idempotent methods on its own
//! - The detail map carries enough context to reproduce the failure

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Root or empty path: there is no target to forward to.
    MissingTarget,
    /// The path did not parse as an absolute URL.
    MalformedTarget,
    /// Reading the inbound body failed.
    BodyRead,
    /// The outbound request could not be constructed.
    RequestConstruction,
    /// DNS, connect, or deadline failure talking to the target.
    Transport,
    /// The target answered but its body could not be read.
    RelayRead,
}

/// A terminal pipeline failure.
///
/// Rendered to the client as
/// `{"error":{"Code":<int>,"Message":<string>,"Detail":{...}}}`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProxyError {
    pub kind: FailureKind,
    pub code: StatusCode,
    pub message: String,
    pub detail: Map<String, Value>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
    detail: &'a Map<String, Value>,
}

impl ProxyError {
    pub fn new(kind: FailureKind, code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            detail: Map::new(),
        }
    }

    /// Attach one diagnostic entry. Keys are serialized in sorted order.
    pub fn detail(mut self, key: &str, value: Value) -> Self {
        self.detail.insert(key.to_string(), value);
        self
    }

    /// The JSON envelope written to the client.
    pub fn envelope(&self) -> String {
        let envelope = Envelope {
            error: ErrorBody {
                code: self.code.as_u16(),
                message: &self.message,
                detail: &self.detail,
            },
        };
        serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"error":{"Code":500,"Message":"failed to encode error","Detail":{}}}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let err = ProxyError::new(
            FailureKind::MissingTarget,
            StatusCode::PRECONDITION_FAILED,
            "URL not provided",
        )
        .detail("method", json!("GET"))
        .detail("requestedURL", json!("/"));

        assert_eq!(
            err.envelope(),
            r#"{"error":{"Code":412,"Message":"URL not provided","Detail":{"method":"GET","requestedURL":"/"}}}"#
        );
    }

    #[test]
    fn test_detail_keys_are_sorted() {
        let err = ProxyError::new(
            FailureKind::Transport,
            StatusCode::UNPROCESSABLE_ENTITY,
            "connection refused",
        )
        .detail("requestedURL", json!("http://localhost:1"))
        .detail("body", json!(""))
        .detail("method", json!("GET"));

        let rendered = err.envelope();
        let body_at = rendered.find(r#""body""#).unwrap();
        let method_at = rendered.find(r#""method""#).unwrap();
        let url_at = rendered.find(r#""requestedURL""#).unwrap();
        assert!(body_at < method_at && method_at < url_at);
    }

    #[test]
    fn test_display_is_message() {
        let err = ProxyError::new(
            FailureKind::MalformedTarget,
            StatusCode::PRECONDITION_FAILED,
            "empty host",
        );
        assert_eq!(err.to_string(), "empty host");
    }
}
