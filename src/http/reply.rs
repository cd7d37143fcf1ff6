//! The single place a response is written.
//!
//! # Responsibilities
//! - Render success and failure replies uniformly
//! - Force the JSON content type on every response
//! - Log one line per response served
//!
//! # Design Decisions
//! - One sum type for all pipeline outcomes, one rendering function;
//!   every branch of the pipeline terminates here exactly once
//! - The content type is forced to JSON even for relayed HTML/binary
//!   bodies; existing clients depend on it

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use crate::http::error::ProxyError;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Outcome of one pipeline run.
#[derive(Debug)]
pub enum Reply {
    /// Terminal success: a status plus an optional payload.
    /// Pre-flight answers carry no payload at all.
    Success {
        status: StatusCode,
        payload: Option<String>,
    },
    /// Terminal failure, rendered as a structured envelope.
    Failure(ProxyError),
}

impl Reply {
    /// A relayed downstream response.
    pub fn relay(status: StatusCode, payload: String) -> Self {
        Reply::Success {
            status,
            payload: Some(payload),
        }
    }

    /// The empty 200 answer to a pre-flight probe.
    pub fn preflight() -> Self {
        Reply::Success {
            status: StatusCode::OK,
            payload: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Success { status, .. } => *status,
            Reply::Failure(err) => err.code,
        }
    }

    /// Payloads are printed with a trailing newline, pre-flight stays empty.
    fn body(&self) -> String {
        match self {
            Reply::Success {
                payload: Some(text),
                ..
            } => format!("{text}\n"),
            Reply::Success { payload: None, .. } => String::new(),
            Reply::Failure(err) => format!("{}\n", err.envelope()),
        }
    }
}

impl From<ProxyError> for Reply {
    fn from(err: ProxyError) -> Self {
        Reply::Failure(err)
    }
}

/// Write `reply` with the negotiated response headers.
///
/// This is the only function that builds a client-facing response; callers
/// finish a request by invoking it exactly once.
pub fn render(reply: Reply, negotiated: HeaderMap) -> Response {
    let status = reply.status();
    if let Reply::Failure(err) = &reply {
        tracing::warn!(
            kind = ?err.kind,
            code = status.as_u16(),
            message = %err.message,
            "pipeline failure"
        );
    }
    tracing::info!(
        code = status.as_u16(),
        text = status.canonical_reason().unwrap_or("unknown"),
        "served"
    );

    let mut response = Response::new(Body::from(reply.body()));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.extend(negotiated);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    response
}
