//! Outbound dispatch and relay.
//!
//! # Responsibilities
//! - Buffer the inbound body (it can be consumed at most once)
//! - Build the outbound request: same method and body, resolved URL
//! - Execute against the shared client under an upstream deadline
//! - Buffer the downstream response for relay
//!
//! # Design Decisions
//! - Inbound headers are dropped on purpose; only method, URL, and body
//!   are relayed
//! - Full bodies are buffered in memory, bounded by a configured cap;
//!   no streaming
//! - A relay-read failure reports the downstream's own status code, not
//!   a fixed one

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::json;
use tokio::time::timeout;

use crate::http::error::{FailureKind, ProxyError};
use crate::http::reply::Reply;
use crate::http::target::Target;

/// Executes proxied requests.
///
/// Cheap to clone; the underlying client pools connections and is safe
/// for concurrent use without locking.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    upstream_timeout: Duration,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(upstream_timeout: Duration, max_body_bytes: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            upstream_timeout,
            max_body_bytes,
        }
    }

    /// Relay the inbound request to `target` and buffer the answer.
    pub async fn forward(
        &self,
        method: Method,
        target: &Target,
        inbound_body: Body,
    ) -> Result<Reply, ProxyError> {
        // Buffer the inbound body.
        let captured = to_bytes(inbound_body, self.max_body_bytes)
            .await
            .map_err(|err| {
                ProxyError::new(
                    FailureKind::BodyRead,
                    StatusCode::PRECONDITION_FAILED,
                    err.to_string(),
                )
                .detail("method", json!(method.as_str()))
                .detail("requestedURL", json!(target.requested))
            })?;
        let captured_text = String::from_utf8_lossy(&captured).into_owned();

        // Build the outbound request. Inbound headers are not copied.
        let request = Request::builder()
            .method(method.clone())
            .uri(target.url.as_str())
            .body(Body::from(captured))
            .map_err(|err| {
                ProxyError::new(
                    FailureKind::RequestConstruction,
                    StatusCode::PRECONDITION_FAILED,
                    err.to_string(),
                )
                .detail("body", json!(captured_text))
                .detail("method", json!(method.as_str()))
                .detail("requestedURL", json!(target.requested))
            })?;

        tracing::debug!(
            host = target.url.host_str().unwrap_or(""),
            "client --> bypass-cors --> target"
        );

        // Execute under a deadline. A slow target must not pin this worker
        // forever.
        let response: axum::http::Response<Incoming> =
            match timeout(self.upstream_timeout, self.client.request(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => {
                    return Err(transport_error(err.to_string(), &method, target, &captured_text))
                }
                Err(_) => {
                    return Err(transport_error(
                        format!(
                            "no response within {} seconds",
                            self.upstream_timeout.as_secs()
                        ),
                        &method,
                        target,
                        &captured_text,
                    ))
                }
            };

        // Buffer the downstream body. A failure here carries the
        // downstream's status code.
        let (parts, downstream_body) = response.into_parts();
        let relayed = to_bytes(Body::new(downstream_body), self.max_body_bytes)
            .await
            .map_err(|err| {
                ProxyError::new(FailureKind::RelayRead, parts.status, err.to_string())
                    .detail("body", json!(captured_text))
                    .detail("method", json!(method.as_str()))
                    .detail("requestedURL", json!(target.requested))
                    .detail("response", json!(parts.status.to_string()))
                    .detail("responseCode", json!(parts.status.as_u16()))
            })?;

        Ok(Reply::relay(
            parts.status,
            String::from_utf8_lossy(&relayed).into_owned(),
        ))
    }
}

fn transport_error(message: String, method: &Method, target: &Target, body: &str) -> ProxyError {
    ProxyError::new(
        FailureKind::Transport,
        StatusCode::UNPROCESSABLE_ENTITY,
        message,
    )
    .detail("body", json!(body))
    .detail("method", json!(method.as_str()))
    .detail("requestedURL", json!(target.requested))
    .detail("response", json!(null))
}
