//! Request ID injection for log correlation.
//!
//! # Responsibilities
//! - Attach an `x-request-id` when the caller did not supply one
//! - Echo the ID on the response so clients can quote it back

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(X_REQUEST_ID)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap()
        });
    request.headers_mut().insert(X_REQUEST_ID, id.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, id);
    response
}
