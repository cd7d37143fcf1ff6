//! License notice decorator.
//!
//! # Responsibilities
//! - Stamp the license URL header on every request and response
//! - Answer `/license*` paths with a permanent redirect, skipping the
//!   pipeline

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

pub const LICENSE_HEADER: &str = "license";
pub const LICENSE_URL: &str = "https://github.com/bypass-cors/bypass-cors/blob/main/LICENSE";

pub async fn license_middleware(mut request: Request<Body>, next: Next) -> Response {
    let notice = HeaderValue::from_static(LICENSE_URL);
    request.headers_mut().append(LICENSE_HEADER, notice.clone());

    if request
        .uri()
        .path()
        .to_ascii_lowercase()
        .starts_with("/license")
    {
        let mut response = Redirect::permanent(LICENSE_URL).into_response();
        response.headers_mut().append(LICENSE_HEADER, notice);
        return response;
    }

    let mut response = next.run(request).await;
    response.headers_mut().append(LICENSE_HEADER, notice);
    response
}
