//! CORS negotiation for proxied requests.
//!
//! # Responsibilities
//! - Reflect the caller's `Origin` and allow credentials on every response
//! - Maintain `Vary` markers so caches key on the CORS inputs
//! - Detect pre-flight probes so the pipeline can answer them without
//!   forwarding
//!
//! # Design Decisions
//! - The exact origin is reflected, never the `*` wildcard; the wildcard
//!   is rejected by browsers when credentials are allowed
//! - An absent `Origin` is reflected as an empty value, not omitted

use axum::http::{header, HeaderMap, HeaderValue, Method};

/// Constant greeting header. Purely cosmetic.
pub const QUOTE_HEADER: &str = "quote";
pub const QUOTE_VALUE: &str = "Be Happy :)";

/// Set the headers every proxied response carries.
fn default_headers(response: &mut HeaderMap, request: &HeaderMap) {
    let origin = request
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(""));

    // Vary on Origin so shared caches never serve one origin's grant to
    // another.
    response.append(header::VARY, HeaderValue::from_static("Origin"));
    response.insert(QUOTE_HEADER, HeaderValue::from_static(QUOTE_VALUE));
    response.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    response.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

/// Set the extra headers a pre-flight answer carries.
fn preflight_headers(response: &mut HeaderMap, request: &HeaderMap) {
    let requested_method = request
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let requested_headers = request
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(""));

    response.append(
        header::VARY,
        HeaderValue::from_static("Access-Control-Request-Method"),
    );
    response.append(
        header::VARY,
        HeaderValue::from_static("Access-Control-Request-Headers"),
    );

    // The requested method is granted back upper-cased; browsers send it
    // in arbitrary case.
    if let Ok(methods) = HeaderValue::from_str(&requested_method.to_uppercase()) {
        response.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
    }
    // The requested header list is granted back verbatim.
    response.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested_headers);
}

/// Apply CORS headers for this request into `response`.
///
/// Returns true when the request is a pre-flight probe: the caller must
/// answer 200 with an empty body and skip forwarding.
pub fn negotiate(response: &mut HeaderMap, method: &Method, request: &HeaderMap) -> bool {
    default_headers(response, request);

    let requested_method = request
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if method == Method::OPTIONS && !requested_method.is_empty() {
        preflight_headers(response, request);
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_reflect_origin() {
        let mut request = HeaderMap::new();
        request.insert(header::ORIGIN, HeaderValue::from_static("http://front.example"));

        let mut response = HeaderMap::new();
        default_headers(&mut response, &request);

        assert_eq!(
            response.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://front.example"
        );
        assert_eq!(
            response.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert_eq!(response.get(header::VARY).unwrap(), "Origin");
        assert_eq!(response.get(QUOTE_HEADER).unwrap(), QUOTE_VALUE);
    }

    #[test]
    fn test_missing_origin_reflects_empty_value() {
        let mut response = HeaderMap::new();
        default_headers(&mut response, &HeaderMap::new());

        assert_eq!(response.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "");
    }

    #[test]
    fn test_preflight_grants_requested_method_uppercased() {
        let mut request = HeaderMap::new();
        request.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("post"),
        );
        request.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("X-PINGOTHER, Content-Type"),
        );

        let mut response = HeaderMap::new();
        let preflight = negotiate(&mut response, &Method::OPTIONS, &request);

        assert!(preflight);
        assert_eq!(
            response.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST"
        );
        assert_eq!(
            response.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "X-PINGOTHER, Content-Type"
        );

        let vary: Vec<_> = response.get_all(header::VARY).iter().collect();
        assert_eq!(
            vary,
            vec![
                "Origin",
                "Access-Control-Request-Method",
                "Access-Control-Request-Headers"
            ]
        );
    }

    #[test]
    fn test_options_without_requested_method_is_not_preflight() {
        let mut response = HeaderMap::new();
        assert!(!negotiate(&mut response, &Method::OPTIONS, &HeaderMap::new()));
        assert!(response.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }

    #[test]
    fn test_plain_get_is_not_preflight() {
        let mut request = HeaderMap::new();
        request.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("GET"),
        );

        let mut response = HeaderMap::new();
        assert!(!negotiate(&mut response, &Method::GET, &request));

        let vary: Vec<_> = response.get_all(header::VARY).iter().collect();
        assert_eq!(vary, vec!["Origin"]);
    }
}
