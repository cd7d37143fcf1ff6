//! Request/response decorators wrapped around the core pipeline.
//!
//! Decorators run in a fixed order declared in `server.rs`; each has a
//! pre-hook (on the request) and a post-hook (on the response).

pub mod license;
pub mod request_id;
