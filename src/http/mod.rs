//! HTTP pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → middleware (trace, request ID, timeout, license decorator)
//!     → cors.rs (negotiate headers, may answer pre-flight)
//!     → target.rs (extract and validate the destination URL)
//!     → forward.rs (buffer body, dispatch, buffer the answer)
//!     → reply.rs (the single response writer)
//! ```

pub mod cors;
pub mod error;
pub mod forward;
pub mod middleware;
pub mod reply;
pub mod server;
pub mod target;

pub use error::{FailureKind, ProxyError};
pub use reply::Reply;
pub use server::HttpServer;
