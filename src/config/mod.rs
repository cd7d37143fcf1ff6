//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / PORT env
//!     → cli.rs (parse & merge)
//!     → ProxyConfig (immutable)
//!     → passed by value into the server constructor
//! ```
//!
//! # Design Decisions
//! - No global mutable state; the config is built once at startup
//! - All fields have defaults so the proxy runs with no flags at all

pub mod cli;
pub mod schema;

pub use cli::Args;
pub use schema::ProxyConfig;
