//! CORS-bypassing forwarding proxy library.

pub mod config;
pub mod http;

pub use config::ProxyConfig;
pub use http::HttpServer;
