//! Proxy server module.
//!
//! # Module Structure
//!
//! - `server` - ProxyServer struct, accept loop, and the fallback seam
//! - `dispatch` - Rule lookup and the handled/not-handled decision
//! - `forwarding` - Request forwarding to upstream targets
//! - `request` - Inbound request snapshot taken at the server boundary
//! - `client` - HTTP client creation and configuration
//! - `network` - Network listener utilities (SO_REUSEPORT)

mod client;
mod dispatch;
mod forwarding;
mod network;
mod request;
mod server;

// Re-export public API types
pub use client::{create_http_client, HttpClient};
pub use dispatch::{DispatchResult, ForwardingDispatcher};
pub use forwarding::error_response;
pub use request::InboundRequest;
pub use server::{Fallback, NotFoundFallback, ProxyServer};
