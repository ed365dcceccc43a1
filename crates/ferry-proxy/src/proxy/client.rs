//! HTTP client creation and configuration.
//!
//! This module provides the shared HTTP client used for forwarding
//! requests to upstream targets.

use crate::config::ClientConfig;
use bytes::Bytes;
use http_body_util::Full;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::info;

/// Type alias for the HTTP client used by the proxy.
///
/// Forward targets are always plain `http://host:port`, so a bare TCP
/// connector is enough. Bodies are buffered before sending.
pub type HttpClient = Client<HttpConnector, Full<Bytes>>;

/// Create a shared HTTP client with connection pooling.
pub fn create_http_client(config: &ClientConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_keepalive(Some(Duration::from_secs(config.keepalive_timeout_secs)));
    connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

    let client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .pool_max_idle_per_host(config.max_idle_per_host)
        .build(connector);

    info!(
        "Connection pool configured (HTTP/1.1): max_idle={}, idle_timeout={}s, keepalive={}s",
        config.max_idle_per_host, config.idle_timeout_secs, config.keepalive_timeout_secs
    );

    client
}
