//! ProxyServer struct and main run loop.
//!
//! This module contains the ProxyServer struct which ties the rule table,
//! the dispatcher, and the fallback collaborator together, and the main
//! run loop that accepts connections and handles requests.

use super::client::create_http_client;
use super::dispatch::{DispatchResult, ForwardingDispatcher};
use super::forwarding::error_response;
use super::network::create_reusable_listener;
use super::request::InboundRequest;
use crate::config::Config;
use crate::rules::RuleTable;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Response;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Collaborator that answers requests no rule matched.
///
/// A full deployment pairs the proxy with a static file server; this crate
/// only defines the seam. `serve` receives the request exactly as it
/// arrived, body included.
#[async_trait]
pub trait Fallback: Send + Sync {
    async fn serve(&self, request: InboundRequest) -> Response<Full<Bytes>>;
}

/// Default fallback: a plain 404 for everything.
pub struct NotFoundFallback;

#[async_trait]
impl Fallback for NotFoundFallback {
    async fn serve(&self, _request: InboundRequest) -> Response<Full<Bytes>> {
        error_response(404, "Not Found")
    }
}

/// The main proxy server struct.
pub struct ProxyServer {
    config: Arc<Config>,
    dispatcher: Arc<ForwardingDispatcher>,
    fallback: Arc<dyn Fallback>,
}

impl ProxyServer {
    /// Create a new ProxyServer from configuration, with the default 404
    /// fallback.
    pub fn new(config: Config) -> Self {
        Self::with_fallback(config, Arc::new(NotFoundFallback))
    }

    /// Create a new ProxyServer with a custom fallback collaborator.
    pub fn with_fallback(config: Config, fallback: Arc<dyn Fallback>) -> Self {
        let rules = RuleTable::new(config.rules.clone());
        let client = create_http_client(&config.client);
        let request_timeout = Duration::from_secs(config.client.request_timeout_secs);
        let dispatcher = ForwardingDispatcher::new(rules, client, request_timeout);

        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            fallback,
        }
    }

    /// Run the proxy server, accepting connections and handling requests.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = create_reusable_listener(addr)?;

        info!("Listening on http://{}", addr);
        info!("Loaded {} forwarding rules", self.dispatcher.rule_count());

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let server = Arc::clone(&server);

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let server = Arc::clone(&server);
                    async move { server.handle_request_internal(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", remote_addr, err);
                }
            });
        }
    }

    /// Internal request handler: snapshot the request, dispatch it, and
    /// fall back when no rule claimed it.
    async fn handle_request_internal(
        &self,
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let inbound = match InboundRequest::read_from(req).await {
            Ok(inbound) => inbound,
            Err(e) => {
                error!("Failed to read request body: {}", e);
                return Ok(error_response(500, "Failed to read request body"));
            }
        };

        match self.dispatcher.handle(inbound).await {
            DispatchResult::Handled(response) => Ok(response),
            DispatchResult::NotHandled(request) => Ok(self.fallback.serve(request).await),
        }
    }
}
