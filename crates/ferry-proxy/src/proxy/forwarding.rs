//! Request forwarding logic.
//!
//! A forward is a single attempt: compose the upstream URI from the rule's
//! target and the original path, send the request as received, and relay
//! whatever comes back. There are no retries and no redirect following; a
//! 3xx or 5xx from the upstream is a valid answer and goes back verbatim.

use super::client::HttpClient;
use super::request::InboundRequest;
use crate::config::ForwardRule;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, Uri};
use std::time::Duration;
use tracing::{debug, error};

/// Failure of a single forward attempt.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upstream URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },

    #[error("request to upstream failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response body: {0}")]
    ReadBody(#[from] hyper::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
}

/// Helper function to create an error response.
pub fn error_response(status: u16, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Forward `inbound` to the rule's target, one attempt, bounded by `timeout`.
///
/// On success the upstream response is relayed as-is, whatever its status.
/// Any failure along the way becomes a 500 with a JSON error body, so the
/// caller always has a response to return.
pub async fn forward_request(
    client: &HttpClient,
    timeout: Duration,
    rule: &ForwardRule,
    inbound: &InboundRequest,
) -> Response<Full<Bytes>> {
    match try_forward(client, timeout, rule, inbound).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to forward request to '{}': {}", rule.target, e);
            error_response(500, &e.to_string())
        }
    }
}

async fn try_forward(
    client: &HttpClient,
    timeout: Duration,
    rule: &ForwardRule,
    inbound: &InboundRequest,
) -> Result<Response<Full<Bytes>>, ForwardError> {
    let upstream_req = build_upstream_request(rule, inbound)?;

    debug!("Forwarding to: {}", upstream_req.uri());

    match tokio::time::timeout(timeout, send_and_collect(client, upstream_req)).await {
        Ok(result) => result,
        Err(_) => Err(ForwardError::Timeout(timeout)),
    }
}

/// Build the outbound request for `rule` from an inbound snapshot.
///
/// The upstream URI is `http://host:port` plus the original path and query,
/// untouched. Method, headers (`host` included), and body are carried over
/// verbatim.
fn build_upstream_request(
    rule: &ForwardRule,
    inbound: &InboundRequest,
) -> Result<Request<Full<Bytes>>, ForwardError> {
    let full_uri = format!("http://{}{}", rule.authority(), inbound.path_and_query());
    let uri: Uri = full_uri
        .parse()
        .map_err(|source| ForwardError::InvalidUri {
            uri: full_uri.clone(),
            source,
        })?;

    let mut upstream_req = Request::new(Full::new(inbound.body.clone()));
    *upstream_req.method_mut() = inbound.method.clone();
    *upstream_req.uri_mut() = uri;
    *upstream_req.headers_mut() = inbound.headers.clone();

    Ok(upstream_req)
}

async fn send_and_collect(
    client: &HttpClient,
    upstream_req: Request<Full<Bytes>>,
) -> Result<Response<Full<Bytes>>, ForwardError> {
    let upstream_response = client.request(upstream_req).await?;
    let (parts, body) = upstream_response.into_parts();
    let body_bytes = body.collect().await?.to_bytes();
    Ok(Response::from_parts(parts, Full::new(body_bytes)))
}
