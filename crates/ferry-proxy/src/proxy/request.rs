//! Inbound request snapshot.

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{HeaderMap, Method, Request, Uri};

/// An inbound request captured at the server boundary.
///
/// The body is collected exactly once, so the request can be matched,
/// forwarded, or handed to the fallback without touching the connection
/// again. Header order and duplicates survive the snapshot.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Collect a hyper request into an owned snapshot.
    pub async fn read_from<B>(req: Request<B>) -> Result<Self, B::Error>
    where
        B: Body,
    {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path plus query string, exactly as received.
    pub fn path_and_query(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    }
}
