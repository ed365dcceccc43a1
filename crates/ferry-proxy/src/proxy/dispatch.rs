//! Rule lookup and the handled/not-handled decision.

use super::client::HttpClient;
use super::forwarding::forward_request;
use super::request::InboundRequest;
use crate::rules::RuleTable;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of dispatching a request against the rule table.
pub enum DispatchResult {
    /// A rule matched; here is the response to return to the caller.
    Handled(Response<Full<Bytes>>),
    /// No rule matched; here's the request back, untouched.
    NotHandled(InboundRequest),
}

/// Matches requests against the rule table and forwards the ones that hit.
pub struct ForwardingDispatcher {
    rules: RuleTable,
    client: HttpClient,
    request_timeout: Duration,
}

impl ForwardingDispatcher {
    pub fn new(rules: RuleTable, client: HttpClient, request_timeout: Duration) -> Self {
        Self {
            rules,
            client,
            request_timeout,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Dispatch one request.
    ///
    /// The rule lookup happens before anything else; a request that matches
    /// no rule comes back `NotHandled` with no upstream traffic sent. A
    /// matched request always produces `Handled`: either the upstream's
    /// response relayed verbatim, or a synthesized 500 when the forward
    /// attempt fails.
    pub async fn handle(&self, request: InboundRequest) -> DispatchResult {
        let Some(rule) = self.rules.first_match(request.path()) else {
            debug!("No rule for {} {}", request.method, request.path());
            return DispatchResult::NotHandled(request);
        };

        info!(
            "Request matched rule '{}': {} {} -> {}",
            rule.target,
            request.method,
            request.path(),
            rule.authority()
        );

        let response = forward_request(&self.client, self.request_timeout, rule, &request).await;
        DispatchResult::Handled(response)
    }
}
