//! Forwarding rule configuration.

use serde::{Deserialize, Serialize};

/// A single forwarding rule: requests whose path starts with `prefix` go
/// to `forward`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwardRule {
    /// Human-readable name of the target service. Used in logs only.
    pub target: String,

    /// Literal path prefix the request path is tested against. Matching
    /// is byte-wise and case-sensitive, with no normalization and no
    /// wildcards. An empty prefix matches every path.
    #[serde(rename = "test")]
    pub prefix: String,

    /// Where matching requests are forwarded.
    pub forward: ForwardTarget,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwardTarget {
    pub host: String,
    pub port: u16,
}

impl ForwardRule {
    /// Whether `path` falls under this rule's prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// `host:port` of the forward target.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.forward.host, self.forward.port)
    }
}
