//! Configuration types for the Ferry proxy.

mod client;
mod rules;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use client::ClientConfig;
pub use rules::{ForwardRule, ForwardTarget};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Port the proxy listens on.
    pub port: u16,

    /// Ordered forwarding rules. File order is authoritative; the first
    /// rule whose prefix matches a request path wins.
    #[serde(default)]
    pub rules: Vec<ForwardRule>,

    /// Outbound HTTP client tuning.
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.port == 0 {
            anyhow::bail!("Listen port must be non-zero");
        }

        for rule in &self.rules {
            if rule.forward.host.is_empty() {
                anyhow::bail!("Rule '{}' has an empty forward host", rule.target);
            }
            if rule.forward.port == 0 {
                anyhow::bail!("Rule '{}' has forward port 0", rule.target);
            }
            if rule.prefix.is_empty() {
                warn!(
                    "Rule '{}' has an empty prefix and will match every path",
                    rule.target
                );
            }
        }

        // A rule whose prefix extends an earlier rule's prefix can never match
        for (idx, rule) in self.rules.iter().enumerate() {
            if let Some(earlier) = self.rules[..idx]
                .iter()
                .find(|r| rule.prefix.starts_with(&r.prefix))
            {
                warn!(
                    "Rule '{}' is unreachable: earlier rule '{}' already matches prefix {:?}",
                    rule.target, earlier.target, rule.prefix
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"
{
    "port": 8080,
    "rules": [
        {
            "target": "ActiveMQ",
            "test": "/api/message/",
            "forward": { "host": "localhost", "port": 8161 }
        },
        {
            "target": "Search",
            "test": "/api/search/",
            "forward": { "host": "127.0.0.1", "port": 9200 }
        }
    ]
}
"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].target, "ActiveMQ");
        assert_eq!(config.rules[0].prefix, "/api/message/");
        assert_eq!(config.rules[0].forward.host, "localhost");
        assert_eq!(config.rules[0].forward.port, 8161);
        assert_eq!(config.rules[1].target, "Search");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config_without_rules() {
        let json = r#"{ "port": 3000 }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.rules.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_section_defaults() {
        let json = r#"{ "port": 3000 }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.client.max_idle_per_host, 100);
        assert_eq!(config.client.idle_timeout_secs, 90);
        assert_eq!(config.client.request_timeout_secs, 30);
    }

    #[test]
    fn test_client_section_partial_override() {
        let json = r#"{ "port": 3000, "client": { "request_timeout_secs": 5 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.client.request_timeout_secs, 5);
        assert_eq!(config.client.max_idle_per_host, 100);
    }

    #[test]
    fn test_validate_rejects_listen_port_zero() {
        let json = r#"{ "port": 0 }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_forward_host() {
        let json = r#"
{
    "port": 8080,
    "rules": [
        { "target": "broken", "test": "/x/", "forward": { "host": "", "port": 9000 } }
    ]
}
"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_forward_port_zero() {
        let json = r#"
{
    "port": 8080,
    "rules": [
        { "target": "broken", "test": "/x/", "forward": { "host": "localhost", "port": 0 } }
    ]
}
"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_empty_prefix() {
        // An empty prefix is a legal catch-all; it only warns
        let json = r#"
{
    "port": 8080,
    "rules": [
        { "target": "all", "test": "", "forward": { "host": "localhost", "port": 9000 } }
    ]
}
"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_allows_shadowed_rules() {
        // Shadowed rules are suspicious but not fatal
        let json = r#"
{
    "port": 8080,
    "rules": [
        { "target": "api", "test": "/api/", "forward": { "host": "localhost", "port": 9000 } },
        { "target": "mq", "test": "/api/message/", "forward": { "host": "localhost", "port": 8161 } }
    ]
}
"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ferry.json");
        std::fs::write(
            &path,
            r#"{"port": 8080, "rules": [{"target": "t", "test": "/t/", "forward": {"host": "localhost", "port": 9000}}]}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rules.len(), 1);
    }

    #[test]
    fn test_from_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ferry.json");
        std::fs::write(&path, "port: 8080").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file_missing_file() {
        assert!(Config::from_file("/nonexistent/ferry.json").is_err());
    }
}
