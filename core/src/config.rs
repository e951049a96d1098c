//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default cap on a buffered response body: 64 MiB.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Settings applied to every request a `Client` sends.
///
/// Every field has a default, so a partial JSON document such as
/// `{"timeout_secs": 5}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall deadline per call. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Largest response body that will be buffered before the call fails.
    pub max_response_bytes: u64,
    /// `User-Agent` header value; `None` sends `webreq/<crate version>`.
    pub user_agent: Option<String>,
    /// Treat any status >= 400 as an `HttpResponseError`.
    pub status_as_error: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: None,
            status_as_error: true,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| concat!("webreq/", env!("CARGO_PKG_VERSION")).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.status_as_error);
        assert_eq!(config.timeout(), None);
        assert!(config.user_agent().starts_with("webreq/"));
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config =
            ClientConfig::from_json(r#"{"timeout_secs":5,"user_agent":"fixture/1.0","status_as_error":false}"#)
                .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent(), "fixture/1.0");
        assert!(!config.status_as_error);
        assert_eq!(config.max_response_bytes, DEFAULT_MAX_RESPONSE_BYTES);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ClientConfig::from_json(r#"{"timeout_secs":"soon"}"#).is_err());
    }
}
