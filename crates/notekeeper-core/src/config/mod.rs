//! Client configuration.
//!
//! `ClientConfig` carries everything the API client and the view controller need
//! to know about the deployment: where the notes API lives, how tag names are
//! compared and whether requests are bounded by a timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
pub use crate::models::TagCase;
use crate::util::{has_http_scheme, non_blank};

/// Environment variable holding the notes API base URL.
pub const API_URL_ENV: &str = "NOTEKEEPER_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `https://notes.example.com`
    pub api_base_url: String,
    #[serde(default)]
    pub tag_case: TagCase,
    /// No timeout when absent; the transport default applies.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url.as_ref())?,
            tag_case: TagCase::default(),
            request_timeout_secs: None,
        })
    }

    /// Build from `NOTEKEEPER_API_URL`. Returns `Ok(None)` when it is unset.
    pub fn from_env() -> Result<Option<Self>> {
        non_blank(std::env::var(API_URL_ENV).ok().as_deref())
            .map(Self::new)
            .transpose()
    }

    #[must_use]
    pub const fn with_tag_case(mut self, tag_case: TagCase) -> Self {
        self.tag_case = tag_case;
        self
    }

    #[must_use]
    pub const fn with_request_timeout_secs(mut self, seconds: Option<u64>) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }
}

/// Trim, require an http(s) scheme and strip trailing slashes.
pub fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !has_http_scheme(trimmed) {
        return Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url(" https://notes.example.com/ ").unwrap(),
            "https://notes.example.com"
        );
    }

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        let empty = normalize_base_url("  ").unwrap_err();
        assert!(empty.to_string().contains("must not be empty"));

        let missing_scheme = normalize_base_url("notes.example.com").unwrap_err();
        assert!(missing_scheme.to_string().contains("http:// or https://"));
    }

    #[test]
    fn request_timeout_ignores_zero() {
        let config = ClientConfig::new("http://localhost:3001").unwrap();
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            config
                .clone()
                .with_request_timeout_secs(Some(0))
                .request_timeout(),
            None
        );
        assert_eq!(
            config
                .with_request_timeout_secs(Some(5))
                .request_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url": "http://localhost:3001"}"#).unwrap();
        assert_eq!(config.tag_case, TagCase::Sensitive);
        assert_eq!(config.request_timeout_secs, None);
    }
}
