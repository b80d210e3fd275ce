//! Client configuration.
//!
//! # Design
//! A `ClientConfig` is supplied once when the transport is built and never
//! changes afterwards. This layer reads nothing from the environment or disk;
//! the `serde` derives exist so the consuming application can embed it in its
//! own configuration file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout applied to standard calls when the configuration sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout applied to multipart uploads unless the call overrides it.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(90);

/// Connection settings for the thesis management service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root, e.g. `https://thesis.example.edu/api`.
    pub base_url: String,
    /// Timeout for standard calls. `None` means [`DEFAULT_TIMEOUT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Headers added to every request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            headers: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Timeout for standard (non-upload) calls.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}
