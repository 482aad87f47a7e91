//! Request options and responses exchanged with a fetcher.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::cancellation::AbortSignal;
use crate::errors::EffectError;

/// Per-call request options.
///
/// The `signal` field is what a fetcher observes to abandon the request.
#[derive(Debug, Clone)]
pub struct RequestInit {
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Abort signal the fetcher must honor.
    pub signal: Option<AbortSignal>,
}

impl Default for RequestInit {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
            signal: None,
        }
    }
}

impl RequestInit {
    /// Creates GET options with no headers, body or signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the abort signal.
    #[must_use]
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Response returned by a fetcher.
///
/// Non-success statuses are still responses; use
/// [`FetchResponse::error_for_status`] to turn them into failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Final URL after redirects.
    pub url: String,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body as text.
    pub body: String,
}

impl FetchResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, EffectError> {
        serde_json::from_str(&self.body).map_err(|e| EffectError::Other(e.into()))
    }

    /// Returns the response, or an HTTP failure if the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, EffectError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EffectError::Http {
                status: self.status,
                url: self.url,
            })
        }
    }
}
