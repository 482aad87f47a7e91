//! Configuration types for binders, fetchers and logging.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for effect binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Reason recorded on each controller aborted by cleanup.
    #[serde(default = "default_abort_reason")]
    pub abort_reason: String,
    /// Whether a panicking effect is reported as a failure.
    #[serde(default = "default_true")]
    pub catch_panics: bool,
    /// Whether swallowed abort failures are logged at debug level.
    #[serde(default = "default_true")]
    pub log_swallowed_aborts: bool,
}

fn default_abort_reason() -> String {
    "lifecycle cleanup".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            abort_reason: default_abort_reason(),
            catch_panics: default_true(),
            log_swallowed_aborts: default_true(),
        }
    }
}

impl EffectConfig {
    /// Creates a new effect configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the abort reason.
    #[must_use]
    pub fn with_abort_reason(mut self, reason: impl Into<String>) -> Self {
        self.abort_reason = reason.into();
        self
    }

    /// Sets whether panics are caught and reported.
    #[must_use]
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Sets whether swallowed aborts are logged.
    #[must_use]
    pub fn with_log_swallowed_aborts(mut self, log: bool) -> Self {
        self.log_swallowed_aborts = log;
        self
    }
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL that relative request descriptors are joined onto.
    #[serde(default)]
    pub base_url: Option<String>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_user_agent() -> String {
    "abortable-effects/0.1".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Resolves a request descriptor against the base URL.
    ///
    /// Only descriptors starting with `/` are joined; anything else is used
    /// as given.
    #[must_use]
    pub fn resolve_url(&self, input: &str) -> String {
        match (&self.base_url, input.starts_with('/')) {
            (Some(base), true) => format!("{}{}", base.trim_end_matches('/'), input),
            _ => input.to_string(),
        }
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Whether to emit JSON lines instead of plain text.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Sets the default filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
