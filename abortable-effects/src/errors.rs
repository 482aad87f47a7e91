//! Error types for abortable effects.
//!
//! Every failure an effect body or a fetch can produce is an [`EffectError`].
//! Each variant carries a discriminant name; [`is_abort_failure`] uses that
//! name to tell an intentional cancellation (`"AbortError"`) apart from a
//! genuine failure.

use std::error::Error as StdError;
use thiserror::Error;

/// Discriminant name of the recognized "operation aborted" failure kind.
pub const ABORT_ERROR_NAME: &str = "AbortError";

/// The main error type for effect bodies and network calls.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The operation observed its abort signal and stopped.
    #[error("The operation was aborted{}", reason_suffix(.reason))]
    Aborted {
        /// Reason recorded on the controller, if any.
        reason: Option<String>,
    },

    /// The network transport failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Response status code.
        status: u16,
        /// Final request URL.
        url: String,
    },

    /// The effect future panicked.
    #[error("Effect panicked: {0}")]
    Panicked(String),

    /// No tokio runtime was available to drive effects.
    #[error("No tokio runtime available to spawn effects")]
    NoRuntime,

    /// Any other failure raised by an effect body.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl EffectError {
    /// Creates an abort failure with a reason.
    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: Some(reason.into()),
        }
    }

    /// Creates a network failure.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns the discriminant name of this failure.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aborted { .. } => ABORT_ERROR_NAME,
            Self::Network(_) => "NetworkError",
            Self::Http { .. } => "HttpError",
            Self::Panicked(_) => "PanicError",
            Self::NoRuntime => "RuntimeError",
            Self::Other(_) => "Error",
        }
    }

    /// Returns true if this is the recognized abort kind.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        self.name() == ABORT_ERROR_NAME
    }
}

/// Returns true if `error`, or anything in its source chain, is the
/// recognized abort kind.
///
/// Errors wrapped in `anyhow::Error` are looked through as well, so an effect
/// body that adds context to an abort with `.context(..)` is still treated as
/// canceled.
pub fn is_abort_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(effect_err) = err.downcast_ref::<EffectError>() {
            match effect_err {
                EffectError::Other(inner) => {
                    if is_abort_failure(&**inner) {
                        return true;
                    }
                }
                other if other.is_abort() => return true,
                _ => {}
            }
        }
        current = err.source();
    }
    false
}
