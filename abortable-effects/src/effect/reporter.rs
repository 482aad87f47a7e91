//! Delivery of genuine effect failures.

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, warn};

use crate::errors::EffectError;

/// Receives failures that are not the recognized abort kind.
///
/// Reporters are called from the task driving the effect, never from the
/// lifecycle evaluation, and must not block.
#[cfg_attr(test, mockall::automock)]
pub trait FailureReporter: Send + Sync {
    /// Handles one genuine failure.
    fn report(&self, error: EffectError);
}

impl<F> FailureReporter for F
where
    F: Fn(EffectError) + Send + Sync,
{
    fn report(&self, error: EffectError) {
        self(error);
    }
}

/// A reporter that logs failures using the tracing framework.
///
/// Used as the default when no reporter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFailureReporter;

impl FailureReporter for LoggingFailureReporter {
    fn report(&self, error: EffectError) {
        error!(
            error_kind = %error.name(),
            error = %error,
            "Unhandled effect failure"
        );
    }
}

/// A reporter that keeps every failure, for tests and inspection.
#[derive(Debug, Default)]
pub struct CollectingFailureReporter {
    failures: Mutex<Vec<EffectError>>,
}

impl CollectingFailureReporter {
    /// Creates a new collecting reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of collected failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Returns true if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Returns the discriminant names of collected failures, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.failures.lock().iter().map(EffectError::name).collect()
    }

    /// Returns the messages of collected failures, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.failures.lock().iter().map(ToString::to_string).collect()
    }

    /// Removes and returns all collected failures.
    pub fn take(&self) -> Vec<EffectError> {
        std::mem::take(&mut *self.failures.lock())
    }
}

impl FailureReporter for CollectingFailureReporter {
    fn report(&self, error: EffectError) {
        self.failures.lock().push(error);
    }
}

/// A reporter that forwards failures into a channel.
#[derive(Debug, Clone)]
pub struct ChannelFailureReporter {
    sender: UnboundedSender<EffectError>,
}

impl ChannelFailureReporter {
    /// Creates a reporter sending into `sender`.
    #[must_use]
    pub fn new(sender: UnboundedSender<EffectError>) -> Self {
        Self { sender }
    }
}

impl FailureReporter for ChannelFailureReporter {
    fn report(&self, error: EffectError) {
        if let Err(e) = self.sender.send(error) {
            warn!(error = %e.0, "Failure channel closed, dropping effect failure");
        }
    }
}
