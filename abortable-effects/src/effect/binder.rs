//! Binding cancelable async effects to a component lifecycle.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;
use uuid::Uuid;

use super::{FailureReporter, LoggingFailureReporter};
use crate::cancellation::{AbortController, AbortSignal};
use crate::config::EffectConfig;
use crate::errors::{is_abort_failure, EffectError};
use crate::lifecycle::{Cleanup, DependencyList, EffectHost};

/// Teardown procedure run after the cycle's controller has been aborted.
pub type Teardown = Box<dyn FnOnce() + Send>;

/// Per-binding options: an optional teardown and an optional dependency list.
///
/// Without deps the effect re-runs on every evaluation.
#[derive(Default)]
pub struct EffectOptions {
    teardown: Option<Teardown>,
    deps: Option<DependencyList>,
}

impl EffectOptions {
    /// Creates options with no teardown and no deps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dependency list.
    #[must_use]
    pub fn with_deps(mut self, deps: DependencyList) -> Self {
        self.deps = Some(deps);
        self
    }

    /// Sets the teardown callback.
    #[must_use]
    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }

    /// Returns the dependency list, if any.
    #[must_use]
    pub fn deps(&self) -> Option<&DependencyList> {
        self.deps.as_ref()
    }

    /// Returns true if a teardown callback is set.
    #[must_use]
    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }
}

impl std::fmt::Debug for EffectOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectOptions")
            .field("has_teardown", &self.has_teardown())
            .field("deps", &self.deps)
            .finish()
    }
}

/// Binds async effects to an [`EffectHost`], one abort controller per run.
///
/// Each time the host runs the effect a fresh [`AbortController`] is created
/// and the effect body receives its signal. The body's future is spawned on
/// the binder's runtime and never awaited by the lifecycle. On cleanup the
/// controller is aborted first, then the teardown (if any) runs.
///
/// When the future fails, an abort failure is swallowed and any other failure
/// goes to the binder's [`FailureReporter`]. Aborts that reached the body's
/// result through `anyhow` (a bare `?` or added context) still count as aborts.
#[derive(Clone)]
pub struct EffectBinder {
    runtime: Handle,
    reporter: Arc<dyn FailureReporter>,
    config: EffectConfig,
}

impl EffectBinder {
    /// Creates a binder on the current tokio runtime with a logging reporter.
    pub fn new() -> Result<Self, EffectError> {
        let runtime = Handle::try_current().map_err(|_| EffectError::NoRuntime)?;
        Ok(Self::with_runtime(runtime))
    }

    /// Creates a binder spawning effects on `runtime`.
    #[must_use]
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            runtime,
            reporter: Arc::new(LoggingFailureReporter),
            config: EffectConfig::default(),
        }
    }

    /// Sets the failure reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EffectConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Registers `effect` with `host` for this evaluation.
    ///
    /// `effect` is only called if the host decides the effect should run, and
    /// at most once per controller.
    pub fn bind_cancelable_effect<H, F, Fut>(&self, host: &mut H, effect: F, options: EffectOptions)
    where
        H: EffectHost + ?Sized,
        F: FnOnce(AbortSignal) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        let EffectOptions { teardown, deps } = options;
        let binder = self.clone();
        host.use_effect(Box::new(move || Some(binder.setup(effect, teardown))), deps);
    }

    fn setup<F, Fut>(&self, effect: F, teardown: Option<Teardown>) -> Cleanup
    where
        F: FnOnce(AbortSignal) -> Fut,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        let controller = AbortController::new();
        let controller_id = controller.id();
        debug!(controller_id = %controller_id, "Starting cancelable effect");

        self.spawn_classified(controller_id, effect(controller.signal()));

        let reason = self.config.abort_reason.clone();
        Box::new(move || {
            controller.abort(reason);
            if let Some(teardown) = teardown {
                teardown();
            }
        })
    }

    fn spawn_classified<Fut>(&self, controller_id: Uuid, operation: Fut)
    where
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        let reporter = self.reporter.clone();
        let catch_panics = self.config.catch_panics;
        let log_aborts = self.config.log_swallowed_aborts;

        self.runtime.spawn(async move {
            let outcome = if catch_panics {
                AssertUnwindSafe(operation)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(EffectError::Panicked(panic_message(&*panic))))
            } else {
                operation.await
            };

            match outcome {
                Ok(()) => {
                    debug!(controller_id = %controller_id, "Cancelable effect completed");
                }
                Err(error) if is_abort_failure(&error) => {
                    if log_aborts {
                        debug!(
                            controller_id = %controller_id,
                            error = %error,
                            "Cancelable effect aborted"
                        );
                    }
                }
                Err(error) => {
                    debug!(
                        controller_id = %controller_id,
                        error_kind = %error.name(),
                        "Cancelable effect failed"
                    );
                    reporter.report(error);
                }
            }
        });
    }
}

impl std::fmt::Debug for EffectBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectBinder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
