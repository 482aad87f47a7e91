//! Abort controller and its read-only signal.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::EffectError;

/// A callback type for abort notifications.
pub type AbortCallback = Box<dyn FnOnce() + Send>;

/// Shared state between a controller and its signals.
struct SignalState {
    /// Identifies the owning controller in logs.
    id: Uuid,
    /// Whether the controller has been triggered.
    aborted: AtomicBool,
    /// The reason for the abort (first one wins).
    reason: RwLock<Option<String>>,
    /// Callbacks to invoke on abort.
    callbacks: Mutex<Vec<AbortCallback>>,
    /// Wakes tasks parked in [`AbortSignal::aborted`].
    notify: Notify,
}

/// A single-use object that can be triggered once to signal "stop".
///
/// The controller is owned exclusively by whoever created it; dependent work
/// only ever sees the [`AbortSignal`]. Dropping an untriggered controller
/// triggers it.
pub struct AbortController {
    state: Arc<SignalState>,
}

impl AbortController {
    /// Creates a new, pending controller.
    #[must_use]
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(controller_id = %id, "Abort controller created");
        Self {
            state: Arc::new(SignalState {
                id,
                aborted: AtomicBool::new(false),
                reason: RwLock::new(None),
                callbacks: Mutex::new(Vec::new()),
                notify: Notify::new(),
            }),
        }
    }

    /// Returns the controller id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    /// Returns a read-only signal observing this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            state: self.state.clone(),
        }
    }

    /// Triggers the controller.
    ///
    /// Only the first call has any effect; it records the reason, runs the
    /// registered callbacks and wakes every waiter. Returns true if this call
    /// performed the trigger. Panics in callbacks are logged and suppressed.
    pub fn abort(&self, reason: impl Into<String>) -> bool {
        {
            // Held across the flag flip so readers never see a reason-less abort.
            let mut slot = self.state.reason.write();
            if self
                .state
                .aborted
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return false;
            }
            let reason = reason.into();
            debug!(controller_id = %self.state.id, reason = %reason, "Abort controller triggered");
            *slot = Some(reason);
        }

        let callbacks = std::mem::take(&mut *self.state.callbacks.lock());
        for callback in callbacks {
            run_callback(self.state.id, callback);
        }

        self.state.notify.notify_waiters();
        true
    }

    /// Returns whether the controller has been triggered.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AbortController {
    fn drop(&mut self) {
        self.abort("controller dropped");
    }
}

impl std::fmt::Debug for AbortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortController")
            .field("id", &self.state.id)
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

fn run_callback(id: Uuid, callback: AbortCallback) {
    if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)) {
        warn!(controller_id = %id, "Abort callback panicked: {:?}", e);
    }
}

/// Read-only view of an [`AbortController`]'s state.
///
/// Cheap to clone. Handed to effect bodies and attached to every request made
/// through a bound fetch.
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<SignalState>,
}

impl AbortSignal {
    /// Returns the id of the owning controller.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    /// Returns whether the owning controller has been triggered.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    /// Returns the abort reason, if triggered.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.state.reason.read().clone()
    }

    /// Returns true if both signals observe the same controller.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Returns an abort failure if the signal has been triggered.
    pub fn throw_if_aborted(&self) -> Result<(), EffectError> {
        if self.is_aborted() {
            Err(EffectError::Aborted {
                reason: self.reason(),
            })
        } else {
            Ok(())
        }
    }

    /// Registers a callback to be invoked on abort.
    ///
    /// If already aborted, the callback is invoked immediately.
    pub fn on_abort<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut callbacks = self.state.callbacks.lock();
            if !self.is_aborted() {
                callbacks.push(Box::new(callback));
                return;
            }
        }
        run_callback(self.state.id, Box::new(callback));
    }

    /// Resolves once the owning controller has been triggered.
    pub async fn aborted(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortSignal")
            .field("id", &self.state.id)
            .field("aborted", &self.is_aborted())
            .field("reason", &self.reason())
            .finish()
    }
}
