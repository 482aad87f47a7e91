//! Reference effect host modelling a single component effect slot.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use super::{Cleanup, DependencyList, EffectHost, Setup};

/// Lifecycle state of a bound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No setup is live; awaiting the next evaluation.
    Idle,
    /// Setup ran; its asynchronous work may still be in flight.
    Running,
    /// Cleanup is in progress.
    Canceling,
    /// Final cleanup ran; the slot accepts no further evaluations.
    Terminated,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Canceling => write!(f, "canceling"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// One effect slot of one component instance.
///
/// Evaluations are serialized through `&mut self`, so a cleanup always runs to
/// completion before the next setup starts. Dropping a slot that has not been
/// unmounted performs the final cleanup.
pub struct EffectSlot {
    name: String,
    state: LifecycleState,
    previous_deps: Option<DependencyList>,
    cleanup: Option<Cleanup>,
    run_count: u64,
}

impl EffectSlot {
    /// Creates a new, idle slot.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LifecycleState::Idle,
            previous_deps: None,
            cleanup: None,
            run_count: 0,
        }
    }

    /// Returns the slot name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns how many times setup has run.
    #[must_use]
    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    /// Returns true while a cleanup is pending.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Evaluates the slot, running cleanup and setup if `deps` call for it.
    ///
    /// Returns true if setup ran. Evaluating a terminated slot is ignored.
    pub fn evaluate<S>(&mut self, deps: Option<DependencyList>, setup: S) -> bool
    where
        S: FnOnce() -> Option<Cleanup>,
    {
        if self.state == LifecycleState::Terminated {
            warn!(slot = %self.name, "Ignoring evaluation of terminated effect slot");
            return false;
        }

        if !self.should_run(deps.as_ref()) {
            debug!(slot = %self.name, "Dependencies unchanged, skipping effect");
            return false;
        }

        self.run_cleanup(LifecycleState::Idle);

        self.cleanup = setup();
        self.previous_deps = deps;
        self.run_count += 1;
        self.state = LifecycleState::Running;
        debug!(slot = %self.name, run = self.run_count, "Effect setup ran");
        true
    }

    /// Runs the final cleanup and terminates the slot.
    pub fn unmount(&mut self) {
        if self.state == LifecycleState::Terminated {
            return;
        }
        self.run_cleanup(LifecycleState::Terminated);
        debug!(slot = %self.name, "Effect slot unmounted");
    }

    fn should_run(&self, deps: Option<&DependencyList>) -> bool {
        if self.run_count == 0 {
            return true;
        }
        match (deps, self.previous_deps.as_ref()) {
            (Some(next), Some(previous)) => next.changed_from(previous),
            _ => true,
        }
    }

    fn run_cleanup(&mut self, next: LifecycleState) {
        if let Some(cleanup) = self.cleanup.take() {
            self.state = LifecycleState::Canceling;
            cleanup();
        }
        self.state = next;
    }
}

impl EffectHost for EffectSlot {
    fn use_effect(&mut self, setup: Setup, deps: Option<DependencyList>) -> bool {
        self.evaluate(deps, setup)
    }
}

impl Drop for EffectSlot {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for EffectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectSlot")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("previous_deps", &self.previous_deps)
            .field("run_count", &self.run_count)
            .finish()
    }
}
