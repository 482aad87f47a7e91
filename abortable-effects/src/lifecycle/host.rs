//! The host lifecycle interface effects are registered with.

use super::DependencyList;

/// Procedure run on cleanup.
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// Procedure run on setup, optionally returning its cleanup.
pub type Setup = Box<dyn FnOnce() -> Option<Cleanup> + Send>;

/// A host that schedules effect setup and cleanup for one component.
///
/// Implementations decide whether `setup` runs on a given evaluation. With
/// `deps == None` it runs on every evaluation; otherwise only on the first one
/// and whenever the list changed. Before a re-run, and on final teardown, the
/// cleanup returned by the previous setup must run to completion.
pub trait EffectHost {
    /// Registers `setup` for this evaluation.
    ///
    /// Returns true if the setup ran.
    fn use_effect(&mut self, setup: Setup, deps: Option<DependencyList>) -> bool;
}
