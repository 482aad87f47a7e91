//! Component lifecycle binding.
//!
//! This module provides:
//! - DependencyList and the `deps!` macro
//! - EffectHost, the interface a host framework implements
//! - EffectSlot, a reference host with the idle/running/canceling/terminated
//!   state machine

mod deps;
mod host;
mod slot;

pub use deps::DependencyList;
pub use host::{Cleanup, EffectHost, Setup};
pub use slot::{EffectSlot, LifecycleState};
