//! Cancelable effect binding.
//!
//! This module provides:
//! - EffectBinder, which ties an async effect to an EffectHost
//! - EffectOptions, the optional teardown and dependency list
//! - FailureReporter implementations receiving genuine failures

mod binder;
mod integration_tests;
mod reporter;

pub use binder::{EffectBinder, EffectOptions, Teardown};
pub use reporter::{
    ChannelFailureReporter, CollectingFailureReporter, FailureReporter, LoggingFailureReporter,
};

#[cfg(test)]
pub use reporter::MockFailureReporter;
