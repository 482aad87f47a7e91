//! Cooperative cancellation primitives.
//!
//! This module provides:
//! - AbortController, the single-use trigger owned by a binder
//! - AbortSignal, the read-only view handed to effect bodies and requests
//! - abortable, which races a future against a signal

mod controller;
mod guard;

pub use controller::{AbortCallback, AbortController, AbortSignal};
pub use guard::abortable;
