//! Testing utilities for code built on abortable effects.
//!
//! This module provides:
//! - RecordingFetcher, a scriptable fetch that records calls
//! - EventLog, an ordered log for asserting callback order

mod fetchers;
mod log;

pub use fetchers::{FetchBehavior, RecordingFetcher};
pub use log::EventLog;
