//! # Abortable Effects
//!
//! Ties asynchronous, cancelable work to the lifecycle of a UI component.
//!
//! Whenever a component re-runs an effect (its dependencies changed) or
//! unmounts, the work started by the previous run is signaled to stop:
//!
//! - **Cancelable effects**: each run gets a fresh [`AbortSignal`]; cleanup aborts
//!   it before the optional teardown runs
//! - **Cancelable fetches**: effect bodies receive a fetch that attaches the
//!   run's signal to every request
//! - **Failure classification**: abort failures are swallowed, everything else
//!   goes to an injected [`FailureReporter`](effect::FailureReporter)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use abortable_effects::prelude::*;
//!
//! let binder = EffectBinder::new()?;
//! let fetches = FetchBinder::new(binder, Arc::new(ReqwestFetcher::new(FetchConfig::default())?));
//!
//! // On every render of the component:
//! fetches.bind_cancelable_fetch(
//!     &mut slot,
//!     move |fetch| async move {
//!         let user = fetch.fetch(&format!("/users/{id}"), None).await?;
//!         render(user.json()?);
//!         Ok(())
//!     },
//!     EffectOptions::new().with_deps(deps![id]),
//! );
//!
//! // When the component goes away:
//! slot.unmount();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod effect;
pub mod errors;
pub mod fetch;
pub mod lifecycle;
pub mod observability;
pub mod testing;

pub use cancellation::{AbortController, AbortSignal};
pub use errors::{is_abort_failure, EffectError, ABORT_ERROR_NAME};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::{abortable, AbortController, AbortSignal};
    pub use crate::config::{EffectConfig, FetchConfig, LoggingConfig};
    pub use crate::deps;
    pub use crate::effect::{
        ChannelFailureReporter, CollectingFailureReporter, EffectBinder, EffectOptions,
        FailureReporter, LoggingFailureReporter,
    };
    pub use crate::errors::{is_abort_failure, EffectError, ABORT_ERROR_NAME};
    #[cfg(feature = "http")]
    pub use crate::fetch::ReqwestFetcher;
    pub use crate::fetch::{BoundFetch, Fetch, FetchBinder, FetchResponse, RequestInit};
    pub use crate::lifecycle::{DependencyList, EffectHost, EffectSlot, LifecycleState};
    pub use crate::observability::init_logging;
}
