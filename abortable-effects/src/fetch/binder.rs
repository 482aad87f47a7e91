//! Binding cancelable fetch effects to a component lifecycle.

use std::future::Future;
use std::sync::Arc;

use super::{BoundFetch, Fetch};
use crate::effect::{EffectBinder, EffectOptions};
use crate::errors::EffectError;
use crate::lifecycle::EffectHost;

/// Binds effects that receive a [`BoundFetch`] instead of a raw signal.
///
/// All lifecycle, abort-suppression and teardown behavior comes from the
/// wrapped [`EffectBinder`]. The network primitive is an explicit dependency.
#[derive(Clone)]
pub struct FetchBinder {
    effects: EffectBinder,
    fetcher: Arc<dyn Fetch>,
}

impl FetchBinder {
    /// Creates a fetch binder issuing requests through `fetcher`.
    #[must_use]
    pub fn new(effects: EffectBinder, fetcher: Arc<dyn Fetch>) -> Self {
        Self { effects, fetcher }
    }

    /// Returns the wrapped effect binder.
    #[must_use]
    pub fn effects(&self) -> &EffectBinder {
        &self.effects
    }

    /// Registers `effect` with `host`; it receives a fetch bound to the run's
    /// abort signal.
    pub fn bind_cancelable_fetch<H, F, Fut>(&self, host: &mut H, effect: F, options: EffectOptions)
    where
        H: EffectHost + ?Sized,
        F: FnOnce(BoundFetch) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        let fetcher = self.fetcher.clone();
        self.effects.bind_cancelable_effect(
            host,
            move |signal| effect(BoundFetch::new(fetcher, signal)),
            options,
        );
    }
}

impl std::fmt::Debug for FetchBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchBinder")
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}
