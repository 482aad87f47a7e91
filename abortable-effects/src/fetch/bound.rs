//! A fetch function pre-bound to a lifecycle's abort signal.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Fetch, FetchResponse, RequestInit};
use crate::cancellation::AbortSignal;
use crate::errors::EffectError;

/// Fetch handed to effect bodies by [`super::FetchBinder`].
///
/// Every call carries the signal of the run that created it. A signal already
/// present in the caller's options is overwritten; the lifecycle owns
/// cancellation for calls made inside it.
#[derive(Clone)]
pub struct BoundFetch {
    inner: Arc<dyn Fetch>,
    signal: AbortSignal,
}

impl BoundFetch {
    /// Binds `inner` to `signal`.
    #[must_use]
    pub fn new(inner: Arc<dyn Fetch>, signal: AbortSignal) -> Self {
        Self { inner, signal }
    }

    /// Returns the signal attached to every call.
    #[must_use]
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }
}

#[async_trait]
impl Fetch for BoundFetch {
    async fn fetch(
        &self,
        input: &str,
        init: Option<RequestInit>,
    ) -> Result<FetchResponse, EffectError> {
        let mut init = init.unwrap_or_default();
        init.signal = Some(self.signal.clone());
        self.inner.fetch(input, Some(init)).await
    }
}

impl std::fmt::Debug for BoundFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFetch")
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}
