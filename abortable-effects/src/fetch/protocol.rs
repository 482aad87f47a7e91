//! The network primitive fetches go through.

use async_trait::async_trait;

use super::{FetchResponse, RequestInit};
use crate::errors::EffectError;

/// Protocol for network fetching.
///
/// Implementations must observe `init.signal` and fail with
/// [`EffectError::Aborted`] once it fires, so binders can tell an intentional
/// cancellation from a real failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issues a request for `input` with optional per-call options.
    async fn fetch(
        &self,
        input: &str,
        init: Option<RequestInit>,
    ) -> Result<FetchResponse, EffectError>;
}
