//! Fetch test doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::EffectError;
use crate::fetch::{Fetch, FetchResponse, RequestInit};

/// How a [`RecordingFetcher`] answers requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchBehavior {
    /// Answer immediately with a status and body.
    Respond {
        /// Status code.
        status: u16,
        /// Body text.
        body: String,
    },
    /// Stay pending until the request signal fires, then fail with an abort.
    HoldUntilAborted,
    /// Fail immediately with a network error.
    FailNetwork(String),
}

impl Default for FetchBehavior {
    fn default() -> Self {
        Self::Respond {
            status: 200,
            body: String::new(),
        }
    }
}

/// A fetcher that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    behavior: Mutex<FetchBehavior>,
    calls: Mutex<Vec<(String, Option<RequestInit>)>>,
}

impl RecordingFetcher {
    /// Creates a fetcher answering 200 with an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher with the given behavior.
    #[must_use]
    pub fn with_behavior(behavior: FetchBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the fetcher as a shared trait object alongside a handle.
    #[must_use]
    pub fn shared(self) -> (Arc<Self>, Arc<dyn Fetch>) {
        let fetcher = Arc::new(self);
        let dynamic: Arc<dyn Fetch> = fetcher.clone();
        (fetcher, dynamic)
    }

    /// Changes the behavior for subsequent calls.
    pub fn set_behavior(&self, behavior: FetchBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Option<RequestInit>)> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Fetch for RecordingFetcher {
    async fn fetch(
        &self,
        input: &str,
        init: Option<RequestInit>,
    ) -> Result<FetchResponse, EffectError> {
        self.calls.lock().push((input.to_string(), init.clone()));
        let behavior = self.behavior.lock().clone();

        match behavior {
            FetchBehavior::Respond { status, body } => Ok(FetchResponse::new(status, input, body)),
            FetchBehavior::FailNetwork(message) => Err(EffectError::network(message)),
            FetchBehavior::HoldUntilAborted => match init.and_then(|init| init.signal) {
                Some(signal) => {
                    signal.aborted().await;
                    Err(EffectError::Aborted {
                        reason: signal.reason(),
                    })
                }
                None => futures::future::pending().await,
            },
        }
    }
}
