//! Racing futures against an abort signal.

use std::future::Future;

use super::AbortSignal;
use crate::errors::EffectError;

/// Runs `operation` until it completes or `signal` fires.
///
/// If the signal fires first the operation is dropped and the recognized abort
/// failure is returned, carrying the controller's reason. A signal that is
/// already triggered short-circuits without polling the operation.
pub async fn abortable<F, T>(signal: &AbortSignal, operation: F) -> Result<T, EffectError>
where
    F: Future<Output = Result<T, EffectError>>,
{
    signal.throw_if_aborted()?;

    tokio::select! {
        biased;
        () = signal.aborted() => Err(EffectError::Aborted { reason: signal.reason() }),
        result = operation => result,
    }
}
