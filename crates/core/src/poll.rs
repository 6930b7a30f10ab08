//! Generic convergence polling
//!
//! The control plane provisions asynchronously: a mutation is accepted with
//! `202` and the entity then wanders through intermediate states until it
//! converges. [`wait_until`] is the single place that encodes "give up
//! after N seconds" semantics - callers supply a fetch closure and a
//! predicate over the fetch outcome and never hand-roll polling loops.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

/// The deadline elapsed before the condition held.
///
/// Carries the last-seen fetch outcome so callers can report what state
/// the entity was stuck in.
#[derive(Debug, Error)]
#[error("waiting condition was not reached within {waited:?} ({attempts} polls)")]
pub struct PollTimeout<T, E> {
    /// Outcome of the final fetch before giving up.
    pub last: Result<T, E>,
    /// Total wait budget that was exhausted.
    pub waited: Duration,
    /// Number of fetches performed.
    pub attempts: u32,
}

/// Repeatedly invoke `fetch` until `condition` holds for its outcome, or
/// the deadline `max_wait` from now elapses.
///
/// The predicate sees the full `Result`, so a condition may intentionally
/// match an error - deletion confirmation, for example, waits for the
/// fetch to fail with the not-found signal. When the predicate holds the
/// last outcome is returned as-is; this is the success path even if that
/// outcome is an `Err`.
///
/// Sleeps `poll_interval` between attempts rather than busy-waiting, and
/// crosses an await point on every iteration so cancellation (dropping
/// the future, or an enclosing `tokio::time::timeout`) takes effect at
/// each poll boundary.
pub async fn wait_until<T, E, F, Fut, C>(
    mut fetch: F,
    mut condition: C,
    poll_interval: Duration,
    max_wait: Duration,
) -> Result<Result<T, E>, PollTimeout<T, E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: FnMut(&Result<T, E>) -> bool,
{
    let deadline = Instant::now() + max_wait;
    let mut attempts: u32 = 0;

    loop {
        let outcome = fetch().await;
        attempts += 1;

        if condition(&outcome) {
            debug!(attempts, "waiting condition reached");
            return Ok(outcome);
        }

        if Instant::now() >= deadline {
            return Err(PollTimeout { last: outcome, waited: max_wait, attempts });
        }

        tokio::time::sleep(poll_interval).await;
    }
}
