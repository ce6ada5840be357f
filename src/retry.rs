//! Bounded exponential-backoff retry.
//!
//! One primitive serves every fallible step of a run: the artist search, the
//! album listing and each album download. The caller supplies the predicate
//! that decides which errors are worth waiting for; everything else fails on
//! the spot.

use std::{fmt, future::Future, time::Duration};

use tokio::time::sleep;

use crate::warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Wait after the first failure; doubled after every further failure.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// The waits a permanently transient operation goes through:
    /// `d, 2d, 4d, ...`, one fewer than the number of attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let initial = self.initial_delay;
        (0..self.max_attempts.saturating_sub(1)).map(move |i| backoff(initial, i))
    }
}

fn backoff(initial: Duration, step: u32) -> Duration {
    initial.saturating_mul(2u32.saturating_pow(step))
}

/// Terminal failure of a retried operation.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The policy allowed no attempt at all.
    NotAttempted,
    /// A non-transient error; no retry was made after it.
    Permanent { attempt: u32, source: E },
    /// Every attempt failed with a transient error.
    Exhausted { attempts: u32, source: E },
}

impl<E> RetryError<E> {
    pub fn source_error(&self) -> Option<&E> {
        match self {
            RetryError::NotAttempted => None,
            RetryError::Permanent { source, .. } | RetryError::Exhausted { source, .. } => {
                Some(source)
            }
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::NotAttempted => write!(f, "no attempts allowed"),
            RetryError::Permanent { attempt, source } => {
                write!(f, "{source} (attempt {attempt}, not retried)")
            }
            RetryError::Exhausted { attempts, source } => {
                write!(f, "{source} (gave up after {attempts} attempts)")
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source_error().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Runs `operation` until it succeeds, fails permanently, or runs out of
/// attempts.
///
/// After a transient failure the current task sleeps for the current delay,
/// the delay doubles and the operation is attempted again. A status line is
/// printed for every retry and for the terminal failure. The function always
/// returns a defined value; it never panics on exhaustion.
///
/// # Example
///
/// ```
/// let policy = RetryPolicy::new(3, Duration::from_secs(10));
/// let id = with_backoff(&policy, "search Daft Punk", CatalogError::is_transient, || {
///     client.search_artist("Daft Punk")
/// })
/// .await?;
/// ```
pub async fn with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    label: &str,
    is_transient: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    if policy.max_attempts == 0 {
        warning!("Could not {label}: no attempts allowed.");
        return Err(RetryError::NotAttempted);
    }

    let mut attempt: u32 = 0;
    let mut delay = policy.initial_delay;

    loop {
        attempt += 1;

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_transient(&err) {
            warning!("Could not {label}: {err}");
            return Err(RetryError::Permanent {
                attempt,
                source: err,
            });
        }

        let remaining = policy.max_attempts - attempt;
        if remaining == 0 {
            warning!("Could not {label} after {attempt} attempt(s): {err}");
            return Err(RetryError::Exhausted {
                attempts: attempt,
                source: err,
            });
        }

        warning!(
            "Failed to {label}: {err}. Retrying in {}s ({remaining} attempt(s) left)...",
            delay.as_secs_f32()
        );
        sleep(delay).await;
        delay = delay.saturating_mul(2);
    }
}
