//! Generic retry-until-state primitive
//!
//! Wraps any status-producing call so callers can wait out asynchronous
//! backend transitions (resource leaving "creating", queue draining on
//! delete, and so on) with a deadline and external cancellation.

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Status a not-found refresh reports.
///
/// List it in `failure` to make a resource disappearing (or never
/// appearing) terminate the wait instead of polling until the deadline.
pub const STATE_ABSENT: &str = "";

/// Polling cadence and deadline for [`wait_for_state`].
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

impl WaitConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Terminal outcomes of a wait other than reaching a target state.
#[derive(Debug, Error)]
pub enum WaitError<T> {
    /// Deadline elapsed; carries the last observed value and status.
    #[error("timed out after {waited:?} (last state: {last_state:?})")]
    Timeout {
        last: Option<T>,
        last_state: Option<String>,
        waited: Duration,
    },

    /// The resource entered a state listed as a failure state.
    #[error("reached failure state '{state}'")]
    Failure { last: Option<T>, state: String },

    /// The caller's cancellation signal fired.
    #[error("wait cancelled")]
    Cancelled,

    /// The refresh call failed with something other than not-found.
    #[error(transparent)]
    Backend(#[from] CloudError),
}

/// Repeatedly invoke `refresh` until its status lands in `target`.
///
/// Rules, in order:
/// - an already-cancelled token returns [`WaitError::Cancelled`] before
///   the first refresh;
/// - an elapsed deadline returns [`WaitError::Timeout`];
/// - a status in `target` returns the refreshed value;
/// - a status in `failure` returns [`WaitError::Failure`];
/// - a not-found error from `refresh` reports the [`STATE_ABSENT`]
///   status: listed in `failure` it terminates the wait, otherwise it
///   means "not yet" and polling continues;
/// - any other refresh error propagates immediately, no retry.
pub async fn wait_for_state<T, F, Fut>(
    mut refresh: F,
    target: &[&str],
    failure: &[&str],
    config: &WaitConfig,
    cancel: &CancellationToken,
) -> std::result::Result<T, WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(T, String)>>,
{
    let started = Instant::now();
    let mut last: Option<T> = None;
    let mut last_state: Option<String> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }

        let waited = started.elapsed();
        if waited >= config.timeout {
            return Err(WaitError::Timeout {
                last,
                last_state,
                waited,
            });
        }

        match refresh().await {
            Ok((value, state)) => {
                if target.contains(&state.as_str()) {
                    return Ok(value);
                }
                if failure.contains(&state.as_str()) {
                    return Err(WaitError::Failure {
                        last: Some(value),
                        state,
                    });
                }
                last = Some(value);
                last_state = Some(state);
            }
            Err(err) if err.is_not_found() => {
                if failure.contains(&STATE_ABSENT) {
                    return Err(WaitError::Failure {
                        last,
                        state: STATE_ABSENT.to_string(),
                    });
                }
                // Absence means the resource has not materialized yet.
                tracing::debug!("resource not visible yet, still waiting");
            }
            Err(err) => return Err(WaitError::Backend(err)),
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            _ = sleep(config.interval) => {}
        }
    }
}
