//! Cooperative cancellation and per-topology time limits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Shared flag that stops every search holding a clone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits of one topology's search.
///
/// The clock starts when the first problem set of the topology begins searching and is
/// shared by all clones.
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    cancel: CancelToken,
    timeout: Option<Duration>,
    started: Arc<OnceLock<Instant>>,
}

impl SearchBudget {
    /// Creates a budget with an optional timeout.
    pub fn new(cancel: CancelToken, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            timeout,
            started: Arc::new(OnceLock::new()),
        }
    }

    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Returns a budget with the same token and timeout but a fresh clock.
    pub fn for_topology(&self) -> Self {
        Self::new(self.cancel.clone(), self.timeout)
    }

    /// Starts the clock if it is not running yet.
    pub fn start(&self) {
        self.started.get_or_init(Instant::now);
    }

    /// Returns `true` when the search must stop.
    pub fn is_exhausted(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        match self.timeout {
            Some(timeout) => self.started.get_or_init(Instant::now).elapsed() >= timeout,
            None => false,
        }
    }
}
