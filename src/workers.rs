//! Shared worker-count state for the parallel download phase.
//!
//! The prefetch core does not run downloads itself; download workers and
//! observers (e.g. a UI poller) share one `WorkerLimits` value and use these
//! atomic accessors from arbitrary threads.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Smallest allowed worker cap. A cap of 1 means sequential downloads.
pub const MIN_WORKERS: usize = 1;
/// Largest allowed worker cap.
pub const MAX_WORKERS: usize = 5;

/// Active-worker count and configured cap for concurrent downloads.
///
/// Both fields are independent single values, so plain atomics suffice; no
/// compound invariant spans them. Construct one per process and share it via
/// `Arc` with the download phase and any `ProgressTracker`.
#[derive(Debug)]
pub struct WorkerLimits {
    active: AtomicUsize,
    max: AtomicUsize,
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerLimits {
    /// Create with the default cap of 1 (sequential, safest).
    pub fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            max: AtomicUsize::new(MIN_WORKERS),
        }
    }

    /// Create with a specific cap; out-of-range values are clamped like
    /// `set_max_workers`.
    pub fn with_max(max: usize) -> Self {
        let limits = Self::new();
        limits.set_max_workers(max);
        limits
    }

    /// Number of currently active download workers.
    pub fn active_workers(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Configured maximum number of concurrent workers.
    pub fn max_workers(&self) -> usize {
        self.max.load(Ordering::Relaxed)
    }

    /// Set the worker cap, clamped into `[MIN_WORKERS, MAX_WORKERS]`.
    ///
    /// Never fails: invalid requests are clamped, not rejected, so callers
    /// can treat configuration as infallible. Takes effect for subsequent
    /// reads; already-running workers are not interrupted.
    pub fn set_max_workers(&self, requested: usize) {
        let capped = requested.clamp(MIN_WORKERS, MAX_WORKERS);
        self.max.store(capped, Ordering::Relaxed);
    }

    /// Record a worker starting; the returned guard decrements the count
    /// when dropped. Call at the top of each download worker.
    pub fn worker_started(&self) -> WorkerGuard<'_> {
        self.active.fetch_add(1, Ordering::AcqRel);
        WorkerGuard { limits: self }
    }

    /// Decrement the active count, saturating at zero.
    fn worker_finished(&self) {
        let mut current = self.active.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return;
            }
            match self.active.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

/// Decrements the active-worker count when dropped.
#[derive(Debug)]
pub struct WorkerGuard<'a> {
    limits: &'a WorkerLimits,
}

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.limits.worker_finished();
    }
}
