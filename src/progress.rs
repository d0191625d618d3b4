//! Shared progress snapshot for the prefetch + download pipeline.
//!
//! Producers (the prefetch loop, download workers) replace the snapshot
//! wholesale; observers read a copy at any time. `active_downloads` is never
//! trusted as stored: reads rederive it from the live `WorkerLimits` so the
//! two can't drift.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::workers::WorkerLimits;

/// Pipeline phase a batch is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No batch running (the zero value after a reset).
    #[default]
    Idle,
    /// Sequential streaming-URL prefetch.
    Prefetch,
    /// Concurrent download phase.
    Download,
}

/// Snapshot of batch progress (UI-poller friendly).
///
/// Replaced as a whole by `ProgressTracker::set`; fields are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParallelProgress {
    pub phase: Phase,
    /// 1-based index of the item being processed in the current phase.
    pub current: usize,
    /// Total items in the current phase.
    pub total: usize,
    /// Live active-worker count, filled in at read time.
    pub active_downloads: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub speed_mbps: f64,
}

/// Readers-writer-locked progress state shared between producers and
/// observers. Built around a `WorkerLimits` handle so `get` can report the
/// live worker count.
#[derive(Debug)]
pub struct ProgressTracker {
    inner: RwLock<ParallelProgress>,
    workers: Arc<WorkerLimits>,
}

impl ProgressTracker {
    pub fn new(workers: Arc<WorkerLimits>) -> Self {
        Self {
            inner: RwLock::new(ParallelProgress::default()),
            workers,
        }
    }

    /// Replace the stored snapshot. Last writer wins.
    pub fn set(&self, progress: ParallelProgress) {
        *self.inner.write().unwrap() = progress;
    }

    /// Copy of the current snapshot with `active_downloads` overwritten by
    /// the live `WorkerLimits` count at the moment of the call.
    pub fn get(&self) -> ParallelProgress {
        let mut progress = self.inner.read().unwrap().clone();
        progress.active_downloads = self.workers.active_workers();
        progress
    }

    /// Reset to the zero value (all counts 0, phase idle, speed 0).
    /// Call between batch runs.
    pub fn reset(&self) {
        *self.inner.write().unwrap() = ParallelProgress::default();
    }
}
