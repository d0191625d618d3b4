//! Sequential batch prefetch of streaming URLs.
//!
//! Phase 1 of a parallel download run: resolve every track id to its
//! streaming-service URLs up front, one lookup at a time (the availability
//! service rate-limits and assumes a single in-flight request), so the
//! concurrent download phase never has to wait on lockstep lookups.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::lookup::TrackLookup;

/// Pre-fetched streaming URLs for one track.
///
/// Exactly one of two shapes: `error: Some(..)` with no URLs, or
/// `error: None` with whatever services carry the track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUrlResult {
    pub track_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tidal_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qobuz_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub has_urls: bool,
}

/// Aggregate outcome of one batch prefetch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUrlResult {
    /// One entry per distinct input id; duplicates keep the last result.
    pub results: HashMap<String, TrackUrlResult>,
    /// Tracks whose lookup succeeded (counting duplicate ids per occurrence).
    pub total_fetched: usize,
    /// Tracks whose lookup failed (counting duplicate ids per occurrence).
    pub total_failed: usize,
    /// Wall-clock time for the whole batch, in milliseconds.
    pub fetch_time_ms: u64,
}

/// Fetch streaming URLs for every track id, strictly in order and one at a
/// time.
///
/// A failed lookup is recorded in that track's result and never aborts the
/// batch; the function always returns a populated `BatchUrlResult` with
/// `total_fetched + total_failed == track_ids.len()`.
///
/// `progress_cb` is invoked synchronously once per track, after that track's
/// result is determined and before the next lookup starts, with the 1-based
/// index and the total count. It must return quickly or it stalls the batch.
pub fn prefetch_streaming_urls(
    lookup: &dyn TrackLookup,
    track_ids: &[String],
    mut progress_cb: Option<&mut dyn FnMut(usize, usize)>,
) -> BatchUrlResult {
    let start = Instant::now();
    let total = track_ids.len();
    let mut results: HashMap<String, TrackUrlResult> = HashMap::with_capacity(total);
    let mut total_failed = 0usize;

    for (i, track_id) in track_ids.iter().enumerate() {
        let result = match lookup.check_availability(track_id, "") {
            Ok(availability) => {
                let mut result = TrackUrlResult {
                    track_id: track_id.clone(),
                    tidal_url: availability.tidal_url,
                    amazon_url: availability.amazon_url,
                    qobuz_id: None,
                    error: None,
                    has_urls: false,
                };
                if availability.qobuz {
                    // The service only reports Qobuz support; stash the track
                    // id as a placeholder until the download phase resolves
                    // the real catalog identifier.
                    result.qobuz_id = Some(track_id.clone());
                }
                result.has_urls = result.tidal_url.is_some()
                    || result.amazon_url.is_some()
                    || result.qobuz_id.is_some();
                tracing::debug!(
                    track_id = %track_id,
                    has_urls = result.has_urls,
                    "prefetched streaming URLs"
                );
                result
            }
            Err(err) => {
                total_failed += 1;
                tracing::warn!(track_id = %track_id, error = %err, "streaming URL lookup failed");
                TrackUrlResult {
                    track_id: track_id.clone(),
                    tidal_url: None,
                    amazon_url: None,
                    qobuz_id: None,
                    error: Some(format!("failed to get URLs: {err}")),
                    has_urls: false,
                }
            }
        };

        // Duplicate ids overwrite; counters still count every occurrence.
        results.insert(track_id.clone(), result);

        if let Some(cb) = progress_cb.as_mut() {
            cb(i + 1, total);
        }
    }

    BatchUrlResult {
        results,
        total_fetched: total - total_failed,
        total_failed,
        fetch_time_ms: start.elapsed().as_millis() as u64,
    }
}
