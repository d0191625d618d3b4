//! Seam for the external streaming-availability lookup service.
//!
//! The prefetch core only depends on this trait; the concrete client (HTTP,
//! caching, rate limiting) lives elsewhere and is consumed as an opaque,
//! already-throttled capability.

use thiserror::Error;

/// Which streaming services carry a track, as reported by the lookup service.
#[derive(Debug, Clone, Default)]
pub struct TrackAvailability {
    /// Direct Tidal URL, if the track is on Tidal.
    pub tidal_url: Option<String>,
    /// Direct Amazon Music URL, if available.
    pub amazon_url: Option<String>,
    /// True when Qobuz carries the track. The service reports support only;
    /// the catalog identifier is resolved later, during download.
    pub qobuz: bool,
}

/// Failure from a single availability lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Network-level failure (timeout, DNS, connection reset).
    #[error("network: {0}")]
    Network(String),
    /// The service does not know the track id.
    #[error("track not found")]
    NotFound,
    /// Anything else the client surfaces.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait implemented by the availability client.
///
/// Implementations are expected to rate-limit themselves; the prefetch loop
/// assumes one in-flight request at a time and adds no throttling of its own.
/// `hint` carries an optional service-specific hint and may be empty.
pub trait TrackLookup {
    fn check_availability(
        &self,
        track_id: &str,
        hint: &str,
    ) -> Result<TrackAvailability, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_default_is_empty() {
        let availability = TrackAvailability::default();
        assert!(availability.tidal_url.is_none());
        assert!(availability.amazon_url.is_none());
        assert!(!availability.qobuz);
    }

    #[test]
    fn lookup_error_messages() {
        assert_eq!(LookupError::Http(429).to_string(), "HTTP 429");
        assert_eq!(
            LookupError::Network("connection reset".into()).to_string(),
            "network: connection reset"
        );
        assert_eq!(LookupError::NotFound.to_string(), "track not found");
    }
}
