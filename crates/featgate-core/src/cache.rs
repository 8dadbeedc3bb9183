//! In-memory caching over an opaque byte source.
//!
//! The resolution engine itself never performs network I/O; whatever feeds
//! it definition bytes is abstracted behind [`ByteSource`]. [`CachedSource`]
//! memoizes such a source for a bounded freshness window so repeated
//! resolutions do not refetch.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

/// Provider of raw bytes for opaque identities.
pub trait ByteSource {
    /// Fetches the bytes behind `identity`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the identity cannot be
    /// materialized.
    fn fetch(&self, identity: &str) -> io::Result<Vec<u8>>;
}

/// Expiry policy for cached entries.
///
/// An entry is fresh while its age is at most `max_age`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    pub max_age: Duration,
}

impl Freshness {
    /// Default freshness window.
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60);

    /// Creates a policy with the given window.
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Returns `true` if an entry of the given age is still usable.
    #[must_use]
    pub fn is_fresh(&self, age: Duration) -> bool {
        age <= self.max_age
    }
}

impl Default for Freshness {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_AGE)
    }
}

struct CacheEntry {
    fetched_at: Instant,
    bytes: Vec<u8>,
}

/// Memoizing wrapper around a byte source.
///
/// Serves fresh entries from memory and delegates misses to the inner
/// source. An expired entry is refetched; a failed refetch propagates the
/// error and leaves the old entry in place for the next attempt.
pub struct CachedSource<S> {
    inner: S,
    freshness: Freshness,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<S: ByteSource> CachedSource<S> {
    /// Wraps `inner` with the default freshness window.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_freshness(inner, Freshness::default())
    }

    /// Wraps `inner` with an explicit freshness policy.
    #[must_use]
    pub fn with_freshness(inner: S, freshness: Freshness) -> Self {
        Self {
            inner,
            freshness,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<S: ByteSource> ByteSource for CachedSource<S> {
    fn fetch(&self, identity: &str) -> io::Result<Vec<u8>> {
        {
            let entries = self.entries.lock();
            if let Some(entry) = entries.get(identity) {
                if self.freshness.is_fresh(entry.fetched_at.elapsed()) {
                    trace!(identity, "Serving cached bytes");
                    return Ok(entry.bytes.clone());
                }
            }
        }

        trace!(identity, "Fetching bytes from source");
        let bytes = self.inner.fetch(identity)?;
        self.entries.lock().insert(
            identity.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                bytes: bytes.clone(),
            },
        );
        Ok(bytes)
    }
}
