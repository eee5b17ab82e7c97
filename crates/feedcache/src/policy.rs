// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Freshness rules for cached snapshots.

use std::time::{Duration, SystemTime};

/// The default maximum age of a cached snapshot: seven days.
///
/// Days are fixed 86 400 second spans. Calendar irregularities such as
/// daylight saving transitions are not taken into account.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Decides whether a cached snapshot is still usable.
///
/// A snapshot taken at `timestamp` is fresh while `now < timestamp + max_age`.
/// The upper bound is exclusive, so a snapshot exactly `max_age` old is stale.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use feedcache::CachePolicy;
///
/// let policy = CachePolicy::default();
/// let saved = SystemTime::UNIX_EPOCH;
///
/// assert!(policy.is_fresh(saved, saved + Duration::from_secs(60)));
/// assert!(!policy.is_fresh(saved, saved + policy.max_age()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    max_age: Duration,
}

impl CachePolicy {
    /// Creates a policy with the given maximum age.
    #[must_use]
    pub const fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Returns the maximum age of a fresh snapshot.
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns `true` if a snapshot taken at `timestamp` is still fresh at `now`.
    ///
    /// A timestamp so far in the future that the expiry overflows is treated
    /// as stale.
    #[must_use]
    pub fn is_fresh(&self, timestamp: SystemTime, now: SystemTime) -> bool {
        timestamp.checked_add(self.max_age).is_some_and(|expiry| now < expiry)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}
