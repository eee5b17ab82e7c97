// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::SystemTime;

/// The single persisted `(payload, timestamp)` pair held by a cache slot.
///
/// # Examples
///
/// ```
/// use feedcache_store::CachedSnapshot;
/// use std::time::SystemTime;
///
/// let snapshot = CachedSnapshot::new(vec![1, 2, 3], SystemTime::UNIX_EPOCH);
/// assert_eq!(snapshot.payload(), &vec![1, 2, 3]);
/// assert_eq!(snapshot.timestamp(), SystemTime::UNIX_EPOCH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedSnapshot<T> {
    payload: T,
    timestamp: SystemTime,
}

impl<T> CachedSnapshot<T> {
    /// Creates a snapshot of `payload` taken at `timestamp`.
    #[must_use]
    pub fn new(payload: T, timestamp: SystemTime) -> Self {
        Self { payload, timestamp }
    }

    /// Returns the cached payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns the instant the snapshot was saved.
    #[must_use]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Consumes the snapshot and returns the payload.
    #[must_use]
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Consumes the snapshot and returns both parts.
    #[must_use]
    pub fn into_parts(self) -> (T, SystemTime) {
        (self.payload, self.timestamp)
    }
}
