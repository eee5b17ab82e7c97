// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The storage contracts every backend implements.
//!
//! Backends own the persisted bytes. Callers only ever see snapshots and
//! typed errors, never the storage medium.

use std::{sync::Arc, time::SystemTime};

use bytes::Bytes;
use http::Uri;

use crate::{CachedSnapshot, Error};

/// A single-slot store holding at most one [`CachedSnapshot`].
///
/// # Contract
///
/// - Each operation is atomic from the caller's point of view.
/// - Operations issued against one store instance run in issue order and
///   never overlap, so a `retrieve` racing a `delete` + `insert` observes the
///   fully old or the fully new snapshot. An operation is issued when its
///   method is called, not when its future is first polled.
/// - `insert` replaces the current snapshot entirely.
/// - `delete` on an empty store succeeds.
/// - `retrieve` reports an unreadable or corrupt medium as an error, never as
///   an empty store.
/// - Futures may be resolved from any thread. Once issued, an operation is
///   not cancellable; dropping the future only discards the outcome.
pub trait SnapshotStore<T>: Send + Sync {
    /// Returns the current snapshot, or `None` if the store is empty.
    fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<T>>, Error>> + Send;

    /// Replaces the current snapshot with `payload` taken at `timestamp`.
    fn insert(&self, payload: T, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send;

    /// Clears the current snapshot.
    fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// A per-URL store of raw image bytes.
///
/// Inserting for a URL overwrites whatever was stored for it. Entries never
/// expire and are never evicted.
pub trait ImageDataStore: Send + Sync {
    /// Returns the bytes stored for `url`, if any.
    fn retrieve_data(&self, url: &Uri) -> impl Future<Output = Result<Option<Bytes>, Error>> + Send;

    /// Stores `data` for `url`.
    fn insert_data(&self, url: &Uri, data: Bytes) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<T, S> SnapshotStore<T> for Arc<S>
where
    S: SnapshotStore<T>,
{
    fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<T>>, Error>> + Send {
        (**self).retrieve()
    }

    fn insert(&self, payload: T, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).insert(payload, timestamp)
    }

    fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).delete()
    }
}

impl<S> ImageDataStore for Arc<S>
where
    S: ImageDataStore,
{
    fn retrieve_data(&self, url: &Uri) -> impl Future<Output = Result<Option<Bytes>, Error>> + Send {
        (**self).retrieve_data(url)
    }

    fn insert_data(&self, url: &Uri, data: Bytes) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).insert_data(url, data)
    }
}
