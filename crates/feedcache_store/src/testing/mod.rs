// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test doubles and fixtures for code built on the store contracts.
//!
//! [`StoreSpy`] is a working in-memory store that records every operation it
//! receives and can be told to fail selected operations. [`LoaderSpy`] stands
//! in for a remote or local source. [`specs`] holds the contract checks that
//! every real backend runs against itself.

use std::{collections::HashMap, future::ready, sync::Arc, time::SystemTime};

use bytes::Bytes;
use http::Uri;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{CachedSnapshot, Error, FeedImage, ImageDataStore, SnapshotStore};

mod loader;
pub mod specs;

pub use loader::LoaderSpy;

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<T> {
    /// A snapshot retrieval.
    Retrieve,
    /// A snapshot insertion.
    Insert {
        /// The payload that was inserted.
        payload: T,
        /// The timestamp the payload was inserted with.
        timestamp: SystemTime,
    },
    /// A snapshot deletion.
    Delete,
    /// An image data retrieval for the given URL.
    RetrieveData(Uri),
    /// An image data insertion.
    InsertData {
        /// The URL the data was stored for.
        url: Uri,
        /// The bytes that were stored.
        data: Bytes,
    },
}

type FailPredicate<T> = Box<dyn Fn(&StoreOp<T>) -> bool + Send + Sync>;

struct SpyState<T> {
    snapshot: Option<CachedSnapshot<T>>,
    images: HashMap<Uri, Bytes>,
}

/// A recording store for tests.
///
/// The spy behaves like a real store: inserted snapshots and image bytes can
/// be retrieved again. Every operation is recorded, including the ones that
/// fail, so tests can assert on the exact sequence the code under test issued.
///
/// Clones share state, which lets a test keep a handle while handing another
/// to the code under test.
///
/// # Examples
///
/// ```
/// use feedcache_store::testing::{StoreOp, StoreSpy};
/// use feedcache_store::SnapshotStore;
/// # futures::executor::block_on(async {
///
/// let store = StoreSpy::<Vec<u8>>::new();
/// store.fail_when(|op| matches!(op, StoreOp::Delete));
///
/// assert!(store.delete().await.is_err());
/// assert_eq!(store.operations(), vec![StoreOp::Delete]);
/// # });
/// ```
pub struct StoreSpy<T> {
    state: Arc<Mutex<SpyState<T>>>,
    operations: Arc<Mutex<Vec<StoreOp<T>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<T>>>>,
}

impl<T> std::fmt::Debug for StoreSpy<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSpy")
            .field("snapshot", &self.state.lock().snapshot)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Clone for StoreSpy<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<T> Default for StoreSpy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StoreSpy<T> {
    /// Creates an empty spy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SpyState {
                snapshot: None,
                images: HashMap::new(),
            })),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a spy already holding `payload` saved at `timestamp`.
    ///
    /// Seeding is not recorded as an operation.
    #[must_use]
    pub fn with_snapshot(payload: T, timestamp: SystemTime) -> Self {
        let spy = Self::new();
        spy.state.lock().snapshot = Some(CachedSnapshot::new(payload, timestamp));
        spy
    }

    /// Returns `true` if the spy currently holds a snapshot.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.state.lock().snapshot.is_some()
    }
}

impl<T> StoreSpy<T>
where
    T: Clone,
{
    /// Sets a predicate that decides which operations fail.
    ///
    /// A failing operation is still recorded but leaves the stored state
    /// untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<T>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns the current snapshot without recording an operation.
    #[must_use]
    pub fn snapshot(&self) -> Option<CachedSnapshot<T>> {
        self.state.lock().snapshot.clone()
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<T>> {
        self.operations.lock().clone()
    }

    /// Returns how many recorded operations match `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&StoreOp<T>) -> bool) -> usize {
        self.operations.lock().iter().filter(|op| predicate(op)).count()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp<T>) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        let outcome = if fail {
            Err(match op {
                StoreOp::Retrieve | StoreOp::RetrieveData(_) => Error::store_read("spy: retrieve failed"),
                StoreOp::Insert { .. } | StoreOp::InsertData { .. } => Error::store_write("spy: insert failed"),
                StoreOp::Delete => Error::store_write("spy: delete failed"),
            })
        } else {
            Ok(())
        };
        self.operations.lock().push(op);
        outcome
    }
}

impl<T> SnapshotStore<T> for StoreSpy<T>
where
    T: Clone + Send,
{
    fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<T>>, Error>> + Send {
        let outcome = self.record(StoreOp::Retrieve).map(|()| self.state.lock().snapshot.clone());
        ready(outcome)
    }

    fn insert(&self, payload: T, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send {
        let outcome = self
            .record(StoreOp::Insert {
                payload: payload.clone(),
                timestamp,
            })
            .map(|()| self.state.lock().snapshot = Some(CachedSnapshot::new(payload, timestamp)));
        ready(outcome)
    }

    fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send {
        let outcome = self.record(StoreOp::Delete).map(|()| self.state.lock().snapshot = None);
        ready(outcome)
    }
}

impl<T> ImageDataStore for StoreSpy<T>
where
    T: Clone + Send,
{
    fn retrieve_data(&self, url: &Uri) -> impl Future<Output = Result<Option<Bytes>, Error>> + Send {
        let outcome = self
            .record(StoreOp::RetrieveData(url.clone()))
            .map(|()| self.state.lock().images.get(url).cloned());
        ready(outcome)
    }

    fn insert_data(&self, url: &Uri, data: Bytes) -> impl Future<Output = Result<(), Error>> + Send {
        let outcome = self
            .record(StoreOp::InsertData {
                url: url.clone(),
                data: data.clone(),
            })
            .map(|()| {
                self.state.lock().images.insert(url.clone(), data);
            });
        ready(outcome)
    }
}

/// Returns a URL that is valid but points nowhere in particular.
#[must_use]
pub fn any_url() -> Uri {
    Uri::from_static("https://any-url.com/")
}

/// Returns a feed item with a random id and a URL derived from it.
///
/// # Panics
///
/// Never in practice: the generated URL is always well formed.
#[must_use]
pub fn unique_image() -> FeedImage {
    let id = Uuid::new_v4();
    let url = format!("https://a-url.com/{id}.png")
        .parse()
        .expect("generated URL must be valid");
    FeedImage::new(id, url)
        .with_description("any description")
        .with_location("any location")
}

/// Returns two distinct feed items.
#[must_use]
pub fn unique_feed() -> Vec<FeedImage> {
    vec![unique_image(), unique_image()]
}
