// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The structured in-memory store.

use std::{future::ready, sync::Arc, time::SystemTime};

use bytes::Bytes;
use feedcache_store::{CachedSnapshot, Error, FeedImage, ImageDataStore, SnapshotStore};
use http::Uri;
use parking_lot::Mutex;

use crate::records::{ManagedCache, Records};

/// A feed store that keeps its records in memory.
///
/// Inserting a feed first drops the existing cache record, so the store never
/// holds more than one snapshot. Image bytes are indexed by URL and survive
/// feed replacement.
///
/// Clones are handles to the same records, so one store can back several
/// loaders at once.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use feedcache_memory::InMemoryFeedStore;
/// use feedcache_store::ImageDataStore;
/// use http::Uri;
///
/// # futures::executor::block_on(async {
/// let store = InMemoryFeedStore::new();
/// let url = Uri::from_static("https://a-url.com/image.png");
///
/// store.insert_data(&url, Bytes::from_static(b"png")).await?;
/// assert_eq!(store.retrieve_data(&url).await?, Some(Bytes::from_static(b"png")));
/// # Ok::<(), feedcache_store::Error>(())
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryFeedStore {
    records: Arc<Mutex<Records>>,
}

impl InMemoryFeedStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of item records in the current cache record.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.records.lock().cache.as_ref().map_or(0, |cache| cache.feed.len())
    }
}

// Every operation does its work under the lock when called and hands back a
// ready future, so issue order is call order.
impl SnapshotStore<Vec<FeedImage>> for InMemoryFeedStore {
    fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<Vec<FeedImage>>>, Error>> + Send {
        let snapshot = self
            .records
            .lock()
            .cache
            .as_ref()
            .map(|cache| CachedSnapshot::new(cache.local_feed(), cache.timestamp));
        ready(Ok(snapshot))
    }

    fn insert(&self, payload: Vec<FeedImage>, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send {
        let cache = ManagedCache::new(&payload, timestamp);
        self.records.lock().cache = Some(cache);
        ready(Ok(()))
    }

    fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send {
        self.records.lock().cache = None;
        ready(Ok(()))
    }
}

impl ImageDataStore for InMemoryFeedStore {
    fn retrieve_data(&self, url: &Uri) -> impl Future<Output = Result<Option<Bytes>, Error>> + Send {
        ready(Ok(self.records.lock().image_data.get(url).cloned()))
    }

    fn insert_data(&self, url: &Uri, data: Bytes) -> impl Future<Output = Result<(), Error>> + Send {
        self.records.lock().image_data.insert(url.clone(), data);
        ready(Ok(()))
    }
}
