// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Write-through caching for any loader.

use feedcache_store::{Error, Loader, ResourceCache};

use crate::telemetry::{CacheActivity, CacheName, record};

const DEFAULT_NAME: CacheName = "caching";

/// Wraps a [`Loader`] and writes every successful result to a [`ResourceCache`].
///
/// The write's outcome never changes the result: a failed write is logged and
/// the loaded value is still returned. Failed loads pass through untouched and
/// nothing is written. The cache is never read.
///
/// The write is awaited inside `load`, so a successful load returns only once
/// the write has finished and a slow cache delays it. Dropping the load while
/// the write is pending drops the write as well. Once `load` returns, a read
/// from the same cache observes the loaded value.
///
/// # Examples
///
/// ```
/// use feedcache::{CachingLoader, LocalFeedLoader};
/// use feedcache_memory::InMemoryFeedStore;
/// use feedcache_store::{FeedImage, Loader, testing::LoaderSpy};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let cache = LocalFeedLoader::new(InMemoryFeedStore::new(), Clock::new_frozen());
/// let remote = LoaderSpy::<(), Vec<FeedImage>>::returning(|_| Ok(Vec::new()));
/// let loader = CachingLoader::new(remote, cache.clone());
///
/// assert!(loader.load(&()).await?.is_empty());
/// # Ok::<(), feedcache_store::Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct CachingLoader<L, C> {
    name: CacheName,
    loader: L,
    cache: C,
}

impl<L, C> CachingLoader<L, C> {
    /// Creates a loader that saves what `loader` loads into `cache`.
    #[must_use]
    pub fn new(loader: L, cache: C) -> Self {
        Self {
            name: DEFAULT_NAME,
            loader,
            cache,
        }
    }

    /// Sets the name this loader reports in its events.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns the wrapped loader.
    #[must_use]
    pub fn inner(&self) -> &L {
        &self.loader
    }

    /// Returns the cache written to.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<K, V, L, C> Loader<K, V> for CachingLoader<L, C>
where
    K: Sync,
    V: Clone + Send,
    L: Loader<K, V>,
    C: ResourceCache<K, V>,
{
    async fn load(&self, key: &K) -> Result<V, Error> {
        let value = self.loader.load(key).await?;
        if let Err(e) = self.cache.save(key, value.clone()).await {
            record(self.name, CacheActivity::WriteThroughFailed, Some(&e));
        }
        Ok(value)
    }
}
