// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The local cache orchestrator.
//!
//! [`LocalLoader`] sequences store operations to implement load, save and
//! validate for one cached resource, judging freshness with a
//! [`CachePolicy`] and the injected clock.

use std::{
    marker::PhantomData,
    sync::{Arc, Weak},
};

use feedcache_store::{CachedSnapshot, Error, FeedImage, Loader, ResourceCache, SnapshotStore};
use tick::Clock;
use tokio::task::JoinHandle;

use crate::{
    CachePolicy, LocalLoaderBuilder,
    telemetry::{CacheActivity, CacheName, record},
};

/// A [`LocalLoader`] for the feed.
pub type LocalFeedLoader<S> = LocalLoader<Vec<FeedImage>, S>;

/// Loads, saves and validates a cached `T` held in a [`SnapshotStore`].
///
/// - `load` returns the cached payload while it is fresh, and an empty
///   `T::default()` when nothing is cached or the snapshot is stale. A stale
///   snapshot is left in the store; only `validate_cache` removes it.
/// - `save` deletes the current snapshot, then inserts the new one stamped
///   with the clock's current time. A failed delete aborts the save.
/// - `validate_cache` deletes the snapshot if it is stale or unreadable.
///   Failures are logged, never returned.
///
/// The loader does not serialize its own operations; ordering between
/// concurrent calls is whatever the store guarantees.
///
/// Clones share the store and the liveness token used by the `*_detached`
/// operations.
///
/// # Examples
///
/// ```
/// use feedcache::LocalFeedLoader;
/// use feedcache_memory::InMemoryFeedStore;
/// use feedcache_store::FeedImage;
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let loader = LocalFeedLoader::new(InMemoryFeedStore::new(), Clock::new_frozen());
/// let feed = vec![FeedImage::new(uuid::Uuid::nil(), "https://a-url.com/a.png".parse()?)];
///
/// loader.save(feed.clone()).await?;
/// assert_eq!(loader.load().await?, feed);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
pub struct LocalLoader<T, S> {
    core: Arc<Core<S>>,
    alive: Arc<()>,
    _payload: PhantomData<fn() -> T>,
}

struct Core<S> {
    name: CacheName,
    store: S,
    policy: CachePolicy,
    clock: Clock,
}

impl<T, S> std::fmt::Debug for LocalLoader<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLoader")
            .field("name", &self.core.name)
            .field("policy", &self.core.policy)
            .finish_non_exhaustive()
    }
}

impl<T, S> Clone for LocalLoader<T, S> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            alive: Arc::clone(&self.alive),
            _payload: PhantomData,
        }
    }
}

impl<T, S> LocalLoader<T, S> {
    /// Returns a builder for a loader over `store` that reads time from `clock`.
    pub fn builder(store: S, clock: Clock) -> LocalLoaderBuilder<T, S> {
        LocalLoaderBuilder::new(store, clock)
    }

    /// Creates a loader with the default name and policy.
    #[must_use]
    pub fn new(store: S, clock: Clock) -> Self {
        Self::builder(store, clock).build()
    }

    pub(crate) fn from_parts(name: CacheName, store: S, policy: CachePolicy, clock: Clock) -> Self {
        Self {
            core: Arc::new(Core {
                name,
                store,
                policy,
                clock,
            }),
            alive: Arc::new(()),
            _payload: PhantomData,
        }
    }

    /// Returns the name this loader reports in its events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.core.name
    }

    /// Returns the freshness policy.
    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.core.policy
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.core.store
    }
}

impl<T, S> LocalLoader<T, S>
where
    T: Default + Send,
    S: SnapshotStore<T>,
{
    /// Returns the cached payload if it is fresh, or an empty payload.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the snapshot cannot be retrieved.
    pub async fn load(&self) -> Result<T, Error> {
        self.core.load().await
    }

    /// Replaces the cached snapshot with `payload`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the old snapshot cannot be deleted, in
    /// which case nothing is inserted, or if the insert fails.
    pub async fn save(&self, payload: T) -> Result<(), Error> {
        self.core.save(payload).await
    }

    /// Deletes the cached snapshot if it is stale or cannot be read.
    pub async fn validate_cache(&self) {
        self.core.validate_cache::<T>().await;
    }
}

impl<T, S> LocalLoader<T, S>
where
    T: Default + Send + 'static,
    S: SnapshotStore<T> + 'static,
{
    /// Runs [`load`](Self::load) on the Tokio runtime and hands the result to `completion`.
    ///
    /// If every clone of this loader has been dropped by the time the store
    /// answers, `completion` is not called.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn load_detached<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<T, Error>) + Send + 'static,
    {
        let core = Arc::clone(&self.core);
        let alive = Arc::downgrade(&self.alive);
        tokio::spawn(async move {
            let result = core.load::<T>().await;
            deliver(core.name, &alive, || completion(result));
        })
    }

    /// Runs [`save`](Self::save) on the Tokio runtime and hands the result to `completion`.
    ///
    /// If every clone of this loader has been dropped by the time the store
    /// answers, `completion` is not called. The store operations already
    /// issued still run to completion.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn save_detached<F>(&self, payload: T, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), Error>) + Send + 'static,
    {
        let core = Arc::clone(&self.core);
        let alive = Arc::downgrade(&self.alive);
        tokio::spawn(async move {
            let result = core.save(payload).await;
            deliver(core.name, &alive, || completion(result));
        })
    }

    /// Runs [`validate_cache`](Self::validate_cache) on the Tokio runtime and
    /// calls `completion` when it is done.
    ///
    /// If every clone of this loader has been dropped by then, `completion`
    /// is not called.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn validate_cache_detached<F>(&self, completion: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let core = Arc::clone(&self.core);
        let alive = Arc::downgrade(&self.alive);
        tokio::spawn(async move {
            core.validate_cache::<T>().await;
            deliver(core.name, &alive, completion);
        })
    }
}

impl<T, S> Loader<(), T> for LocalLoader<T, S>
where
    T: Default + Send,
    S: SnapshotStore<T>,
{
    async fn load(&self, _key: &()) -> Result<T, Error> {
        self.core.load().await
    }
}

impl<T, S> ResourceCache<(), T> for LocalLoader<T, S>
where
    T: Default + Send,
    S: SnapshotStore<T>,
{
    async fn save(&self, _key: &(), value: T) -> Result<(), Error> {
        self.core.save(value).await
    }
}

fn deliver(name: CacheName, alive: &Weak<()>, completion: impl FnOnce()) {
    // Holding the upgraded token keeps the loader counted as alive until the
    // completion returns.
    if let Some(_alive) = alive.upgrade() {
        completion();
    } else {
        record(name, CacheActivity::Released, None);
    }
}

impl<S> Core<S> {
    fn is_fresh<T>(&self, snapshot: &CachedSnapshot<T>) -> bool {
        self.policy.is_fresh(snapshot.timestamp(), self.clock.system_time())
    }

    async fn load<T>(&self) -> Result<T, Error>
    where
        T: Default,
        S: SnapshotStore<T>,
    {
        match self.store.retrieve().await {
            Ok(Some(snapshot)) if self.is_fresh(&snapshot) => {
                record(self.name, CacheActivity::Hit, None);
                Ok(snapshot.into_payload())
            }
            Ok(Some(_)) => {
                record(self.name, CacheActivity::Expired, None);
                Ok(T::default())
            }
            Ok(None) => {
                record(self.name, CacheActivity::Empty, None);
                Ok(T::default())
            }
            Err(e) => {
                record(self.name, CacheActivity::Error, Some(&e));
                Err(e)
            }
        }
    }

    async fn save<T>(&self, payload: T) -> Result<(), Error>
    where
        T: Send,
        S: SnapshotStore<T>,
    {
        if let Err(e) = self.store.delete().await {
            record(self.name, CacheActivity::Error, Some(&e));
            return Err(e);
        }

        let timestamp = self.clock.system_time();
        if let Err(e) = self.store.insert(payload, timestamp).await {
            record(self.name, CacheActivity::Error, Some(&e));
            return Err(e);
        }

        record(self.name, CacheActivity::Saved, None);
        Ok(())
    }

    async fn validate_cache<T>(&self)
    where
        S: SnapshotStore<T>,
    {
        match self.store.retrieve().await {
            Ok(None) => return,
            Ok(Some(snapshot)) if self.is_fresh(&snapshot) => return,
            Ok(Some(_)) => record(self.name, CacheActivity::Expired, None),
            Err(e) => record(self.name, CacheActivity::Error, Some(&e)),
        }

        match self.store.delete().await {
            Ok(()) => record(self.name, CacheActivity::Purged, None),
            Err(e) => record(self.name, CacheActivity::PurgeFailed, Some(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use feedcache_store::testing::{StoreOp, StoreSpy, unique_feed};
    use tick::ClockControl;

    use super::*;
    use crate::{DEFAULT_MAX_AGE, telemetry::testing::LogCapture};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn make_loader(store: &StoreSpy<Vec<FeedImage>>) -> LocalFeedLoader<StoreSpy<Vec<FeedImage>>> {
        LocalFeedLoader::builder(store.clone(), Clock::new_frozen_at(now()))
            .name("feed")
            .build()
    }

    #[test]
    fn creation_issues_no_store_operations() {
        let store = StoreSpy::new();
        let _loader = make_loader(&store);
        assert!(store.operations().is_empty());
    }

    #[test]
    fn load_logs_hit_for_fresh_snapshot() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let store = StoreSpy::with_snapshot(unique_feed(), now());

        let feed = block_on(make_loader(&store).load()).expect("load failed");

        assert_eq!(feed.len(), 2);
        capture.assert_contains("feedcache.hit");
        capture.assert_contains("feed");
    }

    #[test]
    fn load_logs_expired_for_stale_snapshot() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let store = StoreSpy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE);

        let feed = block_on(make_loader(&store).load()).expect("load failed");

        assert!(feed.is_empty());
        capture.assert_contains("feedcache.expired");
    }

    #[test]
    fn save_timestamps_with_time_after_delete() {
        let control = ClockControl::new_at(now());
        let store = StoreSpy::new();
        let loader = LocalFeedLoader::new(store.clone(), control.to_clock());
        let feed = unique_feed();

        control.advance(Duration::from_secs(30));
        block_on(loader.save(feed.clone())).expect("save failed");

        assert_eq!(
            store.operations(),
            vec![
                StoreOp::Delete,
                StoreOp::Insert {
                    payload: feed,
                    timestamp: now() + Duration::from_secs(30),
                },
            ]
        );
    }

    #[test]
    fn validate_logs_purge_failure_without_returning_it() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let store = StoreSpy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE);
        store.fail_when(|op| matches!(op, StoreOp::Delete));

        block_on(make_loader(&store).validate_cache());

        capture.assert_contains("feedcache.purge_failed");
        assert!(store.has_snapshot());
    }

    #[test]
    fn trait_impls_delegate_to_core() {
        let store = StoreSpy::new();
        let loader = make_loader(&store);
        let feed = unique_feed();

        block_on(ResourceCache::save(&loader, &(), feed.clone())).expect("save failed");
        let loaded = block_on(Loader::load(&loader, &())).expect("load failed");

        assert_eq!(loaded, feed);
    }

    #[test]
    fn accessors_and_debug() {
        let store = StoreSpy::<Vec<FeedImage>>::new();
        let loader = make_loader(&store);
        let clone = loader.clone();

        assert_eq!(clone.name(), "feed");
        assert_eq!(clone.policy(), CachePolicy::default());
        assert!(!clone.store().has_snapshot());
        assert!(format!("{loader:?}").contains("LocalLoader"));
    }
}
