// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Two-level failover between loaders.

use feedcache_store::{Error, Loader};

use crate::telemetry::{CacheActivity, CacheName, record};

const DEFAULT_NAME: CacheName = "fallback";

/// Loads from a primary loader, and from a secondary loader if that fails.
///
/// A primary success is returned as is and the secondary is never asked. On
/// a primary failure the secondary's result is returned, whatever it is; the
/// primary's error is logged and discarded. There is no third level, but a
/// `FallbackLoader` can itself be the secondary of another.
///
/// # Cancellation
///
/// Dropping the load future drops whichever inner load is in flight: the
/// primary's before failover, the secondary's after it.
///
/// # Examples
///
/// ```
/// use feedcache::FallbackLoader;
/// use feedcache_store::{Error, Loader, testing::LoaderSpy};
/// # futures::executor::block_on(async {
///
/// let primary = LoaderSpy::<(), &str>::returning(|_| Err(Error::connectivity("offline")));
/// let secondary = LoaderSpy::<(), &str>::returning(|_| Ok("cached"));
/// let loader = FallbackLoader::new(primary, secondary);
///
/// assert_eq!(loader.load(&()).await?, "cached");
/// # Ok::<(), Error>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct FallbackLoader<P, S> {
    name: CacheName,
    primary: P,
    secondary: S,
}

impl<P, S> FallbackLoader<P, S> {
    /// Creates a loader that tries `primary`, then `secondary`.
    #[must_use]
    pub fn new(primary: P, secondary: S) -> Self {
        Self {
            name: DEFAULT_NAME,
            primary,
            secondary,
        }
    }

    /// Sets the name this loader reports in its events.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns the primary loader.
    #[must_use]
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Returns the secondary loader.
    #[must_use]
    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<K, V, P, S> Loader<K, V> for FallbackLoader<P, S>
where
    K: Sync,
    V: Send,
    P: Loader<K, V>,
    S: Loader<K, V>,
{
    async fn load(&self, key: &K) -> Result<V, Error> {
        match self.primary.load(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                record(self.name, CacheActivity::Fallback, Some(&e));
                Box::pin(self.secondary.load(key)).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use feedcache_store::{ErrorKind, testing::LoaderSpy};
    use futures::FutureExt;

    use super::*;
    use crate::telemetry::testing::LogCapture;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn primary_success_skips_secondary() {
        let primary = LoaderSpy::<(), u8>::returning(|_| Ok(1));
        let secondary = LoaderSpy::<(), u8>::returning(|_| Ok(2));
        let loader = FallbackLoader::new(primary, secondary);

        assert_eq!(block_on(loader.load(&())).expect("load failed"), 1);
        assert_eq!(loader.secondary().request_count(), 0);
    }

    #[test]
    fn primary_failure_delivers_secondary_success() {
        let primary = LoaderSpy::<(), u8>::returning(|_| Err(Error::connectivity("offline")));
        let secondary = LoaderSpy::<(), u8>::returning(|_| Ok(2));
        let loader = FallbackLoader::new(primary, secondary);

        assert_eq!(block_on(loader.load(&())).expect("load failed"), 2);
        assert_eq!(loader.primary().request_count(), 1);
        assert_eq!(loader.secondary().request_count(), 1);
    }

    #[test]
    fn both_failing_delivers_secondary_error() {
        let primary = LoaderSpy::<(), u8>::returning(|_| Err(Error::connectivity("offline")));
        let secondary = LoaderSpy::<(), u8>::returning(|_| Err(Error::not_found()));
        let loader = FallbackLoader::new(primary, secondary);

        let error = block_on(loader.load(&())).expect_err("load should fail");

        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn secondary_starts_only_after_primary_fails() {
        let primary = LoaderSpy::<(), u8>::new();
        let secondary = LoaderSpy::<(), u8>::new();
        let loader = FallbackLoader::new(primary.clone(), secondary.clone());
        let mut load = loader.load(&()).boxed();

        assert!((&mut load).now_or_never().is_none());
        assert_eq!(primary.request_count(), 1);
        assert_eq!(secondary.request_count(), 0);

        primary.complete(0, Err(Error::connectivity("offline")));
        assert!((&mut load).now_or_never().is_none());
        assert_eq!(secondary.request_count(), 1);

        secondary.complete(0, Ok(5));
        assert_eq!(block_on(load).expect("load failed"), 5);
    }

    #[test]
    fn dropping_before_failover_cancels_primary() {
        let primary = LoaderSpy::<(), u8>::new();
        let secondary = LoaderSpy::<(), u8>::new();
        let loader = FallbackLoader::new(primary.clone(), secondary.clone());
        let mut load = loader.load(&()).boxed();
        assert!((&mut load).now_or_never().is_none());

        drop(load);

        assert_eq!(primary.cancelled(), vec![0]);
        assert_eq!(secondary.request_count(), 0);
    }

    #[test]
    fn dropping_after_failover_cancels_secondary() {
        let primary = LoaderSpy::<(), u8>::new();
        let secondary = LoaderSpy::<(), u8>::new();
        let loader = FallbackLoader::new(primary.clone(), secondary.clone());
        let mut load = loader.load(&()).boxed();
        assert!((&mut load).now_or_never().is_none());
        primary.complete(0, Err(Error::connectivity("offline")));
        assert!((&mut load).now_or_never().is_none());

        drop(load);

        assert!(primary.cancelled().is_empty());
        assert_eq!(secondary.cancelled(), vec![0]);
    }

    #[test]
    fn failover_is_logged() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let primary = LoaderSpy::<(), u8>::returning(|_| Err(Error::connectivity("offline")));
        let secondary = LoaderSpy::<(), u8>::returning(|_| Ok(2));
        let loader = FallbackLoader::new(primary, secondary).with_name("feed_fallback");

        let _ = block_on(loader.load(&()));

        capture.assert_contains("feedcache.fallback");
        capture.assert_contains("feed_fallback");
        capture.assert_contains("connectivity");
    }
}
