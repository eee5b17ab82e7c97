// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`LocalLoader`].

use std::{marker::PhantomData, time::Duration};

use tick::Clock;

use crate::{CachePolicy, LocalLoader, telemetry::CacheName};

const DEFAULT_NAME: CacheName = "local";

/// Configures and creates a [`LocalLoader`].
///
/// Created by [`LocalLoader::builder`]. The store and clock are required;
/// everything else has a default.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use feedcache::LocalFeedLoader;
/// use feedcache_memory::InMemoryFeedStore;
/// use tick::Clock;
///
/// let clock = Clock::new_frozen();
/// let loader = LocalFeedLoader::builder(InMemoryFeedStore::new(), clock)
///     .name("feed")
///     .max_age(Duration::from_secs(24 * 60 * 60))
///     .build();
///
/// assert_eq!(loader.name(), "feed");
/// assert_eq!(loader.policy().max_age(), Duration::from_secs(86_400));
/// ```
pub struct LocalLoaderBuilder<T, S> {
    name: CacheName,
    store: S,
    clock: Clock,
    policy: CachePolicy,
    _payload: PhantomData<fn() -> T>,
}

impl<T, S> std::fmt::Debug for LocalLoaderBuilder<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLoaderBuilder")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T, S> LocalLoaderBuilder<T, S> {
    pub(crate) fn new(store: S, clock: Clock) -> Self {
        Self {
            name: DEFAULT_NAME,
            store,
            clock,
            policy: CachePolicy::default(),
            _payload: PhantomData,
        }
    }

    /// Sets the name this loader reports in its events.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Sets how long a saved snapshot stays fresh.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.policy = CachePolicy::new(max_age);
        self
    }

    /// Replaces the freshness policy.
    #[must_use]
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates the loader.
    #[must_use]
    pub fn build(self) -> LocalLoader<T, S> {
        LocalLoader::from_parts(self.name, self.store, self.policy, self.clock)
    }
}
