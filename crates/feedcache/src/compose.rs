// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Ready-made offline-first loader graphs.
//!
//! - The feed goes to the network first. A successful fetch refreshes the
//!   local cache; a failed one serves whatever fresh feed the cache holds.
//! - Image bytes come from the local cache first. A miss goes to the network
//!   and the fetched bytes are cached.

use bytes::Bytes;
use feedcache_store::{FeedImage, Loader};
use http::Uri;

use crate::{CachingLoader, FallbackLoader, LocalFeedLoader, LocalImageDataLoader};

/// The loader graph built by [`feed_loader`].
pub type FeedLoader<R, S> = FallbackLoader<CachingLoader<R, LocalFeedLoader<S>>, LocalFeedLoader<S>>;

/// The loader graph built by [`image_data_loader`].
pub type ImageDataLoader<S, R> = FallbackLoader<LocalImageDataLoader<S>, CachingLoader<R, LocalImageDataLoader<S>>>;

/// Builds a feed loader that prefers `remote` and falls back to `local`.
///
/// Successful remote loads are saved to `local`.
///
/// # Examples
///
/// ```
/// use feedcache::{LocalFeedLoader, compose};
/// use feedcache_memory::InMemoryFeedStore;
/// use feedcache_store::{Error, FeedImage, Loader, testing::LoaderSpy};
/// use tick::Clock;
/// # futures::executor::block_on(async {
///
/// let local = LocalFeedLoader::new(InMemoryFeedStore::new(), Clock::new_frozen());
/// let offline = LoaderSpy::<(), Vec<FeedImage>>::returning(|_| Err(Error::connectivity("offline")));
///
/// let loader = compose::feed_loader(offline, local);
/// assert!(loader.load(&()).await?.is_empty());
/// # Ok::<(), Error>(())
/// # });
/// ```
pub fn feed_loader<R, S>(remote: R, local: LocalFeedLoader<S>) -> FeedLoader<R, S>
where
    R: Loader<(), Vec<FeedImage>>,
{
    let remote = CachingLoader::new(remote, local.clone()).with_name("feed_remote");
    FallbackLoader::new(remote, local).with_name("feed")
}

/// Builds an image data loader that prefers `local` and falls back to `remote`.
///
/// Bytes loaded from `remote` are saved to `local`.
pub fn image_data_loader<S, R>(local: LocalImageDataLoader<S>, remote: R) -> ImageDataLoader<S, R>
where
    S: Clone,
    R: Loader<Uri, Bytes>,
{
    let remote = CachingLoader::new(remote, local.clone()).with_name("image_data_remote");
    FallbackLoader::new(local, remote).with_name("image_data")
}
