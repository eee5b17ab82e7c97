// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Offline-first loading with write-through caching and fallback.
//!
//! This crate builds on the contracts in [`feedcache_store`]:
//! - [`LocalLoader`] loads, saves and validates a cached snapshot, judging
//!   freshness with a [`CachePolicy`] and an injected [`tick::Clock`]
//! - [`CachingLoader`] writes every successful load through to a cache
//! - [`FallbackLoader`] fails over from a primary to a secondary loader
//! - [`remote`] turns HTTP responses into feeds, image bytes and image
//!   comments, and names the API's endpoints
//! - [`compose`] wires these into the usual offline-first graphs
//! - [`spawn_load`] runs a load in the background with a cancel handle
//!
//! Every component emits `tracing` events named `feedcache.*`.
//!
//! # Examples
//!
//! ```
//! use feedcache::{LocalFeedLoader, compose};
//! use feedcache_memory::InMemoryFeedStore;
//! use feedcache_store::{Error, FeedImage, Loader, testing::LoaderSpy};
//! use http::Uri;
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let feed = vec![FeedImage::new(uuid::Uuid::nil(), Uri::from_static("https://a-url.com/a.png"))];
//! let local = LocalFeedLoader::new(InMemoryFeedStore::new(), Clock::new_frozen());
//!
//! // Online: the remote feed is returned and cached.
//! let online = LoaderSpy::<(), Vec<FeedImage>>::returning({
//!     let feed = feed.clone();
//!     move |_| Ok(feed.clone())
//! });
//! assert_eq!(compose::feed_loader(online, local.clone()).load(&()).await?, feed);
//!
//! // Offline: the cached feed is served.
//! let offline = LoaderSpy::<(), Vec<FeedImage>>::returning(|_| Err(Error::connectivity("offline")));
//! assert_eq!(compose::feed_loader(offline, local).load(&()).await?, feed);
//! # Ok::<(), Error>(())
//! # });
//! ```

mod builder;
mod caching;
pub mod compose;
mod fallback;
mod image_data;
mod local;
mod policy;
pub mod remote;
mod task;
mod telemetry;

#[doc(inline)]
pub use builder::LocalLoaderBuilder;
#[doc(inline)]
pub use caching::CachingLoader;
#[doc(inline)]
pub use fallback::FallbackLoader;
#[doc(inline)]
pub use feedcache_store::{
    CachedSnapshot, Error, ErrorKind, FeedImage, ImageComment, ImageDataStore, Loader, ResourceCache, Result,
    SnapshotStore,
};
#[doc(inline)]
pub use image_data::LocalImageDataLoader;
#[doc(inline)]
pub use local::{LocalFeedLoader, LocalLoader};
#[doc(inline)]
pub use policy::{CachePolicy, DEFAULT_MAX_AGE};
#[doc(inline)]
pub use task::{LoadTask, spawn_load};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use feedcache_store::testing;
