// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage contracts for the offline-first feed cache.
//!
//! This crate defines the [`SnapshotStore`] and [`ImageDataStore`] traits that
//! every storage backend must satisfy and the [`Loader`] and [`ResourceCache`]
//! traits that local and remote sources share. It also holds the [`FeedImage`]
//! and [`ImageComment`] models, the [`CachedSnapshot`] a store holds, and the [`Error`] type used by
//! every cache operation.
//!
//! # Overview
//!
//! A snapshot store is a single slot: it holds one `(payload, timestamp)` pair
//! and every `insert` replaces it. Freshness is not the store's concern; the
//! `feedcache` crate decides whether a retrieved snapshot is still usable.
//!
//! # Implementing a Store
//!
//! An operation is issued when its method is called, so a store that does its
//! work synchronously does it before returning the future.
//!
//! ```
//! use std::future::{Future, ready};
//! use std::sync::Mutex;
//! use std::time::SystemTime;
//!
//! use feedcache_store::{CachedSnapshot, Error, SnapshotStore};
//!
//! struct SimpleStore<T>(Mutex<Option<CachedSnapshot<T>>>);
//!
//! impl<T> SnapshotStore<T> for SimpleStore<T>
//! where
//!     T: Clone + Send,
//! {
//!     fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<T>>, Error>> + Send {
//!         ready(self.0.lock().map(|slot| slot.clone()).map_err(|e| Error::store_read(e.to_string())))
//!     }
//!
//!     fn insert(&self, payload: T, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send {
//!         let outcome = self
//!             .0
//!             .lock()
//!             .map(|mut slot| *slot = Some(CachedSnapshot::new(payload, timestamp)))
//!             .map_err(|e| Error::store_write(e.to_string()));
//!         ready(outcome)
//!     }
//!
//!     fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send {
//!         ready(self.0.lock().map(|mut slot| *slot = None).map_err(|e| Error::store_write(e.to_string())))
//!     }
//! }
//! ```
//!
//! # Testing
//!
//! Enable the `test-util` feature for [`testing::StoreSpy`], a recording store
//! with failure injection, [`testing::LoaderSpy`], a loader whose requests are
//! completed by the test, and [`testing::specs`], the contract checks every
//! backend runs in its own test suite.

mod comment;
mod error;
mod image;
mod loader;
mod snapshot;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use comment::ImageComment;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use image::FeedImage;
#[doc(inline)]
pub use loader::{Loader, ResourceCache};
#[doc(inline)]
pub use snapshot::CachedSnapshot;
#[doc(inline)]
pub use store::{ImageDataStore, SnapshotStore};
