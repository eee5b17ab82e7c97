// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! JSON file backend for the offline-first feed cache.
//!
//! [`JsonFileStore`] keeps the cached feed in one file on disk. A missing
//! file reads as an empty store; a file that cannot be decoded is an error
//! rather than an empty result, so corruption is never mistaken for a cold
//! cache.
//!
//! ```no_run
//! use feedcache_file::JsonFileStore;
//! use feedcache_store::SnapshotStore;
//!
//! # futures::executor::block_on(async {
//! let store = JsonFileStore::new("feed.json")?;
//! if let Some(snapshot) = store.retrieve().await? {
//!     println!("{} images cached", snapshot.payload().len());
//! }
//! # Ok::<(), feedcache_store::Error>(())
//! # });
//! ```

mod codec;
pub mod store;
mod worker;

#[doc(inline)]
pub use store::JsonFileStore;
