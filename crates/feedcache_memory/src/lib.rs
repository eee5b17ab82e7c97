// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Structured in-memory backend for the offline-first feed cache.
//!
//! [`InMemoryFeedStore`] keeps the feed snapshot as a small record graph: one
//! cache record owning an ordered list of item records. Image bytes live in a
//! URL index next to it. Every operation takes the store's single lock, so
//! operations run one at a time and each one is atomic.
//!
//! # Quick Start
//!
//! ```
//! use feedcache_memory::InMemoryFeedStore;
//! use feedcache_store::SnapshotStore;
//! use std::time::SystemTime;
//!
//! # futures::executor::block_on(async {
//! let store = InMemoryFeedStore::new();
//!
//! store.insert(Vec::new(), SystemTime::UNIX_EPOCH).await?;
//! let snapshot = store.retrieve().await?;
//! assert_eq!(snapshot.map(|s| s.timestamp()), Some(SystemTime::UNIX_EPOCH));
//! # Ok::<(), feedcache_store::Error>(())
//! # });
//! ```

mod records;
pub mod store;

#[doc(inline)]
pub use store::InMemoryFeedStore;
