// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loading from the network.
//!
//! The cache core never sees transport details. An [`HttpClient`] fetches a
//! response, and a mapper turns it into a typed value or an
//! [`InvalidData`](feedcache_store::ErrorKind::InvalidData) error before any
//! caching or fallback happens.

//!
//! [`Endpoint`] names the API's resources and resolves them against a base
//! URL: the feed and the comments of a single image.

mod client;
mod endpoint;
mod loader;
mod mapper;

pub use client::HttpClient;
pub use endpoint::Endpoint;
pub use loader::{RemoteFeedLoader, RemoteImageCommentsLoader, RemoteImageDataLoader, RemoteLoader, ResponseMapper};
pub use mapper::{map_feed_items, map_image_comments, map_image_data};
