// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Record types backing [`InMemoryFeedStore`](crate::InMemoryFeedStore).

use std::{collections::HashMap, time::SystemTime};

use bytes::Bytes;
use feedcache_store::FeedImage;
use http::Uri;
use uuid::Uuid;

/// The root cache record. At most one exists at a time.
#[derive(Debug)]
pub(crate) struct ManagedCache {
    pub(crate) timestamp: SystemTime,
    pub(crate) feed: Vec<ManagedFeedImage>,
}

impl ManagedCache {
    pub(crate) fn new(feed: &[FeedImage], timestamp: SystemTime) -> Self {
        Self {
            timestamp,
            feed: feed.iter().map(ManagedFeedImage::from).collect(),
        }
    }

    pub(crate) fn local_feed(&self) -> Vec<FeedImage> {
        self.feed.iter().map(ManagedFeedImage::to_local).collect()
    }
}

/// An item record, owned by its [`ManagedCache`].
#[derive(Debug)]
pub(crate) struct ManagedFeedImage {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    url: Uri,
}

impl ManagedFeedImage {
    fn to_local(&self) -> FeedImage {
        FeedImage {
            id: self.id,
            description: self.description.clone(),
            location: self.location.clone(),
            url: self.url.clone(),
        }
    }
}

impl From<&FeedImage> for ManagedFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.clone(),
        }
    }
}

/// Everything the store holds, guarded by one lock.
#[derive(Debug, Default)]
pub(crate) struct Records {
    pub(crate) cache: Option<ManagedCache>,
    pub(crate) image_data: HashMap<Uri, Bytes>,
}
