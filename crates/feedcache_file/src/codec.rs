// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! On-disk layout of the JSON blob.
//!
//! ```json
//! {
//!   "items": [{ "id": "…", "description": "…", "location": "…", "url": "https://…" }],
//!   "timestamp": { "secs_since_epoch": 1700000000, "nanos_since_epoch": 0 }
//! }
//! ```
//!
//! `description` and `location` are omitted when absent.

use std::time::SystemTime;

use feedcache_store::{CachedSnapshot, Error, FeedImage};
use http::Uri;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    items: Vec<CodableFeedImage>,
    timestamp: SystemTime,
}

#[derive(Serialize, Deserialize)]
struct CodableFeedImage {
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(with = "uri")]
    url: Uri,
}

impl From<FeedImage> for CodableFeedImage {
    fn from(image: FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description,
            location: image.location,
            url: image.url,
        }
    }
}

impl From<CodableFeedImage> for FeedImage {
    fn from(image: CodableFeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description,
            location: image.location,
            url: image.url,
        }
    }
}

pub(crate) fn encode(feed: Vec<FeedImage>, timestamp: SystemTime) -> Result<Vec<u8>, Error> {
    let file = CacheFile {
        items: feed.into_iter().map(CodableFeedImage::from).collect(),
        timestamp,
    };
    serde_json::to_vec(&file).map_err(Error::store_write)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<CachedSnapshot<Vec<FeedImage>>, Error> {
    let file: CacheFile = serde_json::from_slice(bytes).map_err(Error::store_read)?;
    let feed = file.items.into_iter().map(FeedImage::from).collect();
    Ok(CachedSnapshot::new(feed, file.timestamp))
}

mod uri {
    use http::Uri;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(uri: &Uri, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(uri)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uri, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
