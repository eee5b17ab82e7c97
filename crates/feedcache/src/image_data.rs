// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Local loading and saving of image bytes.

use bytes::Bytes;
use feedcache_store::{Error, ImageDataStore, Loader, ResourceCache};
use http::Uri;

use crate::telemetry::{CacheActivity, CacheName, record};

const NAME: CacheName = "image_data";

/// Loads and saves image bytes through an [`ImageDataStore`].
///
/// Image bytes never expire. A URL with nothing cached is a
/// [`NotFound`](feedcache_store::ErrorKind::NotFound) error, so this loader
/// can sit in front of a remote source in a fallback chain.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use feedcache::LocalImageDataLoader;
/// use feedcache_memory::InMemoryFeedStore;
/// use feedcache_store::{ErrorKind, Loader, ResourceCache};
/// # futures::executor::block_on(async {
///
/// let loader = LocalImageDataLoader::new(InMemoryFeedStore::new());
/// let url: http::Uri = "https://a-url.com/image.png".parse()?;
///
/// assert_eq!(loader.load(&url).await.unwrap_err().kind(), ErrorKind::NotFound);
///
/// loader.save(&url, Bytes::from_static(b"png")).await?;
/// assert_eq!(loader.load(&url).await?, Bytes::from_static(b"png"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct LocalImageDataLoader<S> {
    store: S,
}

impl<S> LocalImageDataLoader<S> {
    /// Creates a loader over `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> Loader<Uri, Bytes> for LocalImageDataLoader<S>
where
    S: ImageDataStore,
{
    async fn load(&self, url: &Uri) -> Result<Bytes, Error> {
        match self.store.retrieve_data(url).await {
            Ok(Some(data)) => {
                record(NAME, CacheActivity::Hit, None);
                Ok(data)
            }
            Ok(None) => {
                record(NAME, CacheActivity::Empty, None);
                Err(Error::not_found())
            }
            Err(e) => {
                record(NAME, CacheActivity::Error, Some(&e));
                Err(e)
            }
        }
    }
}

impl<S> ResourceCache<Uri, Bytes> for LocalImageDataLoader<S>
where
    S: ImageDataStore,
{
    async fn save(&self, url: &Uri, data: Bytes) -> Result<(), Error> {
        self.store.insert_data(url, data).await.inspect_err(|e| {
            record(NAME, CacheActivity::Error, Some(e));
        })
    }
}
