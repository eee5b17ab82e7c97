// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;
use feedcache_store::{Error, FeedImage, ImageComment, Loader};
use http::{Response, Uri};

use super::{HttpClient, map_feed_items, map_image_comments, map_image_data};

/// Turns a response into a typed value.
pub type ResponseMapper<V> = fn(&Response<Bytes>) -> Result<V, Error>;

/// A [`RemoteLoader`] for the feed.
pub type RemoteFeedLoader<C> = RemoteLoader<C, Vec<FeedImage>>;

/// A [`RemoteLoader`] for one image's comments.
pub type RemoteImageCommentsLoader<C> = RemoteLoader<C, Vec<ImageComment>>;

/// Loads a resource from a fixed URL.
///
/// A client failure becomes a
/// [`Connectivity`](feedcache_store::ErrorKind::Connectivity) error. The
/// mapper decides what a usable response is.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use feedcache::remote::{HttpClient, RemoteFeedLoader};
/// use feedcache_store::Loader;
/// use http::{Response, Uri};
///
/// struct EmptyFeed;
///
/// impl HttpClient for EmptyFeed {
///     type Error = std::io::Error;
///
///     async fn get(&self, _url: &Uri) -> Result<Response<Bytes>, Self::Error> {
///         Ok(Response::new(Bytes::from_static(br#"{"items":[]}"#)))
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let loader = RemoteFeedLoader::feed(Uri::from_static("https://a-url.com/feed"), EmptyFeed);
/// assert!(loader.load(&()).await?.is_empty());
/// # Ok::<(), feedcache_store::Error>(())
/// # });
/// ```
pub struct RemoteLoader<C, V> {
    url: Uri,
    client: C,
    mapper: ResponseMapper<V>,
}

impl<C, V> std::fmt::Debug for RemoteLoader<C, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLoader").field("url", &self.url).finish_non_exhaustive()
    }
}

impl<C, V> Clone for RemoteLoader<C, V>
where
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            client: self.client.clone(),
            mapper: self.mapper,
        }
    }
}

impl<C, V> RemoteLoader<C, V> {
    /// Creates a loader that fetches `url` with `client` and decodes with `mapper`.
    #[must_use]
    pub fn new(url: Uri, client: C, mapper: ResponseMapper<V>) -> Self {
        Self { url, client, mapper }
    }

    /// Returns the URL this loader fetches.
    #[must_use]
    pub fn url(&self) -> &Uri {
        &self.url
    }
}

impl<C> RemoteFeedLoader<C> {
    /// Creates a loader for the feed API at `url`.
    #[must_use]
    pub fn feed(url: Uri, client: C) -> Self {
        Self::new(url, client, map_feed_items)
    }
}

impl<C> RemoteImageCommentsLoader<C> {
    /// Creates a loader for the image comments API at `url`.
    ///
    /// Build `url` with [`Endpoint::ImageComments`](super::Endpoint::ImageComments).
    #[must_use]
    pub fn image_comments(url: Uri, client: C) -> Self {
        Self::new(url, client, map_image_comments)
    }
}

impl<C, V> Loader<(), V> for RemoteLoader<C, V>
where
    C: HttpClient,
    V: Send,
{
    async fn load(&self, _key: &()) -> Result<V, Error> {
        let response = self.client.get(&self.url).await.map_err(Error::connectivity)?;
        (self.mapper)(&response)
    }
}

/// Loads image bytes from the URL it is asked for.
///
/// A client failure becomes a
/// [`Connectivity`](feedcache_store::ErrorKind::Connectivity) error; anything
/// but a `200 OK` with a non-empty body is
/// [`InvalidData`](feedcache_store::ErrorKind::InvalidData).
#[derive(Clone, Debug)]
pub struct RemoteImageDataLoader<C> {
    client: C,
}

impl<C> RemoteImageDataLoader<C> {
    /// Creates a loader that fetches with `client`.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C> Loader<Uri, Bytes> for RemoteImageDataLoader<C>
where
    C: HttpClient,
{
    async fn load(&self, url: &Uri) -> Result<Bytes, Error> {
        let response = self.client.get(url).await.map_err(Error::connectivity)?;
        map_image_data(&response)
    }
}
