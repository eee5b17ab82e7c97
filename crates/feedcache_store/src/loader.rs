// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The loading contracts shared by local and remote sources.

use std::sync::Arc;

use crate::Error;

/// A source that produces a `V` for a key.
///
/// Feed loaders use `()` as the key since there is a single feed; image data
/// loaders are keyed by URL.
///
/// # Cancellation
///
/// Dropping the returned future cancels the load. Implementations must stop
/// any in-flight work they own when that happens.
///
/// # Examples
///
/// ```
/// use feedcache_store::{Error, Loader};
///
/// struct Fixed(&'static str);
///
/// impl Loader<(), String> for Fixed {
///     async fn load(&self, _key: &()) -> Result<String, Error> {
///         Ok(self.0.to_owned())
///     }
/// }
///
/// # futures::executor::block_on(async {
/// assert_eq!(Fixed("feed").load(&()).await?, "feed");
/// # Ok::<(), Error>(())
/// # });
/// ```
pub trait Loader<K, V>: Send + Sync {
    /// Loads the value for `key`.
    fn load(&self, key: &K) -> impl Future<Output = Result<V, Error>> + Send;
}

/// A sink that persists a `V` for a key.
///
/// This is the write side used by write-through caching.
pub trait ResourceCache<K, V>: Send + Sync {
    /// Stores `value` for `key`, replacing what was there.
    fn save(&self, key: &K, value: V) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<K, V, L> Loader<K, V> for Arc<L>
where
    L: Loader<K, V>,
{
    fn load(&self, key: &K) -> impl Future<Output = Result<V, Error>> + Send {
        (**self).load(key)
    }
}

impl<K, V, C> ResourceCache<K, V> for Arc<C>
where
    C: ResourceCache<K, V>,
{
    fn save(&self, key: &K, value: V) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).save(key, value)
    }
}
