// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, sync::Arc};

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::{Error, Loader};

type Responder<K, V> = Box<dyn Fn(&K) -> Result<V, Error> + Send + Sync>;

struct SpyState<K, V> {
    requests: Vec<K>,
    pending: HashMap<usize, oneshot::Sender<Result<V, Error>>>,
    cancelled: Vec<usize>,
    responder: Option<Responder<K, V>>,
}

/// A loader that records requests and lets the test decide how they end.
///
/// In the default mode every `load` stays pending until the test calls
/// [`complete`](Self::complete) with the request's index. A spy built with
/// [`returning`](Self::returning) answers immediately instead.
///
/// A load future dropped before it finished is recorded as cancelled, which
/// is how tests observe cancellation reaching the right source.
///
/// # Examples
///
/// ```
/// use feedcache_store::{Error, Loader, testing::LoaderSpy};
/// # futures::executor::block_on(async {
///
/// let spy = LoaderSpy::<(), u32>::returning(|_| Ok(7));
/// assert_eq!(spy.load(&()).await?, 7);
/// assert_eq!(spy.request_count(), 1);
/// # Ok::<(), Error>(())
/// # });
/// ```
pub struct LoaderSpy<K, V> {
    state: Arc<Mutex<SpyState<K, V>>>,
}

impl<K, V> std::fmt::Debug for LoaderSpy<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LoaderSpy")
            .field("requests", &state.requests.len())
            .field("pending", &state.pending.len())
            .field("cancelled", &state.cancelled)
            .finish_non_exhaustive()
    }
}

impl<K, V> Clone for LoaderSpy<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V> Default for LoaderSpy<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LoaderSpy<K, V> {
    /// Creates a spy whose loads stay pending until completed by the test.
    #[must_use]
    pub fn new() -> Self {
        Self::with_responder(None)
    }

    /// Creates a spy that answers every load by calling `responder`.
    pub fn returning<F>(responder: F) -> Self
    where
        F: Fn(&K) -> Result<V, Error> + Send + Sync + 'static,
    {
        Self::with_responder(Some(Box::new(responder)))
    }

    fn with_responder(responder: Option<Responder<K, V>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SpyState {
                requests: Vec::new(),
                pending: HashMap::new(),
                cancelled: Vec::new(),
                responder,
            })),
        }
    }

    /// Returns how many loads were started.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Returns the indices of loads that were dropped before finishing.
    #[must_use]
    pub fn cancelled(&self) -> Vec<usize> {
        self.state.lock().cancelled.clone()
    }

    /// Finishes the pending load at `index` with `result`.
    ///
    /// Returns `false` if there is no such pending load, for example because
    /// it was already completed or cancelled.
    pub fn complete(&self, index: usize, result: Result<V, Error>) -> bool {
        let sender = self.state.lock().pending.remove(&index);
        sender.is_some_and(|sender| sender.send(result).is_ok())
    }
}

impl<K, V> LoaderSpy<K, V>
where
    K: Clone,
{
    /// Returns the keys of every load started so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<K> {
        self.state.lock().requests.clone()
    }
}

impl<K, V> Loader<K, V> for LoaderSpy<K, V>
where
    K: Clone + Send + Sync,
    V: Send,
{
    fn load(&self, key: &K) -> impl Future<Output = Result<V, Error>> + Send {
        let mut state = self.state.lock();
        let index = state.requests.len();
        state.requests.push(key.clone());

        let immediate = state.responder.as_ref().map(|respond| respond(key));
        let receiver = if immediate.is_none() {
            let (sender, receiver) = oneshot::channel();
            state.pending.insert(index, sender);
            Some(receiver)
        } else {
            None
        };
        drop(state);

        let guard = CancelGuard {
            state: Arc::clone(&self.state),
            index,
            armed: true,
        };

        async move {
            // The guard lives inside the future so that dropping an
            // unfinished load records it as cancelled.
            let guard = guard;
            let result = match (immediate, receiver) {
                (Some(result), _) => result,
                (None, Some(receiver)) => receiver
                    .await
                    .unwrap_or_else(|_canceled| Err(Error::connectivity("spy load was abandoned"))),
                (None, None) => Err(Error::connectivity("spy load has no outcome")),
            };
            guard.disarm();
            result
        }
    }
}

struct CancelGuard<K, V> {
    state: Arc<Mutex<SpyState<K, V>>>,
    index: usize,
    armed: bool,
}

impl<K, V> CancelGuard<K, V> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<K, V> Drop for CancelGuard<K, V> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            state.pending.remove(&self.index);
            state.cancelled.push(self.index);
        }
    }
}
