// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Running loads in the background with a cancel handle.

use feedcache_store::{Error, Loader};
use futures::future::{AbortHandle, Abortable};
use tokio::task::JoinHandle;

/// Handle to a load started with [`spawn_load`].
///
/// Dropping the handle does not cancel the load.
#[derive(Debug)]
pub struct LoadTask {
    abort: AbortHandle,
    join: JoinHandle<()>,
}

impl LoadTask {
    /// Cancels the load.
    ///
    /// The in-flight work is dropped the next time the task is polled, which
    /// stops whichever source is active at that point. A cancel observed
    /// before delivery suppresses the completion. A completion that has
    /// already started runs to the end, and cancelling after it is a no-op.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Returns `true` if [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Waits until the task has finished, by completing or by being cancelled.
    pub async fn finished(self) {
        // A join error only ever carries a panic from the completion.
        let _ = self.join.await;
    }
}

/// Loads `key` from `loader` on the Tokio runtime and passes the result to `completion`.
///
/// The completion is called at most once. It is skipped when the returned
/// task's [`cancel`](LoadTask::cancel) is observed before the result is
/// delivered.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
///
/// # Examples
///
/// ```
/// use feedcache::spawn_load;
/// use feedcache_store::testing::LoaderSpy;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let loader = LoaderSpy::<(), u32>::new();
/// let task = spawn_load(loader.clone(), (), |result| println!("{result:?}"));
///
/// task.cancel();
/// task.finished().await;
/// # }
/// ```
pub fn spawn_load<L, K, V, F>(loader: L, key: K, completion: F) -> LoadTask
where
    L: Loader<K, V> + 'static,
    K: Send + Sync + 'static,
    V: Send + 'static,
    F: FnOnce(Result<V, Error>) + Send + 'static,
{
    let (abort, registration) = AbortHandle::new_pair();
    let status = abort.clone();
    let work = Abortable::new(async move { loader.load(&key).await }, registration);

    let join = tokio::spawn(async move {
        if let Ok(result) = work.await {
            // Last check before delivery. A cancel racing past it is not observed.
            if !status.is_aborted() {
                completion(result);
            }
        }
    });

    LoadTask { abort, join }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use feedcache_store::testing::LoaderSpy;
    use futures::channel::oneshot;

    use super::*;

    #[tokio::test]
    async fn completion_receives_result() {
        let loader = LoaderSpy::<u8, u8>::returning(|key| Ok(key + 1));
        let (sender, receiver) = oneshot::channel();

        let task = spawn_load(loader, 1, move |result| {
            let _ = sender.send(result);
        });

        let result = receiver.await.expect("completion not called");
        assert_eq!(result.expect("load failed"), 2);
        assert!(!task.is_cancelled());
        task.finished().await;
    }

    #[tokio::test]
    async fn cancel_drops_pending_load_and_skips_completion() {
        let loader = LoaderSpy::<(), u8>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let task = spawn_load(loader.clone(), (), {
            let calls = Arc::clone(&calls);
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::task::yield_now().await;
        assert_eq!(loader.request_count(), 1);

        task.cancel();
        assert!(task.is_cancelled());
        task.finished().await;

        assert_eq!(loader.cancelled(), vec![0]);
        assert!(!loader.complete(0, Ok(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_after_delivery_is_harmless() {
        let loader = LoaderSpy::<u8, u8>::returning(|key| Ok(key * 2));
        let calls = Arc::new(AtomicUsize::new(0));
        let (sender, receiver) = oneshot::channel();

        let task = spawn_load(loader, 4, {
            let calls = Arc::clone(&calls);
            move |result| {
                calls.fetch_add(1, Ordering::SeqCst);
                let _ = sender.send(result);
            }
        });
        let result = receiver.await.expect("completion not called");

        task.cancel();
        assert!(task.is_cancelled());
        task.finished().await;

        assert_eq!(result.expect("load failed"), 8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_before_start_never_loads() {
        let loader = LoaderSpy::<(), u8>::returning(|_| Ok(1));
        let calls = Arc::new(AtomicUsize::new(0));

        let task = spawn_load(loader.clone(), (), {
            let calls = Arc::clone(&calls);
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        task.cancel();
        task.finished().await;

        assert_eq!(loader.request_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
