// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The JSON file store.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use feedcache_store::{CachedSnapshot, Error, FeedImage, SnapshotStore};
use tracing::Level;

use crate::{codec, worker::SerialWorker};

/// A [`SnapshotStore`] that persists the feed as a single JSON file.
///
/// Every operation runs on a dedicated worker thread, one at a time, in the
/// order the calls were made. Writes go to a `<file>.tmp` staging file that is
/// renamed over the target, so a crash mid-write leaves the previous snapshot
/// intact.
///
/// Clones share the file and the worker.
///
/// # Examples
///
/// ```no_run
/// use feedcache_file::JsonFileStore;
///
/// let store = JsonFileStore::new("/var/cache/app/feed.json")?;
/// assert!(store.path().ends_with("feed.json"));
/// # Ok::<(), feedcache_store::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    worker: SerialWorker,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not need to exist yet. Its parent directory is not
    /// created; inserting into a missing directory fails.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreWrite`](feedcache_store::ErrorKind::StoreWrite)
    /// if the worker thread cannot be started.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let worker = SerialWorker::spawn("feedcache-file").map_err(Error::store_write)?;
        Ok(Self {
            path: Arc::new(path),
            worker,
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore<Vec<FeedImage>> for JsonFileStore {
    fn retrieve(&self) -> impl Future<Output = Result<Option<CachedSnapshot<Vec<FeedImage>>>, Error>> + Send {
        let path = Arc::clone(&self.path);
        let pending = self.worker.submit(move || read(&path));
        async move { pending.await.map_err(Error::store_read)? }
    }

    fn insert(&self, payload: Vec<FeedImage>, timestamp: SystemTime) -> impl Future<Output = Result<(), Error>> + Send {
        let path = Arc::clone(&self.path);
        let pending = self.worker.submit(move || write(&path, payload, timestamp));
        async move { pending.await.map_err(Error::store_write)? }
    }

    fn delete(&self) -> impl Future<Output = Result<(), Error>> + Send {
        let path = Arc::clone(&self.path);
        let pending = self.worker.submit(move || remove(&path));
        async move { pending.await.map_err(Error::store_write)? }
    }
}

fn read(path: &Path) -> Result<Option<CachedSnapshot<Vec<FeedImage>>>, Error> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(failed("read", path, Error::store_read(e))),
    };

    codec::decode(&bytes).map(Some).map_err(|e| failed("decode", path, e))
}

fn write(path: &Path, feed: Vec<FeedImage>, timestamp: SystemTime) -> Result<(), Error> {
    let items = feed.len();
    let bytes = codec::encode(feed, timestamp)?;
    let staging = staging_path(path);

    let outcome = File::create(&staging)
        .and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staging, path));

    if let Err(e) = outcome {
        // Best effort; the staging file is ignored by reads either way.
        let _ = fs::remove_file(&staging);
        return Err(failed("write", path, Error::store_write(e)));
    }

    tracing::event!(
        name: "feedcache.file.written",
        Level::DEBUG,
        file.path = %path.display(),
        feed.items = items,
    );
    Ok(())
}

fn remove(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::event!(name: "feedcache.file.removed", Level::DEBUG, file.path = %path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(failed("remove", path, Error::store_write(e))),
    }
}

fn failed(op: &'static str, path: &Path, error: Error) -> Error {
    tracing::event!(
        name: "feedcache.file.error",
        Level::DEBUG,
        file.op = op,
        file.path = %path.display(),
        error = %error,
    );
    error
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
