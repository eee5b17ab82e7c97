// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured events for cache activity.
//!
//! Every event carries the component name and a stable activity name. No
//! subscriber is installed here; applications decide where events go.

use feedcache_store::Error;
use tracing::{Level, field};

#[cfg(test)]
pub(crate) mod testing;

/// Name used to tell cache components apart in events.
pub(crate) type CacheName = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheActivity {
    Hit,
    Expired,
    Empty,
    Saved,
    Purged,
    PurgeFailed,
    Fallback,
    WriteThroughFailed,
    Released,
    Error,
}

impl CacheActivity {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "feedcache.hit",
            Self::Expired => "feedcache.expired",
            Self::Empty => "feedcache.empty",
            Self::Saved => "feedcache.saved",
            Self::Purged => "feedcache.purged",
            Self::PurgeFailed => "feedcache.purge_failed",
            Self::Fallback => "feedcache.fallback",
            Self::WriteThroughFailed => "feedcache.write_through_failed",
            Self::Released => "feedcache.released",
            Self::Error => "feedcache.error",
        }
    }

    pub(crate) fn level(self) -> Level {
        match self {
            Self::Hit | Self::Empty | Self::Released | Self::Error => Level::DEBUG,
            Self::Expired | Self::Saved | Self::Purged | Self::Fallback => Level::INFO,
            Self::PurgeFailed | Self::WriteThroughFailed => Level::WARN,
        }
    }
}

/// Emits one event for `activity`, attaching `error` when there is one.
pub(crate) fn record(name: CacheName, activity: CacheActivity, error: Option<&Error>) {
    let error = error.map(field::display);
    let activity_name = activity.as_str();

    // Event levels must be known statically.
    let level = activity.level();
    if level == Level::WARN {
        tracing::event!(Level::WARN, cache.name = name, cache.activity = activity_name, error);
    } else if level == Level::INFO {
        tracing::event!(Level::INFO, cache.name = name, cache.activity = activity_name, error);
    } else {
        tracing::event!(Level::DEBUG, cache.name = name, cache.activity = activity_name, error);
    }
}
