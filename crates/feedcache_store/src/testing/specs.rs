// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Contract checks shared by every [`SnapshotStore`] backend.
//!
//! Each check takes a store that is empty on entry and panics with a
//! descriptive message when the backend breaks the contract. Backends call
//! them from their own test suites, one test per check.

use std::time::{Duration, SystemTime};

use futures::join;

use super::unique_feed;
use crate::{CachedSnapshot, FeedImage, SnapshotStore};

fn any_timestamp() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

async fn expect_retrieve<S>(store: &S, expected: Option<CachedSnapshot<Vec<FeedImage>>>)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    let retrieved = store.retrieve().await.expect("retrieve should succeed");
    assert_eq!(retrieved, expected, "unexpected snapshot retrieved");
}

/// An empty store retrieves `None`.
pub async fn retrieve_delivers_empty_on_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    expect_retrieve(store, None).await;
}

/// Retrieving twice from an empty store yields `None` both times.
pub async fn retrieve_has_no_side_effects_on_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    expect_retrieve(store, None).await;
    expect_retrieve(store, None).await;
}

/// A retrieve after an insert returns what was inserted.
pub async fn retrieve_delivers_found_values_on_non_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    let feed = unique_feed();
    let timestamp = any_timestamp();

    store.insert(feed.clone(), timestamp).await.expect("insert should succeed");

    expect_retrieve(store, Some(CachedSnapshot::new(feed, timestamp))).await;
}

/// Retrieving twice from a non-empty store yields the same snapshot.
pub async fn retrieve_has_no_side_effects_on_non_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    let feed = unique_feed();
    let timestamp = any_timestamp();

    store.insert(feed.clone(), timestamp).await.expect("insert should succeed");

    expect_retrieve(store, Some(CachedSnapshot::new(feed.clone(), timestamp))).await;
    expect_retrieve(store, Some(CachedSnapshot::new(feed, timestamp))).await;
}

/// Inserting into an empty store succeeds.
pub async fn insert_delivers_no_error_on_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    store
        .insert(unique_feed(), any_timestamp())
        .await
        .expect("insert into an empty store should succeed");
}

/// Inserting over an existing snapshot succeeds.
pub async fn insert_delivers_no_error_on_non_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    store.insert(unique_feed(), any_timestamp()).await.expect("first insert should succeed");
    store
        .insert(unique_feed(), any_timestamp())
        .await
        .expect("insert over a snapshot should succeed");
}

/// A second insert fully replaces the first; nothing of it survives.
pub async fn insert_overrides_previously_inserted_values<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    store.insert(unique_feed(), any_timestamp()).await.expect("first insert should succeed");

    let latest_feed = vec![super::unique_image()];
    let latest_timestamp = any_timestamp() + Duration::from_secs(60);
    store
        .insert(latest_feed.clone(), latest_timestamp)
        .await
        .expect("second insert should succeed");

    expect_retrieve(store, Some(CachedSnapshot::new(latest_feed, latest_timestamp))).await;
}

/// Deleting from an empty store succeeds and leaves it empty.
pub async fn delete_has_no_side_effects_on_empty_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    store.delete().await.expect("delete on an empty store should succeed");
    expect_retrieve(store, None).await;
}

/// Deleting removes a previously inserted snapshot.
pub async fn delete_empties_previously_inserted_store<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    store.insert(unique_feed(), any_timestamp()).await.expect("insert should succeed");

    store.delete().await.expect("delete should succeed");

    expect_retrieve(store, None).await;
}

/// Operations issued together complete as if they ran one at a time, in
/// issue order.
pub async fn operations_run_serially_in_issue_order<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    let first = unique_feed();
    let last = unique_feed();
    let timestamp = any_timestamp();

    let (inserted, deleted, reinserted, retrieved) = join!(
        store.insert(first, timestamp),
        store.delete(),
        store.insert(last.clone(), timestamp),
        store.retrieve(),
    );

    inserted.expect("first insert should succeed");
    deleted.expect("delete should succeed");
    reinserted.expect("second insert should succeed");
    let retrieved = retrieved.expect("retrieve should succeed");
    assert_eq!(
        retrieved,
        Some(CachedSnapshot::new(last.clone(), timestamp)),
        "retrieve issued last must observe the last insert"
    );

    expect_retrieve(store, Some(CachedSnapshot::new(last, timestamp))).await;
}

/// Operations take effect in the order their methods were called, even when
/// their futures are awaited in a different order.
pub async fn operations_run_in_call_order_not_poll_order<S>(store: &S)
where
    S: SnapshotStore<Vec<FeedImage>>,
{
    let insert = store.insert(unique_feed(), any_timestamp());
    let delete = store.delete();

    delete.await.expect("delete should succeed");
    insert.await.expect("insert should succeed");

    expect_retrieve(store, None).await;
}
