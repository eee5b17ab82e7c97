// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Load, save and validate behavior of `LocalFeedLoader` against a recording store.

use std::time::{Duration, SystemTime};

use feedcache::{DEFAULT_MAX_AGE, ErrorKind, FeedImage, LocalFeedLoader};
use feedcache_store::testing::{StoreOp, StoreSpy, unique_feed};
use tick::{Clock, ClockControl};

type Spy = StoreSpy<Vec<FeedImage>>;

const ONE_SECOND: Duration = Duration::from_secs(1);

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

fn now() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

fn make_loader(store: &Spy, clock: Clock) -> LocalFeedLoader<Spy> {
    LocalFeedLoader::new(store.clone(), clock)
}

fn frozen() -> Clock {
    Clock::new_frozen_at(now())
}

fn insert_of(payload: Vec<FeedImage>, timestamp: SystemTime) -> StoreOp<Vec<FeedImage>> {
    StoreOp::Insert { payload, timestamp }
}

// load

#[test]
fn load_requests_retrieval() {
    let store = Spy::new();
    let _ = block_on(make_loader(&store, frozen()).load());
    assert_eq!(store.operations(), vec![StoreOp::Retrieve]);
}

#[test]
fn load_fails_on_retrieval_error() {
    let store = Spy::new();
    store.fail_when(|op| matches!(op, StoreOp::Retrieve));

    let error = block_on(make_loader(&store, frozen()).load()).expect_err("load should fail");

    assert_eq!(error.kind(), ErrorKind::StoreRead);
}

#[test]
fn load_delivers_no_images_on_empty_cache() {
    let store = Spy::new();
    let feed = block_on(make_loader(&store, frozen()).load()).expect("load failed");
    assert!(feed.is_empty());
}

#[test]
fn load_delivers_cached_images_on_non_expired_cache() {
    let feed = unique_feed();
    let store = Spy::with_snapshot(feed.clone(), now() - DEFAULT_MAX_AGE + ONE_SECOND);

    let loaded = block_on(make_loader(&store, frozen()).load()).expect("load failed");

    assert_eq!(loaded, feed);
}

#[test]
fn load_delivers_no_images_on_cache_expiration() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE);
    let loaded = block_on(make_loader(&store, frozen()).load()).expect("load failed");
    assert!(loaded.is_empty());
}

#[test]
fn load_delivers_no_images_on_expired_cache() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE - ONE_SECOND);
    let loaded = block_on(make_loader(&store, frozen()).load()).expect("load failed");
    assert!(loaded.is_empty());
}

#[test]
fn load_has_no_side_effects_on_retrieval_error() {
    let store = Spy::new();
    store.fail_when(|op| matches!(op, StoreOp::Retrieve));

    let _ = block_on(make_loader(&store, frozen()).load());

    assert_eq!(store.operations(), vec![StoreOp::Retrieve]);
}

#[test]
fn load_has_no_side_effects_on_expired_cache() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE - ONE_SECOND);

    let _ = block_on(make_loader(&store, frozen()).load());

    assert_eq!(store.count(|op| matches!(op, StoreOp::Delete)), 0);
    assert!(store.has_snapshot());
}

// save

#[test]
fn save_requests_deletion_before_insertion() {
    let store = Spy::new();
    let feed = unique_feed();

    block_on(make_loader(&store, frozen()).save(feed.clone())).expect("save failed");

    assert_eq!(store.operations(), vec![StoreOp::Delete, insert_of(feed, now())]);
}

#[test]
fn save_does_not_insert_on_deletion_error() {
    let store = Spy::new();
    store.fail_when(|op| matches!(op, StoreOp::Delete));

    let error = block_on(make_loader(&store, frozen()).save(unique_feed())).expect_err("save should fail");

    assert_eq!(error.kind(), ErrorKind::StoreWrite);
    assert_eq!(store.operations(), vec![StoreOp::Delete]);
}

#[test]
fn save_fails_on_insertion_error() {
    let store = Spy::new();
    store.fail_when(|op| matches!(op, StoreOp::Insert { .. }));

    let error = block_on(make_loader(&store, frozen()).save(unique_feed())).expect_err("save should fail");

    assert_eq!(error.kind(), ErrorKind::StoreWrite);
    assert_eq!(store.count(|op| matches!(op, StoreOp::Insert { .. })), 1);
}

#[test]
fn save_twice_keeps_only_second_payload() {
    let store = Spy::new();
    let loader = make_loader(&store, frozen());
    let first = unique_feed();
    let second = unique_feed();

    block_on(loader.save(first)).expect("save failed");
    block_on(loader.save(second.clone())).expect("save failed");

    let snapshot = store.snapshot().expect("snapshot should exist");
    assert_eq!(snapshot.into_payload(), second);
}

// validate

#[test]
fn validate_deletes_cache_on_retrieval_error() {
    let store = Spy::new();
    store.fail_when(|op| matches!(op, StoreOp::Retrieve));

    block_on(make_loader(&store, frozen()).validate_cache());

    assert_eq!(store.operations(), vec![StoreOp::Retrieve, StoreOp::Delete]);
}

#[test]
fn validate_does_not_delete_on_empty_cache() {
    let store = Spy::new();
    block_on(make_loader(&store, frozen()).validate_cache());
    assert_eq!(store.operations(), vec![StoreOp::Retrieve]);
}

#[test]
fn validate_does_not_delete_non_expired_cache() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE + ONE_SECOND);
    block_on(make_loader(&store, frozen()).validate_cache());
    assert_eq!(store.operations(), vec![StoreOp::Retrieve]);
}

#[test]
fn validate_deletes_cache_on_expiration() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE);

    block_on(make_loader(&store, frozen()).validate_cache());

    assert_eq!(store.operations(), vec![StoreOp::Retrieve, StoreOp::Delete]);
    assert!(!store.has_snapshot());
}

#[test]
fn validate_swallows_deletion_error() {
    let store = Spy::with_snapshot(unique_feed(), now() - DEFAULT_MAX_AGE - ONE_SECOND);
    store.fail_when(|op| matches!(op, StoreOp::Delete));

    block_on(make_loader(&store, frozen()).validate_cache());

    assert_eq!(store.count(|op| matches!(op, StoreOp::Delete)), 1);
}

// scenario

#[test]
fn save_load_expire_validate() {
    let control = ClockControl::new_at(now());
    let store = Spy::new();
    let loader = make_loader(&store, control.to_clock());
    let feed = unique_feed();

    block_on(loader.save(feed.clone())).expect("save failed");
    assert_eq!(block_on(loader.load()).expect("load failed"), feed);

    control.advance(Duration::from_secs(8 * 24 * 60 * 60));
    assert!(block_on(loader.load()).expect("load failed").is_empty());

    store.clear_operations();
    block_on(loader.validate_cache());
    assert_eq!(store.count(|op| matches!(op, StoreOp::Delete)), 1);
}

#[test]
fn custom_max_age_changes_expiry() {
    let control = ClockControl::new_at(now());
    let store = Spy::new();
    let loader = LocalFeedLoader::builder(store, control.to_clock())
        .max_age(Duration::from_secs(60))
        .build();

    block_on(loader.save(unique_feed())).expect("save failed");
    control.advance(Duration::from_secs(59));
    assert_eq!(block_on(loader.load()).expect("load failed").len(), 2);

    control.advance(ONE_SECOND);
    assert!(block_on(loader.load()).expect("load failed").is_empty());
}
