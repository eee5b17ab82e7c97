// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::SystemTime;

use bytes::Bytes;
use feedcache_store::{Error, FeedImage, ImageComment};
use http::{Response, StatusCode, Uri};
use jiff::Timestamp;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
struct Root<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct RemoteFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image: String,
}

#[derive(Deserialize)]
struct RemoteComment {
    id: Uuid,
    message: String,
    created_at: String,
    author: RemoteAuthor,
}

#[derive(Deserialize)]
struct RemoteAuthor {
    username: String,
}

impl TryFrom<RemoteFeedItem> for FeedImage {
    type Error = Error;

    fn try_from(item: RemoteFeedItem) -> Result<Self, Self::Error> {
        let url: Uri = item.image.parse().map_err(Error::invalid_data)?;
        Ok(Self {
            id: item.id,
            description: item.description,
            location: item.location,
            url,
        })
    }
}

impl TryFrom<RemoteComment> for ImageComment {
    type Error = Error;

    fn try_from(comment: RemoteComment) -> Result<Self, Self::Error> {
        let created_at: Timestamp = comment.created_at.parse().map_err(Error::invalid_data)?;
        Ok(Self {
            id: comment.id,
            message: comment.message,
            created_at: SystemTime::from(created_at),
            username: comment.author.username,
        })
    }
}

/// Maps a feed API response to feed images.
///
/// The response must have status `200 OK` and a JSON body of the form
/// `{"items": [{"id": …, "description": …, "location": …, "image": …}]}`,
/// where `description` and `location` may be absent or `null`.
///
/// # Errors
///
/// Returns an [`InvalidData`](feedcache_store::ErrorKind::InvalidData) error
/// for any other status, or if the body does not decode.
pub fn map_feed_items(response: &Response<Bytes>) -> Result<Vec<FeedImage>, Error> {
    ensure_ok(response)?;
    let root: Root<RemoteFeedItem> = serde_json::from_slice(response.body()).map_err(Error::invalid_data)?;
    root.items.into_iter().map(FeedImage::try_from).collect()
}

/// Maps an image comments API response to comments.
///
/// Any `2xx` status is accepted. The body must have the form
/// `{"items": [{"id": …, "message": …, "created_at": …, "author": {"username": …}}]}`,
/// where `created_at` is an ISO-8601 timestamp with an offset, such as
/// `2020-05-20T11:24:59+00:00`.
///
/// # Errors
///
/// Returns an [`InvalidData`](feedcache_store::ErrorKind::InvalidData) error
/// for a status outside `200..=299`, if the body does not decode, or if a
/// timestamp does not parse.
pub fn map_image_comments(response: &Response<Bytes>) -> Result<Vec<ImageComment>, Error> {
    if !response.status().is_success() {
        return Err(Error::invalid_data(format!("unexpected status {}", response.status())));
    }
    let root: Root<RemoteComment> = serde_json::from_slice(response.body()).map_err(Error::invalid_data)?;
    root.items.into_iter().map(ImageComment::try_from).collect()
}

/// Maps an image response to its bytes.
///
/// # Errors
///
/// Returns an [`InvalidData`](feedcache_store::ErrorKind::InvalidData) error
/// unless the status is `200 OK` and the body is non-empty.
pub fn map_image_data(response: &Response<Bytes>) -> Result<Bytes, Error> {
    ensure_ok(response)?;
    if response.body().is_empty() {
        return Err(Error::invalid_data("image response has an empty body"));
    }
    Ok(response.body().clone())
}

fn ensure_ok(response: &Response<Bytes>) -> Result<(), Error> {
    match response.status() {
        StatusCode::OK => Ok(()),
        status => Err(Error::invalid_data(format!("unexpected status {status}"))),
    }
}
