// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use http::Uri;
use uuid::Uuid;

/// A single item of the feed.
///
/// The `url` identifies the item's image: it is the remote fetch target and
/// the key under which the image bytes are cached.
///
/// # Examples
///
/// ```
/// use feedcache_store::FeedImage;
/// use http::Uri;
/// use uuid::Uuid;
///
/// let image = FeedImage::new(Uuid::nil(), Uri::from_static("https://a-url.com/1.png"))
///     .with_description("a description")
///     .with_location("a location");
///
/// assert_eq!(image.description.as_deref(), Some("a description"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FeedImage {
    /// Stable identifier of the item.
    pub id: Uuid,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional free-form location.
    pub location: Option<String>,
    /// Location of the image bytes.
    pub url: Uri,
}

impl FeedImage {
    /// Creates an item with no description or location.
    #[must_use]
    pub fn new(id: Uuid, url: Uri) -> Self {
        Self {
            id,
            description: None,
            location: None,
            url,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
