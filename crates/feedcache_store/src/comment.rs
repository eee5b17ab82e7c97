// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::SystemTime;

use uuid::Uuid;

/// A comment left on a feed image.
///
/// Comments are only ever loaded from the network and are never cached.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
///
/// use feedcache_store::ImageComment;
/// use uuid::Uuid;
///
/// let comment = ImageComment::new(Uuid::nil(), "a message", SystemTime::UNIX_EPOCH, "a username");
///
/// assert_eq!(comment.username, "a username");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageComment {
    /// Stable identifier of the comment.
    pub id: Uuid,
    /// The comment text.
    pub message: String,
    /// When the comment was posted.
    pub created_at: SystemTime,
    /// Name of the author.
    pub username: String,
}

impl ImageComment {
    /// Creates a comment.
    #[must_use]
    pub fn new(id: Uuid, message: impl Into<String>, created_at: SystemTime, username: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            created_at,
            username: username.into(),
        }
    }
}
