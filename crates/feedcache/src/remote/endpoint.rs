// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use feedcache_store::Error;
use http::{Uri, uri::PathAndQuery};
use uuid::Uuid;

/// The remote API's resources, resolved against a base URL.
///
/// # Examples
///
/// ```
/// use feedcache::remote::Endpoint;
/// use http::Uri;
///
/// let base = Uri::from_static("https://a-url.com/essential-feed");
///
/// assert_eq!(Endpoint::Feed.url(&base)?, "https://a-url.com/essential-feed/v1/feed");
/// # Ok::<(), feedcache_store::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The feed of images.
    Feed,
    /// The comments left on one image.
    ImageComments {
        /// The image's feed item id.
        image: Uuid,
    },
}

impl Endpoint {
    /// Returns this endpoint's URL under `base`.
    ///
    /// The base path is kept and the endpoint path is appended to it. Any
    /// query on `base` is dropped.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidData`](feedcache_store::ErrorKind::InvalidData)
    /// error if the resulting URL is not valid.
    pub fn url(&self, base: &Uri) -> Result<Uri, Error> {
        let prefix = base.path().trim_end_matches('/');
        let path = match self {
            Self::Feed => format!("{prefix}/v1/feed"),
            Self::ImageComments { image } => format!("{prefix}/v1/image/{image}/comments"),
        };

        let mut parts = base.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::try_from(path).map_err(Error::invalid_data)?);
        Uri::from_parts(parts).map_err(Error::invalid_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_url_appends_to_base_path() {
        let base = Uri::from_static("https://base-url.com/essential-feed");
        assert_eq!(
            Endpoint::Feed.url(&base).expect("url should build"),
            "https://base-url.com/essential-feed/v1/feed"
        );
    }

    #[test]
    fn feed_url_from_host_only_base() {
        let base = Uri::from_static("https://base-url.com");
        assert_eq!(Endpoint::Feed.url(&base).expect("url should build"), "https://base-url.com/v1/feed");
    }

    #[test]
    fn image_comments_url_contains_image_id() {
        let image = Uuid::parse_str("2239cba2-cb35-4392-adc3-24a37d38e010").expect("uuid should parse");
        let base = Uri::from_static("https://base-url.com/essential-feed/?page=2");

        let url = Endpoint::ImageComments { image }.url(&base).expect("url should build");

        assert_eq!(
            url,
            "https://base-url.com/essential-feed/v1/image/2239cba2-cb35-4392-adc3-24a37d38e010/comments"
        );
        assert_eq!(url.query(), None);
    }
}
