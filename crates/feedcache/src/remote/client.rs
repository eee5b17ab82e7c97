// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use bytes::Bytes;
use http::{Response, Uri};

/// Fetches the response for a URL.
///
/// Any failure to get a response at all is reported as `Self::Error`;
/// unsuccessful status codes are still responses. Dropping the returned
/// future cancels the request.
pub trait HttpClient: Send + Sync {
    /// The transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issues a GET request for `url`.
    fn get(&self, url: &Uri) -> impl Future<Output = Result<Response<Bytes>, Self::Error>> + Send;
}

impl<C> HttpClient for Arc<C>
where
    C: HttpClient,
{
    type Error = C::Error;

    fn get(&self, url: &Uri) -> impl Future<Output = Result<Response<Bytes>, Self::Error>> + Send {
        (**self).get(url)
    }
}
