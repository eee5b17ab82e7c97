// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for feed cache operations.

use std::fmt;

/// Classifies where a failure came from.
///
/// The kind is the only part of an [`Error`] that callers are expected to
/// branch on; the attached cause is diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The remote source could not be reached.
    Connectivity,
    /// The remote source answered, but the payload could not be decoded.
    InvalidData,
    /// The store could not be read, or its contents are corrupt.
    StoreRead,
    /// The store could not be written or cleared.
    StoreWrite,
    /// Nothing is cached for the requested key.
    NotFound,
}

impl ErrorKind {
    /// Returns a stable, machine-readable name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::InvalidData => "invalid_data",
            Self::StoreRead => "store_read",
            Self::StoreWrite => "store_write",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a feed cache operation.
///
/// Every error carries an [`ErrorKind`]. Use [`std::error::Error::source()`]
/// to reach the underlying cause, if one was attached.
///
/// # Example
///
/// ```
/// use feedcache_store::{Error, ErrorKind};
///
/// let error = Error::store_read("blob is truncated");
/// assert_eq!(error.kind(), ErrorKind::StoreRead);
/// ```
#[ohno::error]
#[display("feed cache failure: {kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Creates a [`ErrorKind::Connectivity`] error.
    pub fn connectivity(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Connectivity, cause)
    }

    /// Creates a [`ErrorKind::InvalidData`] error.
    pub fn invalid_data(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::InvalidData, cause)
    }

    /// Creates a [`ErrorKind::StoreRead`] error.
    pub fn store_read(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::StoreRead, cause)
    }

    /// Creates a [`ErrorKind::StoreWrite`] error.
    pub fn store_write(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::StoreWrite, cause)
    }

    /// Creates a [`ErrorKind::NotFound`] error.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }
}

/// A specialized [`Result`] type for feed cache operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        assert_eq!(Error::connectivity("x").kind(), ErrorKind::Connectivity);
        assert_eq!(Error::invalid_data("x").kind(), ErrorKind::InvalidData);
        assert_eq!(Error::store_read("x").kind(), ErrorKind::StoreRead);
        assert_eq!(Error::store_write("x").kind(), ErrorKind::StoreWrite);
        assert_eq!(Error::not_found().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn display_contains_kind_and_cause() {
        let error = Error::store_write("permission denied");
        let display_str = format!("{error}");
        assert!(display_str.contains("store_write"), "got: {display_str}");
        assert!(display_str.contains("permission denied"), "got: {display_str}");
    }

    #[test]
    fn source_exposes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let error = Error::store_write(io);
        let source = std::error::Error::source(&error).expect("cause should be attached");
        assert!(source.to_string().contains("read-only volume"));
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(Error::not_found())
        }

        let err = returns_err().expect_err("should return an error");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
