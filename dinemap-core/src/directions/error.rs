use thiserror::Error;

/// Errors from [`crate::directions::DirectionsProvider::directions`].
///
/// A failed leg never aborts a resolve pass; the resolver logs the error and
/// leaves that stop's metrics unset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionsError {
    /// The request exceeded its deadline.
    #[error("directions request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("directions request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request never produced a response.
    #[error("directions request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The service reported an application-level error.
    #[error("directions service returned {code}: {message}")]
    ServiceError {
        /// Service status code.
        code: String,
        /// Service message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse directions response: {message}")]
    ParseError {
        /// Decoder detail.
        message: String,
    },
    /// The service found no route between the two points.
    #[error("no route found between the requested points")]
    NoRoute,
}
