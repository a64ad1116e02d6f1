//! Place search: text autocomplete and place-detail lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// A candidate place returned by autocomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Provider identifier used for the detail lookup.
    pub place_id: String,
    /// Text shown in the suggestion list.
    pub description: String,
}

impl Suggestion {
    /// Construct a suggestion.
    #[must_use]
    pub fn new(place_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            description: description.into(),
        }
    }
}

/// Errors from [`PlacesProvider`] calls.
///
/// All of them are absorbed by the autocomplete pipeline, which resets the
/// suggestion list to empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacesError {
    /// The request exceeded its deadline.
    #[error("places request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("places request to {url} failed with HTTP {status}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request never produced a response.
    #[error("places request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The service reported an application-level error.
    #[error("places service returned {status}: {message}")]
    ServiceError {
        /// Service status string.
        status: String,
        /// Service message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse places response: {message}")]
    ParseError {
        /// Decoder detail.
        message: String,
    },
}

/// Resolve text queries to places and places to coordinates.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Return suggestions for `query`, optionally biased towards `bias`.
    async fn autocomplete(
        &self,
        query: &str,
        bias: Option<Coordinate>,
    ) -> Result<Vec<Suggestion>, PlacesError>;

    /// Resolve a suggestion's place id to its coordinate.
    async fn place_detail(&self, place_id: &str) -> Result<Coordinate, PlacesError>;
}
