//! Nearby restaurant lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Coordinate, Restaurant};

/// Errors from [`MapDataProvider::restaurants_near`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapDataError {
    /// The request failed before a usable response arrived.
    #[error("restaurant request to {url} failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse restaurant list: {message}")]
    ParseError {
        /// Decoder detail.
        message: String,
    },
}

/// Fetch the restaurants shown around a position.
#[async_trait]
pub trait MapDataProvider: Send + Sync {
    /// Return restaurants near `center`.
    async fn restaurants_near(&self, center: Coordinate) -> Result<Vec<Restaurant>, MapDataError>;
}
