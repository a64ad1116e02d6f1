//! Device location and reverse geocoding.

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// Errors from [`LocationProvider::current_position`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused location access.
    ///
    /// This is the one condition surfaced to the user: without a fix there
    /// is neither an initial map position nor a route origin.
    #[error("location permission denied")]
    PermissionDenied,
    /// A fix could not be obtained for another reason.
    #[error("location unavailable: {message}")]
    Unavailable {
        /// Error detail.
        message: String,
    },
}

/// Errors from [`LocationProvider::reverse_geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// No address is known for the coordinate.
    #[error("no address found")]
    NotFound,
    /// The geocoding request failed.
    #[error("reverse geocoding failed: {message}")]
    Failure {
        /// Error detail.
        message: String,
    },
}

/// Obtain the user's position and describe it as an address.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Return the current position fix.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;

    /// Return a human-readable address for `coordinate`.
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String, GeocodeError>;
}
