//! Google Places API response types.
//!
//! Both endpoints report an application-level `status` alongside HTTP 200;
//! anything other than `"OK"` (and `"ZERO_RESULTS"` for autocomplete) is a
//! failure described by `error_message`.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service>

use serde::Deserialize;

/// Status string for a successful request.
const STATUS_OK: &str = "OK";

/// Status string for a successful request without matches.
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Place Autocomplete response.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    /// Request status, e.g. `"OK"` or `"REQUEST_DENIED"`.
    pub status: String,
    /// Predictions in relevance order.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    /// Detail accompanying a failure status.
    pub error_message: Option<String>,
}

impl AutocompleteResponse {
    /// Whether the request succeeded, with or without matches.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK || self.status == STATUS_ZERO_RESULTS
    }
}

/// One autocomplete prediction.
#[derive(Debug, Deserialize)]
pub struct Prediction {
    /// Identifier for the detail lookup.
    pub place_id: String,
    /// Human-readable label.
    pub description: String,
}

/// Place Details response restricted to `fields=geometry`.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    /// Request status.
    pub status: String,
    /// The place, on success.
    pub result: Option<PlaceResult>,
    /// Detail accompanying a failure status.
    pub error_message: Option<String>,
}

impl DetailsResponse {
    /// Whether the request succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Requested place fields.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    /// Place geometry.
    pub geometry: Geometry,
}

/// Place geometry.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Representative point.
    pub location: LatLng,
}

/// A latitude/longitude pair.
#[derive(Debug, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}
