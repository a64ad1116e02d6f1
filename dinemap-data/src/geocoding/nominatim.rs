//! Nominatim reverse-geocoding response type.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Reverse/>

use serde::Deserialize;

/// `/reverse?format=jsonv2` response.
///
/// Nominatim answers HTTP 200 with an `error` field when nothing is found.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    /// Full comma-separated address.
    pub display_name: Option<String>,
    /// Failure description, e.g. `"Unable to geocode"`.
    pub error: Option<String>,
}
