//! HTTP-based `DirectionsProvider` using OSRM's Route API.
//!
//! Each call requests a single two-coordinate route with the full GeoJSON
//! overview and turns the best route into a [`Leg`].

use std::time::Duration;

use async_trait::async_trait;
use dinemap_core::{Coordinate, DirectionsError, DirectionsProvider, Leg, TravelProfile};
use log::debug;
use reqwest::Client;
use url::Url;

use super::osrm::RouteResponse;
use crate::http::{self, FetchError, ProviderBuildError};

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "dinemap-directions/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpDirectionsProvider`].
#[derive(Debug, Clone)]
pub struct HttpDirectionsProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpDirectionsProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpDirectionsProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based directions provider using the OSRM Route API.
///
/// # Example
///
/// ```no_run
/// use dinemap_core::{Coordinate, DirectionsProvider, TravelProfile};
/// use dinemap_data::routing::HttpDirectionsProvider;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = HttpDirectionsProvider::new("http://localhost:5000")?;
/// let leg = provider
///     .directions(
///         Coordinate::new(10.0, 106.0)?,
///         Coordinate::new(10.01, 106.01)?,
///         TravelProfile::Walk,
///     )
///     .await?;
/// println!("{} m", leg.distance_meters);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpDirectionsProvider {
    client: Client,
    config: HttpDirectionsProviderConfig,
    base: Url,
}

impl HttpDirectionsProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDirectionsProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpDirectionsProviderConfig) -> Result<Self, ProviderBuildError> {
        let base = http::parse_base(&config.base_url)?;
        let client = http::build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    /// Build the OSRM Route API URL for one leg.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`.
    fn build_route_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TravelProfile,
    ) -> Url {
        let coords = format!(
            "{},{};{},{}",
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude()
        );
        let mut url = http::endpoint(&self.base, ["route", "v1", profile.osrm_profile(), coords.as_str()]);
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        url
    }

    /// Convert a transport failure to a `DirectionsError`.
    fn convert_fetch_error(&self, error: FetchError, url: &Url) -> DirectionsError {
        let url = url.to_string();
        match error {
            FetchError::Timeout => DirectionsError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            FetchError::Status { status, message } => DirectionsError::HttpError {
                url,
                status,
                message,
            },
            FetchError::Network(message) => DirectionsError::NetworkError { url, message },
            FetchError::Decode(message) => DirectionsError::ParseError { message },
        }
    }
}

/// Convert an OSRM response to a `Leg`.
fn convert_response(response: RouteResponse) -> Result<Leg, DirectionsError> {
    if !response.is_ok() {
        if response.code == "NoRoute" {
            return Err(DirectionsError::NoRoute);
        }
        return Err(DirectionsError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;

    let geometry = route
        .geometry
        .map(|line| line.coordinates)
        .unwrap_or_default()
        .into_iter()
        .map(|[lon, lat]| {
            Coordinate::new(lat, lon).map_err(|err| DirectionsError::ParseError {
                message: format!("route geometry: {err}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Leg::new(geometry, route.distance, route.duration))
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TravelProfile,
    ) -> Result<Leg, DirectionsError> {
        let url = self.build_route_url(origin, destination, profile);
        debug!("requesting {profile} leg {origin} -> {destination}");
        let response: RouteResponse = http::get_json(&self.client, url.clone())
            .await
            .map_err(|err| self.convert_fetch_error(err, &url))?;
        convert_response(response)
    }
}
