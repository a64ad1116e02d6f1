//! `LocationProvider` with a configured fix and Nominatim reverse geocoding.

use std::time::Duration;

use async_trait::async_trait;
use dinemap_core::{Coordinate, GeocodeError, LocationError, LocationProvider};
use log::debug;
use reqwest::Client;
use url::Url;

use super::nominatim::ReverseResponse;
use crate::http::{self, FetchError, ProviderBuildError};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = "dinemap-geocoding/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`NominatimLocationProvider`].
#[derive(Debug, Clone)]
pub struct NominatimLocationProviderConfig {
    /// Nominatim service root.
    pub base_url: String,
    /// Position reported as the current fix; `None` behaves like a denied
    /// location permission.
    pub fix: Option<Coordinate>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for NominatimLocationProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            fix: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimLocationProviderConfig {
    /// Create a configuration against `base_url` with no fix.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Report `fix` as the current position.
    #[must_use]
    pub const fn with_fix(mut self, fix: Coordinate) -> Self {
        self.fix = Some(fix);
        self
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

/// Location provider for hosts without positioning hardware.
///
/// # Example
///
/// ```no_run
/// use dinemap_core::{Coordinate, LocationProvider};
/// use dinemap_data::geocoding::{NominatimLocationProvider, NominatimLocationProviderConfig};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NominatimLocationProviderConfig::default()
///     .with_fix(Coordinate::new(10.7769, 106.7009)?);
/// let provider = NominatimLocationProvider::with_config(config)?;
/// let fix = provider.current_position().await?;
/// println!("{}", provider.reverse_geocode(fix).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NominatimLocationProvider {
    client: Client,
    config: NominatimLocationProviderConfig,
    base: Url,
}

impl NominatimLocationProvider {
    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: NominatimLocationProviderConfig) -> Result<Self, ProviderBuildError> {
        let base = http::parse_base(&config.base_url)?;
        let client = http::build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    fn reverse_url(&self, coordinate: Coordinate) -> Url {
        let mut url = http::endpoint(&self.base, ["reverse"]);
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &coordinate.latitude().to_string())
            .append_pair("lon", &coordinate.longitude().to_string());
        url
    }

    fn convert_fetch_error(&self, error: FetchError, url: &Url) -> GeocodeError {
        let message = match error {
            FetchError::Timeout => format!(
                "request to {url} timed out after {}s",
                self.config.timeout.as_secs()
            ),
            FetchError::Status { status, .. } => {
                format!("request to {url} failed with HTTP {status}")
            }
            FetchError::Network(message) => format!("request to {url} failed: {message}"),
            FetchError::Decode(message) => format!("failed to parse response: {message}"),
        };
        GeocodeError::Failure { message }
    }
}

fn convert_response(response: ReverseResponse) -> Result<String, GeocodeError> {
    if response.error.is_some() {
        return Err(GeocodeError::NotFound);
    }
    response
        .display_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(GeocodeError::NotFound)
}

#[async_trait]
impl LocationProvider for NominatimLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.config.fix.ok_or(LocationError::PermissionDenied)
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        let url = self.reverse_url(coordinate);
        debug!("reverse geocoding {coordinate}");
        let response = http::get_json(&self.client, url.clone())
            .await
            .map_err(|err| self.convert_fetch_error(err, &url))?;
        convert_response(response)
    }
}
