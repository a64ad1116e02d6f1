//! HTTP-based `MapDataProvider` for the restaurant directory.

use std::time::Duration;

use async_trait::async_trait;
use dinemap_core::{Coordinate, MapDataError, MapDataProvider, Restaurant};
use log::{debug, warn};
use reqwest::Client;
use url::Url;

use super::record::RestaurantRecord;
use crate::http::{self, FetchError, ProviderBuildError};

const DEFAULT_USER_AGENT: &str = "dinemap-directory/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`HttpRestaurantDirectory`].
#[derive(Debug, Clone)]
pub struct HttpRestaurantDirectoryConfig {
    /// Directory service root.
    pub base_url: String,
    /// Search radius sent with each request; the service default applies
    /// when unset.
    pub radius_meters: Option<u32>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpRestaurantDirectoryConfig {
    /// Create a configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            radius_meters: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Limit results to `meters` around the requested centre.
    #[must_use]
    pub const fn with_radius(mut self, meters: u32) -> Self {
        self.radius_meters = Some(meters);
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

/// Restaurant directory client.
///
/// Records with invalid positions are skipped with a warning rather than
/// failing the whole list.
#[derive(Debug)]
pub struct HttpRestaurantDirectory {
    client: Client,
    config: HttpRestaurantDirectoryConfig,
    base: Url,
}

impl HttpRestaurantDirectory {
    /// Create a directory client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpRestaurantDirectoryConfig) -> Result<Self, ProviderBuildError> {
        let base = http::parse_base(&config.base_url)?;
        let client = http::build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    fn nearby_url(&self, center: Coordinate) -> Url {
        let mut url = http::endpoint(&self.base, ["restaurants", "nearby"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("lat", &center.latitude().to_string())
                .append_pair("lng", &center.longitude().to_string());
            if let Some(radius) = self.config.radius_meters {
                pairs.append_pair("radius", &radius.to_string());
            }
        }
        url
    }

    fn convert_fetch_error(&self, error: FetchError, url: &Url) -> MapDataError {
        let url = url.to_string();
        match error {
            FetchError::Timeout => MapDataError::Request {
                url,
                message: format!("timed out after {}s", self.config.timeout.as_secs()),
            },
            FetchError::Status { status, .. } => MapDataError::Request {
                url,
                message: format!("HTTP {status}"),
            },
            FetchError::Network(message) => MapDataError::Request { url, message },
            FetchError::Decode(message) => MapDataError::ParseError { message },
        }
    }
}

fn convert_records(records: Vec<RestaurantRecord>) -> Vec<Restaurant> {
    records
        .into_iter()
        .filter_map(|record| {
            let name = record.name.clone();
            Restaurant::try_from(record)
                .inspect_err(|err| warn!("skipping restaurant {name:?}: {err}"))
                .ok()
        })
        .collect()
}

#[async_trait]
impl MapDataProvider for HttpRestaurantDirectory {
    async fn restaurants_near(&self, center: Coordinate) -> Result<Vec<Restaurant>, MapDataError> {
        let url = self.nearby_url(center);
        let records: Vec<RestaurantRecord> = http::get_json(&self.client, url.clone())
            .await
            .map_err(|err| self.convert_fetch_error(err, &url))?;
        let restaurants = convert_records(records);
        debug!("{} restaurants near {center}", restaurants.len());
        Ok(restaurants)
    }
}
