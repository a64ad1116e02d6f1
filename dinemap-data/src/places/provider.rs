//! HTTP-based `PlacesProvider` for the Places Autocomplete and Details APIs.

use std::time::Duration;

use async_trait::async_trait;
use dinemap_core::{Coordinate, PlacesError, PlacesProvider, Suggestion};
use log::debug;
use reqwest::Client;
use url::Url;

use super::google::{AutocompleteResponse, DetailsResponse};
use crate::http::{self, FetchError, ProviderBuildError};

/// Public Google Maps web-service root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

const DEFAULT_USER_AGENT: &str = "dinemap-places/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BIAS_RADIUS_METERS: u32 = 5_000;

/// Configuration for [`HttpPlacesProvider`].
#[derive(Clone)]
pub struct HttpPlacesProviderConfig {
    /// Service root; endpoint paths are appended to it.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Radius around the location bias, in metres.
    pub bias_radius_meters: u32,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpPlacesProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlacesProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("bias_radius_meters", &self.bias_radius_meters)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpPlacesProviderConfig {
    /// Create a configuration for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            bias_radius_meters: DEFAULT_BIAS_RADIUS_METERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the location-bias radius.
    #[must_use]
    pub const fn with_bias_radius(mut self, meters: u32) -> Self {
        self.bias_radius_meters = meters;
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

/// Places provider backed by the Places web service.
///
/// URLs embedded in errors and logs have their query string removed so the
/// API key never leaks.
#[derive(Debug)]
pub struct HttpPlacesProvider {
    client: Client,
    config: HttpPlacesProviderConfig,
    base: Url,
}

impl HttpPlacesProvider {
    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: HttpPlacesProviderConfig) -> Result<Self, ProviderBuildError> {
        let base = http::parse_base(&config.base_url)?;
        let client = http::build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            config,
            base,
        })
    }

    fn autocomplete_url(&self, query: &str, bias: Option<Coordinate>) -> Url {
        let mut url = http::endpoint(&self.base, ["place", "autocomplete", "json"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("input", query);
            if let Some(centre) = bias {
                pairs
                    .append_pair(
                        "location",
                        &format!("{},{}", centre.latitude(), centre.longitude()),
                    )
                    .append_pair("radius", &self.config.bias_radius_meters.to_string());
            }
            pairs.append_pair("key", &self.config.api_key);
        }
        url
    }

    fn details_url(&self, place_id: &str) -> Url {
        let mut url = http::endpoint(&self.base, ["place", "details", "json"]);
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", "geometry")
            .append_pair("key", &self.config.api_key);
        url
    }

    fn convert_fetch_error(&self, error: FetchError, url: &Url) -> PlacesError {
        let url = http::redacted(url);
        match error {
            FetchError::Timeout => PlacesError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            FetchError::Status { status, .. } => PlacesError::HttpError { url, status },
            FetchError::Network(message) => PlacesError::NetworkError { url, message },
            FetchError::Decode(message) => PlacesError::ParseError { message },
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        debug!("requesting {}", http::redacted(&url));
        http::get_json(&self.client, url.clone())
            .await
            .map_err(|err| self.convert_fetch_error(err, &url))
    }
}

fn convert_autocomplete(response: AutocompleteResponse) -> Result<Vec<Suggestion>, PlacesError> {
    if !response.is_ok() {
        return Err(PlacesError::ServiceError {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }
    Ok(response
        .predictions
        .into_iter()
        .map(|prediction| Suggestion::new(prediction.place_id, prediction.description))
        .collect())
}

fn convert_details(response: DetailsResponse) -> Result<Coordinate, PlacesError> {
    if !response.is_ok() {
        return Err(PlacesError::ServiceError {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }
    let location = response
        .result
        .ok_or_else(|| PlacesError::ParseError {
            message: "place details response missing result".to_owned(),
        })?
        .geometry
        .location;
    Coordinate::new(location.lat, location.lng).map_err(|err| PlacesError::ParseError {
        message: format!("place location: {err}"),
    })
}

#[async_trait]
impl PlacesProvider for HttpPlacesProvider {
    async fn autocomplete(
        &self,
        query: &str,
        bias: Option<Coordinate>,
    ) -> Result<Vec<Suggestion>, PlacesError> {
        let response = self.fetch(self.autocomplete_url(query, bias)).await?;
        convert_autocomplete(response)
    }

    async fn place_detail(&self, place_id: &str) -> Result<Coordinate, PlacesError> {
        let response = self.fetch(self.details_url(place_id)).await?;
        convert_details(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::places::google::{Geometry, LatLng, PlaceResult, Prediction};

    #[fixture]
    fn provider() -> HttpPlacesProvider {
        let config = HttpPlacesProviderConfig::new("https://maps.example.com/maps/api", "k3y")
            .with_bias_radius(1_500);
        HttpPlacesProvider::with_config(config).expect("provider should build")
    }

    #[rstest]
    fn autocomplete_url_encodes_query(provider: HttpPlacesProvider) {
        let url = provider.autocomplete_url("phở bò & more", None);

        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/place/autocomplete/json?input=ph%E1%BB%9F+b%C3%B2+%26+more&key=k3y"
        );
    }

    #[rstest]
    fn autocomplete_url_carries_bias(provider: HttpPlacesProvider) {
        let bias = Coordinate::new(10.5, 106.25).expect("valid");

        let url = provider.autocomplete_url("pho", Some(bias));

        assert_eq!(url.query(), Some("input=pho&location=10.5%2C106.25&radius=1500&key=k3y"));
    }

    #[rstest]
    fn details_url_requests_geometry_only(provider: HttpPlacesProvider) {
        let url = provider.details_url("ChIJ1");

        assert_eq!(url.path(), "/maps/api/place/details/json");
        assert_eq!(url.query(), Some("place_id=ChIJ1&fields=geometry&key=k3y"));
    }

    #[rstest]
    fn errors_never_carry_the_key(provider: HttpPlacesProvider) {
        let url = provider.details_url("ChIJ1");

        let err = provider.convert_fetch_error(FetchError::Network("refused".to_owned()), &url);

        assert!(!err.to_string().contains("k3y"));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_service_errors_never_carry_the_key() {
        let config = HttpPlacesProviderConfig::new("http://127.0.0.1:1", "SECRETKEY");
        let provider = HttpPlacesProvider::with_config(config).expect("provider should build");

        let err = provider
            .autocomplete("pho", None)
            .await
            .expect_err("nothing listens on port 1");

        assert!(!err.to_string().contains("SECRETKEY"), "{err}");
        assert!(!format!("{err:?}").contains("SECRETKEY"), "{err:?}");
    }

    #[rstest]
    fn converts_predictions_in_order() {
        let response = AutocompleteResponse {
            status: "OK".to_owned(),
            predictions: vec![
                Prediction {
                    place_id: "a".to_owned(),
                    description: "First".to_owned(),
                },
                Prediction {
                    place_id: "b".to_owned(),
                    description: "Second".to_owned(),
                },
            ],
            error_message: None,
        };

        let suggestions = convert_autocomplete(response).expect("should convert");

        assert_eq!(
            suggestions,
            vec![Suggestion::new("a", "First"), Suggestion::new("b", "Second")]
        );
    }

    #[rstest]
    fn zero_results_yield_no_suggestions() {
        let response = AutocompleteResponse {
            status: "ZERO_RESULTS".to_owned(),
            predictions: Vec::new(),
            error_message: None,
        };

        assert_eq!(convert_autocomplete(response), Ok(Vec::new()));
    }

    #[rstest]
    #[case("REQUEST_DENIED")]
    #[case("OVER_QUERY_LIMIT")]
    fn failure_status_is_a_service_error(#[case] status: &str) {
        let response = AutocompleteResponse {
            status: status.to_owned(),
            predictions: Vec::new(),
            error_message: Some("nope".to_owned()),
        };

        let err = convert_autocomplete(response).expect_err("should fail");

        assert_eq!(
            err,
            PlacesError::ServiceError {
                status: status.to_owned(),
                message: "nope".to_owned(),
            }
        );
    }

    #[rstest]
    fn converts_detail_location() {
        let response = DetailsResponse {
            status: "OK".to_owned(),
            result: Some(PlaceResult {
                geometry: Geometry {
                    location: LatLng {
                        lat: 10.77,
                        lng: 106.7,
                    },
                },
            }),
            error_message: None,
        };

        let coordinate = convert_details(response).expect("should convert");

        assert_eq!(coordinate, Coordinate::new(10.77, 106.7).expect("valid"));
    }

    #[rstest]
    fn detail_without_result_is_a_parse_error() {
        let response = DetailsResponse {
            status: "OK".to_owned(),
            result: None,
            error_message: None,
        };

        let err = convert_details(response).expect_err("should fail");

        assert!(matches!(err, PlacesError::ParseError { .. }));
    }
}
