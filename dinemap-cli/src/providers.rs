//! Construction of the service providers a command talks to.

use std::sync::Arc;

use dinemap_core::{Coordinate, Providers};
use dinemap_data::ProviderBuildError;
use dinemap_data::geocoding::{NominatimLocationProvider, NominatimLocationProviderConfig};
use dinemap_data::places::{self, HttpPlacesProvider, HttpPlacesProviderConfig};
use dinemap_data::restaurants::{HttpRestaurantDirectory, HttpRestaurantDirectoryConfig};
use dinemap_data::routing::{HttpDirectionsProvider, HttpDirectionsProviderConfig};

use crate::CliError;

/// Directory service used when none is configured.
pub(crate) const DEFAULT_DIRECTORY_BASE_URL: &str = "http://localhost:8080";
/// Nominatim instance used when none is configured.
pub(crate) const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Resolved service endpoints for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Services {
    /// Position reported by the location provider.
    pub(crate) fix: Option<Coordinate>,
    pub(crate) directory_base_url: String,
    /// Directory search radius in metres.
    pub(crate) radius_meters: Option<u32>,
    pub(crate) osrm_base_url: String,
    pub(crate) geocoder_base_url: String,
    pub(crate) places_base_url: String,
    pub(crate) api_key: String,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            fix: None,
            directory_base_url: DEFAULT_DIRECTORY_BASE_URL.to_owned(),
            radius_meters: None,
            osrm_base_url: HttpDirectionsProviderConfig::default().base_url,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_owned(),
            places_base_url: places::DEFAULT_BASE_URL.to_owned(),
            api_key: String::new(),
        }
    }
}

/// Builds the providers for the current invocation.
pub(crate) trait ProviderFactory {
    fn build(&self, services: &Services) -> Result<Providers, CliError>;
}

/// Builds the HTTP providers from `dinemap-data`.
pub(crate) struct HttpProviderFactory;

fn build_error(
    service: &'static str,
    base_url: &str,
) -> impl FnOnce(ProviderBuildError) -> CliError {
    let base_url = base_url.to_owned();
    move |source| CliError::BuildProvider {
        service,
        base_url,
        source,
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(&self, services: &Services) -> Result<Providers, CliError> {
        let mut location_config =
            NominatimLocationProviderConfig::new(services.geocoder_base_url.clone());
        location_config.fix = services.fix;
        let location = NominatimLocationProvider::with_config(location_config)
            .map_err(build_error("geocoding", &services.geocoder_base_url))?;

        let mut directory_config =
            HttpRestaurantDirectoryConfig::new(services.directory_base_url.clone());
        directory_config.radius_meters = services.radius_meters;
        let map_data = HttpRestaurantDirectory::with_config(directory_config)
            .map_err(build_error("restaurant directory", &services.directory_base_url))?;

        let directions = HttpDirectionsProvider::new(services.osrm_base_url.clone())
            .map_err(build_error("directions", &services.osrm_base_url))?;

        let places = HttpPlacesProvider::with_config(HttpPlacesProviderConfig::new(
            services.places_base_url.clone(),
            services.api_key.clone(),
        ))
        .map_err(build_error("places", &services.places_base_url))?;

        Ok(Providers {
            location: Arc::new(location),
            map_data: Arc::new(map_data),
            directions: Arc::new(directions),
            places: Arc::new(places),
        })
    }
}

/// Combine optional latitude and longitude into a position.
///
/// Both absent yields `None`; one without the other is reported as missing.
pub(crate) fn position(
    latitude: Option<f64>,
    longitude: Option<f64>,
    fields: [(&'static str, &'static str); 2],
) -> Result<Option<Coordinate>, CliError> {
    let [(lat_field, lat_env), (lon_field, lon_env)] = fields;
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon)
            .map(Some)
            .map_err(CliError::InvalidPosition),
        (None, Some(_)) => Err(CliError::MissingArgument {
            field: lat_field,
            env: lat_env,
        }),
        (Some(_), None) => Err(CliError::MissingArgument {
            field: lon_field,
            env: lon_env,
        }),
    }
}
