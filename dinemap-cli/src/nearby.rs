//! Nearby command implementation for the dinemap CLI.

use clap::Parser;
use dinemap_core::{Coordinate, MapSession, Restaurant, SessionConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

use crate::providers::{ProviderFactory, Services};
use crate::{
    ARG_DIRECTORY_BASE_URL, ARG_GEOCODER_BASE_URL, ARG_LATITUDE, ARG_LONGITUDE, ARG_RADIUS,
    CliError, ENV_NEARBY_LATITUDE, ENV_NEARBY_LONGITUDE, providers, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List restaurants and the address around a position")]
#[ortho_config(prefix = "DINEMAP")]
pub(crate) struct NearbyArgs {
    /// Latitude of the position.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the position.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Search radius in metres; the directory default applies when unset.
    #[arg(long = ARG_RADIUS, value_name = "meters")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Base URL of the restaurant directory service.
    #[arg(long = ARG_DIRECTORY_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) directory_base_url: Option<String>,
    /// Base URL of the Nominatim instance used for the address label.
    #[arg(long = ARG_GEOCODER_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_base_url: Option<String>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<Services, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        services_from(merged)
    }
}

fn services_from(args: NearbyArgs) -> Result<Services, CliError> {
    let fix = providers::position(
        args.latitude,
        args.longitude,
        [
            (ARG_LATITUDE, ENV_NEARBY_LATITUDE),
            (ARG_LONGITUDE, ENV_NEARBY_LONGITUDE),
        ],
    )?
    .ok_or(CliError::MissingArgument {
        field: ARG_LATITUDE,
        env: ENV_NEARBY_LATITUDE,
    })?;
    let defaults = Services::default();
    Ok(Services {
        fix: Some(fix),
        radius_meters: args.radius,
        directory_base_url: args
            .directory_base_url
            .unwrap_or(defaults.directory_base_url),
        geocoder_base_url: args
            .geocoder_base_url
            .unwrap_or(defaults.geocoder_base_url),
        ..defaults
    })
}

/// JSON document printed by the `nearby` command.
#[derive(Debug, Serialize)]
pub(crate) struct NearbyOutput {
    pub(crate) position: Coordinate,
    pub(crate) address: Option<String>,
    pub(crate) restaurants: Vec<Arc<Restaurant>>,
}

pub(crate) async fn run_nearby(
    args: NearbyArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let services = args.into_config()?;
    let output = execute_nearby(&services, factory).await?;
    write_json(writer, &output)
}

pub(crate) async fn execute_nearby(
    services: &Services,
    factory: &dyn ProviderFactory,
) -> Result<NearbyOutput, CliError> {
    let session = MapSession::new(factory.build(services)?, SessionConfig::default());
    let position = session.locate().await?;
    Ok(NearbyOutput {
        position,
        address: session.address(),
        restaurants: session.restaurants(),
    })
}
