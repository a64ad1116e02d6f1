//! Plan command implementation for the dinemap CLI.

use clap::Parser;
use dinemap_core::{
    MapRegion, MapSession, MarkerAction, Mode, RestaurantId, RoutePlan, SessionConfig,
    TravelProfile,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

use crate::providers::{ProviderFactory, Services};
use crate::{
    ARG_DIRECTORY_BASE_URL, ARG_GEOCODER_BASE_URL, ARG_LATITUDE, ARG_LONGITUDE,
    ARG_OSRM_BASE_URL, ARG_PROFILE, ARG_STOPS, CliError, ENV_PLAN_LATITUDE, ENV_PLAN_LONGITUDE,
    ENV_PLAN_STOPS, providers, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Locate at the given position, load the nearby restaurants \
                 from the directory service, and resolve a route through the \
                 listed restaurant ids in order using an OSRM instance. The \
                 resolved plan is printed as JSON.",
    about = "Plan a multi-stop restaurant route"
)]
#[ortho_config(prefix = "DINEMAP")]
pub(crate) struct PlanArgs {
    /// Restaurant ids to visit, in order (repeat or separate with commas).
    #[arg(long = ARG_STOPS, value_name = "id", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) stops: Vec<String>,
    /// Latitude of the starting position.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the starting position.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Travel profile: car, bike, or walk.
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Base URL of the restaurant directory service.
    #[arg(long = ARG_DIRECTORY_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) directory_base_url: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL of the Nominatim instance used for the address label.
    #[arg(long = ARG_GEOCODER_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_base_url: Option<String>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Stops in visiting order.
    pub(crate) stops: Vec<RestaurantId>,
    pub(crate) profile: TravelProfile,
    /// Service endpoints; `fix` is always set.
    pub(crate) services: Services,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let stops: Vec<RestaurantId> = args
            .stops
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(RestaurantId::from)
            .collect();
        if stops.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_STOPS,
                env: ENV_PLAN_STOPS,
            });
        }

        let fix = providers::position(
            args.latitude,
            args.longitude,
            [
                (ARG_LATITUDE, ENV_PLAN_LATITUDE),
                (ARG_LONGITUDE, ENV_PLAN_LONGITUDE),
            ],
        )?
        .ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_PLAN_LATITUDE,
        })?;

        let profile = args
            .profile
            .as_deref()
            .map(str::parse::<TravelProfile>)
            .transpose()?
            .unwrap_or_default();

        let defaults = Services::default();
        let services = Services {
            fix: Some(fix),
            directory_base_url: args
                .directory_base_url
                .unwrap_or(defaults.directory_base_url),
            osrm_base_url: args.osrm_base_url.unwrap_or(defaults.osrm_base_url),
            geocoder_base_url: args
                .geocoder_base_url
                .unwrap_or(defaults.geocoder_base_url),
            ..defaults
        };

        Ok(Self {
            stops,
            profile,
            services,
        })
    }
}

/// JSON document printed by the `plan` command.
#[derive(Debug, Serialize)]
pub(crate) struct PlanOutput {
    /// Address of the starting position, when it could be resolved.
    pub(crate) address: Option<String>,
    pub(crate) plan: RoutePlan,
    /// Indices of stops whose incoming leg failed.
    pub(crate) unresolved_stops: Vec<usize>,
    /// Viewport framing the whole route.
    pub(crate) region: Option<MapRegion>,
}

pub(crate) async fn run_plan(
    args: PlanArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let output = execute_plan(&config, factory).await?;
    write_json(writer, &output)
}

pub(crate) async fn execute_plan(
    config: &PlanConfig,
    factory: &dyn ProviderFactory,
) -> Result<PlanOutput, CliError> {
    let session = MapSession::new(factory.build(&config.services)?, SessionConfig::default());
    session.locate().await?;
    info!(
        "{} restaurants around the starting position",
        session.restaurants().len()
    );

    session.set_mode(Mode::PlanRoute);
    session.set_profile(config.profile).await;
    for id in &config.stops {
        if let MarkerAction::Duplicate = session.tap_marker(id).await? {
            warn!("restaurant {id} is already a stop; ignoring repeat");
        }
    }

    let plan = session.plan();
    let unresolved_stops = plan.unresolved_stops();
    if !unresolved_stops.is_empty() {
        warn!("{} legs could not be resolved", unresolved_stops.len());
    }
    Ok(PlanOutput {
        address: session.address(),
        region: session.fit_route(),
        unresolved_stops,
        plan,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
