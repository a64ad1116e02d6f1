//! Search command implementation for the dinemap CLI.

use clap::Parser;
use dinemap_core::{Autocomplete, Coordinate, SearchConfig, Suggestion};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

use crate::providers::{ProviderFactory, Services};
use crate::{
    ARG_API_KEY, ARG_LATITUDE, ARG_LONGITUDE, ARG_PLACES_BASE_URL, ARG_QUERY, ARG_SELECT,
    CliError, ENV_SEARCH_API_KEY, ENV_SEARCH_LATITUDE, ENV_SEARCH_LONGITUDE, ENV_SEARCH_QUERY,
    providers, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Send a query through the debounced autocomplete pipeline \
                 and print the suggestions as JSON. With --select the top \
                 suggestion is resolved to a coordinate.",
    about = "Autocomplete a place query"
)]
#[ortho_config(prefix = "DINEMAP")]
pub(crate) struct SearchArgs {
    /// Text to autocomplete.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// API key for the places service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Latitude to bias suggestions towards.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude to bias suggestions towards.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Resolve the top suggestion to a coordinate.
    #[arg(long = ARG_SELECT)]
    #[serde(default)]
    pub(crate) select: bool,
    /// Base URL of the places web service.
    #[arg(long = ARG_PLACES_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_base_url: Option<String>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchCommandConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchCommandConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchCommandConfig {
    pub(crate) query: String,
    pub(crate) bias: Option<Coordinate>,
    pub(crate) select: bool,
    pub(crate) services: Services,
}

impl TryFrom<SearchArgs> for SearchCommandConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_QUERY,
                env: ENV_SEARCH_QUERY,
            })?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_SEARCH_API_KEY,
        })?;
        let bias = providers::position(
            args.latitude,
            args.longitude,
            [
                (ARG_LATITUDE, ENV_SEARCH_LATITUDE),
                (ARG_LONGITUDE, ENV_SEARCH_LONGITUDE),
            ],
        )?;

        let defaults = Services::default();
        let services = Services {
            places_base_url: args.places_base_url.unwrap_or(defaults.places_base_url),
            api_key,
            ..defaults
        };
        Ok(Self {
            query,
            bias,
            select: args.select,
            services,
        })
    }
}

/// JSON document printed by the `search` command.
#[derive(Debug, Serialize)]
pub(crate) struct SearchOutput {
    pub(crate) query: String,
    pub(crate) suggestions: Vec<Suggestion>,
    /// Position of the top suggestion when `--select` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) selected: Option<Coordinate>,
}

pub(crate) async fn run_search(
    args: SearchArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let output = execute_search(&config, factory).await?;
    write_json(writer, &output)
}

pub(crate) async fn execute_search(
    config: &SearchCommandConfig,
    factory: &dyn ProviderFactory,
) -> Result<SearchOutput, CliError> {
    let providers = factory.build(&config.services)?;
    let search = Autocomplete::new(providers.places, SearchConfig::default());
    let mut published = search.subscribe();
    search.set_query(&config.query, config.bias);
    // Every query publishes exactly once: short ones immediately, the rest
    // after the debounce and the request.
    if published.changed().await.is_err() {
        warn!("autocomplete pipeline closed before answering");
    }
    let suggestions = search.suggestions();
    info!("{} suggestions for {:?}", suggestions.len(), config.query);

    let selected = match (config.select, suggestions.first()) {
        (true, Some(top)) => search.select(top).await,
        _ => None,
    };
    Ok(SearchOutput {
        query: config.query.clone(),
        suggestions,
        selected,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchCommandConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchCommandConfig::try_from(merged)
}
