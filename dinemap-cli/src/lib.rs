//! Command-line interface driving the dinemap route planner against live
//! services.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::future::Future;
use std::io::Write;

mod error;
mod nearby;
mod plan;
mod providers;
mod search;

pub use error::CliError;

use nearby::{NearbyArgs, run_nearby};
use plan::{PlanArgs, run_plan};
use search::{SearchArgs, run_search};

pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_STOPS: &str = "stop";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_SELECT: &str = "select";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_DIRECTORY_BASE_URL: &str = "directory-base-url";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_GEOCODER_BASE_URL: &str = "geocoder-base-url";
pub(crate) const ARG_PLACES_BASE_URL: &str = "places-base-url";

pub(crate) const ENV_PLAN_STOPS: &str = "DINEMAP_CMDS_PLAN_STOPS";
pub(crate) const ENV_PLAN_LATITUDE: &str = "DINEMAP_CMDS_PLAN_LATITUDE";
pub(crate) const ENV_PLAN_LONGITUDE: &str = "DINEMAP_CMDS_PLAN_LONGITUDE";
pub(crate) const ENV_SEARCH_QUERY: &str = "DINEMAP_CMDS_SEARCH_QUERY";
pub(crate) const ENV_SEARCH_API_KEY: &str = "DINEMAP_CMDS_SEARCH_API_KEY";
pub(crate) const ENV_SEARCH_LATITUDE: &str = "DINEMAP_CMDS_SEARCH_LATITUDE";
pub(crate) const ENV_SEARCH_LONGITUDE: &str = "DINEMAP_CMDS_SEARCH_LONGITUDE";
pub(crate) const ENV_NEARBY_LATITUDE: &str = "DINEMAP_CMDS_NEARBY_LATITUDE";
pub(crate) const ENV_NEARBY_LONGITUDE: &str = "DINEMAP_CMDS_NEARBY_LONGITUDE";

/// Run the dinemap CLI with the current process arguments and environment.
///
/// Results are written to standard output as pretty-printed JSON.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    let factory = providers::HttpProviderFactory;
    match cli.command {
        Command::Plan(args) => block_on(run_plan(args, &factory, &mut stdout))?,
        Command::Search(args) => block_on(run_search(args, &factory, &mut stdout))?,
        Command::Nearby(args) => block_on(run_nearby(args, &factory, &mut stdout))?,
    }
}

/// Drive `future` to completion on a single-threaded runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "dinemap",
    about = "Plan multi-stop restaurant routes against live map services",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a route from a position through restaurants in order.
    Plan(PlanArgs),
    /// Autocomplete a place query, optionally resolving the top suggestion.
    Search(SearchArgs),
    /// List restaurants and the address around a position.
    Nearby(NearbyArgs),
}

#[cfg(test)]
mod tests;
