//! Error types emitted by the dinemap CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use dinemap_core::{CoordinateError, SessionError, UnknownProfile};
use dinemap_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the dinemap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The configured position is not a valid coordinate.
    #[error("invalid position: {0}")]
    InvalidPosition(#[source] CoordinateError),
    /// The configured travel profile is not recognised.
    #[error(transparent)]
    InvalidProfile(#[from] UnknownProfile),
    /// Constructing one of the HTTP providers failed.
    #[error("failed to build {service} provider for {base_url:?}: {source}")]
    BuildProvider {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The map session rejected an operation.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
