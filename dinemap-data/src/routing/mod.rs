//! HTTP-based directions for route legs.
//!
//! This module provides [`HttpDirectionsProvider`], an implementation of
//! [`dinemap_core::DirectionsProvider`] that resolves one leg at a time
//! against an OSRM routing service.
//!
//! # Example
//!
//! ```no_run
//! use dinemap_data::routing::{HttpDirectionsProvider, HttpDirectionsProviderConfig};
//! use std::time::Duration;
//!
//! // Create a provider with custom configuration
//! let config = HttpDirectionsProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpDirectionsProvider::with_config(config)?;
//!
//! // Or use the simple constructor
//! let provider = HttpDirectionsProvider::new("http://localhost:5000")?;
//! # Ok::<(), dinemap_data::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_USER_AGENT, HttpDirectionsProvider, HttpDirectionsProviderConfig};
