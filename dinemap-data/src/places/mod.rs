//! HTTP-based place autocomplete and place-detail lookup.
//!
//! [`HttpPlacesProvider`] implements [`dinemap_core::PlacesProvider`]
//! against a Google-Places-compatible web service.
//!
//! # Example
//!
//! ```no_run
//! use dinemap_data::places::{HttpPlacesProvider, HttpPlacesProviderConfig};
//!
//! let config = HttpPlacesProviderConfig::new("https://maps.googleapis.com/maps/api", "api-key")
//!     .with_bias_radius(2_000);
//! let provider = HttpPlacesProvider::with_config(config)?;
//! # Ok::<(), dinemap_data::ProviderBuildError>(())
//! ```

mod google;
mod provider;

pub use provider::{DEFAULT_BASE_URL, HttpPlacesProvider, HttpPlacesProviderConfig};
