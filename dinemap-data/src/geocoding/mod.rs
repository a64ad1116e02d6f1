//! Position fixes and reverse geocoding.
//!
//! A command-line host has no location hardware, so
//! [`NominatimLocationProvider`] reports a fix supplied by configuration and
//! resolves addresses through a Nominatim `/reverse` endpoint.

mod nominatim;
mod provider;

pub use provider::{NominatimLocationProvider, NominatimLocationProviderConfig};
