//! Network-backed providers for the dinemap route planner.
//!
//! Responsibilities:
//! - Implement the provider traits from `dinemap-core` over HTTP.
//! - Own the wire formats of each upstream service.
//! - Map transport failures onto the core error enums.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `dinemap-core`).
//! - Keep blocking I/O off async executors; every client is async reqwest.
//!
//! Invariants:
//! - Providers are `Send + Sync` and hold no mutable state.
//! - API keys never appear in errors or log lines.

#![forbid(unsafe_code)]

mod http;

pub mod geocoding;
pub mod places;
pub mod restaurants;
pub mod routing;

#[doc(hidden)]
pub mod test_support;

pub use http::ProviderBuildError;
