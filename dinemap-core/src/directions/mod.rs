//! Resolve a single route leg between two coordinates.
//!
//! The `DirectionsProvider` trait abstracts the external directions service.
//! Callers supply an origin, a destination, and a [`TravelProfile`](crate::TravelProfile)
//! and receive the leg's geometry with its distance and duration.
//!
//! Multi-stop routes are assembled one leg at a time by
//! [`crate::resolver`].

mod error;
mod provider;

pub use error::DirectionsError;
pub use provider::{DirectionsProvider, Leg};
