//! Facade crate for the dinemap route planner.
//!
//! This crate re-exports the core domain types and state machines and, with
//! the default `http` feature, the network-backed providers.

#![forbid(unsafe_code)]

pub use dinemap_core::{
    AppendOutcome, Autocomplete, Coordinate, CoordinateError, DirectionsError, DirectionsProvider,
    GeocodeError, GesturePanel, Leg, LocationError, LocationProvider, MapDataError,
    MapDataProvider, MapRegion, MapSession, MarkerAction, Mode, ModeController, PanelConfig,
    PanelPhase, PlacesError, PlacesProvider, Providers, RegionConfig, Restaurant, RestaurantId,
    RouteError, RoutePlan, RoutePlanner, RouteStop, RouteStopList, SearchConfig, SessionConfig,
    SessionError, Suggestion, TravelProfile,
};

#[cfg(feature = "http")]
pub use dinemap_data::{
    ProviderBuildError,
    geocoding::{NominatimLocationProvider, NominatimLocationProviderConfig},
    places::{HttpPlacesProvider, HttpPlacesProviderConfig},
    restaurants::{HttpRestaurantDirectory, HttpRestaurantDirectoryConfig},
    routing::{HttpDirectionsProvider, HttpDirectionsProviderConfig},
};
