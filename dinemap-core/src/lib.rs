//! Route-planning core of the dinemap restaurant map.
//!
//! The crate models a map screen on which a user browses nearby restaurants
//! and, in plan-route mode, picks an ordered list of stops. The stops are
//! resolved leg by leg through a [`DirectionsProvider`] into a [`RoutePlan`]
//! with concatenated geometry and totals. A debounced [`Autocomplete`]
//! pipeline and a draggable [`GesturePanel`] complete the screen, and
//! [`MapSession`] ties everything together.
//!
//! External services sit behind async provider traits so the state machines
//! here stay free of HTTP; `dinemap-data` supplies the network-backed
//! implementations.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod coordinate;
mod directions;
mod location;
mod map_data;
pub mod mode;
pub mod panel;
mod places;
mod plan;
mod planner;
mod profile;
pub mod resolver;
mod restaurant;
mod search;
mod session;
mod stops;

#[doc(hidden)]
pub mod test_support;

pub use config::{PanelConfig, RegionConfig, SearchConfig, SessionConfig};
pub use coordinate::{Coordinate, CoordinateError, MapRegion};
pub use directions::{DirectionsError, DirectionsProvider, Leg};
pub use location::{GeocodeError, LocationError, LocationProvider};
pub use map_data::{MapDataError, MapDataProvider};
pub use mode::{Mode, ModeController};
pub use panel::{GesturePanel, PanelPhase};
pub use places::{PlacesError, PlacesProvider, Suggestion};
pub use plan::{Generation, RoutePlan};
pub use planner::RoutePlanner;
pub use profile::{TravelProfile, UnknownProfile};
pub use restaurant::{Restaurant, RestaurantId};
pub use search::Autocomplete;
pub use session::{MapSession, MarkerAction, Providers, SessionError};
pub use stops::{AppendOutcome, RouteError, RouteStop, RouteStopList};
