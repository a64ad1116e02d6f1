//! The map screen facade.
//!
//! [`MapSession`] wires the route planner, mode controller, autocomplete
//! pipeline, and gesture panel to the location and map-data providers, and
//! owns the viewport, the nearby restaurant list, and the address label.
//! Route plans, suggestions, and the viewport are observable through watch
//! channels; everything else is read on demand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::watch;

use crate::mode::{Mode, ModeController, TapIntent, Transition};
use crate::panel::GesturePanel;
use crate::{
    AppendOutcome, Autocomplete, Coordinate, DirectionsProvider, LocationError, LocationProvider,
    MapDataProvider, MapRegion, PlacesProvider, Restaurant, RestaurantId, RouteError, RoutePlan,
    RoutePlanner, RouteStop, RouteStopList, SessionConfig, Suggestion, TravelProfile,
};

/// Errors surfaced by [`MapSession`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No position fix could be obtained.
    #[error(transparent)]
    Location(#[from] LocationError),
    /// A stop-list mutation was rejected.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// A marker referenced a restaurant that is not on the map.
    #[error("restaurant {id} is not on the map")]
    UnknownRestaurant {
        /// Identifier from the tapped marker.
        id: RestaurantId,
    },
}

/// Outcome of tapping a restaurant marker.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerAction {
    /// Browse mode: show the restaurant's details.
    OpenDetail(Arc<Restaurant>),
    /// Plan-route mode: the restaurant became the last stop.
    StopAdded,
    /// Plan-route mode: the restaurant was already a stop.
    Duplicate,
}

/// The external services a session talks to.
#[derive(Clone)]
pub struct Providers {
    /// Position fixes and reverse geocoding.
    pub location: Arc<dyn LocationProvider>,
    /// Nearby restaurant lookup.
    pub map_data: Arc<dyn MapDataProvider>,
    /// Per-leg routing.
    pub directions: Arc<dyn DirectionsProvider>,
    /// Place autocomplete and detail.
    pub places: Arc<dyn PlacesProvider>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ScreenState {
    modes: ModeController,
    panel: GesturePanel,
    restaurants: Vec<Arc<Restaurant>>,
    address: Option<String>,
}

/// State and behaviour of one map screen.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use dinemap_core::test_support::{
///     FixedLocation, FixedRestaurants, ScriptedDirections, ScriptedPlaces,
/// };
/// use dinemap_core::{Coordinate, MapSession, Providers, SessionConfig};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let here = Coordinate::new(10.0, 106.0)?;
/// let session = MapSession::new(
///     Providers {
///         location: Arc::new(FixedLocation::at(here)),
///         map_data: Arc::new(FixedRestaurants::default()),
///         directions: Arc::new(ScriptedDirections::new()),
///         places: Arc::new(ScriptedPlaces::new()),
///     },
///     SessionConfig::default(),
/// );
/// session.locate().await?;
/// assert_eq!(session.region().map(|r| r.center), Some(here));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MapSession {
    config: SessionConfig,
    location: Arc<dyn LocationProvider>,
    map_data: Arc<dyn MapDataProvider>,
    planner: RoutePlanner,
    search: Autocomplete,
    screen: Mutex<ScreenState>,
    region: watch::Sender<Option<MapRegion>>,
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("config", &self.config)
            .field("planner", &self.planner)
            .field("search", &self.search)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl MapSession {
    /// Create a session in browse mode with no position fix.
    #[must_use]
    pub fn new(providers: Providers, config: SessionConfig) -> Self {
        let (region, _) = watch::channel(None);
        Self {
            config,
            location: providers.location,
            map_data: providers.map_data,
            planner: RoutePlanner::new(providers.directions, TravelProfile::default()),
            search: Autocomplete::new(providers.places, config.search),
            screen: Mutex::new(ScreenState {
                modes: ModeController::default(),
                panel: GesturePanel::new(config.panel),
                restaurants: Vec::new(),
                address: None,
            }),
            region,
        }
    }

    fn screen(&self) -> MutexGuard<'_, ScreenState> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn centre_on(&self, center: Coordinate) {
        let region = self.config.region;
        self.region.send_modify(|current| {
            *current = Some(current.map_or_else(
                || MapRegion::new(center, region.latitude_delta, region.longitude_delta),
                |existing| existing.recentred(center),
            ));
        });
    }

    /// Obtain a position fix and refresh everything that depends on it.
    ///
    /// The viewport is centred on the fix, which also becomes the route
    /// origin. The address label and the nearby restaurant list are
    /// refreshed best-effort: failures are logged, the label is emptied, and
    /// the previous restaurant list is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Location`] when no fix is available, most
    /// notably when permission was denied. Nothing is changed in that case.
    pub async fn locate(&self) -> Result<Coordinate, SessionError> {
        let fix = self.location.current_position().await?;
        info!("located at {fix}");
        self.centre_on(fix);
        self.planner.set_origin(fix).await;

        let address = match self.location.reverse_geocode(fix).await {
            Ok(address) => Some(address),
            Err(err) => {
                warn!("reverse geocoding {fix} failed: {err}");
                None
            }
        };
        self.screen().address = address;

        match self.map_data.restaurants_near(fix).await {
            Ok(restaurants) => {
                self.screen().restaurants = restaurants.into_iter().map(Arc::new).collect();
            }
            Err(err) => warn!("keeping previous restaurants: {err}"),
        }
        Ok(fix)
    }

    /// Flip between browse and plan-route mode, returning the new mode.
    ///
    /// Leaving plan-route mode clears the stops and the plan.
    pub fn toggle_mode(&self) -> Mode {
        let (mode, transition) = {
            let mut screen = self.screen();
            let transition = screen.modes.toggle();
            (screen.modes.mode(), transition)
        };
        self.apply(transition);
        mode
    }

    /// Switch to `mode`; see [`MapSession::toggle_mode`].
    pub fn set_mode(&self, mode: Mode) {
        let transition = self.screen().modes.enter(mode);
        self.apply(transition);
    }

    fn apply(&self, transition: Transition) {
        if transition == Transition::ClearRoute {
            self.planner.clear();
        }
    }

    /// Dispatch a marker tap according to the current mode.
    ///
    /// In plan-route mode the restaurant is appended and, when newly added,
    /// the viewport moves to it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRestaurant`] when `id` is not among
    /// the restaurants currently on the map.
    pub async fn tap_marker(&self, id: &RestaurantId) -> Result<MarkerAction, SessionError> {
        let (restaurant, intent) = {
            let screen = self.screen();
            let restaurant = screen
                .restaurants
                .iter()
                .find(|restaurant| &restaurant.id == id)
                .cloned()
                .ok_or_else(|| SessionError::UnknownRestaurant { id: id.clone() })?;
            (restaurant, screen.modes.tap_intent())
        };
        match intent {
            TapIntent::OpenDetail => Ok(MarkerAction::OpenDetail(restaurant)),
            TapIntent::AppendStop => {
                let center = restaurant.coordinate;
                match self.planner.append(restaurant).await {
                    AppendOutcome::Added => {
                        self.centre_on(center);
                        Ok(MarkerAction::StopAdded)
                    }
                    AppendOutcome::Duplicate => Ok(MarkerAction::Duplicate),
                }
            }
        }
    }

    /// Route straight to `restaurant`: switch to plan-route mode, make it
    /// the only stop, and centre the viewport on it.
    pub async fn navigate_to(&self, restaurant: Arc<Restaurant>) {
        let transition = self.screen().modes.enter(Mode::PlanRoute);
        self.apply(transition);
        self.centre_on(restaurant.coordinate);
        self.planner.replace_with(restaurant).await;
    }

    /// Append `restaurant` directly, bypassing marker lookup.
    pub async fn add_stop(&self, restaurant: Arc<Restaurant>) -> AppendOutcome {
        self.planner.append(restaurant).await
    }

    /// Remove the stop at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Route`] when `index` addresses no stop.
    pub async fn remove_stop(&self, index: usize) -> Result<RouteStop, SessionError> {
        Ok(self.planner.remove_at(index).await?)
    }

    /// Switch the travel profile.
    pub async fn set_profile(&self, profile: TravelProfile) {
        self.planner.set_profile(profile).await;
    }

    /// Resolve the current stops again.
    pub async fn refresh_route(&self) {
        self.planner.refresh().await;
    }

    /// Record a search keystroke, biased towards the current position.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&self, text: &str) {
        self.search.set_query(text, self.planner.origin());
    }

    /// Drop the search query and suggestions.
    pub fn clear_query(&self) {
        self.search.clear();
    }

    /// Resolve `suggestion` and centre the viewport on it.
    ///
    /// Returns `None`, leaving the viewport alone, when the lookup fails.
    pub async fn select_suggestion(&self, suggestion: &Suggestion) -> Option<Coordinate> {
        let coordinate = self.search.select(suggestion).await?;
        self.centre_on(coordinate);
        Some(coordinate)
    }

    /// Frame the current route in the viewport.
    ///
    /// Uses the route geometry when present, otherwise the origin and stop
    /// positions. Returns the new region, or `None` when there is nothing to
    /// frame.
    pub fn fit_route(&self) -> Option<MapRegion> {
        let plan = self.planner.plan();
        let points: Vec<Coordinate> = if plan.geometry.is_empty() {
            self.planner
                .origin()
                .into_iter()
                .chain(plan.stops.iter().map(|stop| stop.restaurant().coordinate))
                .collect()
        } else {
            plan.geometry
        };
        let region = self.config.region;
        let fitted = MapRegion::fitting(&points, region.fit_padding, region.min_fit_delta)?;
        self.region.send_replace(Some(fitted));
        Some(fitted)
    }

    /// Start a panel drag; see [`GesturePanel::begin_drag`].
    pub fn begin_panel_drag(&self) -> bool {
        self.screen().panel.begin_drag()
    }

    /// Move the panel drag; see [`GesturePanel::drag_move`].
    pub fn drag_panel(&self, translation: f64) {
        self.screen().panel.drag_move(translation);
    }

    /// Release the panel drag; see [`GesturePanel::end_drag`].
    pub fn end_panel_drag(&self) {
        self.screen().panel.end_drag();
    }

    /// Bring the panel back into view.
    pub fn show_panel(&self) {
        self.screen().panel.show();
    }

    /// Advance panel animations by `elapsed`.
    pub fn advance_panel(&self, elapsed: Duration) {
        self.screen().panel.advance(elapsed);
    }

    /// Current panel offset.
    #[must_use]
    pub fn panel_offset(&self) -> f64 {
        self.screen().panel.offset()
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.screen().modes.mode()
    }

    /// Whether the travel-profile selector is visible.
    #[must_use]
    pub fn shows_profile_selector(&self) -> bool {
        self.screen().modes.shows_profile_selector()
    }

    /// Whether the stop panel is visible.
    #[must_use]
    pub fn shows_stop_panel(&self) -> bool {
        self.screen().modes.shows_stop_panel()
    }

    /// Current viewport, once a position is known.
    #[must_use]
    pub fn region(&self) -> Option<MapRegion> {
        *self.region.borrow()
    }

    /// Observe viewport changes.
    #[must_use]
    pub fn subscribe_region(&self) -> watch::Receiver<Option<MapRegion>> {
        self.region.subscribe()
    }

    /// Restaurants currently shown on the map.
    #[must_use]
    pub fn restaurants(&self) -> Vec<Arc<Restaurant>> {
        self.screen().restaurants.clone()
    }

    /// Address label for the last fix, if geocoding succeeded.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.screen().address.clone()
    }

    /// Current route origin.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.planner.origin()
    }

    /// Current stops.
    #[must_use]
    pub fn stops(&self) -> RouteStopList {
        self.planner.stops()
    }

    /// Current travel profile.
    #[must_use]
    pub fn profile(&self) -> TravelProfile {
        self.planner.profile()
    }

    /// The most recently published route plan.
    #[must_use]
    pub fn plan(&self) -> RoutePlan {
        self.planner.plan()
    }

    /// Observe published route plans.
    #[must_use]
    pub fn subscribe_plan(&self) -> watch::Receiver<RoutePlan> {
        self.planner.subscribe()
    }

    /// Current search text.
    #[must_use]
    pub fn query(&self) -> String {
        self.search.query()
    }

    /// Current suggestions.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.search.suggestions()
    }

    /// Observe suggestion list replacements.
    #[must_use]
    pub fn subscribe_suggestions(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.search.subscribe()
    }
}
