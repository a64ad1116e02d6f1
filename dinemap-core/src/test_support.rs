//! Scripted provider doubles used by unit and behaviour tests.
//!
//! Each double records the requests it receives and answers from a script
//! configured up front, so tests can assert call order and inject failures
//! without any network access.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    Coordinate, DirectionsError, DirectionsProvider, GeocodeError, Leg, LocationError,
    LocationProvider, MapDataError, MapDataProvider, PlacesError, PlacesProvider, Restaurant,
    Suggestion, TravelProfile,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// A directions request observed by [`ScriptedDirections`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsCall {
    /// Requested leg start.
    pub origin: Coordinate,
    /// Requested leg end.
    pub destination: Coordinate,
    /// Requested profile.
    pub profile: TravelProfile,
}

/// `DirectionsProvider` answering from per-destination scripts.
///
/// Destinations without a script resolve to a straight two-point leg of
/// 1000 m and 100 s. Every call yields to the scheduler (or sleeps for the
/// configured delay) before answering, so concurrent passes interleave.
///
/// # Example
///
/// ```
/// use dinemap_core::{Coordinate, DirectionsError, test_support::ScriptedDirections};
///
/// let unreachable = Coordinate::new(10.0, 106.0)?;
/// let directions = ScriptedDirections::new().with_failure(unreachable, DirectionsError::NoRoute);
/// assert!(directions.calls().is_empty());
/// # Ok::<(), dinemap_core::CoordinateError>(())
/// ```
#[derive(Debug, Default)]
pub struct ScriptedDirections {
    script: Vec<(Coordinate, Result<Leg, DirectionsError>)>,
    delay: Duration,
    calls: Mutex<Vec<DirectionsCall>>,
}

impl ScriptedDirections {
    /// Distance of an unscripted leg in metres.
    pub const DEFAULT_DISTANCE_METERS: f64 = 1000.0;
    /// Duration of an unscripted leg in seconds.
    pub const DEFAULT_DURATION_SECONDS: f64 = 100.0;

    /// Create a provider answering every leg with the default straight line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer legs ending at `destination` with `leg`.
    #[must_use]
    pub fn with_leg(mut self, destination: Coordinate, leg: Leg) -> Self {
        self.script.push((destination, Ok(leg)));
        self
    }

    /// Fail legs ending at `destination` with `error`.
    #[must_use]
    pub fn with_failure(mut self, destination: Coordinate, error: DirectionsError) -> Self {
        self.script.push((destination, Err(error)));
        self
    }

    /// Sleep for `delay` before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<DirectionsCall> {
        lock(&self.calls).clone()
    }

    /// Forget previously recorded calls.
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }
}

#[async_trait]
impl DirectionsProvider for ScriptedDirections {
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TravelProfile,
    ) -> Result<Leg, DirectionsError> {
        lock(&self.calls).push(DirectionsCall {
            origin,
            destination,
            profile,
        });
        pause(self.delay).await;
        self.script
            .iter()
            .find(|(scripted, _)| *scripted == destination)
            .map_or_else(
                || {
                    Ok(Leg::new(
                        vec![origin, destination],
                        Self::DEFAULT_DISTANCE_METERS,
                        Self::DEFAULT_DURATION_SECONDS,
                    ))
                },
                |(_, outcome)| outcome.clone(),
            )
    }
}

/// `PlacesProvider` answering from per-query scripts.
///
/// Unscripted queries return no suggestions; unscripted place ids fail with
/// a service error.
#[derive(Debug, Default)]
pub struct ScriptedPlaces {
    suggestions: Vec<(String, Result<Vec<Suggestion>, PlacesError>, Duration)>,
    details: Vec<(String, Result<Coordinate, PlacesError>)>,
    queries: Mutex<Vec<(String, Option<Coordinate>)>>,
    detail_requests: Mutex<Vec<String>>,
}

impl ScriptedPlaces {
    /// Create a provider with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `suggestions`.
    #[must_use]
    pub fn with_suggestions(self, query: &str, suggestions: Vec<Suggestion>) -> Self {
        self.with_delayed_suggestions(query, suggestions, Duration::ZERO)
    }

    /// Answer `query` with `suggestions` after `delay`.
    #[must_use]
    pub fn with_delayed_suggestions(
        mut self,
        query: &str,
        suggestions: Vec<Suggestion>,
        delay: Duration,
    ) -> Self {
        self.suggestions
            .push((query.to_owned(), Ok(suggestions), delay));
        self
    }

    /// Fail `query` with `error`.
    #[must_use]
    pub fn with_autocomplete_failure(mut self, query: &str, error: PlacesError) -> Self {
        self.suggestions
            .push((query.to_owned(), Err(error), Duration::ZERO));
        self
    }

    /// Resolve `place_id` to `coordinate`.
    #[must_use]
    pub fn with_detail(mut self, place_id: &str, coordinate: Coordinate) -> Self {
        self.details.push((place_id.to_owned(), Ok(coordinate)));
        self
    }

    /// Autocomplete queries received so far with their location bias.
    #[must_use]
    pub fn queries(&self) -> Vec<(String, Option<Coordinate>)> {
        lock(&self.queries).clone()
    }

    /// Place ids looked up so far.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<String> {
        lock(&self.detail_requests).clone()
    }
}

#[async_trait]
impl PlacesProvider for ScriptedPlaces {
    async fn autocomplete(
        &self,
        query: &str,
        bias: Option<Coordinate>,
    ) -> Result<Vec<Suggestion>, PlacesError> {
        lock(&self.queries).push((query.to_owned(), bias));
        let scripted = self
            .suggestions
            .iter()
            .find(|(scripted, _, _)| scripted == query);
        match scripted {
            Some((_, outcome, delay)) => {
                pause(*delay).await;
                outcome.clone()
            }
            None => {
                pause(Duration::ZERO).await;
                Ok(Vec::new())
            }
        }
    }

    async fn place_detail(&self, place_id: &str) -> Result<Coordinate, PlacesError> {
        lock(&self.detail_requests).push(place_id.to_owned());
        pause(Duration::ZERO).await;
        self.details
            .iter()
            .find(|(scripted, _)| scripted == place_id)
            .map_or_else(
                || {
                    Err(PlacesError::ServiceError {
                        status: "NOT_FOUND".to_owned(),
                        message: format!("unknown place {place_id}"),
                    })
                },
                |(_, outcome)| outcome.clone(),
            )
    }
}

/// `LocationProvider` returning a fixed fix and address.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    fix: Result<Coordinate, LocationError>,
    address: Result<String, GeocodeError>,
}

impl FixedLocation {
    /// A provider located at `fix` with no known address.
    #[must_use]
    pub const fn at(fix: Coordinate) -> Self {
        Self {
            fix: Ok(fix),
            address: Err(GeocodeError::NotFound),
        }
    }

    /// A provider whose permission was refused.
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            fix: Err(LocationError::PermissionDenied),
            address: Err(GeocodeError::NotFound),
        }
    }

    /// Reverse-geocode every coordinate to `address`.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Ok(address.into());
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.fix.clone()
    }

    async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<String, GeocodeError> {
        self.address.clone()
    }
}

/// `MapDataProvider` returning a fixed restaurant list.
#[derive(Debug, Clone, Default)]
pub struct FixedRestaurants {
    outcome: Option<Result<Vec<Restaurant>, MapDataError>>,
}

impl FixedRestaurants {
    /// Return `restaurants` for every position.
    #[must_use]
    pub const fn new(restaurants: Vec<Restaurant>) -> Self {
        Self {
            outcome: Some(Ok(restaurants)),
        }
    }

    /// Fail every lookup with `error`.
    #[must_use]
    pub const fn failing(error: MapDataError) -> Self {
        Self {
            outcome: Some(Err(error)),
        }
    }
}

#[async_trait]
impl MapDataProvider for FixedRestaurants {
    async fn restaurants_near(&self, _center: Coordinate) -> Result<Vec<Restaurant>, MapDataError> {
        self.outcome.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid")
    }

    #[rstest]
    #[tokio::test]
    async fn unscripted_leg_is_a_straight_line() {
        let directions = ScriptedDirections::new();
        let (a, b) = (at(1.0, 1.0), at(2.0, 2.0));

        let leg = directions
            .directions(a, b, TravelProfile::Car)
            .await
            .expect("default leg");

        assert_eq!(leg.geometry, vec![a, b]);
        assert_eq!(leg.distance_meters, ScriptedDirections::DEFAULT_DISTANCE_METERS);
    }

    #[rstest]
    #[tokio::test]
    async fn unscripted_place_detail_fails() {
        let places = ScriptedPlaces::new();
        let err = places.place_detail("nowhere").await.expect_err("unknown");
        assert!(matches!(err, PlacesError::ServiceError { .. }));
        assert_eq!(places.detail_requests(), vec!["nowhere".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn denied_location_reports_permission() {
        let err = FixedLocation::denied()
            .current_position()
            .await
            .expect_err("denied");
        assert_eq!(err, LocationError::PermissionDenied);
    }
}
