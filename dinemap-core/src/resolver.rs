//! Sequential, leg-by-leg route resolution.
//!
//! A [`ResolvePass`] is an explicit state machine over one snapshot of the
//! stop list. [`ResolvePass::next_leg`] names the only leg that may be
//! requested next, [`ResolvePass::record`] feeds its outcome back, and
//! [`ResolvePass::finish`] turns the pass into a [`RoutePlan`] tagged with
//! the pass [`Generation`].
//!
//! Leg `i` starts at the user's position when `i == 0` and at stop `i - 1`
//! otherwise. A failed leg leaves its stop unresolved and contributes no
//! geometry; the next leg still starts from the failed stop's coordinate.

use log::{debug, warn};

use crate::{
    Coordinate, DirectionsError, DirectionsProvider, Generation, Leg, RoutePlan, RouteStop,
    RouteStopList, TravelProfile,
};

/// The single leg a pass is waiting on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegRequest {
    /// Zero-based leg index; also the index of the destination stop.
    pub index: usize,
    /// Leg start.
    pub origin: Coordinate,
    /// Leg end.
    pub destination: Coordinate,
    /// Profile requested for the leg.
    pub profile: TravelProfile,
}

/// One full sequential computation of every leg for a stop-list snapshot.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use dinemap_core::{
///     Coordinate, Generation, Leg, Restaurant, RouteStopList, TravelProfile,
///     resolver::ResolvePass,
/// };
///
/// let user = Coordinate::new(10.0, 106.0)?;
/// let mut stops = RouteStopList::default();
/// stops.append(Arc::new(Restaurant::new("a", "A", Coordinate::new(10.01, 106.01)?)));
///
/// let mut pass = ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Car);
/// let leg = pass.next_leg().expect("one leg");
/// assert_eq!(leg.origin, user);
/// pass.record(&leg, Ok(Leg::new(vec![leg.origin, leg.destination], 1200.0, 240.0)));
/// assert!(pass.next_leg().is_none());
///
/// let plan = pass.finish();
/// assert_eq!(plan.total_distance_meters, 1200.0);
/// # Ok::<(), dinemap_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ResolvePass {
    generation: Generation,
    origin: Option<Coordinate>,
    profile: TravelProfile,
    stops: Vec<RouteStop>,
    resolved: Vec<RouteStop>,
    geometry: Vec<Coordinate>,
    total_distance_meters: f64,
    total_duration_seconds: f64,
}

impl ResolvePass {
    /// Start a pass over a snapshot of `stops`.
    ///
    /// Without an `origin` the pass has no legs to request.
    #[must_use]
    pub fn new(
        generation: Generation,
        origin: Option<Coordinate>,
        stops: &RouteStopList,
        profile: TravelProfile,
    ) -> Self {
        Self {
            generation,
            origin,
            profile,
            stops: stops.iter().map(RouteStop::unresolved).collect(),
            resolved: Vec::with_capacity(stops.len()),
            geometry: Vec::new(),
            total_distance_meters: 0.0,
            total_duration_seconds: 0.0,
        }
    }

    /// Generation this pass publishes under.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The next leg to request, or `None` once every leg has an outcome.
    #[must_use]
    pub fn next_leg(&self) -> Option<LegRequest> {
        let user = self.origin?;
        let index = self.resolved.len();
        let destination = self.stops.get(index)?.restaurant().coordinate;
        let origin = index
            .checked_sub(1)
            .and_then(|previous| self.stops.get(previous))
            .map_or(user, |stop| stop.restaurant().coordinate);
        Some(LegRequest {
            index,
            origin,
            destination,
            profile: self.profile,
        })
    }

    /// Record the outcome of `request`.
    ///
    /// Outcomes for any leg other than the pending one are ignored.
    #[expect(
        clippy::float_arithmetic,
        reason = "route totals accumulate floating-point leg metrics"
    )]
    pub fn record(&mut self, request: &LegRequest, outcome: Result<Leg, DirectionsError>) {
        if request.index != self.resolved.len() {
            debug!(
                "ignoring outcome for leg {} of pass {}; expected leg {}",
                request.index,
                self.generation,
                self.resolved.len()
            );
            return;
        }
        let Some(stop) = self.stops.get(request.index) else {
            return;
        };
        match outcome {
            Ok(leg) => {
                self.total_distance_meters += leg.distance_meters;
                self.total_duration_seconds += leg.duration_seconds;
                self.geometry.extend(leg.geometry);
                self.resolved
                    .push(stop.resolved(leg.distance_meters, leg.duration_seconds));
            }
            Err(err) => {
                warn!(
                    "leg {} to {} failed in pass {}: {err}",
                    request.index,
                    stop.id(),
                    self.generation
                );
                self.resolved.push(stop.unresolved());
            }
        }
    }

    /// Whether every leg has an outcome.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_leg().is_none()
    }

    /// Build the plan. Stops without an outcome stay unresolved.
    #[must_use]
    pub fn finish(self) -> RoutePlan {
        let Self {
            generation,
            profile,
            stops,
            mut resolved,
            geometry,
            total_distance_meters,
            total_duration_seconds,
            ..
        } = self;
        resolved.extend(stops.into_iter().skip(resolved.len()));
        RoutePlan {
            stops: resolved,
            profile,
            geometry,
            total_distance_meters,
            total_duration_seconds,
            generation,
        }
    }

    /// Drive the pass to completion, one leg in flight at a time.
    pub async fn run(mut self, directions: &dyn DirectionsProvider) -> RoutePlan {
        while let Some(request) = self.next_leg() {
            debug!(
                "pass {} requesting leg {} ({} -> {}, {})",
                self.generation,
                request.index,
                request.origin,
                request.destination,
                request.profile
            );
            let outcome = directions
                .directions(request.origin, request.destination, request.profile)
                .await;
            self.record(&request, outcome);
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use crate::test_support::{DirectionsCall, ScriptedDirections};
    use crate::Restaurant;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid")
    }

    #[fixture]
    fn user() -> Coordinate {
        at(10.0, 106.0)
    }

    #[fixture]
    fn stops() -> RouteStopList {
        let mut stops = RouteStopList::default();
        stops.append(Arc::new(Restaurant::new("a", "A", at(10.01, 106.01))));
        stops.append(Arc::new(Restaurant::new("b", "B", at(10.02, 106.02))));
        stops.append(Arc::new(Restaurant::new("c", "C", at(10.03, 106.03))));
        stops
    }

    fn leg(from: Coordinate, to: Coordinate, distance: f64) -> Leg {
        Leg::new(vec![from, to], distance, distance / 10.0)
    }

    #[rstest]
    fn legs_chain_from_user_through_stops(user: Coordinate, stops: RouteStopList) {
        let mut pass = ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Bike);
        let mut seen = Vec::new();
        while let Some(request) = pass.next_leg() {
            seen.push((request.origin, request.destination));
            pass.record(&request, Err(DirectionsError::NoRoute));
        }
        assert_eq!(
            seen,
            vec![
                (user, at(10.01, 106.01)),
                (at(10.01, 106.01), at(10.02, 106.02)),
                (at(10.02, 106.02), at(10.03, 106.03)),
            ]
        );
    }

    #[rstest]
    fn no_origin_means_no_legs(stops: RouteStopList) {
        let pass = ResolvePass::new(Generation::ZERO.next(), None, &stops, TravelProfile::Car);
        assert!(pass.is_complete());
        let plan = pass.finish();
        assert_eq!(plan.stops.len(), 3);
        assert!(plan.geometry.is_empty());
        assert_eq!(plan.unresolved_stops(), vec![0, 1, 2]);
    }

    #[rstest]
    fn empty_stop_list_yields_empty_plan(user: Coordinate) {
        let pass = ResolvePass::new(
            Generation::ZERO.next(),
            Some(user),
            &RouteStopList::default(),
            TravelProfile::Car,
        );
        assert!(pass.next_leg().is_none());
        assert!(pass.finish().is_empty());
    }

    #[rstest]
    fn outcomes_for_other_legs_are_ignored(user: Coordinate, stops: RouteStopList) {
        let mut pass = ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Car);
        let first = pass.next_leg().expect("first leg");
        let stray = LegRequest { index: 2, ..first };
        pass.record(&stray, Ok(leg(first.origin, first.destination, 5.0)));
        assert_eq!(pass.next_leg(), Some(first));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_leg_contributes_nothing_and_later_legs_still_run(
        user: Coordinate,
        stops: RouteStopList,
    ) {
        let a = at(10.01, 106.01);
        let b = at(10.02, 106.02);
        let c = at(10.03, 106.03);
        let directions = ScriptedDirections::new()
            .with_leg(a, leg(user, a, 100.0))
            .with_failure(b, DirectionsError::NoRoute)
            .with_leg(c, leg(b, c, 300.0));

        let pass = ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Car);
        let plan = pass.run(&directions).await;

        assert_eq!(directions.calls().len(), 3);
        assert_eq!(plan.geometry, vec![user, a, b, c]);
        assert_eq!(plan.total_distance_meters, 400.0);
        assert_eq!(plan.unresolved_stops(), vec![1]);
        assert_eq!(plan.stops[2].distance_meters(), Some(300.0));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_geometry_leg_still_counts_metrics(user: Coordinate) {
        let a = at(10.01, 106.01);
        let mut stops = RouteStopList::default();
        stops.append(Arc::new(Restaurant::new("a", "A", a)));
        let directions = ScriptedDirections::new().with_leg(a, Leg::new(Vec::new(), 80.0, 8.0));

        let plan = ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Walk)
            .run(&directions)
            .await;

        assert!(plan.geometry.is_empty());
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.total_duration_seconds, 8.0);
    }

    #[rstest]
    #[tokio::test]
    async fn requests_carry_the_pass_profile(user: Coordinate, stops: RouteStopList) {
        let directions = ScriptedDirections::new();
        ResolvePass::new(Generation::ZERO.next(), Some(user), &stops, TravelProfile::Walk)
            .run(&directions)
            .await;
        assert!(
            directions
                .calls()
                .iter()
                .all(|call: &DirectionsCall| call.profile == TravelProfile::Walk)
        );
    }
}
