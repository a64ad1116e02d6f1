//! Route stop manager and plan publication.
//!
//! [`RoutePlanner`] is the single owner of the stop list, the travel profile,
//! the route origin, and the published [`RoutePlan`]. Every mutation bumps
//! the resolve [`Generation`] and starts a fresh pass from leg 0. A pass
//! publishes only if no newer mutation happened while it was in flight, so a
//! slow, superseded pass can never clobber a newer plan.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use tokio::sync::watch;

use crate::resolver::ResolvePass;
use crate::{
    AppendOutcome, Coordinate, DirectionsProvider, Generation, Restaurant, RouteError, RoutePlan,
    RouteStop, RouteStopList, TravelProfile,
};

#[derive(Debug)]
struct PlannerState {
    stops: RouteStopList,
    profile: TravelProfile,
    origin: Option<Coordinate>,
    latest: Generation,
}

impl PlannerState {
    fn begin_pass(&mut self) -> ResolvePass {
        self.latest = self.latest.next();
        ResolvePass::new(self.latest, self.origin, &self.stops, self.profile)
    }
}

/// Owns the stop list and resolves it into published route plans.
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    state: Mutex<PlannerState>,
    plan: watch::Sender<RoutePlan>,
}

impl std::fmt::Debug for RoutePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("directions", &"<dyn DirectionsProvider>")
            .field("state", &self.state)
            .field("plan", &*self.plan.borrow())
            .finish()
    }
}

impl RoutePlanner {
    /// Create a planner with no stops and no origin.
    #[must_use]
    pub fn new(directions: Arc<dyn DirectionsProvider>, profile: TravelProfile) -> Self {
        let (plan, _) = watch::channel(RoutePlan::empty(profile, Generation::ZERO));
        Self {
            directions,
            state: Mutex::new(PlannerState {
                stops: RouteStopList::default(),
                profile,
                origin: None,
                latest: Generation::ZERO,
            }),
            plan,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `restaurant` and re-resolve; duplicates are a silent no-op.
    pub async fn append(&self, restaurant: Arc<Restaurant>) -> AppendOutcome {
        let pass = {
            let mut state = self.lock();
            if state.stops.append(restaurant) == AppendOutcome::Duplicate {
                return AppendOutcome::Duplicate;
            }
            state.begin_pass()
        };
        self.run(pass).await;
        AppendOutcome::Added
    }

    /// Remove the stop at `index` and re-resolve.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::OutOfRange`] without touching the list or the
    /// plan when `index` addresses no stop.
    pub async fn remove_at(&self, index: usize) -> Result<RouteStop, RouteError> {
        let (removed, pass) = {
            let mut state = self.lock();
            let removed = state.stops.remove_at(index)?;
            (removed, state.begin_pass())
        };
        self.run(pass).await;
        Ok(removed)
    }

    /// Empty the stop list and publish an empty plan without any directions
    /// call. In-flight passes become stale.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.stops.clear();
        state.latest = state.latest.next();
        self.plan
            .send_replace(RoutePlan::empty(state.profile, state.latest));
    }

    /// Make `restaurant` the only stop and resolve once.
    pub async fn replace_with(&self, restaurant: Arc<Restaurant>) {
        let pass = {
            let mut state = self.lock();
            state.stops.clear();
            state.stops.append(restaurant);
            state.begin_pass()
        };
        self.run(pass).await;
    }

    /// Switch the travel profile, forcing a full re-resolve.
    ///
    /// Setting the current profile again is not a change and does nothing.
    pub async fn set_profile(&self, profile: TravelProfile) {
        let pass = {
            let mut state = self.lock();
            if state.profile == profile {
                return;
            }
            state.profile = profile;
            state.begin_pass()
        };
        self.run(pass).await;
    }

    /// Update the route origin, re-resolving when stops exist.
    pub async fn set_origin(&self, origin: Coordinate) {
        let pass = {
            let mut state = self.lock();
            if state.origin == Some(origin) {
                return;
            }
            state.origin = Some(origin);
            if state.stops.is_empty() {
                return;
            }
            state.begin_pass()
        };
        self.run(pass).await;
    }

    /// Resolve the current stops again, e.g. after a transient failure.
    pub async fn refresh(&self) {
        let pass = self.lock().begin_pass();
        self.run(pass).await;
    }

    async fn run(&self, pass: ResolvePass) -> bool {
        let plan = pass.run(self.directions.as_ref()).await;
        self.publish(plan)
    }

    fn publish(&self, plan: RoutePlan) -> bool {
        let state = self.lock();
        if plan.generation != state.latest {
            debug!(
                "discarding stale plan {}; latest is {}",
                plan.generation, state.latest
            );
            return false;
        }
        debug!(
            "publishing plan {} with {} stops",
            plan.generation,
            plan.stops.len()
        );
        self.plan.send_replace(plan);
        true
    }

    /// The most recently published plan.
    #[must_use]
    pub fn plan(&self) -> RoutePlan {
        self.plan.borrow().clone()
    }

    /// Observe published plans.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RoutePlan> {
        self.plan.subscribe()
    }

    /// Snapshot of the current stops.
    #[must_use]
    pub fn stops(&self) -> RouteStopList {
        self.lock().stops.clone()
    }

    /// Current travel profile.
    #[must_use]
    pub fn profile(&self) -> TravelProfile {
        self.lock().profile
    }

    /// Current route origin, if a fix has been applied.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.lock().origin
    }

    /// Generation of the most recently started pass.
    #[must_use]
    pub fn latest_generation(&self) -> Generation {
        self.lock().latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rstest::{fixture, rstest};

    use crate::test_support::ScriptedDirections;
    use crate::Leg;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).expect("valid")
    }

    fn restaurant(id: &str, lat: f64, lon: f64) -> Arc<Restaurant> {
        Arc::new(Restaurant::new(id, id.to_uppercase(), at(lat, lon)))
    }

    #[fixture]
    fn directions() -> Arc<ScriptedDirections> {
        Arc::new(ScriptedDirections::new())
    }

    async fn planner_at_user(directions: &Arc<ScriptedDirections>) -> RoutePlanner {
        let planner = RoutePlanner::new(
            Arc::clone(directions) as Arc<dyn DirectionsProvider>,
            TravelProfile::Car,
        );
        planner.set_origin(at(10.0, 106.0)).await;
        planner
    }

    #[rstest]
    #[tokio::test]
    async fn two_stops_issue_two_ordered_calls() {
        let user = at(10.0, 106.0);
        let a = at(10.01, 106.01);
        let b = at(10.02, 106.02);
        let scripted = Arc::new(
            ScriptedDirections::new()
                .with_leg(a, Leg::new(vec![user, a], 1500.0, 200.0))
                .with_leg(b, Leg::new(vec![a, b], 1700.0, 220.0)),
        );
        let planner = planner_at_user(&scripted).await;

        planner.append(restaurant("a", 10.01, 106.01)).await;
        scripted.reset_calls();
        planner.append(restaurant("b", 10.02, 106.02)).await;

        let calls = scripted.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].origin, calls[0].destination), (user, a));
        assert_eq!((calls[1].origin, calls[1].destination), (a, b));
        let plan = planner.plan();
        assert_eq!(plan.stops.len(), 2);
        assert_eq!(plan.total_distance_meters, 3200.0);
        assert_eq!(plan.total_duration_seconds, 420.0);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_append_does_not_resolve(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        let before = directions.calls().len();

        let outcome = planner.append(restaurant("a", 10.01, 106.01)).await;

        assert_eq!(outcome, AppendOutcome::Duplicate);
        assert_eq!(directions.calls().len(), before);
        assert_eq!(planner.stops().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn removing_last_stop_publishes_empty_plan(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        directions.reset_calls();

        let removed = planner.remove_at(0).await.expect("in range");

        assert_eq!(removed.id().as_str(), "a");
        assert!(directions.calls().is_empty());
        let plan = planner.plan();
        assert!(plan.is_empty());
        assert!(plan.geometry.is_empty());
        assert_eq!(plan.generation, planner.latest_generation());
    }

    #[rstest]
    #[tokio::test]
    async fn removing_out_of_range_keeps_state(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        let plan_before = planner.plan();

        let err = planner.remove_at(1).await.expect_err("out of range");

        assert_eq!(err, RouteError::OutOfRange { index: 1, len: 1 });
        assert_eq!(planner.stops().len(), 1);
        assert_eq!(planner.plan(), plan_before);
    }

    #[rstest]
    #[tokio::test]
    async fn clear_never_calls_directions(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        directions.reset_calls();

        planner.clear();

        assert!(directions.calls().is_empty());
        assert!(planner.stops().is_empty());
        assert!(planner.plan().geometry.is_empty());
        assert_eq!(planner.plan().total_distance_meters, 0.0);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_change_runs_one_full_pass(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        planner.append(restaurant("b", 10.02, 106.02)).await;
        directions.reset_calls();

        planner.set_profile(TravelProfile::Bike).await;

        let calls = directions.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.profile == TravelProfile::Bike));
        assert_eq!(planner.plan().profile, TravelProfile::Bike);
    }

    #[rstest]
    #[tokio::test]
    async fn same_profile_is_not_a_change(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        planner.append(restaurant("a", 10.01, 106.01)).await;
        directions.reset_calls();

        planner.set_profile(TravelProfile::Car).await;

        assert!(directions.calls().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn stops_without_origin_resolve_without_calls(directions: Arc<ScriptedDirections>) {
        let planner = RoutePlanner::new(
            Arc::clone(&directions) as Arc<dyn DirectionsProvider>,
            TravelProfile::Car,
        );

        planner.append(restaurant("a", 10.01, 106.01)).await;

        assert!(directions.calls().is_empty());
        let plan = planner.plan();
        assert_eq!(plan.stops.len(), 1);
        assert!(plan.geometry.is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn superseded_pass_never_overwrites_newer_plan() {
        let slow = Arc::new(ScriptedDirections::new().with_delay(Duration::from_millis(200)));
        let planner = planner_at_user(&slow).await;

        let (first, second) = tokio::join!(
            planner.append(restaurant("a", 10.01, 106.01)),
            planner.append(restaurant("b", 10.02, 106.02)),
        );

        assert_eq!(first, AppendOutcome::Added);
        assert_eq!(second, AppendOutcome::Added);
        let plan = planner.plan();
        assert_eq!(plan.generation, planner.latest_generation());
        let ids: Vec<&str> = plan.stops.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(plan.stops.iter().all(RouteStop::is_resolved));
    }

    #[rstest]
    #[tokio::test]
    async fn subscribers_see_whole_plans(directions: Arc<ScriptedDirections>) {
        let planner = planner_at_user(&directions).await;
        let mut plans = planner.subscribe();

        planner.append(restaurant("a", 10.01, 106.01)).await;

        assert!(plans.has_changed().expect("sender alive"));
        let seen = plans.borrow_and_update().clone();
        assert_eq!(seen.stops.len(), 1);
        assert!(seen.stops[0].is_resolved());
    }
}
