//! Resolved route plans.
//!
//! A [`RoutePlan`] is the published outcome of one resolve pass: the stops
//! with their leg metrics, the concatenated geometry, and the totals. Plans
//! are replaced wholesale and never patched in place.

use std::fmt;

use crate::{Coordinate, RouteStop, TravelProfile};

/// Monotonic counter identifying a resolve pass or autocomplete request.
///
/// A result tagged with a generation older than the latest one issued is
/// stale and must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Generation(u64);

impl Generation {
    /// The generation before any pass has been issued.
    pub const ZERO: Self = Self(0);

    /// Return the following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fully resolved multi-stop route.
///
/// # Examples
/// ```
/// use dinemap_core::{Generation, RoutePlan, TravelProfile};
///
/// let plan = RoutePlan::empty(TravelProfile::Walk, Generation::ZERO);
/// assert!(plan.stops.is_empty());
/// assert!(plan.geometry.is_empty());
/// assert_eq!(plan.total_distance_meters, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePlan {
    /// Stops in leg order with their resolved metrics.
    pub stops: Vec<RouteStop>,
    /// Profile every leg was requested with.
    pub profile: TravelProfile,
    /// Geometry of all successful legs, concatenated in order.
    pub geometry: Vec<Coordinate>,
    /// Sum of resolved leg distances in metres.
    pub total_distance_meters: f64,
    /// Sum of resolved leg durations in seconds.
    pub total_duration_seconds: f64,
    /// Pass that produced this plan.
    pub generation: Generation,
}

impl RoutePlan {
    /// A plan with no stops and no geometry.
    #[must_use]
    pub const fn empty(profile: TravelProfile, generation: Generation) -> Self {
        Self {
            stops: Vec::new(),
            profile,
            geometry: Vec::new(),
            total_distance_meters: 0.0,
            total_duration_seconds: 0.0,
            generation,
        }
    }

    /// Whether the plan has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Indices of stops whose incoming leg failed to resolve.
    #[must_use]
    pub fn unresolved_stops(&self) -> Vec<usize> {
        self.stops
            .iter()
            .enumerate()
            .filter(|(_, stop)| !stop.is_resolved())
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::Restaurant;

    #[test]
    fn generations_increase() {
        let first = Generation::ZERO.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.get(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn unresolved_stops_lists_missing_metrics() {
        let at = |lat| Coordinate::new(lat, 106.0).expect("valid");
        let a = RouteStop::new(Arc::new(Restaurant::new("a", "A", at(10.0))));
        let b = RouteStop::new(Arc::new(Restaurant::new("b", "B", at(10.1))));
        let plan = RoutePlan {
            stops: vec![a.resolved(100.0, 10.0), b],
            ..RoutePlan::empty(TravelProfile::Car, Generation::ZERO)
        };
        assert_eq!(plan.unresolved_stops(), vec![1]);
    }
}
