//! Directions provider trait and the per-leg result type.

use async_trait::async_trait;

use crate::{Coordinate, TravelProfile};

use super::error::DirectionsError;

/// One resolved origin→destination segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    /// Polyline from origin to destination; may be empty.
    pub geometry: Vec<Coordinate>,
    /// Length of the leg in metres.
    pub distance_meters: f64,
    /// Travel time in seconds.
    pub duration_seconds: f64,
}

impl Leg {
    /// Construct a leg from its parts.
    #[must_use]
    pub const fn new(geometry: Vec<Coordinate>, distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            geometry,
            distance_meters,
            duration_seconds,
        }
    }
}

/// Fetch directions for a single leg.
///
/// Implementations are called at most once at a time per resolve pass, in
/// stop order, so they need not guard against overlapping legs of the same
/// route.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use dinemap_core::{Coordinate, DirectionsError, DirectionsProvider, Leg, TravelProfile};
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl DirectionsProvider for StraightLine {
///     async fn directions(
///         &self,
///         origin: Coordinate,
///         destination: Coordinate,
///         _profile: TravelProfile,
///     ) -> Result<Leg, DirectionsError> {
///         Ok(Leg::new(vec![origin, destination], 1.0, 1.0))
///     }
/// }
/// ```
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Return the route from `origin` to `destination` for `profile`.
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: TravelProfile,
    ) -> Result<Leg, DirectionsError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::test_support::ScriptedDirections;

    #[fixture]
    fn endpoints() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(10.0, 106.0).expect("valid"),
            Coordinate::new(10.01, 106.01).expect("valid"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn scripted_provider_returns_configured_leg(endpoints: (Coordinate, Coordinate)) {
        let (origin, destination) = endpoints;
        let leg = Leg::new(vec![origin, destination], 1500.0, 300.0);
        let provider = ScriptedDirections::new().with_leg(destination, leg.clone());

        let resolved = provider
            .directions(origin, destination, TravelProfile::Car)
            .await
            .expect("scripted leg");

        assert_eq!(resolved, leg);
    }

    #[rstest]
    #[tokio::test]
    async fn scripted_provider_replays_failures(endpoints: (Coordinate, Coordinate)) {
        let (origin, destination) = endpoints;
        let provider =
            ScriptedDirections::new().with_failure(destination, DirectionsError::NoRoute);

        let err = provider
            .directions(origin, destination, TravelProfile::Walk)
            .await
            .expect_err("scripted failure");

        assert_eq!(err, DirectionsError::NoRoute);
        assert_eq!(provider.calls().len(), 1);
    }
}
