//! Ordered route stops.
//!
//! A [`RouteStopList`] owns the user's chosen stops in leg order. Stop
//! identity is the referenced restaurant's id, so the list never holds the
//! same restaurant twice. Leg metrics on a [`RouteStop`] are outputs of the
//! resolver and cannot be written from outside this crate.

use std::sync::Arc;

use thiserror::Error;

use crate::{Restaurant, RestaurantId};

/// A restaurant chosen as a waypoint plus the metrics of the leg ending there.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteStop {
    restaurant: Arc<Restaurant>,
    distance_meters: Option<f64>,
    duration_seconds: Option<f64>,
}

impl RouteStop {
    /// Create a stop with unset metrics.
    #[must_use]
    pub const fn new(restaurant: Arc<Restaurant>) -> Self {
        Self {
            restaurant,
            distance_meters: None,
            duration_seconds: None,
        }
    }

    /// The referenced restaurant.
    #[must_use]
    pub fn restaurant(&self) -> &Arc<Restaurant> {
        &self.restaurant
    }

    /// Stop identity.
    #[must_use]
    pub fn id(&self) -> &RestaurantId {
        &self.restaurant.id
    }

    /// Length of the leg ending at this stop, once resolved.
    #[must_use]
    pub const fn distance_meters(&self) -> Option<f64> {
        self.distance_meters
    }

    /// Duration of the leg ending at this stop, once resolved.
    #[must_use]
    pub const fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    /// Whether the leg ending here was resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.distance_meters.is_some()
    }

    pub(crate) fn unresolved(&self) -> Self {
        Self::new(Arc::clone(&self.restaurant))
    }

    pub(crate) fn resolved(&self, distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            restaurant: Arc::clone(&self.restaurant),
            distance_meters: Some(distance_meters),
            duration_seconds: Some(duration_seconds),
        }
    }
}

/// Result of [`RouteStopList::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The restaurant became the last stop.
    Added,
    /// The restaurant was already a stop; the list is unchanged.
    Duplicate,
}

/// Errors from stop-list mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The index does not address a stop.
    #[error("stop index {index} is out of range for {len} stops")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stops at the time of the request.
        len: usize,
    },
}

/// Stops in leg order without duplicate restaurants.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use dinemap_core::{AppendOutcome, Coordinate, Restaurant, RouteStopList};
///
/// let cafe = Arc::new(Restaurant::new("a", "Cafe", Coordinate::new(10.0, 106.0)?));
/// let mut stops = RouteStopList::default();
/// assert_eq!(stops.append(Arc::clone(&cafe)), AppendOutcome::Added);
/// assert_eq!(stops.append(cafe), AppendOutcome::Duplicate);
/// assert_eq!(stops.len(), 1);
/// # Ok::<(), dinemap_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteStopList {
    stops: Vec<RouteStop>,
}

impl RouteStopList {
    /// Append `restaurant` unless it is already a stop.
    pub fn append(&mut self, restaurant: Arc<Restaurant>) -> AppendOutcome {
        if self.contains(&restaurant.id) {
            return AppendOutcome::Duplicate;
        }
        self.stops.push(RouteStop::new(restaurant));
        AppendOutcome::Added
    }

    /// Remove and return the stop at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::OutOfRange`] and leaves the list untouched when
    /// `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<RouteStop, RouteError> {
        if index >= self.stops.len() {
            return Err(RouteError::OutOfRange {
                index,
                len: self.stops.len(),
            });
        }
        Ok(self.stops.remove(index))
    }

    /// Remove every stop.
    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Whether a stop references `id`.
    #[must_use]
    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.stops.iter().any(|stop| stop.id() == id)
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the list has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stop at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RouteStop> {
        self.stops.get(index)
    }

    /// Iterate stops in leg order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteStop> {
        self.stops.iter()
    }

    /// Borrow the stops as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[RouteStop] {
        &self.stops
    }
}

impl<'a> IntoIterator for &'a RouteStopList {
    type Item = &'a RouteStop;
    type IntoIter = std::slice::Iter<'a, RouteStop>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
