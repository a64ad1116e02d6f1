//! Restaurants shown on the map.
//!
//! Records are immutable once fetched. The map session holds them as
//! `Arc<Restaurant>` so route stops can reference a restaurant without
//! copying it.

use std::fmt;

use crate::Coordinate;

/// Opaque restaurant identifier assigned by the map-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Wrap a provider identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RestaurantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A restaurant that can be browsed or added to a route.
///
/// # Examples
/// ```
/// use dinemap_core::{Coordinate, Restaurant};
///
/// let pho = Restaurant::new("r-1", "Pho 24", Coordinate::new(10.77, 106.70)?)
///     .with_address("5 Nguyen Thiep");
/// assert_eq!(pho.id.as_str(), "r-1");
/// assert_eq!(pho.address.as_deref(), Some("5 Nguyen Thiep"));
/// # Ok::<(), dinemap_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Restaurant {
    /// Provider identifier; also the identity of a route stop.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Marker position.
    pub coordinate: Coordinate,
    /// Street address, when the provider supplies one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    /// Average rating, when the provider supplies one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: Option<f32>,
}

impl Restaurant {
    /// Construct a restaurant without optional display fields.
    #[must_use]
    pub fn new(id: impl Into<RestaurantId>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            address: None,
            rating: None,
        }
    }

    /// Attach a street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Attach a rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }
}
