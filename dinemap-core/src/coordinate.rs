//! WGS84 coordinates and the map viewport.
//!
//! [`Coordinate`] keeps latitude and longitude as named fields rather than the
//! `x`/`y` pair used by [`geo::Coord`]; conversions in both directions are
//! provided so geometry helpers from `geo` remain available.

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Coord, LineString};
use thiserror::Error;

/// A validated latitude/longitude pair.
///
/// # Examples
/// ```
/// use dinemap_core::Coordinate;
///
/// let saigon = Coordinate::new(10.0, 106.0)?;
/// assert_eq!(saigon.latitude(), 10.0);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), dinemap_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
    /// Text could not be parsed as `lat,lon`.
    #[error("expected `lat,lon`, got {0:?}")]
    Malformed(String),
}

impl Coordinate {
    /// Validates and constructs a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::Latitude`] when `latitude` is not finite or
    /// lies outside `[-90, 90]`, and [`CoordinateError::Longitude`] when
    /// `longitude` is not finite or lies outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordinateError::Malformed(s.to_owned());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

/// The visible map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRegion {
    /// Viewport centre.
    pub center: Coordinate,
    /// Vertical span in degrees.
    pub latitude_delta: f64,
    /// Horizontal span in degrees.
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Construct a region centred on `center`.
    #[must_use]
    pub const fn new(center: Coordinate, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            center,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Move the centre while keeping the current zoom.
    #[must_use]
    pub const fn recentred(self, center: Coordinate) -> Self {
        Self { center, ..self }
    }

    /// Frame every coordinate in `points`, scaling the spans by `padding`.
    ///
    /// Spans never shrink below `min_delta`, so a single point still yields a
    /// usable zoom level. Returns `None` when `points` is empty.
    ///
    /// # Examples
    /// ```
    /// use dinemap_core::{Coordinate, MapRegion};
    ///
    /// let points = [Coordinate::new(10.0, 106.0)?, Coordinate::new(10.2, 106.4)?];
    /// let region = MapRegion::fitting(&points, 1.0, 0.01).expect("non-empty");
    /// assert!((region.center.latitude() - 10.1).abs() < 1e-9);
    /// assert!((region.longitude_delta - 0.4).abs() < 1e-9);
    /// # Ok::<(), dinemap_core::CoordinateError>(())
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "viewport framing is inherently floating-point"
    )]
    pub fn fitting(points: &[Coordinate], padding: f64, min_delta: f64) -> Option<Self> {
        let line: LineString<f64> = points.iter().copied().map(Coord::from).collect();
        let rect = line.bounding_rect()?;
        let centre = Coordinate::try_from(rect.center()).ok()?;
        Some(Self {
            center: centre,
            latitude_delta: (rect.height() * padding).max(min_delta),
            longitude_delta: (rect.width() * padding).max(min_delta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-90.0, -180.0)]
    #[case(90.0, 180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_values(#[case] lat: f64, #[case] lon: f64) {
        assert!(Coordinate::new(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_invalid_latitude(#[case] lat: f64, #[case] lon: f64) {
        assert!(matches!(
            Coordinate::new(lat, lon),
            Err(CoordinateError::Latitude(_))
        ));
    }

    #[rstest]
    fn rejects_invalid_longitude() {
        assert!(matches!(
            Coordinate::new(0.0, -180.1),
            Err(CoordinateError::Longitude(_))
        ));
    }

    #[rstest]
    #[case("10.5,106.7", 10.5, 106.7)]
    #[case(" 10.5 , 106.7 ", 10.5, 106.7)]
    fn parses_lat_lon_text(#[case] text: &str, #[case] lat: f64, #[case] lon: f64) {
        let coordinate: Coordinate = text.parse().expect("valid coordinate");
        assert_eq!(coordinate.latitude(), lat);
        assert_eq!(coordinate.longitude(), lon);
    }

    #[rstest]
    #[case("10.5")]
    #[case("north,east")]
    fn rejects_malformed_text(#[case] text: &str) {
        let err = text.parse::<Coordinate>().expect_err("malformed");
        assert!(matches!(err, CoordinateError::Malformed(_)));
    }

    #[rstest]
    fn geo_conversion_swaps_axes() {
        let coordinate = Coordinate::new(10.0, 106.0).expect("valid");
        let coord = Coord::from(coordinate);
        assert_eq!(coord.x, 106.0);
        assert_eq!(coord.y, 10.0);
        assert_eq!(Coordinate::try_from(coord), Ok(coordinate));
    }

    #[rstest]
    fn fitting_single_point_uses_minimum_span() {
        let point = Coordinate::new(10.0, 106.0).expect("valid");
        let region = MapRegion::fitting(&[point], 1.5, 0.01).expect("non-empty");
        assert_eq!(region.center, point);
        assert_eq!(region.latitude_delta, 0.01);
        assert_eq!(region.longitude_delta, 0.01);
    }

    #[rstest]
    fn fitting_nothing_yields_none() {
        assert!(MapRegion::fitting(&[], 1.5, 0.01).is_none());
    }

    #[rstest]
    fn recentring_keeps_zoom() {
        let a = Coordinate::new(1.0, 1.0).expect("valid");
        let b = Coordinate::new(2.0, 2.0).expect("valid");
        let region = MapRegion::new(a, 0.05, 0.02).recentred(b);
        assert_eq!(region.center, b);
        assert_eq!(region.latitude_delta, 0.05);
        assert_eq!(region.longitude_delta, 0.02);
    }
}
