//! Travel profiles used when requesting directions.
//!
//! # Examples
//! ```
//! use dinemap_core::TravelProfile;
//!
//! assert_eq!(TravelProfile::Bike.as_str(), "bike");
//! assert_eq!("cycling".parse::<TravelProfile>(), Ok(TravelProfile::Bike));
//! assert_eq!(TravelProfile::Walk.osrm_profile(), "foot");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Mode of transport for every leg of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelProfile {
    /// Driving.
    #[default]
    Car,
    /// Cycling.
    Bike,
    /// Walking.
    Walk,
}

/// Returned when text names no known profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown travel profile '{0}'")]
pub struct UnknownProfile(pub String);

impl TravelProfile {
    /// Every profile, in selector order.
    pub const ALL: [Self; 3] = [Self::Car, Self::Bike, Self::Walk];

    /// Return the profile as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Walk => "walk",
        }
    }

    /// Profile segment understood by OSRM's HTTP API.
    #[must_use]
    pub const fn osrm_profile(&self) -> &'static str {
        match self {
            Self::Car => "driving",
            Self::Bike => "cycling",
            Self::Walk => "foot",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "car" | "driving" => Ok(Self::Car),
            "bike" | "cycling" => Ok(Self::Bike),
            "walk" | "walking" | "foot" => Ok(Self::Walk),
            _ => Err(UnknownProfile(s.to_owned())),
        }
    }
}
