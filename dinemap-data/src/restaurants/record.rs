//! Wire format of the `/restaurants/nearby` endpoint.

use dinemap_core::{Coordinate, CoordinateError, Restaurant};
use serde::Deserialize;

/// Directory identifiers arrive as either strings or integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// String identifier.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One restaurant as served by the directory.
#[derive(Debug, Deserialize)]
pub struct RestaurantRecord {
    /// Directory identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Average rating.
    #[serde(default)]
    pub rating: Option<f32>,
}

impl TryFrom<RestaurantRecord> for Restaurant {
    type Error = CoordinateError;

    fn try_from(record: RestaurantRecord) -> Result<Self, Self::Error> {
        let coordinate = Coordinate::new(record.latitude, record.longitude)?;
        let mut restaurant = Self::new(record.id.into_string(), record.name, coordinate);
        restaurant.address = record.address;
        restaurant.rating = record.rating;
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""r-17""#, "r-17")]
    #[case("17", "17")]
    fn accepts_text_and_numeric_ids(#[case] id: &str, #[case] expected: &str) {
        let json = format!(
            r#"{{"id": {id}, "name": "Com Tam", "latitude": 10.0, "longitude": 106.0}}"#
        );

        let record: RestaurantRecord = serde_json::from_str(&json).expect("should deserialise");
        let restaurant = Restaurant::try_from(record).expect("valid record");

        assert_eq!(restaurant.id.as_str(), expected);
        assert!(restaurant.address.is_none());
    }

    #[rstest]
    fn keeps_optional_fields() {
        let json = r#"{
            "id": "a",
            "name": "Pho 2000",
            "latitude": 10.77,
            "longitude": 106.69,
            "address": "1-3 Phan Chu Trinh",
            "rating": 4.5
        }"#;

        let record: RestaurantRecord = serde_json::from_str(json).expect("should deserialise");
        let restaurant = Restaurant::try_from(record).expect("valid record");

        assert_eq!(restaurant.address.as_deref(), Some("1-3 Phan Chu Trinh"));
        assert_eq!(restaurant.rating, Some(4.5));
    }

    #[rstest]
    fn rejects_out_of_range_positions() {
        let record = RestaurantRecord {
            id: RecordId::Number(1),
            name: "Nowhere".to_owned(),
            latitude: 123.0,
            longitude: 0.0,
            address: None,
            rating: None,
        };

        assert!(Restaurant::try_from(record).is_err());
    }
}
