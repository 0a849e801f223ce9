//! Decoding rules for geographic coordinates.

use serde_json::Value;

use super::{Attempt, Decodable, Fields, as_container};

/// A point on the globe, in degrees.
///
/// Decodes from an object with numeric `latitude` and `longitude` fields,
/// both required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Decodable for Coordinate {
    fn from_value(value: &Value) -> Attempt<Self> {
        let json = as_container(value, "coordinate")?;

        Ok(Some(Self {
            latitude: json.require("latitude")?,
            longitude: json.require("longitude")?,
        }))
    }
}
