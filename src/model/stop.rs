use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::sanitize_coordinate;

/// One scheduled point of a trip as it comes out of the feed
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Stop {
    #[serde(default)]
    pub stop_id: Option<String>,
    /// Can be missing or blank for stops the backend couldn't match to a station
    #[serde(default, deserialize_with = "string_or_empty")]
    pub stop_name: String,
    #[serde(default)]
    pub stop_lat: Option<RawCoordinate>,
    #[serde(default)]
    pub stop_lon: Option<RawCoordinate>,
    /// `HH:mm` local time. Usually absent on the first stop.
    #[serde(default)]
    pub arrival: Option<String>,
    /// `HH:mm` local time. Usually absent on the last stop.
    #[serde(default)]
    pub departure: Option<String>,
    /// Free text like `"on time"`, `"3 min"` or `"1h 20min"`
    #[serde(default)]
    pub delay: Option<String>,
}

impl Stop {
    pub fn has_name(&self) -> bool {
        !self.stop_name.trim().is_empty()
    }

    /// Both coordinates sanitized, or nothing
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.stop_lat.as_ref()?.value()?;
        let lon = self.stop_lon.as_ref()?.value()?;
        Some(Coordinate { lat, lon })
    }
}

/// A coordinate exactly as the feed sent it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    pub fn value(&self) -> Option<f64> {
        match self {
            RawCoordinate::Number(n) if n.is_finite() => Some(*n),
            RawCoordinate::Number(_) => None,
            RawCoordinate::Text(s) => sanitize_coordinate(s),
        }
    }
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        RawCoordinate::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Plain linear interpolation of both axes, `ratio` 0 is `self` and 1 is `other`
    pub fn lerp(self, other: Coordinate, ratio: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * ratio,
            lon: self.lon + (other.lon - self.lon) * ratio,
        }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}
