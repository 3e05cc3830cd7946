use serde::Serialize;

/// Where a trip is relative to a reference instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "stop_name", rename_all = "snake_case")]
pub enum TripStatus {
    /// The next unreached event is an arrival at this stop
    Approaching(String),
    /// The next unreached event is a departure from this stop
    At(String),
    Completed,
}

impl TripStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TripStatus::Completed)
    }

    pub fn stop_name(&self) -> Option<&str> {
        match self {
            TripStatus::Approaching(name) | TripStatus::At(name) => Some(name),
            TripStatus::Completed => None,
        }
    }
}
