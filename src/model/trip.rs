use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::stop::Stop;
use crate::utils::parse_clock_time;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Trip {
    pub trip_id: String,
    /// `yyyyMMdd`
    pub start_date: String,
    /// Scheduled first departure, `HH:mm` or `HH:mm:ss`
    #[serde(default)]
    pub start_time: String,
    /// In visiting order. Never reordered.
    #[serde(default)]
    pub stops: Vec<Stop>,
}

impl Trip {
    /// A trip is only usable when both its endpoints are named
    pub fn is_valid(&self) -> bool {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => first.has_name() && last.has_name(),
            _ => false,
        }
    }

    pub fn service_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date.trim(), "%Y%m%d").ok()
    }

    pub fn scheduled_start(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.start_time)
    }

    pub fn origin(&self) -> Option<&str> {
        self.stops.first().map(|s| s.stop_name.as_str())
    }

    pub fn destination(&self) -> Option<&str> {
        self.stops.last().map(|s| s.stop_name.as_str())
    }
}
