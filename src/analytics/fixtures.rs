//! Builders shared by the analytics tests

use chrono::{DateTime, TimeZone};
use chrono_tz::{Europe::Paris, Tz};

use crate::model::{Stop, Trip};

pub const DATE: &str = "20240612";

pub fn at(hour: u32, minute: u32) -> DateTime<Tz> {
    Paris
        .with_ymd_and_hms(2024, 6, 12, hour, minute, 0)
        .single()
        .expect("unambiguous test instant")
}

pub fn stop(name: &str, arrival: Option<&str>, departure: Option<&str>) -> Stop {
    Stop {
        stop_name: name.to_string(),
        arrival: arrival.map(str::to_string),
        departure: departure.map(str::to_string),
        ..Default::default()
    }
}

pub fn located(mut stop: Stop, lat: f64, lon: f64) -> Stop {
    stop.stop_lat = Some(lat.into());
    stop.stop_lon = Some(lon.into());
    stop
}

pub fn delayed(mut stop: Stop, delay: &str) -> Stop {
    stop.delay = Some(delay.to_string());
    stop
}

pub fn trip(id: &str, start_date: &str, stops: Vec<Stop>) -> Trip {
    let start_time = stops
        .first()
        .and_then(|s| s.departure.clone())
        .unwrap_or_default();

    Trip {
        trip_id: id.to_string(),
        start_date: start_date.to_string(),
        start_time,
        stops,
    }
}

/// Paris Gare de Lyon 08:00 -> Dijon 09:40 -> Lyon Part Dieu 11:00
pub fn paris_lyon(start_date: &str) -> Trip {
    trip(
        "OCESN6601F",
        start_date,
        vec![
            located(stop("Paris Gare de Lyon", None, Some("08:00")), 48.844, 2.374),
            located(stop("Dijon", Some("09:40"), Some("09:45")), 47.323, 5.027),
            located(stop("Lyon Part Dieu", Some("11:00"), None), 45.760, 4.859),
        ],
    )
}
