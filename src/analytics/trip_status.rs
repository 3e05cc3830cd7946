//! Answers "where is this train right now" from its schedule alone

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::model::{Trip, TripStatus, timeline::resolve_stop_times};

/// Walks the stops in order and reports the first event still ahead of `now`.
///
/// An arrival is checked before the departure of the same stop, so a stop
/// whose both times are ahead is reported as being approached.
pub fn resolve(trip: &Trip, now: DateTime<Tz>) -> TripStatus {
    let Some(service_date) = trip.service_date() else {
        return TripStatus::Completed;
    };

    let times = resolve_stop_times(trip, service_date, now.timezone());

    for (stop, times) in trip.stops.iter().zip(times) {
        if times.arrival.is_some_and(|arrival| arrival > now) {
            return TripStatus::Approaching(stop.stop_name.clone());
        }
        if times.departure.is_some_and(|departure| departure > now) {
            return TripStatus::At(stop.stop_name.clone());
        }
    }

    TripStatus::Completed
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextStop {
    pub index: usize,
    pub stop_name: String,
    pub seconds_remaining: i64,
}

/// The next stop still ahead and how long until the train gets there
pub fn next_stop(trip: &Trip, now: DateTime<Tz>) -> Option<NextStop> {
    let service_date = trip.service_date().unwrap_or(now.date_naive());
    let times = resolve_stop_times(trip, service_date, now.timezone());

    trip.stops
        .iter()
        .zip(times)
        .enumerate()
        .find_map(|(index, (stop, times))| {
            let time = times.reference().filter(|t| *t > now)?;
            Some(NextStop {
                index,
                stop_name: stop.stop_name.clone(),
                seconds_remaining: (time - now).num_seconds(),
            })
        })
}
