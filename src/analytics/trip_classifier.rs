//! Splits a feed snapshot into trips still to watch and trips that are done

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use super::trip_status;
use crate::model::Trip;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripPartition {
    /// Ongoing, or scheduled later today or on a later day
    pub current: Vec<Trip>,
    /// Completed and not dated in the future
    pub historical: Vec<Trip>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Current,
    Historical,
    Neither,
}

/// Drops invalid trips and sorts the rest into current and historical.
///
/// A trip can land in neither set, e.g. a completed trip dated in the
/// future. Such trips are dropped without an error.
#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn classify(trips: Vec<Trip>, now: DateTime<Tz>) -> TripPartition {
    let mut partition = TripPartition::default();
    let mut invalid = 0usize;
    let mut unplaced = 0usize;

    for trip in trips {
        if !trip.is_valid() {
            debug!(trip_id = %trip.trip_id, "dropping trip without named endpoints");
            invalid += 1;
            continue;
        }

        match placement(&trip, now) {
            Placement::Current => partition.current.push(trip),
            Placement::Historical => partition.historical.push(trip),
            Placement::Neither => {
                debug!(trip_id = %trip.trip_id, start_date = %trip.start_date, "trip is neither current nor historical");
                unplaced += 1;
            }
        }
    }

    info!(
        current = partition.current.len(),
        historical = partition.historical.len(),
        invalid,
        unplaced,
        "classified trips"
    );

    partition
}

fn placement(trip: &Trip, now: DateTime<Tz>) -> Placement {
    let status = trip_status::resolve(trip, now);
    let today = now.date_naive();

    let service_date = trip.service_date();
    let is_future_date = service_date.is_some_and(|d| d > today);
    let is_today = service_date.is_some_and(|d| d == today);
    let starts_later_today = is_today
        && trip
            .scheduled_start()
            .is_some_and(|start| start >= now.time());

    if status.is_completed() && !is_future_date {
        Placement::Historical
    } else if !status.is_completed() && (is_future_date || starts_later_today || is_today) {
        Placement::Current
    } else {
        Placement::Neither
    }
}
