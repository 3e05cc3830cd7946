//! Live position estimate of a moving train.
//!
//! The train is placed on the straight line between the two stops that
//! bracket `now`, proportionally to the time elapsed since the first one.
//! Nothing is cached, every call starts from the schedule again.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::model::{Coordinate, Trip, timeline::resolve_stop_times};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionEstimate {
    pub coordinate: Coordinate,
    /// 0.0 at `from_stop`, 1.0 at `to_stop`
    pub ratio: f64,
    pub from_stop: String,
    pub to_stop: String,
}

/// Polylines for the map, around the position of the train
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteProgress {
    pub passed: Vec<Coordinate>,
    pub upcoming: Vec<Coordinate>,
}

struct Waypoint<'a> {
    name: &'a str,
    coordinate: Coordinate,
    time: DateTime<Tz>,
}

/// Stops with both a coordinate and a time, in visiting order
fn waypoints(trip: &Trip, now: DateTime<Tz>) -> Vec<Waypoint<'_>> {
    let service_date = trip.service_date().unwrap_or(now.date_naive());

    trip.stops
        .iter()
        .zip(resolve_stop_times(trip, service_date, now.timezone()))
        .filter_map(|(stop, times)| {
            Some(Waypoint {
                name: &stop.stop_name,
                coordinate: stop.coordinate()?,
                time: times.reference()?,
            })
        })
        .collect()
}

/// Index of the first waypoint still ahead of `now`
fn current_index(waypoints: &[Waypoint], now: DateTime<Tz>) -> Option<usize> {
    waypoints.iter().position(|w| w.time > now)
}

pub fn estimate_position(trip: &Trip, now: DateTime<Tz>) -> Option<PositionEstimate> {
    let waypoints = waypoints(trip, now);
    if waypoints.len() < 2 {
        return None;
    }

    // Past the last stop the train is kept on its final leg
    let (prev, next) = match current_index(&waypoints, now) {
        None => (
            &waypoints[waypoints.len() - 2],
            &waypoints[waypoints.len() - 1],
        ),
        Some(0) => (&waypoints[0], &waypoints[1]),
        Some(i) => (&waypoints[i - 1], &waypoints[i]),
    };

    let total = (next.time - prev.time).num_milliseconds() as f64;
    let ratio = if total > 0.0 {
        let elapsed = (now - prev.time).num_milliseconds() as f64;
        (elapsed / total).clamp(0.0, 1.0)
    } else if now >= next.time {
        1.0
    } else {
        0.0
    };

    Some(PositionEstimate {
        coordinate: prev.coordinate.lerp(next.coordinate, ratio),
        ratio,
        from_stop: prev.name.to_string(),
        to_stop: next.name.to_string(),
    })
}

pub fn interpolate(trip: &Trip, now: DateTime<Tz>) -> Option<Coordinate> {
    estimate_position(trip, now).map(|e| e.coordinate)
}

/// Splits the route into the part already driven and the part still ahead.
///
/// The upcoming part starts at the stop the train last left so both lines
/// meet under the train.
pub fn route_progress(trip: &Trip, now: DateTime<Tz>) -> RouteProgress {
    fn coordinates(waypoints: &[Waypoint]) -> Vec<Coordinate> {
        waypoints.iter().map(|w| w.coordinate).collect()
    }

    let waypoints = waypoints(trip, now);

    let (passed, upcoming) = match current_index(&waypoints, now) {
        None => (
            coordinates(&waypoints),
            coordinates(&waypoints[waypoints.len().saturating_sub(2)..]),
        ),
        Some(i) => (
            coordinates(&waypoints[..i]),
            coordinates(&waypoints[i.saturating_sub(1)..]),
        ),
    };

    RouteProgress {
        passed,
        upcoming: if upcoming.len() < 2 { vec![] } else { upcoming },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{DATE, at, located, paris_lyon, stop, trip};
    use crate::model::RawCoordinate;

    const EPSILON: f64 = 1e-9;

    fn two_stops() -> Trip {
        trip(
            "two-stops",
            DATE,
            vec![
                located(stop("A", None, Some("10:00")), 40.0, 0.0),
                located(stop("B", Some("11:00"), None), 41.0, 2.0),
            ],
        )
    }

    fn assert_close(actual: Coordinate, lat: f64, lon: f64) {
        assert!(
            (actual.lat - lat).abs() < EPSILON && (actual.lon - lon).abs() < EPSILON,
            "expected ({lat}, {lon}), got {actual:?}"
        );
    }

    #[test]
    fn test_halfway() {
        let estimate = estimate_position(&two_stops(), at(10, 30)).unwrap();
        assert_eq!(estimate.ratio, 0.5);
        assert_close(estimate.coordinate, 40.5, 1.0);
        assert_eq!(estimate.from_stop, "A");
        assert_eq!(estimate.to_stop, "B");
    }

    #[test]
    fn test_segment_ends() {
        let start = estimate_position(&two_stops(), at(10, 0)).unwrap();
        assert_eq!(start.ratio, 0.0);
        assert_close(start.coordinate, 40.0, 0.0);

        let end = estimate_position(&two_stops(), at(11, 0)).unwrap();
        assert_eq!(end.ratio, 1.0);
        assert_close(end.coordinate, 41.0, 2.0);
    }

    #[test]
    fn test_before_departure_and_after_arrival() {
        assert_close(interpolate(&two_stops(), at(6, 0)).unwrap(), 40.0, 0.0);
        assert_close(interpolate(&two_stops(), at(20, 0)).unwrap(), 41.0, 2.0);
    }

    #[test]
    fn test_advances_monotonically() {
        let trip = two_stops();
        let mut last = 0.0;
        for minute in 0..60 {
            let estimate = estimate_position(&trip, at(10, minute)).unwrap();
            assert!(estimate.ratio >= last);
            last = estimate.ratio;
        }
    }

    #[test]
    fn test_continuous_across_stops() {
        // Dijon is known by its 09:40 arrival
        let trip = paris_lyon(DATE);

        let before = interpolate(&trip, at(9, 39)).unwrap();
        let at_stop = interpolate(&trip, at(9, 40)).unwrap();
        assert_close(at_stop, 47.323, 5.027);
        assert!((before.lat - at_stop.lat).abs() < 0.05);

        let estimate = estimate_position(&trip, at(10, 20)).unwrap();
        assert_eq!(estimate.from_stop, "Dijon");
        assert_eq!(estimate.to_stop, "Lyon Part Dieu");
    }

    #[test]
    fn test_not_enough_coordinates() {
        let mut broken = paris_lyon(DATE);
        broken.stops[0].stop_lat = Some(RawCoordinate::Text("n/a".to_string()));
        broken.stops[2].stop_lon = None;

        assert_eq!(interpolate(&broken, at(9, 0)), None);
        assert_eq!(interpolate(&trip("empty", DATE, vec![]), at(9, 0)), None);
    }

    #[test]
    fn test_noisy_coordinates_are_sanitized() {
        let mut noisy = two_stops();
        noisy.stops[0].stop_lat = Some(RawCoordinate::Text("40.0°".to_string()));

        assert_close(interpolate(&noisy, at(10, 30)).unwrap(), 40.5, 1.0);
    }

    #[test]
    fn test_zero_length_leg() {
        let same_minute = trip(
            "same-minute",
            DATE,
            vec![
                located(stop("A", None, Some("10:00")), 40.0, 0.0),
                located(stop("B", Some("10:00"), None), 41.0, 2.0),
            ],
        );

        assert_close(interpolate(&same_minute, at(9, 59)).unwrap(), 40.0, 0.0);
        assert_close(interpolate(&same_minute, at(10, 0)).unwrap(), 41.0, 2.0);
    }

    #[test]
    fn test_route_progress() {
        let paris_lyon = paris_lyon(DATE);

        let before = route_progress(&paris_lyon, at(7, 0));
        assert!(before.passed.is_empty());
        assert_eq!(before.upcoming.len(), 3);

        let between = route_progress(&paris_lyon, at(10, 0));
        assert_eq!(between.passed.len(), 2);
        assert_eq!(between.upcoming.len(), 2);
        assert_eq!(between.passed.last(), between.upcoming.first());

        let after = route_progress(&paris_lyon, at(12, 0));
        assert_eq!(after.passed.len(), 3);
        assert_eq!(after.upcoming.len(), 2);

        let empty = route_progress(&trip("empty", DATE, vec![]), at(12, 0));
        assert_eq!(empty, RouteProgress::default());
    }
}
