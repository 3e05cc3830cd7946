//! Turns the `HH:mm` strings of a trip into instants on its service day

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;

use super::trip::Trip;
use crate::utils::parse_clock_time;

/// How far a clock time has to fall behind the trip to count as the next day
pub const ROLLOVER_GAP_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopTimes {
    pub arrival: Option<DateTime<Tz>>,
    pub departure: Option<DateTime<Tz>>,
}

impl StopTimes {
    /// The time the stop is known by: arrival, else departure
    pub fn reference(&self) -> Option<DateTime<Tz>> {
        self.arrival.or(self.departure)
    }
}

/// Resolves every stop's times against `service_date` in `tz`.
///
/// Times are walked in visiting order and a time falling more than
/// [`ROLLOVER_GAP_HOURS`] hours behind the latest one so far is moved to the
/// next day, so a trip leaving at 23:40 and arriving at 00:15 ends up with an
/// arrival after its departure. Smaller backwards steps, such as a departure
/// listed a minute before its arrival, stay on the same day.
pub fn resolve_stop_times(trip: &Trip, service_date: NaiveDate, tz: Tz) -> Vec<StopTimes> {
    let mut day_offset = 0u64;
    let mut latest: Option<NaiveDateTime> = None;
    let rollover_gap = TimeDelta::hours(ROLLOVER_GAP_HOURS);

    let mut resolve = |raw: Option<&String>| -> Option<DateTime<Tz>> {
        let time = parse_clock_time(raw?)?;
        let mut local = service_date
            .checked_add_days(Days::new(day_offset))?
            .and_time(time);

        if latest.is_some_and(|l| l - local > rollover_gap) {
            day_offset += 1;
            local = service_date
                .checked_add_days(Days::new(day_offset))?
                .and_time(time);
        }
        latest = Some(latest.map_or(local, |l| l.max(local)));

        local.and_local_timezone(tz).earliest()
    };

    trip.stops
        .iter()
        .map(|stop| {
            let arrival = resolve(stop.arrival.as_ref());
            let departure = resolve(stop.departure.as_ref());
            StopTimes { arrival, departure }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Paris;

    use super::*;
    use crate::model::stop::Stop;

    fn stop(arrival: Option<&str>, departure: Option<&str>) -> Stop {
        Stop {
            stop_name: "x".to_string(),
            arrival: arrival.map(str::to_string),
            departure: departure.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_day() {
        let trip = Trip {
            stops: vec![stop(None, Some("08:00")), stop(Some("09:30"), None)],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        let times = resolve_stop_times(&trip, date, Paris);

        assert_eq!(
            times[0].departure,
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 8, 0, 0).unwrap())
        );
        assert_eq!(times[0].arrival, None);
        assert_eq!(
            times[1].reference(),
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_crossing_midnight() {
        let trip = Trip {
            stops: vec![
                stop(None, Some("23:40")),
                stop(Some("23:58"), Some("00:03")),
                stop(Some("00:45"), None),
            ],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        let times = resolve_stop_times(&trip, date, Paris);

        assert_eq!(
            times[1].arrival,
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 23, 58, 0).unwrap())
        );
        assert_eq!(
            times[1].departure,
            Some(Paris.with_ymd_and_hms(2024, 6, 13, 0, 3, 0).unwrap())
        );
        assert_eq!(
            times[2].arrival,
            Some(Paris.with_ymd_and_hms(2024, 6, 13, 0, 45, 0).unwrap())
        );
    }

    #[test]
    fn test_inverted_dwell_stays_on_the_same_day() {
        let trip = Trip {
            stops: vec![
                stop(None, Some("08:00")),
                stop(Some("09:40"), Some("09:39")),
                stop(Some("11:00"), None),
            ],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        let times = resolve_stop_times(&trip, date, Paris);

        assert_eq!(
            times[1].departure,
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 9, 39, 0).unwrap())
        );
        assert_eq!(
            times[2].arrival,
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_garbage_time_is_skipped() {
        let trip = Trip {
            stops: vec![stop(None, Some("10:00")), stop(Some("??:??"), Some("10:20"))],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        let times = resolve_stop_times(&trip, date, Paris);

        assert_eq!(times[1].arrival, None);
        assert_eq!(
            times[1].reference(),
            Some(Paris.with_ymd_and_hms(2024, 6, 12, 10, 20, 0).unwrap())
        );
    }
}
