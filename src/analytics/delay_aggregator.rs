//! Delay statistics over a set of trips, sliced by stop, hour and region.
//!
//! Every stop counts. A stop without a usable delay label counts as on
//! time, only stops without a time or coordinate are left out of the hourly
//! and regional views respectively.

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use chrono::Timelike;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::{delay_parser::parse_delay, region_classifier::RegionClassifier};
use crate::{
    model::{Coordinate, Trip},
    utils::{parse_clock_time, round_half_up, round_to_tenth},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopDelay {
    pub stop_name: String,
    pub avg_delay_min: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRankings {
    pub most_delayed: Vec<StopDelay>,
    pub least_delayed: Vec<StopDelay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyDelay {
    pub hour: u32,
    pub avg_delay_min: i64,
}

/// One row of the regional time series. Regions without stops that day are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionDelayRow {
    pub date: String,
    pub regions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayTrend {
    Gain,
    Loss,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayChange {
    pub trip_id: String,
    pub origin: String,
    pub destination: String,
    pub departure: Option<String>,
    pub net_delay_change_min: i64,
    pub trend: DelayTrend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeFilter {
    #[default]
    All,
    Gain,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelaySample {
    pub stop_name: String,
    pub delay_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub total_trips: usize,
    pub total_stops: usize,
    pub avg_delay_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopDensity {
    pub stop_name: String,
    pub coordinate: Coordinate,
    pub visits: usize,
    pub region: String,
}

pub struct DelayAggregator<'a> {
    trips: Vec<&'a Trip>,
    regions: &'a RegionClassifier,
    top_n: usize,
}

impl<'a> DelayAggregator<'a> {
    /// Invalid trips are ignored here too, whatever the caller passes in
    pub fn new(
        trips: impl IntoIterator<Item = &'a Trip>,
        regions: &'a RegionClassifier,
        top_n: usize,
    ) -> Self {
        let trips = trips.into_iter().filter(|t| t.is_valid()).collect_vec();
        debug!(trips = trips.len(), "aggregating delays");

        Self {
            trips,
            regions,
            top_n,
        }
    }

    /// Unnamed intermediate stops have nothing to be ranked by and are skipped
    pub fn stop_averages(&self) -> Vec<StopDelay> {
        let mut by_stop: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
        for stop in self.trips.iter().flat_map(|t| &t.stops).filter(|s| s.has_name()) {
            let entry = by_stop.entry(stop.stop_name.as_str()).or_default();
            entry.0 = entry.0.saturating_add(parse_delay(stop.delay.as_deref()));
            entry.1 += 1;
        }

        by_stop
            .into_iter()
            .map(|(name, (total, samples))| StopDelay {
                stop_name: name.to_string(),
                avg_delay_min: total as f64 / samples as f64 / 60.0,
                samples,
            })
            .collect()
    }

    pub fn stop_rankings(&self) -> StopRankings {
        let averages = self.stop_averages();

        // `stop_averages` is sorted by name and the sorts are stable,
        // so ties come out alphabetically
        let most_delayed = averages
            .iter()
            .sorted_by(|a, b| b.avg_delay_min.total_cmp(&a.avg_delay_min))
            .take(self.top_n)
            .cloned()
            .collect_vec();
        let least_delayed = averages
            .iter()
            .sorted_by(|a, b| a.avg_delay_min.total_cmp(&b.avg_delay_min))
            .take(self.top_n)
            .cloned()
            .collect_vec();

        StopRankings {
            most_delayed,
            least_delayed,
        }
    }

    /// Always 24 buckets, hours without stops report 0
    pub fn hourly(&self) -> Vec<HourlyDelay> {
        let mut buckets = [(0i64, 0usize); 24];

        for stop in self.trips.iter().flat_map(|t| &t.stops) {
            let Some(time) = stop
                .arrival
                .as_deref()
                .or(stop.departure.as_deref())
                .and_then(parse_clock_time)
            else {
                continue;
            };

            let bucket = &mut buckets[time.hour() as usize];
            bucket.0 = bucket.0.saturating_add(parse_delay(stop.delay.as_deref()));
            bucket.1 += 1;
        }

        buckets
            .iter()
            .enumerate()
            .map(|(hour, (total, count))| HourlyDelay {
                hour: hour as u32,
                avg_delay_min: if *count == 0 {
                    0
                } else {
                    round_half_up(*total as f64 / *count as f64 / 60.0)
                },
            })
            .collect()
    }

    /// Mean delay per service date and region, dates ascending
    pub fn region_series(&self) -> Vec<RegionDelayRow> {
        let mut cells: BTreeMap<&str, BTreeMap<&str, (i64, usize)>> = BTreeMap::new();

        for trip in &self.trips {
            for stop in &trip.stops {
                let Some(coordinate) = stop.coordinate() else {
                    continue;
                };
                let region = self.regions.classify_coordinate(coordinate);
                let cell = cells
                    .entry(trip.start_date.as_str())
                    .or_default()
                    .entry(region)
                    .or_default();
                cell.0 = cell.0.saturating_add(parse_delay(stop.delay.as_deref()));
                cell.1 += 1;
            }
        }

        cells
            .into_iter()
            .map(|(date, regions)| RegionDelayRow {
                date: date.to_string(),
                regions: regions
                    .into_iter()
                    .map(|(region, (total, count))| {
                        let avg_min = total as f64 / count as f64 / 60.0;
                        (region.to_string(), round_to_tenth(avg_min))
                    })
                    .collect(),
            })
            .collect()
    }

    /// Net gain or loss of every trip with at least two stops, in feed order
    pub fn delay_changes(&self) -> Vec<DelayChange> {
        self.trips
            .iter()
            .filter_map(|trip| net_delay_change(trip))
            .collect()
    }

    /// The N largest changes, by absolute value
    pub fn top_delay_changes(&self, filter: ChangeFilter) -> Vec<DelayChange> {
        self.delay_changes()
            .into_iter()
            .filter(|c| match filter {
                ChangeFilter::All => true,
                ChangeFilter::Gain => c.trend == DelayTrend::Gain,
                ChangeFilter::Loss => c.trend == DelayTrend::Loss,
            })
            .sorted_by_key(|c| std::cmp::Reverse(c.net_delay_change_min.abs()))
            .take(self.top_n)
            .collect()
    }

    pub fn summary(&self) -> FeedSummary {
        let delays = self
            .trips
            .iter()
            .flat_map(|t| &t.stops)
            .map(|s| parse_delay(s.delay.as_deref()))
            .collect_vec();

        let avg_delay_seconds = if delays.is_empty() {
            0
        } else {
            let total = delays.iter().fold(0i64, |acc, d| acc.saturating_add(*d));
            round_half_up(total as f64 / delays.len() as f64)
        };

        FeedSummary {
            total_trips: self.trips.len(),
            total_stops: delays.len(),
            avg_delay_seconds,
        }
    }

    /// How often each located stop is served, keyed by its exact coordinate
    pub fn stop_density(&self) -> Vec<StopDensity> {
        let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
        let mut density: Vec<StopDensity> = vec![];

        for stop in self.trips.iter().flat_map(|t| &t.stops) {
            let Some(coordinate) = stop.coordinate() else {
                continue;
            };
            let key = (coordinate.lat.to_bits(), coordinate.lon.to_bits());

            match seen.entry(key) {
                Entry::Occupied(index) => {
                    let entry = &mut density[*index.get()];
                    entry.visits += 1;
                    entry.stop_name = stop.stop_name.clone();
                }
                Entry::Vacant(slot) => {
                    slot.insert(density.len());
                    density.push(StopDensity {
                        stop_name: stop.stop_name.clone(),
                        coordinate,
                        visits: 1,
                        region: self.regions.classify_coordinate(coordinate).to_string(),
                    });
                }
            }
        }

        density
    }
}

/// Sum of consecutive differences, i.e. last delay minus first, in minutes
pub fn net_delay_change(trip: &Trip) -> Option<DelayChange> {
    if trip.stops.len() < 2 {
        return None;
    }

    let delays = trip
        .stops
        .iter()
        .map(|s| parse_delay(s.delay.as_deref()))
        .collect_vec();
    let delta = delays
        .iter()
        .tuple_windows()
        .fold(0i64, |acc, (a, b)| acc.saturating_add(b.saturating_sub(*a)));
    let minutes = round_half_up(delta as f64 / 60.0);

    let trend = match minutes {
        m if m < 0 => DelayTrend::Gain,
        m if m > 0 => DelayTrend::Loss,
        _ => DelayTrend::Unchanged,
    };

    Some(DelayChange {
        trip_id: trip.trip_id.clone(),
        origin: trip.origin().unwrap_or_default().to_string(),
        destination: trip.destination().unwrap_or_default().to_string(),
        departure: trip.stops.first().and_then(|s| s.departure.clone()),
        net_delay_change_min: minutes,
        trend,
    })
}

/// Delay at every stop of one trip, for plotting how it builds up
pub fn delay_evolution(trip: &Trip) -> Vec<DelaySample> {
    trip.stops
        .iter()
        .enumerate()
        .map(|(i, stop)| DelaySample {
            stop_name: if stop.has_name() {
                stop.stop_name.clone()
            } else {
                format!("Stop {}", i + 1)
            },
            delay_seconds: parse_delay(stop.delay.as_deref()),
        })
        .collect()
}

/// Keeps stops served at least `min_visits` times, optionally in one region only
pub fn filter_density(
    density: &[StopDensity],
    min_visits: usize,
    region: Option<&str>,
) -> Vec<StopDensity> {
    density
        .iter()
        .filter(|d| d.visits >= min_visits)
        .filter(|d| region.is_none_or(|r| d.region == r))
        .cloned()
        .collect()
}
