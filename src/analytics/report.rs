//! Everything the dashboard shows for one snapshot, computed in one go

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::{
    delay_aggregator::{
        ChangeFilter, DelayAggregator, DelayChange, DelaySample, FeedSummary, HourlyDelay,
        RegionDelayRow, StopDensity, StopRankings, delay_evolution,
    },
    position::{PositionEstimate, RouteProgress, estimate_position, route_progress},
    region_classifier::RegionClassifier,
    trip_classifier::classify,
    trip_status::{NextStop, next_stop, resolve},
};
use crate::model::{Trip, TripStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub generated_at: String,
    pub current_trips: usize,
    pub historical_trips: usize,
    pub live: Vec<LiveTrip>,
    pub summary: FeedSummary,
    pub stop_rankings: StopRankings,
    pub hourly: Vec<HourlyDelay>,
    pub region_series: Vec<RegionDelayRow>,
    pub largest_changes: Vec<DelayChange>,
    pub largest_gains: Vec<DelayChange>,
    pub largest_losses: Vec<DelayChange>,
    pub stop_density: Vec<StopDensity>,
}

/// A row of the live table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTrip {
    pub trip_id: String,
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub start_time: String,
    pub status: TripStatus,
    pub next_stop: Option<NextStop>,
    pub position: Option<PositionEstimate>,
}

/// Everything the map modal shows about one trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripTracking {
    pub trip_id: String,
    pub status: TripStatus,
    pub next_stop: Option<NextStop>,
    pub position: Option<PositionEstimate>,
    pub route: RouteProgress,
    pub delays: Vec<DelaySample>,
}

impl LiveTrip {
    fn new(trip: &Trip, now: DateTime<Tz>) -> Self {
        Self {
            trip_id: trip.trip_id.clone(),
            origin: trip.origin().unwrap_or_default().to_string(),
            destination: trip.destination().unwrap_or_default().to_string(),
            start_date: trip.start_date.clone(),
            start_time: trip.start_time.clone(),
            status: resolve(trip, now),
            next_stop: next_stop(trip, now),
            position: estimate_position(trip, now),
        }
    }
}

/// Classifies the snapshot and aggregates over every trip that survived it
#[tracing::instrument(skip_all, fields(trips = trips.len(), now = %now))]
pub fn build(
    trips: Vec<Trip>,
    now: DateTime<Tz>,
    regions: &RegionClassifier,
    top_n: usize,
) -> Dashboard {
    let partition = classify(trips, now);
    let aggregator = DelayAggregator::new(
        partition.historical.iter().chain(&partition.current),
        regions,
        top_n,
    );

    Dashboard {
        generated_at: now.to_rfc3339(),
        current_trips: partition.current.len(),
        historical_trips: partition.historical.len(),
        live: partition
            .current
            .iter()
            .map(|t| LiveTrip::new(t, now))
            .collect(),
        summary: aggregator.summary(),
        stop_rankings: aggregator.stop_rankings(),
        hourly: aggregator.hourly(),
        region_series: aggregator.region_series(),
        largest_changes: aggregator.top_delay_changes(ChangeFilter::All),
        largest_gains: aggregator.top_delay_changes(ChangeFilter::Gain),
        largest_losses: aggregator.top_delay_changes(ChangeFilter::Loss),
        stop_density: aggregator.stop_density(),
    }
}

pub fn track(trip: &Trip, now: DateTime<Tz>) -> TripTracking {
    TripTracking {
        trip_id: trip.trip_id.clone(),
        status: resolve(trip, now),
        next_stop: next_stop(trip, now),
        position: estimate_position(trip, now),
        route: route_progress(trip, now),
        delays: delay_evolution(trip),
    }
}
