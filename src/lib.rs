//! Trip analytics and real time positioning for a train schedule dashboard.
//!
//! Takes a snapshot of trips as published by the feed and works out where
//! each train is, which trips are still running, where a moving train
//! should be on the map and how delays spread over stops, hours and
//! regions. Everything here is a synchronous, pure function of the snapshot
//! and an explicit `now`.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod utils;
