pub mod delay_aggregator;
pub mod delay_parser;
pub mod position;
pub mod region_classifier;
pub mod report;
pub mod trip_classifier;
pub mod trip_status;

#[cfg(test)]
mod fixtures;

pub use delay_aggregator::DelayAggregator;
pub use delay_parser::parse_delay;
pub use region_classifier::RegionClassifier;
pub use trip_classifier::{TripPartition, classify};
