use crate::{
    config::RegionConfig,
    model::{Coordinate, Region},
};

/// First-match lookup over an ordered, immutable list of regions
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    regions: Vec<Region>,
    fallback: String,
}

impl RegionClassifier {
    pub fn new(config: RegionConfig) -> Self {
        Self {
            regions: config.regions,
            fallback: config.fallback,
        }
    }

    pub fn classify(&self, lat: f64, lon: f64) -> &str {
        self.regions
            .iter()
            .find(|r| r.bounds.contains(lat, lon))
            .map(|r| r.name.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    pub fn classify_coordinate(&self, coordinate: Coordinate) -> &str {
        self.classify(coordinate.lat, coordinate.lon)
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(RegionConfig::default())
    }
}
