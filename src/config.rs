use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    model::{BoundingBox, Region},
};

pub const DEFAULT_FALLBACK_REGION: &str = "Other";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// Ordered list of regions. Earlier entries win where boxes overlap.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionConfig {
    pub regions: Vec<Region>,
    /// Name returned for points outside every box
    #[serde(default = "RegionConfig::default_fallback")]
    pub fallback: String,
}

impl RegionConfig {
    fn default_fallback() -> String {
        DEFAULT_FALLBACK_REGION.to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config: RegionConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        if config.regions.is_empty() {
            return Err(ConfigError::NoRegions {
                path: path.to_path_buf(),
            });
        }

        Ok(config)
    }
}

impl Default for RegionConfig {
    /// French macro regions, closed by a box over the rest of the network
    fn default() -> Self {
        let region = |name: &str, north: f64, south: f64, west: f64, east: f64| Region {
            name: name.to_string(),
            bounds: BoundingBox {
                north,
                south,
                west,
                east,
            },
        };

        Self {
            regions: vec![
                region("Île-de-France", 49.2, 48.0, 1.4, 3.6),
                region("Auvergne-Rhône-Alpes", 46.5, 44.0, 2.7, 7.2),
                region("Provence-Alpes-Côte d’Azur", 45.2, 42.8, 4.1, 7.7),
                region("Nouvelle-Aquitaine", 47.6, 43.0, -1.8, 2.4),
                region("Hauts-de-France", 51.2, 48.8, 1.2, 4.4),
                region("Grand Est", 49.9, 47.2, 3.2, 8.4),
                region("Occitanie", 45.1, 42.3, -0.1, 4.4),
                region("Bretagne / Pays de la Loire", 48.9, 46.2, -5.2, 1.5),
                region("Bourgogne-Franche-Comté", 48.3, 46.0, 3.0, 6.5),
                region(DEFAULT_FALLBACK_REGION, 55.0, 41.2, -5.5, 10.0),
            ],
            fallback: Self::default_fallback(),
        }
    }
}

/// Everything the analytics need at runtime, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub timezone: Tz,
    pub regions: RegionConfig,
    pub top_n: usize,
}

impl Settings {
    pub fn new(
        timezone: &str,
        regions_path: Option<&Path>,
        top_n: usize,
    ) -> Result<Self, ConfigError> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimeZone(timezone.to_string()))?;

        let regions = match regions_path {
            Some(path) => RegionConfig::load(path)?,
            None => RegionConfig::default(),
        };

        Ok(Self {
            timezone,
            regions,
            top_n,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            regions: RegionConfig::default(),
            top_n: 10,
        }
    }
}
