use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("error reading the region file {}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing the region file {}", path.display())]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("region file {} defines no regions", path.display())]
    NoRegions { path: PathBuf },

    #[error("unknown time zone {0}")]
    UnknownTimeZone(String),
}

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("error reading the feed {}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing the feed")]
    ParseError(#[from] serde_json::Error),
}
