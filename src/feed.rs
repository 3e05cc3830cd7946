//! Reading feed snapshots. Fetching them over the network is somebody else's job.

use std::path::Path;

use tracing::{info, info_span};

use crate::{error::FeedError, model::Trip};

pub fn parse_feed(content: &str) -> Result<Vec<Trip>, FeedError> {
    let trips: Vec<Trip> = serde_json::from_str(content)?;

    info!("got {} trips", trips.len());

    Ok(trips)
}

#[tracing::instrument(err, skip_all, fields(path = %path.as_ref().display()))]
pub fn read_feed<P: AsRef<Path>>(path: P) -> Result<Vec<Trip>, FeedError> {
    let path = path.as_ref();
    let content = info_span!("Reading feed file").in_scope(|| {
        std::fs::read_to_string(path).map_err(|source| FeedError::ReadError {
            path: path.to_path_buf(),
            source,
        })
    })?;

    parse_feed(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_response() -> Result<(), anyhow::Error> {
        let json = include_str!("../documentation/example_responses/trips.json");
        let trips = parse_feed(json)?;

        assert_eq!(trips.len(), 4);
        assert_eq!(trips[0].trip_id, "OCESN6601F3590448:2024-06-12T00:00:00");
        assert_eq!(trips[0].stops.len(), 3);
        assert!(trips.iter().any(|t| !t.is_valid()));

        Ok(())
    }

    #[test]
    fn test_parse_history_records() -> Result<(), anyhow::Error> {
        let trips = parse_feed(
            r#"[{
                "trip_id": "OCESN871234",
                "start_time": "06:12:00",
                "start_date": "20240610",
                "stops": [],
                "created_at": "2024-06-10T04:00:00.000000"
            }]"#,
        )?;

        assert_eq!(trips[0].start_time, "06:12:00");
        assert!(trips[0].stops.is_empty());

        Ok(())
    }

    #[test]
    fn test_not_a_feed() {
        assert!(matches!(
            parse_feed(r#"{"error": "upstream down"}"#),
            Err(FeedError::ParseError(_))
        ));
        assert!(matches!(
            read_feed("/definitely/not/here/trips.json"),
            Err(FeedError::ReadError { .. })
        ));
    }
}
