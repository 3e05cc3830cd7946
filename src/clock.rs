use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// The single source of "now" for everything time dependent
pub trait Clock {
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock seen from the feed's time zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    pub tz: Tz,
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Paris;

    use super::*;

    #[test]
    fn test_clocks_report_their_zone() {
        let system = SystemClock { tz: Paris };
        assert_eq!(system.now().timezone(), Paris);

        let instant = Paris.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
