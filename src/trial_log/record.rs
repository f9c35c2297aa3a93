//! One logged trial outcome.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Name logged when the participant left the name field blank.
pub const ANONYMOUS: &str = "Anonymous";

/// Time from trial start to selection, in hundredths of a second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResponseTime {
    centis: u64,
}

impl ResponseTime {
    pub fn from_centis(centis: u64) -> Self {
        Self { centis }
    }

    /// Elapsed time from `start` to `end`, rounded half-up to 0.01s.
    ///
    /// A clock that ran backwards yields zero.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let millis = end.signed_duration_since(start).num_milliseconds().max(0) as u64;
        Self {
            centis: (millis + 5) / 10,
        }
    }

    pub fn centis(&self) -> u64 {
        self.centis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.centis as f64 / 100.0
    }
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.centis / 100, self.centis % 100)
    }
}

impl Serialize for ResponseTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable outcome of one completed trial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// When the participant made the selection
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub participant_name: String,
    pub transition_speed_ms: u32,
    pub move_limit: u32,
    pub is_correct: bool,
    pub response_time: ResponseTime,
}

impl LogRecord {
    /// `2024-01-01T00:00:00.000Z` style timestamp used in exports.
    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Participant name as it should be logged.
///
/// Only an empty name becomes [`ANONYMOUS`]; anything else is kept verbatim.
pub fn participant_or_anonymous(name: &str) -> String {
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.to_string()
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(millis)
    }

    #[test]
    fn response_time_rounds_to_hundredths() {
        assert_eq!(ResponseTime::between(at(0), at(1234)).to_string(), "1.23");
        assert_eq!(ResponseTime::between(at(0), at(1235)).to_string(), "1.24");
        assert_eq!(ResponseTime::between(at(0), at(999)).to_string(), "1.00");
    }

    #[test]
    fn response_time_always_has_two_decimals() {
        assert_eq!(ResponseTime::from_centis(0).to_string(), "0.00");
        assert_eq!(ResponseTime::from_centis(5).to_string(), "0.05");
        assert_eq!(ResponseTime::from_centis(12_000).to_string(), "120.00");
    }

    #[test]
    fn backwards_clock_is_zero() {
        assert_eq!(ResponseTime::between(at(500), at(0)).centis(), 0);
    }

    #[test]
    fn empty_participant_is_anonymous() {
        assert_eq!(participant_or_anonymous(""), ANONYMOUS);
        assert_eq!(participant_or_anonymous("Jo"), "Jo");
    }

    #[test]
    fn whitespace_participant_is_kept_verbatim() {
        assert_eq!(participant_or_anonymous("   "), "   ");
        assert_eq!(participant_or_anonymous(" Jo "), " Jo ");
    }

    #[test]
    fn timestamp_renders_with_millis_and_z() {
        let record = LogRecord {
            timestamp: at(0),
            participant_name: "Jo".to_string(),
            transition_speed_ms: 200,
            move_limit: 3,
            is_correct: true,
            response_time: ResponseTime::from_centis(123),
        };

        assert_eq!(record.timestamp_string(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn record_serializes_readable_fields() {
        let record = LogRecord {
            timestamp: at(250),
            participant_name: "Jo".to_string(),
            transition_speed_ms: 350,
            move_limit: 5,
            is_correct: false,
            response_time: ResponseTime::from_centis(207),
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["timestamp"], "2024-01-01T00:00:00.250Z");
        assert_eq!(json["response_time"], "2.07");
        assert_eq!(json["is_correct"], false);
    }
}
