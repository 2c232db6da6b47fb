//! Timestamp value object.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp for entity creation and update times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp, truncated to microseconds so it survives
    /// a round trip through storage unchanged.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(6))
    }

    /// Parse from an RFC 3339 string.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Format as RFC 3339 with fixed microsecond precision, so that
    /// lexicographic order of the stored text matches chronological order.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_roundtrip() {
        let ts = Timestamp::now();
        let parsed = Timestamp::parse(&ts.to_rfc3339()).unwrap();
        assert_eq!(parsed.to_rfc3339(), ts.to_rfc3339());
    }

    #[test]
    fn text_order_matches_time_order() {
        let earlier = Timestamp::parse("2026-01-05T10:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-05T10:00:00.5Z").unwrap();
        assert!(earlier.to_rfc3339() < later.to_rfc3339());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
    }
}
