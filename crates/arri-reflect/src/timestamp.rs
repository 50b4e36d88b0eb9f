//! UTC timestamp field type.

use std::fmt;

use chrono::{DateTime, Utc};
use facet::{Facet, Shape};
use serde::{Deserialize, Serialize};

/// A point in time, reflected as the `timestamp` primitive and serialized as
/// an RFC 3339 string.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, facet::Facet,
)]
#[facet(opaque)]
#[serde(transparent)]
pub struct Timestamp {
    instant: DateTime<Utc>,
}

impl Timestamp {
    pub fn now() -> Self {
        Self { instant: Utc::now() }
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.instant
    }

    pub fn into_datetime(self) -> DateTime<Utc> {
        self.instant
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant.to_rfc3339())
    }
}

pub(crate) fn is_timestamp(shape: &'static Shape) -> bool {
    shape.id == <Timestamp as Facet<'static>>::SHAPE.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_as_rfc3339() {
        let at = Timestamp::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        assert_eq!(serde_json::to_string(&at).unwrap(), "\"2024-05-01T12:30:00Z\"");
        let parsed: Timestamp = serde_json::from_str("\"2024-05-01T12:30:00Z\"").unwrap();
        assert_eq!(parsed, at);
    }

    #[test]
    fn only_timestamp_is_recognized() {
        assert!(is_timestamp(<Timestamp as Facet<'static>>::SHAPE));
        assert!(!is_timestamp(<String as Facet<'static>>::SHAPE));
    }
}
