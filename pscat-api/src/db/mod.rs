//! Database access for pscat-api
//!
//! Schema creation lives in `pscat_common::db`; this module holds the
//! queries the service runs against it.

pub mod problems;
pub mod sequences;
pub mod users;

use chrono::{DateTime, SecondsFormat, Utc};
use pscat_common::{Error, Result};
use uuid::Uuid;

pub use pscat_common::db::{init_database, init_memory_database};

/// Current time as fixed-width RFC 3339 text, so stored timestamps sort lexically
pub(crate) fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", raw, e)))
}

pub(crate) fn parse_guid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| Error::Internal(format!("Invalid stored guid '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let text = format_timestamp(&now);
        assert!(text.ends_with('Z'));
        let parsed = parse_timestamp(&text).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_invalid_guid_is_internal_error() {
        assert!(matches!(parse_guid("nope"), Err(Error::Internal(_))));
    }
}
