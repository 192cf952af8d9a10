//! XML Schema `dateTime` encoding with a colon-separated timezone.
//!
//! Values look like `2008-05-24T16:31:25-04:00`. Sub-second precision is
//! not carried.

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::DateTimeError;

const SCHEMA_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format as `YYYY-MM-DDTHH:MM:SS±HH:MM`.
pub fn format_schema_datetime<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    value.format(SCHEMA_FORMAT).to_string()
}

/// Inverse of [`format_schema_datetime`].
///
/// The last colon (the one inside the offset) is removed and the remainder
/// is parsed with a fixed-width `±HHMM` offset.
pub fn parse_schema_datetime(value: &str) -> Result<DateTime<FixedOffset>, DateTimeError> {
    let trimmed = value.trim();
    let colon = trimmed
        .rfind(':')
        .ok_or_else(|| DateTimeError::MissingOffset {
            value: value.to_string(),
        })?;
    let mut compact = String::with_capacity(trimmed.len());
    compact.push_str(&trimmed[..colon]);
    compact.push_str(&trimmed[colon + 1..]);
    DateTime::parse_from_str(&compact, COMPACT_OFFSET_FORMAT).map_err(|e| DateTimeError::Invalid {
        value: value.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_colon_in_offset() {
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2008, 5, 24, 16, 31, 25).unwrap();
        assert_eq!(format_schema_datetime(&dt), "2008-05-24T16:31:25-04:00");
    }

    #[test]
    fn parses_default_override_value() {
        let dt = parse_schema_datetime("2008-05-24T16:31:25-04:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(format_schema_datetime(&dt), "2008-05-24T16:31:25-04:00");
    }

    #[test]
    fn rejects_values_without_offset_colon() {
        assert!(parse_schema_datetime("2008-05-24").is_err());
        assert!(parse_schema_datetime("2008-05-24T16:31:25").is_err());
        assert!(parse_schema_datetime("not a date").is_err());
    }
}
