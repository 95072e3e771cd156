//! ISO-8601 encoding of task dates.
//!
//! Both `dueDate` and `createdAt` are stored as UTC date-time strings with
//! millisecond precision (`2025-03-01T08:00:00.000Z`). A due date is encoded
//! as local midnight of the due day, so decoding converts back to local time
//! before taking the calendar date.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Encode a due date as the UTC instant of its local midnight.
pub fn format_due_date(date: NaiveDate) -> String {
    local_start_of_day(date)
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a due date. Accepts a full date-time string or a bare `YYYY-MM-DD`.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|e| format!("invalid due date '{}': {}", raw, e))
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

/// Due date as shown in lists: `Mar 01, 2025`.
pub fn display_due_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Parse a due date typed by the user. Besides `YYYY-MM-DD` this accepts
/// `today`, `tomorrow` and `+N` (days from today).
pub fn parse_due_input(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    match raw.to_ascii_lowercase().as_str() {
        "" => return Err("Due date is required".to_string()),
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + chrono::Duration::days(1)),
        _ => {}
    }

    if let Some(offset) = raw.strip_prefix('+') {
        let days: i64 = offset
            .parse()
            .map_err(|_| format!("invalid day offset '{}'", raw))?;
        return chrono::Duration::try_days(days)
            .and_then(|d| today.checked_add_signed(d))
            .ok_or_else(|| format!("day offset out of range '{}'", raw));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

/// First existing local instant of `date`. Midnight can be skipped by a DST
/// jump in a few zones, in which case 01:00 is used instead.
fn local_start_of_day(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(local) = Local.from_local_datetime(&midnight).earliest() {
        return local;
    }
    let one_am = midnight + chrono::Duration::hours(1);
    Local
        .from_local_datetime(&one_am)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
}

/// `#[serde(with = "dates::due_date")]`
pub mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_due_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_due_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "dates::timestamp")]`
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_keeps_calendar_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let encoded = format_due_date(date);
        assert!(encoded.ends_with('Z'));
        assert_eq!(parse_due_date(&encoded), Ok(date));
    }

    #[test]
    fn test_due_date_accepts_plain_date() {
        assert_eq!(
            parse_due_date("2025-12-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap())
        );
    }

    #[test]
    fn test_due_date_rejects_garbage() {
        assert!(parse_due_date("next tuesday").is_err());
    }

    #[test]
    fn test_timestamp_millisecond_format() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 5).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-15T09:30:05.000Z");
        assert_eq!(parse_timestamp("2025-01-15T09:30:05.000Z"), Ok(ts));
    }

    #[test]
    fn test_due_input_shortcuts() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        assert_eq!(parse_due_input("today", today), Ok(today));
        assert_eq!(
            parse_due_input(" Tomorrow ", today),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
        assert_eq!(
            parse_due_input("+3", today),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
        );
        assert_eq!(
            parse_due_input("2025-04-01", today),
            Ok(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
        );
    }

    #[test]
    fn test_due_input_errors() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        assert_eq!(
            parse_due_input("   ", today),
            Err("Due date is required".to_string())
        );
        assert!(parse_due_input("+x", today).is_err());
        assert_eq!(
            parse_due_input("+999999999999", today),
            Err("day offset out of range '+999999999999'".to_string())
        );
        assert!(parse_due_input("+300000000", today).is_err());
        assert!(parse_due_input("2025-02-30", today).is_err());
        assert!(parse_due_input("03/01/2025", today).is_err());
    }

    #[test]
    fn test_display_due_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(display_due_date(date), "Mar 01, 2025");
    }
}
