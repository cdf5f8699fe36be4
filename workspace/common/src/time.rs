//! Calendar and epoch-second conversions.
//!
//! Every timestamp that crosses the network boundary is a UTC epoch-second
//! integer. Two distinct anchoring rules exist and callers must pick the one
//! they mean:
//!
//! * the `local_*` and `*_range` functions take a zoned [`DateTime`], read the
//!   calendar day the user sees in that zone, and return UTC midnight (or
//!   23:59:59) of that same calendar day;
//! * [`utc_iso_date_to_epoch_seconds`] reads a `YYYY-MM-DD` string as UTC
//!   midnight directly, without any zone.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds since the Unix epoch, UTC.
pub type EpochSeconds = i64;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Offset of 23:59:59 from the start of the same day.
pub const END_OF_DAY_OFFSET: i64 = SECONDS_PER_DAY - 1;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Timestamp out of range: {0}")]
    OutOfRange(EpochSeconds),
}

/// Inclusive UTC window used for `start_date`/`end_date` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtcRange {
    pub start: EpochSeconds,
    pub end: EpochSeconds,
}

impl UtcRange {
    pub fn new(start: EpochSeconds, end: EpochSeconds) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: EpochSeconds) -> bool {
        at >= self.start && at <= self.end
    }

    /// Number of calendar days covered, counting partial days as whole ones.
    pub fn day_count(&self) -> i64 {
        (days_between(self.start, self.end) + 1).max(1)
    }
}

fn start_of_day(date: NaiveDate) -> EpochSeconds {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// UTC start and end of one calendar day.
pub fn calendar_day_range(date: NaiveDate) -> UtcRange {
    let start = start_of_day(date);
    UtcRange::new(start, start + END_OF_DAY_OFFSET)
}

/// UTC range of the calendar day `local` falls on in its own timezone.
pub fn local_calendar_day_to_utc_range<Tz: TimeZone>(local: &DateTime<Tz>) -> UtcRange {
    calendar_day_range(local.date_naive())
}

pub fn local_date_to_utc_start_of_day_seconds<Tz: TimeZone>(local: &DateTime<Tz>) -> EpochSeconds {
    local_calendar_day_to_utc_range(local).start
}

/// 23:59:59.999 of the local calendar day, floored to whole seconds.
pub fn local_date_to_utc_end_of_day_seconds<Tz: TimeZone>(local: &DateTime<Tz>) -> EpochSeconds {
    local_calendar_day_to_utc_range(local).end
}

/// Start of the first day to end of the last day, both read as calendar dates.
pub fn date_range_to_utc_range(start: NaiveDate, end: NaiveDate) -> UtcRange {
    UtcRange::new(calendar_day_range(start).start, calendar_day_range(end).end)
}

/// Both bounds read as UTC midnight, matching [`utc_iso_date_to_epoch_seconds`].
pub fn iso_date_range_to_utc_range(start: &str, end: &str) -> Result<UtcRange, TimeError> {
    Ok(UtcRange::new(
        utc_iso_date_to_epoch_seconds(start)?,
        utc_iso_date_to_epoch_seconds(end)?,
    ))
}

pub fn parse_iso_date(iso_date: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(iso_date.trim(), ISO_DATE_FORMAT)
        .map_err(|_| TimeError::InvalidDate(iso_date.to_string()))
}

/// Reads `YYYY-MM-DD` as UTC midnight, with no timezone shift.
pub fn utc_iso_date_to_epoch_seconds(iso_date: &str) -> Result<EpochSeconds, TimeError> {
    parse_iso_date(iso_date).map(start_of_day)
}

pub fn epoch_seconds_to_utc(epoch: EpochSeconds) -> Result<DateTime<Utc>, TimeError> {
    DateTime::from_timestamp(epoch, 0).ok_or(TimeError::OutOfRange(epoch))
}

pub fn epoch_seconds_to_utc_iso_date(epoch: EpochSeconds) -> Result<String, TimeError> {
    epoch_seconds_to_utc(epoch).map(|dt| dt.format(ISO_DATE_FORMAT).to_string())
}

pub fn format_local_yyyy_mm_dd<Tz: TimeZone>(local: &DateTime<Tz>) -> String {
    local.date_naive().format(ISO_DATE_FORMAT).to_string()
}

/// Parses either epoch seconds (number or numeric string) or an ISO date/time.
///
/// Numeric-looking input is always epoch seconds, never a year. ISO strings
/// without an offset are read as UTC.
pub fn parse_flexible_timestamp(value: &str) -> Result<DateTime<Utc>, TimeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimeError::InvalidTimestamp(value.to_string()));
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return seconds_to_utc(seconds).ok_or_else(|| TimeError::InvalidTimestamp(value.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| TimeError::InvalidTimestamp(value.to_string()))
}

fn seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date) + Months::new(1) - Duration::days(1)
}

/// Monday of the ISO week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the ISO week containing `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

pub fn first_day_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

pub fn last_day_of_year(date: NaiveDate) -> NaiveDate {
    first_day_of_year(date) + Months::new(12) - Duration::days(1)
}

pub fn month_range<Tz: TimeZone>(local: &DateTime<Tz>) -> UtcRange {
    let date = local.date_naive();
    date_range_to_utc_range(first_day_of_month(date), last_day_of_month(date))
}

pub fn week_range<Tz: TimeZone>(local: &DateTime<Tz>) -> UtcRange {
    let date = local.date_naive();
    date_range_to_utc_range(start_of_week(date), end_of_week(date))
}

pub fn year_range<Tz: TimeZone>(local: &DateTime<Tz>) -> UtcRange {
    let date = local.date_naive();
    date_range_to_utc_range(first_day_of_year(date), last_day_of_year(date))
}

pub fn now_epoch_seconds() -> EpochSeconds {
    Utc::now().timestamp()
}

pub fn add_days(epoch: EpochSeconds, days: i64) -> EpochSeconds {
    epoch + days * SECONDS_PER_DAY
}

/// Whole days from `start` to `end`, rounded towards negative infinity.
pub fn days_between(start: EpochSeconds, end: EpochSeconds) -> i64 {
    (end - start).div_euclid(SECONDS_PER_DAY)
}

/// Serde adapter accepting an epoch-second number, a numeric string or an
/// ISO date/time string. Malformed values fail deserialization.
pub mod flexible_seconds {
    use super::{EpochSeconds, parse_flexible_timestamp};
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct FlexibleSecondsVisitor;

    impl<'de> Visitor<'de> for FlexibleSecondsVisitor {
        type Value = EpochSeconds;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("epoch seconds or an ISO date/time string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("timestamp out of range: {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() {
                Ok(v.floor() as i64)
            } else {
                Err(E::custom("timestamp is not a finite number"))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse_flexible_timestamp(v)
                .map(|dt| dt.timestamp())
                .map_err(E::custom)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<EpochSeconds, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexibleSecondsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn zone(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn test_day_boundaries_are_86399_apart_in_any_zone() {
        for hours in [-11, -5, 0, 7, 9, 14] {
            for (y, m, d, h) in [(2025, 1, 1, 0), (2025, 3, 15, 23), (2024, 2, 29, 12), (2025, 12, 31, 5)] {
                let local = zone(hours).with_ymd_and_hms(y, m, d, h, 30, 0).unwrap();
                let start = local_date_to_utc_start_of_day_seconds(&local);
                let end = local_date_to_utc_end_of_day_seconds(&local);
                assert_eq!(end - start, 86_399, "zone {} date {}-{}-{}", hours, y, m, d);
            }
        }
    }

    #[test]
    fn test_local_calendar_day_is_the_one_the_user_sees() {
        // 2025-03-15 23:30 in UTC+7 is 16:30 UTC the same day, but 01:00 on
        // the 16th in UTC+9 is still the 15th in UTC.
        let hanoi = zone(7).with_ymd_and_hms(2025, 3, 15, 23, 30, 0).unwrap();
        let tokyo = zone(9).with_ymd_and_hms(2025, 3, 16, 1, 0, 0).unwrap();

        assert_eq!(
            local_calendar_day_to_utc_range(&hanoi),
            calendar_day_range(ymd(2025, 3, 15))
        );
        assert_eq!(
            local_calendar_day_to_utc_range(&tokyo),
            calendar_day_range(ymd(2025, 3, 16))
        );
        assert_eq!(local_date_to_utc_start_of_day_seconds(&tokyo), 1_742_083_200);
    }

    #[test]
    fn test_iso_round_trip() {
        let epoch = utc_iso_date_to_epoch_seconds("2025-03-15").unwrap();
        assert_eq!(epoch, 1_741_996_800);
        assert_eq!(epoch_seconds_to_utc_iso_date(epoch).unwrap(), "2025-03-15");
    }

    #[test]
    fn test_iso_date_rejects_garbage() {
        assert!(matches!(
            utc_iso_date_to_epoch_seconds("2025-13-01"),
            Err(TimeError::InvalidDate(_))
        ));
        assert!(utc_iso_date_to_epoch_seconds("yesterday").is_err());
        assert!(iso_date_range_to_utc_range("2025-01-01", "nope").is_err());
    }

    #[test]
    fn test_parse_flexible_timestamp_numeric_is_always_seconds() {
        let from_str = parse_flexible_timestamp("1757339265").unwrap();
        assert_eq!(from_str.timestamp(), 1_757_339_265);

        // A year-looking number is still seconds after the epoch.
        let year_like = parse_flexible_timestamp("2025").unwrap();
        assert_eq!(year_like.timestamp(), 2025);

        let fractional = parse_flexible_timestamp(" 1.5 ").unwrap();
        assert_eq!(fractional.timestamp_millis(), 1500);
    }

    #[test]
    fn test_parse_flexible_timestamp_iso_forms() {
        let rfc = parse_flexible_timestamp("2025-09-08T14:07:45+07:00").unwrap();
        assert_eq!(rfc.timestamp(), 1_757_315_265);

        let naive = parse_flexible_timestamp("2025-09-08T07:07:45").unwrap();
        assert_eq!(naive.timestamp(), 1_757_315_265);

        let date_only = parse_flexible_timestamp("2025-03-15").unwrap();
        assert_eq!(date_only.timestamp(), 1_741_996_800);
    }

    #[test]
    fn test_parse_flexible_timestamp_rejects_malformed() {
        for bad in ["", "   ", "not a date", "NaN", "inf", "2025-02-30"] {
            assert!(parse_flexible_timestamp(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(first_day_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 1));
        assert_eq!(last_day_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 29));
        assert_eq!(last_day_of_month(ymd(2025, 2, 1)), ymd(2025, 2, 28));
        assert_eq!(last_day_of_month(ymd(2025, 12, 31)), ymd(2025, 12, 31));
    }

    #[test]
    fn test_week_is_monday_anchored() {
        // 2025-03-16 is a Sunday.
        assert_eq!(start_of_week(ymd(2025, 3, 16)), ymd(2025, 3, 10));
        assert_eq!(end_of_week(ymd(2025, 3, 16)), ymd(2025, 3, 16));
        assert_eq!(start_of_week(ymd(2025, 3, 10)), ymd(2025, 3, 10));
        assert_eq!(end_of_week(ymd(2025, 3, 12)), ymd(2025, 3, 16));
    }

    #[test]
    fn test_month_and_year_ranges_follow_local_day() {
        let local = zone(7).with_ymd_and_hms(2025, 3, 1, 0, 15, 0).unwrap();

        let month = month_range(&local);
        assert_eq!(month.start, utc_iso_date_to_epoch_seconds("2025-03-01").unwrap());
        assert_eq!(month.end, utc_iso_date_to_epoch_seconds("2025-03-31").unwrap() + END_OF_DAY_OFFSET);

        let year = year_range(&local);
        assert_eq!(year.start, utc_iso_date_to_epoch_seconds("2025-01-01").unwrap());
        assert_eq!(year.end, utc_iso_date_to_epoch_seconds("2025-12-31").unwrap() + END_OF_DAY_OFFSET);
        assert_eq!(year.day_count(), 365);
    }

    #[test]
    fn test_day_arithmetic() {
        let start = utc_iso_date_to_epoch_seconds("2025-03-01").unwrap();
        assert_eq!(add_days(start, 14), utc_iso_date_to_epoch_seconds("2025-03-15").unwrap());
        assert_eq!(days_between(start, start + END_OF_DAY_OFFSET), 0);
        assert_eq!(days_between(start, add_days(start, 3)), 3);
        assert_eq!(days_between(add_days(start, 1), start + 1), -1);
    }

    #[test]
    fn test_flexible_seconds_deserializer() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "flexible_seconds::deserialize")]
            at: EpochSeconds,
        }

        let numeric: Row = serde_json::from_str(r#"{"at": 1757339265}"#).unwrap();
        assert_eq!(numeric.at, 1_757_339_265);

        let text: Row = serde_json::from_str(r#"{"at": "1757339265"}"#).unwrap();
        assert_eq!(text.at, 1_757_339_265);

        let iso: Row = serde_json::from_str(r#"{"at": "2025-03-15"}"#).unwrap();
        assert_eq!(iso.at, 1_741_996_800);

        assert!(serde_json::from_str::<Row>(r#"{"at": "soon"}"#).is_err());
    }
}
