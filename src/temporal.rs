//! Calendar ↔ integer conversions for date and timestamp fields.
//!
//! Dates are stored as days since 1970-01-01, timestamps as microseconds
//! since 1970-01-01T00:00:00 (no time zone).
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const UNIX_EPOCH_DAY_CE: i32 = 719_163;

#[inline]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAY_CE
}

#[inline]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAY_CE)?)
}

#[inline]
pub fn timestamp_to_micros(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

#[inline]
pub fn micros_to_timestamp(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Option<i32> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(date_to_days)
}

/// `YYYY-MM-DDTHH:MM:SS[.fraction]`, a space is accepted in place of `T`.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(timestamp_to_micros)
}

pub fn format_date(days: i32) -> Option<String> {
    days_to_date(days).map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn format_timestamp(micros: i64) -> Option<String> {
    micros_to_timestamp(micros).map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_day_zero() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        assert_eq!(days_to_date(0), Some(epoch));
        assert_eq!(date_to_days(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }

    #[test]
    fn date_round_trip() {
        let d = NaiveDate::from_ymd_opt(2015, 5, 8).unwrap();
        let days = date_to_days(d);
        assert_eq!(days, 16563);
        let back = days_to_date(days).unwrap();
        assert_eq!((back.year(), back.month(), back.day()), (2015, 5, 8));
    }

    #[test]
    fn timestamp_round_trip() {
        let ts = NaiveDate::from_ymd_opt(2015, 5, 8)
            .unwrap()
            .and_hms_opt(8, 10, 25)
            .unwrap();
        let micros = timestamp_to_micros(ts);
        assert_eq!(micros, 1_431_072_625_000_000);
        assert_eq!(micros_to_timestamp(micros), Some(ts));
    }

    #[test]
    fn parse_and_format() {
        assert_eq!(parse_date("1970-01-02"), Some(1));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_timestamp("1970-01-01T00:00:01.5"), Some(1_500_000));
        assert_eq!(parse_timestamp("1970-01-01 00:00:01"), Some(1_000_000));
        assert_eq!(format_date(1).as_deref(), Some("1970-01-02"));
        assert_eq!(format_timestamp(1_500_000).as_deref(), Some("1970-01-01T00:00:01.500000"));
    }
}
