//! Unix-epoch conversions for date values crossing the host boundary.
//!
//! Dates travel as whole seconds since 1970-01-01T00:00:00. Inbound values
//! at or before the epoch, or past `i32::MAX` seconds, clamp to the epoch.

use chrono::{DateTime, NaiveDateTime};

/// 1970-01-01T00:00:00.
pub fn epoch() -> NaiveDateTime {
    DateTime::UNIX_EPOCH.naive_utc()
}

/// Seconds since the epoch, sub-second precision dropped.
pub fn to_epoch_seconds(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp()
}

/// Date value for `seconds` since the epoch, clamped as described above.
pub fn from_epoch_seconds(seconds: i64) -> NaiveDateTime {
    if seconds <= 0 || seconds > i64::from(i32::MAX) {
        return epoch();
    }
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_else(epoch)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn round_trip_inside_range() {
        for value in [
            date(1970, 1, 1, 0, 0, 1),
            date(2001, 9, 9, 1, 46, 40),
            date(2024, 2, 29, 23, 59, 59),
            date(2038, 1, 19, 3, 14, 7),
        ] {
            assert_eq!(from_epoch_seconds(to_epoch_seconds(value)), value);
        }
    }

    #[test]
    fn known_value() {
        assert_eq!(to_epoch_seconds(date(2001, 9, 9, 1, 46, 40)), 1_000_000_000);
    }

    #[test]
    fn out_of_range_clamps_to_epoch() {
        assert_eq!(from_epoch_seconds(0), epoch());
        assert_eq!(from_epoch_seconds(-86_400), epoch());
        assert_eq!(from_epoch_seconds(i64::from(i32::MAX) + 1), epoch());
        assert_eq!(to_epoch_seconds(epoch()), 0);
    }

    #[test]
    fn upper_limit_is_inclusive() {
        let max = i64::from(i32::MAX);
        assert_eq!(to_epoch_seconds(from_epoch_seconds(max)), max);
    }
}
