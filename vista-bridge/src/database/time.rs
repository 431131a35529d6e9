//! Timestamp helpers for the database layer.
//!
//! Timestamps are stored as `INTEGER` Unix epoch milliseconds (UTC).

use chrono::{DateTime, TimeZone, Utc};

/// Current time as Unix epoch milliseconds (UTC).
#[inline]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix epoch milliseconds to `DateTime<Utc>`, clamping out-of-range values.
pub fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ms) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None if ms.is_negative() => DateTime::<Utc>::MIN_UTC,
        chrono::LocalResult::None => DateTime::<Utc>::MAX_UTC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_round_trip_through_datetime() {
        let now = now_ms();
        assert_eq!(ms_to_datetime(now).timestamp_millis(), now);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(ms_to_datetime(i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(ms_to_datetime(i64::MIN), DateTime::<Utc>::MIN_UTC);
    }
}
