//! Conversion between wall-clock (seconds, microseconds) pairs and the 64-bit
//! milliseconds-since-epoch representation the DATE_TIME element stores on the wire.

use crate::bson::error::BsonError;

/// Converts a `(seconds, microseconds)` pair into milliseconds since the Unix epoch.
///
/// The microsecond remainder is truncated, matching the original source's
/// `(tv_sec * 1000) + (tv_usec / 1000)`. Returns `BsonError::OutOfRange` if the result overflows
/// an `i64`.
pub fn ms_from_wall_clock(sec: i64, usec: i64) -> Result<i64, BsonError> {
    sec.checked_mul(1000)
        .and_then(|ms| ms.checked_add(usec / 1000))
        .ok_or_else(|| BsonError::OutOfRange {
            message: format!("sec={sec}, usec={usec} overflows ms-since-epoch"),
        })
}

/// Converts milliseconds since the Unix epoch back into a `(seconds, microseconds)` pair.
///
/// Uses Euclidean division so that millisecond values before the epoch (negative `ms`) still
/// produce a `usec` in `[0, 999_999]`, rather than the original source's `ms % 1000`, which
/// stored *milliseconds* into the microsecond field (see `BsonError`/`§9` design notes: this is a
/// deliberate correction of a source bug, not an open question).
pub fn wall_clock_from_ms(ms: i64) -> (i64, i64) {
    let sec = ms.div_euclid(1000);
    let usec = ms.rem_euclid(1000) * 1000;
    (sec, usec)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_test4_fixture() {
        // 2011-10-22T12:13:14.123Z
        let ms = ms_from_wall_clock(1_319_285_594, 123_000).unwrap();
        assert_eq!(ms, 1_319_285_594_123);

        let (sec, usec) = wall_clock_from_ms(ms);
        assert_eq!(sec, 1_319_285_594);
        assert_eq!(usec, 123_000);
    }

    #[test]
    fn truncates_microsecond_remainder_below_a_millisecond() {
        assert_eq!(ms_from_wall_clock(0, 999).unwrap(), 0);
        assert_eq!(ms_from_wall_clock(1, 1_999).unwrap(), 1001);
    }

    #[test]
    fn negative_milliseconds_still_yield_nonnegative_usec() {
        let (sec, usec) = wall_clock_from_ms(-1);
        assert_eq!(sec, -1);
        assert_eq!(usec, 999_000);
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        let err = ms_from_wall_clock(i64::MAX, 0).unwrap_err();
        assert!(matches!(err, BsonError::OutOfRange { .. }));
    }
}
