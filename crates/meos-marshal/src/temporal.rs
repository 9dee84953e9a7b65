//! Conversions between MEOS temporal values and `chrono` types.
//!
//! MEOS inherits PostgreSQL's representations: timestamps are microseconds
//! since 2000-01-01, dates are days since 2000-01-01, and intervals keep
//! months, days and sub-day microseconds in separate fields. The functions
//! here are the bodies behind the registry's to-native / to-host expression
//! builders, so each pair must round-trip exactly.

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};

use crate::ffi::{DateADT, Interval, TimestampTz};

/// Microseconds between the Unix epoch and the PostgreSQL epoch (2000-01-01).
const PG_EPOCH_MICROS: i64 = 946_684_800_000_000;

const MICROS_PER_DAY: i64 = 86_400_000_000;

fn pg_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("PostgreSQL epoch is a valid date")
}

/// Convert a UTC datetime to a native `TimestampTz`.
pub fn datetime_to_timestamptz(dt: DateTime<Utc>) -> TimestampTz {
    dt.timestamp_micros() - PG_EPOCH_MICROS
}

/// Convert a native `TimestampTz` back to a UTC datetime.
///
/// # Panics
///
/// Panics if the value is outside chrono's representable range. MEOS shares
/// PostgreSQL's timestamp range (years 4713 BC to 294276 AD), which a
/// well-behaved native call never leaves.
pub fn timestamptz_to_datetime(ts: TimestampTz) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ts + PG_EPOCH_MICROS)
        .expect("TimestampTz outside representable datetime range")
}

/// Convert a calendar date to a native `DateADT`.
pub fn date_to_date_adt(date: NaiveDate) -> DateADT {
    (date - pg_epoch_date()).num_days() as DateADT
}

/// Convert a native `DateADT` back to a calendar date.
///
/// # Panics
///
/// Panics if the value is outside chrono's representable range; see
/// [`timestamptz_to_datetime`].
pub fn date_adt_to_date(days: DateADT) -> NaiveDate {
    let epoch = pg_epoch_date();
    if days >= 0 {
        epoch
            .checked_add_days(Days::new(days as u64))
            .expect("DateADT outside representable date range")
    } else {
        epoch
            .checked_sub_days(Days::new(days.unsigned_abs() as u64))
            .expect("DateADT outside representable date range")
    }
}

/// Convert a duration to a native `Interval`.
///
/// Durations carry no calendar months, so the month field is always zero;
/// whole days split off into the day field and the remainder lands in the
/// microsecond field, matching how PostgreSQL normalizes intervals.
pub fn timedelta_to_interval(delta: TimeDelta) -> Interval {
    let total_micros = delta.num_microseconds().unwrap_or(i64::MAX);
    let day = total_micros.div_euclid(MICROS_PER_DAY);
    let time = total_micros.rem_euclid(MICROS_PER_DAY);
    Interval {
        time,
        day: day as i32,
        month: 0,
    }
}

/// Convert a native `Interval` back to a duration.
///
/// Months are flattened at thirty days, the same fixed factor PostgreSQL
/// uses when forced to compare intervals as durations.
pub fn interval_to_timedelta(interval: &Interval) -> TimeDelta {
    let days = interval.day as i64 + interval.month as i64 * 30;
    TimeDelta::microseconds(days * MICROS_PER_DAY + interval.time)
}
