//! ABI mirrors of the MEOS type definitions the marshalling helpers touch.
//!
//! These match the typedefs in `meos.h`. Only the types that flow through a
//! conversion helper are mirrored here; opaque handles (`Temporal`, `Span`,
//! ...) never cross as values and stay behind raw pointers in the generated
//! code.

/// Microseconds since the PostgreSQL epoch (2000-01-01), no timezone.
pub type Timestamp = i64;

/// Microseconds since the PostgreSQL epoch (2000-01-01), UTC.
pub type TimestampTz = i64;

/// Days since the PostgreSQL epoch (2000-01-01).
pub type DateADT = i32;

pub type TimeOffset = i64;

/// PostgreSQL interval: sub-day time in microseconds plus separate day and
/// month counters. Months are kept distinct because their length in days is
/// calendar-dependent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interval {
    pub time: TimeOffset,
    pub day: i32,
    pub month: i32,
}
