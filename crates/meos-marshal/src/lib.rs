//! Runtime marshalling support for generated MEOS wrappers.
//!
//! The generated wrapper module leans on this crate for everything that is
//! not a straight cast:
//! - [`check_error`] / [`report_error`]: the shared error-state primitive
//!   every wrapper invokes right after its native call
//! - temporal conversions between MEOS's PostgreSQL-derived on-wire types
//!   (`TimestampTz`, `DateADT`, `Interval`) and `chrono` values
//! - [`InterpolationType`]: the host-side view of the native `interpType`
//!
//! The [`ffi`] module mirrors the handful of ABI type definitions these
//! helpers touch; the full extern surface lives in the generated crate.

pub mod error;
pub mod ffi;
pub mod interp;
pub mod temporal;

pub use error::{MeosError, MeosResult, check_error, clear_error, report_error};
pub use interp::InterpolationType;
pub use temporal::{
    date_adt_to_date, date_to_date_adt, datetime_to_timestamptz, interval_to_timedelta,
    timedelta_to_interval, timestamptz_to_datetime,
};
