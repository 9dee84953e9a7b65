//! The shared error-state primitive consumed by generated wrappers.
//!
//! MEOS reports failures through a registered error handler rather than
//! return values. [`report_error`] is that handler's host-side body: it
//! deposits the error in thread-local state. Every generated wrapper calls
//! [`check_error`] immediately after its native call; a deposited error
//! becomes an `Err` propagated with `?`, never a silent return value.

use std::cell::RefCell;
use std::ffi::NulError;
use std::str::Utf8Error;
use thiserror::Error;

pub type MeosResult<T> = Result<T, MeosError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeosError {
    /// An error deposited by the native library's error handler.
    #[error("MEOS error {code}: {message}")]
    Native { code: i32, message: String },

    /// A host string contained an interior NUL and cannot cross the boundary.
    #[error("string conversion error: {0}")]
    StringConversion(#[from] NulError),

    /// A native string was not valid UTF-8.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Conversion(#[from] Utf8Error),
}

thread_local! {
    static LAST_ERROR: RefCell<Option<(i32, String)>> = const { RefCell::new(None) };
}

/// Deposit an error from the native error handler.
///
/// Matches the `(level, code, message)` shape of the MEOS error callback.
/// Informational levels (`level <= 0`) are ignored; anything else replaces
/// the pending error for this thread.
pub fn report_error(level: i32, code: i32, message: &str) {
    if level <= 0 {
        return;
    }
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = Some((code, message.to_owned()));
    });
}

/// Take and surface the pending native error, if any.
///
/// Clears the state either way, so one native failure maps to exactly one
/// host-level failure.
pub fn check_error() -> MeosResult<()> {
    LAST_ERROR.with(|slot| match slot.borrow_mut().take() {
        Some((code, message)) => Err(MeosError::Native { code, message }),
        None => Ok(()),
    })
}

/// Drop any pending error without surfacing it.
pub fn clear_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}
