//! Host-side view of the native `interpType` enumeration.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Interpolation behavior of a temporal value, matching the native
/// `interpType` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum InterpolationType {
    None = 0,
    Discrete = 1,
    Step = 2,
    Linear = 3,
}
