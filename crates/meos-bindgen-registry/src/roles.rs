//! Semantic role classification for parameters.
//!
//! Roles come from two places: curated `(function, parameter)` tables for
//! the semantic properties no spelling can reveal, and structural
//! heuristics for the conventions the native API follows almost everywhere
//! (a parameter literally named `result`, an `_out` suffix, a pointer-typed
//! `count`, a double-pointer array).

use bitflags::bitflags;
use meos_bindgen_core::CuratedTables;

/// Suffix marking hidden output buffers by convention.
const OUTPUT_SUFFIX: &str = "_out";

bitflags! {
    /// Independent role bits for one parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoleFlags: u8 {
        /// A host-side absent value maps to the native null sentinel.
        const NULLABLE = 1 << 0;
        /// Carries the function's primary value out through a pointer.
        const RESULT = 1 << 1;
        /// A secondary out-slot surfaced in the composite return tuple.
        const OUTPUT = 1 << 2;
        /// A sequence, not a scalar pointer.
        const ARRAY = 1 << 3;
    }
}

impl RoleFlags {
    /// Declared in the wrapper signature: neither result nor output.
    pub fn is_input(self) -> bool {
        !self.intersects(RoleFlags::RESULT | RoleFlags::OUTPUT)
    }
}

/// Classify one parameter of one function.
pub fn classify(
    tables: &CuratedTables,
    function: &str,
    parameter: &str,
    native_type: &str,
) -> RoleFlags {
    let mut flags = RoleFlags::empty();

    if tables.is_nullable(function, parameter) {
        flags |= RoleFlags::NULLABLE;
    }

    if parameter == "result" || tables.is_result(function, parameter) {
        flags |= RoleFlags::RESULT;
    }

    if parameter.ends_with(OUTPUT_SUFFIX)
        || (parameter == "count" && native_type.ends_with('*'))
        || tables.is_output(function, parameter)
    {
        flags |= RoleFlags::OUTPUT;
    }

    if native_type.ends_with("**")
        || native_type.ends_with("[]")
        || tables.is_array(function, parameter)
    {
        flags |= RoleFlags::ARRAY;
    }

    flags
}
