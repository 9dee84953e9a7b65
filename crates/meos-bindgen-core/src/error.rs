//! Configuration errors raised before generation starts.

use thiserror::Error;

/// A defect in the curated configuration.
///
/// Unlike consistency warnings, these are hard errors: generation with an
/// ambiguous or malformed configuration would silently produce wrong
/// wrappers, so the load step refuses instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A `(function, parameter)` pair is curated under more than one role.
    #[error("parameter {parameter} of {function} is curated as both {first} and {second}")]
    RoleOverlap {
        function: String,
        parameter: String,
        first: &'static str,
        second: &'static str,
    },

    /// An override's replacement text does not define the function it is
    /// keyed by.
    #[error("override for {function} does not define `fn {function}`")]
    InvalidOverride { function: String },
}
