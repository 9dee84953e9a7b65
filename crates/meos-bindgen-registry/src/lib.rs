//! Type-conversion registry and role classifier for meos-bindgen.
//!
//! The registry maps C type spellings to host Rust types and the expression
//! templates converting between them; the classifier decides each
//! parameter's semantic role (nullable, result, output, array) from curated
//! tables plus structural heuristics. Both are populated once and read-only
//! during generation.

pub mod conversion;
pub mod registry;
pub mod roles;

pub use conversion::{ArgMode, Conversion};
pub use registry::ConversionRegistry;
pub use roles::{RoleFlags, classify};
