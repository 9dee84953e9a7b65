//! Wrapper-function assembly for meos-bindgen.
//!
//! This crate turns classified declarations into wrapper source text:
//! - [`types`]: per-parameter resolved type descriptors
//! - [`parameter`]: declaration/conversion/out-conversion fragments
//! - [`function`]: whole-function assembly and rendering
//! - [`overrides`] / [`modifier`]: the escape hatches for the irregular tail
//! - [`generator`]: the pipeline tying it together over a declaration feed

pub mod function;
pub mod generator;
pub mod modifier;
pub mod overrides;
pub mod parameter;
pub mod types;

pub use function::{Function, Visibility};
pub use generator::{GeneratedModule, Generator};
pub use modifier::{Modifier, standard_modifiers};
pub use overrides::Overrides;
pub use parameter::Parameter;
pub use types::ResolvedType;
