//! meos-bindgen: a generator for safe Rust wrappers over the MEOS C
//! library.
//!
//! The pipeline is a synchronous batch transformation: header text goes
//! through the declaration scanner, each declaration through generic
//! assembly (conversion registry + role classifier + function model), and
//! the named irregular cases through the override/modifier pass. The
//! consistency checker runs once per pass over the curated configuration
//! and reports drift without blocking generation.
//!
//! ```no_run
//! let header = std::fs::read_to_string("meos.h")?;
//! let module = meos_bindgen::generate_bindings(&header)?;
//! std::fs::write("functions.rs", &module.source)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub use meos_bindgen_codegen::{GeneratedModule, Generator, Modifier, Overrides, Visibility};
pub use meos_bindgen_core::{ConfigError, ConsistencyWarning, CuratedTables, Declaration};
pub use meos_bindgen_parser::{ParseError, parse_header};
pub use meos_bindgen_registry::ConversionRegistry;

/// A failure in the generation pipeline. Configuration drift is not an
/// error; these are the malformed-input and malformed-configuration cases.
#[derive(Error, Debug)]
pub enum BindgenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Run the full pipeline with the standard MEOS configuration.
pub fn generate_bindings(header_source: &str) -> Result<GeneratedModule, BindgenError> {
    let declarations = parse_header(header_source)?;
    let generator = Generator::standard()?;
    Ok(generator.generate(&declarations))
}
