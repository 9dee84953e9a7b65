//! Header declaration feed for meos-bindgen.
//!
//! Turns preprocessed C header text into the ordered sequence of
//! [`Declaration`](meos_bindgen_core::Declaration) triples the generator
//! consumes. Only `extern` function declarations are extracted; typedefs,
//! struct definitions, comments and preprocessor residue are skipped.

pub mod header;

pub use header::{ParseError, ParseErrorKind, parse_header};
