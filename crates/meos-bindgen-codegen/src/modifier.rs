//! Structured post-processing transforms for named functions.
//!
//! A modifier is a mechanical rewrite applied to the assembled [`Function`]
//! model before rendering, for the closed set of signature deviations the
//! generic rules cannot express: a `(pointer, length)` pair collapsing into
//! one slice parameter, a single-pointer parameter that is semantically an
//! array, a byte buffer returned through a size output, or a function that
//! must not run the error check.

use rustc_hash::FxHashMap;

use meos_bindgen_registry::{ConversionRegistry, RoleFlags};

use crate::function::Function;
use crate::types::{ResolvedType, native_rust_spelling};

/// One mechanical transform keyed by function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// Remove the `check_error()?;` statement.
    StripErrorCheck,
    /// Replace the declared `length` input with `array.len()`.
    CollapseArrayLength { array: String, length: String },
    /// Reclassify a single-pointer parameter as an array of its base type,
    /// collapsing the paired length if one is named.
    PromoteToArray {
        param: String,
        length: Option<String>,
    },
    /// Collapse a `(byte pointer return, size output)` pair into `Vec<u8>`.
    ByteBufferResult { length: String },
}

impl Modifier {
    /// Apply this transform to an assembled function.
    pub fn apply(&self, function: &mut Function, registry: &ConversionRegistry) {
        match self {
            Modifier::StripErrorCheck => {
                function.error_check = false;
            }
            Modifier::CollapseArrayLength { array, length } => {
                collapse_length(function, array, length);
            }
            Modifier::PromoteToArray { param, length } => {
                if let Some(parameter) = function.parameter_mut(param) {
                    let mut flags = RoleFlags::ARRAY;
                    if parameter.nullable {
                        flags |= RoleFlags::NULLABLE;
                    }
                    let spelling = parameter.ty.c_spelling.clone();
                    parameter.ty = ResolvedType::resolve(registry, flags, &spelling);
                }
                if let Some(length) = length {
                    collapse_length(function, param, length);
                }
            }
            Modifier::ByteBufferResult { length } => {
                function.byte_buffer_result = Some(length.clone());
            }
        }
    }
}

fn collapse_length(function: &mut Function, array: &str, length: &str) {
    if let Some(parameter) = function.parameter_mut(length) {
        let cast = native_rust_spelling(&parameter.ty.c_spelling);
        parameter.synthesized = Some(format!("{array}.len() as {cast}"));
    }
}

/// The modifier table for the MEOS API surface.
pub fn standard_modifiers() -> FxHashMap<String, Modifier> {
    let mut modifiers = FxHashMap::default();

    // Finalization tears the error handler down with it.
    modifiers.insert("meos_finalize".to_owned(), Modifier::StripErrorCheck);

    // Set constructors taking a single-pointer buffer plus a count.
    for function in [
        "intset_make",
        "bigintset_make",
        "floatset_make",
        "tstzset_make",
        "dateset_make",
        "textset_make",
        "spanset_make",
    ] {
        let param = if function == "spanset_make" {
            "spans"
        } else {
            "values"
        };
        modifiers.insert(
            function.to_owned(),
            Modifier::PromoteToArray {
                param: param.to_owned(),
                length: Some("count".to_owned()),
            },
        );
    }

    // Already arrays by spelling; only the explicit length collapses.
    modifiers.insert(
        "geoset_make".to_owned(),
        Modifier::CollapseArrayLength {
            array: "values".to_owned(),
            length: "count".to_owned(),
        },
    );
    modifiers.insert(
        "tsequenceset_make_gaps".to_owned(),
        Modifier::CollapseArrayLength {
            array: "instants".to_owned(),
            length: "count".to_owned(),
        },
    );

    // WKB serializers return a malloc'd byte pointer plus its size.
    for function in [
        "temporal_as_wkb",
        "set_as_wkb",
        "span_as_wkb",
        "spanset_as_wkb",
        "tbox_as_wkb",
        "stbox_as_wkb",
    ] {
        modifiers.insert(
            function.to_owned(),
            Modifier::ByteBufferResult {
                length: "size_out".to_owned(),
            },
        );
    }

    modifiers
}
