//! Per-parameter resolved type descriptors.
//!
//! A [`ResolvedType`] combines a raw C spelling with the parameter's role
//! classification: array-ness reclassifies the spelling (one pointer level
//! is the array's own memory), output/result roles resolve against the
//! dereferenced slot spelling, and anything the registry does not know
//! degrades to an opaque raw-pointer passthrough instead of failing.

use meos_bindgen_registry::{ArgMode, Conversion, ConversionRegistry, RoleFlags};

/// Host spellings that cross the boundary as plain numbers.
const NUMERIC_HOST_TYPES: [&str; 11] = [
    "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "usize",
];

/// A fully resolved parameter or return type.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// The spelling as declared in the header.
    pub c_spelling: String,
    /// The spelling conversions were resolved against (array element or
    /// output slot: one pointer level fewer than `c_spelling`).
    pub native_type: String,
    /// Host spelling of the scalar or element value.
    pub host_type: String,
    /// Scalar pointer (arrays excluded by definition).
    pub is_pointer: bool,
    pub is_array: bool,
    /// No conversion boilerplate needed: identity or a plain number.
    pub is_interoperable: bool,
    pub conversion: Option<Conversion>,
}

impl ResolvedType {
    /// Resolve a raw spelling under the given role classification.
    pub fn resolve(registry: &ConversionRegistry, flags: RoleFlags, spelling: &str) -> Self {
        let c_spelling = spelling.trim().to_owned();
        let is_array = flags.contains(RoleFlags::ARRAY);
        let is_slot = flags.intersects(RoleFlags::RESULT | RoleFlags::OUTPUT);

        // Arrays: the outer pointer is the array's own memory. Slots: the
        // outer pointer is the scratch indirection. Either way conversions
        // resolve one level down.
        let mut native_type = c_spelling.clone();
        if is_array {
            native_type = strip_array_level(&native_type);
        } else if is_slot {
            native_type = strip_pointer(&native_type);
        }

        let conversion = registry.lookup(&native_type).cloned();
        let host_type = match &conversion {
            Some(conversion) => conversion.host_type.clone(),
            None => native_rust_spelling(&native_type),
        };

        let is_interoperable = conversion.is_none()
            || host_type == native_type
            || NUMERIC_HOST_TYPES.contains(&host_type.as_str());

        Self {
            is_pointer: c_spelling.ends_with('*') && !is_array,
            c_spelling,
            native_type,
            host_type,
            is_array,
            is_interoperable,
            conversion,
        }
    }

    /// Whether the declared C spelling is const-qualified.
    pub fn is_const(&self) -> bool {
        self.c_spelling.starts_with("const ")
    }

    /// Host spelling in parameter position (`&str` for strings, a slice for
    /// arrays).
    pub fn param_spelling(&self) -> String {
        if self.is_array {
            let element = match &self.conversion {
                Some(conversion) => conversion.param_type().to_owned(),
                None => self.host_type.clone(),
            };
            format!("&[{element}]")
        } else {
            match &self.conversion {
                Some(conversion) => conversion.param_type().to_owned(),
                None => self.host_type.clone(),
            }
        }
    }

    /// The scratch-slot spelling for an output/result parameter.
    pub fn slot_spelling(&self) -> String {
        native_rust_spelling(&self.native_type)
    }

    /// Whether the scratch slot holds a raw pointer (null is meaningful).
    pub fn slot_is_pointer(&self) -> bool {
        self.native_type.ends_with('*')
    }

    /// The expression passing the converted binding to the native call.
    pub fn call_argument(&self, name: &str, nullable: bool) -> String {
        let binding = format!("{name}_converted");
        if self.is_array {
            return if self.is_const() {
                format!("{binding}.as_ptr()")
            } else {
                format!("{binding}.as_mut_ptr()")
            };
        }

        let arg = self
            .conversion
            .as_ref()
            .map(|c| c.arg)
            .unwrap_or(ArgMode::Direct);
        match (arg, nullable) {
            (ArgMode::Direct, false) => binding,
            (ArgMode::Direct, true) if self.is_pointer => {
                if self.is_const() {
                    format!("{binding}.unwrap_or(std::ptr::null())")
                } else {
                    format!("{binding}.unwrap_or(std::ptr::null_mut())")
                }
            }
            (ArgMode::Direct, true) => format!("{binding}.unwrap_or_default()"),
            (ArgMode::Ptr, false) => format!("{binding}.as_ptr()"),
            (ArgMode::Ptr, true) => {
                format!("{binding}.as_ref().map_or(std::ptr::null(), |v| v.as_ptr())")
            }
            (ArgMode::Ref, false) => format!("&{binding}"),
            (ArgMode::Ref, true) => {
                format!("{binding}.as_ref().map_or(std::ptr::null(), |v| v as *const _)")
            }
        }
    }
}

/// Strip one array level: a trailing `[]`, otherwise one trailing `*`.
fn strip_array_level(spelling: &str) -> String {
    if let Some(stripped) = spelling.strip_suffix("[]") {
        stripped.trim_end().to_owned()
    } else {
        strip_pointer(spelling)
    }
}

/// Strip one trailing pointer level if present.
fn strip_pointer(spelling: &str) -> String {
    match spelling.strip_suffix('*') {
        Some(stripped) => stripped.trim_end().to_owned(),
        None => spelling.to_owned(),
    }
}

/// The Rust FFI spelling of a C type: primitives map to their Rust
/// equivalents, everything else is assumed declared in the generated
/// crate's `ffi` module. Pointer levels become raw-pointer spellings with
/// constness on the innermost level, where C puts it.
pub fn native_rust_spelling(spelling: &str) -> String {
    let spelling = spelling.trim();
    let stars = spelling.chars().rev().take_while(|c| *c == '*' || c.is_whitespace());
    let star_count = stars.filter(|c| *c == '*').count();
    let base = spelling.trim_end_matches(['*', ' ']);

    let (base, is_const) = match base.strip_prefix("const ") {
        Some(rest) => (rest.trim(), true),
        None => (base, false),
    };

    let base_rust = match base {
        "void" => "c_void".to_owned(),
        "bool" => "bool".to_owned(),
        "char" => "c_char".to_owned(),
        "int" => "i32".to_owned(),
        "double" => "f64".to_owned(),
        "float" => "f32".to_owned(),
        "int8_t" => "i8".to_owned(),
        "int16_t" => "i16".to_owned(),
        "int32_t" => "i32".to_owned(),
        "int64_t" => "i64".to_owned(),
        "uint8_t" => "u8".to_owned(),
        "uint16_t" => "u16".to_owned(),
        "uint32_t" => "u32".to_owned(),
        "uint64_t" => "u64".to_owned(),
        "size_t" => "usize".to_owned(),
        other => format!("ffi::{}", other.split_whitespace().last().unwrap_or(other)),
    };

    if star_count == 0 {
        return base_rust;
    }

    let mut out = String::new();
    for _ in 0..star_count - 1 {
        out.push_str("*mut ");
    }
    out.push_str(if is_const { "*const " } else { "*mut " });
    out.push_str(&base_rust);
    out
}
