//! One registered type conversion.
//!
//! A conversion pairs a C type spelling with its host Rust type and the
//! expression templates that cross the boundary in each direction. Templates
//! use `{}` as the value placeholder and are instantiated by plain
//! substitution, so the registry stays pure data.

/// How a converted binding is handed to the native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgMode {
    /// Pass the binding as-is (numbers, raw pointers, enum casts).
    #[default]
    Direct,
    /// Pass `binding.as_ptr()` (owned `CString`s and element vectors).
    Ptr,
    /// Pass `&binding` (by-pointer structs crossing as values).
    Ref,
}

/// A registered conversion between a native spelling and a host type.
///
/// A conversion is identity (both templates absent), bidirectional (both
/// present), or inward-only (`to_native` alone, for native helper types
/// that never flow outward, like fixed-width casts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub native_type: String,
    /// Host spelling in return position (`String`, `DateTime<Utc>`, `i32`).
    pub host_type: String,
    /// Host spelling in parameter position when it differs (`&str`).
    pub host_param_type: Option<String>,
    /// Inward expression template, `{}` standing for the host value.
    pub to_native: Option<String>,
    /// Outward expression template, `{}` standing for the native value.
    pub to_host: Option<String>,
    /// Whether the inward conversion can fail host-side and renders with `?`.
    pub fallible: bool,
    pub arg: ArgMode,
}

impl Conversion {
    /// A passthrough conversion: the host type is the native type's direct
    /// Rust spelling and no expression is generated in either direction.
    pub fn identity(native_type: &str, host_type: &str) -> Self {
        Self {
            native_type: native_type.to_owned(),
            host_type: host_type.to_owned(),
            host_param_type: None,
            to_native: None,
            to_host: None,
            fallible: false,
            arg: ArgMode::Direct,
        }
    }

    /// An inward-only narrowing cast (fixed-width integer aliases).
    pub fn cast(native_type: &str, host_type: &str, cast_spelling: &str) -> Self {
        Self {
            native_type: native_type.to_owned(),
            host_type: host_type.to_owned(),
            host_param_type: None,
            to_native: Some(format!("{{}} as {cast_spelling}")),
            to_host: None,
            fallible: false,
            arg: ArgMode::Direct,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.to_native.is_none() && self.to_host.is_none()
    }

    /// Host spelling used when declaring an input parameter.
    pub fn param_type(&self) -> &str {
        self.host_param_type.as_deref().unwrap_or(&self.host_type)
    }

    pub fn to_native_expr(&self, value: &str) -> Option<String> {
        self.to_native.as_ref().map(|t| t.replace("{}", value))
    }

    pub fn to_host_expr(&self, value: &str) -> Option<String> {
        self.to_host.as_ref().map(|t| t.replace("{}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_no_expressions() {
        let conv = Conversion::identity("int", "i32");
        assert!(conv.is_identity());
        assert!(conv.to_native_expr("x").is_none());
        assert!(conv.to_host_expr("x").is_none());
        assert_eq!(conv.param_type(), "i32");
    }

    #[test]
    fn cast_renders_inward_only() {
        let conv = Conversion::cast("int8", "i8", "ffi::int8");
        assert_eq!(conv.to_native_expr("value").as_deref(), Some("value as ffi::int8"));
        assert!(conv.to_host_expr("value").is_none());
        assert!(!conv.is_identity());
    }

    #[test]
    fn templates_substitute_every_placeholder() {
        let conv = Conversion {
            native_type: "TimestampTz".into(),
            host_type: "DateTime<Utc>".into(),
            host_param_type: None,
            to_native: Some("datetime_to_timestamptz({})".into()),
            to_host: Some("timestamptz_to_datetime({})".into()),
            fallible: false,
            arg: ArgMode::Direct,
        };
        assert_eq!(
            conv.to_native_expr("t").as_deref(),
            Some("datetime_to_timestamptz(t)")
        );
        assert_eq!(
            conv.to_host_expr("slot").as_deref(),
            Some("timestamptz_to_datetime(slot)")
        );
    }

    #[test]
    fn param_type_prefers_borrowed_spelling() {
        let conv = Conversion {
            native_type: "const char *".into(),
            host_type: "String".into(),
            host_param_type: Some("&str".into()),
            to_native: Some("CString::new({})".into()),
            to_host: None,
            fallible: true,
            arg: ArgMode::Ptr,
        };
        assert_eq!(conv.param_type(), "&str");
    }
}
