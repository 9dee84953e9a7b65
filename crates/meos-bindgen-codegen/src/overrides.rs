//! Hand-written replacement texts for functions the generic model cannot
//! express: host environment setup, text buffer plumbing, and the
//! raw-bytes WKB constructors. An override replaces the generated text
//! wholesale and is looked up by exact function name.

use rustc_hash::FxHashMap;

use meos_bindgen_core::ConfigError;

/// The override table. Every inserted text must define a function of the
/// name it is keyed by; a mismatch is a configuration error at build time,
/// not something discovered in the emitted module.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    map: FxHashMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: &str, text: impl Into<String>) -> Result<(), ConfigError> {
        let text = text.into();
        if !text.contains(&format!("fn {function}(")) {
            return Err(ConfigError::InvalidOverride {
                function: function.to_owned(),
            });
        }
        self.map.insert(function.to_owned(), text);
        Ok(())
    }

    pub fn get(&self, function: &str) -> Option<&str> {
        self.map.get(function).map(String::as_str)
    }

    pub fn contains(&self, function: &str) -> bool {
        self.map.contains_key(function)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// The override table for the MEOS API surface.
    pub fn standard() -> Result<Self, ConfigError> {
        let mut overrides = Self::new();

        overrides.insert("meos_initialize", MEOS_INITIALIZE)?;
        overrides.insert("cstring2text", CSTRING2TEXT)?;
        overrides.insert("text2cstring", TEXT2CSTRING)?;

        for (function, return_type) in [
            ("temporal_from_wkb", "Temporal"),
            ("set_from_wkb", "Set"),
            ("span_from_wkb", "Span"),
            ("spanset_from_wkb", "SpanSet"),
            ("tbox_from_wkb", "TBox"),
            ("stbox_from_wkb", "STBox"),
        ] {
            overrides.insert(function, from_wkb_override(function, return_type))?;
        }

        Ok(overrides)
    }
}

/// Library initialization needs host-side environment work before the
/// native call: a self-contained build carries its own PROJ data and must
/// point PROJ at it, and the error handler is installed in the same call.
const MEOS_INITIALIZE: &str = r#"pub fn meos_initialize(tz_str: Option<&str>) -> MeosResult<()> {
    if std::env::var_os("PROJ_DATA").is_none() && std::env::var_os("PROJ_LIB").is_none() {
        let proj_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("proj_data");
        if proj_dir.exists() {
            unsafe {
                std::env::set_var("PROJ_DATA", &proj_dir);
                std::env::set_var("PROJ_LIB", &proj_dir);
            }
        }
    }
    let tz_str_converted = tz_str.map(|v| CString::new(v)).transpose()?;
    unsafe {
        ffi::meos_initialize(
            tz_str_converted.as_ref().map_or(std::ptr::null(), |v| v.as_ptr()),
            meos_error_handler,
        )
    };
    Ok(())
}"#;

/// Byte-length-aware text constructor; the generic string rules would
/// recurse into themselves here.
const CSTRING2TEXT: &str = r#"pub(crate) fn cstring2text(cstring: &str) -> MeosResult<*mut ffi::text> {
    let cstring_converted = CString::new(cstring)?;
    let result = unsafe { ffi::cstring2text(cstring_converted.as_ptr()) };
    Ok(result)
}"#;

const TEXT2CSTRING: &str = r#"pub(crate) fn text2cstring(textptr: *mut ffi::text) -> MeosResult<String> {
    let result = unsafe { ffi::text2cstring(textptr) };
    Ok(unsafe { CStr::from_ptr(result) }.to_string_lossy().into_owned())
}"#;

/// WKB constructors take a raw byte buffer plus its length and surface a
/// null return as an absent value.
fn from_wkb_override(function: &str, return_type: &str) -> String {
    format!(
        r#"pub fn {function}(wkb: &[u8]) -> MeosResult<Option<*mut ffi::{return_type}>> {{
    let result = unsafe {{ ffi::{function}(wkb.as_ptr(), wkb.len()) }};
    Ok((!result.is_null()).then_some(result))
}}"#
    )
}
