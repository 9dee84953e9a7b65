//! The conversion registry: C type spelling to host type and templates.
//!
//! Registration is declarative. A base family registration expands
//! mechanically into four entries (`T`, `T *`, `const T`, `const T *`)
//! sharing one marshalling strategy, since pointer and const qualification
//! do not change how a supported family crosses the boundary. Lookup of an
//! unregistered spelling yields `None` and the type model falls back to an
//! opaque passthrough; the registry itself has no error conditions.

use rustc_hash::FxHashMap;

use crate::conversion::{ArgMode, Conversion};

#[derive(Debug, Clone, Default)]
pub struct ConversionRegistry {
    map: FxHashMap<String, Conversion>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, native_type: &str) -> Option<&Conversion> {
        self.map.get(native_type)
    }

    pub fn contains(&self, native_type: &str) -> bool {
        self.map.contains_key(native_type)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Register a conversion under exactly its own spelling.
    pub fn register(&mut self, conversion: Conversion) -> &mut Self {
        self.map
            .insert(conversion.native_type.clone(), conversion);
        self
    }

    /// Register a base conversion and its three const/pointer variants.
    pub fn register_family(&mut self, base: Conversion) -> &mut Self {
        let spelling = base.native_type.clone();
        for variant in [
            spelling.clone(),
            format!("{spelling} *"),
            format!("const {spelling}"),
            format!("const {spelling} *"),
        ] {
            let mut conversion = base.clone();
            conversion.native_type = variant;
            self.register(conversion);
        }
        self
    }

    /// The registry for the MEOS type universe.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        // Plain primitives are identity passthroughs; their pointer
        // spellings stay unregistered so a scalar `int *` input degrades to
        // an opaque pointer instead of a bogus by-value number.
        registry.register(Conversion::identity("void", "()"));
        registry.register(Conversion::identity("bool", "bool"));
        registry.register(Conversion::identity("int", "i32"));
        registry.register(Conversion::identity("double", "f64"));

        // Fixed-width aliases: plain host integers narrowed with a cast on
        // the way in, passed back unchanged on the way out.
        for (native, host, cast) in [
            ("int8", "i8", "ffi::int8"),
            ("int16", "i16", "ffi::int16"),
            ("int32", "i32", "ffi::int32"),
            ("int64", "i64", "ffi::int64"),
            ("uint8", "u8", "ffi::uint8"),
            ("uint16", "u16", "ffi::uint16"),
            ("uint32", "u32", "ffi::uint32"),
            ("uint64", "u64", "ffi::uint64"),
            ("uint8_t", "u8", "u8"),
            ("int32_t", "i32", "i32"),
            ("size_t", "usize", "usize"),
        ] {
            registry.register_family(Conversion::cast(native, host, cast));
        }

        for spelling in ["char *", "const char *"] {
            registry.register(Conversion {
                native_type: spelling.to_owned(),
                host_type: "String".into(),
                host_param_type: Some("&str".into()),
                to_native: Some("CString::new({})".into()),
                to_host: Some(
                    "unsafe { CStr::from_ptr({}) }.to_string_lossy().into_owned()".into(),
                ),
                fallible: true,
                arg: ArgMode::Ptr,
            });
        }

        // Native text buffers go through the generated sibling wrappers.
        registry.register_family(Conversion {
            native_type: "text".into(),
            host_type: "String".into(),
            host_param_type: Some("&str".into()),
            to_native: Some("cstring2text({})".into()),
            to_host: Some("text2cstring({})?".into()),
            fallible: true,
            arg: ArgMode::Direct,
        });

        registry.register_family(Conversion::cast("Timestamp", "i64", "ffi::Timestamp"));
        registry.register_family(Conversion::cast("TimeOffset", "i64", "ffi::TimeOffset"));

        registry.register_family(Conversion {
            native_type: "TimestampTz".into(),
            host_type: "DateTime<Utc>".into(),
            host_param_type: None,
            to_native: Some("datetime_to_timestamptz({})".into()),
            to_host: Some("timestamptz_to_datetime({})".into()),
            fallible: false,
            arg: ArgMode::Direct,
        });

        registry.register_family(Conversion {
            native_type: "DateADT".into(),
            host_type: "NaiveDate".into(),
            host_param_type: None,
            to_native: Some("date_to_date_adt({})".into()),
            to_host: Some("date_adt_to_date({})".into()),
            fallible: false,
            arg: ArgMode::Direct,
        });

        registry.register_family(Conversion {
            native_type: "Interval".into(),
            host_type: "TimeDelta".into(),
            host_param_type: None,
            to_native: Some("timedelta_to_interval({})".into()),
            to_host: Some("interval_to_timedelta(&{})".into()),
            fallible: false,
            arg: ArgMode::Ref,
        });

        registry.register_family(Conversion::cast(
            "interpType",
            "InterpolationType",
            "ffi::interpType",
        ));

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_expands_to_four_spellings() {
        let mut registry = ConversionRegistry::new();
        registry.register_family(Conversion::identity("bool", "bool"));
        for spelling in ["bool", "bool *", "const bool", "const bool *"] {
            let conversion = registry.lookup(spelling).unwrap();
            assert_eq!(conversion.native_type, spelling);
            assert_eq!(conversion.host_type, "bool");
        }
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn family_variants_share_the_marshalling_strategy() {
        let registry = ConversionRegistry::standard();
        let base = registry.lookup("TimestampTz").unwrap();
        let pointer = registry.lookup("const TimestampTz *").unwrap();
        assert_eq!(base.host_type, pointer.host_type);
        assert_eq!(base.to_native, pointer.to_native);
        assert_eq!(base.to_host, pointer.to_host);
    }

    #[test]
    fn unregistered_spelling_yields_none() {
        let registry = ConversionRegistry::standard();
        assert!(registry.lookup("Temporal *").is_none());
        assert!(registry.lookup("GSERIALIZED *").is_none());
        // Primitive pointer spellings are deliberately not registered.
        assert!(registry.lookup("int *").is_none());
        assert!(registry.lookup("bool *").is_none());
    }

    #[test]
    fn primitives_are_identity() {
        let registry = ConversionRegistry::standard();
        assert!(registry.lookup("int").unwrap().is_identity());
        assert!(registry.lookup("double").unwrap().is_identity());
        assert_eq!(registry.lookup("void").unwrap().host_type, "()");
    }

    #[test]
    fn fixed_width_aliases_cast_inward_only() {
        let registry = ConversionRegistry::standard();
        let conv = registry.lookup("uint8_t").unwrap();
        assert_eq!(conv.to_native_expr("variant").as_deref(), Some("variant as u8"));
        assert!(conv.to_host.is_none());
        let conv = registry.lookup("int64").unwrap();
        assert_eq!(conv.to_native_expr("v").as_deref(), Some("v as ffi::int64"));
    }

    #[test]
    fn char_pointer_is_a_fallible_string_conversion() {
        let registry = ConversionRegistry::standard();
        let conv = registry.lookup("const char *").unwrap();
        assert_eq!(conv.host_type, "String");
        assert_eq!(conv.param_type(), "&str");
        assert!(conv.fallible);
        assert_eq!(conv.arg, ArgMode::Ptr);
    }

    #[test]
    fn interval_crosses_by_reference() {
        let registry = ConversionRegistry::standard();
        let conv = registry.lookup("const Interval *").unwrap();
        assert_eq!(conv.arg, ArgMode::Ref);
        assert_eq!(
            conv.to_host_expr("slot").as_deref(),
            Some("interval_to_timedelta(&slot)")
        );
    }
}
