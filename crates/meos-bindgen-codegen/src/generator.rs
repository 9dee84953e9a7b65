//! The generation pipeline: declarations in, one module of wrapper text out.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use meos_bindgen_core::{
    CuratedTables, Declaration, check_named_table, check_tables, ConfigError, ConsistencyWarning,
};
use meos_bindgen_registry::ConversionRegistry;

use crate::function::{Function, Visibility};
use crate::modifier::{Modifier, standard_modifiers};
use crate::overrides::Overrides;

/// Imports and shared definitions every generated module starts with.
const MODULE_PREAMBLE: &str = r#"//! Generated MEOS wrappers. Do not edit; regenerate with meos-bindgen.

#![allow(clippy::too_many_arguments)]

use std::ffi::{CStr, CString};
use std::mem::MaybeUninit;
use std::os::raw::{c_char, c_int, c_void};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use meos_marshal::{
    InterpolationType, MeosResult, check_error, report_error, date_adt_to_date, date_to_date_adt,
    datetime_to_timestamptz, interval_to_timedelta, timedelta_to_interval,
    timestamptz_to_datetime,
};

use crate::ffi;

unsafe extern "C" fn meos_error_handler(level: c_int, code: c_int, message: *const c_char) {
    let message = if message.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
    };
    report_error(level, code, &message);
}"#;

/// The output of one generation pass.
#[derive(Debug)]
pub struct GeneratedModule {
    pub source: String,
    pub warnings: Vec<ConsistencyWarning>,
}

/// The assembled generator: registry, curated tables, overrides and
/// modifiers, all immutable once constructed.
pub struct Generator {
    registry: ConversionRegistry,
    tables: CuratedTables,
    overrides: Overrides,
    modifiers: FxHashMap<String, Modifier>,
}

impl Generator {
    /// Build a generator from explicit configuration. The curated tables
    /// are validated here; an ambiguous configuration never generates.
    pub fn new(
        registry: ConversionRegistry,
        tables: CuratedTables,
        overrides: Overrides,
        modifiers: FxHashMap<String, Modifier>,
    ) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self {
            registry,
            tables,
            overrides,
            modifiers,
        })
    }

    /// The generator configured for the MEOS API surface.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(
            ConversionRegistry::standard(),
            CuratedTables::standard(),
            Overrides::standard()?,
            standard_modifiers(),
        )
    }

    /// Generate the wrapper module for an ordered declaration feed.
    pub fn generate(&self, declarations: &[Declaration]) -> GeneratedModule {
        let known: FxHashSet<String> = declarations.iter().map(|d| d.name.clone()).collect();
        let warnings = self.check_configuration(&known);
        for warning in &warnings {
            warn!("{warning}");
        }

        let mut sections = vec![MODULE_PREAMBLE.to_owned()];
        for declaration in declarations {
            if self.tables.is_skipped(&declaration.name) {
                debug!(function = %declaration.name, "skipped");
                continue;
            }
            sections.push(self.generate_function(declaration));
        }

        info!(
            functions = sections.len() - 1,
            warnings = warnings.len(),
            "generation pass complete"
        );

        GeneratedModule {
            source: sections.join("\n\n") + "\n",
            warnings,
        }
    }

    /// Generate one wrapper: the override text verbatim when one exists,
    /// otherwise generic assembly followed by the function's modifier.
    pub fn generate_function(&self, declaration: &Declaration) -> String {
        if let Some(text) = self.overrides.get(&declaration.name) {
            return text.to_owned();
        }

        let mut function = Function::from_declaration(&self.registry, &self.tables, declaration);
        if let Some(modifier) = self.modifiers.get(&declaration.name) {
            modifier.apply(&mut function, &self.registry);
        }

        let visibility = if self.tables.is_hidden(&declaration.name) {
            Visibility::Crate
        } else {
            Visibility::Public
        };
        function.render(&self.registry, visibility)
    }

    /// Run the consistency checker over every curated table.
    fn check_configuration(&self, known: &FxHashSet<String>) -> Vec<ConsistencyWarning> {
        let mut warnings = check_tables(known, &self.tables);
        warnings.extend(check_named_table(
            known,
            "override",
            self.overrides.functions(),
        ));
        warnings.extend(check_named_table(
            known,
            "modifier",
            self.modifiers.keys().map(String::as_str),
        ));
        warnings
    }
}
