//! Curated per-function configuration.
//!
//! Role classification is mostly structural, but the native API has a tail
//! of functions whose parameter semantics cannot be read off the spelling:
//! nullability is never syntactic, a handful of result/output parameters
//! dodge the naming conventions, and some single-pointer parameters are
//! semantically arrays. Those cases live here, keyed by
//! `(function, parameter)` literal pairs, together with the skip and hide
//! lists.
//!
//! Tables are populated once (either [`CuratedTables::standard`] or
//! programmatically in tests), validated with [`CuratedTables::validate`],
//! and read-only afterwards.

use rustc_hash::FxHashSet;

use crate::error::ConfigError;

/// Names of the four role tables, used in validation errors and warnings.
pub const ROLE_TABLE_NAMES: [&str; 4] = ["nullable", "result", "output", "array"];

#[derive(Debug, Clone, Default)]
pub struct CuratedTables {
    nullable: FxHashSet<(String, String)>,
    result: FxHashSet<(String, String)>,
    output: FxHashSet<(String, String)>,
    array: FxHashSet<(String, String)>,
    skipped: FxHashSet<String>,
    hidden: FxHashSet<String>,
}

impl CuratedTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The curated configuration for the MEOS API surface.
    pub fn standard() -> Self {
        let mut tables = Self::new();

        for (function, parameter) in RESULT_PARAMETERS {
            tables.mark_result(function, parameter);
        }
        for (function, parameter) in OUTPUT_PARAMETERS {
            tables.mark_output(function, parameter);
        }
        for (function, parameter) in NULLABLE_PARAMETERS {
            tables.mark_nullable(function, parameter);
        }
        for function in SKIPPED_FUNCTIONS {
            tables.skip(function);
        }
        for function in HIDDEN_FUNCTIONS {
            tables.hide(function);
        }

        tables
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    pub fn mark_nullable(&mut self, function: &str, parameter: &str) -> &mut Self {
        self.nullable.insert(pair(function, parameter));
        self
    }

    pub fn mark_result(&mut self, function: &str, parameter: &str) -> &mut Self {
        self.result.insert(pair(function, parameter));
        self
    }

    pub fn mark_output(&mut self, function: &str, parameter: &str) -> &mut Self {
        self.output.insert(pair(function, parameter));
        self
    }

    pub fn mark_array(&mut self, function: &str, parameter: &str) -> &mut Self {
        self.array.insert(pair(function, parameter));
        self
    }

    /// Exclude a function from generation entirely.
    pub fn skip(&mut self, function: &str) -> &mut Self {
        self.skipped.insert(function.to_owned());
        self
    }

    /// Generate a function with crate-private visibility.
    pub fn hide(&mut self, function: &str) -> &mut Self {
        self.hidden.insert(function.to_owned());
        self
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    pub fn is_nullable(&self, function: &str, parameter: &str) -> bool {
        self.nullable.contains(&pair(function, parameter))
    }

    pub fn is_result(&self, function: &str, parameter: &str) -> bool {
        self.result.contains(&pair(function, parameter))
    }

    pub fn is_output(&self, function: &str, parameter: &str) -> bool {
        self.output.contains(&pair(function, parameter))
    }

    pub fn is_array(&self, function: &str, parameter: &str) -> bool {
        self.array.contains(&pair(function, parameter))
    }

    pub fn is_skipped(&self, function: &str) -> bool {
        self.skipped.contains(function)
    }

    pub fn is_hidden(&self, function: &str) -> bool {
        self.hidden.contains(function)
    }

    // ==========================================================================
    // Validation and iteration
    // ==========================================================================

    /// Reject configurations where one `(function, parameter)` pair carries
    /// more than one role. Classification has no precedence rule, so an
    /// overlapping pair would otherwise pick a role silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sets = self.role_sets();
        for (i, (first_name, first)) in sets.iter().enumerate() {
            for (second_name, second) in &sets[i + 1..] {
                if let Some((function, parameter)) = first.intersection(second).next() {
                    return Err(ConfigError::RoleOverlap {
                        function: function.clone(),
                        parameter: parameter.clone(),
                        first: first_name,
                        second: second_name,
                    });
                }
            }
        }
        Ok(())
    }

    /// The four role tables with their names, in declaration order.
    pub fn role_sets(&self) -> [(&'static str, &FxHashSet<(String, String)>); 4] {
        [
            ("nullable", &self.nullable),
            ("result", &self.result),
            ("output", &self.output),
            ("array", &self.array),
        ]
    }

    pub fn skipped_functions(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(String::as_str)
    }

    pub fn hidden_functions(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }
}

fn pair(function: &str, parameter: &str) -> (String, String) {
    (function.to_owned(), parameter.to_owned())
}

/// Result parameters that are not literally named `result`.
const RESULT_PARAMETERS: &[(&str, &str)] = &[
    ("tbool_value_at_timestamptz", "value"),
    ("ttext_value_at_timestamptz", "value"),
    ("tint_value_at_timestamptz", "value"),
    ("tfloat_value_at_timestamptz", "value"),
    ("tpoint_value_at_timestamptz", "value"),
];

/// Output parameters that dodge the `_out` / pointer-`count` conventions.
const OUTPUT_PARAMETERS: &[(&str, &str)] = &[
    ("temporal_time_split", "time_buckets"),
    ("temporal_time_split", "count"),
    ("tint_value_split", "value_buckets"),
    ("tint_value_split", "count"),
    ("tfloat_value_split", "value_buckets"),
    ("tfloat_value_split", "count"),
    ("tint_value_time_split", "value_buckets"),
    ("tint_value_time_split", "time_buckets"),
    ("tint_value_time_split", "count"),
    ("tfloat_value_time_split", "value_buckets"),
    ("tfloat_value_time_split", "time_buckets"),
    ("tfloat_value_time_split", "count"),
    ("tpoint_space_split", "space_buckets"),
    ("tpoint_space_split", "count"),
    ("tpoint_space_time_split", "space_buckets"),
    ("tpoint_space_time_split", "time_buckets"),
    ("tpoint_space_time_split", "count"),
    ("tbox_as_hexwkb", "size"),
    ("stbox_as_hexwkb", "size"),
    ("tintbox_tile_list", "count"),
    ("tfloatbox_tile_list", "count"),
    ("stbox_tile_list", "cellcount"),
];

/// Parameters where a native null is a meaningful absent value.
const NULLABLE_PARAMETERS: &[(&str, &str)] = &[
    ("meos_initialize", "tz_str"),
    ("meos_set_intervalstyle", "extra"),
    ("temporal_append_tinstant", "maxt"),
    ("temporal_as_mfjson", "srs"),
    ("geo_as_geojson", "srs"),
    ("tstzspan_shift_scale", "shift"),
    ("tstzspan_shift_scale", "duration"),
    ("tstzset_shift_scale", "shift"),
    ("tstzset_shift_scale", "duration"),
    ("tstzspanset_shift_scale", "shift"),
    ("tstzspanset_shift_scale", "duration"),
    ("temporal_shift_scale_time", "shift"),
    ("temporal_shift_scale_time", "duration"),
    ("tbox_make", "p"),
    ("tbox_make", "s"),
    ("stbox_make", "p"),
    ("stbox_make", "s"),
    ("tbox_shift_scale_time", "shift"),
    ("tbox_shift_scale_time", "duration"),
    ("stbox_shift_scale_time", "shift"),
    ("stbox_shift_scale_time", "duration"),
    ("temporal_tcount_transfn", "state"),
    ("temporal_tcount_transfn", "interval"),
    ("temporal_extent_transfn", "p"),
    ("tnumber_extent_transfn", "box"),
    ("tpoint_extent_transfn", "box"),
    ("tbool_tand_transfn", "state"),
    ("tbool_tor_transfn", "state"),
    ("tint_tmin_transfn", "state"),
    ("tfloat_tmin_transfn", "state"),
    ("tint_tmax_transfn", "state"),
    ("tfloat_tmax_transfn", "state"),
    ("tint_tsum_transfn", "state"),
    ("tfloat_tsum_transfn", "state"),
    ("tnumber_tavg_transfn", "state"),
    ("ttext_tmin_transfn", "state"),
    ("ttext_tmax_transfn", "state"),
    ("timestamptz_tcount_transfn", "interval"),
    ("timestamptz_tcount_transfn", "state"),
    ("timestamptz_extent_transfn", "p"),
    ("tstzset_tcount_transfn", "interval"),
    ("tstzset_tcount_transfn", "state"),
    ("tstzspan_tcount_transfn", "interval"),
    ("tstzspan_tcount_transfn", "state"),
    ("tstzspanset_tcount_transfn", "interval"),
    ("tstzspanset_tcount_transfn", "state"),
    ("stbox_tile_list", "duration"),
    ("tintbox_tile_list", "xorigin"),
    ("tintbox_tile_list", "torigin"),
    ("tfloatbox_tile_list", "xorigin"),
    ("tfloatbox_tile_list", "torigin"),
    ("tpoint_at_geom_time", "zspan"),
    ("tpoint_at_geom_time", "period"),
    ("tpoint_minus_geom_time", "zspan"),
    ("tpoint_minus_geom_time", "period"),
    ("tsequenceset_make_gaps", "maxt"),
];

/// Functions never generated: the timezone/error-handler init variants are
/// superseded by the host-side setup the `meos_initialize` override does.
const SKIPPED_FUNCTIONS: &[&str] = &[
    "meos_initialize_timezone",
    "meos_initialize_error_handler",
    "meos_finalize_timezone",
];

/// Functions generated with crate-private visibility: internal text
/// plumbing other wrappers call, not part of the public surface.
const HIDDEN_FUNCTIONS: &[&str] = &["cstring2text", "text2cstring"];
