//! Configuration-drift detection.
//!
//! The curated tables and the override/modifier maps are maintained by hand
//! against a header that moves underneath them. Once per generation pass,
//! every entry is checked against the full set of function names actually
//! present in the feed; entries referencing a vanished function come back as
//! warnings. Drift never blocks generation — the caller logs the warnings
//! and proceeds.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::config::CuratedTables;

/// A curated entry referencing a function absent from the input feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyWarning {
    /// Which table the stale entry lives in.
    pub table: &'static str,
    pub function: String,
    pub parameter: Option<String>,
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(
                f,
                "{} entry defined for non-existent function {} ({})",
                self.table, self.function, parameter
            ),
            None => write!(
                f,
                "{} entry defined for non-existent function {}",
                self.table, self.function
            ),
        }
    }
}

/// Check a name-keyed table (overrides, modifiers, skip/hide lists).
pub fn check_named_table<'a>(
    known: &FxHashSet<String>,
    table: &'static str,
    functions: impl IntoIterator<Item = &'a str>,
) -> Vec<ConsistencyWarning> {
    functions
        .into_iter()
        .filter(|function| !known.contains(*function))
        .map(|function| ConsistencyWarning {
            table,
            function: function.to_owned(),
            parameter: None,
        })
        .collect()
}

/// Check every curated table against the known function names.
pub fn check_tables(known: &FxHashSet<String>, tables: &CuratedTables) -> Vec<ConsistencyWarning> {
    let mut warnings = Vec::new();

    for (table, entries) in tables.role_sets() {
        for (function, parameter) in entries {
            if !known.contains(function) {
                warnings.push(ConsistencyWarning {
                    table,
                    function: function.clone(),
                    parameter: Some(parameter.clone()),
                });
            }
        }
    }

    warnings.extend(check_named_table(known, "skip", tables.skipped_functions()));
    warnings.extend(check_named_table(known, "hide", tables.hidden_functions()));

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn well_formed_configuration_yields_no_warnings() {
        let mut tables = CuratedTables::new();
        tables
            .mark_nullable("meos_initialize", "tz_str")
            .mark_output("stbox_tile_list", "cellcount")
            .skip("meos_initialize_timezone");
        let names = known(&[
            "meos_initialize",
            "stbox_tile_list",
            "meos_initialize_timezone",
        ]);
        assert!(check_tables(&names, &tables).is_empty());
    }

    #[test]
    fn stale_role_entry_is_reported_with_parameter() {
        let mut tables = CuratedTables::new();
        tables.mark_result("tbool_value_at_instant", "value");
        let warnings = check_tables(&known(&["tbool_value_at_timestamptz"]), &tables);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].table, "result");
        assert_eq!(warnings[0].parameter.as_deref(), Some("value"));
        assert_eq!(
            warnings[0].to_string(),
            "result entry defined for non-existent function tbool_value_at_instant (value)"
        );
    }

    #[test]
    fn stale_named_table_entry_is_reported() {
        let warnings = check_named_table(
            &known(&["temporal_as_wkb"]),
            "modifier",
            ["temporal_as_wkb", "temporal_as_wkb2"],
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].function, "temporal_as_wkb2");
        assert!(warnings[0].parameter.is_none());
    }

    #[test]
    fn one_warning_per_stale_entry() {
        let mut tables = CuratedTables::new();
        tables
            .mark_output("gone_fn", "count")
            .mark_output("gone_fn", "buckets")
            .skip("also_gone");
        let warnings = check_tables(&known(&[]), &tables);
        assert_eq!(warnings.len(), 3);
    }
}
