//! One parameter's full descriptor and its rendered fragments.

use meos_bindgen_core::CuratedTables;
use meos_bindgen_registry::{ConversionRegistry, RoleFlags, classify};

use crate::types::ResolvedType;

/// C parameter names that collide with Rust keywords, and their renames.
const RESERVED_WORDS: &[(&str, &str)] = &[
    ("box", "box_"),
    ("ref", "ref_"),
    ("type", "type_"),
    ("in", "in_"),
    ("fn", "fn_"),
    ("match", "match_"),
    ("move", "move_"),
    ("loop", "loop_"),
    ("where", "where_"),
    ("use", "use_"),
];

/// One parameter of one function.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Identifier used in the generated code (renamed if reserved).
    pub name: String,
    pub ty: ResolvedType,
    pub input: bool,
    pub nullable: bool,
    pub result: bool,
    pub output: bool,
    /// Modifier-installed replacement for the converted value; a
    /// synthesized parameter is not declared in the signature.
    pub synthesized: Option<String>,
}

impl Parameter {
    /// Build a parameter from a raw `"<type> <name>"` fragment. Role
    /// lookups key on the declared C name, before any renaming.
    pub fn from_raw(
        registry: &ConversionRegistry,
        tables: &CuratedTables,
        function_name: &str,
        raw: &str,
    ) -> Self {
        let (type_spelling, c_name) = split_type_name(raw);

        let mut flags = classify(tables, function_name, &c_name, &type_spelling);
        // A result slot spelled `T **` is pointer indirection around a
        // single value, not an array.
        if flags.contains(RoleFlags::RESULT) {
            flags -= RoleFlags::ARRAY;
        }
        let ty = ResolvedType::resolve(registry, flags, &type_spelling);

        let result = flags.contains(RoleFlags::RESULT);
        let output = flags.contains(RoleFlags::OUTPUT) && !result;

        Self {
            name: rename_reserved(&c_name),
            ty,
            input: !(result || output),
            nullable: flags.contains(RoleFlags::NULLABLE),
            result,
            output,
            synthesized: None,
        }
    }

    /// The `name: type` fragment for the wrapper signature, if this
    /// parameter is declared at all.
    pub fn declaration(&self) -> Option<String> {
        if !self.input || self.synthesized.is_some() {
            return None;
        }
        let spelling = self.ty.param_spelling();
        if self.nullable {
            Some(format!("{}: Option<{spelling}>", self.name))
        } else {
            Some(format!("{}: {spelling}", self.name))
        }
    }

    /// The `let ..._converted = ...;` statement for this parameter.
    pub fn conversion(&self) -> String {
        let name = &self.name;

        if let Some(expr) = &self.synthesized {
            return format!("let {name}_converted = {expr};");
        }

        if !self.input {
            return format!(
                "let mut {name}_converted = MaybeUninit::<{}>::uninit();",
                self.ty.slot_spelling()
            );
        }

        if self.ty.is_array {
            return self.array_conversion();
        }

        let conversion = self.ty.conversion.as_ref();
        let to_native = conversion.and_then(|c| c.to_native_expr("v"));
        let fallible = conversion.is_some_and(|c| c.fallible);

        match (to_native, self.nullable) {
            (None, _) => format!("let {name}_converted = {name};"),
            (Some(_), false) => {
                // Rebuild with the real identifier for the direct form.
                let expr = conversion
                    .and_then(|c| c.to_native_expr(name))
                    .unwrap_or_else(|| name.clone());
                if fallible {
                    format!("let {name}_converted = {expr}?;")
                } else {
                    format!("let {name}_converted = {expr};")
                }
            }
            (Some(expr), true) => {
                if fallible {
                    format!("let {name}_converted = {name}.map(|v| {expr}).transpose()?;")
                } else {
                    format!("let {name}_converted = {name}.map(|v| {expr});")
                }
            }
        }
    }

    fn array_conversion(&self) -> String {
        let name = &self.name;
        let mutability = if self.ty.is_const() { "" } else { "mut " };
        let conversion = self.ty.conversion.as_ref();

        match conversion.and_then(|c| c.to_native_expr("v")) {
            Some(element) if conversion.is_some_and(|c| c.fallible) => format!(
                "let {mutability}{name}_converted = \
                 {name}.iter().copied().map(|v| {element}).collect::<Result<Vec<_>, _>>()?;"
            ),
            Some(element) => format!(
                "let {mutability}{name}_converted = \
                 {name}.iter().copied().map(|v| {element}).collect::<Vec<_>>();"
            ),
            None => format!("let {mutability}{name}_converted = {name}.to_vec();"),
        }
    }

    /// The argument expression for the native call.
    pub fn call_argument(&self) -> String {
        if self.synthesized.is_some() {
            return format!("{}_converted", self.name);
        }
        if !self.input {
            return format!("{}_converted.as_mut_ptr()", self.name);
        }
        self.ty.call_argument(&self.name, self.nullable)
    }

    /// Host spelling this parameter contributes to the composite return.
    pub fn out_host_type(&self) -> String {
        if self.ty.is_array {
            format!("Vec<{}>", self.ty.host_type)
        } else if self.ty.is_interoperable && self.ty.slot_is_pointer() {
            format!("Option<{}>", self.ty.slot_spelling())
        } else {
            self.ty.host_type.clone()
        }
    }

    /// The expression reading this output/result slot back into a host
    /// value after the call. Array outputs read through their paired
    /// `length` slot.
    pub fn out_conversion(&self, length: Option<&str>) -> String {
        let name = &self.name;
        let slot = format!("unsafe {{ {name}_converted.assume_init() }}");

        if self.ty.is_array {
            let length = length.unwrap_or("count");
            let element_slot = format!("unsafe {{ *{name}_converted.assume_init().add(i) }}");
            let element = self
                .ty
                .conversion
                .as_ref()
                .and_then(|c| c.to_host_expr(&element_slot))
                .unwrap_or(element_slot);
            return format!(
                "(0..unsafe {{ {length}_converted.assume_init() }} as usize)\
                 .map(|i| {element}).collect::<Vec<_>>()"
            );
        }

        if self.ty.is_interoperable {
            if self.ty.slot_is_pointer() {
                return format!("{{ let v = {slot}; if v.is_null() {{ None }} else {{ Some(v) }} }}");
            }
            return slot;
        }

        self.ty
            .conversion
            .as_ref()
            .and_then(|c| c.to_host_expr(&slot))
            .unwrap_or(slot)
    }
}

/// Split a raw `"<type> <name>"` fragment, re-gluing pointer stars from the
/// name onto the type spelling.
pub fn split_type_name(raw: &str) -> (String, String) {
    let raw = raw.trim();
    let split: Vec<&str> = raw.split(' ').collect();
    let (last, head) = split.split_last().unwrap_or((&raw, &[]));

    let name = last.trim_start_matches('*');
    let glued_stars = last.len() - name.len();

    let mut type_spelling = head.join(" ");
    for _ in 0..glued_stars {
        type_spelling.push_str(" *");
    }

    (type_spelling.trim().to_owned(), name.to_owned())
}

fn rename_reserved(name: &str) -> String {
    RESERVED_WORDS
        .iter()
        .find(|(reserved, _)| *reserved == name)
        .map(|(_, renamed)| (*renamed).to_owned())
        .unwrap_or_else(|| name.to_owned())
}
