//! Whole-function assembly.
//!
//! A [`Function`] partitions its parameters into declared inputs, hidden
//! output slots, and the optional result slot, determines the composite
//! return type, and renders the complete wrapper text: signature,
//! conversions, native call, error check, return statement. Assembly never
//! fails; anything the registry does not know has already degraded to an
//! opaque passthrough in the type model.

use meos_bindgen_core::{CuratedTables, Declaration};
use meos_bindgen_registry::ConversionRegistry;

use crate::parameter::Parameter;
use crate::types::native_rust_spelling;

/// Host integer spellings that can serve as an array-length slot.
const LENGTH_HOST_TYPES: [&str; 6] = ["i8", "i16", "i32", "i64", "u32", "usize"];

/// Visibility of a generated wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Crate,
}

impl Visibility {
    fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "pub",
            Visibility::Crate => "pub(crate)",
        }
    }
}

/// One function ready to render.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub inner_return_type: String,
    /// Cleared by the `StripErrorCheck` modifier.
    pub error_check: bool,
    /// Set by the `ByteBufferResult` modifier: the named size output and
    /// the returned byte pointer collapse into one `Vec<u8>`.
    pub byte_buffer_result: Option<String>,
}

impl Function {
    pub fn from_declaration(
        registry: &ConversionRegistry,
        tables: &CuratedTables,
        declaration: &Declaration,
    ) -> Self {
        let parameters = declaration
            .parameters
            .iter()
            .map(|raw| Parameter::from_raw(registry, tables, &declaration.name, raw))
            .collect();

        Self {
            name: declaration.name.clone(),
            parameters,
            inner_return_type: declaration.return_type.clone(),
            error_check: true,
            byte_buffer_result: None,
        }
    }

    pub fn result_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.result)
    }

    pub fn output_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.output)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }

    /// Render the full wrapper text.
    pub fn render(&self, registry: &ConversionRegistry, visibility: Visibility) -> String {
        let declared: Vec<String> = self
            .parameters
            .iter()
            .filter_map(|p| p.declaration())
            .collect();
        let return_spelling = self.return_spelling(registry);

        let mut body = Vec::new();
        for parameter in &self.parameters {
            body.push(parameter.conversion());
        }
        body.push(self.call_statement());
        if self.error_check {
            body.push("check_error()?;".to_owned());
        }
        body.extend(self.return_statement(registry));

        let mut text = format!(
            "{} fn {}({}) -> MeosResult<{}> {{\n",
            visibility.as_str(),
            self.name,
            declared.join(", "),
            return_spelling,
        );
        for line in body {
            text.push_str("    ");
            text.push_str(&line);
            text.push('\n');
        }
        text.push('}');
        text
    }

    /// The inner type inside `MeosResult<...>`: the primary result,
    /// widened to an ordered tuple when output slots exist.
    fn return_spelling(&self, registry: &ConversionRegistry) -> String {
        if self.byte_buffer_result.is_some() {
            return "Vec<u8>".to_owned();
        }

        let mut pieces = Vec::new();
        if let Some(result) = self.result_parameter() {
            pieces.push(result.out_host_type());
        } else if self.inner_return_type != "void" {
            pieces.push(self.return_host_type(registry));
        }
        for output in self.output_parameters() {
            pieces.push(output.out_host_type());
        }

        match pieces.len() {
            0 => "()".to_owned(),
            1 => pieces.remove(0),
            _ => format!("({})", pieces.join(", ")),
        }
    }

    fn return_host_type(&self, registry: &ConversionRegistry) -> String {
        match registry.lookup(&self.inner_return_type) {
            Some(conversion) => conversion.host_type.clone(),
            None => native_rust_spelling(&self.inner_return_type),
        }
    }

    /// The native call, binding `inner_call_result` only when the native
    /// return is used.
    fn call_statement(&self) -> String {
        let arguments: Vec<String> = self.parameters.iter().map(|p| p.call_argument()).collect();
        let call = format!("unsafe {{ ffi::{}({}) }}", self.name, arguments.join(", "));

        let binds_result = self.inner_return_type != "void" && self.result_parameter().is_none();
        if binds_result {
            format!("let inner_call_result = {call};")
        } else {
            format!("{call};")
        }
    }

    /// The trailing statement(s) building the composite return value.
    fn return_statement(&self, registry: &ConversionRegistry) -> Vec<String> {
        if let Some(length) = &self.byte_buffer_result {
            return vec![
                format!(
                    "let buffer_len = unsafe {{ {length}_converted.assume_init() }} as usize;"
                ),
                "let buffer = unsafe { std::slice::from_raw_parts(inner_call_result, buffer_len) }.to_vec();"
                    .to_owned(),
                "Ok(buffer)".to_owned(),
            ];
        }

        let mut pieces = Vec::new();
        if let Some(result) = self.result_parameter() {
            pieces.push(result.out_conversion(None));
        } else if self.inner_return_type != "void" {
            pieces.push(self.primary_expression(registry));
        }
        for output in self.output_parameters() {
            let length = output
                .ty
                .is_array
                .then(|| self.paired_length(&output.name))
                .flatten();
            pieces.push(output.out_conversion(length.as_deref()));
        }

        let statement = match pieces.len() {
            0 => "Ok(())".to_owned(),
            1 => format!("Ok({})", pieces.remove(0)),
            _ => format!("Ok(({}))", pieces.join(", ")),
        };
        vec![statement]
    }

    /// The expression for the native return value, converted outward when
    /// the registry knows how.
    fn primary_expression(&self, registry: &ConversionRegistry) -> String {
        registry
            .lookup(&self.inner_return_type)
            .and_then(|c| c.to_host_expr("inner_call_result"))
            .unwrap_or_else(|| "inner_call_result".to_owned())
    }

    /// The length slot paired with an array output: the first following
    /// integer output, else the last integer output in the function.
    fn paired_length(&self, array_name: &str) -> Option<String> {
        let position = self.parameters.iter().position(|p| p.name == array_name)?;
        let is_length = |p: &&Parameter| {
            p.output && !p.ty.is_array && LENGTH_HOST_TYPES.contains(&p.ty.host_type.as_str())
        };

        self.parameters[position + 1..]
            .iter()
            .filter(is_length)
            .map(|p| p.name.clone())
            .next()
            .or_else(|| {
                self.parameters
                    .iter()
                    .filter(is_length)
                    .next_back()
                    .map(|p| p.name.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(declaration: Declaration) -> Function {
        build_with(&CuratedTables::new(), declaration)
    }

    fn build_with(tables: &CuratedTables, declaration: Declaration) -> Function {
        Function::from_declaration(&ConversionRegistry::standard(), tables, &declaration)
    }

    fn render(function: &Function) -> String {
        function.render(&ConversionRegistry::standard(), Visibility::Public)
    }

    #[test]
    fn plain_function_returns_primary_alone() {
        let function = build(Declaration::from_components(
            "temporal_copy",
            "Temporal *",
            "const Temporal *temp",
        ));
        let text = render(&function);
        assert_eq!(
            text,
            "pub fn temporal_copy(temp: *const ffi::Temporal) -> MeosResult<*mut ffi::Temporal> {\n\
             \x20   let temp_converted = temp;\n\
             \x20   let inner_call_result = unsafe { ffi::temporal_copy(temp_converted) };\n\
             \x20   check_error()?;\n\
             \x20   Ok(inner_call_result)\n\
             }"
        );
    }

    #[test]
    fn void_function_returns_unit() {
        let function = build(Declaration::from_components("meos_finalize", "void", "void"));
        let text = render(&function);
        assert!(text.contains("-> MeosResult<()>"));
        assert!(text.contains("unsafe { ffi::meos_finalize() };"));
        assert!(!text.contains("inner_call_result"));
        assert!(text.contains("Ok(())"));
    }

    #[test]
    fn string_return_converts_outward() {
        let function = build(Declaration::from_components(
            "date_out",
            "char *",
            "DateADT d",
        ));
        let text = render(&function);
        assert!(text.contains("-> MeosResult<String>"));
        assert!(text.contains("let d_converted = date_to_date_adt(d);"));
        assert!(text.contains(
            "Ok(unsafe { CStr::from_ptr(inner_call_result) }.to_string_lossy().into_owned())"
        ));
    }

    #[test]
    fn output_parameter_widens_return_to_tuple() {
        let function = build(Declaration::from_components(
            "foo",
            "int",
            "const char * s, int * count",
        ));
        let text = render(&function);
        assert!(text.contains("pub fn foo(s: &str) -> MeosResult<(i32, i32)> {"));
        assert!(text.contains("let s_converted = CString::new(s)?;"));
        assert!(text.contains("let mut count_converted = MaybeUninit::<i32>::uninit();"));
        assert!(text.contains(
            "let inner_call_result = unsafe { ffi::foo(s_converted.as_ptr(), count_converted.as_mut_ptr()) };"
        ));
        assert!(text.contains("check_error()?;"));
        assert!(text.contains(
            "Ok((inner_call_result, unsafe { count_converted.assume_init() }))"
        ));
    }

    #[test]
    fn result_parameter_becomes_primary_with_empty_signature() {
        let function = build(Declaration::from_components("bar", "void", "Result * result"));
        let text = render(&function);
        assert!(text.contains("pub fn bar() -> MeosResult<ffi::Result> {"));
        assert!(text.contains("let mut result_converted = MaybeUninit::<ffi::Result>::uninit();"));
        // The native return is void, so nothing binds the call.
        assert!(text.contains("unsafe { ffi::bar(result_converted.as_mut_ptr()) };"));
        assert!(text.contains("Ok(unsafe { result_converted.assume_init() })"));
    }

    #[test]
    fn result_and_output_order_primary_first() {
        let mut tables = CuratedTables::new();
        tables.mark_result("tfloat_value_at_timestamptz", "value");
        let function = build_with(
            &tables,
            Declaration::from_components(
                "tfloat_value_at_timestamptz",
                "bool",
                "const Temporal *temp, TimestampTz t, bool strict, double *value, int *count",
            ),
        );
        let text = render(&function);
        // Inner tuple: result slot first, then the output, in declared order.
        assert!(text.contains("-> MeosResult<(f64, i32)>"));
        assert!(text.contains(
            "Ok((unsafe { value_converted.assume_init() }, unsafe { count_converted.assume_init() }))"
        ));
        // The non-void native return is discarded: the result slot wins.
        assert!(!text.contains("inner_call_result"));
    }

    #[test]
    fn array_output_reads_through_its_count_slot() {
        let mut tables = CuratedTables::new();
        tables
            .mark_output("temporal_time_split", "time_buckets")
            .mark_output("temporal_time_split", "count");
        let function = build_with(
            &tables,
            Declaration::from_components(
                "temporal_time_split",
                "Temporal **",
                "Temporal *temp, Interval *duration, TimestampTz torigin, TimestampTz **time_buckets, int *count",
            ),
        );
        let text = render(&function);
        assert!(text.contains("-> MeosResult<(*mut *mut ffi::Temporal, Vec<DateTime<Utc>>, i32)>"));
        assert!(text.contains("(0..unsafe { count_converted.assume_init() } as usize)"));
        assert!(text.contains("timestamptz_to_datetime(unsafe { *time_buckets_converted.assume_init().add(i) })"));
    }

    #[test]
    fn result_slot_with_pointer_indirection_converts_outward() {
        let function = build(Declaration::from_components(
            "textset_value_n",
            "bool",
            "const Set *s, int n, text **result",
        ));
        let text = render(&function);
        assert!(text.contains("-> MeosResult<String>"));
        assert!(text.contains("let mut result_converted = MaybeUninit::<*mut ffi::text>::uninit();"));
        assert!(text.contains("Ok(text2cstring(unsafe { result_converted.assume_init() })?)"));
    }

    #[test]
    fn stripped_error_check_omits_the_statement() {
        let mut function = build(Declaration::from_components("meos_finalize", "void", "void"));
        function.error_check = false;
        let text = render(&function);
        assert!(!text.contains("check_error"));
    }

    #[test]
    fn hidden_visibility_renders_pub_crate() {
        let function = build(Declaration::from_components(
            "text2cstring",
            "char *",
            "text *textptr",
        ));
        let text = function.render(&ConversionRegistry::standard(), Visibility::Crate);
        assert!(text.starts_with("pub(crate) fn text2cstring("));
    }
}
