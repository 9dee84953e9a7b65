//! The declaration triple fed into generation.

/// One native function declaration: name, return type spelling, and the
/// parameter list as raw `"<type> <name>"` fragments.
///
/// A nullary declaration (`void` parameter list in the header) carries an
/// empty `parameters` vector. Pointer stars may still be glued to the
/// parameter name at this stage (`char *str`); splitting spelling from name
/// is the parameter model's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<String>,
}

impl Declaration {
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters,
        }
    }

    /// Build a declaration from a comma-joined parameter list, the shape the
    /// upstream feed uses. `"void"` denotes zero parameters.
    pub fn from_components(name: &str, return_type: &str, params: &str) -> Self {
        let parameters = params
            .split(", ")
            .filter(|p| !p.is_empty() && *p != "void")
            .map(str::to_owned)
            .collect();
        Self {
            name: name.to_owned(),
            return_type: return_type.to_owned(),
            parameters,
        }
    }
}
