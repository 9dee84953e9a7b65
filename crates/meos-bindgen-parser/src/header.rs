//! Scanner extracting `extern` function declarations from C header text.
//!
//! The header is assumed preprocessed (no `#include` expansion needed); the
//! scanner strips comments, finds statements introduced by `extern`, and
//! splits each into a name, a return-type spelling, and raw
//! `"<type> <name>"` parameter fragments. Declarations the wrapper model
//! cannot express at all are left out of the feed rather than rejected:
//! variadic functions and inline function-pointer parameters (a typedef'd
//! function-pointer type passes through like any other opaque spelling).

use meos_bindgen_core::Declaration;
use thiserror::Error;

/// Categories of feed errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A block comment was not terminated before end of input.
    UnterminatedComment,
    /// An `extern` statement ended without a `;`.
    UnterminatedDeclaration,
    /// A declaration has no parameter list.
    MissingParameterList,
    /// The parenthesis nesting in a declaration does not balance.
    MismatchedParenthesis,
    /// No function name before the parameter list.
    MissingName,
    /// A parameter fragment is empty or lacks a name.
    InvalidParameter,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::UnterminatedComment => "unterminated comment",
            ParseErrorKind::UnterminatedDeclaration => "unterminated declaration",
            ParseErrorKind::MissingParameterList => "missing parameter list",
            ParseErrorKind::MismatchedParenthesis => "mismatched parenthesis",
            ParseErrorKind::MissingName => "missing function name",
            ParseErrorKind::InvalidParameter => "invalid parameter",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A malformed declaration in the feed, with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: {detail}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
    pub detail: String,
}

impl ParseError {
    fn new(line: usize, kind: ParseErrorKind, detail: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            detail: detail.into(),
        }
    }
}

/// Extract every wrappable `extern` declaration from header text, in
/// declaration order.
pub fn parse_header(source: &str) -> Result<Vec<Declaration>, ParseError> {
    let stripped = strip_comments(source)?;
    let mut declarations = Vec::new();

    for (line, statement) in extern_statements(&stripped)? {
        if let Some(declaration) = parse_extern(line, &statement)? {
            declarations.push(declaration);
        }
    }

    Ok(declarations)
}

/// Replace `//` and `/* */` comments with spaces, preserving newlines so
/// line numbers stay accurate.
fn strip_comments(source: &str) -> Result<String, ParseError> {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut line = 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                line += 1;
                out.push('\n');
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start_line = line;
                i += 2;
                loop {
                    if i + 1 >= bytes.len() {
                        return Err(ParseError::new(
                            start_line,
                            ParseErrorKind::UnterminatedComment,
                            "block comment reaches end of input",
                        ));
                    }
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    if bytes[i] == b'\n' {
                        line += 1;
                        out.push('\n');
                    }
                    i += 1;
                }
                out.push(' ');
            }
            b => {
                out.push(b as char);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Collect `extern` statements, joining continuation lines until the
/// terminating `;`. Returns each statement with its starting line number.
fn extern_statements(source: &str) -> Result<Vec<(usize, String)>, ParseError> {
    let mut statements = Vec::new();
    let mut lines = source.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line = index + 1;
        let trimmed = raw.trim();
        if !trimmed.starts_with("extern ") {
            continue;
        }
        // Foreign-linkage markers (`extern "C"`, cffi callback stubs) are
        // not library exports.
        if trimmed.starts_with("extern \"") {
            continue;
        }

        let mut statement = trimmed.to_owned();
        while !statement.contains(';') {
            match lines.next() {
                Some((_, continuation)) => {
                    statement.push(' ');
                    statement.push_str(continuation.trim());
                }
                None => {
                    return Err(ParseError::new(
                        line,
                        ParseErrorKind::UnterminatedDeclaration,
                        statement,
                    ));
                }
            }
        }
        if let Some(end) = statement.find(';') {
            statement.truncate(end);
        }
        statements.push((line, statement));
    }

    Ok(statements)
}

/// Parse one `extern ...;` statement into a declaration.
///
/// Returns `Ok(None)` for declarations deliberately left out of the feed:
/// variadics and inline function-pointer parameters.
fn parse_extern(line: usize, statement: &str) -> Result<Option<Declaration>, ParseError> {
    let body = statement
        .strip_prefix("extern")
        .unwrap_or(statement)
        .trim();

    let open = body.find('(').ok_or_else(|| {
        ParseError::new(line, ParseErrorKind::MissingParameterList, body)
    })?;
    // A '(' before the name means an inline function-pointer return or a
    // data declaration; neither is wrappable.
    let (head, rest) = body.split_at(open);
    let close = matching_paren(rest).ok_or_else(|| {
        ParseError::new(line, ParseErrorKind::MismatchedParenthesis, body)
    })?;
    let params_src = &rest[1..close];

    let (return_type, name) = split_head(line, head)?;

    if params_src.contains('(') {
        // Inline function-pointer parameter: outside the model.
        return Ok(None);
    }
    if params_src.contains("...") {
        // Variadic: cannot be wrapped.
        return Ok(None);
    }

    let mut parameters = Vec::new();
    let trimmed_params = normalize_spaces(params_src);
    if !(trimmed_params.is_empty() || trimmed_params == "void") {
        for fragment in trimmed_params.split(',') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                return Err(ParseError::new(
                    line,
                    ParseErrorKind::InvalidParameter,
                    format!("empty parameter in {name}"),
                ));
            }
            if !fragment.contains(' ') {
                return Err(ParseError::new(
                    line,
                    ParseErrorKind::InvalidParameter,
                    format!("parameter `{fragment}` of {name} has no name"),
                ));
            }
            parameters.push(fragment.to_owned());
        }
    }

    Ok(Some(Declaration::new(name, return_type, parameters)))
}

/// Split the text before the parameter list into return-type spelling and
/// function name, re-gluing pointer stars to the return type.
fn split_head(line: usize, head: &str) -> Result<(String, String), ParseError> {
    let head = normalize_spaces(head);
    let mut tokens: Vec<&str> = head.split(' ').collect();
    let last = tokens.pop().filter(|t| !t.is_empty()).ok_or_else(|| {
        ParseError::new(line, ParseErrorKind::MissingName, head.clone())
    })?;

    let name = last.trim_start_matches('*');
    if name.is_empty() || tokens.is_empty() {
        return Err(ParseError::new(line, ParseErrorKind::MissingName, head.clone()));
    }
    let glued_stars = last.len() - name.len();

    let mut return_type = tokens.join(" ");
    for _ in 0..glued_stars {
        return_type.push_str(" *");
    }

    Ok((return_type, name.to_owned()))
}

fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_declaration() {
        let decls = parse_header("extern char *date_out(DateADT d);").unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "date_out");
        assert_eq!(decls[0].return_type, "char *");
        assert_eq!(decls[0].parameters, vec!["DateADT d"]);
    }

    #[test]
    fn parses_multi_parameter_declaration() {
        let decls =
            parse_header("extern Interval *interval_in(const char *str, int32 typmod);").unwrap();
        assert_eq!(decls[0].parameters, vec!["const char *str", "int32 typmod"]);
    }

    #[test]
    fn void_parameter_list_is_empty() {
        let decls = parse_header("extern void meos_finalize(void);").unwrap();
        assert!(decls[0].parameters.is_empty());
        let decls = parse_header("extern void meos_finalize();").unwrap();
        assert!(decls[0].parameters.is_empty());
    }

    #[test]
    fn joins_continuation_lines() {
        let source = "extern bool temporal_bbox_eq(const void *box1, const void *box2,\n  uint8_t temptype);\n";
        let decls = parse_header(source).unwrap();
        assert_eq!(decls[0].name, "temporal_bbox_eq");
        assert_eq!(
            decls[0].parameters,
            vec!["const void *box1", "const void *box2", "uint8_t temptype"]
        );
    }

    #[test]
    fn skips_typedefs_structs_and_comments() {
        let source = r#"
typedef int32 DateADT;
typedef struct varlena { char vl_len_[4]; char vl_dat[]; } varlena;
/* block
   comment with extern void fake(void); inside */
// extern void also_fake(void);
extern int interval_cmp(const Interval *interv1, const Interval *interv2);
"#;
        let decls = parse_header(source).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "interval_cmp");
    }

    #[test]
    fn skips_foreign_linkage_stubs() {
        let source = "extern \"Python\" void py_error_handler(int, int, char*);\nextern void meos_finalize(void);\n";
        let decls = parse_header(source).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "meos_finalize");
    }

    #[test]
    fn leaves_out_variadics() {
        let source =
            "extern void meos_error(int errlevel, int errcode, const char *format, ...);\n";
        assert!(parse_header(source).unwrap().is_empty());
    }

    #[test]
    fn leaves_out_inline_function_pointers() {
        let source = "extern SkipList *skiplist_make(size_t key_size, size_t value_size, int (*comp_fn)(void *, void *));\n";
        assert!(parse_header(source).unwrap().is_empty());
    }

    #[test]
    fn typedefd_function_pointer_type_passes_through() {
        let source =
            "extern void meos_initialize_error_handler(error_handler_fn err_handler);\n";
        let decls = parse_header(source).unwrap();
        assert_eq!(decls[0].parameters, vec!["error_handler_fn err_handler"]);
    }

    #[test]
    fn double_pointer_spellings_survive() {
        let decls =
            parse_header("extern Set *textset_make(const text **values, int count);").unwrap();
        assert_eq!(decls[0].parameters, vec!["const text **values", "int count"]);
    }

    #[test]
    fn reports_unterminated_declaration_with_line() {
        let err = parse_header("typedef int x;\nextern void broken(int a").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedDeclaration);
    }

    #[test]
    fn reports_unnamed_parameter() {
        let err = parse_header("extern void f(int);").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidParameter);
    }

    #[test]
    fn reports_unterminated_comment() {
        let err = parse_header("/* never closed").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedComment);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let source = "extern void b(void);\nextern void a(void);\n";
        let decls = parse_header(source).unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
