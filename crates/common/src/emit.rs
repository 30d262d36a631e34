//! Building blocks for emitted code

use std::fmt;

use oxc_syntax::identifier::is_identifier_name;

use crate::classify::{Classification, StaticValue};
use crate::error::{CompileError, Result};
use crate::expression::{format_number, js_string};
use crate::hole::{HoleValue, MergeGroup};
use crate::jsx::{ExprNode, ExprShape, JsxNode};
use crate::props::print_key;

/// The target-specific side of code generation.
///
/// Shared printing code calls back into the active target to compile nested
/// JSX and to record which runtime helpers the output uses.
pub trait EmitHost {
    /// Compile a JSX node into an expression
    fn compile_node(&mut self, node: &JsxNode) -> Result<String>;

    /// Record a runtime helper import
    fn use_helper(&mut self, name: &'static str);
}

/// Generated code plus the source offsets its pieces came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emitted {
    pub code: String,
    /// `(offset in code, offset in source)`, in ascending code order
    pub marks: Vec<(usize, u32)>,
}

impl Emitted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code whose first character maps to `origin`
    pub fn mapped(code: impl Into<String>, origin: u32) -> Self {
        Self { code: code.into(), marks: vec![(0, origin)] }
    }

    /// Map the next written character back to `origin`
    pub fn mark(&mut self, origin: u32) {
        if self.marks.last().is_some_and(|(at, _)| *at == self.code.len()) {
            self.marks.pop();
        }
        self.marks.push((self.code.len(), origin));
    }

    pub fn push_str(&mut self, code: &str) {
        self.code.push_str(code);
    }

    pub fn append(&mut self, other: Emitted) {
        let base = self.code.len();
        self.code.push_str(&other.code);
        self.marks.extend(other.marks.into_iter().map(|(at, origin)| (base + at, origin)));
    }
}

impl fmt::Write for Emitted {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.code.push_str(s);
        Ok(())
    }
}

/// Source text of an expression with its nested JSX compiled in place
pub fn render_expr(expr: &ExprNode, host: &mut dyn EmitHost) -> Result<String> {
    let mut code = String::with_capacity(expr.text.len());
    let mut cursor = 0usize;
    for node in &expr.nested {
        let span = node.span();
        let start = span.start.checked_sub(expr.span.start).map(|s| s as usize);
        let end = span.end.checked_sub(expr.span.start).map(|e| e as usize);
        let (Some(start), Some(end)) = (start, end) else {
            return Err(CompileError::invariant("nested JSX starts before its expression"));
        };
        if start < cursor || end > expr.text.len() {
            return Err(CompileError::invariant("nested JSX outside its expression"));
        }
        code.push_str(&expr.text[cursor..start]);
        code.push_str(&host.compile_node(node)?);
        cursor = end;
    }
    code.push_str(&expr.text[cursor..]);

    if matches!(expr.shape, ExprShape::Sequence) {
        code = format!("({code})");
    }
    Ok(code)
}

/// A zero-argument function producing the expression's current value.
/// A bare `count()` read is passed as `count` itself.
pub fn render_accessor(expr: &ExprNode, host: &mut dyn EmitHost) -> Result<String> {
    if let ExprShape::AccessorCall(name) = &expr.shape {
        if expr.nested.is_empty() {
            return Ok(name.clone());
        }
    }
    let code = render_expr(expr, host)?;
    Ok(arrow(&code))
}

/// `() => code`, parenthesizing object literals
pub fn arrow(code: &str) -> String {
    if code.trim_start().starts_with('{') {
        format!("() => ({code})")
    } else {
        format!("() => {code}")
    }
}

/// A JavaScript literal for a compile-time value
pub fn render_static(value: &StaticValue) -> String {
    match value {
        StaticValue::Str(s) => js_string(s),
        StaticValue::Num(n) => format_number(*n),
        StaticValue::Bool(b) => b.to_string(),
        StaticValue::Null => "null".to_string(),
    }
}

/// The plain value of a hole, evaluated once where it is spliced
pub fn render_value(value: &HoleValue, host: &mut dyn EmitHost) -> Result<String> {
    match value {
        HoleValue::Expr(expr) => render_expr(expr, host),
        HoleValue::Static(value) => Ok(render_static(value)),
        HoleValue::Node(node) => host.compile_node(node),
        HoleValue::Merge(_) | HoleValue::Spread(_) => {
            Err(CompileError::invariant("merged values have no single expression"))
        }
    }
}

/// The value of a hole as an accessor when it is reactive, otherwise plain
pub fn render_tracked(value: &HoleValue, class: Classification, host: &mut dyn EmitHost) -> Result<String> {
    match (value, class) {
        (HoleValue::Expr(expr), Classification::Reactive) => render_accessor(expr, host),
        _ => render_value(value, host),
    }
}

/// `object.key`, or `object["key"]` when the key is not an identifier
pub fn member(object: &str, key: &str) -> String {
    if is_identifier_name(key) {
        format!("{object}.{key}")
    } else {
        format!("{object}[{}]", js_string(key))
    }
}

/// Arguments of a class or style merge: the folded static text, whole
/// values, then per-name entries as one object
pub fn merge_args(group: &MergeGroup, separator: &str, host: &mut dyn EmitHost) -> Result<Vec<String>> {
    let mut args = Vec::new();
    if !group.statics.is_empty() {
        args.push(js_string(&group.statics.join(separator)));
    }
    for base in &group.bases {
        args.push(render_expr(base, host)?);
    }
    if !group.entries.is_empty() {
        let mut entries = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            entries.push(format!("{}: {}", print_key(&entry.name), render_value(&entry.value, host)?));
        }
        args.push(format!("{{ {} }}", entries.join(", ")));
    }
    Ok(args)
}

/// Call `callee` with `args`, parenthesizing callees that are not plain names
pub fn call(callee: &str, args: &str) -> String {
    let plain = callee
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
    if plain {
        format!("{callee}({args})")
    } else {
        format!("({callee})({args})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_shift_on_append() {
        let mut out = Emitted::mapped("a;", 10);
        out.append(Emitted::mapped("b;", 20));
        assert_eq!(out.code, "a;b;");
        assert_eq!(out.marks, vec![(0, 10), (2, 20)]);
    }

    #[test]
    fn test_mark_replaces_mark_at_same_offset() {
        let mut out = Emitted::new();
        out.mark(1);
        out.mark(2);
        assert_eq!(out.marks, vec![(0, 2)]);
    }

    #[test]
    fn test_arrow_wraps_objects() {
        assert_eq!(arrow("a() + 1"), "() => a() + 1");
        assert_eq!(arrow("{ a: b() }"), "() => ({ a: b() })");
    }

    #[test]
    fn test_member_quotes_non_identifiers() {
        assert_eq!(member("_el$1", "$$click"), "_el$1.$$click");
        assert_eq!(member("_el$1", "my-prop"), r#"_el$1["my-prop"]"#);
    }

    #[test]
    fn test_call_parenthesizes_inline_functions() {
        assert_eq!(call("setRef", "_el$1"), "setRef(_el$1)");
        assert_eq!(call("props.ref", "_el$1"), "props.ref(_el$1)");
        assert_eq!(call("el => (node = el)", "_el$1"), "(el => (node = el))(_el$1)");
    }
}
