//! Static/dynamic classification of JSX expressions and subtrees
//!
//! Reactivity is detected syntactically: a zero-argument call on a bare
//! identifier (`count()`) is read as a reactive cell access. Zero-argument
//! calls on anything else (`store.count()`) cannot be told apart from
//! ordinary method calls and are reported as ambiguous. Source comments
//! override the heuristic in either direction.

use oxc_ast::ast::{
    ArrowFunctionExpression, CallExpression, Class, Expression, Function, JSXElement, JSXFragment,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use oxc_syntax::operator::UnaryOperator;
use oxc_syntax::scope::ScopeFlags;

use crate::attrs::is_inlinable;
use crate::expression::format_number;
use crate::jsx::{ElementNode, JsxAttr, JsxNode};
use crate::options::TransformOptions;

/// How often a value has to be read. Ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    /// Known at compile time; inlined into markup
    Static,
    /// Evaluated once when the template is instantiated
    Dynamic,
    /// Reads a reactive cell; re-evaluated whenever it changes
    Reactive,
}

/// A compile-time constant
#[derive(Debug, Clone, PartialEq)]
pub enum StaticValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl StaticValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Num(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
            Self::Null => false,
        }
    }

    /// Text this value renders as inside markup, if it renders at all
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Num(n) => Some(format_number(*n)),
            Self::Bool(_) | Self::Null => None,
        }
    }
}

/// Evaluate an expression that is a compile-time constant
pub fn static_value(expr: &Expression<'_>) -> Option<StaticValue> {
    match expr {
        Expression::StringLiteral(lit) => Some(StaticValue::Str(lit.value.to_string())),
        Expression::NumericLiteral(lit) => Some(StaticValue::Num(lit.value)),
        Expression::BooleanLiteral(lit) => Some(StaticValue::Bool(lit.value)),
        Expression::NullLiteral(_) => Some(StaticValue::Null),
        Expression::TemplateLiteral(t) if t.expressions.is_empty() => t
            .quasis
            .first()
            .and_then(|q| q.value.cooked.as_ref())
            .map(|cooked| StaticValue::Str(cooked.to_string())),
        Expression::ParenthesizedExpression(p) => static_value(&p.expression),
        Expression::UnaryExpression(u) => {
            let value = static_value(&u.argument)?;
            match (u.operator, value) {
                (UnaryOperator::UnaryNegation, StaticValue::Num(n)) => Some(StaticValue::Num(-n)),
                (UnaryOperator::UnaryPlus, StaticValue::Num(n)) => Some(StaticValue::Num(n)),
                (UnaryOperator::LogicalNot, value) => Some(StaticValue::Bool(!value.is_truthy())),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Result of classifying one expression
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionClass {
    pub class: Classification,
    /// Zero-argument calls the heuristic could not decide on
    pub ambiguous: Vec<Span>,
}

/// Classify an expression. Never returns `Static` for an expression
/// containing a reactive read.
pub fn classify_expression(expr: &Expression<'_>) -> ExpressionClass {
    if static_value(expr).is_some() {
        return ExpressionClass { class: Classification::Static, ambiguous: vec![] };
    }
    let mut reads = ReactiveReads::default();
    reads.visit_expression(expr);
    let class = if reads.found { Classification::Reactive } else { Classification::Dynamic };
    let ambiguous = if reads.found { vec![] } else { reads.ambiguous };
    ExpressionClass { class, ambiguous }
}

/// Apply a `{/* @once */ ...}` or `{/* @reactive */ ...}` annotation found in
/// the text preceding an expression inside its container.
pub fn apply_annotation(
    class: Classification,
    leading: &str,
    options: &TransformOptions,
) -> Classification {
    if !leading.contains("/*") && !leading.contains("//") {
        return class;
    }
    if !options.reactive_marker.is_empty() && leading.contains(options.reactive_marker.as_str()) {
        Classification::Reactive
    } else if !options.static_marker.is_empty() && leading.contains(options.static_marker.as_str()) {
        class.min(Classification::Dynamic)
    } else {
        class
    }
}

/// Finds reactive reads outside of nested functions and nested JSX.
#[derive(Default)]
struct ReactiveReads {
    found: bool,
    ambiguous: Vec<Span>,
}

impl<'a> Visit<'a> for ReactiveReads {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if call.arguments.is_empty() {
            match call.callee.without_parentheses() {
                Expression::Identifier(_) => self.found = true,
                Expression::StaticMemberExpression(_)
                | Expression::ComputedMemberExpression(_)
                | Expression::PrivateFieldExpression(_) => self.ambiguous.push(call.span()),
                _ => {}
            }
        }
        walk::walk_call_expression(self, call);
    }

    // Function bodies run later, under whatever scope calls them
    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}

    // Nested JSX is compiled and classified on its own
    fn visit_jsx_element(&mut self, _it: &JSXElement<'a>) {}

    fn visit_jsx_fragment(&mut self, _it: &JSXFragment<'a>) {}
}

/// Whether a subtree compiles to pure markup, with no holes at all
pub fn is_static_subtree(node: &JsxNode) -> bool {
    match node {
        JsxNode::Text(_) => true,
        JsxNode::Expression(expr) => expr.class == Classification::Static,
        JsxNode::Element(element) => is_static_element(element),
        JsxNode::Fragment(fragment) => fragment.children.iter().all(is_static_subtree),
        JsxNode::Component(_) | JsxNode::Spread(_) => false,
    }
}

pub fn is_static_element(element: &ElementNode) -> bool {
    element.attrs.iter().all(|attr| match attr {
        JsxAttr::Named(named) => is_inlinable(named),
        JsxAttr::Spread(_) => false,
    }) && element.children.iter().all(is_static_subtree)
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use super::*;

    fn classify(source: &str) -> ExpressionClass {
        let allocator = Allocator::default();
        let expr = Parser::new(&allocator, source, SourceType::tsx())
            .parse_expression()
            .unwrap();
        classify_expression(&expr)
    }

    #[test]
    fn test_literals_are_static() {
        for source in [r#""a""#, "1", "-1", "true", "null", "`plain`", "(2)", "!0"] {
            assert_eq!(classify(source).class, Classification::Static, "{source}");
        }
    }

    #[test]
    fn test_plain_expressions_are_dynamic() {
        for source in ["a", "a.b", "`x${y}`", "a + 1", "() => count()", "fn(1)", "cond ? a : b"] {
            assert_eq!(classify(source).class, Classification::Dynamic, "{source}");
        }
    }

    #[test]
    fn test_reactive_reads() {
        for source in ["count()", "count() + 1", "user().name", "`${a()}px`", "fn(count())", "!visible()"] {
            assert_eq!(classify(source).class, Classification::Reactive, "{source}");
        }
    }

    #[test]
    fn test_nested_functions_are_not_read() {
        assert_eq!(classify("items.map(i => i())").class, Classification::Dynamic);
        assert_eq!(classify("function () { return a(); }").class, Classification::Dynamic);
    }

    #[test]
    fn test_member_calls_are_ambiguous() {
        let result = classify("store.count()");
        assert_eq!(result.class, Classification::Dynamic);
        assert_eq!(result.ambiguous.len(), 1);

        let result = classify("store.count() + count()");
        assert_eq!(result.class, Classification::Reactive);
        assert!(result.ambiguous.is_empty());
    }

    #[test]
    fn test_annotations() {
        let options = TransformOptions::default();
        assert_eq!(
            apply_annotation(Classification::Reactive, "/* @once */ ", &options),
            Classification::Dynamic
        );
        assert_eq!(
            apply_annotation(Classification::Dynamic, "/* @reactive */ ", &options),
            Classification::Reactive
        );
        assert_eq!(apply_annotation(Classification::Static, "/* @once */", &options), Classification::Static);
        assert_eq!(apply_annotation(Classification::Dynamic, " ", &options), Classification::Dynamic);
    }

    #[test]
    fn test_reactive_is_never_static() {
        // Any expression that reads a cell must not be inlined
        for source in ["a()", "(a())", "!a()", "-a()", "[a()]", "{ x: a() }", "a() ? 1 : 2"] {
            assert_ne!(classify(source).class, Classification::Static, "{source}");
        }
    }
}
