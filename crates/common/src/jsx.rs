//! Owned JSX tree lowered from the oxc AST
//!
//! Every later stage works on [`JsxNode`]s, which carry their own source text
//! and classification, so the arena-backed AST never leaves this module.

use oxc_ast::ast::{
    ArrayExpressionElement, Expression, IdentifierReference, JSXAttributeItem, JSXAttributeName,
    JSXAttributeValue, JSXChild, JSXElement, JSXExpression, JSXFragment, ObjectPropertyKind,
    Program, PropertyKey, PropertyKind,
};
use oxc_ast_visit::Visit;
use oxc_semantic::Scoping;
use oxc_span::{GetSpan, Span};
use oxc_syntax::symbol::SymbolFlags;

use crate::check::{get_jsx_element_name, is_component};
use crate::classify::{apply_annotation, classify_expression, static_value, Classification, StaticValue};
use crate::constants::VOID_ELEMENTS;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::expression::{decode_entities, format_number, trim_jsx_text};
use crate::options::TransformOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum JsxNode {
    Element(ElementNode),
    Fragment(FragmentNode),
    Component(ComponentNode),
    Expression(ExprNode),
    Text(TextNode),
    /// `{...items}` as a child
    Spread(ExprNode),
}

impl JsxNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(n) => n.span,
            Self::Fragment(n) => n.span,
            Self::Component(n) => n.span,
            Self::Expression(n) | Self::Spread(n) => n.span,
            Self::Text(n) => n.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: Vec<JsxAttr>,
    pub children: Vec<JsxNode>,
    pub span: Span,
}

impl ElementNode {
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(self.tag.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentNode {
    pub children: Vec<JsxNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// Tag as written, e.g. `Button` or `ui.Button`
    pub tag: String,
    pub props: Vec<JsxAttr>,
    pub children: Vec<JsxNode>,
    pub span: Span,
}

/// Text child after whitespace trimming and entity decoding
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttr {
    Named(NamedAttr),
    Spread(ExprNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedAttr {
    pub namespace: Option<String>,
    pub name: String,
    pub value: AttrValue,
    pub span: Span,
}

impl NamedAttr {
    /// Name as written, including any namespace
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn class(&self) -> Classification {
        match &self.value {
            AttrValue::Implicit | AttrValue::Literal(_) => Classification::Static,
            AttrValue::Expr(expr) => expr.class,
            AttrValue::Element(_) => Classification::Dynamic,
        }
    }

    /// The value, when it is known at compile time
    pub fn static_value(&self) -> Option<StaticValue> {
        match &self.value {
            AttrValue::Implicit => Some(StaticValue::Bool(true)),
            AttrValue::Literal(s) => Some(StaticValue::Str(s.clone())),
            AttrValue::Expr(expr) => expr.static_value().cloned(),
            AttrValue::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `<input disabled />`
    Implicit,
    /// `title="x"`, entities decoded
    Literal(String),
    Expr(ExprNode),
    /// `icon={<Icon />}` written without braces
    Element(Box<JsxNode>),
}

/// An embedded JavaScript expression
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub span: Span,
    /// Source text of the expression
    pub text: String,
    pub class: Classification,
    pub shape: ExprShape,
    /// Outermost JSX inside the expression, compiled separately and spliced
    /// back into `text`
    pub nested: Vec<JsxNode>,
}

impl ExprNode {
    pub fn static_value(&self) -> Option<&StaticValue> {
        match &self.shape {
            ExprShape::Literal(value) if self.class == Classification::Static => Some(value),
            _ => None,
        }
    }

    /// Whether evaluating the expression twice is harmless
    pub fn is_plain_identifier(&self) -> bool {
        matches!(self.shape, ExprShape::Identifier { .. }) && self.nested.is_empty()
    }
}

/// Syntactic forms the emitters care about
#[derive(Debug, Clone, PartialEq)]
pub enum ExprShape {
    Literal(StaticValue),
    /// `count()`: a zero-argument call on a bare identifier
    AccessorCall(String),
    /// Arrow function or function expression
    Function,
    /// Array literal; element source texts
    Array(Vec<String>),
    /// Object literal with plain keys
    Object(Vec<ObjectEntry>),
    Identifier { name: String, writable: bool },
    Member,
    /// `a, b` needs parentheses wherever it is spliced
    Sequence,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    pub value: ExprNode,
}

/// Lowers oxc JSX nodes into [`JsxNode`]s, classifying expressions on the way.
pub struct Lowering<'s, 'c> {
    source: &'s str,
    options: &'s TransformOptions,
    scoping: &'s Scoping,
    sink: &'c mut dyn DiagnosticSink,
    /// Object literal values are lowered a second time; their diagnostics
    /// were already reported for the enclosing expression
    muted: usize,
}

impl<'s, 'c> Lowering<'s, 'c> {
    pub fn new(
        source: &'s str,
        options: &'s TransformOptions,
        scoping: &'s Scoping,
        sink: &'c mut dyn DiagnosticSink,
    ) -> Self {
        Self { source, options, scoping, sink, muted: 0 }
    }

    /// Lower every outermost JSX expression in the program, in source order
    pub fn collect_roots(&mut self, program: &Program<'_>) -> Vec<JsxNode> {
        let mut collector = JsxCollector { lowering: self, found: vec![] };
        collector.visit_program(program);
        collector.found
    }

    pub fn lower_element(&mut self, element: &JSXElement<'_>) -> JsxNode {
        let tag = get_jsx_element_name(&element.opening_element.name);
        let attrs = element
            .opening_element
            .attributes
            .iter()
            .filter_map(|item| self.lower_attribute(item))
            .collect();
        let mut children = self.lower_children(&element.children);

        if is_component(&tag) {
            return JsxNode::Component(ComponentNode { tag, props: attrs, children, span: element.span });
        }

        if VOID_ELEMENTS.contains(tag.as_str()) && !children.is_empty() {
            self.report(
                Diagnostic::warning(
                    DiagnosticKind::InvalidChildren,
                    element.span,
                    format!("<{tag}> is a void element and cannot have children"),
                )
                .with_help("Children of void elements are dropped"),
            );
            children.clear();
        }

        JsxNode::Element(ElementNode { tag, attrs, children, span: element.span })
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.muted == 0 {
            self.sink.report(diagnostic);
        }
    }

    pub fn lower_fragment(&mut self, fragment: &JSXFragment<'_>) -> JsxNode {
        let children = self.lower_children(&fragment.children);
        JsxNode::Fragment(FragmentNode { children, span: fragment.span })
    }

    fn lower_children(&mut self, children: &[JSXChild<'_>]) -> Vec<JsxNode> {
        children.iter().filter_map(|child| self.lower_child(child)).collect()
    }

    fn lower_child(&mut self, child: &JSXChild<'_>) -> Option<JsxNode> {
        match child {
            JSXChild::Text(text) => {
                let value = decode_entities(&trim_jsx_text(&text.value));
                (!value.is_empty()).then(|| JsxNode::Text(TextNode { value, span: text.span }))
            }
            JSXChild::Element(element) => Some(self.lower_element(element)),
            JSXChild::Fragment(fragment) => Some(self.lower_fragment(fragment)),
            JSXChild::ExpressionContainer(container) => match &container.expression {
                JSXExpression::EmptyExpression(_) => None,
                expression => {
                    let expr = expression.as_expression()?;
                    Some(JsxNode::Expression(self.lower_expression(expr, Some(container.span))))
                }
            },
            JSXChild::Spread(spread) => Some(JsxNode::Spread(self.lower_expression(&spread.expression, None))),
        }
    }

    fn lower_attribute(&mut self, item: &JSXAttributeItem<'_>) -> Option<JsxAttr> {
        let attr = match item {
            JSXAttributeItem::Attribute(attr) => attr,
            JSXAttributeItem::SpreadAttribute(spread) => {
                return Some(JsxAttr::Spread(self.lower_expression(&spread.argument, None)));
            }
        };

        let (namespace, name) = match &attr.name {
            JSXAttributeName::Identifier(id) => (None, id.name.to_string()),
            JSXAttributeName::NamespacedName(ns) => {
                (Some(ns.namespace.name.to_string()), ns.name.name.to_string())
            }
        };

        let value = match &attr.value {
            None => AttrValue::Implicit,
            Some(JSXAttributeValue::StringLiteral(lit)) => AttrValue::Literal(decode_entities(&lit.value)),
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                let expr = container.expression.as_expression()?;
                AttrValue::Expr(self.lower_expression(expr, Some(container.span)))
            }
            Some(JSXAttributeValue::Element(element)) => AttrValue::Element(Box::new(self.lower_element(element))),
            Some(JSXAttributeValue::Fragment(fragment)) => {
                AttrValue::Element(Box::new(self.lower_fragment(fragment)))
            }
        };

        Some(JsxAttr::Named(NamedAttr { namespace, name, value, span: attr.span }))
    }

    /// Lower an expression. `container` is the span of the enclosing `{...}`,
    /// whose leading comments may carry a classification annotation.
    pub fn lower_expression(&mut self, expr: &Expression<'_>, container: Option<Span>) -> ExprNode {
        let span = expr.span();
        let text = span.source_text(self.source).to_string();

        let classified = classify_expression(expr);
        let mut class = classified.class;
        if let Some(container) = container {
            let leading = Span::new(container.start + 1, span.start).source_text(self.source);
            class = apply_annotation(class, leading, self.options);
        }
        if class != Classification::Reactive {
            for call in classified.ambiguous {
                self.report(
                    Diagnostic::hint(
                        DiagnosticKind::ClassificationAmbiguity,
                        call,
                        format!(
                            "`{}` may read reactive state but is treated as a plain call",
                            call.source_text(self.source)
                        ),
                    )
                    .with_help(format!(
                        "Add `/* {} */` inside the braces if it should be tracked",
                        self.options.reactive_marker
                    )),
                );
            }
        }

        let shape = self.shape_of(expr);

        let mut collector = JsxCollector { lowering: self, found: vec![] };
        collector.visit_expression(expr);
        let nested = collector.found;

        ExprNode { span, text, class, shape, nested }
    }

    fn shape_of(&mut self, expr: &Expression<'_>) -> ExprShape {
        let inner = expr.without_parentheses();
        if let Some(value) = static_value(inner) {
            return ExprShape::Literal(value);
        }
        match inner {
            Expression::CallExpression(call) if call.arguments.is_empty() && !call.optional => {
                match &call.callee {
                    Expression::Identifier(id) => ExprShape::AccessorCall(id.name.to_string()),
                    _ => ExprShape::Other,
                }
            }
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => ExprShape::Function,
            Expression::ArrayExpression(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(_) | ArrayExpressionElement::Elision(_) => {
                            return ExprShape::Other;
                        }
                        _ => match element.as_expression() {
                            Some(e) => elements.push(e.span().source_text(self.source).to_string()),
                            None => return ExprShape::Other,
                        },
                    }
                }
                ExprShape::Array(elements)
            }
            Expression::ObjectExpression(object) => {
                let mut entries = Vec::with_capacity(object.properties.len());
                for property in &object.properties {
                    let ObjectPropertyKind::ObjectProperty(prop) = property else {
                        return ExprShape::Other;
                    };
                    if prop.computed || prop.method || !matches!(prop.kind, PropertyKind::Init) {
                        return ExprShape::Other;
                    }
                    let key = match &prop.key {
                        PropertyKey::StaticIdentifier(id) => id.name.to_string(),
                        PropertyKey::StringLiteral(lit) => lit.value.to_string(),
                        PropertyKey::NumericLiteral(lit) => format_number(lit.value),
                        _ => return ExprShape::Other,
                    };
                    self.muted += 1;
                    let value = self.lower_expression(&prop.value, None);
                    self.muted -= 1;
                    entries.push(ObjectEntry { key, value });
                }
                ExprShape::Object(entries)
            }
            Expression::Identifier(ident) => ExprShape::Identifier {
                name: ident.name.to_string(),
                writable: self.is_writable(ident),
            },
            Expression::StaticMemberExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::PrivateFieldExpression(_) => ExprShape::Member,
            Expression::SequenceExpression(_) => ExprShape::Sequence,
            _ => ExprShape::Other,
        }
    }

    /// Whether `name = el` is a legal assignment for this binding.
    /// Unresolved names are globals and assumed writable.
    fn is_writable(&self, ident: &IdentifierReference<'_>) -> bool {
        let Some(reference_id) = ident.reference_id.get() else {
            return true;
        };
        let Some(symbol_id) = self.scoping.get_reference(reference_id).symbol_id() else {
            return true;
        };
        let flags = self.scoping.symbol_flags(symbol_id);
        !(flags.is_const_variable() || flags.contains(SymbolFlags::Import))
    }
}

/// Lowers the outermost JSX it meets and does not descend further.
struct JsxCollector<'l, 's, 'c> {
    lowering: &'l mut Lowering<'s, 'c>,
    found: Vec<JsxNode>,
}

impl<'a> Visit<'a> for JsxCollector<'_, '_, '_> {
    fn visit_jsx_element(&mut self, it: &JSXElement<'a>) {
        let node = self.lowering.lower_element(it);
        self.found.push(node);
    }

    fn visit_jsx_fragment(&mut self, it: &JSXFragment<'a>) {
        let node = self.lowering.lower_fragment(it);
        self.found.push(node);
    }
}
