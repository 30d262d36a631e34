//! Props objects for components and spread elements

use oxc_span::Span;
use oxc_syntax::identifier::is_identifier_name;

use crate::classify::{Classification, StaticValue};
use crate::emit::{render_expr, render_static, EmitHost};
use crate::error::Result;
use crate::expression::js_string;
use crate::jsx::{AttrValue, ComponentNode, ExprNode, ExprShape, JsxAttr, JsxNode, NamedAttr};

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: PropValue,
    pub class: Classification,
    pub span: Span,
}

impl Prop {
    pub(crate) fn from_attr(key: String, attr: &NamedAttr) -> Self {
        let value = match &attr.value {
            AttrValue::Implicit => PropValue::Static(StaticValue::Bool(true)),
            AttrValue::Literal(s) => PropValue::Static(StaticValue::Str(s.clone())),
            AttrValue::Expr(expr) => match expr.static_value() {
                Some(value) => PropValue::Static(value.clone()),
                None => PropValue::Expr(expr.clone()),
            },
            AttrValue::Element(node) => PropValue::Node((**node).clone()),
        };
        Prop { key, value, class: attr.class(), span: attr.span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Static(StaticValue),
    Expr(ExprNode),
    /// JSX passed as a prop value
    Node(JsxNode),
    Children(Vec<JsxNode>),
}

/// One argument of a props merge, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum PropSegment {
    Props(Vec<Prop>),
    Spread(ExprNode),
}

/// Props segments for a component, with its children as a trailing `children` prop
pub fn component_segments(component: &ComponentNode) -> Vec<PropSegment> {
    let mut segments: Vec<PropSegment> = Vec::new();
    let push = |segments: &mut Vec<PropSegment>, prop: Prop| match segments.last_mut() {
        Some(PropSegment::Props(props)) => props.push(prop),
        _ => segments.push(PropSegment::Props(vec![prop])),
    };

    for attr in &component.props {
        match attr {
            JsxAttr::Spread(expr) => segments.push(PropSegment::Spread(expr.clone())),
            JsxAttr::Named(attr) => push(&mut segments, Prop::from_attr(attr.full_name(), attr)),
        }
    }

    if !component.children.is_empty() {
        let class = if component.children.iter().all(is_static_child) {
            Classification::Static
        } else {
            Classification::Dynamic
        };
        push(
            &mut segments,
            Prop {
                key: "children".to_string(),
                value: PropValue::Children(component.children.clone()),
                class,
                span: component.span,
            },
        );
    }
    segments
}

fn is_static_child(node: &JsxNode) -> bool {
    match node {
        JsxNode::Text(_) => true,
        JsxNode::Expression(expr) => expr.class == Classification::Static,
        _ => false,
    }
}

/// Print props segments as one object, merging when spreads are involved
pub fn print_props(segments: &[PropSegment], host: &mut dyn EmitHost) -> Result<String> {
    match segments {
        [] => Ok("{}".to_string()),
        [PropSegment::Props(props)] => print_object(props, host),
        segments => {
            host.use_helper("mergeProps");
            let mut args = Vec::with_capacity(segments.len());
            for segment in segments {
                args.push(match segment {
                    PropSegment::Props(props) => print_object(props, host)?,
                    PropSegment::Spread(expr) => render_expr(expr, host)?,
                });
            }
            Ok(format!("mergeProps({})", args.join(", ")))
        }
    }
}

fn print_object(props: &[Prop], host: &mut dyn EmitHost) -> Result<String> {
    if props.is_empty() {
        return Ok("{}".to_string());
    }
    let mut entries = Vec::with_capacity(props.len());
    for prop in props {
        let key = print_key(&prop.key);
        let entry = match &prop.value {
            PropValue::Static(value) => format!("{key}: {}", render_static(value)),
            PropValue::Expr(expr) if prop.class == Classification::Reactive => match &expr.shape {
                // A bare accessor is handed over so the component subscribes itself
                ExprShape::AccessorCall(name) if expr.nested.is_empty() => format!("{key}: {name}"),
                _ => getter(&key, &render_expr(expr, host)?),
            },
            PropValue::Expr(expr) => format!("{key}: {}", render_expr(expr, host)?),
            PropValue::Node(node) => getter(&key, &host.compile_node(node)?),
            PropValue::Children(children) => {
                let value = print_children(children, host)?;
                if prop.class == Classification::Static {
                    format!("{key}: {value}")
                } else {
                    getter(&key, &value)
                }
            }
        };
        entries.push(entry);
    }
    Ok(format!("{{ {} }}", entries.join(", ")))
}

/// Children as one expression: the child itself, or an array of them
pub fn print_children(children: &[JsxNode], host: &mut dyn EmitHost) -> Result<String> {
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        values.push(match child {
            JsxNode::Text(text) => js_string(&text.value),
            JsxNode::Expression(expr) | JsxNode::Spread(expr) => render_expr(expr, host)?,
            node => host.compile_node(node)?,
        });
    }
    Ok(match values.len() {
        1 => values.remove(0),
        _ => format!("[{}]", values.join(", ")),
    })
}

fn getter(key: &str, value: &str) -> String {
    format!("get {key}() {{ return {value}; }}")
}

/// An object literal key, quoted unless it is an identifier
pub fn print_key(key: &str) -> String {
    if is_identifier_name(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}
