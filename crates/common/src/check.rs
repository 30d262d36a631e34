//! Check functions for JSX nodes and attribute names

use oxc_ast::ast::{JSXElementName, JSXMemberExpression, JSXMemberExpressionObject};

use crate::constants::{ALIASES, PROPERTIES, SVG_ELEMENTS};
use crate::expression::to_event_name;

/// Check if a tag name represents a component (starts with uppercase or contains dot)
pub fn is_component(tag: &str) -> bool {
    match tag.chars().next() {
        Some(first) => first.is_uppercase() || tag.contains('.'),
        None => false,
    }
}

/// Whether a template rooted at `tag` has to be created in SVG context
pub fn is_svg_root(tag: &str) -> bool {
    tag != "svg" && SVG_ELEMENTS.contains(tag)
}

/// Get the name from a JSXElementName
pub fn get_jsx_element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Identifier(id) => id.name.to_string(),
        JSXElementName::IdentifierReference(id) => id.name.to_string(),
        JSXElementName::NamespacedName(ns) => {
            format!("{}:{}", ns.namespace.name, ns.name.name)
        }
        JSXElementName::MemberExpression(member) => get_member_expression_name(member),
        JSXElementName::ThisExpression(_) => "this".to_string(),
    }
}

/// Get the name from a JSX member expression (e.g., Foo.Bar.Baz)
fn get_member_expression_name(member: &JSXMemberExpression) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(m) => get_member_expression_name(m),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

/// How an element attribute binds, decided from its name alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrKind {
    Attribute(String),
    Property(String),
    Class,
    ClassEntry(String),
    Style,
    StyleEntry(String),
    Event(String),
    Ref,
    Directive(String),
    /// A `$ns:name` attribute with a namespace the compiler does not know
    Unknown { namespace: String, name: String },
}

/// Resolve an element attribute name into the kind of binding it needs
pub fn resolve_attr_kind(namespace: Option<&str>, name: &str) -> AttrKind {
    match namespace {
        Some("$on") => AttrKind::Event(name.to_string()),
        Some("$use") => AttrKind::Directive(name.to_string()),
        Some("$class") => AttrKind::ClassEntry(name.to_string()),
        Some("$style") => AttrKind::StyleEntry(name.to_string()),
        Some("$prop") => AttrKind::Property(name.to_string()),
        Some("$attr") => AttrKind::Attribute(name.to_string()),
        Some(ns) if ns.starts_with('$') => AttrKind::Unknown {
            namespace: ns.to_string(),
            name: name.to_string(),
        },
        Some(ns) => AttrKind::Attribute(format!("{ns}:{name}")),
        None => {
            if name == "$ref" {
                return AttrKind::Ref;
            }
            if let Some(event) = to_event_name(name) {
                return AttrKind::Event(event);
            }
            let name = ALIASES.get(name).copied().unwrap_or(name);
            match name {
                "class" => AttrKind::Class,
                "style" => AttrKind::Style,
                _ if PROPERTIES.contains(name) => AttrKind::Property(name.to_string()),
                _ => AttrKind::Attribute(name.to_string()),
            }
        }
    }
}
