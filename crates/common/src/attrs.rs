//! Attribute planning shared by every target
//!
//! Splits the attributes of a native element into markup that can be written
//! into the template and holes that need a runtime binding. Class and style
//! sources are folded together so each element ends up with a single class
//! and a single style value.

use crate::check::{resolve_attr_kind, AttrKind};
use crate::classify::{Classification, StaticValue};
use crate::constants::REFLECTED_PROPERTIES;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::expression::{camel_to_kebab, style_number};
use crate::hole::{Hole, HoleKind, HoleValue, MergeGroup, SpreadGroup};
use crate::jsx::{AttrValue, ElementNode, ExprNode, ExprShape, JsxAttr, NamedAttr};
use crate::props::{Prop, PropSegment};

/// A static attribute written into markup. `None` renders a bare name.
pub type MarkupAttr = (String, Option<String>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPlan {
    pub markup: Vec<MarkupAttr>,
    /// Attribute-like holes, in the order their instructions run
    pub holes: Vec<Hole>,
}

enum Slot {
    Markup(MarkupAttr),
    Hole(Hole),
    Class,
    Style,
}

/// Plan the attributes of one native element
pub fn plan_element(element: &ElementNode, diagnostics: &mut Vec<Diagnostic>) -> ElementPlan {
    if element.attrs.iter().any(|attr| matches!(attr, JsxAttr::Spread(_))) {
        return plan_spread_element(element, diagnostics);
    }

    let mut slots = Vec::with_capacity(element.attrs.len());
    let mut class = MergeGroup::default();
    let mut style = MergeGroup::default();
    let (mut class_slot, mut style_slot) = (false, false);

    for attr in &element.attrs {
        let JsxAttr::Named(attr) = attr else { continue };
        match resolve_kind(attr, diagnostics) {
            AttrKind::Attribute(name) => match attr.static_value() {
                Some(value) => slots.extend(static_markup(name, &value).map(Slot::Markup)),
                None => slots.push(Slot::Hole(value_hole(HoleKind::Attribute, name, attr))),
            },
            AttrKind::Property(name) => match attr.static_value() {
                Some(value) if REFLECTED_PROPERTIES.contains(name.as_str()) => {
                    slots.extend(static_markup(name, &value).map(Slot::Markup));
                }
                _ => slots.push(Slot::Hole(value_hole(HoleKind::Property, name, attr))),
            },
            kind @ (AttrKind::Class | AttrKind::ClassEntry(_)) => {
                if !class_slot {
                    class_slot = true;
                    slots.push(Slot::Class);
                }
                fold_class(&mut class, &kind, attr);
            }
            kind @ (AttrKind::Style | AttrKind::StyleEntry(_)) => {
                if !style_slot {
                    style_slot = true;
                    slots.push(Slot::Style);
                }
                fold_style(&mut style, &kind, attr);
            }
            kind => slots.push(Slot::Hole(binding_hole(kind, attr))),
        }
    }

    let mut plan = ElementPlan::default();
    for slot in slots {
        match slot {
            Slot::Markup(markup) => plan.markup.push(markup),
            Slot::Hole(hole) => plan.holes.push(hole),
            Slot::Class => finish_group(&mut plan, "class", HoleKind::Class, &class, " "),
            Slot::Style => finish_group(&mut plan, "style", HoleKind::Style, &style, "; "),
        }
    }
    plan
}

/// Whether an attribute is written entirely into markup, producing no hole.
/// Agrees with [`plan_element`] for elements without spreads.
pub fn is_inlinable(attr: &NamedAttr) -> bool {
    match resolve_attr_kind(attr.namespace.as_deref(), &attr.name) {
        AttrKind::Attribute(_) | AttrKind::ClassEntry(_) | AttrKind::StyleEntry(_) => {
            attr.static_value().is_some()
        }
        AttrKind::Property(name) => {
            attr.static_value().is_some() && REFLECTED_PROPERTIES.contains(name.as_str())
        }
        AttrKind::Class | AttrKind::Style => match &attr.value {
            AttrValue::Expr(expr) if expr.static_value().is_some() => true,
            AttrValue::Expr(expr) => match &expr.shape {
                ExprShape::Object(entries) if expr.nested.is_empty() => {
                    entries.iter().all(|entry| entry.value.static_value().is_some())
                }
                _ => false,
            },
            AttrValue::Implicit | AttrValue::Literal(_) | AttrValue::Element(_) => true,
        },
        AttrKind::Event(_) | AttrKind::Ref | AttrKind::Directive(_) | AttrKind::Unknown { .. } => false,
    }
}

fn resolve_kind(attr: &NamedAttr, diagnostics: &mut Vec<Diagnostic>) -> AttrKind {
    let kind = resolve_attr_kind(attr.namespace.as_deref(), &attr.name);
    if let AttrKind::Unknown { namespace, .. } = &kind {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::UnknownNamespace,
                attr.span,
                format!("unknown attribute namespace `{namespace}` on `{}`", attr.full_name()),
            )
            .with_help("Known namespaces are $on, $use, $class, $style, $prop and $attr"),
        );
    }
    kind
}

/// Render a static attribute. `false` and `null` remove the attribute.
fn static_markup(name: String, value: &StaticValue) -> Option<MarkupAttr> {
    match value {
        StaticValue::Bool(true) => Some((name, None)),
        StaticValue::Bool(false) | StaticValue::Null => None,
        other => Some((name, other.as_text())),
    }
}

fn attr_value(attr: &NamedAttr) -> HoleValue {
    match &attr.value {
        AttrValue::Expr(expr) => match expr.static_value() {
            Some(value) => HoleValue::Static(value.clone()),
            None => HoleValue::Expr(expr.clone()),
        },
        AttrValue::Element(node) => HoleValue::Node((**node).clone()),
        AttrValue::Implicit => HoleValue::Static(StaticValue::Bool(true)),
        AttrValue::Literal(s) => HoleValue::Static(StaticValue::Str(s.clone())),
    }
}

fn value_hole(kind: HoleKind, name: String, attr: &NamedAttr) -> Hole {
    Hole::new(kind, name, attr.class(), attr_value(attr), attr.span)
}

/// Holes for events, refs, directives and unknown namespaces. None of these
/// can be written into markup, whatever their value.
fn binding_hole(kind: AttrKind, attr: &NamedAttr) -> Hole {
    let class = attr.class().max(Classification::Dynamic);
    let (kind, name) = match kind {
        AttrKind::Event(name) => (HoleKind::Event, name),
        AttrKind::Ref => (HoleKind::Ref, String::new()),
        AttrKind::Directive(name) => (HoleKind::Directive, name),
        AttrKind::Unknown { name, .. } => (HoleKind::Attribute, name),
        AttrKind::Attribute(name) => (HoleKind::Attribute, name),
        AttrKind::Property(name) => (HoleKind::Property, name),
        AttrKind::Class | AttrKind::ClassEntry(_) => (HoleKind::Class, "class".to_string()),
        AttrKind::Style | AttrKind::StyleEntry(_) => (HoleKind::Style, "style".to_string()),
    };
    Hole::new(kind, name, class, attr_value(attr), attr.span)
}

fn fold_class(group: &mut MergeGroup, kind: &AttrKind, attr: &NamedAttr) {
    if let AttrKind::ClassEntry(name) = kind {
        match attr.static_value() {
            Some(value) => {
                if value.is_truthy() {
                    group.statics.push(name.clone());
                }
            }
            None => group.entries.push(value_hole(HoleKind::Class, name.clone(), attr)),
        }
        return;
    }

    match &attr.value {
        AttrValue::Expr(expr) => match (&expr.shape, expr.static_value()) {
            (_, Some(value)) => group.statics.extend(value.as_text().filter(|t| !t.trim().is_empty())),
            (ExprShape::Object(entries), None) if expr.nested.is_empty() => {
                for entry in entries {
                    match entry.value.static_value() {
                        Some(value) => {
                            if value.is_truthy() {
                                group.statics.push(entry.key.clone());
                            }
                        }
                        None => group.entries.push(entry_hole(HoleKind::Class, entry.key.clone(), &entry.value)),
                    }
                }
            }
            _ => group.bases.push(expr.clone()),
        },
        AttrValue::Literal(s) => {
            if !s.trim().is_empty() {
                group.statics.push(s.trim().to_string());
            }
        }
        AttrValue::Implicit | AttrValue::Element(_) => {}
    }
}

fn fold_style(group: &mut MergeGroup, kind: &AttrKind, attr: &NamedAttr) {
    if let AttrKind::StyleEntry(name) = kind {
        let property = camel_to_kebab(name);
        match attr.static_value() {
            Some(value) => group.statics.extend(style_declaration(&property, &value)),
            None => {
                let kind = if property.starts_with("--") { HoleKind::CssVar } else { HoleKind::Style };
                group.entries.push(value_hole(kind, property, attr));
            }
        }
        return;
    }

    match &attr.value {
        AttrValue::Expr(expr) => match (&expr.shape, expr.static_value()) {
            (_, Some(StaticValue::Str(s))) => group.statics.extend(static_style_text(s)),
            (_, Some(_)) => {}
            (ExprShape::Object(entries), None) if expr.nested.is_empty() => {
                for entry in entries {
                    let property = camel_to_kebab(&entry.key);
                    match entry.value.static_value() {
                        Some(value) => group.statics.extend(style_declaration(&property, value)),
                        None => {
                            let kind = if property.starts_with("--") { HoleKind::CssVar } else { HoleKind::Style };
                            group.entries.push(entry_hole(kind, property, &entry.value));
                        }
                    }
                }
            }
            _ => group.bases.push(expr.clone()),
        },
        AttrValue::Literal(s) => group.statics.extend(static_style_text(s)),
        AttrValue::Implicit | AttrValue::Element(_) => {}
    }
}

fn entry_hole(kind: HoleKind, name: String, value: &ExprNode) -> Hole {
    Hole::new(kind, name, value.class, HoleValue::Expr(value.clone()), value.span)
}

fn style_declaration(property: &str, value: &StaticValue) -> Option<String> {
    let value = match value {
        StaticValue::Str(s) => s.clone(),
        StaticValue::Num(n) => style_number(property, *n),
        StaticValue::Bool(_) | StaticValue::Null => return None,
    };
    Some(format!("{property}: {value}"))
}

fn static_style_text(text: &str) -> Option<String> {
    let text = text.trim().trim_end_matches(';').trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn finish_group(plan: &mut ElementPlan, name: &str, kind: HoleKind, group: &MergeGroup, separator: &str) {
    if group.bases.is_empty() {
        if !group.statics.is_empty() {
            plan.markup.push((name.to_string(), Some(group.statics.join(separator))));
        }
        plan.holes.extend(group.entries.iter().cloned());
    } else {
        let span = group.bases[0].span;
        plan.holes.push(Hole::new(kind, name, group.class(), HoleValue::Merge(group.clone()), span));
    }
}

/// With spreads present nothing is inlined: later props may override earlier
/// ones at runtime, so every attribute travels through one merged props object.
fn plan_spread_element(element: &ElementNode, diagnostics: &mut Vec<Diagnostic>) -> ElementPlan {
    let mut group = SpreadGroup::default();
    let mut bindings = Vec::new();
    let mut first_spread = None;

    for attr in &element.attrs {
        let attr = match attr {
            JsxAttr::Spread(expr) => {
                first_spread.get_or_insert(expr.span);
                group.segments.push(PropSegment::Spread(expr.clone()));
                continue;
            }
            JsxAttr::Named(attr) => attr,
        };
        match resolve_kind(attr, diagnostics) {
            AttrKind::Attribute(name) | AttrKind::Property(name) | AttrKind::Unknown { name, .. } => {
                let prop = Prop::from_attr(name, attr);
                match group.segments.last_mut() {
                    Some(PropSegment::Props(props)) => props.push(prop),
                    _ => group.segments.push(PropSegment::Props(vec![prop])),
                }
            }
            kind @ (AttrKind::Class | AttrKind::ClassEntry(_)) => fold_class(&mut group.class, &kind, attr),
            kind @ (AttrKind::Style | AttrKind::StyleEntry(_)) => fold_style(&mut group.style, &kind, attr),
            kind => bindings.push(binding_hole(kind, attr)),
        }
    }

    let class = group
        .segments
        .iter()
        .map(|segment| match segment {
            PropSegment::Spread(expr) => expr.class.max(Classification::Dynamic),
            PropSegment::Props(props) => props.iter().map(|p| p.class).max().unwrap_or(Classification::Static),
        })
        .chain([group.class.class(), group.style.class()])
        .max()
        .unwrap_or(Classification::Dynamic);

    let span = first_spread.unwrap_or(element.span);
    let mut holes = vec![Hole::new(HoleKind::Spread, "", class, HoleValue::Spread(group), span)];
    holes.extend(bindings);
    ElementPlan { markup: vec![], holes }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_semantic::SemanticBuilder;
    use oxc_span::SourceType;

    use super::*;
    use crate::jsx::{JsxNode, Lowering};
    use crate::options::TransformOptions;

    fn plan(source: &str) -> (ElementPlan, Vec<Diagnostic>) {
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, source, SourceType::tsx()).parse().program;
        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let options = TransformOptions::default();
        let mut diagnostics = Vec::new();
        let mut roots = Lowering::new(source, &options, &scoping, &mut diagnostics).collect_roots(&program);
        let JsxNode::Element(element) = roots.remove(0) else { panic!("expected element") };
        let plan = plan_element(&element, &mut diagnostics);
        (plan, diagnostics)
    }

    #[test]
    fn test_static_class_and_style_fold_into_markup() {
        let (plan, _) =
            plan(r#"<div class="a" $class:b={true} $class:c={on()} style={{ fontSize: 14, color: c }} title="t" />"#);
        assert_eq!(
            plan.markup,
            vec![
                ("class".to_string(), Some("a b".to_string())),
                ("style".to_string(), Some("font-size: 14px".to_string())),
                ("title".to_string(), Some("t".to_string())),
            ]
        );
        let holes: Vec<_> = plan.holes.iter().map(|h| (h.kind, h.name.as_str(), h.class)).collect();
        assert_eq!(
            holes,
            vec![
                (HoleKind::Class, "c", Classification::Reactive),
                (HoleKind::Style, "color", Classification::Dynamic),
            ]
        );
    }

    #[test]
    fn test_dynamic_base_merges_every_class_source() {
        let (plan, _) = plan(r#"<div class={cls()} $class:b={true} />"#);
        assert!(plan.markup.is_empty());
        assert_eq!(plan.holes.len(), 1);
        let hole = &plan.holes[0];
        assert_eq!((hole.kind, hole.class), (HoleKind::Class, Classification::Reactive));
        let HoleValue::Merge(group) = &hole.value else { panic!("expected merge") };
        assert_eq!(group.statics, vec!["b"]);
        assert_eq!(group.bases.len(), 1);
    }

    #[test]
    fn test_spreads_group_props_and_keep_bindings() {
        let (plan, _) = plan(r#"<div {...a} $class:x={p} {...b} id="i" onClick={go} />"#);
        assert!(plan.markup.is_empty());
        assert_eq!(plan.holes.len(), 2);
        let HoleValue::Spread(group) = &plan.holes[0].value else { panic!("expected spread") };
        assert_eq!(group.segments.len(), 3);
        assert!(matches!(group.segments[2], PropSegment::Props(_)));
        assert_eq!(group.class.entries.len(), 1);
        assert_eq!((plan.holes[1].kind, plan.holes[1].name.as_str()), (HoleKind::Event, "click"));
    }

    #[test]
    fn test_false_attributes_are_omitted() {
        let (plan, _) = plan(r#"<input disabled={false} checked hidden={null} />"#);
        assert_eq!(plan.markup, vec![("checked".to_string(), None)]);
        assert!(plan.holes.is_empty());
    }

    #[test]
    fn test_unknown_namespace_is_reported() {
        let (plan, diagnostics) = plan(r#"<div $foo:bar={x} />"#);
        assert_eq!((plan.holes[0].kind, plan.holes[0].name.as_str()), (HoleKind::Attribute, "bar"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownNamespace);
    }
}
