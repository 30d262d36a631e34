//! Instructions for the holes of native elements
//!
//! One hole turns into one instruction. Reactive values either go through an
//! `effect` or, for helpers that subscribe on their own, are passed as the
//! accessor itself.

use common::emit::{arrow, call, member, merge_args, render_expr, render_tracked, render_value};
use common::expression::js_string;
use common::jsx::{ExprNode, ExprShape};
use common::props::{print_props, PropSegment};
use common::{
    Classification, CompileError, Diagnostic, DiagnosticKind, EmitHost, Hole, HoleKind, HoleValue, MergeGroup, Result,
    SpreadGroup, StaticValue,
};
use oxc_syntax::identifier::is_identifier_name;

use crate::transform::DomTransform;

/// Emit the statements for one hole. `el` is the bound element, or the parent
/// for insertions; `marker` is the node inserted content goes in front of.
pub fn emit_hole(
    t: &mut DomTransform<'_>,
    hole: &Hole,
    el: &str,
    marker: Option<&str>,
    out: &mut Vec<String>,
) -> Result<()> {
    let statement = match hole.kind {
        HoleKind::Attribute => {
            let value = render_value(&hole.value, t)?;
            let set = format!("setAttribute({el}, {}, {value})", js_string(&hole.name));
            t.use_helper("setAttribute");
            wrap_effect(t, hole.class, set)
        }
        HoleKind::Property => {
            let value = render_value(&hole.value, t)?;
            let set = format!("{} = {value}", member(el, &hole.name));
            wrap_effect(t, hole.class, set)
        }
        HoleKind::Class | HoleKind::Style | HoleKind::CssVar => match &hole.value {
            HoleValue::Merge(group) => {
                let (helper, attr) = merge_helper(hole.kind);
                let args = merge_args(group, separator(hole.kind), t)?;
                t.use_helper("setAttribute");
                t.use_helper(helper);
                let set = format!("setAttribute({el}, \"{attr}\", {helper}({}))", args.join(", "));
                wrap_effect(t, hole.class, set)
            }
            value => {
                let helper = match hole.kind {
                    HoleKind::Class => "toggleClass",
                    HoleKind::Style => "setStyle",
                    _ => "setCssVar",
                };
                let value = render_tracked(value, hole.class, t)?;
                t.use_helper(helper);
                format!("{helper}({el}, {}, {value})", js_string(&hole.name))
            }
        },
        HoleKind::Event => event(t, hole, el)?,
        HoleKind::Ref => reference(t, hole, el)?,
        HoleKind::Directive => {
            if !is_identifier_name(&hole.name) {
                t.ctx.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::UnsupportedConstruct,
                        hole.span,
                        format!("directive `{}` is not a valid identifier", hole.name),
                    )
                    .with_help("Name the directive function with a plain identifier, such as `$use:tooltip`"),
                );
                return Ok(());
            }
            t.use_helper("use");
            match &hole.value {
                HoleValue::Static(StaticValue::Bool(true)) => format!("use({}, {el})", hole.name),
                value => format!("use({}, {el}, {})", hole.name, render_value(value, t)?),
            }
        }
        HoleKind::ChildInsertion => {
            let value = render_tracked(&hole.value, hole.class, t)?;
            t.use_helper("insert");
            match marker {
                Some(marker) => format!("insert({el}, {value}, {marker})"),
                None => format!("insert({el}, {value})"),
            }
        }
        HoleKind::Spread => {
            let HoleValue::Spread(group) = &hole.value else {
                return Err(CompileError::invariant("spread hole without spread props"));
            };
            spread(t, group, el, out)?
        }
        HoleKind::ComponentProp => {
            return Err(CompileError::invariant("component props are not element holes"));
        }
    };
    out.push(format!("{statement};"));
    Ok(())
}

fn wrap_effect(t: &mut DomTransform<'_>, class: Classification, code: String) -> String {
    if class == Classification::Reactive {
        t.use_helper("effect");
        format!("effect(() => {code})")
    } else {
        code
    }
}

fn separator(kind: HoleKind) -> &'static str {
    if kind == HoleKind::Class {
        " "
    } else {
        "; "
    }
}

fn merge_helper(kind: HoleKind) -> (&'static str, &'static str) {
    match kind {
        HoleKind::Style | HoleKind::CssVar => ("mergeStyles", "style"),
        _ => ("mergeClasses", "class"),
    }
}

fn event(t: &mut DomTransform<'_>, hole: &Hole, el: &str) -> Result<String> {
    let handler = render_value(&hole.value, t)?;
    if t.ctx.options.is_delegated(&hole.name) {
        t.ctx.register_delegate(&hole.name);
        Ok(format!("{} = {handler}", member(el, &format!("$${}", hole.name))))
    } else {
        t.use_helper("addEventListener");
        Ok(format!("addEventListener({el}, {}, {handler})", js_string(&hole.name)))
    }
}

/// Refs receive the element once it exists: functions are called, arrays
/// call each entry, and writable bindings are assigned when they do not
/// hold a function.
fn reference(t: &mut DomTransform<'_>, hole: &Hole, el: &str) -> Result<String> {
    let HoleValue::Expr(expr) = &hole.value else {
        return Ok(call(&render_value(&hole.value, t)?, el));
    };
    Ok(match &expr.shape {
        ExprShape::Array(items) if expr.nested.is_empty() => {
            items.iter().map(|item| call(item, el)).collect::<Vec<_>>().join(", ")
        }
        ExprShape::Identifier { name, writable: true } => {
            format!("typeof {name} === \"function\" ? {name}({el}) : {name} = {el}")
        }
        ExprShape::Member if expr.nested.is_empty() => {
            let target = &expr.text;
            format!("typeof {target} === \"function\" ? {target}({el}) : {target} = {el}")
        }
        _ => call(&render_expr(expr, t)?, el),
    })
}

/// `spread(el, props, classes?, styles?)`. Reactive spread sources stay
/// lazy: the props merge gets an accessor and the class/style merges read
/// the source again when they re-run. Other sources that are not plain names
/// are evaluated once up front, since both merges read them.
fn spread(t: &mut DomTransform<'_>, group: &SpreadGroup, el: &str, out: &mut Vec<String>) -> Result<String> {
    let mut segments = Vec::with_capacity(group.segments.len());
    let mut sources = Vec::new();
    for segment in &group.segments {
        match segment {
            PropSegment::Spread(expr) if expr.class == Classification::Reactive => {
                let code = render_expr(expr, t)?;
                let (accessor, source) = match &expr.shape {
                    ExprShape::AccessorCall(name) if expr.nested.is_empty() => (name.clone(), code),
                    _ => (arrow(&code), format!("({code})")),
                };
                sources.push(source);
                let lazy = ExprNode { text: accessor, shape: ExprShape::Other, nested: vec![], ..expr.clone() };
                segments.push(PropSegment::Spread(lazy));
            }
            PropSegment::Spread(expr) if !expr.is_plain_identifier() => {
                let name = t.ctx.generate_uid("s");
                let value = render_expr(expr, t)?;
                out.push(format!("const {name} = {value};"));
                sources.push(name.clone());
                segments.push(PropSegment::Spread(named(expr, name)));
            }
            PropSegment::Spread(expr) => {
                sources.push(expr.text.clone());
                segments.push(segment.clone());
            }
            PropSegment::Props(_) => segments.push(segment.clone()),
        }
    }

    t.use_helper("spread");
    let mut args = vec![el.to_string(), print_props(&segments, t)?];
    let class = spread_merge(t, &sources, "class", &group.class)?;
    let style = spread_merge(t, &sources, "style", &group.style)?;
    match (class, style) {
        (None, None) => {}
        (Some(class), None) => args.push(class),
        (class, Some(style)) => {
            args.push(class.unwrap_or_else(|| "undefined".to_string()));
            args.push(style);
        }
    }
    Ok(format!("spread({})", args.join(", ")))
}

/// Class or style from every spread source, left to right, then the element's
/// own values. Interleaving of entries and spreads does not change the order.
fn spread_merge(t: &mut DomTransform<'_>, sources: &[String], key: &str, group: &MergeGroup) -> Result<Option<String>> {
    if group.is_empty() {
        return Ok(None);
    }
    let kind = if key == "class" { HoleKind::Class } else { HoleKind::Style };
    let (helper, _) = merge_helper(kind);
    t.use_helper(helper);
    let mut args: Vec<String> = sources.iter().map(|source| member(source, key)).collect();
    args.extend(merge_args(group, separator(kind), t)?);
    Ok(Some(format!("() => {helper}({})", args.join(", "))))
}

fn named(expr: &ExprNode, name: String) -> ExprNode {
    ExprNode {
        span: expr.span,
        text: name.clone(),
        class: expr.class,
        shape: ExprShape::Identifier { name, writable: false },
        nested: vec![],
    }
}

