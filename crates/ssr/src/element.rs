//! SSR element transform
//!
//! Transforms native HTML elements into SSR template strings.
//! Unlike DOM, we don't create DOM nodes - we build strings.

use common::attrs::plan_element;
use common::children::{template_children, ChildItem};
use common::constants::{BOOLEANS, HYDRATION_MARKER, REFLECTED_PROPERTIES};
use common::emit::{member, merge_args, render_expr, render_value};
use common::expression::{escape_attribute, escape_content, js_string};
use common::jsx::{ElementNode, ExprNode, ExprShape, JsxNode};
use common::props::{print_props, PropSegment};
use common::{
    CompileError, Diagnostic, DiagnosticKind, EmitHost, Hole, HoleKind, HoleValue, MergeGroup, Result, SpreadGroup,
};

use crate::ir::SsrResult;
use crate::transform::SsrTransform;

/// Transform a native HTML/SVG element for SSR
pub fn transform_element(t: &mut SsrTransform<'_>, element: &ElementNode, result: &mut SsrResult) -> Result<()> {
    let plan = plan_element(element, &mut t.ctx.diagnostics);

    // Per-name class/style entries and the static text folded next to them
    // are written as one merged attribute.
    let class_entries = entries(&plan.holes, |kind| kind == HoleKind::Class);
    let style_entries = entries(&plan.holes, |kind| matches!(kind, HoleKind::Style | HoleKind::CssVar));
    let mut class_static = None;
    let mut style_static = None;

    result.push_static(&format!("<{}", element.tag));
    for (name, value) in &plan.markup {
        match (name.as_str(), value) {
            ("class", Some(value)) if !class_entries.is_empty() => class_static = Some(value.clone()),
            ("style", Some(value)) if !style_entries.is_empty() => style_static = Some(value.clone()),
            (name, Some(value)) => result.push_static(&format!(" {name}=\"{}\"", escape_attribute(value))),
            (name, None) => result.push_static(&format!(" {name}")),
        }
    }

    let mut content = None;
    let (mut class_done, mut style_done) = (false, false);
    for hole in &plan.holes {
        match hole.kind {
            HoleKind::Attribute => attribute(t, result, &hole.name, &hole.value)?,
            HoleKind::Property => match hole.name.as_str() {
                "innerHTML" => content = Some(render_value(&hole.value, t)?),
                "textContent" | "innerText" => {
                    t.use_helper("escape");
                    content = Some(format!("escape({})", render_value(&hole.value, t)?));
                }
                name if REFLECTED_PROPERTIES.contains(name) => attribute(t, result, name, &hole.value)?,
                // Other properties only exist on live nodes
                _ => {}
            },
            HoleKind::Class | HoleKind::Style | HoleKind::CssVar => match &hole.value {
                HoleValue::Merge(group) => merged_attribute(t, result, hole.kind, group)?,
                _ if hole.kind == HoleKind::Class && !class_done => {
                    class_done = true;
                    let group = entry_group(class_static.take(), &class_entries);
                    merged_attribute(t, result, HoleKind::Class, &group)?;
                }
                _ if hole.kind != HoleKind::Class && !style_done => {
                    style_done = true;
                    let group = entry_group(style_static.take(), &style_entries);
                    merged_attribute(t, result, HoleKind::Style, &group)?;
                }
                _ => {}
            },
            // Listeners and refs only mean something in the browser
            HoleKind::Event | HoleKind::Ref => {}
            HoleKind::Directive => t.ctx.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::UnsupportedConstruct,
                    hole.span,
                    format!("directive `{}` has no effect in server output", hole.name),
                )
                .with_help("Directives run in the browser after hydration"),
            ),
            HoleKind::Spread => {
                let HoleValue::Spread(group) = &hole.value else {
                    return Err(CompileError::invariant("spread hole without spread props"));
                };
                spread(t, result, group)?;
            }
            HoleKind::ChildInsertion | HoleKind::ComponentProp => {
                return Err(CompileError::invariant("insertions are not attribute holes"));
            }
        }
    }
    result.push_static(">");

    if element.is_void() {
        return Ok(());
    }
    match content {
        Some(content) => result.push_dynamic(content),
        None => transform_children(t, &element.children, result)?,
    }
    result.push_static(&format!("</{}>", element.tag));
    Ok(())
}

/// Children of an element or fragment. When the output will be hydrated,
/// every insertion is followed by a marker, and one that follows text is
/// opened by a marker too so the text does not run into the value.
pub fn transform_children(t: &mut SsrTransform<'_>, children: &[JsxNode], result: &mut SsrResult) -> Result<()> {
    let mut after_text = false;
    for item in template_children(children) {
        let is_text = matches!(item, ChildItem::Text(_));
        match item {
            ChildItem::Text(text) => result.push_static(&escape_content(&text)),
            ChildItem::Element(element) => transform_element(t, element, result)?,
            ChildItem::Insert(node) => {
                let hydratable = t.ctx.hydratable();
                if hydratable && after_text {
                    result.push_static(HYDRATION_MARKER);
                }
                insertion(t, node, result)?;
                if hydratable {
                    result.push_static(HYDRATION_MARKER);
                }
            }
        }
        after_text = is_text;
    }
    Ok(())
}

fn insertion(t: &mut SsrTransform<'_>, node: &JsxNode, result: &mut SsrResult) -> Result<()> {
    let code = match node {
        JsxNode::Expression(expr) | JsxNode::Spread(expr) => {
            t.use_helper("escape");
            format!("escape({})", render_expr(expr, t)?)
        }
        // Components render markup of their own
        other => t.compile(other)?.code,
    };
    result.push_dynamic(code);
    Ok(())
}

fn entries(holes: &[Hole], kind: impl Fn(HoleKind) -> bool) -> Vec<Hole> {
    holes
        .iter()
        .filter(|hole| kind(hole.kind) && !matches!(hole.value, HoleValue::Merge(_)))
        .cloned()
        .collect()
}

fn entry_group(statics: Option<String>, entries: &[Hole]) -> MergeGroup {
    MergeGroup { statics: statics.into_iter().collect(), bases: vec![], entries: entries.to_vec() }
}

fn attribute(t: &mut SsrTransform<'_>, result: &mut SsrResult, name: &str, value: &HoleValue) -> Result<()> {
    let value = render_value(value, t)?;
    if BOOLEANS.contains(name) {
        t.use_helper("ssrAttribute");
        result.push_dynamic(format!("ssrAttribute({}, {value})", js_string(name)));
    } else {
        t.use_helper("escape");
        result.push_static(&format!(" {name}=\""));
        result.push_dynamic(format!("escape({value}, true)"));
        result.push_static("\"");
    }
    Ok(())
}

fn merge_call(
    t: &mut SsrTransform<'_>,
    kind: HoleKind,
    sources: &[String],
    group: &MergeGroup,
) -> Result<String> {
    let (helper, key, separator) = match kind {
        HoleKind::Class => ("mergeClasses", "class", " "),
        _ => ("mergeStyles", "style", "; "),
    };
    t.use_helper(helper);
    let mut args: Vec<String> = sources.iter().map(|source| member(source, key)).collect();
    args.extend(merge_args(group, separator, t)?);
    Ok(format!("{helper}({})", args.join(", ")))
}

/// ` class="..."` with every class source of the element merged once
fn merged_attribute(t: &mut SsrTransform<'_>, result: &mut SsrResult, kind: HoleKind, group: &MergeGroup) -> Result<()> {
    let name = if kind == HoleKind::Class { "class" } else { "style" };
    let value = merge_call(t, kind, &[], group)?;
    t.use_helper("escape");
    result.push_static(&format!(" {name}=\""));
    result.push_dynamic(format!("escape({value}, true)"));
    result.push_static("\"");
    Ok(())
}

/// `ssrSpread(props, classes, styles)` renders every attribute of the
/// element, escaped, with class and style merged across all sources.
fn spread(t: &mut SsrTransform<'_>, result: &mut SsrResult, group: &SpreadGroup) -> Result<()> {
    let mut segments = Vec::with_capacity(group.segments.len());
    let mut sources = Vec::new();
    for segment in &group.segments {
        match segment {
            PropSegment::Spread(expr) if !expr.is_plain_identifier() => {
                let name = t.ctx.generate_uid("s");
                let value = render_expr(expr, t)?;
                result.hoisted.push(format!("const {name} = {value};"));
                sources.push(name.clone());
                segments.push(PropSegment::Spread(ExprNode {
                    span: expr.span,
                    text: name.clone(),
                    class: expr.class,
                    shape: ExprShape::Identifier { name, writable: false },
                    nested: vec![],
                }));
            }
            PropSegment::Spread(expr) => {
                sources.push(expr.text.clone());
                segments.push(segment.clone());
            }
            PropSegment::Props(_) => segments.push(segment.clone()),
        }
    }

    t.use_helper("ssrSpread");
    let mut args = vec![print_props(&segments, t)?];
    let class = if group.class.is_empty() {
        None
    } else {
        Some(merge_call(t, HoleKind::Class, &sources, &group.class)?)
    };
    let style = if group.style.is_empty() {
        None
    } else {
        Some(merge_call(t, HoleKind::Style, &sources, &group.style)?)
    };
    match (class, style) {
        (None, None) => {}
        (Some(class), None) => args.push(class),
        (class, Some(style)) => {
            args.push(class.unwrap_or_else(|| "undefined".to_string()));
            args.push(style);
        }
    }
    result.push_dynamic(format!("ssrSpread({})", args.join(", ")));
    Ok(())
}
