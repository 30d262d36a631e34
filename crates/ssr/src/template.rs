//! SSR template rendering
//!
//! A root element or fragment becomes one string-part template and an
//! `ssr($$_templ, ...values)` call that concatenates it with its values.

use common::emit::Emitted;
use common::jsx::{ElementNode, FragmentNode};
use common::{Result, TemplateMarkup, HYDRATION_MARKER};
use oxc_span::Span;

use crate::element::{transform_children, transform_element};
use crate::ir::SsrResult;
use crate::transform::SsrTransform;

pub fn element(t: &mut SsrTransform<'_>, element: &ElementNode) -> Result<Emitted> {
    let mut result = SsrResult::new();
    transform_element(t, element, &mut result)?;
    render(t, result, element.span)
}

/// Fragments adopted by a hydrating client start with a marker, the same
/// way the client template of the fragment does.
pub fn fragment(t: &mut SsrTransform<'_>, fragment: &FragmentNode) -> Result<Emitted> {
    let mut result = SsrResult::new();
    if t.ctx.hydratable() {
        result.push_static(HYDRATION_MARKER);
    }
    transform_children(t, &fragment.children, &mut result)?;
    render(t, result, fragment.span)
}

fn render(t: &mut SsrTransform<'_>, result: SsrResult, span: Span) -> Result<Emitted> {
    result.check()?;
    let SsrResult { parts, values, hoisted } = result;
    t.ctx.register_helper("ssr");
    let name = t.ctx.templates.intern(TemplateMarkup::Parts(parts));

    let mut call = format!("ssr({name}");
    for value in &values {
        call.push_str(", ");
        call.push_str(value);
    }
    call.push(')');

    if hoisted.is_empty() {
        return Ok(Emitted::mapped(call, span.start));
    }
    let mut out = Emitted::mapped("(() => {\n", span.start);
    for statement in hoisted {
        out.push_str(&format!("  {statement}\n"));
    }
    out.push_str(&format!("  return {call};\n}})()"));
    Ok(out)
}
