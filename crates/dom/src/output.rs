//! Per-root output for the DOM targets
//!
//! The client target clones the template and reaches bound nodes through
//! `firstChild`/`nextSibling` chains. The hydratable target walks markup that
//! already exists and binds nodes through a [`WalkerProgram`].

use std::collections::BTreeSet;

use common::children::{template_children, ChildItem};
use common::classify::is_static_element;
use common::emit::{render_tracked, Emitted};
use common::expression::js_string;
use common::jsx::{ElementNode, FragmentNode};
use common::{is_svg_root, CompileError, EmitHost, Hole, Result, HYDRATION_MARKER};
use oxc_span::Span;

use crate::element::emit_hole;
use crate::template::{Bound, MarkerMode, NodeId, TemplateBuilder, TemplateTree};
use crate::transform::DomTransform;
use crate::walker::WalkerProgram;

/// Statements of an IIFE body, each optionally mapped to a source offset
#[derive(Default)]
struct Block {
    lines: Vec<(Option<u32>, String)>,
}

impl Block {
    fn push(&mut self, line: String) {
        self.lines.push((None, line));
    }

    /// Emit the statements of one hole, mapping the first to the hole
    fn hole(&mut self, t: &mut DomTransform<'_>, hole: &Hole, el: &str, marker: Option<&str>) -> Result<()> {
        let mut statements = Vec::new();
        emit_hole(t, hole, el, marker, &mut statements)?;
        for (i, statement) in statements.into_iter().enumerate() {
            self.lines.push(((i == 0).then_some(hole.span.start), statement));
        }
        Ok(())
    }

    fn into_iife(self, span: Span) -> Emitted {
        let mut out = Emitted::mapped("(() => {\n", span.start);
        for (origin, line) in self.lines {
            out.push_str("  ");
            if let Some(origin) = origin {
                out.mark(origin);
            }
            out.push_str(&line);
            out.push_str("\n");
        }
        out.push_str("})()");
        out
    }
}

fn marker_mode(t: &DomTransform<'_>) -> MarkerMode {
    if t.ctx.options.emits_markers() {
        MarkerMode::Hydration
    } else {
        MarkerMode::Dom
    }
}

pub fn element(t: &mut DomTransform<'_>, element: &ElementNode) -> Result<Emitted> {
    let mode = marker_mode(t);
    let (tree, bounds) = TemplateBuilder::new(mode, &mut t.ctx.diagnostics).element(element);
    if is_static_element(element) && !bounds.is_empty() {
        return Err(CompileError::invariant(format!(
            "static <{}> produced {} holes",
            element.tag,
            bounds.len()
        )));
    }

    let html = tree.serialize();
    let name = t.ctx.push_template(html, is_svg_root(&element.tag));
    match mode {
        MarkerMode::Dom => clone_element(t, &tree, &bounds, &name, element.span),
        MarkerMode::Hydration => {
            if bounds.is_empty() {
                check_markers(&tree, &WalkerProgram::default())?;
                t.use_helper("createWalker");
                t.use_helper("advance");
                return Ok(Emitted::mapped(format!("advance(createWalker({name}), \"f\")"), element.span.start));
            }
            let (mut block, vars) = walk(t, &tree, &bounds, &name)?;
            bind_holes(t, &mut block, &bounds, &vars)?;
            let root = var(&vars, tree.roots()[0])?;
            block.push(format!("return {root};"));
            Ok(block.into_iife(element.span))
        }
    }
}

pub fn fragment(t: &mut DomTransform<'_>, fragment: &FragmentNode) -> Result<Emitted> {
    match marker_mode(t) {
        MarkerMode::Dom => child_array(t, fragment),
        MarkerMode::Hydration => hydrate_fragment(t, fragment),
    }
}

fn clone_element(
    t: &mut DomTransform<'_>,
    tree: &TemplateTree,
    bounds: &[Bound],
    name: &str,
    span: Span,
) -> Result<Emitted> {
    t.use_helper("clone");
    if bounds.is_empty() {
        return Ok(Emitted::mapped(format!("clone({name})"), span.start));
    }

    let mut vars: Vec<Option<String>> = vec![None; tree.len()];
    let mut block = Block::default();
    let root = tree.roots()[0];
    let root_var = t.ctx.generate_uid("el");
    block.push(format!("const {root_var} = clone({name});"));
    vars[root] = Some(root_var.clone());

    for id in needed_nodes(bounds) {
        if vars[id].is_some() {
            continue;
        }
        let (from, chain) = node_chain(tree, &vars, id)?;
        let var = t.ctx.generate_uid("el");
        block.push(format!("const {var} = {from}{chain};"));
        vars[id] = Some(var);
    }

    bind_holes(t, &mut block, bounds, &vars)?;
    block.push(format!("return {root_var};"));
    Ok(block.into_iife(span))
}

/// `.firstChild`/`.nextSibling` accesses from the nearest declared ancestor
fn node_chain(tree: &TemplateTree, vars: &[Option<String>], id: NodeId) -> Result<(String, String)> {
    let mut hops = Vec::new();
    let mut current = id;
    loop {
        let Some(parent) = tree.node(current).parent else {
            return Err(CompileError::invariant(format!("node {id} is outside the cloned root")));
        };
        let index = tree.node(parent).children.iter().position(|&c| c == current).unwrap_or_default();
        hops.push(index);
        if let Some(from) = &vars[parent] {
            let mut chain = String::new();
            for index in hops.iter().rev() {
                chain.push_str(".firstChild");
                chain.push_str(&".nextSibling".repeat(*index));
            }
            return Ok((from.clone(), chain));
        }
        current = parent;
    }
}

/// Nodes the instructions refer to, in document order
fn needed_nodes(bounds: &[Bound]) -> BTreeSet<NodeId> {
    bounds.iter().flat_map(|b| b.node.into_iter().chain(b.start).chain(b.marker)).collect()
}

fn var(vars: &[Option<String>], id: NodeId) -> Result<String> {
    vars.get(id)
        .cloned()
        .flatten()
        .ok_or_else(|| CompileError::invariant(format!("node {id} has no variable")))
}

fn bind_holes(t: &mut DomTransform<'_>, block: &mut Block, bounds: &[Bound], vars: &[Option<String>]) -> Result<()> {
    for bound in bounds {
        let Some(node) = bound.node else { continue };
        let el = var(vars, node)?;
        let marker = bound.marker.map(|m| var(vars, m)).transpose()?;
        block.hole(t, &bound.hole, &el, marker.as_deref())?;
    }
    Ok(())
}

/// Declare the walker and one variable per bound node
fn walk(
    t: &mut DomTransform<'_>,
    tree: &TemplateTree,
    bounds: &[Bound],
    name: &str,
) -> Result<(Block, Vec<Option<String>>)> {
    let mut targets = needed_nodes(bounds);
    targets.extend(tree.roots().iter().copied());
    let targets: Vec<NodeId> = targets.into_iter().collect();
    let program = WalkerProgram::plan(tree, &targets)?;
    check_markers(tree, &program)?;

    t.use_helper("createWalker");
    t.use_helper("advance");
    let walker = t.ctx.generate_uid("w");
    let mut block = Block::default();
    block.push(format!("const {walker} = createWalker({name});"));

    // The walker stops on the leading marker of a fragment and on the opening
    // marker of an insertion inside an element, but nothing refers to them.
    let leading = tree.roots().first().copied().filter(|&id| tree.is_marker(id));
    let openings: BTreeSet<NodeId> = bounds.iter().filter(|b| b.node.is_some()).filter_map(|b| b.start).collect();
    let mut vars = vec![None; tree.len()];
    for (node, steps) in program.segments() {
        if Some(node) == leading || openings.contains(&node) {
            block.push(format!("advance({walker}, {});", js_string(&steps)));
            continue;
        }
        let var = t.ctx.generate_uid("el");
        block.push(format!("const {var} = advance({walker}, {});", js_string(&steps)));
        vars[node] = Some(var);
    }
    Ok((block, vars))
}

/// Markers in the markup, marker nodes and marker binds have to line up one
/// to one, or hydration binds values to the wrong nodes.
fn check_markers(tree: &TemplateTree, program: &WalkerProgram) -> Result<()> {
    let markers = tree.markers();
    let bound: Vec<NodeId> = program.binds().filter(|&id| tree.is_marker(id)).collect();
    let in_markup = tree.serialize().matches(HYDRATION_MARKER).count();
    if markers != bound || in_markup != markers.len() {
        return Err(CompileError::invariant(format!(
            "template has {in_markup} markers in markup and {} marker nodes, but the walker binds {}",
            markers.len(),
            bound.len()
        )));
    }
    Ok(())
}

/// A fragment rendered on the client: one value per child
fn child_array(t: &mut DomTransform<'_>, fragment: &FragmentNode) -> Result<Emitted> {
    let mut values = Vec::new();
    for item in template_children(&fragment.children) {
        values.push(match item {
            ChildItem::Text(text) => Emitted::mapped(js_string(&text), fragment.span.start),
            ChildItem::Element(child) => element(t, child)?,
            ChildItem::Insert(node) => {
                let hole = Hole::insertion(node);
                Emitted::mapped(render_tracked(&hole.value, hole.class, t)?, hole.span.start)
            }
        });
    }
    if values.len() == 1 {
        return Ok(values.remove(0));
    }
    let mut out = Emitted::mapped("[", fragment.span.start);
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.append(value);
    }
    out.push_str("]");
    Ok(out)
}

/// A fragment adopting server markup: every root-level node is bound, and
/// root-level insertions are returned in front of their markers.
fn hydrate_fragment(t: &mut DomTransform<'_>, fragment: &FragmentNode) -> Result<Emitted> {
    let (tree, bounds) = TemplateBuilder::new(MarkerMode::Hydration, &mut t.ctx.diagnostics).fragment(&fragment.children);
    let html = tree.serialize();
    let name = t.ctx.push_template(html, false);

    let (mut block, vars) = walk(t, &tree, &bounds, &name)?;
    bind_holes(t, &mut block, &bounds, &vars)?;

    let mut items = Vec::new();
    for &root in tree.roots().iter().skip(1) {
        if let Some(bound) = bounds.iter().find(|b| b.node.is_none() && b.marker == Some(root)) {
            items.push(render_tracked(&bound.hole.value, bound.hole.class, t)?);
        }
        items.push(var(&vars, root)?);
    }
    block.push(format!("return [{}];", items.join(", ")));
    Ok(block.into_iife(fragment.span))
}
