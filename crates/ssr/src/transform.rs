//! SSR transform
//!
//! Every JSX root becomes an expression producing its HTML as a string.
//! Dynamic values are escaped with the same minimal rules the markup uses.

use common::emit::{render_expr, Emitted};
use common::expression::js_string;
use common::{CompiledProgram, DiagnosticSink, EmitHost, JsxNode, Replacement, Result, TransformOptions};

use crate::component::transform_component;
use crate::ir::SsrContext;
use crate::template;

/// Compiles the JSX roots of one file for server rendering
pub struct SsrTransform<'o> {
    pub(crate) ctx: SsrContext<'o>,
}

impl<'o> SsrTransform<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self { ctx: SsrContext::new(options) }
    }

    pub fn transform(mut self, roots: &[JsxNode], sink: &mut dyn DiagnosticSink) -> Result<CompiledProgram> {
        let mut replacements = Vec::with_capacity(roots.len());
        for root in roots {
            tracing::trace!(start = root.span().start, end = root.span().end, "rendering root");
            let code = self.compile(root)?;
            replacements.push(Replacement { span: root.span(), code });
        }
        for diagnostic in self.ctx.diagnostics.drain(..) {
            sink.report(diagnostic);
        }
        Ok(self.ctx.finish(replacements))
    }

    pub fn compile(&mut self, node: &JsxNode) -> Result<Emitted> {
        match node {
            JsxNode::Element(element) => template::element(self, element),
            JsxNode::Fragment(fragment) => template::fragment(self, fragment),
            JsxNode::Component(component) => transform_component(self, component),
            JsxNode::Text(text) => Ok(Emitted::mapped(js_string(&text.value), text.span.start)),
            JsxNode::Expression(expr) | JsxNode::Spread(expr) => {
                Ok(Emitted::mapped(render_expr(expr, self)?, expr.span.start))
            }
        }
    }
}

impl EmitHost for SsrTransform<'_> {
    fn compile_node(&mut self, node: &JsxNode) -> Result<String> {
        Ok(self.compile(node)?.code)
    }

    fn use_helper(&mut self, name: &'static str) {
        self.ctx.register_helper(name);
    }
}
