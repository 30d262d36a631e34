//! DOM and hydratable DOM code generation

use common::emit::{render_expr, Emitted};
use common::expression::js_string;
use common::{CompiledProgram, DiagnosticSink, EmitHost, JsxNode, Replacement, Result, TransformOptions};

use crate::component::transform_component;
use crate::ir::BlockContext;
use crate::output;

/// Compiles the JSX roots of one file for a DOM target
pub struct DomTransform<'o> {
    pub(crate) ctx: BlockContext<'o>,
}

impl<'o> DomTransform<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self { ctx: BlockContext::new(options) }
    }

    /// Compile every root, in source order, into one replacement each
    pub fn transform(mut self, roots: &[JsxNode], sink: &mut dyn DiagnosticSink) -> Result<CompiledProgram> {
        let mut replacements = Vec::with_capacity(roots.len());
        for root in roots {
            tracing::trace!(start = root.span().start, end = root.span().end, "compiling root");
            let code = self.compile(root)?;
            replacements.push(Replacement { span: root.span(), code });
        }
        for diagnostic in self.ctx.diagnostics.drain(..) {
            sink.report(diagnostic);
        }
        Ok(self.ctx.finish(replacements))
    }

    /// Compile one node into an expression
    pub fn compile(&mut self, node: &JsxNode) -> Result<Emitted> {
        match node {
            JsxNode::Element(element) => output::element(self, element),
            JsxNode::Fragment(fragment) => output::fragment(self, fragment),
            JsxNode::Component(component) => transform_component(self, component),
            JsxNode::Text(text) => Ok(Emitted::mapped(js_string(&text.value), text.span.start)),
            JsxNode::Expression(expr) | JsxNode::Spread(expr) => {
                Ok(Emitted::mapped(render_expr(expr, self)?, expr.span.start))
            }
        }
    }
}

impl EmitHost for DomTransform<'_> {
    fn compile_node(&mut self, node: &JsxNode) -> Result<String> {
        Ok(self.compile(node)?.code)
    }

    fn use_helper(&mut self, name: &'static str) {
        self.ctx.register_helper(name);
    }
}

#[cfg(test)]
mod tests {
    use common::{Diagnostic, DiagnosticKind, Lowering, Target};
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_semantic::SemanticBuilder;
    use oxc_span::SourceType;

    use super::*;

    fn compile(source: &str, options: &TransformOptions) -> (CompiledProgram, Vec<String>, Vec<Diagnostic>) {
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, source, SourceType::tsx()).parse().program;
        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let mut diagnostics = Vec::new();
        let roots = Lowering::new(source, options, &scoping, &mut diagnostics).collect_roots(&program);
        let compiled = DomTransform::new(options).transform(&roots, &mut diagnostics).unwrap();
        let codes = compiled.replacements.iter().map(|r| r.code.code.clone()).collect();
        (compiled, codes, diagnostics)
    }

    fn dom(source: &str) -> (CompiledProgram, Vec<String>, Vec<Diagnostic>) {
        compile(source, &TransformOptions::default())
    }

    fn hydratable(source: &str) -> (CompiledProgram, Vec<String>, Vec<Diagnostic>) {
        compile(source, &TransformOptions::with_target(Target::HydratableDom))
    }

    #[test]
    fn test_static_element_is_cloned() {
        let (compiled, codes, _) = dom(r#"<div class="a"><span>hi</span></div>"#);
        assert_eq!(codes, vec!["clone($$_templ)"]);
        assert_eq!(
            compiled.templates.declarations(),
            vec![r#"const $$_templ = template("<div class=\"a\"><span>hi</span></div>");"#]
        );
        assert_eq!(compiled.helpers.iter().copied().collect::<Vec<_>>(), vec!["template", "clone"]);
    }

    #[test]
    fn test_reactive_attribute_uses_effect() {
        let (_, codes, _) = dom("<div foo={id()} title={name} />");
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _el$1 = clone($$_templ);
          effect(() => setAttribute(_el$1, "foo", id()));
          setAttribute(_el$1, "title", name);
          return _el$1;
        })()
        "#);
    }

    #[test]
    fn test_insertions_reach_nodes_by_path() {
        let (compiled, codes, _) = dom("<div><p>a</p><span>{count()} left</span>{list}</div>");
        assert_eq!(
            compiled.templates.declarations()[0],
            r#"const $$_templ = template("<div><p>a</p><span><!> left</span></div>");"#
        );
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _el$1 = clone($$_templ);
          const _el$2 = _el$1.firstChild.nextSibling;
          const _el$3 = _el$2.firstChild;
          insert(_el$2, count, _el$3);
          insert(_el$1, list);
          return _el$1;
        })()
        "#);
    }

    #[test]
    fn test_class_and_style_entries() {
        let (compiled, codes, _) =
            dom(r#"<div class="a" $class:b={true} $class:c={on()} style={{ color: "red", width: w() }} />"#);
        assert_eq!(
            compiled.templates.declarations()[0],
            r#"const $$_templ = template("<div class=\"a b\" style=\"color: red\"></div>");"#
        );
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _el$1 = clone($$_templ);
          toggleClass(_el$1, "c", on);
          setStyle(_el$1, "width", w);
          return _el$1;
        })()
        "#);
    }

    #[test]
    fn test_dynamic_class_base_merges_everything() {
        let (_, codes, _) = dom(r#"<div class="a" $class:b={on()} className={cls()} />"#);
        assert!(codes[0].contains(r#"effect(() => setAttribute(_el$1, "class", mergeClasses("a", cls(), { b: on() })));"#));
    }

    #[test]
    fn test_events_and_delegation() {
        let (compiled, codes, _) = dom("<button onClick={go} $on:custom={handle} />");
        assert!(codes[0].contains(r#"addEventListener(_el$1, "click", go);"#));
        assert!(codes[0].contains(r#"addEventListener(_el$1, "custom", handle);"#));
        assert!(compiled.epilogue.is_empty());

        let options = TransformOptions { delegate_events: true, ..TransformOptions::default() };
        let (compiled, codes, _) = compile("<button onClick={go} />", &options);
        assert!(codes[0].contains("_el$1.$$click = go;"));
        assert_eq!(compiled.epilogue, vec![r#"delegateEvents(["click"]);"#]);
    }

    #[test]
    fn test_refs_and_directives() {
        let (_, codes, _) = dom("const fixed = setup; let node; <div $ref={node} $use:tooltip={text}><i $ref={fixed} /><b $ref={[a, b]} /></div>");
        assert!(codes[0].contains(r#"typeof node === "function" ? node(_el$1) : node = _el$1;"#));
        assert!(codes[0].contains("use(tooltip, _el$1, text);"));
        assert!(codes[0].contains("fixed(_el$2);"));
        assert!(codes[0].contains("a(_el$3), b(_el$3);"));
    }

    #[test]
    fn test_directive_names_must_be_identifiers() {
        let (_, codes, diagnostics) = dom("<div $use:my-dir={x} />");
        assert!(!codes[0].contains("use("));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedConstruct);
    }

    #[test]
    fn test_spreads_merge_once() {
        let (_, codes, _) = dom(r#"<div {...props} id="x" {...other()} class="a" $class:b={on()} />"#);
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _el$1 = clone($$_templ);
          spread(_el$1, mergeProps(props, { id: "x" }, other), () => mergeClasses(props.class, other().class, "a", { b: on() }));
          return _el$1;
        })()
        "#);
    }

    #[test]
    fn test_reactive_spread_sources_stay_lazy() {
        let (_, codes, _) = dom("<div {...other()} />");
        assert!(codes[0].contains("spread(_el$1, mergeProps(other));"));
        assert!(!codes[0].contains("const _s$"));

        let (_, codes, _) = dom(r#"<div {...pick(on())} class="a" />"#);
        assert!(codes[0].contains(
            r#"spread(_el$1, mergeProps(() => pick(on())), () => mergeClasses((pick(on())).class, "a"));"#
        ));
    }

    #[test]
    fn test_dynamic_spread_sources_are_evaluated_once() {
        let (_, codes, _) = dom(r#"<div {...make(x)} class="a" />"#);
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _el$1 = clone($$_templ);
          const _s$2 = make(x);
          spread(_el$1, mergeProps(_s$2), () => mergeClasses(_s$2.class, "a"));
          return _el$1;
        })()
        "#);
    }

    #[test]
    fn test_components_use_getters_for_reactive_props() {
        let (_, codes, _) = dom("<Button label={label()} size={2} onClick={go}><b>x</b></Button>");
        insta::assert_snapshot!(
            codes[0],
            @"createComponent(Button, { label: label, size: 2, onClick: go, get children() { return clone($$_templ); } })"
        );
    }

    #[test]
    fn test_compound_reactive_props_keep_getters() {
        let (_, codes, _) = dom("<Name full={first() + last()} />");
        assert_eq!(codes, vec!["createComponent(Name, { get full() { return first() + last(); } })"]);
    }

    #[test]
    fn test_fragment_children_array() {
        let (_, codes, _) = dom("<>text<div />{count()}</>");
        assert_eq!(codes, vec![r#"["text", clone($$_templ), count]"#]);
    }

    #[test]
    fn test_repeated_templates_are_aliased() {
        let (compiled, codes, _) = dom("const a = <div></div>; const b = <div></div>;");
        assert_eq!(codes, vec!["clone($$_templ)", "clone($$_templ_2)"]);
        assert_eq!(compiled.templates.len(), 1);
    }

    #[test]
    fn test_hydratable_element_walks_to_markers() {
        let (compiled, codes, _) = hydratable("<div><span /> {name}</div>");
        assert_eq!(
            compiled.templates.declarations()[0],
            r#"const $$_templ = template("<div><span></span> <!$><!$></div>");"#
        );
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _w$1 = createWalker($$_templ);
          const _el$2 = advance(_w$1, "f");
          advance(_w$1, "fnnm");
          const _el$3 = advance(_w$1, "nm");
          insert(_el$2, name, _el$3);
          return _el$2;
        })()
        "#);
    }

    #[test]
    fn test_hydratable_fragment_with_component() {
        let (compiled, codes, _) = hydratable("<><div/><Component/></>");
        assert_eq!(compiled.templates.declarations()[0], r#"const $$_templ = template("<!$><div></div><!$>");"#);
        insta::assert_snapshot!(codes[0], @r#"
        (() => {
          const _w$1 = createWalker($$_templ);
          advance(_w$1, "fm");
          const _el$2 = advance(_w$1, "n");
          const _el$3 = advance(_w$1, "nm");
          return [_el$2, createComponent(Component, {}), _el$3];
        })()
        "#);
    }

    #[test]
    fn test_unknown_namespace_falls_back_to_attribute() {
        let (_, codes, diagnostics) = dom("<div $foo:bar={x} />");
        assert!(codes[0].contains(r#"setAttribute(_el$1, "bar", x);"#));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownNamespace);
    }
}
