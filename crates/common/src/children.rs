//! Normalized children of a template element or fragment

use crate::classify::Classification;
use crate::jsx::{ElementNode, JsxNode};

/// One child position as it appears in the template
#[derive(Debug, Clone, PartialEq)]
pub enum ChildItem<'n> {
    /// Unescaped text, adjacent static text already merged
    Text(String),
    Element(&'n ElementNode),
    /// Content only known at runtime: expressions, components and spreads
    Insert(&'n JsxNode),
}

/// Flatten nested fragments, inline static expressions as text and merge
/// adjacent text, so every item is exactly one node in the parsed markup.
pub fn template_children(children: &[JsxNode]) -> Vec<ChildItem<'_>> {
    let mut items = Vec::with_capacity(children.len());
    collect(children, &mut items);
    items
}

fn collect<'n>(children: &'n [JsxNode], items: &mut Vec<ChildItem<'n>>) {
    for child in children {
        match child {
            JsxNode::Text(text) => push_text(items, &text.value),
            JsxNode::Expression(expr) if expr.class == Classification::Static => {
                if let Some(text) = expr.static_value().and_then(|v| v.as_text()) {
                    push_text(items, &text);
                }
            }
            JsxNode::Fragment(fragment) => collect(&fragment.children, items),
            JsxNode::Element(element) => items.push(ChildItem::Element(element)),
            JsxNode::Expression(_) | JsxNode::Component(_) | JsxNode::Spread(_) => {
                items.push(ChildItem::Insert(child));
            }
        }
    }
}

fn push_text(items: &mut Vec<ChildItem<'_>>, text: &str) {
    if text.is_empty() {
        return;
    }
    match items.last_mut() {
        Some(ChildItem::Text(existing)) => existing.push_str(text),
        _ => items.push(ChildItem::Text(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_semantic::SemanticBuilder;
    use oxc_span::SourceType;

    use super::*;
    use crate::jsx::Lowering;
    use crate::options::TransformOptions;

    #[test]
    fn test_fragments_flatten_and_text_merges() {
        let source = r#"<div>a{"b"}<>c<span /></>{x}<C /></div>"#;
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, source, SourceType::tsx()).parse().program;
        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let options = TransformOptions::default();
        let mut diagnostics = Vec::new();
        let roots = Lowering::new(source, &options, &scoping, &mut diagnostics).collect_roots(&program);
        let JsxNode::Element(div) = &roots[0] else { panic!("expected element") };

        let items = template_children(&div.children);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], ChildItem::Text("abc".into()));
        assert!(matches!(items[1], ChildItem::Element(span) if span.tag == "span"));
        assert!(matches!(items[2], ChildItem::Insert(JsxNode::Expression(_))));
        assert!(matches!(items[3], ChildItem::Insert(JsxNode::Component(_))));
    }
}
