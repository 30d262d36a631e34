//! Holes: template positions that need a runtime-bound value

use oxc_span::Span;

use crate::classify::{Classification, StaticValue};
use crate::jsx::{ExprNode, JsxNode};
use crate::props::PropSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoleKind {
    Attribute,
    Class,
    Style,
    CssVar,
    Property,
    Event,
    Ref,
    Directive,
    ChildInsertion,
    ComponentProp,
    /// Spread props on a native element
    Spread,
}

impl HoleKind {
    /// Only child insertions change the node structure around them
    pub fn needs_marker(self) -> bool {
        matches!(self, Self::ChildInsertion)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub kind: HoleKind,
    /// Attribute, property, class, event or directive name. Empty for insertions.
    pub name: String,
    pub class: Classification,
    pub value: HoleValue,
    pub span: Span,
}

impl Hole {
    pub fn new(kind: HoleKind, name: impl Into<String>, class: Classification, value: HoleValue, span: Span) -> Self {
        Self { kind, name: name.into(), class, value, span }
    }

    /// A child insertion for an expression, component or spread child
    pub fn insertion(node: &JsxNode) -> Self {
        let (class, value) = match node {
            JsxNode::Expression(expr) | JsxNode::Spread(expr) => (expr.class, HoleValue::Expr(expr.clone())),
            other => (Classification::Dynamic, HoleValue::Node(other.clone())),
        };
        Self::new(HoleKind::ChildInsertion, "", class, value, node.span())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoleValue {
    Expr(ExprNode),
    Static(StaticValue),
    /// A component, or JSX used as an attribute value
    Node(JsxNode),
    /// Every class or style source of one element, combined in one call
    Merge(MergeGroup),
    Spread(SpreadGroup),
}

/// Class or style sources of one element.
///
/// Static sources are folded into one string at build time. `bases` are whole
/// dynamic values (`class={cls()}`) and `entries` are per-name toggles
/// (`$class:active={on()}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeGroup {
    pub statics: Vec<String>,
    pub bases: Vec<ExprNode>,
    pub entries: Vec<Hole>,
}

impl MergeGroup {
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.bases.is_empty() && self.entries.is_empty()
    }

    pub fn is_static(&self) -> bool {
        self.bases.is_empty() && self.entries.is_empty()
    }

    pub fn class(&self) -> Classification {
        self.bases
            .iter()
            .map(|b| b.class)
            .chain(self.entries.iter().map(|e| e.class))
            .max()
            .unwrap_or(Classification::Static)
    }
}

/// Everything a `{...props}` element binds through one spread call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadGroup {
    /// Spread sources and discrete props, left to right
    pub segments: Vec<PropSegment>,
    pub class: MergeGroup,
    pub style: MergeGroup,
}

impl SpreadGroup {
    /// Spread sources in source order
    pub fn sources(&self) -> impl Iterator<Item = &ExprNode> {
        self.segments.iter().filter_map(|segment| match segment {
            PropSegment::Spread(expr) => Some(expr),
            PropSegment::Props(_) => None,
        })
    }
}
