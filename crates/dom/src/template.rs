//! Template trees for the DOM targets
//!
//! A [`TemplateTree`] is the node structure the browser will produce when it
//! parses the template markup. Nodes are allocated in document order, so a
//! smaller [`NodeId`] always means an earlier node in a pre-order walk.

use common::attrs::{plan_element, MarkupAttr};
use common::children::{template_children, ChildItem};
use common::expression::{escape_attribute, escape_content};
use common::jsx::{ElementNode, JsxNode};
use common::{Diagnostic, Hole, DOM_MARKER, HYDRATION_MARKER};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String, attrs: Vec<MarkupAttr>, void: bool },
    Text(String),
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// How insertion points are marked in the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMode {
    /// `<!>`, only where a later sibling would otherwise shift
    Dom,
    /// `<!$>` after every insertion point, before one that follows text, and
    /// leading a root fragment
    Hydration,
}

impl MarkerMode {
    fn markup(self) -> &'static str {
        match self {
            Self::Dom => DOM_MARKER,
            Self::Hydration => HYDRATION_MARKER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateTree {
    pub mode: MarkerMode,
    nodes: Vec<TemplateNode>,
    roots: Vec<NodeId>,
}

/// A hole tied to the template nodes it needs at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub hole: Hole,
    /// The element an attribute-like hole binds to, or the parent of an
    /// insertion. `None` for insertions at the root of a fragment.
    pub node: Option<NodeId>,
    /// Marker the inserted content goes in front of
    pub marker: Option<NodeId>,
    /// Marker opening the insertion, so server text in front of it stays a
    /// node of its own
    pub start: Option<NodeId>,
}

impl TemplateTree {
    pub fn new(mode: MarkerMode) -> Self {
        Self { mode, nodes: Vec::new(), roots: Vec::new() }
    }

    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TemplateNode { kind, parent, children: Vec::new() });
        match parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &TemplateNode {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_marker(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].kind, NodeKind::Marker)
    }

    /// Marker nodes in document order
    pub fn markers(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).filter(|&id| self.is_marker(id)).collect()
    }

    /// Child indices from the template root down to `id`
    pub fn path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        loop {
            let siblings = match self.nodes[current].parent {
                Some(parent) => &self.nodes[parent].children,
                None => &self.roots,
            };
            path.push(siblings.iter().position(|&s| s == current).unwrap_or_default());
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// The node at `path`, if there is one
    pub fn at(&self, path: &[usize]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut id = *self.roots.get(*first)?;
        for index in rest {
            id = *self.nodes[id].children.get(*index)?;
        }
        Some(id)
    }

    /// The markup the runtime parses into this tree
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.write_node(root, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, attrs, void } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        // `<` is escaped too so markers only ever appear as nodes
                        out.push_str(&escape_attribute(value).replace('<', "&lt;"));
                        out.push('"');
                    }
                }
                out.push('>');
                if !void {
                    for &child in &self.nodes[id].children {
                        self.write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_content(text)),
            NodeKind::Marker => out.push_str(self.mode.markup()),
        }
    }
}

/// Builds a [`TemplateTree`] and collects every hole in document order
pub struct TemplateBuilder<'d> {
    tree: TemplateTree,
    bounds: Vec<Bound>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'d> TemplateBuilder<'d> {
    pub fn new(mode: MarkerMode, diagnostics: &'d mut Vec<Diagnostic>) -> Self {
        Self { tree: TemplateTree::new(mode), bounds: Vec::new(), diagnostics }
    }

    pub fn element(mut self, element: &ElementNode) -> (TemplateTree, Vec<Bound>) {
        self.add_element(None, element);
        (self.tree, self.bounds)
    }

    /// A root fragment. Hydration templates start with a marker so the walker
    /// has a fixed first node.
    pub fn fragment(mut self, children: &[JsxNode]) -> (TemplateTree, Vec<Bound>) {
        if self.tree.mode == MarkerMode::Hydration {
            self.tree.push(None, NodeKind::Marker);
        }
        self.add_children(None, children);
        (self.tree, self.bounds)
    }

    fn add_element(&mut self, parent: Option<NodeId>, element: &ElementNode) -> NodeId {
        let plan = plan_element(element, self.diagnostics);
        let id = self.tree.push(
            parent,
            NodeKind::Element { tag: element.tag.clone(), attrs: plan.markup, void: element.is_void() },
        );
        self.bounds
            .extend(plan.holes.into_iter().map(|hole| Bound { hole, node: Some(id), marker: None, start: None }));
        if !element.is_void() {
            self.add_children(Some(id), &element.children);
        }
        id
    }

    fn add_children(&mut self, parent: Option<NodeId>, children: &[JsxNode]) {
        let items = template_children(children);
        let count = items.len();
        let mut after_text = false;
        for (index, item) in items.into_iter().enumerate() {
            let is_text = matches!(item, ChildItem::Text(_));
            match item {
                ChildItem::Text(text) => {
                    self.tree.push(parent, NodeKind::Text(text));
                }
                ChildItem::Element(element) => {
                    self.add_element(parent, element);
                }
                ChildItem::Insert(node) => {
                    let hydration = self.tree.mode == MarkerMode::Hydration;
                    let start = (hydration && after_text).then(|| self.tree.push(parent, NodeKind::Marker));
                    let marked = hydration || index + 1 < count;
                    let marker = marked.then(|| self.tree.push(parent, NodeKind::Marker));
                    self.bounds.push(Bound { hole: Hole::insertion(node), node: parent, marker, start });
                }
            }
            after_text = is_text;
        }
    }
}

#[cfg(test)]
mod tests {
    use common::classify::Classification;
    use common::jsx::{ExprNode, ExprShape, TextNode};
    use common::HoleKind;
    use oxc_span::Span;

    use super::*;

    fn div(children: Vec<JsxNode>) -> ElementNode {
        ElementNode { tag: "div".into(), attrs: vec![], children, span: Span::default() }
    }

    fn text(value: &str) -> JsxNode {
        JsxNode::Text(TextNode { value: value.into(), span: Span::default() })
    }

    fn expr(source: &str) -> JsxNode {
        JsxNode::Expression(ExprNode {
            span: Span::default(),
            text: source.into(),
            class: Classification::Dynamic,
            shape: ExprShape::Other,
            nested: vec![],
        })
    }

    #[test]
    fn test_dom_markers_only_before_later_siblings() {
        let mut diagnostics = vec![];
        let element = div(vec![text("a "), expr("x"), text(" b"), expr("y")]);
        let (tree, bounds) = TemplateBuilder::new(MarkerMode::Dom, &mut diagnostics).element(&element);
        assert_eq!(tree.serialize(), "<div>a <!> b</div>");
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].marker, Some(2));
        assert_eq!(bounds[1].marker, None);
        assert!(bounds.iter().all(|b| b.hole.kind == HoleKind::ChildInsertion && b.node == Some(0)));
    }

    #[test]
    fn test_hydration_marks_every_insertion() {
        let mut diagnostics = vec![];
        let element = div(vec![expr("x"), text("&<")]);
        let (tree, bounds) = TemplateBuilder::new(MarkerMode::Hydration, &mut diagnostics).element(&element);
        assert_eq!(tree.serialize(), "<div><!$>&amp;&lt;</div>");
        assert_eq!(bounds[0].marker, Some(1));
        assert_eq!(bounds[0].start, None);
    }

    #[test]
    fn test_hydration_opens_insertions_after_text() {
        let mut diagnostics = vec![];
        let element = div(vec![text("a"), expr("x"), expr("y")]);
        let (tree, bounds) = TemplateBuilder::new(MarkerMode::Hydration, &mut diagnostics).element(&element);
        assert_eq!(tree.serialize(), "<div>a<!$><!$><!$></div>");
        assert_eq!((bounds[0].start, bounds[0].marker), (Some(2), Some(3)));
        // The second insertion follows a marker, not text
        assert_eq!((bounds[1].start, bounds[1].marker), (None, Some(4)));

        let (tree, bounds) = TemplateBuilder::new(MarkerMode::Dom, &mut diagnostics).element(&element);
        assert_eq!(tree.serialize(), "<div>a<!></div>");
        assert_eq!(bounds[0].start, None);
    }

    #[test]
    fn test_fragment_gets_leading_marker() {
        let mut diagnostics = vec![];
        let children = vec![JsxNode::Element(div(vec![])), expr("x")];
        let (tree, bounds) = TemplateBuilder::new(MarkerMode::Hydration, &mut diagnostics).fragment(&children);
        assert_eq!(tree.serialize(), "<!$><div></div><!$>");
        assert_eq!(tree.markers(), vec![0, 2]);
        assert_eq!(bounds[0].node, None);
    }

    #[test]
    fn test_paths() {
        let mut tree = TemplateTree::new(MarkerMode::Dom);
        let root = tree.push(None, NodeKind::Element { tag: "ul".into(), attrs: vec![], void: false });
        tree.push(Some(root), NodeKind::Text("a".into()));
        let li = tree.push(Some(root), NodeKind::Element { tag: "li".into(), attrs: vec![], void: false });
        assert_eq!(tree.path(li), vec![0, 1]);
        assert_eq!(tree.at(&[0, 1]), Some(li));
        assert_eq!(tree.at(&[0, 2]), None);
    }
}
