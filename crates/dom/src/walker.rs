//! Walker programs for hydration
//!
//! A hydrating client does not clone the template. It walks the markup the
//! server already rendered with a cursor, and has to reach every bound node
//! in the same order the compiler planned. Inserted content may occupy any
//! number of nodes in front of its marker, so every time the planned path
//! lands on a marker the cursor seeks forward to the real one.

use common::{CompileError, Result};

use crate::template::{NodeId, TemplateTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    FirstChild,
    NextSibling,
    /// Skip ahead to the next hydration marker, staying put on one
    SeekMarker,
    Parent,
    /// The cursor is on this node; hand it out
    Bind(NodeId),
}

impl WalkStep {
    pub fn code(self) -> Option<char> {
        match self {
            Self::FirstChild => Some('f'),
            Self::NextSibling => Some('n'),
            Self::SeekMarker => Some('m'),
            Self::Parent => Some('u'),
            Self::Bind(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerProgram {
    pub steps: Vec<WalkStep>,
}

impl WalkerProgram {
    /// Plan a walk that binds `targets` in order, starting above the roots.
    /// Targets have to be in document order.
    pub fn plan(tree: &TemplateTree, targets: &[NodeId]) -> Result<Self> {
        let mut walk = Walk { tree, position: Vec::new(), steps: Vec::new() };
        for &target in targets {
            walk.move_to(target)?;
            walk.steps.push(WalkStep::Bind(target));
        }
        Ok(Self { steps: walk.steps })
    }

    /// `(node, encoded steps leading to it)` for every bind, in order
    pub fn segments(&self) -> Vec<(NodeId, String)> {
        let mut segments = Vec::new();
        let mut pending = String::new();
        for step in &self.steps {
            match step {
                WalkStep::Bind(node) => segments.push((*node, std::mem::take(&mut pending))),
                step => pending.extend(step.code()),
            }
        }
        segments
    }

    /// Bound nodes in order
    pub fn binds(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.steps.iter().filter_map(|step| match step {
            WalkStep::Bind(node) => Some(*node),
            _ => None,
        })
    }
}

struct Walk<'t> {
    tree: &'t TemplateTree,
    /// Child indices of the cursor; empty above the roots
    position: Vec<usize>,
    steps: Vec<WalkStep>,
}

impl Walk<'_> {
    fn move_to(&mut self, target: NodeId) -> Result<()> {
        let path = self.tree.path(target);
        if path <= self.position {
            return Err(CompileError::invariant(format!(
                "walker target {target} is not after the current node in document order"
            )));
        }

        let common = self.position.iter().zip(&path).take_while(|(a, b)| a == b).count();
        if common < self.position.len() {
            for _ in common + 1..self.position.len() {
                self.position.pop();
                self.steps.push(WalkStep::Parent);
            }
            let from = self.position[common];
            for index in from + 1..=path[common] {
                self.position[common] = index;
                self.step(WalkStep::NextSibling);
            }
        }
        for &index in &path[self.position.len()..] {
            self.position.push(0);
            self.step(WalkStep::FirstChild);
            for sibling in 1..=index {
                if let Some(last) = self.position.last_mut() {
                    *last = sibling;
                }
                self.step(WalkStep::NextSibling);
            }
        }
        Ok(())
    }

    fn step(&mut self, step: WalkStep) {
        self.steps.push(step);
        if self.tree.at(&self.position).is_some_and(|id| self.tree.is_marker(id)) {
            self.steps.push(WalkStep::SeekMarker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{MarkerMode, NodeKind};

    fn element(tree: &mut TemplateTree, parent: Option<NodeId>, tag: &str) -> NodeId {
        tree.push(parent, NodeKind::Element { tag: tag.into(), attrs: vec![], void: false })
    }

    fn encoded(program: &WalkerProgram) -> Vec<String> {
        program.segments().into_iter().map(|(_, steps)| steps).collect()
    }

    #[test]
    fn test_seeks_every_marker_on_the_way() {
        // <div><span></span><!$><p></p><!$></div>
        let mut tree = TemplateTree::new(MarkerMode::Hydration);
        let div = element(&mut tree, None, "div");
        element(&mut tree, Some(div), "span");
        let first = tree.push(Some(div), NodeKind::Marker);
        let p = element(&mut tree, Some(div), "p");
        let second = tree.push(Some(div), NodeKind::Marker);

        let program = WalkerProgram::plan(&tree, &[div, first, p, second]).unwrap();
        assert_eq!(encoded(&program), vec!["f", "fnm", "n", "nm"]);

        let program = WalkerProgram::plan(&tree, &[div, p]).unwrap();
        assert_eq!(encoded(&program), vec!["f", "fnmn"]);
    }

    #[test]
    fn test_climbs_back_to_siblings() {
        // <div><p><b></b></p><i></i></div>
        let mut tree = TemplateTree::new(MarkerMode::Hydration);
        let div = element(&mut tree, None, "div");
        let p = element(&mut tree, Some(div), "p");
        let b = element(&mut tree, Some(p), "b");
        let i = element(&mut tree, Some(div), "i");

        let program = WalkerProgram::plan(&tree, &[div, b, i]).unwrap();
        assert_eq!(encoded(&program), vec!["f", "ff", "un"]);
        assert_eq!(program.binds().collect::<Vec<_>>(), vec![div, b, i]);
    }

    #[test]
    fn test_fragment_roots() {
        // <!$><div></div><!$>
        let mut tree = TemplateTree::new(MarkerMode::Hydration);
        let lead = tree.push(None, NodeKind::Marker);
        let div = element(&mut tree, None, "div");
        let marker = tree.push(None, NodeKind::Marker);

        let program = WalkerProgram::plan(&tree, &[lead, div, marker]).unwrap();
        assert_eq!(encoded(&program), vec!["fm", "n", "nm"]);
    }

    #[test]
    fn test_out_of_order_targets_are_rejected() {
        let mut tree = TemplateTree::new(MarkerMode::Hydration);
        let div = element(&mut tree, None, "div");
        let span = element(&mut tree, Some(div), "span");

        assert!(WalkerProgram::plan(&tree, &[span, div]).is_err());
        assert!(WalkerProgram::plan(&tree, &[div, div]).is_err());
    }
}
