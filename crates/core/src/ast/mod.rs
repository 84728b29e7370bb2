//! Position-indexed view over a parsed document.
//!
//! [`IndexedAst`] flattens a syntax tree into an arena with parent links and
//! a line index, so that "what is under the cursor" is a bucket scan plus a
//! parent walk instead of a tree descent. Scopes for `locals` attributes and
//! labeled `include` blocks are collected during the same walk.

pub mod config;
pub mod position;
pub mod stack;

use crate::syntax::{SrcPos, SrcRange, SyntaxKind, SyntaxNode};
use std::collections::HashMap;

/// Arena index of a node in an [`IndexedAst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A syntax node flattened into the arena. Children are not stored; the
/// structure is recovered through `parent` links and arena order.
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub parent: Option<NodeId>,
    pub kind: SyntaxKind,
    pub range: SrcRange,
}

impl IndexedNode {
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.kind {
            SyntaxKind::Attribute { name } => Some(name),
            _ => None,
        }
    }

    pub fn block_type(&self) -> Option<&str> {
        match &self.kind {
            SyntaxKind::Block { block_type, .. } => Some(block_type),
            _ => None,
        }
    }

    pub fn labels(&self) -> &[String] {
        match &self.kind {
            SyntaxKind::Block { labels, .. } => labels,
            _ => &[],
        }
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels().first().map(String::as_str)
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.kind {
            SyntaxKind::StringLit { value } => Some(value),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self.kind {
            SyntaxKind::Bool { value } => Some(value),
            _ => None,
        }
    }

    pub fn reference_parts(&self) -> Option<&[String]> {
        match &self.kind {
            SyntaxKind::Reference { parts } => Some(parts),
            _ => None,
        }
    }
}

/// True for attribute nodes of any shape.
pub fn is_attribute(node: &IndexedNode) -> bool {
    matches!(node.kind, SyntaxKind::Attribute { .. })
}

/// True for block nodes of the given type, labeled or not.
pub fn is_block_of_type(node: &IndexedNode, block_type: &str) -> bool {
    node.block_type() == Some(block_type)
}

/// True for block nodes of the given type carrying at least one label.
pub fn is_labeled_block(node: &IndexedNode, block_type: &str) -> bool {
    is_block_of_type(node, block_type) && !node.labels().is_empty()
}

/// Name → defining node. Duplicate names keep the later definition.
pub type Scope = HashMap<String, NodeId>;

/// 1-based start line → nodes starting on that line, in pre-order.
pub type LineIndex = HashMap<usize, Vec<NodeId>>;

/// Arena, line index and walk-time scopes for one document.
#[derive(Debug, Default)]
pub struct IndexedAst {
    nodes: Vec<IndexedNode>,
    line_index: LineIndex,
    locals: Scope,
    includes: Scope,
}

enum Step {
    Enter(SyntaxNode),
    Exit,
}

impl IndexedAst {
    /// Indexes a syntax tree in a single pre-order walk. Never fails:
    /// partial trees index whatever nodes exist.
    pub fn build(root: SyntaxNode) -> Self {
        let mut ast = Self::default();
        let mut ancestors: Vec<NodeId> = Vec::new();
        let mut work = vec![Step::Enter(root)];

        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node) => {
                    let SyntaxNode { kind, range, children } = node;
                    let id = NodeId(ast.nodes.len() as u32);
                    ast.nodes.push(IndexedNode {
                        parent: ancestors.last().copied(),
                        kind,
                        range,
                    });
                    ast.line_index.entry(range.start.line).or_default().push(id);
                    ast.record_scopes(id);

                    ancestors.push(id);
                    work.push(Step::Exit);
                    for child in children.into_iter().rev() {
                        work.push(Step::Enter(child));
                    }
                }
                Step::Exit => {
                    ancestors.pop();
                }
            }
        }

        ast
    }

    fn record_scopes(&mut self, id: NodeId) {
        if self.is_locals_attribute(id) {
            if let Some(name) = self.node(id).attribute_name().map(str::to_string) {
                self.locals.insert(name, id);
            }
        } else if is_labeled_block(self.node(id), "include") {
            if let Some(label) = self.node(id).first_label().map(str::to_string) {
                self.includes.insert(label, id);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> &IndexedNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &IndexedNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Attribute name → attribute node, for direct children of the body of
    /// a `locals` block.
    pub fn locals(&self) -> &Scope {
        &self.locals
    }

    /// First label → block node, for labeled `include` blocks.
    pub fn includes(&self) -> &Scope {
        &self.includes
    }

    /// True when `id` is an attribute sitting directly in the body of a
    /// `locals` block. Attributes nested deeper (inside objects or other
    /// blocks) do not qualify.
    pub fn is_locals_attribute(&self, id: NodeId) -> bool {
        if !is_attribute(self.node(id)) {
            return false;
        }
        let Some(body) = self.parent(id) else {
            return false;
        };
        if !matches!(self.node(body).kind, SyntaxKind::Body) {
            return false;
        }
        let Some(block) = self.parent(body) else {
            return false;
        };
        is_block_of_type(self.node(block), "locals")
    }

    /// Finds the most specific node covering `pos`.
    ///
    /// The bucket for the position's line is scanned in order, keeping the
    /// last node starting at or before the column. When the line has no
    /// bucket (or nothing qualifies), the last node of the nearest earlier
    /// non-empty line is used instead. The candidate and its ancestors are
    /// then walked upward until a node ends strictly after the position.
    pub fn find_node_at(&self, pos: SrcPos) -> Option<NodeId> {
        let mut closest = None;
        if let Some(entries) = self.line_index.get(&pos.line) {
            for &id in entries {
                if self.node(id).range.start.column <= pos.column {
                    closest = Some(id);
                }
            }
        }
        if closest.is_none() {
            for line in (1..pos.line).rev() {
                if let Some(&last) = self.line_index.get(&line).and_then(|e| e.last()) {
                    closest = Some(last);
                    break;
                }
            }
        }

        let mut current = closest;
        while let Some(id) = current {
            if self.node(id).range.ends_after(pos) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Walks from `id` through its ancestors, returning the first node
    /// matching the predicate. The starting node itself is a candidate.
    pub fn find_first_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&IndexedNode) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(i) = current {
            if predicate(self.node(i)) {
                return Some(i);
            }
            current = self.parent(i);
        }
        None
    }

    /// First direct child of `parent` matching the predicate, in document
    /// order.
    pub fn find_child(
        &self,
        parent: NodeId,
        predicate: impl Fn(&IndexedNode) -> bool,
    ) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .find(|&(_, n)| n.parent == Some(parent) && predicate(n))
            .map(|(i, _)| NodeId(i as u32))
    }

    /// The named attribute in the body of `block`, if present.
    pub fn block_attribute(&self, block: NodeId, name: &str) -> Option<NodeId> {
        let body = self.find_child(block, |n| matches!(n.kind, SyntaxKind::Body))?;
        self.find_child(body, |n| n.attribute_name() == Some(name))
    }

    /// The string literal value of an attribute, when the value is a plain
    /// string.
    pub fn attribute_string(&self, attribute: NodeId) -> Option<&str> {
        let value = self.find_child(attribute, |n| matches!(n.kind, SyntaxKind::StringLit { .. }))?;
        self.node(value).string_value()
    }

    /// The boolean value of an attribute, when the value is a bool literal.
    pub fn attribute_bool(&self, attribute: NodeId) -> Option<bool> {
        let value = self.find_child(attribute, |n| matches!(n.kind, SyntaxKind::Bool { .. }))?;
        self.node(value).bool_value()
    }
}
