//! Semantic view over stack documents (`terragrunt.stack.hcl`): labeled
//! `unit` and `stack` blocks with `source` and `path` attributes.

use super::{is_attribute, is_labeled_block, IndexedAst, NodeId, Scope};
use crate::syntax::SrcPos;

#[derive(Debug)]
pub struct StackAst {
    index: IndexedAst,
    units: Scope,
    stacks: Scope,
}

impl StackAst {
    pub fn new(index: IndexedAst) -> Self {
        let mut units = Scope::new();
        let mut stacks = Scope::new();
        for (id, node) in index.iter() {
            let scope = if is_labeled_block(node, "unit") {
                &mut units
            } else if is_labeled_block(node, "stack") {
                &mut stacks
            } else {
                continue;
            };
            if let Some(label) = node.first_label() {
                scope.insert(label.to_string(), id);
            }
        }
        Self { index, units, stacks }
    }

    pub fn index(&self) -> &IndexedAst {
        &self.index
    }

    pub fn find_node_at(&self, pos: SrcPos) -> Option<NodeId> {
        self.index.find_node_at(pos)
    }

    pub fn units(&self) -> &Scope {
        &self.units
    }

    pub fn stacks(&self) -> &Scope {
        &self.stacks
    }

    /// The labeled unit block covering `pos`, if any.
    pub fn find_unit_at(&self, pos: SrcPos) -> Option<NodeId> {
        let node = self.index.find_node_at(pos)?;
        self.index
            .find_first_ancestor(node, |n| is_labeled_block(n, "unit"))
    }

    /// The labeled stack block covering `pos`, if any.
    pub fn find_stack_at(&self, pos: SrcPos) -> Option<NodeId> {
        let node = self.index.find_node_at(pos)?;
        self.index
            .find_first_ancestor(node, |n| is_labeled_block(n, "stack"))
    }

    /// Label of the unit block enclosing `node`.
    pub fn unit_label(&self, node: NodeId) -> Option<String> {
        self.enclosing_label(node, "unit")
    }

    /// Label of the stack block enclosing `node`.
    pub fn stack_label(&self, node: NodeId) -> Option<String> {
        self.enclosing_label(node, "stack")
    }

    /// The `source` string of the enclosing unit block, but only when the
    /// enclosing attribute is itself named `source`.
    pub fn unit_source(&self, node: NodeId) -> Option<String> {
        self.enclosing_attribute_string(node, "unit", "source")
    }

    /// The `source` string of the enclosing stack block, with the same
    /// attribute restriction as [`unit_source`](Self::unit_source).
    pub fn stack_source(&self, node: NodeId) -> Option<String> {
        self.enclosing_attribute_string(node, "stack", "source")
    }

    /// The declared `path` attribute of the unit block with this label.
    pub fn unit_declared_path(&self, label: &str) -> Option<String> {
        self.declared_path(&self.units, label)
    }

    /// The declared `path` attribute of the stack block with this label.
    pub fn stack_declared_path(&self, label: &str) -> Option<String> {
        self.declared_path(&self.stacks, label)
    }

    /// True when the unit block with this label opts out of the
    /// `.terragrunt-stack` directory layout.
    pub fn unit_no_stack(&self, label: &str) -> bool {
        self.no_stack_flag(&self.units, label)
    }

    pub fn stack_no_stack(&self, label: &str) -> bool {
        self.no_stack_flag(&self.stacks, label)
    }

    /// The attribute enclosing `node`, when there is one. Used by callers
    /// that only act on attribute positions.
    pub fn enclosing_attribute(&self, node: NodeId) -> Option<NodeId> {
        self.index.find_first_ancestor(node, is_attribute)
    }

    fn enclosing_label(&self, node: NodeId, block_type: &str) -> Option<String> {
        let block = self
            .index
            .find_first_ancestor(node, |n| is_labeled_block(n, block_type))?;
        self.index.node(block).first_label().map(str::to_string)
    }

    fn enclosing_attribute_string(
        &self,
        node: NodeId,
        block_type: &str,
        attribute: &str,
    ) -> Option<String> {
        let attr = self.enclosing_attribute(node)?;
        if self.index.node(attr).attribute_name() != Some(attribute) {
            return None;
        }
        self.index
            .find_first_ancestor(attr, |n| is_labeled_block(n, block_type))?;
        self.index.attribute_string(attr).map(str::to_string)
    }

    fn declared_path(&self, scope: &Scope, label: &str) -> Option<String> {
        let block = *scope.get(label)?;
        let attr = self.index.block_attribute(block, "path")?;
        self.index.attribute_string(attr).map(str::to_string)
    }

    fn no_stack_flag(&self, scope: &Scope, label: &str) -> bool {
        let Some(&block) = scope.get(label) else {
            return false;
        };
        self.index
            .block_attribute(block, "no_dot_terragrunt_stack")
            .and_then(|attr| self.index.attribute_bool(attr))
            .unwrap_or(false)
    }
}
