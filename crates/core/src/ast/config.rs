//! Semantic view over a plain Terragrunt configuration document
//! (`terragrunt.hcl` and friends): include labels, dependency labels and
//! references to named locals.

use super::{is_attribute, is_labeled_block, IndexedAst, NodeId, Scope};
use crate::syntax::SrcPos;

/// An [`IndexedAst`] plus the scopes a config document defines. The locals
/// and includes scopes come from the indexing walk; dependencies are
/// collected by a full scan here.
#[derive(Debug)]
pub struct ConfigAst {
    index: IndexedAst,
    dependencies: Scope,
}

impl ConfigAst {
    pub fn new(index: IndexedAst) -> Self {
        let mut dependencies = Scope::new();
        for (id, node) in index.iter() {
            if is_labeled_block(node, "dependency") {
                if let Some(label) = node.first_label() {
                    dependencies.insert(label.to_string(), id);
                }
            }
        }
        Self { index, dependencies }
    }

    pub fn index(&self) -> &IndexedAst {
        &self.index
    }

    pub fn find_node_at(&self, pos: SrcPos) -> Option<NodeId> {
        self.index.find_node_at(pos)
    }

    pub fn locals(&self) -> &Scope {
        self.index.locals()
    }

    pub fn includes(&self) -> &Scope {
        self.index.includes()
    }

    pub fn dependencies(&self) -> &Scope {
        &self.dependencies
    }

    /// Label of the include block enclosing `node`. Matches anywhere inside
    /// the block, its label line included.
    pub fn include_label(&self, node: NodeId) -> Option<String> {
        let block = self
            .index
            .find_first_ancestor(node, |n| is_labeled_block(n, "include"))?;
        self.index.node(block).first_label().map(str::to_string)
    }

    /// Label of the dependency block enclosing `node`, but only when the
    /// enclosing attribute is `config_path`. Other attributes of a
    /// dependency block are not navigation targets.
    pub fn dependency_label(&self, node: NodeId) -> Option<String> {
        let attr = self.index.find_first_ancestor(node, is_attribute)?;
        if self.index.node(attr).attribute_name() != Some("config_path") {
            return None;
        }
        let block = self
            .index
            .find_first_ancestor(attr, |n| is_labeled_block(n, "dependency"))?;
        self.index.node(block).first_label().map(str::to_string)
    }

    /// Name of the referenced local when `node` sits inside a two-part
    /// dotted reference rooted at `local`.
    pub fn local_reference(&self, node: NodeId) -> Option<String> {
        let reference = self
            .index
            .find_first_ancestor(node, |n| n.reference_parts().is_some())?;
        let parts = self.index.node(reference).reference_parts()?;
        match parts {
            [root, name] if root.as_str() == "local" => Some(name.clone()),
            _ => None,
        }
    }

    /// The `path` attribute value of the include block with this label.
    pub fn include_path(&self, label: &str) -> Option<String> {
        let block = *self.includes().get(label)?;
        let attr = self.index.block_attribute(block, "path")?;
        self.index.attribute_string(attr).map(str::to_string)
    }

    /// The `config_path` attribute value of the dependency block with this
    /// label.
    pub fn dependency_config_path(&self, label: &str) -> Option<String> {
        let block = *self.dependencies.get(label)?;
        let attr = self.index.block_attribute(block, "config_path")?;
        self.index.attribute_string(attr).map(str::to_string)
    }
}
