//! Human-readable dump of a parse tree.
//!
//! One node per line in postorder (the array order), indented by depth:
//!
//! ```text
//!   {text: 'message', subtree_size: 1}
//!   {kind: Name, text: 'Test', subtree_size: 1}
//!   {text: '{', subtree_size: 1}
//!   {kind: ScopeClose, text: '}', subtree_size: 1}
//! {kind: Message, text: 'message', subtree_size: 5}
//! ```
//!
//! Untagged nodes omit `kind`, and `has_error` only appears when set.

use crate::tokenized_buffer::TokenizedBuffer;
use crate::tree::{NodeId, ParseTree};
use std::fmt;

pub struct TreePrinter<'a> {
    tree: &'a ParseTree,
    buffer: &'a TokenizedBuffer,
}

impl<'a> TreePrinter<'a> {
    pub fn new(tree: &'a ParseTree, buffer: &'a TokenizedBuffer) -> Self {
        Self { tree, buffer }
    }

    /// Depth of every node, filled by one explicit-stack walk from the roots.
    fn depths(&self) -> Vec<usize> {
        let mut depths = vec![0; self.tree.len()];
        for (id, depth) in self.tree.preorder() {
            depths[id.index()] = depth;
        }
        depths
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.tree.node(id);
        write!(f, "{:width$}{{", "", width = depth * 2)?;
        if let Some(kind) = node.kind {
            write!(f, "kind: {:?}, ", kind)?;
        }
        write!(
            f,
            "text: '{}', subtree_size: {}",
            self.buffer.text(node.token),
            node.subtree_size
        )?;
        if node.has_error {
            write!(f, ", has_error: yes")?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for TreePrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depths = self.depths();
        for id in self.tree.postorder() {
            self.write_node(f, id, depths[id.index()])?;
        }
        Ok(())
    }
}

/// Render `tree` with [`TreePrinter`].
pub fn print_tree(tree: &ParseTree, buffer: &TokenizedBuffer) -> String {
    TreePrinter::new(tree, buffer).to_string()
}
