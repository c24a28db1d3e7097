//! Flat parse tree
//!
//! Nodes are stored in one append-only vector in strict postorder. A node's
//! children are the nodes immediately before it: walking backward from a node
//! and jumping by each child's `subtree_size` visits its children last-to-first.
//! A whole subtree is therefore the contiguous slice ending at its root.

use serde::Serialize;
use thiserror::Error;

/// Token index used by nodes that have no source token.
pub const SYNTHETIC_TOKEN: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node means to downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Syntax,
    Edition,
    Import,
    Package,
    Option,
    Message,
    Enum,
    Service,
    Oneof,
    Extend,
    Field,
    MapField,
    EnumValue,
    Rpc,
    Reserved,
    Extensions,

    FieldType,
    MapKeyType,
    MapValueType,
    RpcInputType,
    RpcOutputType,
    ExtendeeType,

    Name,
    OptionName,
    Range,
    TextMessage,
    TextField,
    TextList,
    Terminator,
    ScopeClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeCategory {
    Declaration,
    Reference,
    Structural,
}

impl NodeKind {
    pub fn category(self) -> NodeCategory {
        match self {
            NodeKind::Syntax
            | NodeKind::Edition
            | NodeKind::Import
            | NodeKind::Package
            | NodeKind::Option
            | NodeKind::Message
            | NodeKind::Enum
            | NodeKind::Service
            | NodeKind::Oneof
            | NodeKind::Extend
            | NodeKind::Field
            | NodeKind::MapField
            | NodeKind::EnumValue
            | NodeKind::Rpc
            | NodeKind::Reserved
            | NodeKind::Extensions => NodeCategory::Declaration,
            NodeKind::FieldType
            | NodeKind::MapKeyType
            | NodeKind::MapValueType
            | NodeKind::RpcInputType
            | NodeKind::RpcOutputType
            | NodeKind::ExtendeeType => NodeCategory::Reference,
            _ => NodeCategory::Structural,
        }
    }

    /// Declarations whose body is closed by exactly one `ScopeClose` child.
    pub fn opens_scope(self) -> bool {
        matches!(
            self,
            NodeKind::Message | NodeKind::Enum | NodeKind::Service | NodeKind::Oneof
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Index into the token buffer, or [`SYNTHETIC_TOKEN`].
    pub token: u32,
    /// Slots spanned by this subtree, this node included.
    pub subtree_size: u32,
    pub has_error: bool,
    pub kind: Option<NodeKind>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.subtree_size == 1
    }

    pub fn is_synthetic(&self) -> bool {
        self.token == SYNTHETIC_TOKEN
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {node} has a zero subtree size")]
    ZeroSize { node: usize },

    #[error("node {node} claims {size} slots but only {available} precede it")]
    Overflow {
        node: usize,
        size: u32,
        available: usize,
    },

    #[error("children of node {node} do not tile its subtree")]
    Misaligned { node: usize },
}

/// The result of one parse: immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).kind
    }

    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.has_error)
    }

    /// Top-level nodes, last first.
    pub fn roots(&self) -> Siblings<'_> {
        Siblings {
            nodes: &self.nodes,
            cursor: self.nodes.len(),
            lower: 0,
        }
    }

    /// Immediate children of `id`, last first.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        let size = self.node(id).subtree_size as usize;
        Siblings {
            nodes: &self.nodes,
            cursor: id.index(),
            lower: (id.index() + 1).saturating_sub(size),
        }
    }

    /// Every node in array order, which already is postorder.
    pub fn postorder(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Source-order preorder walk yielding `(node, depth)`, driven by an explicit
    /// stack so depth is not bounded by the native call stack.
    pub fn preorder(&self) -> Preorder<'_> {
        // roots() is last-first and the stack pops from the end.
        let stack = self.roots().map(|id| (id, 0)).collect();
        Preorder { tree: self, stack }
    }

    /// The contiguous slice holding the subtree rooted at `id`.
    pub fn subtree(&self, id: NodeId) -> &[Node] {
        let size = self.node(id).subtree_size as usize;
        &self.nodes[(id.index() + 1).saturating_sub(size)..=id.index()]
    }

    /// First child (in source order) carrying `kind`.
    pub fn find_child(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .filter(|child| self.node(*child).kind == Some(kind))
            .last()
    }

    /// Token indices of every non-synthetic leaf, in order.
    pub fn leaf_tokens(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf() && !n.is_synthetic())
            .map(|n| n.token)
    }

    /// Check that every subtree is tiled exactly by its children.
    pub fn verify(&self) -> Result<(), TreeError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.subtree_size == 0 {
                return Err(TreeError::ZeroSize { node: index });
            }
            let size = node.subtree_size as usize;
            if size > index + 1 {
                return Err(TreeError::Overflow {
                    node: index,
                    size: node.subtree_size,
                    available: index + 1,
                });
            }
            let lower = index + 1 - size;
            let mut cursor = index;
            while cursor > lower {
                let child = self.nodes[cursor - 1].subtree_size as usize;
                if child == 0 || child > cursor - lower {
                    return Err(TreeError::Misaligned { node: index });
                }
                cursor -= child;
            }
        }

        let mut cursor = self.nodes.len();
        while cursor > 0 {
            let size = self.nodes[cursor - 1].subtree_size as usize;
            if size > cursor {
                return Err(TreeError::Misaligned { node: cursor - 1 });
            }
            cursor -= size;
        }
        Ok(())
    }
}

/// Backward walk over a run of sibling subtrees.
pub struct Siblings<'a> {
    nodes: &'a [Node],
    cursor: usize,
    lower: usize,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cursor <= self.lower {
            return None;
        }
        let index = self.cursor - 1;
        let size = (self.nodes[index].subtree_size as usize).max(1);
        self.cursor = self.cursor.saturating_sub(size).max(self.lower);
        Some(NodeId::new(index))
    }
}

pub struct Preorder<'a> {
    tree: &'a ParseTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Preorder<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<(NodeId, usize)> {
        let (id, depth) = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).map(|child| (child, depth + 1)));
        Some((id, depth))
    }
}
