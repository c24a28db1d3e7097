//! Protobuf name lookup.
//!
//! A name starting with `.` is fully qualified. Anything else is searched from
//! the innermost scope outwards. For a dotted name only the first component is
//! searched this way; once it matches something that can contain names, the
//! rest must be found inside that match and the search does not continue
//! outwards. When looking for a simple name, symbols that are not types are
//! skipped.

use crate::error::BundleError;
use crate::symbols::{qualify, FileId, ScopeStack, Symbol, SymbolKind, SymbolTable};
use protean_common::{declared_name, subtree_text, TreeVisitor};
use protean_parser::{NodeId, NodeKind, ParseTree, TokenizedBuffer};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const TYPES: &[SymbolKind] = &[SymbolKind::Message, SymbolKind::Enum];
const MESSAGES: &[SymbolKind] = &[SymbolKind::Message];

/// Look up `name` as written inside `scope`.
pub fn lookup_type<'a>(
    table: &'a SymbolTable,
    visible: &HashSet<FileId>,
    scope: &str,
    name: &str,
) -> Option<&'a Symbol> {
    if let Some(full) = name.strip_prefix('.') {
        return table.lookup_visible(full, visible);
    }

    let (first, rest) = match name.split_once('.') {
        Some((first, rest)) => (first, Some(rest)),
        None => (name, None),
    };

    let mut scope = scope;
    loop {
        let candidate = qualify(scope, first);
        if let Some(symbol) = table.lookup_visible(&candidate, visible) {
            match rest {
                None if symbol.kind.is_type() => return Some(symbol),
                Some(rest) if symbol.kind.is_aggregate() => {
                    return table.lookup_visible(&qualify(&candidate, rest), visible);
                }
                _ => {}
            }
        }
        if scope.is_empty() {
            return None;
        }
        scope = scope.rfind('.').map_or("", |dot| &scope[..dot]);
    }
}

/// One type reference and the declaration it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    pub file: PathBuf,
    pub token: u32,
    pub kind: NodeKind,
    /// As written in the source
    pub name: String,
    /// Fully qualified target
    pub target: String,
    pub target_kind: SymbolKind,
}

/// Resolves every type reference of one file.
pub struct ReferenceResolver<'a> {
    table: &'a SymbolTable,
    visible: &'a HashSet<FileId>,
    buffer: &'a TokenizedBuffer,
    path: &'a Path,
    scopes: ScopeStack,
    pub references: Vec<ResolvedReference>,
    pub errors: Vec<BundleError>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        table: &'a SymbolTable,
        visible: &'a HashSet<FileId>,
        buffer: &'a TokenizedBuffer,
        path: &'a Path,
    ) -> Self {
        Self {
            table,
            visible,
            buffer,
            path,
            scopes: ScopeStack::default(),
            references: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// What a reference of `kind` may point at.
    fn accepted(kind: NodeKind) -> Option<(&'static str, &'static [SymbolKind])> {
        match kind {
            NodeKind::FieldType | NodeKind::MapValueType => {
                Some(("message or enum", TYPES))
            }
            NodeKind::RpcInputType | NodeKind::RpcOutputType | NodeKind::ExtendeeType => {
                Some(("message", MESSAGES))
            }
            _ => None,
        }
    }
}

impl TreeVisitor for ReferenceResolver<'_> {
    fn visit_declaration(&mut self, tree: &ParseTree, id: NodeId, kind: NodeKind) {
        if kind == NodeKind::Package {
            if let Some(name) = tree.find_child(id, NodeKind::Name) {
                self.scopes.set_package(subtree_text(tree, self.buffer, name));
            }
        } else if kind.opens_scope() {
            self.scopes.enter(kind, declared_name(tree, self.buffer, id));
        }
    }

    fn visit_reference(&mut self, tree: &ParseTree, id: NodeId, kind: NodeKind) {
        let Some((expected, accepts)) = Self::accepted(kind) else {
            return;
        };
        let node = tree.node(id);
        if node.has_error || node.is_synthetic() {
            return;
        }
        if node.is_leaf() && self.buffer.kind(node.token).is_scalar_type() {
            return;
        }

        let name = subtree_text(tree, self.buffer, id);
        let scope = self.scopes.current();
        match lookup_type(self.table, self.visible, &scope, &name) {
            None => self.errors.push(BundleError::UnresolvedReference {
                name,
                file: self.path.to_path_buf(),
                token: node.token,
            }),
            Some(symbol) if !accepts.contains(&symbol.kind) => {
                self.errors.push(BundleError::WrongSymbolKind {
                    name,
                    target: symbol.name.clone(),
                    found: symbol.kind,
                    expected,
                    file: self.path.to_path_buf(),
                    token: node.token,
                })
            }
            Some(symbol) => self.references.push(ResolvedReference {
                file: self.path.to_path_buf(),
                token: node.token,
                kind,
                name,
                target: symbol.name.clone(),
                target_kind: symbol.kind,
            }),
        }
    }

    fn visit_scope_close(&mut self, _tree: &ParseTree, _id: NodeId) {
        self.scopes.exit();
    }
}
