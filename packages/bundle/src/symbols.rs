//! Fully qualified declarations across every file of a bundle.
//!
//! The table is a vector sorted by name and searched with binary search. One
//! name can have several entries: packages are declared once per file that
//! uses them, and duplicate definitions are kept so both files can be named in
//! the error.

use crate::error::BundleError;
use protean_common::{declared_name, TreeVisitor};
use protean_parser::{NodeId, NodeKind, ParseTree, TokenizedBuffer};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Index of a file inside its bundle
pub type FileId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Package,
    Message,
    Enum,
    EnumValue,
    Service,
    Rpc,
    Field,
    Oneof,
}

impl SymbolKind {
    pub fn is_type(self) -> bool {
        matches!(self, SymbolKind::Message | SymbolKind::Enum)
    }

    /// Symbols a dotted name can continue into
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            SymbolKind::Package | SymbolKind::Message | SymbolKind::Enum | SymbolKind::Service
        )
    }

    fn from_node(kind: NodeKind) -> Option<Self> {
        Some(match kind {
            NodeKind::Message => SymbolKind::Message,
            NodeKind::Enum => SymbolKind::Enum,
            NodeKind::EnumValue => SymbolKind::EnumValue,
            NodeKind::Service => SymbolKind::Service,
            NodeKind::Rpc => SymbolKind::Rpc,
            NodeKind::Field | NodeKind::MapField => SymbolKind::Field,
            NodeKind::Oneof => SymbolKind::Oneof,
            _ => return None,
        })
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Package => "package",
            SymbolKind::Message => "message",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumValue => "enum value",
            SymbolKind::Service => "service",
            SymbolKind::Rpc => "rpc",
            SymbolKind::Field => "field",
            SymbolKind::Oneof => "oneof",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Fully qualified, without a leading dot
    pub name: String,
    pub kind: SymbolKind,
    pub file: FileId,
    /// Token of the declared name
    pub token: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    sorted: bool,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
        self.sorted = false;
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Sort for lookup and report every name defined twice.
    ///
    /// Packages may repeat freely. Any other pair sharing a name is a
    /// duplicate, reported against the later definition.
    pub fn finish(&mut self, files: &[PathBuf]) -> Vec<BundleError> {
        // Stable, so entries with one name keep insertion (file) order.
        self.symbols.sort_by(|a, b| a.name.cmp(&b.name));
        self.sorted = true;

        let mut errors = Vec::new();
        let mut start = 0;
        while start < self.symbols.len() {
            let first = &self.symbols[start];
            let run = self.symbols[start..].partition_point(|s| s.name == first.name);
            for symbol in &self.symbols[start + 1..start + run] {
                if first.kind == SymbolKind::Package && symbol.kind == SymbolKind::Package {
                    continue;
                }
                errors.push(BundleError::DuplicateSymbol {
                    name: symbol.name.clone(),
                    file: files[symbol.file].clone(),
                    token: symbol.token,
                    previous: files[first.file].clone(),
                });
            }
            start += run;
        }
        errors
    }

    /// Every entry named exactly `name`
    pub fn lookup(&self, name: &str) -> &[Symbol] {
        debug_assert!(self.sorted, "lookup before finish()");
        let start = self.symbols.partition_point(|s| s.name.as_str() < name);
        let end = start + self.symbols[start..].partition_point(|s| s.name == name);
        &self.symbols[start..end]
    }

    /// First entry named `name` declared in one of `visible`
    pub fn lookup_visible(&self, name: &str, visible: &HashSet<FileId>) -> Option<&Symbol> {
        self.lookup(name).iter().find(|s| visible.contains(&s.file))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Join a scope and a relative name with a dot.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

struct Frame {
    name: Option<String>,
    /// Enums and oneofs do not add a component for their children.
    transparent: bool,
}

/// Current declaration scope while walking one file
#[derive(Default)]
pub struct ScopeStack {
    package: String,
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn set_package(&mut self, package: String) {
        self.package = package;
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Fully qualified name children of the current scope are declared in.
    pub fn current(&self) -> String {
        let mut scope = self.package.clone();
        for frame in &self.frames {
            if frame.transparent {
                continue;
            }
            if let Some(name) = &frame.name {
                scope = qualify(&scope, name);
            }
        }
        scope
    }

    pub fn enter(&mut self, kind: NodeKind, name: Option<&str>) {
        self.frames.push(Frame {
            name: name.map(str::to_string),
            transparent: matches!(kind, NodeKind::Enum | NodeKind::Oneof),
        });
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }
}

/// Adds one file's declarations to a [`SymbolTable`].
pub struct SymbolCollector<'a> {
    table: &'a mut SymbolTable,
    buffer: &'a TokenizedBuffer,
    file: FileId,
    scopes: ScopeStack,
}

impl<'a> SymbolCollector<'a> {
    pub fn new(table: &'a mut SymbolTable, buffer: &'a TokenizedBuffer, file: FileId) -> Self {
        Self {
            table,
            buffer,
            file,
            scopes: ScopeStack::default(),
        }
    }

    fn declare_package(&mut self, tree: &ParseTree, id: NodeId) {
        let Some(name) = tree.find_child(id, NodeKind::Name) else {
            return;
        };
        let package = protean_common::subtree_text(tree, self.buffer, name);
        let token = tree.node(name).token;

        let mut prefix = String::new();
        for part in package.split('.').filter(|p| !p.is_empty()) {
            prefix = qualify(&prefix, part);
            self.table.insert(Symbol {
                name: prefix.clone(),
                kind: SymbolKind::Package,
                file: self.file,
                token,
            });
        }
        self.scopes.set_package(package);
    }
}

impl TreeVisitor for SymbolCollector<'_> {
    fn visit_declaration(&mut self, tree: &ParseTree, id: NodeId, kind: NodeKind) {
        if kind == NodeKind::Package {
            return self.declare_package(tree, id);
        }

        let name = declared_name(tree, self.buffer, id);
        if let (Some(symbol_kind), Some(name)) = (SymbolKind::from_node(kind), name) {
            if let Some(name_node) = tree.find_child(id, NodeKind::Name) {
                self.table.insert(Symbol {
                    name: qualify(&self.scopes.current(), name),
                    kind: symbol_kind,
                    file: self.file,
                    token: tree.node(name_node).token,
                });
            }
        }
        if kind.opens_scope() {
            self.scopes.enter(kind, name);
        }
    }

    fn visit_scope_close(&mut self, _tree: &ParseTree, _id: NodeId) {
        self.scopes.exit();
    }
}
