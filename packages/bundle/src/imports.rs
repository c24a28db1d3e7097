//! Import statements and the package declaration read back from a parse tree.

use protean_common::subtree_text;
use protean_parser::{NodeKind, ParseTree, TokenKind, TokenizedBuffer};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDecl {
    /// The import string with quotes and escapes removed
    pub path: String,
    pub public: bool,
    pub weak: bool,
    /// The `import` keyword
    pub token: u32,
}

/// Well-formed imports in source order. Imports the parser flagged are skipped.
pub fn collect_imports(tree: &ParseTree, buffer: &TokenizedBuffer) -> Vec<ImportDecl> {
    let mut imports: Vec<_> = tree
        .roots()
        .filter(|id| tree.kind(*id) == Some(NodeKind::Import) && !tree.node(*id).has_error)
        .map(|id| {
            let mut import = ImportDecl {
                path: String::new(),
                public: false,
                weak: false,
                token: tree.node(id).token,
            };
            let mut parts: Vec<_> = tree.children(id).collect();
            parts.reverse();
            for part in parts {
                let token = tree.node(part).token;
                match buffer.kind(token) {
                    TokenKind::StringLiteral => import.path.push_str(&unquote(buffer.text(token))),
                    TokenKind::Identifier => match buffer.text(token) {
                        "public" => import.public = true,
                        "weak" => import.weak = true,
                        _ => {}
                    },
                    _ => {}
                }
            }
            import
        })
        .collect();
    imports.reverse();
    imports
}

/// The first well-formed `package` declaration's dotted name.
pub fn package_name(tree: &ParseTree, buffer: &TokenizedBuffer) -> Option<String> {
    let mut roots: Vec<_> = tree.roots().collect();
    roots.reverse();
    roots
        .into_iter()
        .filter(|id| tree.kind(*id) == Some(NodeKind::Package) && !tree.node(*id).has_error)
        .find_map(|id| tree.find_child(id, NodeKind::Name))
        .map(|name| subtree_text(tree, buffer, name))
}

/// Contents of a quoted string literal with escapes applied.
pub fn unquote(literal: &str) -> String {
    let inner = match literal.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &literal[1..];
            body.strip_suffix(quote).unwrap_or(body)
        }
        _ => literal,
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('x') | Some('X') => {
                let mut value = 0u32;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
