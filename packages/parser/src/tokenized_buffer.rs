//! Token storage handed to the parser.
//!
//! Tokens only carry their kind and position. Text is recovered through the
//! line table, which doubles as the literal lookup used for contextual keywords.

use crate::lexer::TokenKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Zero-based index into the line table.
    pub line: u32,
    /// Zero-based byte column within the line.
    pub column: u32,
    pub len: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineInfo {
    pub start: u32,
    pub length: u32,
}

/// One file's tokens plus the line table and source they index into.
#[derive(Debug, Clone)]
pub struct TokenizedBuffer {
    source: String,
    tokens: Vec<Token>,
    lines: Vec<LineInfo>,
}

impl TokenizedBuffer {
    /// Wrap tokens produced elsewhere. The parser requires at least one token;
    /// a trailing `Eof` is implied if missing.
    pub fn from_raw_parts(
        source: impl Into<String>,
        tokens: Vec<Token>,
        lines: Vec<LineInfo>,
    ) -> Self {
        Self {
            source: source.into(),
            tokens,
            lines,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, index: u32) -> Option<&Token> {
        self.tokens.get(index as usize)
    }

    /// Kind of the token at `index`; anything past the end reads as `Eof`.
    pub fn kind(&self, index: u32) -> TokenKind {
        self.token(index).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Byte offset of the token start in the source.
    pub fn offset(&self, index: u32) -> Option<usize> {
        let token = self.token(index)?;
        let line = self.lines.get(token.line as usize)?;
        Some((line.start + token.column) as usize)
    }

    /// Source text of the token, empty for synthetic or out-of-range indices.
    pub fn text(&self, index: u32) -> &str {
        let Some(token) = self.token(index) else {
            return "";
        };
        let Some(start) = self.offset(index) else {
            return "";
        };
        self.source
            .get(start..start + token.len as usize)
            .unwrap_or("")
    }

    /// Zero-based (line, column) of a token.
    pub fn line_column(&self, index: u32) -> Option<(u32, u32)> {
        self.token(index).map(|t| (t.line, t.column))
    }

    /// Byte range covered by the token; an index past the end maps to the end
    /// of the source.
    pub fn span(&self, index: u32) -> std::ops::Range<usize> {
        match (self.token(index), self.offset(index)) {
            (Some(token), Some(start)) => start..start + token.len as usize,
            _ => self.source.len()..self.source.len(),
        }
    }
}
