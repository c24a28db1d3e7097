//! Lexer for .proto files using logos
//!
//! Logos provides extremely fast lexing via compile-time DFA generation. The raw
//! logos tokens are folded into [`TokenKind`], whose variant order is load-bearing:
//! identifier-ness, bracket pairing and scalar classification are all range or
//! offset tests on the discriminant.

use crate::tokenized_buffer::{LineInfo, Token, TokenizedBuffer};
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// Token kinds seen by the parser.
///
/// Layout rules:
/// - openers `{ ( [ <` are contiguous, closers `} ) ] >` follow in the same order,
///   so the matching closer is `opener + BRACKET_OFFSET`;
/// - `Identifier` is followed by every keyword, so "may stand in for a name" is
///   `kind >= Identifier`;
/// - scalar type keywords come last, map key types first among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum TokenKind {
    Eof,
    Error,
    LineComment,
    BlockComment,

    IntLiteral,
    FloatLiteral,
    StringLiteral,

    Semicolon,
    Comma,
    Dot,
    Equals,
    Colon,
    Minus,
    Plus,
    Slash,

    LBrace,
    LParen,
    LBracket,
    LAngle,
    RBrace,
    RParen,
    RBracket,
    RAngle,

    Identifier,
    Syntax,
    Edition,
    Import,
    Package,
    Option,
    Message,
    Enum,
    Service,
    Rpc,
    Oneof,
    Extend,
    Extensions,
    Reserved,
    Map,
    Optional,
    Required,
    Repeated,
    Group,

    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Double,
    Float,
    Bytes,
}

const BRACKET_OFFSET: u8 = TokenKind::RBrace as u8 - TokenKind::LBrace as u8;

/// Every kind, indexed by discriminant.
const ALL_KINDS: [TokenKind; TokenKind::Bytes as usize + 1] = [
    TokenKind::Eof,
    TokenKind::Error,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::IntLiteral,
    TokenKind::FloatLiteral,
    TokenKind::StringLiteral,
    TokenKind::Semicolon,
    TokenKind::Comma,
    TokenKind::Dot,
    TokenKind::Equals,
    TokenKind::Colon,
    TokenKind::Minus,
    TokenKind::Plus,
    TokenKind::Slash,
    TokenKind::LBrace,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::LAngle,
    TokenKind::RBrace,
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::RAngle,
    TokenKind::Identifier,
    TokenKind::Syntax,
    TokenKind::Edition,
    TokenKind::Import,
    TokenKind::Package,
    TokenKind::Option,
    TokenKind::Message,
    TokenKind::Enum,
    TokenKind::Service,
    TokenKind::Rpc,
    TokenKind::Oneof,
    TokenKind::Extend,
    TokenKind::Extensions,
    TokenKind::Reserved,
    TokenKind::Map,
    TokenKind::Optional,
    TokenKind::Required,
    TokenKind::Repeated,
    TokenKind::Group,
    TokenKind::Int32,
    TokenKind::Int64,
    TokenKind::Uint32,
    TokenKind::Uint64,
    TokenKind::Sint32,
    TokenKind::Sint64,
    TokenKind::Fixed32,
    TokenKind::Fixed64,
    TokenKind::Sfixed32,
    TokenKind::Sfixed64,
    TokenKind::Bool,
    TokenKind::String,
    TokenKind::Double,
    TokenKind::Float,
    TokenKind::Bytes,
];

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_literal(self) -> bool {
        (TokenKind::IntLiteral..=TokenKind::StringLiteral).contains(&self)
    }

    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::IntLiteral | TokenKind::FloatLiteral)
    }

    pub fn is_opener(self) -> bool {
        (TokenKind::LBrace..=TokenKind::LAngle).contains(&self)
    }

    pub fn is_closer(self) -> bool {
        (TokenKind::RBrace..=TokenKind::RAngle).contains(&self)
    }

    /// The closing bracket matching this opener.
    pub fn closer(self) -> Option<TokenKind> {
        if self.is_opener() {
            Some(ALL_KINDS[(self as u8 + BRACKET_OFFSET) as usize])
        } else {
            None
        }
    }

    /// Identifiers and every keyword: anything that may be used as a name.
    pub fn is_identifier_like(self) -> bool {
        self >= TokenKind::Identifier
    }

    pub fn is_keyword(self) -> bool {
        self > TokenKind::Identifier
    }

    pub fn is_scalar_type(self) -> bool {
        self >= TokenKind::Int32
    }

    pub fn is_map_key_type(self) -> bool {
        (TokenKind::Int32..=TokenKind::String).contains(&self)
    }

    pub fn is_field_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Optional | TokenKind::Required | TokenKind::Repeated
        )
    }

    /// Source spelling for keywords and punctuation.
    pub fn spelling(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Equals => "=",
            TokenKind::Colon => ":",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Slash => "/",
            TokenKind::LBrace => "{",
            TokenKind::LParen => "(",
            TokenKind::LBracket => "[",
            TokenKind::LAngle => "<",
            TokenKind::RBrace => "}",
            TokenKind::RParen => ")",
            TokenKind::RBracket => "]",
            TokenKind::RAngle => ">",
            TokenKind::Syntax => "syntax",
            TokenKind::Edition => "edition",
            TokenKind::Import => "import",
            TokenKind::Package => "package",
            TokenKind::Option => "option",
            TokenKind::Message => "message",
            TokenKind::Enum => "enum",
            TokenKind::Service => "service",
            TokenKind::Rpc => "rpc",
            TokenKind::Oneof => "oneof",
            TokenKind::Extend => "extend",
            TokenKind::Extensions => "extensions",
            TokenKind::Reserved => "reserved",
            TokenKind::Map => "map",
            TokenKind::Optional => "optional",
            TokenKind::Required => "required",
            TokenKind::Repeated => "repeated",
            TokenKind::Group => "group",
            TokenKind::Int32 => "int32",
            TokenKind::Int64 => "int64",
            TokenKind::Uint32 => "uint32",
            TokenKind::Uint64 => "uint64",
            TokenKind::Sint32 => "sint32",
            TokenKind::Sint64 => "sint64",
            TokenKind::Fixed32 => "fixed32",
            TokenKind::Fixed64 => "fixed64",
            TokenKind::Sfixed32 => "sfixed32",
            TokenKind::Sfixed64 => "sfixed64",
            TokenKind::Bool => "bool",
            TokenKind::String => "string",
            TokenKind::Double => "double",
            TokenKind::Float => "float",
            TokenKind::Bytes => "bytes",
            _ => return None,
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(spelling) = self.spelling() {
            return write!(f, "'{}'", spelling);
        }
        match self {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Error => write!(f, "invalid character"),
            TokenKind::LineComment | TokenKind::BlockComment => write!(f, "comment"),
            TokenKind::IntLiteral => write!(f, "integer literal"),
            TokenKind::FloatLiteral => write!(f, "float literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            _ => write!(f, "identifier"),
        }
    }
}

/// Raw logos tokens, folded into [`TokenKind`] by [`tokenize`].
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // Keywords
    #[token("syntax")]
    Syntax,
    #[token("edition")]
    Edition,
    #[token("import")]
    Import,
    #[token("package")]
    Package,
    #[token("option")]
    Option,
    #[token("message")]
    Message,
    #[token("enum")]
    Enum,
    #[token("service")]
    Service,
    #[token("rpc")]
    Rpc,
    #[token("oneof")]
    Oneof,
    #[token("extend")]
    Extend,
    #[token("extensions")]
    Extensions,
    #[token("reserved")]
    Reserved,
    #[token("map")]
    Map,
    #[token("optional")]
    Optional,
    #[token("required")]
    Required,
    #[token("repeated")]
    Repeated,
    #[token("group")]
    Group,

    // Scalar types
    #[token("int32")]
    Int32,
    #[token("int64")]
    Int64,
    #[token("uint32")]
    Uint32,
    #[token("uint64")]
    Uint64,
    #[token("sint32")]
    Sint32,
    #[token("sint64")]
    Sint64,
    #[token("fixed32")]
    Fixed32,
    #[token("fixed64")]
    Fixed64,
    #[token("sfixed32")]
    Sfixed32,
    #[token("sfixed64")]
    Sfixed64,
    #[token("bool")]
    Bool,
    #[token("string")]
    String,
    #[token("double")]
    Double,
    #[token("float")]
    Float,
    #[token("bytes")]
    Bytes,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"[0-9]+")]
    IntLiteral,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    FloatLiteral,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    StringLiteral,

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("{")]
    LBrace,
    #[token("(")]
    LParen,
    #[token("[")]
    LBracket,
    #[token("<")]
    LAngle,
    #[token("}")]
    RBrace,
    #[token(")")]
    RParen,
    #[token("]")]
    RBracket,
    #[token(">")]
    RAngle,

    // Comments
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Syntax => TokenKind::Syntax,
            RawToken::Edition => TokenKind::Edition,
            RawToken::Import => TokenKind::Import,
            RawToken::Package => TokenKind::Package,
            RawToken::Option => TokenKind::Option,
            RawToken::Message => TokenKind::Message,
            RawToken::Enum => TokenKind::Enum,
            RawToken::Service => TokenKind::Service,
            RawToken::Rpc => TokenKind::Rpc,
            RawToken::Oneof => TokenKind::Oneof,
            RawToken::Extend => TokenKind::Extend,
            RawToken::Extensions => TokenKind::Extensions,
            RawToken::Reserved => TokenKind::Reserved,
            RawToken::Map => TokenKind::Map,
            RawToken::Optional => TokenKind::Optional,
            RawToken::Required => TokenKind::Required,
            RawToken::Repeated => TokenKind::Repeated,
            RawToken::Group => TokenKind::Group,
            RawToken::Int32 => TokenKind::Int32,
            RawToken::Int64 => TokenKind::Int64,
            RawToken::Uint32 => TokenKind::Uint32,
            RawToken::Uint64 => TokenKind::Uint64,
            RawToken::Sint32 => TokenKind::Sint32,
            RawToken::Sint64 => TokenKind::Sint64,
            RawToken::Fixed32 => TokenKind::Fixed32,
            RawToken::Fixed64 => TokenKind::Fixed64,
            RawToken::Sfixed32 => TokenKind::Sfixed32,
            RawToken::Sfixed64 => TokenKind::Sfixed64,
            RawToken::Bool => TokenKind::Bool,
            RawToken::String => TokenKind::String,
            RawToken::Double => TokenKind::Double,
            RawToken::Float => TokenKind::Float,
            RawToken::Bytes => TokenKind::Bytes,
            RawToken::Identifier => TokenKind::Identifier,
            RawToken::IntLiteral => TokenKind::IntLiteral,
            RawToken::FloatLiteral => TokenKind::FloatLiteral,
            RawToken::StringLiteral => TokenKind::StringLiteral,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Equals => TokenKind::Equals,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Slash => TokenKind::Slash,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::LAngle => TokenKind::LAngle,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::RParen => TokenKind::RParen,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::RAngle => TokenKind::RAngle,
            RawToken::LineComment => TokenKind::LineComment,
            RawToken::BlockComment => TokenKind::BlockComment,
        }
    }
}

/// Lexer switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    /// Emit comment tokens for source-preserving tooling. The parser skips them
    /// either way.
    pub keep_comments: bool,
}

/// Tokenize a source string
pub fn tokenize(source: &str) -> TokenizedBuffer {
    tokenize_with(source, LexOptions::default())
}

pub fn tokenize_with(source: &str, options: LexOptions) -> TokenizedBuffer {
    let lines = line_table(source);
    let mut tokens = Vec::new();
    let mut line = 0usize;

    for (result, span) in RawToken::lexer(source).spanned() {
        let kind = match result {
            Ok(raw) => TokenKind::from(raw),
            Err(_) => TokenKind::Error,
        };
        if kind.is_comment() && !options.keep_comments {
            continue;
        }
        while line + 1 < lines.len() && lines[line + 1].start as usize <= span.start {
            line += 1;
        }
        tokens.push(Token {
            kind,
            line: line as u32,
            column: (span.start - lines[line].start as usize) as u32,
            len: (span.end - span.start) as u32,
        });
    }

    let last = lines.len() - 1;
    tokens.push(Token {
        kind: TokenKind::Eof,
        line: last as u32,
        column: lines[last].length,
        len: 0,
    });

    TokenizedBuffer::from_raw_parts(source, tokens, lines)
}

/// Start offset and length of every line. The length leaves out the line
/// break, including the `\r` of a CRLF. Never empty.
fn line_table(source: &str) -> Vec<LineInfo> {
    let bytes = source.as_bytes();
    let line = |start: usize, end: usize| {
        let end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };
        LineInfo {
            start: start as u32,
            length: (end - start) as u32,
        }
    };

    let mut lines = Vec::new();
    let mut start = 0usize;
    for (offset, byte) in bytes.iter().enumerate() {
        if *byte == b'\n' {
            lines.push(line(start, offset));
            start = offset + 1;
        }
    }
    lines.push(line(start, source.len()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_kind_table_matches_discriminants() {
        for (index, kind) in ALL_KINDS.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{:?} is out of place", kind);
        }
    }

    #[test]
    fn test_bracket_pairs() {
        assert_eq!(TokenKind::LBrace.closer(), Some(TokenKind::RBrace));
        assert_eq!(TokenKind::LParen.closer(), Some(TokenKind::RParen));
        assert_eq!(TokenKind::LBracket.closer(), Some(TokenKind::RBracket));
        assert_eq!(TokenKind::LAngle.closer(), Some(TokenKind::RAngle));
        assert_eq!(TokenKind::RBrace.closer(), None);
        assert!(TokenKind::RAngle.is_closer());
        assert!(!TokenKind::Comma.is_opener());
    }

    #[test]
    fn test_classification_ranges() {
        assert!(TokenKind::Message.is_identifier_like());
        assert!(TokenKind::Identifier.is_identifier_like());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::StringLiteral.is_identifier_like());
        assert!(TokenKind::Sfixed64.is_map_key_type());
        assert!(TokenKind::String.is_map_key_type());
        assert!(!TokenKind::Double.is_map_key_type());
        assert!(!TokenKind::Bytes.is_map_key_type());
        assert!(TokenKind::Bytes.is_scalar_type());
        assert!(!TokenKind::Group.is_scalar_type());
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("message Foo returns"),
            vec![
                TokenKind::Message,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
        // Prefix of a keyword is still an identifier
        assert_eq!(kinds("messages")[0], TokenKind::Identifier);
        assert_eq!(kinds("uint64")[0], TokenKind::Uint64);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 0x1F 3.14 1e10 .5 "hi" 'there'"#),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_skipped_unless_kept() {
        let source = "// leading\nmessage /* inline */ A {}";
        assert_eq!(kinds(source)[0], TokenKind::Message);

        let kept = tokenize_with(source, LexOptions { keep_comments: true });
        assert_eq!(kept.tokens()[0].kind, TokenKind::LineComment);
        assert_eq!(kept.tokens()[2].kind, TokenKind::BlockComment);
    }

    #[test]
    fn test_positions() {
        let buffer = tokenize("syntax = \"proto3\";\n  message A {}");
        let message = buffer.tokens()[4];
        assert_eq!(message.kind, TokenKind::Message);
        assert_eq!((message.line, message.column), (1, 2));
        assert_eq!(buffer.text(4), "message");
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_invalid_character_becomes_error_token() {
        assert_eq!(kinds("message # A")[1], TokenKind::Error);
    }

    #[test]
    fn test_eof_always_present() {
        let buffer = tokenize("");
        assert_eq!(buffer.tokens().len(), 1);
        assert_eq!(buffer.tokens()[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_crlf_line_lengths_exclude_carriage_return() {
        let buffer = tokenize("message A {\r\n  int32 x = 1;\r\n}\r");
        let lengths: Vec<_> = buffer.lines().iter().map(|l| l.length).collect();
        assert_eq!(lengths, vec![11, 14, 1]);

        let int32 = buffer.tokens()[3];
        assert_eq!((int32.line, int32.column), (1, 2));
        assert_eq!(buffer.text(3), "int32");

        let eof = *buffer.tokens().last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!((eof.line, eof.column), (2, 1));
    }
}
