//! Diagnostics produced while parsing
//!
//! The parser never fails on bad input. Every expectation mismatch becomes a
//! [`Diagnostic`] in the list returned next to the tree.

use crate::lexer::TokenKind;
use crate::tokenized_buffer::TokenizedBuffer;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One entry of a diagnostic's expected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expectation {
    Token(TokenKind),
    Identifier,
    FieldStart,
    Type,
    MapKeyType,
    Value,
    TopLevelStatement,
    EnumValue,
    TextFieldName,
    /// A contextual keyword that lexes as an identifier, e.g. `returns`.
    Contextual(&'static str),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Token(kind) => write!(f, "{}", kind),
            Expectation::Identifier => write!(f, "identifier"),
            Expectation::FieldStart => write!(f, "field"),
            Expectation::Type => write!(f, "type"),
            Expectation::MapKeyType => write!(f, "map key type"),
            Expectation::Value => write!(f, "value"),
            Expectation::TopLevelStatement => write!(f, "top-level statement"),
            Expectation::EnumValue => write!(f, "enum value"),
            Expectation::TextFieldName => write!(f, "text field name"),
            Expectation::Contextual(word) => write!(f, "'{}'", word),
        }
    }
}

struct ExpectedList<'a>(&'a [Expectation]);

impl fmt::Display for ExpectedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => write!(f, "something else"),
            [only] => write!(f, "{}", only),
            [first, second] => write!(f, "{} or {}", first, second),
            [init @ .., last] => {
                write!(f, "one of ")?;
                for item in init {
                    write!(f, "{}, ", item)?;
                }
                write!(f, "or {}", last)
            }
        }
    }
}

fn expected_list(expected: &[Expectation]) -> ExpectedList<'_> {
    ExpectedList(expected)
}

/// Expectation mismatch at a token.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("expected {}, found {}", expected_list(.expected), .found)]
pub struct Diagnostic {
    pub expected: &'static [Expectation],
    pub found: TokenKind,
    /// Index of the offending token in the buffer.
    pub token: u32,
}

impl Diagnostic {
    /// Unterminated block or statement.
    pub fn is_premature_eof(&self) -> bool {
        self.found == TokenKind::Eof
    }

    /// One-based (line, column) of the offending token. Falls back to the end of
    /// the last line when the index is past the buffer.
    pub fn location(&self, buffer: &TokenizedBuffer) -> (u32, u32) {
        match buffer.line_column(self.token) {
            Some((line, column)) => (line + 1, column + 1),
            None => {
                let lines = buffer.lines();
                let last = lines.len().max(1) as u32;
                let column = lines.last().map_or(0, |l| l.length);
                (last, column + 1)
            }
        }
    }
}

/// Pretty-print diagnostics with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_diagnostics(
    buffer: &TokenizedBuffer,
    filename: &str,
    diagnostics: &[Diagnostic],
) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let source = buffer.source();
    let mut output = Vec::new();

    for diagnostic in diagnostics {
        let span = buffer.span(diagnostic.token);

        let report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(diagnostic.to_string())
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_color(Color::Red)
                    .with_message(format!("expected {}", expected_list(diagnostic.expected))),
            )
            .finish();

        if report
            .write((filename, Source::from(source)), &mut output)
            .is_err()
        {
            return format_plain(buffer, filename, diagnostics);
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

#[cfg(not(feature = "pretty-errors"))]
pub fn format_diagnostics(
    buffer: &TokenizedBuffer,
    filename: &str,
    diagnostics: &[Diagnostic],
) -> String {
    format_plain(buffer, filename, diagnostics)
}

/// `file:line:col: message` per diagnostic.
pub fn format_plain(buffer: &TokenizedBuffer, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for diagnostic in diagnostics {
        let (line, column) = diagnostic.location(buffer);
        output.push_str(&format!("{}:{}:{}: {}\n", filename, line, column, diagnostic));
    }
    output
}
