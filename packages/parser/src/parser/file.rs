//! Top-level statements: syntax, edition, import, package.

use super::expected;
use super::state::{State, StateStackEntry};
use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

impl Parser<'_> {
    pub(super) fn handle_file(&mut self, entry: StateStackEntry) {
        let statement = match self.current() {
            TokenKind::Eof => return,
            TokenKind::Syntax | TokenKind::Edition => Some(State::SyntaxDecl),
            TokenKind::Import => Some(State::Import),
            TokenKind::Package => Some(State::Package),
            TokenKind::Option => Some(State::OptionStatement),
            TokenKind::Message => Some(State::Declaration(NodeKind::Message)),
            TokenKind::Enum => Some(State::Declaration(NodeKind::Enum)),
            TokenKind::Service => Some(State::Declaration(NodeKind::Service)),
            TokenKind::Extend => Some(State::Extend),
            TokenKind::Semicolon => {
                self.add_leaf(None, false);
                None
            }
            // Every statement is self-terminating, so one token at a time is
            // enough to get back in step.
            _ => {
                if !self.reported_at_cursor() {
                    self.emit(expected::TOP_LEVEL);
                }
                self.add_leaf(None, true);
                None
            }
        };

        self.push_continuation(entry, State::File);
        if let Some(statement) = statement {
            self.push_state(statement);
        }
    }

    /// `syntax = "proto3";` or `edition = "2023";`
    pub(super) fn handle_syntax(&mut self, entry: StateStackEntry) {
        let kind = if self.at(TokenKind::Edition) {
            NodeKind::Edition
        } else {
            NodeKind::Syntax
        };
        self.add_leaf(None, false);

        if !self.expect_leaf(TokenKind::Equals, expected::EQUALS) {
            return self.fail_statement(entry, Some(kind));
        }
        if !self.string_literals() {
            return self.fail_statement(entry, Some(kind));
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(kind));
        }
        self.close(entry, Some(kind));
    }

    /// `import [public|weak] "path";`
    pub(super) fn handle_import(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);

        if (self.at_contextual("public") || self.at_contextual("weak"))
            && self.peek_nth(1) == TokenKind::StringLiteral
        {
            self.add_leaf(None, false);
        }
        if !self.string_literals() {
            return self.fail_statement(entry, Some(NodeKind::Import));
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(NodeKind::Import));
        }
        self.close(entry, Some(NodeKind::Import));
    }

    /// `package a.b.c;`
    pub(super) fn handle_package(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);

        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.fail_statement(entry, Some(NodeKind::Package));
        }
        self.push_continuation(entry, State::PackageFinish);
        self.push_state(State::QualifiedIdent(Some(NodeKind::Name)));
    }

    pub(super) fn handle_package_finish(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Package));
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(NodeKind::Package));
        }
        self.close(entry, Some(NodeKind::Package));
    }

    /// One string literal, or several adjacent ones that concatenate.
    pub(super) fn string_literals(&mut self) -> bool {
        if !self.at(TokenKind::StringLiteral) {
            self.emit(expected::STRING);
            return false;
        }
        while self.at(TokenKind::StringLiteral) {
            self.add_leaf(None, false);
        }
        true
    }
}
