//! Option statements, option names and bracketed option lists.

use super::expected;
use super::state::{State, StateStackEntry};
use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

impl Parser<'_> {
    /// `option name = value;`
    pub(super) fn handle_option_statement(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);
        self.push_continuation(entry, State::OptionStatementAfterName);
        self.push_state(State::OptionName);
    }

    pub(super) fn handle_option_statement_after_name(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Option));
        }
        if !self.expect_leaf(TokenKind::Equals, expected::EQUALS) {
            return self.fail_statement(entry, Some(NodeKind::Option));
        }
        self.push_continuation(entry, State::OptionStatementFinish);
        self.push_state(State::Value);
    }

    pub(super) fn handle_option_statement_finish(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Option));
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(NodeKind::Option));
        }
        self.close(entry, Some(NodeKind::Option));
    }

    /// `a.b`, `(pkg.ext).b`, `(ext)`: parts joined by dots, collected under
    /// one `OptionName` node.
    pub(super) fn handle_option_name(&mut self, entry: StateStackEntry) {
        self.push_continuation(entry, State::OptionNameFinish);
        self.push_state(State::OptionNamePart);
    }

    pub(super) fn handle_option_name_part(&mut self, _entry: StateStackEntry) {
        let current = self.current();
        if current.is_identifier_like() {
            self.add_leaf(None, false);
            return self.option_name_dot();
        }
        if current != TokenKind::LParen {
            self.emit(expected::OPTION_NAME);
            return self.mark_parent_error();
        }

        self.add_leaf(None, false);
        if !self.at_type_start() {
            self.emit(expected::TYPE);
            return self.mark_parent_error();
        }
        self.push_state(State::OptionNameExtensionClose);
        self.push_state(State::QualifiedIdent(None));
    }

    pub(super) fn handle_option_name_extension_close(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.mark_parent_error();
        }
        if !self.expect_leaf(TokenKind::RParen, expected::RPAREN) {
            return self.mark_parent_error();
        }
        self.option_name_dot();
    }

    fn option_name_dot(&mut self) {
        if self.at(TokenKind::Dot) {
            self.add_leaf(None, false);
            self.push_state(State::OptionNamePart);
        }
    }

    /// `[name = value, ...]` after a field, enum value or extension range.
    pub(super) fn handle_option_list(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);
        self.push_continuation(entry, State::OptionListItemFinish(false));
        self.push_state(State::ListOption);
    }

    pub(super) fn handle_list_option(&mut self, entry: StateStackEntry) {
        self.push_continuation(entry, State::ListOptionAfterName);
        self.push_state(State::OptionName);
    }

    /// Failures close the option without skipping; the list resynchronizes on
    /// its own separators.
    pub(super) fn handle_list_option_after_name(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.close(entry, Some(NodeKind::Option));
        }
        if !self.expect_leaf(TokenKind::Equals, expected::EQUALS) {
            return self.close(
                StateStackEntry {
                    has_error: true,
                    ..entry
                },
                Some(NodeKind::Option),
            );
        }
        self.push_continuation(entry, State::ListOptionFinish);
        self.push_state(State::Value);
    }
}
