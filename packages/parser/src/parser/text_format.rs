//! Option values: scalars and the text format used for message literals.

use super::expected;
use super::state::{State, StateStackEntry};
use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

impl Parser<'_> {
    /// A scalar, a `{...}`/`<...>` message or a `[...]` list. Scalars are
    /// plain leaves; a sign stays a separate leaf before its number.
    pub(super) fn handle_value(&mut self, _entry: StateStackEntry) {
        match self.current() {
            TokenKind::StringLiteral => {
                while self.at(TokenKind::StringLiteral) {
                    self.add_leaf(None, false);
                }
            }
            TokenKind::IntLiteral | TokenKind::FloatLiteral => self.add_leaf(None, false),
            TokenKind::Minus | TokenKind::Plus => {
                let next = self.peek_nth(1);
                if next.is_number() || next == TokenKind::Identifier {
                    self.add_leaf(None, false);
                    self.add_leaf(None, false);
                } else {
                    self.emit(expected::VALUE);
                    self.mark_parent_error();
                }
            }
            TokenKind::LBrace | TokenKind::LAngle => self.push_state(State::TextMessage),
            TokenKind::LBracket => self.push_state(State::TextList),
            kind if kind.is_identifier_like() => self.add_leaf(None, false),
            _ => {
                self.emit(expected::VALUE);
                self.mark_parent_error();
            }
        }
    }

    pub(super) fn handle_text_message(&mut self, entry: StateStackEntry) {
        let Some(closer) = self.current().closer() else {
            self.emit(expected::VALUE);
            return self.mark_parent_error();
        };
        self.add_leaf(None, false);
        self.push_continuation(entry, State::TextMessageBody(closer));
    }

    pub(super) fn handle_text_message_body(&mut self, entry: StateStackEntry, closer: TokenKind) {
        let current = self.current();
        if current == closer {
            self.add_leaf(None, false);
            return self.close(entry, Some(NodeKind::TextMessage));
        }
        let failed = StateStackEntry {
            has_error: true,
            ..entry
        };
        if current == TokenKind::Eof {
            self.emit(if closer == TokenKind::RAngle {
                expected::RANGLE
            } else {
                expected::RBRACE
            });
            return self.close(failed, Some(NodeKind::TextMessage));
        }
        if current.is_identifier_like() || current == TokenKind::LBracket {
            self.push_continuation(entry, State::TextMessageBody(closer));
            return self.push_state(State::TextField);
        }

        let terminators = [closer, TokenKind::Comma, TokenKind::Semicolon];
        let before = self.position;
        // Each enclosing message unwinding past the same stray token would
        // otherwise report it again.
        if self.reported_at_cursor() {
            self.skip_to_rest(&terminators);
        } else {
            self.emit(expected::TEXT_FIELD_NAME);
            self.skip_to(&terminators);
        }
        if matches!(self.current(), TokenKind::Comma | TokenKind::Semicolon) {
            self.add_leaf(None, true);
        }
        // Stuck on a closer that belongs to someone else.
        if self.position == before {
            return self.close(failed, Some(NodeKind::TextMessage));
        }
        self.push_continuation(failed, State::TextMessageBody(closer));
    }

    /// `name: value`, `name { ... }`, `name: [ ... ]` or `[ext.name]: value`.
    pub(super) fn handle_text_field(&mut self, entry: StateStackEntry) {
        if self.at(TokenKind::LBracket) {
            self.add_leaf(None, false);
            // Extension names and `type.googleapis.com/pkg.Type` URLs.
            while {
                let kind = self.current();
                kind.is_identifier_like() || kind == TokenKind::Dot || kind == TokenKind::Slash
            } {
                self.add_leaf(None, false);
            }
            if !self.expect_leaf(TokenKind::RBracket, expected::RBRACKET) {
                return self.close(
                    StateStackEntry {
                        has_error: true,
                        ..entry
                    },
                    Some(NodeKind::TextField),
                );
            }
        } else {
            self.add_leaf(None, false);
        }

        let has_colon = self.at(TokenKind::Colon);
        if has_colon {
            self.add_leaf(None, false);
        }

        let value = match self.current() {
            TokenKind::LBrace | TokenKind::LAngle => State::TextMessage,
            TokenKind::LBracket => State::TextList,
            _ if has_colon => State::Value,
            kind => {
                // A scalar needs the colon; report it but still take the value.
                self.emit(expected::COLON);
                let failed = StateStackEntry {
                    has_error: true,
                    ..entry
                };
                let scalar = kind.is_literal()
                    || kind.is_identifier_like()
                    || matches!(kind, TokenKind::Minus | TokenKind::Plus);
                if !scalar {
                    return self.close(failed, Some(NodeKind::TextField));
                }
                self.push_continuation(failed, State::TextFieldFinish);
                return self.push_state(State::Value);
            }
        };
        self.push_continuation(entry, State::TextFieldFinish);
        self.push_state(value);
    }

    /// Close the field, then take its separator. Without one, a following
    /// field gets a synthetic terminator so sequences stay uniform.
    pub(super) fn handle_text_field_finish(&mut self, entry: StateStackEntry) {
        self.close(entry, Some(NodeKind::TextField));

        let current = self.current();
        if matches!(current, TokenKind::Comma | TokenKind::Semicolon) {
            self.add_leaf(None, false);
        } else if current.is_identifier_like() || current == TokenKind::LBracket {
            self.add_synthetic(Some(NodeKind::Terminator), false);
        }
    }

    /// `[value, ...]`
    pub(super) fn handle_text_list(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);
        if self.at(TokenKind::RBracket) {
            self.add_leaf(None, false);
            return self.close(entry, Some(NodeKind::TextList));
        }
        self.push_continuation(entry, State::TextListItemFinish(false));
        self.push_state(State::Value);
    }
}
