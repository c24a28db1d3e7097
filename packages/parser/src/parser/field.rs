use super::expected;
use super::state::{State, StateStackEntry};
use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

impl Parser<'_> {
    /// `[modifier] type name = number [options];` or a map field.
    pub(super) fn handle_field(&mut self, entry: StateStackEntry) {
        if self.current().is_field_modifier() {
            let next = self.peek_nth(1);
            if next.is_identifier_like() || next == TokenKind::Dot {
                self.add_leaf(None, false);
            }
        }

        if self.at(TokenKind::Map) && self.peek_nth(1) == TokenKind::LAngle {
            return self.map_field(entry);
        }

        if !self.at_type_start() {
            self.emit(expected::TYPE);
            return self.fail_statement(entry, Some(NodeKind::Field));
        }
        self.push_continuation(entry, State::FieldAfterType(NodeKind::Field));
        self.push_state(State::QualifiedIdent(Some(NodeKind::FieldType)));
    }

    /// `map<key, value> name = number [options];`
    fn map_field(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);
        self.add_leaf(None, false);

        if !self.current().is_map_key_type() {
            self.emit(expected::MAP_KEY);
            return self.fail_map_field(entry);
        }
        self.add_leaf(Some(NodeKind::MapKeyType), false);

        if !self.expect_leaf(TokenKind::Comma, expected::COMMA) {
            return self.fail_map_field(entry);
        }
        if !self.at_type_start() {
            self.emit(expected::TYPE);
            return self.fail_map_field(entry);
        }
        self.push_continuation(entry, State::FieldAfterMapValue);
        self.push_state(State::QualifiedIdent(Some(NodeKind::MapValueType)));
    }

    pub(super) fn handle_field_after_type(&mut self, entry: StateStackEntry, kind: NodeKind) {
        if entry.has_error {
            return self.fail_statement(entry, Some(kind));
        }
        self.field_name_and_number(entry, kind);
    }

    pub(super) fn handle_field_after_map_value(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_map_field(entry);
        }
        if !self.expect_leaf(TokenKind::RAngle, expected::RANGLE) {
            return self.fail_map_field(entry);
        }
        self.field_name_and_number(entry, NodeKind::MapField);
    }

    /// Inside `<...>` the layout skip would stop at the `>`, so get past it
    /// first.
    fn fail_map_field(&mut self, entry: StateStackEntry) {
        self.skip_to_rest(&[TokenKind::RAngle, TokenKind::Semicolon]);
        if self.at(TokenKind::RAngle) {
            self.add_leaf(None, true);
        }
        self.fail_statement(entry, Some(NodeKind::MapField));
    }

    fn field_name_and_number(&mut self, entry: StateStackEntry, kind: NodeKind) {
        // Keywords are fine as field names.
        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.fail_statement(entry, Some(kind));
        }
        self.add_leaf(Some(NodeKind::Name), false);

        if !self.expect_leaf(TokenKind::Equals, expected::EQUALS) {
            return self.fail_statement(entry, Some(kind));
        }
        if !self.expect_leaf(TokenKind::IntLiteral, expected::INTEGER) {
            return self.fail_statement(entry, Some(kind));
        }
        self.options_or_end(entry, kind);
    }

    /// Either `;` now, or an option list followed by `;`.
    fn options_or_end(&mut self, entry: StateStackEntry, kind: NodeKind) {
        match self.current() {
            TokenKind::LBracket => {
                self.push_continuation(entry, State::FieldFinish(kind));
                self.push_state(State::OptionList);
            }
            TokenKind::Semicolon => {
                self.add_leaf(None, false);
                self.close(entry, Some(kind));
            }
            _ => {
                self.emit(expected::FIELD_END);
                self.fail_statement(entry, Some(kind));
            }
        }
    }

    pub(super) fn handle_field_finish(&mut self, entry: StateStackEntry, kind: NodeKind) {
        if entry.has_error {
            return self.fail_statement(entry, Some(kind));
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(kind));
        }
        self.close(entry, Some(kind));
    }

    /// `NAME = [-]number [options];`
    pub(super) fn handle_enum_value(&mut self, entry: StateStackEntry) {
        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.fail_statement(entry, Some(NodeKind::EnumValue));
        }
        self.add_leaf(Some(NodeKind::Name), false);

        if !self.expect_leaf(TokenKind::Equals, expected::EQUALS) {
            return self.fail_statement(entry, Some(NodeKind::EnumValue));
        }
        if self.at(TokenKind::Minus) {
            self.add_leaf(None, false);
        }
        if !self.expect_leaf(TokenKind::IntLiteral, expected::INTEGER) {
            return self.fail_statement(entry, Some(NodeKind::EnumValue));
        }
        self.options_or_end(entry, NodeKind::EnumValue);
    }

    /// `reserved` or `extensions` followed by comma-separated ranges. Reserved
    /// statements also accept field names, quoted or bare.
    pub(super) fn handle_ranges(&mut self, entry: StateStackEntry, kind: NodeKind) {
        self.add_leaf(None, false);
        let names_allowed = kind == NodeKind::Reserved;

        loop {
            let ok = match self.current() {
                TokenKind::IntLiteral | TokenKind::Minus => self.range(),
                TokenKind::StringLiteral if names_allowed => {
                    self.add_leaf(None, false);
                    true
                }
                current if names_allowed && current.is_identifier_like() => {
                    self.add_leaf(None, false);
                    true
                }
                _ => {
                    self.emit(if names_allowed {
                        expected::RESERVED_RANGE
                    } else {
                        expected::INTEGER
                    });
                    false
                }
            };
            if !ok {
                return self.fail_statement(entry, Some(kind));
            }
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.add_leaf(None, false);
        }

        if kind == NodeKind::Extensions {
            return self.options_or_end(entry, kind);
        }
        if !self.expect_leaf(TokenKind::Semicolon, expected::SEMICOLON) {
            return self.fail_statement(entry, Some(kind));
        }
        self.close(entry, Some(kind));
    }

    /// `n`, `n to m` or `n to max`, wrapped in a `Range` node.
    fn range(&mut self) -> bool {
        let token = self.position;
        let start = self.tree.len();

        if !self.signed_integer() {
            return false;
        }
        if self.at_contextual("to") {
            self.add_leaf(None, false);
            if self.at_contextual("max") {
                self.add_leaf(None, false);
            } else if self.at(TokenKind::Minus) || self.at(TokenKind::IntLiteral) {
                if !self.signed_integer() {
                    return false;
                }
            } else {
                self.emit(expected::RANGE_END);
                return false;
            }
        }

        self.add_node(token, start, Some(NodeKind::Range), false);
        true
    }

    fn signed_integer(&mut self) -> bool {
        if self.at(TokenKind::Minus) {
            self.add_leaf(None, false);
        }
        self.expect_leaf(TokenKind::IntLiteral, expected::INTEGER)
    }
}
