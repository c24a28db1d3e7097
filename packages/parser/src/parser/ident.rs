use super::expected;
use super::state::{State, StateStackEntry};
use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

impl Parser<'_> {
    /// A possibly dotted, possibly fully qualified name. A lone identifier
    /// becomes a single tagged leaf; anything longer is a tagged parent over
    /// its parts.
    pub(super) fn handle_qualified_ident(&mut self, entry: StateStackEntry, tag: Option<NodeKind>) {
        let leading_dot = self.at(TokenKind::Dot);
        if !leading_dot
            && self.current().is_identifier_like()
            && self.peek_nth(1) != TokenKind::Dot
        {
            return self.add_leaf(tag, false);
        }

        if leading_dot {
            self.add_leaf(None, false);
        }
        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.close(
                StateStackEntry {
                    has_error: true,
                    ..entry
                },
                tag,
            );
        }
        self.add_leaf(None, false);

        if self.at(TokenKind::Dot) {
            self.push_continuation(entry, State::QualifiedIdentFinish(tag));
            self.push_state(State::QualifiedIdentRest);
        } else {
            self.close(entry, tag);
        }
    }

    /// `. ident`, repeated by pushing itself while dots keep coming.
    pub(super) fn handle_qualified_ident_rest(&mut self, _entry: StateStackEntry) {
        self.add_leaf(None, false);

        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.mark_parent_error();
        }
        self.add_leaf(None, false);

        if self.at(TokenKind::Dot) {
            self.push_state(State::QualifiedIdentRest);
        }
    }
}
