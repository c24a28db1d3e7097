//! Scoped declarations and the bodies between their braces.

use super::expected;
use super::state::{BodyKind, State, StateStackEntry};
use super::Parser;
use crate::error::Expectation;
use crate::lexer::TokenKind;
use crate::tree::NodeKind;

fn body_of(kind: NodeKind) -> BodyKind {
    match kind {
        NodeKind::Enum => BodyKind::Enum,
        NodeKind::Service => BodyKind::Service,
        NodeKind::Oneof => BodyKind::Oneof,
        _ => BodyKind::Message,
    }
}

fn body_expectations(body: BodyKind) -> &'static [Expectation] {
    match body {
        BodyKind::Message => expected::MESSAGE_BODY,
        BodyKind::Oneof => expected::ONEOF_BODY,
        BodyKind::Extend => expected::EXTEND_BODY,
        BodyKind::Enum => expected::ENUM_BODY,
        BodyKind::Service => expected::SERVICE_BODY,
        BodyKind::Rpc => expected::RPC_BODY,
    }
}

impl Parser<'_> {
    /// `message`, `enum`, `service` or `oneof`, then a name and a body.
    pub(super) fn handle_declaration(&mut self, entry: StateStackEntry, kind: NodeKind) {
        self.add_leaf(None, false);

        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.fail_scope(entry, kind);
        }
        self.add_leaf(Some(NodeKind::Name), false);

        if !self.expect_leaf(TokenKind::LBrace, expected::LBRACE) {
            return self.fail_scope(entry, kind);
        }
        self.push_continuation(entry, State::DeclarationFinish(kind));
        self.push_continuation(entry, State::Body(body_of(kind)));
    }

    /// A scoped declaration that never reached its body still gets a scope
    /// close so consumers see balanced scopes.
    fn fail_scope(&mut self, entry: StateStackEntry, kind: NodeKind) {
        self.skip_past_likely_end(entry.token);
        if kind.opens_scope() {
            self.add_synthetic(Some(NodeKind::ScopeClose), true);
        }
        self.close(
            StateStackEntry {
                has_error: true,
                ..entry
            },
            Some(kind),
        );
    }

    /// `extend Type { fields }`
    pub(super) fn handle_extend(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);

        if !self.at_type_start() {
            self.emit(expected::TYPE);
            return self.fail_statement(entry, Some(NodeKind::Extend));
        }
        self.push_continuation(entry, State::ExtendAfterName);
        self.push_state(State::QualifiedIdent(Some(NodeKind::ExtendeeType)));
    }

    pub(super) fn handle_extend_after_name(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Extend));
        }
        if !self.expect_leaf(TokenKind::LBrace, expected::LBRACE) {
            return self.fail_statement(entry, Some(NodeKind::Extend));
        }
        self.push_continuation(entry, State::DeclarationFinish(NodeKind::Extend));
        self.push_continuation(entry, State::Body(BodyKind::Extend));
    }

    /// One step of a body: a closing brace, an empty statement, or the start
    /// of the next statement. Fragments have no braces and end at end of
    /// input.
    pub(super) fn handle_body(&mut self, entry: StateStackEntry, body: BodyKind, fragment: bool) {
        let state = if fragment {
            State::FragmentBody(body)
        } else {
            State::Body(body)
        };

        match self.current() {
            TokenKind::Eof if fragment => return,
            TokenKind::Eof => {
                self.emit(expected::RBRACE);
                if let Some(tag) = body.close_tag() {
                    self.add_synthetic(Some(tag), true);
                }
                self.mark_parent_error();
                return;
            }
            TokenKind::RBrace if !fragment => {
                self.add_leaf(body.close_tag(), false);
                if entry.has_error {
                    self.mark_parent_error();
                }
                return;
            }
            TokenKind::Semicolon => {
                self.add_leaf(None, false);
                self.push_continuation(entry, state);
                return;
            }
            _ => {}
        }

        match self.body_statement(body) {
            Some(statement) => {
                self.push_continuation(entry, state);
                self.push_state(statement);
            }
            None => self.recover_in_body(entry, body, state),
        }
    }

    fn body_statement(&self, body: BodyKind) -> Option<State> {
        let current = self.current();
        let next = self.peek_nth(1);
        let named = next.is_identifier_like();

        match body {
            BodyKind::Message | BodyKind::Oneof | BodyKind::Extend => {
                let nested = body == BodyKind::Message;
                match current {
                    TokenKind::Option if body != BodyKind::Extend => Some(State::OptionStatement),
                    TokenKind::Reserved if nested => Some(State::Ranges(NodeKind::Reserved)),
                    TokenKind::Extensions if nested => Some(State::Ranges(NodeKind::Extensions)),
                    TokenKind::Message if nested && named => {
                        Some(State::Declaration(NodeKind::Message))
                    }
                    TokenKind::Enum if nested && named => Some(State::Declaration(NodeKind::Enum)),
                    TokenKind::Oneof if nested && named => Some(State::Declaration(NodeKind::Oneof)),
                    TokenKind::Extend if nested && (named || next == TokenKind::Dot) => {
                        Some(State::Extend)
                    }
                    kind if kind.is_identifier_like() || kind == TokenKind::Dot => Some(State::Field),
                    _ => None,
                }
            }
            BodyKind::Enum => match current {
                TokenKind::Option => Some(State::OptionStatement),
                TokenKind::Reserved => Some(State::Ranges(NodeKind::Reserved)),
                kind if kind.is_identifier_like() => Some(State::EnumValue),
                _ => None,
            },
            BodyKind::Service => match current {
                TokenKind::Option => Some(State::OptionStatement),
                TokenKind::Rpc => Some(State::Rpc),
                _ => None,
            },
            BodyKind::Rpc => match current {
                TokenKind::Option => Some(State::OptionStatement),
                _ => None,
            },
        }
    }

    /// Report the stray token, skip it and whatever the layout says belongs
    /// with it, and keep going with the same body. The stray token is always
    /// consumed, so the body loop advances on every pass and a fragment only
    /// ends at end of input.
    fn recover_in_body(&mut self, entry: StateStackEntry, body: BodyKind, state: State) {
        // No second report when a failed statement already reported here.
        if !self.reported_at_cursor() {
            self.emit(body_expectations(body));
        }
        let origin = self.position;
        if self.current().is_opener() {
            self.skip_group();
        } else {
            self.add_leaf(None, true);
        }
        self.skip_past_likely_end(origin);
        self.push_continuation(
            StateStackEntry {
                has_error: true,
                ..entry
            },
            state,
        );
    }

    /// `rpc Name ([stream] Input) returns ([stream] Output) (; | { options })`
    pub(super) fn handle_rpc(&mut self, entry: StateStackEntry) {
        self.add_leaf(None, false);

        if !self.current().is_identifier_like() {
            self.emit(expected::IDENTIFIER);
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        self.add_leaf(Some(NodeKind::Name), false);

        if !self.expect_leaf(TokenKind::LParen, expected::LPAREN) {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        self.rpc_type(entry, State::RpcAfterInput, NodeKind::RpcInputType);
    }

    pub(super) fn handle_rpc_after_input(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        if !self.expect_leaf(TokenKind::RParen, expected::RPAREN) {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        if !self.at_contextual("returns") {
            self.emit(expected::RETURNS);
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        self.add_leaf(None, false);

        if !self.expect_leaf(TokenKind::LParen, expected::LPAREN) {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        self.rpc_type(entry, State::RpcAfterOutput, NodeKind::RpcOutputType);
    }

    pub(super) fn handle_rpc_after_output(&mut self, entry: StateStackEntry) {
        if entry.has_error {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        if !self.expect_leaf(TokenKind::RParen, expected::RPAREN) {
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        match self.current() {
            TokenKind::Semicolon => {
                self.add_leaf(None, false);
                self.close(entry, Some(NodeKind::Rpc));
            }
            TokenKind::LBrace => {
                self.add_leaf(None, false);
                self.push_continuation(entry, State::DeclarationFinish(NodeKind::Rpc));
                self.push_continuation(entry, State::Body(BodyKind::Rpc));
            }
            _ => {
                self.emit(expected::RPC_END);
                self.fail_statement(entry, Some(NodeKind::Rpc));
            }
        }
    }

    /// Optional `stream`, then the message type inside an rpc's parentheses.
    fn rpc_type(&mut self, entry: StateStackEntry, next: State, tag: NodeKind) {
        if self.at_contextual("stream") {
            let after = self.peek_nth(1);
            if after.is_identifier_like() || after == TokenKind::Dot {
                self.add_leaf(None, false);
            }
        }
        if !self.at_type_start() {
            self.emit(expected::TYPE);
            return self.fail_statement(entry, Some(NodeKind::Rpc));
        }
        self.push_continuation(entry, next);
        self.push_state(State::QualifiedIdent(Some(tag)));
    }
}
