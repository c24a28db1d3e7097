//! Explicit state-stack parser
//!
//! Every grammar position is a [`State`] on a stack that one loop pops and
//! dispatches, so nesting depth is bounded by heap memory rather than the
//! native call stack. A handler that delegates to a nested construct first
//! pushes its own continuation and then the nested state; when the nested
//! construct closes with an error it marks the continuation sitting on top of
//! the stack, which is how errors travel outward.

mod declaration;
mod expected;
mod field;
mod file;
mod ident;
mod option;
mod recovery;
mod state;
mod text_format;

pub use recovery::Resync;
pub use state::{BodyKind, State, StateStackEntry};

use crate::error::{Diagnostic, Expectation};
use crate::lexer::TokenKind;
use crate::options::{Fragment, ParseOptions};
use crate::tokenized_buffer::TokenizedBuffer;
use crate::tree::{Node, NodeKind, ParseTree, SYNTHETIC_TOKEN};
use tracing::{debug, trace};

/// Everything one parse produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub tree: ParseTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub struct Parser<'a> {
    buffer: &'a TokenizedBuffer,
    /// Always rests on a non-comment token.
    position: u32,
    tree: Vec<Node>,
    stack: Vec<StateStackEntry>,
    diagnostics: Vec<Diagnostic>,
    options: ParseOptions,
    sync_pos: Option<u32>,
    sync_count: u32,
}

impl<'a> Parser<'a> {
    /// # Panics
    ///
    /// Panics if `buffer` holds no tokens at all; a buffer must carry at least
    /// its end-of-input marker.
    pub fn new(buffer: &'a TokenizedBuffer, options: ParseOptions) -> Self {
        assert!(
            !buffer.is_empty(),
            "cannot parse an empty token buffer: at least an end-of-input token is required"
        );
        let mut parser = Self {
            buffer,
            position: 0,
            tree: Vec::with_capacity(buffer.len()),
            stack: Vec::new(),
            diagnostics: Vec::new(),
            options,
            sync_pos: None,
            sync_count: 0,
        };
        parser.skip_comments();
        parser
    }

    pub fn parse(mut self, fragment: Fragment) -> ParsedFile {
        debug!(tokens = self.buffer.len(), ?fragment, "parsing");

        let initial = match fragment {
            Fragment::File => State::File,
            Fragment::MessageBody => State::FragmentBody(BodyKind::Message),
            Fragment::EnumBody => State::FragmentBody(BodyKind::Enum),
            Fragment::ServiceBody => State::FragmentBody(BodyKind::Service),
        };
        self.push_state(initial);

        while let Some(entry) = self.stack.pop() {
            self.dispatch(entry);
        }

        debug!(
            nodes = self.tree.len(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        ParsedFile {
            tree: ParseTree::from_nodes(self.tree),
            diagnostics: self.diagnostics,
        }
    }

    fn dispatch(&mut self, entry: StateStackEntry) {
        match entry.state {
            State::File => self.handle_file(entry),
            State::FragmentBody(body) => self.handle_body(entry, body, true),
            State::Body(body) => self.handle_body(entry, body, false),

            State::SyntaxDecl => self.handle_syntax(entry),
            State::Import => self.handle_import(entry),
            State::Package => self.handle_package(entry),
            State::PackageFinish => self.handle_package_finish(entry),

            State::OptionStatement => self.handle_option_statement(entry),
            State::OptionStatementAfterName => self.handle_option_statement_after_name(entry),
            State::OptionStatementFinish => self.handle_option_statement_finish(entry),
            State::OptionName => self.handle_option_name(entry),
            State::OptionNamePart => self.handle_option_name_part(entry),
            State::OptionNameExtensionClose => self.handle_option_name_extension_close(entry),
            State::OptionNameFinish => self.close(entry, Some(NodeKind::OptionName)),
            State::OptionList => self.handle_option_list(entry),
            State::OptionListItemFinish(list_error) => {
                self.finish_list_item(entry, list_error, ListKind::Options)
            }
            State::ListOption => self.handle_list_option(entry),
            State::ListOptionAfterName => self.handle_list_option_after_name(entry),
            State::ListOptionFinish => self.close(entry, Some(NodeKind::Option)),

            State::Declaration(kind) => self.handle_declaration(entry, kind),
            State::Extend => self.handle_extend(entry),
            State::ExtendAfterName => self.handle_extend_after_name(entry),
            State::DeclarationFinish(kind) => self.close(entry, Some(kind)),

            State::Field => self.handle_field(entry),
            State::FieldAfterType(kind) => self.handle_field_after_type(entry, kind),
            State::FieldAfterMapValue => self.handle_field_after_map_value(entry),
            State::FieldFinish(kind) => self.handle_field_finish(entry, kind),
            State::EnumValue => self.handle_enum_value(entry),
            State::Ranges(kind) => self.handle_ranges(entry, kind),

            State::Rpc => self.handle_rpc(entry),
            State::RpcAfterInput => self.handle_rpc_after_input(entry),
            State::RpcAfterOutput => self.handle_rpc_after_output(entry),

            State::Value => self.handle_value(entry),
            State::TextMessage => self.handle_text_message(entry),
            State::TextMessageBody(closer) => self.handle_text_message_body(entry, closer),
            State::TextField => self.handle_text_field(entry),
            State::TextFieldFinish => self.handle_text_field_finish(entry),
            State::TextList => self.handle_text_list(entry),
            State::TextListItemFinish(list_error) => {
                self.finish_list_item(entry, list_error, ListKind::Values)
            }

            State::QualifiedIdent(tag) => self.handle_qualified_ident(entry, tag),
            State::QualifiedIdentRest => self.handle_qualified_ident_rest(entry),
            State::QualifiedIdentFinish(tag) => self.close(entry, tag),
        }
    }

    // Cursor

    fn current(&self) -> TokenKind {
        self.buffer.kind(self.position)
    }

    /// Kind of the `n`th significant token after the cursor.
    fn peek_nth(&self, n: usize) -> TokenKind {
        let mut index = self.position;
        for _ in 0..n {
            if self.buffer.kind(index) == TokenKind::Eof {
                return TokenKind::Eof;
            }
            index += 1;
            while self.buffer.kind(index).is_comment() {
                index += 1;
            }
        }
        self.buffer.kind(index)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// True when the cursor is on an identifier spelled `word`. Contextual
    /// keywords are never reclassified in the buffer.
    fn at_contextual(&self, word: &str) -> bool {
        self.at(TokenKind::Identifier) && self.buffer.text(self.position) == word
    }

    /// A type reference may start with a name or a leading `.`.
    fn at_type_start(&self) -> bool {
        let kind = self.current();
        kind.is_identifier_like() || kind == TokenKind::Dot
    }

    fn advance(&mut self) {
        if self.at_eof() {
            return;
        }
        self.position += 1;
        self.skip_comments();
    }

    fn skip_comments(&mut self) {
        while self.buffer.kind(self.position).is_comment() {
            self.position += 1;
        }
    }

    // Tree building

    /// Append the current token as a leaf and advance. End of input is never
    /// consumed.
    fn add_leaf(&mut self, kind: Option<NodeKind>, has_error: bool) {
        if self.at_eof() {
            return;
        }
        self.tree.push(Node {
            token: self.position,
            subtree_size: 1,
            has_error,
            kind,
        });
        self.advance();
    }

    fn add_synthetic(&mut self, kind: Option<NodeKind>, has_error: bool) {
        self.tree.push(Node {
            token: SYNTHETIC_TOKEN,
            subtree_size: 1,
            has_error,
            kind,
        });
    }

    /// Consume a token of `kind` or report `expected`.
    fn expect_leaf(&mut self, kind: TokenKind, expected: &'static [Expectation]) -> bool {
        if self.at(kind) {
            self.add_leaf(None, false);
            true
        } else {
            self.emit(expected);
            false
        }
    }

    fn emit(&mut self, expected: &'static [Expectation]) {
        let diagnostic = Diagnostic {
            expected,
            found: self.current(),
            token: self.position,
        };
        trace!(token = self.position, %diagnostic, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Append a parent over everything pushed since `subtree_start`.
    fn add_node(
        &mut self,
        token: u32,
        subtree_start: usize,
        kind: Option<NodeKind>,
        has_error: bool,
    ) {
        self.tree.push(Node {
            token,
            subtree_size: (self.tree.len() - subtree_start + 1) as u32,
            has_error,
            kind,
        });
    }

    /// Emit the parent node of everything appended since `entry` started.
    fn close(&mut self, entry: StateStackEntry, kind: Option<NodeKind>) {
        let start = entry.subtree_start as usize;
        // A construct that consumed nothing must not claim a token that a
        // later leaf will own.
        let token = if start == self.tree.len() {
            SYNTHETIC_TOKEN
        } else {
            entry.token
        };
        self.add_node(token, start, kind, entry.has_error);
        if entry.has_error {
            self.mark_parent_error();
        }
    }

    /// Skip the rest of a broken statement and close it as erroneous. The
    /// diagnostic has already been emitted, either here or by a nested
    /// construct whose failure is now unwinding through `entry`.
    fn fail_statement(&mut self, entry: StateStackEntry, kind: Option<NodeKind>) {
        if entry.has_error {
            self.skip_statement_rest(entry.token);
        } else {
            self.skip_past_likely_end(entry.token);
        }
        self.close(
            StateStackEntry {
                has_error: true,
                ..entry
            },
            kind,
        );
    }

    // Stack

    fn push_state(&mut self, state: State) {
        self.stack.push(StateStackEntry {
            state,
            token: self.position,
            subtree_start: self.tree.len() as u32,
            has_error: false,
        });
    }

    fn push_continuation(&mut self, entry: StateStackEntry, state: State) {
        self.stack.push(StateStackEntry { state, ..entry });
    }

    fn mark_parent_error(&mut self) {
        if let Some(parent) = self.stack.last_mut() {
            parent.has_error = true;
        }
    }
}

/// The two bracketed, comma-separated lists the grammar knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    /// `[name = value, ...]` after a field or enum value.
    Options,
    /// `[value, ...]` inside a text-format message.
    Values,
}

impl Parser<'_> {
    fn finish_list_item(&mut self, entry: StateStackEntry, list_error: bool, list: ListKind) {
        let mut list_error = list_error || entry.has_error;

        let separators = [TokenKind::Comma, TokenKind::RBracket];
        if entry.has_error {
            self.skip_to_rest(&separators);
        } else if !separators.contains(&self.current()) {
            self.emit(expected::LIST_SEPARATOR);
            list_error = true;
            if self.skip_to(&separators) == Resync::GaveUp {
                return self.close_list(entry, true, list);
            }
        }

        match self.current() {
            TokenKind::Comma => {
                self.add_leaf(None, false);
                let (next, item) = match list {
                    ListKind::Options => (State::OptionListItemFinish(list_error), State::ListOption),
                    ListKind::Values => (State::TextListItemFinish(list_error), State::Value),
                };
                self.push_continuation(
                    StateStackEntry {
                        has_error: false,
                        ..entry
                    },
                    next,
                );
                self.push_state(item);
            }
            TokenKind::RBracket => {
                self.add_leaf(None, false);
                self.close_list(entry, list_error, list);
            }
            // End of input or a closer that belongs to an enclosing construct.
            _ => self.close_list(entry, true, list),
        }
    }

    fn close_list(&mut self, entry: StateStackEntry, has_error: bool, list: ListKind) {
        let kind = match list {
            ListKind::Options => None,
            ListKind::Values => Some(NodeKind::TextList),
        };
        self.close(StateStackEntry { has_error, ..entry }, kind);
    }
}
