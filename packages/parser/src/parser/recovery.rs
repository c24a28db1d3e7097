//! Token skipping after an expectation mismatch
//!
//! Skipped tokens are still appended as error leaves so the tree keeps one
//! leaf per consumed token. A fresh recovery ends by reporting where it
//! landed to the loop guard in [`Parser::sync`]; unwinding through parents
//! that already failed at the same token uses the unguarded `skip_*_rest`
//! variants instead.

use super::Parser;
use crate::lexer::TokenKind;
use tracing::{trace, warn};

/// Outcome of a synchronization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resync {
    /// Recovery consumed tokens or reached a new synchronization point.
    Advanced,
    /// Recovery consumed nothing and landed where it last synchronized.
    Repeated,
    /// More stalled attempts at one index than the configured limit;
    /// callers must stop trying to make progress from here.
    GaveUp,
}

impl Parser<'_> {
    /// Skip until one of `terminators`, end of input, or a closer that has no
    /// opener in the skipped range. Bracketed groups are skipped whole, so a
    /// terminator nested inside them does not count.
    pub(crate) fn skip_to(&mut self, terminators: &[TokenKind]) -> Resync {
        let from = self.position;
        self.skip_to_rest(terminators);
        self.sync(from)
    }

    pub(crate) fn skip_to_rest(&mut self, terminators: &[TokenKind]) {
        loop {
            let kind = self.current();
            if kind == TokenKind::Eof || terminators.contains(&kind) {
                break;
            }
            if kind.is_opener() {
                self.skip_group();
            } else if kind.is_closer() {
                break;
            } else {
                self.add_leaf(None, true);
            }
        }
    }

    /// Skip one bracketed group starting at the cursor, through its matching
    /// closer. A closer that matches an outer, still-open bracket closes
    /// everything inside it; one matching nothing stops the skip unconsumed.
    pub(crate) fn skip_group(&mut self) {
        let mut closers: Vec<TokenKind> = Vec::new();
        loop {
            let kind = self.current();
            if kind == TokenKind::Eof {
                break;
            }
            if let Some(closer) = kind.closer() {
                closers.push(closer);
            } else if kind.is_closer() {
                match closers.iter().rposition(|c| *c == kind) {
                    Some(depth) => closers.truncate(depth),
                    None => break,
                }
            }
            self.add_leaf(None, true);
            if closers.is_empty() {
                break;
            }
        }
    }

    /// Skip what is probably the rest of the statement introduced at
    /// `origin`, judged by layout: tokens on the origin's line or indented
    /// past its column. Stops after a `;`, or before a `}`, a `>`, end of
    /// input, or a token on a later line at or left of the origin column.
    pub(crate) fn skip_past_likely_end(&mut self, origin: u32) -> Resync {
        let from = self.position;
        self.skip_statement_rest(origin);
        self.sync(from)
    }

    pub(crate) fn skip_statement_rest(&mut self, origin: u32) {
        let (origin_line, origin_column) = self.buffer.line_column(origin).unwrap_or((0, 0));
        loop {
            let kind = self.current();
            match kind {
                TokenKind::Eof | TokenKind::RBrace | TokenKind::RAngle => break,
                TokenKind::Semicolon => {
                    self.add_leaf(None, false);
                    break;
                }
                _ => {}
            }
            if let Some((line, column)) = self.buffer.line_column(self.position) {
                if line != origin_line && column <= origin_column {
                    break;
                }
            }
            if kind.is_opener() {
                self.skip_group();
            } else {
                self.add_leaf(None, true);
            }
        }
    }

    /// Record where a recovery that started at `from` landed. Only a
    /// recovery that consumed nothing and lands on the last synchronization
    /// point again counts as a repeat.
    pub(crate) fn sync(&mut self, from: u32) -> Resync {
        let stalled = self.position == from && self.sync_pos == Some(self.position);
        if !stalled {
            trace!(token = self.position, "synchronized");
            self.sync_pos = Some(self.position);
            self.sync_count = 0;
            return Resync::Advanced;
        }

        self.sync_count += 1;
        if self.sync_count > self.options.sync_limit {
            warn!(
                token = self.position,
                attempts = self.sync_count,
                "recovery is not making progress, giving up at this token"
            );
            Resync::GaveUp
        } else {
            trace!(token = self.position, attempts = self.sync_count, "resynchronized again");
            Resync::Repeated
        }
    }

    /// True when a diagnostic was already reported at the cursor, so an
    /// enclosing construct unwinding here must not report it again.
    pub(crate) fn reported_at_cursor(&self) -> bool {
        self.diagnostics
            .last()
            .is_some_and(|d| d.token == self.position)
    }
}
