pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod printer;
pub mod tokenized_buffer;
pub mod tree;

#[cfg(test)]
mod tests_grammar;
#[cfg(test)]
mod tests_recovery;

pub use error::{format_diagnostics, format_plain, Diagnostic, Expectation};
pub use lexer::{tokenize, tokenize_with, LexOptions, TokenKind};
pub use options::{Fragment, ParseOptions};
pub use parser::{ParsedFile, Parser};
pub use printer::{print_tree, TreePrinter};
pub use tokenized_buffer::{LineInfo, Token, TokenizedBuffer};
pub use tree::{Node, NodeCategory, NodeId, NodeKind, ParseTree, TreeError, SYNTHETIC_TOKEN};

/// Parse a whole file.
///
/// # Panics
///
/// Panics if `buffer` holds no tokens at all.
pub fn parse(buffer: &TokenizedBuffer) -> ParsedFile {
    parse_with(buffer, ParseOptions::default(), Fragment::File)
}

pub fn parse_with(buffer: &TokenizedBuffer, options: ParseOptions, fragment: Fragment) -> ParsedFile {
    Parser::new(buffer, options).parse(fragment)
}

/// Tokenize and parse `source`. The buffer is returned because the tree only
/// holds token indices into it.
pub fn parse_source(source: &str) -> (TokenizedBuffer, ParsedFile) {
    let buffer = tokenize(source);
    let parsed = parse(&buffer);
    (buffer, parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_basic() {
        let (buffer, parsed) = parse_source("message Button {}");
        assert_eq!(buffer.kind(0), TokenKind::Message);
        assert!(!parsed.has_errors());
        assert_eq!(parsed.tree.roots().count(), 1);
    }

    #[test]
    #[should_panic(expected = "empty token buffer")]
    fn test_empty_buffer_is_a_contract_violation() {
        let buffer = TokenizedBuffer::from_raw_parts("", Vec::new(), Vec::new());
        parse(&buffer);
    }
}
