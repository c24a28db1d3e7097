use crate::*;

fn roots(tree: &ParseTree) -> Vec<NodeId> {
    let mut roots: Vec<_> = tree.roots().collect();
    roots.reverse();
    roots
}

fn scope_closes(tree: &ParseTree, id: NodeId) -> usize {
    tree.children(id)
        .filter(|c| tree.kind(*c) == Some(NodeKind::ScopeClose))
        .count()
}

/// Every non-comment token except end of input is owned by exactly one leaf.
fn assert_all_tokens_covered(buffer: &TokenizedBuffer, tree: &ParseTree) {
    let leaves: Vec<_> = tree.leaf_tokens().collect();
    let expected: Vec<_> = (0..buffer.len() as u32)
        .filter(|i| {
            let kind = buffer.kind(*i);
            kind != TokenKind::Eof && !kind.is_comment()
        })
        .collect();
    assert_eq!(leaves, expected);
}

#[test]
fn test_errors_in_separate_statements_are_all_reported() {
    let source = "message A {\n  int32 x = ;\n  int32 y = 2;\n  string = 3;\n}\nmessage B {}";
    let (buffer, parsed) = parse_source(source);
    let tree = &parsed.tree;
    assert_eq!(tree.verify(), Ok(()));
    assert_eq!(parsed.diagnostics.len(), 2);
    assert_eq!(parsed.diagnostics[0].found, TokenKind::Semicolon);
    assert_eq!(parsed.diagnostics[0].expected, &[Expectation::Token(TokenKind::IntLiteral)]);
    assert_eq!(parsed.diagnostics[1].found, TokenKind::Equals);
    assert_eq!(parsed.diagnostics[1].expected, &[Expectation::Identifier]);

    let roots = roots(tree);
    assert_eq!(roots.len(), 2);
    assert!(tree.node(roots[0]).has_error);
    assert!(!tree.node(roots[1]).has_error);

    let fields: Vec<_> = tree
        .children(roots[0])
        .filter(|c| tree.kind(*c) == Some(NodeKind::Field))
        .map(|c| tree.node(c).has_error)
        .collect();
    // children() walks last-first
    assert_eq!(fields, vec![true, false, true]);
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_top_level_garbage_is_skipped_token_by_token() {
    let (buffer, parsed) = parse_source("foo 42 message A {}");
    assert_eq!(parsed.diagnostics.len(), 2);
    assert!(parsed
        .diagnostics
        .iter()
        .all(|d| d.expected == [Expectation::TopLevelStatement]));

    let roots = roots(&parsed.tree);
    assert_eq!(roots.len(), 3);
    assert!(parsed.tree.node(roots[0]).has_error);
    assert!(parsed.tree.node(roots[1]).is_leaf());
    assert_eq!(parsed.tree.kind(roots[2]), Some(NodeKind::Message));
    assert_all_tokens_covered(&buffer, &parsed.tree);
}

#[test]
fn test_nested_unterminated_blocks_keep_scopes_paired() {
    let (buffer, parsed) = parse_source("message A {\n  message B {\n    int32 x = 1;\n");
    let tree = &parsed.tree;
    assert_eq!(tree.verify(), Ok(()));
    assert_eq!(parsed.diagnostics.len(), 2);
    assert!(parsed.diagnostics.iter().all(|d| d.is_premature_eof()));

    let roots = roots(tree);
    assert_eq!(roots.len(), 1);
    let outer = roots[0];
    let inner = tree.find_child(outer, NodeKind::Message).unwrap();
    assert_eq!(scope_closes(tree, outer), 1);
    assert_eq!(scope_closes(tree, inner), 1);
    assert!(tree.node(outer).has_error);
    assert!(tree.node(inner).has_error);
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_declaration_without_name_still_closes_its_scope() {
    let (buffer, parsed) = parse_source("message { int32 x = 1; }\nmessage Ok {}");
    let tree = &parsed.tree;
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].expected, &[Expectation::Identifier]);

    let roots = roots(tree);
    assert_eq!(roots.len(), 2);
    assert!(tree.node(roots[0]).has_error);
    assert_eq!(scope_closes(tree, roots[0]), 1);
    let close = tree.find_child(roots[0], NodeKind::ScopeClose).unwrap();
    assert!(tree.node(close).is_synthetic());
    assert!(!tree.node(roots[1]).has_error);
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_bad_map_key_reports_once() {
    let (buffer, parsed) =
        parse_source("message A {\n  map<float, string> m = 1;\n  int32 ok = 2;\n}");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].expected, &[Expectation::MapKeyType]);
    assert_eq!(parsed.diagnostics[0].found, TokenKind::Float);

    let tree = &parsed.tree;
    let message = roots(tree)[0];
    let map = tree.find_child(message, NodeKind::MapField).unwrap();
    assert!(tree.node(map).has_error);
    let field = tree.find_child(message, NodeKind::Field).unwrap();
    assert!(!tree.node(field).has_error);
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_option_list_resynchronizes_on_commas() {
    let source = "message A {\n  int32 x = 1 [a = , b = 2];\n  int32 y = 2;\n}";
    let (buffer, parsed) = parse_source(source);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].expected, &[Expectation::Value]);

    let tree = &parsed.tree;
    let options = tree
        .nodes()
        .iter()
        .filter(|n| n.kind == Some(NodeKind::Option))
        .collect::<Vec<_>>();
    assert_eq!(options.len(), 2);
    assert!(options[0].has_error);
    assert!(!options[1].has_error);
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_missing_text_colon_before_scalar() {
    let (buffer, parsed) = parse_source("option (a) = { x 1 };");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(
        parsed.diagnostics[0].expected,
        &[Expectation::Token(TokenKind::Colon)]
    );
    let field = parsed
        .tree
        .nodes()
        .iter()
        .find(|n| n.kind == Some(NodeKind::TextField))
        .unwrap();
    assert!(field.has_error);
    assert_all_tokens_covered(&buffer, &parsed.tree);
}

#[test]
fn test_unterminated_text_message() {
    let (buffer, parsed) = parse_source("option x = { a: 1");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].is_premature_eof());
    assert_eq!(parsed.tree.verify(), Ok(()));
    assert_all_tokens_covered(&buffer, &parsed.tree);
}

#[test]
fn test_rpc_missing_returns() {
    let source = "service S {\n  rpc A(B) (C);\n  rpc D(E) returns (F);\n}";
    let (buffer, parsed) = parse_source(source);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(
        parsed.diagnostics[0].expected,
        &[Expectation::Contextual("returns")]
    );
    let rpcs: Vec<_> = parsed
        .tree
        .nodes()
        .iter()
        .filter(|n| n.kind == Some(NodeKind::Rpc))
        .map(|n| n.has_error)
        .collect();
    assert_eq!(rpcs, vec![true, false]);
    assert_all_tokens_covered(&buffer, &parsed.tree);
}

#[test]
fn test_invalid_character_is_an_expectation_mismatch() {
    let (_, parsed) = parse_source("message A {\n  int32 x = 1 $;\n}");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].found, TokenKind::Error);
}

#[test]
fn test_stray_lines_keep_the_message_whole_at_any_limit() {
    let buffer = tokenize("message A {\n 1\n 2\n 3\n int32 ok = 4;\n}");
    for sync_limit in 0..4 {
        let parsed = parse_with(&buffer, ParseOptions { sync_limit }, Fragment::File);
        let tree = &parsed.tree;
        assert_eq!(tree.verify(), Ok(()));
        assert_eq!(parsed.diagnostics.len(), 3);

        let roots = roots(tree);
        assert_eq!(roots.len(), 1, "limit {}", sync_limit);
        let close = tree.find_child(roots[0], NodeKind::ScopeClose).unwrap();
        assert!(!tree.node(close).is_synthetic());
        let field = tree.find_child(roots[0], NodeKind::Field).unwrap();
        assert!(!tree.node(field).has_error);
        assert_all_tokens_covered(&buffer, tree);
    }
}

fn nested_text_option(depth: usize) -> String {
    format!("int32 x = 1 [a = {}>];\nint32 y = 2;", "{b ".repeat(depth))
}

#[test]
fn test_nested_text_failure_inside_fragment_keeps_parsing() {
    let buffer = tokenize(&nested_text_option(12));
    let parsed = parse_with(&buffer, ParseOptions::default(), Fragment::MessageBody);
    let tree = &parsed.tree;
    assert_eq!(tree.verify(), Ok(()));
    assert_all_tokens_covered(&buffer, tree);

    let fields: Vec<_> = roots(tree)
        .into_iter()
        .filter(|r| tree.kind(*r) == Some(NodeKind::Field))
        .collect();
    assert_eq!(fields.len(), 2);
    assert!(tree.node(fields[0]).has_error);
    assert!(!tree.node(fields[1]).has_error);
}

#[test]
fn test_nested_text_failure_inside_message_stays_in_the_message() {
    let source = format!("message M {{\n{}\n}}", nested_text_option(12));
    let (buffer, parsed) = parse_source(&source);
    let tree = &parsed.tree;
    let roots = roots(tree);
    assert_eq!(roots.len(), 1);
    assert_eq!(tree.kind(roots[0]), Some(NodeKind::Message));
    let close = tree.find_child(roots[0], NodeKind::ScopeClose).unwrap();
    assert!(!tree.node(close).is_synthetic());
    assert!(parsed
        .diagnostics
        .iter()
        .all(|d| d.expected != [Expectation::TopLevelStatement]));
    assert_all_tokens_covered(&buffer, tree);
}

#[test]
fn test_stray_closer_in_nested_text_is_reported_once() {
    let source = format!("message M {{\n{}\n}}", nested_text_option(20));
    let (buffer, parsed) = parse_source(&source);
    assert_eq!(parsed.diagnostics.len(), 1);
    let diagnostic = &parsed.diagnostics[0];
    assert_eq!(diagnostic.expected, &[Expectation::Token(TokenKind::Colon)]);
    assert_eq!(diagnostic.found, TokenKind::RAngle);
    assert_eq!(buffer.text(diagnostic.token), ">");
}

#[test]
fn test_default_sync_limit_recovers_line_by_line() {
    let (buffer, parsed) = parse_source("message A {\n 1\n 2\n 3\n}");
    assert_eq!(parsed.diagnostics.len(), 3);
    let roots = roots(&parsed.tree);
    assert_eq!(roots.len(), 1);
    let close = parsed
        .tree
        .find_child(roots[0], NodeKind::ScopeClose)
        .unwrap();
    assert!(!parsed.tree.node(close).is_synthetic());
    assert_all_tokens_covered(&buffer, &parsed.tree);
}
