use crate::lexer::{tokenize_with, LexOptions};
use crate::*;

fn parse_clean(source: &str) -> (TokenizedBuffer, ParsedFile) {
    let (buffer, parsed) = parse_source(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {:?}: {:?}",
        source,
        parsed.diagnostics
    );
    assert_eq!(parsed.tree.verify(), Ok(()));
    (buffer, parsed)
}

fn roots(tree: &ParseTree) -> Vec<NodeId> {
    let mut roots: Vec<_> = tree.roots().collect();
    roots.reverse();
    roots
}

fn children(tree: &ParseTree, id: NodeId) -> Vec<NodeId> {
    let mut children: Vec<_> = tree.children(id).collect();
    children.reverse();
    children
}

fn child_kinds(tree: &ParseTree, id: NodeId) -> Vec<Option<NodeKind>> {
    children(tree, id).into_iter().map(|c| tree.kind(c)).collect()
}

fn count_kind(tree: &ParseTree, kind: NodeKind) -> usize {
    tree.nodes().iter().filter(|n| n.kind == Some(kind)).count()
}

fn text<'a>(buffer: &'a TokenizedBuffer, tree: &ParseTree, id: NodeId) -> &'a str {
    buffer.text(tree.node(id).token)
}

#[test]
fn test_file_header_statements() {
    let (buffer, parsed) = parse_clean(
        "syntax = \"proto3\";\npackage foo.bar;\nimport public \"other.proto\";\nimport \"a\" \"b.proto\";",
    );
    let tree = &parsed.tree;
    let roots = roots(tree);
    let kinds: Vec<_> = roots.iter().map(|r| tree.kind(*r)).collect();
    assert_eq!(
        kinds,
        vec![
            Some(NodeKind::Syntax),
            Some(NodeKind::Package),
            Some(NodeKind::Import),
            Some(NodeKind::Import),
        ]
    );

    let name = tree.find_child(roots[1], NodeKind::Name).unwrap();
    assert_eq!(tree.node(name).subtree_size, 4);
    assert_eq!(text(&buffer, tree, name), "foo");

    // `import`, `public`, path, `;`
    assert_eq!(children(tree, roots[2]).len(), 4);
    // Adjacent strings concatenate.
    assert_eq!(children(tree, roots[3]).len(), 4);
}

#[test]
fn test_edition_statement() {
    let (_, parsed) = parse_clean("edition = \"2023\";");
    let roots = roots(&parsed.tree);
    assert_eq!(parsed.tree.kind(roots[0]), Some(NodeKind::Edition));
}

#[test]
fn test_field_shapes() {
    let (buffer, parsed) =
        parse_clean("message A { repeated .pkg.Type items = 1; map<int32, string> m = 2; }");
    let tree = &parsed.tree;
    let message = roots(tree)[0];
    assert_eq!(
        child_kinds(tree, message),
        vec![
            None,
            Some(NodeKind::Name),
            None,
            Some(NodeKind::Field),
            Some(NodeKind::MapField),
            Some(NodeKind::ScopeClose),
        ]
    );

    let members = children(tree, message);
    let field = members[3];
    assert_eq!(
        child_kinds(tree, field),
        vec![
            None,
            Some(NodeKind::FieldType),
            Some(NodeKind::Name),
            None,
            None,
            None,
        ]
    );
    let field_type = tree.find_child(field, NodeKind::FieldType).unwrap();
    assert_eq!(tree.node(field_type).subtree_size, 5);
    assert_eq!(text(&buffer, tree, field_type), ".");

    let map = members[4];
    assert_eq!(tree.node(map).subtree_size, 11);
    let key = tree.find_child(map, NodeKind::MapKeyType).unwrap();
    let value = tree.find_child(map, NodeKind::MapValueType).unwrap();
    assert_eq!(text(&buffer, tree, key), "int32");
    assert_eq!(text(&buffer, tree, value), "string");
    assert!(tree.node(value).is_leaf());
}

#[test]
fn test_keywords_as_names() {
    let (buffer, parsed) =
        parse_clean("message message { string message = 1; enum enum { enum = 0; } }");
    let tree = &parsed.tree;
    let message = roots(tree)[0];
    let name = tree.find_child(message, NodeKind::Name).unwrap();
    assert_eq!(text(&buffer, tree, name), "message");

    let field = tree.find_child(message, NodeKind::Field).unwrap();
    let field_name = tree.find_child(field, NodeKind::Name).unwrap();
    assert_eq!(text(&buffer, tree, field_name), "message");

    let nested = tree.find_child(message, NodeKind::Enum).unwrap();
    assert!(tree.find_child(nested, NodeKind::EnumValue).is_some());
    // Token kinds are never rewritten.
    assert_eq!(buffer.kind(tree.node(field_name).token), TokenKind::Message);
}

#[test]
fn test_contextual_words_stay_identifiers() {
    let (buffer, parsed) = parse_clean("message returns { stream to = 1; max public = 2; }");
    let tree = &parsed.tree;
    let message = roots(tree)[0];
    let fields: Vec<_> = children(tree, message)
        .into_iter()
        .filter(|c| tree.kind(*c) == Some(NodeKind::Field))
        .collect();
    assert_eq!(fields.len(), 2);
    let field_type = tree.find_child(fields[0], NodeKind::FieldType).unwrap();
    assert_eq!(text(&buffer, tree, field_type), "stream");
}

#[test]
fn test_enum_values_and_ranges() {
    let (buffer, parsed) = parse_clean(
        "enum E {\n  A = 0;\n  B = -1 [deprecated = true];\n  reserved 2, 5 to 10, 20 to max;\n  reserved \"C\", D;\n}",
    );
    let tree = &parsed.tree;
    let enumeration = roots(tree)[0];
    assert_eq!(tree.kind(enumeration), Some(NodeKind::Enum));
    assert_eq!(count_kind(tree, NodeKind::EnumValue), 2);
    assert_eq!(count_kind(tree, NodeKind::Reserved), 2);
    assert_eq!(count_kind(tree, NodeKind::Range), 3);

    let with_options = children(tree, enumeration)
        .into_iter()
        .filter(|c| tree.kind(*c) == Some(NodeKind::EnumValue))
        .nth(1)
        .unwrap();
    let option = tree
        .subtree(with_options)
        .iter()
        .filter(|n| n.kind == Some(NodeKind::Option))
        .count();
    assert_eq!(option, 1);

    let ranges: Vec<_> = tree
        .postorder()
        .filter(|id| tree.kind(*id) == Some(NodeKind::Range))
        .map(|id| tree.node(id).subtree_size)
        .collect();
    assert_eq!(ranges, vec![2, 4, 4]);
    let last_range = tree
        .postorder()
        .filter(|id| tree.kind(*id) == Some(NodeKind::Range))
        .last()
        .unwrap();
    assert_eq!(text(&buffer, tree, last_range), "20");
}

#[test]
fn test_extensions_with_options() {
    let (_, parsed) =
        parse_clean("message M { extensions 100 to 199 [declaration = { number: 100 }]; }");
    let tree = &parsed.tree;
    assert_eq!(count_kind(tree, NodeKind::Extensions), 1);
    assert_eq!(count_kind(tree, NodeKind::TextMessage), 1);
    assert_eq!(count_kind(tree, NodeKind::TextField), 1);
}

#[test]
fn test_service_and_rpcs() {
    let (buffer, parsed) = parse_clean(
        "service S {\n  rpc Get(stream .a.Req) returns (Resp);\n  rpc Put(Req) returns (stream Resp) { option deadline = 1.5; }\n}",
    );
    let tree = &parsed.tree;
    let service = roots(tree)[0];
    assert_eq!(tree.kind(service), Some(NodeKind::Service));
    let rpcs: Vec<_> = children(tree, service)
        .into_iter()
        .filter(|c| tree.kind(*c) == Some(NodeKind::Rpc))
        .collect();
    assert_eq!(rpcs.len(), 2);

    let input = tree.find_child(rpcs[0], NodeKind::RpcInputType).unwrap();
    assert_eq!(tree.node(input).subtree_size, 5);
    let output = tree.find_child(rpcs[1], NodeKind::RpcOutputType).unwrap();
    assert_eq!(text(&buffer, tree, output), "Resp");
    assert!(tree.find_child(rpcs[1], NodeKind::Option).is_some());

    // Only the service scope is closed by a ScopeClose; rpc bodies are not scopes.
    assert_eq!(count_kind(tree, NodeKind::ScopeClose), 1);
}

#[test]
fn test_option_with_text_format_value() {
    let (_, parsed) = parse_clean(
        "option (my.ext).sub = { a: 1 b: \"x\" c { d: [1, 2] } [ext.name]: 5; any: <x: -inf> };",
    );
    let tree = &parsed.tree;
    let option = roots(tree)[0];
    assert_eq!(tree.kind(option), Some(NodeKind::Option));

    let name = tree.find_child(option, NodeKind::OptionName).unwrap();
    // ( my . ext ) . sub, with my.ext wrapped in one node
    assert_eq!(tree.node(name).subtree_size, 9);

    assert_eq!(count_kind(tree, NodeKind::TextMessage), 3);
    assert_eq!(count_kind(tree, NodeKind::TextList), 1);
    assert_eq!(count_kind(tree, NodeKind::TextField), 7);

    let terminators: Vec<_> = tree
        .nodes()
        .iter()
        .filter(|n| n.kind == Some(NodeKind::Terminator))
        .collect();
    assert_eq!(terminators.len(), 3);
    assert!(terminators.iter().all(|n| n.is_synthetic() && !n.has_error));
}

#[test]
fn test_extend_and_oneof() {
    let (_, parsed) = parse_clean(
        "extend .google.protobuf.FieldOptions { optional string x = 5000; }\nmessage M { oneof choice { string a = 1; int32 b = 2; } }",
    );
    let tree = &parsed.tree;
    let roots = roots(tree);
    assert_eq!(tree.kind(roots[0]), Some(NodeKind::Extend));
    assert!(tree.find_child(roots[0], NodeKind::ExtendeeType).is_some());
    assert!(tree.find_child(roots[0], NodeKind::ScopeClose).is_none());

    let oneof = tree.find_child(roots[1], NodeKind::Oneof).unwrap();
    assert!(tree.find_child(oneof, NodeKind::ScopeClose).is_some());
    assert_eq!(
        children(tree, oneof)
            .into_iter()
            .filter(|c| tree.kind(*c) == Some(NodeKind::Field))
            .count(),
        2
    );
}

#[test]
fn test_enum_fragment() {
    let buffer = tokenize("A = 0;\nB = 1;");
    let parsed = parse_with(&buffer, ParseOptions::default(), Fragment::EnumBody);
    assert!(parsed.diagnostics.is_empty());
    let roots = roots(&parsed.tree);
    assert_eq!(roots.len(), 2);
    assert!(roots
        .iter()
        .all(|r| parsed.tree.kind(*r) == Some(NodeKind::EnumValue)));
}

#[test]
fn test_service_fragment() {
    let buffer = tokenize("rpc A(B) returns (C);");
    let parsed = parse_with(&buffer, ParseOptions::default(), Fragment::ServiceBody);
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.tree.kind(roots(&parsed.tree)[0]), Some(NodeKind::Rpc));
}

#[test]
fn test_comment_tokens_are_skipped() {
    let source = "// leading\nmessage A { /* inside */ int32 x = 1; // trailing\n}";
    let buffer = tokenize_with(source, LexOptions { keep_comments: true });
    assert!(buffer.tokens().iter().any(|t| t.kind.is_comment()));

    let parsed = parse(&buffer);
    assert!(parsed.diagnostics.is_empty());
    assert!(parsed
        .tree
        .leaf_tokens()
        .all(|t| !buffer.kind(t).is_comment()));
    assert_eq!(parsed.tree.roots().count(), 1);
}

#[test]
fn test_empty_statements() {
    let (_, parsed) = parse_clean(";\nmessage A { ; int32 x = 1; ; }");
    assert_eq!(parsed.tree.roots().count(), 2);
}

#[test]
fn test_every_token_becomes_one_leaf() {
    let (buffer, parsed) = parse_clean(
        "syntax = \"proto3\";\nmessage A {\n  map<string, B> m = 1 [(x).y = { z: [1, 2] }];\n  reserved 1 to 3;\n}",
    );
    let leaves: Vec<_> = parsed.tree.leaf_tokens().collect();
    let expected: Vec<_> = (0..buffer.len() as u32)
        .filter(|i| buffer.kind(*i) != TokenKind::Eof)
        .collect();
    assert_eq!(leaves, expected);
}
