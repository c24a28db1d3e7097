//! The parser must finish on any token sequence and always hand back a
//! well-formed tree that covers every token.

use protean_parser::{
    parse_source, parse_with, tokenize, Fragment, NodeKind, ParseOptions, ParseTree,
    TokenizedBuffer, TokenKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const VOCABULARY: &[&str] = &[
    "message", "enum", "service", "rpc", "oneof", "extend", "option", "reserved", "extensions",
    "import", "package", "syntax", "edition", "map", "returns", "stream", "repeated", "optional",
    "to", "max", "int32", "string", "Foo", "bar.baz", ".a.b", "=", ";", ",", ":", ".", "-", "{",
    "}", "(", ")", "[", "]", "<", ">", "1", "-2", "3.5", "inf", "\"s\"", "'t'", "/", "$",
    "// note\n", "/* block */", "\n",
];

fn soup(rng: &mut StdRng, len: usize) -> String {
    let mut source = String::new();
    for _ in 0..len {
        let word = VOCABULARY.choose(rng).copied().unwrap_or(";");
        source.push_str(word);
        source.push(' ');
    }
    source
}

fn assert_well_formed(buffer: &TokenizedBuffer, tree: &ParseTree) {
    assert_eq!(tree.verify(), Ok(()));

    let leaves: Vec<_> = tree.leaf_tokens().collect();
    let expected: Vec<_> = (0..buffer.len() as u32)
        .filter(|i| {
            let kind = buffer.kind(*i);
            kind != TokenKind::Eof && !kind.is_comment()
        })
        .collect();
    assert_eq!(leaves, expected);

    for id in tree.postorder() {
        let kind = match tree.kind(id) {
            Some(kind) if kind.opens_scope() => kind,
            _ => continue,
        };
        let closes = tree
            .children(id)
            .filter(|c| tree.kind(*c) == Some(NodeKind::ScopeClose))
            .count();
        assert_eq!(closes, 1, "{:?} at node {} is not closed once", kind, id.index());
    }
}

#[test]
fn test_random_token_soups_terminate() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..300 {
        let len = rng.gen_range(0..120);
        let source = soup(&mut rng, len);
        let (buffer, parsed) = parse_source(&source);
        assert_well_formed(&buffer, &parsed.tree);
    }
}

#[test]
fn test_random_soups_in_every_fragment() {
    let fragments = [
        Fragment::File,
        Fragment::MessageBody,
        Fragment::EnumBody,
        Fragment::ServiceBody,
    ];
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let len = rng.gen_range(1..80);
        let source = soup(&mut rng, len);
        let buffer = tokenize(&source);
        let sync_limit = rng.gen_range(0..4);
        for fragment in fragments {
            let parsed = parse_with(&buffer, ParseOptions { sync_limit }, fragment);
            assert_well_formed(&buffer, &parsed.tree);
        }
    }
}

#[test]
fn test_mutated_valid_file_terminates() {
    let source = r#"
syntax = "proto3";
package a.b;
import public "x.proto";
option (ext).path = { list: [1, 2] nested < k: v > };
message M {
    map<string, M> children = 1 [deprecated = true, (x) = -inf];
    oneof o { int32 a = 2; }
    reserved 3 to max, "c";
    extensions 100 to 200;
    enum E { Z = 0; N = -1 [(e) = "v"]; }
}
extend .a.b.M { optional int32 extra = 101; }
service S { rpc R(stream M) returns (M) { option deadline = 1.5; } }
"#;
    let words: Vec<_> = source.split_whitespace().collect();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let mut mutated = words.clone();
        for _ in 0..rng.gen_range(1..6) {
            if mutated.is_empty() {
                break;
            }
            let at = rng.gen_range(0..mutated.len());
            match rng.gen_range(0..3) {
                0 => {
                    mutated.remove(at);
                }
                1 => mutated.insert(at, VOCABULARY.choose(&mut rng).copied().unwrap_or("}")),
                _ => mutated.truncate(at.max(1)),
            }
        }
        let (buffer, parsed) = parse_source(&mutated.join(" "));
        assert_well_formed(&buffer, &parsed.tree);
    }
}

#[test]
fn test_deeply_nested_messages() {
    let source = "message A {".repeat(5000);
    let (buffer, parsed) = parse_source(&source);
    assert_eq!(parsed.diagnostics.len(), 5000);
    assert!(parsed.diagnostics.iter().all(|d| d.is_premature_eof()));
    assert_eq!(parsed.tree.roots().count(), 1);
    assert_well_formed(&buffer, &parsed.tree);
}

#[test]
fn test_deeply_nested_text_messages() {
    let source = format!("option x = {};", "{a ".repeat(3000));
    let (buffer, parsed) = parse_source(&source);
    assert!(parsed.has_errors());
    assert_well_formed(&buffer, &parsed.tree);
}

#[test]
fn test_deeply_nested_brackets_in_recovery() {
    let source = format!("message A {{ {} }}\nmessage B {{}}", "[[[(".repeat(2000));
    let (buffer, parsed) = parse_source(&source);
    assert!(parsed.has_errors());
    assert_well_formed(&buffer, &parsed.tree);
}
