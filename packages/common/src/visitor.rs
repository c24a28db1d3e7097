use protean_parser::{NodeCategory, NodeId, NodeKind, ParseTree, TokenizedBuffer};

/// Hooks called by [`walk_tree`] for the nodes downstream stages care about.
///
/// Nodes arrive in source order. A scope-opening declaration (message, enum,
/// service, oneof) is always followed, after its whole body, by exactly one
/// `visit_scope_close`, so a visitor can keep its own scope stack in step.
pub trait TreeVisitor {
    fn visit_declaration(&mut self, _tree: &ParseTree, _id: NodeId, _kind: NodeKind) {}

    fn visit_reference(&mut self, _tree: &ParseTree, _id: NodeId, _kind: NodeKind) {}

    fn visit_scope_close(&mut self, _tree: &ParseTree, _id: NodeId) {}
}

/// Preorder walk over every root, dispatching on each node's category.
pub fn walk_tree<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &ParseTree) {
    for (id, _depth) in tree.preorder() {
        let Some(kind) = tree.kind(id) else {
            continue;
        };
        if kind == NodeKind::ScopeClose {
            visitor.visit_scope_close(tree, id);
            continue;
        }
        match kind.category() {
            NodeCategory::Declaration => visitor.visit_declaration(tree, id, kind),
            NodeCategory::Reference => visitor.visit_reference(tree, id, kind),
            NodeCategory::Structural => {}
        }
    }
}

/// Text of the `Name` child of a declaration.
pub fn declared_name<'a>(
    tree: &ParseTree,
    buffer: &'a TokenizedBuffer,
    id: NodeId,
) -> Option<&'a str> {
    let name = tree.find_child(id, NodeKind::Name)?;
    let node = tree.node(name);
    if node.is_synthetic() {
        return None;
    }
    Some(buffer.text(node.token))
}

/// Source text of a subtree with whitespace and comments dropped, e.g. the
/// dotted name under a type reference.
pub fn subtree_text(tree: &ParseTree, buffer: &TokenizedBuffer, id: NodeId) -> String {
    tree.subtree(id)
        .iter()
        .filter(|node| node.is_leaf() && !node.is_synthetic())
        .map(|node| buffer.text(node.token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protean_parser::parse_source;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        scopes: Vec<NodeKind>,
        max_depth: usize,
    }

    impl TreeVisitor for Recorder {
        fn visit_declaration(&mut self, _tree: &ParseTree, _id: NodeId, kind: NodeKind) {
            self.events.push(format!("decl {:?}", kind));
            if kind.opens_scope() {
                self.scopes.push(kind);
                self.max_depth = self.max_depth.max(self.scopes.len());
            }
        }

        fn visit_reference(&mut self, _tree: &ParseTree, _id: NodeId, kind: NodeKind) {
            self.events.push(format!("ref {:?}", kind));
        }

        fn visit_scope_close(&mut self, _tree: &ParseTree, _id: NodeId) {
            let closed = self.scopes.pop();
            self.events.push(format!("close {:?}", closed));
        }
    }

    #[test]
    fn test_walk_visits_in_source_order() {
        let (_, parsed) =
            parse_source("message A {\n  message B { C c = 1; }\n  int32 x = 2;\n}");
        let mut recorder = Recorder::default();
        walk_tree(&mut recorder, &parsed.tree);

        assert_eq!(
            recorder.events,
            vec![
                "decl Message",
                "decl Message",
                "decl Field",
                "ref FieldType",
                "close Some(Message)",
                "decl Field",
                "ref FieldType",
                "close Some(Message)",
            ]
        );
        assert_eq!(recorder.max_depth, 2);
        assert!(recorder.scopes.is_empty());
    }

    #[test]
    fn test_scopes_stay_balanced_on_broken_input() {
        let (_, parsed) = parse_source("message A {\n  enum E {\n    X = ;\n  message B {");
        let mut recorder = Recorder::default();
        walk_tree(&mut recorder, &parsed.tree);
        assert!(recorder.scopes.is_empty());
    }

    #[test]
    fn test_names_and_reference_text() {
        let (buffer, parsed) = parse_source("message A { .pkg.Outer.Inner field = 1; }");
        let tree = &parsed.tree;
        let message = tree.roots().next().unwrap();
        assert_eq!(declared_name(tree, &buffer, message), Some("A"));

        let field = tree.find_child(message, NodeKind::Field).unwrap();
        assert_eq!(declared_name(tree, &buffer, field), Some("field"));
        let reference = tree.find_child(field, NodeKind::FieldType).unwrap();
        assert_eq!(subtree_text(tree, &buffer, reference), ".pkg.Outer.Inner");
    }

    #[test]
    fn test_missing_name_is_none() {
        let (buffer, parsed) = parse_source("message { }");
        let message = parsed.tree.roots().next().unwrap();
        assert_eq!(declared_name(&parsed.tree, &buffer, message), None);
    }
}
