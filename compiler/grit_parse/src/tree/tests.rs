use super::*;
use crate::builder::Builder;
use grit_ir::KindTable;
use pretty_assertions::assert_eq;

const ROOT: SyntaxKind = SyntaxKind(2);
const IDENT: SyntaxKind = SyntaxKind(3);
const WS: SyntaxKind = SyntaxKind(4);
const CALL: SyntaxKind = SyntaxKind(5);
const ARG: SyntaxKind = SyntaxKind(6);

fn language() -> KindTable {
    KindTable::new()
        .kind(ROOT, "ROOT")
        .kind(IDENT, "IDENT")
        .kind(WS, "WS")
        .kind(CALL, "CALL")
        .kind(ARG, "ARG")
        .trivia(WS)
}

/// `"f x y"`.
fn tokens() -> TokenList {
    TokenList::new(
        "f x y",
        vec![
            Token::new(IDENT, Span::new(0, 1)),
            Token::new(WS, Span::new(1, 2)),
            Token::new(IDENT, Span::new(2, 3)),
            Token::new(WS, Span::new(3, 4)),
            Token::new(IDENT, Span::new(4, 5)),
        ],
    )
}

fn error(message: &str) -> SyntaxError {
    SyntaxError {
        code: ErrorCode::E1001,
        message: message.to_owned(),
        label: "found 'y'".to_owned(),
    }
}

/// `CALL(f ARG(x) <error>(y))`.
fn call_tree() -> SyntaxNode {
    let mut b = Builder::new();
    let call = b.open(0);
    let arg = b.open(2);
    b.done(arg, ARG, 3);
    let err = b.open(4);
    b.done_error(err, error("expected: ')'"), 5);
    b.done(call, CALL, 5);
    b.build(&tokens(), &language(), ROOT)
}

#[test]
fn test_depth_counts_nodes_only() {
    let tree = call_tree();
    assert_eq!(tree.depth(), 3);
    let leaf = SyntaxNode::new(IDENT, Span::point(0), None, Vec::new());
    assert_eq!(leaf.depth(), 1);
}

#[test]
fn test_descendants_pre_order() {
    let tree = call_tree();
    let kinds: Vec<_> = tree.descendants().map(SyntaxNode::kind).collect();
    assert_eq!(kinds, vec![ROOT, CALL, ARG, SyntaxKind::ERROR]);
}

#[test]
fn test_children_tile_spans() {
    let tree = call_tree();
    for node in tree.descendants() {
        let children = node.children();
        for pair in children.windows(2) {
            assert_eq!(pair[0].span().end, pair[1].span().start);
        }
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            assert!(first.span().start >= node.span().start);
            assert!(last.span().end <= node.span().end);
        }
    }
}

#[test]
fn test_dump_format() {
    let tree = call_tree();
    assert_eq!(
        tree.dump(&tokens(), &language()),
        "ROOT@0..5\n  \
           CALL@0..5\n    \
             IDENT@0..1 \"f\"\n    \
             WS@1..2 \" \"\n    \
             ARG@2..3\n      \
               IDENT@2..3 \"x\"\n    \
             WS@3..4 \" \"\n    \
             <error>@4..5 \"expected: ')'\"\n      \
               IDENT@4..5 \"y\"\n"
    );
}

#[test]
fn test_diagnostics_from_error_nodes() {
    let tree = call_tree();
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::E1001);
    assert_eq!(diagnostic.message, "expected: ')'");
    assert_eq!(diagnostic.primary_span(), Some(Span::new(4, 5)));
    assert_eq!(diagnostic.labels[0].message, "found 'y'");
}

#[test]
fn test_element_accessors() {
    let tree = call_tree();
    let first = &tree.children()[0];
    assert_eq!(first.kind(), CALL);
    assert!(first.as_node().is_some());
    let token = SyntaxElement::Token(Token::new(IDENT, Span::new(0, 1)));
    assert_eq!(token.as_node(), None);
    assert_eq!(token.span(), Span::new(0, 1));
}
