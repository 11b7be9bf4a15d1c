use super::*;
use grit_diagnostic::ErrorCode;
use grit_ir::{KindTable, Token};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const ROOT: SyntaxKind = SyntaxKind(2);
const WORD: SyntaxKind = SyntaxKind(3);
const SPACE: SyntaxKind = SyntaxKind(4);
const PAIR: SyntaxKind = SyntaxKind(5);
const LIST: SyntaxKind = SyntaxKind(6);

fn language() -> KindTable {
    KindTable::new()
        .kind(ROOT, "ROOT")
        .kind(WORD, "WORD")
        .kind(SPACE, "SPACE")
        .kind(PAIR, "PAIR")
        .kind(LIST, "LIST")
        .trivia(SPACE)
}

/// `"a b c"`: WORD SPACE WORD SPACE WORD.
fn tokens() -> TokenList {
    TokenList::new(
        "a b c",
        vec![
            Token::new(WORD, Span::new(0, 1)),
            Token::new(SPACE, Span::new(1, 2)),
            Token::new(WORD, Span::new(2, 3)),
            Token::new(SPACE, Span::new(3, 4)),
            Token::new(WORD, Span::new(4, 5)),
        ],
    )
}

fn dump(builder: &Builder) -> String {
    builder.build(&tokens(), &language(), ROOT).dump(&tokens(), &language())
}

#[test]
fn test_done_and_trivia_trimming() {
    let mut b = Builder::new();
    let pair = b.open(0);
    b.done(pair, PAIR, 4);
    assert_eq!(
        dump(&b),
        "ROOT@0..5\n  \
           PAIR@0..3\n    \
             WORD@0..1 \"a\"\n    \
             SPACE@1..2 \" \"\n    \
             WORD@2..3 \"b\"\n  \
           SPACE@3..4 \" \"\n  \
           WORD@4..5 \"c\"\n"
    );
}

#[test]
fn test_drop_keeps_children() {
    let mut b = Builder::new();
    let outer = b.open(0);
    let inner = b.open(2);
    b.done(inner, PAIR, 3);
    b.drop_marker(outer);
    assert!(!b.is_open(outer));
    assert_eq!(b.done_nodes(), vec![(PAIR, 2, 3)]);
    assert_eq!(b.latest_done(), Some(inner));
}

#[test]
fn test_rollback_erases_later_markers() {
    let mut b = Builder::new();
    let kept = b.open(0);
    b.done(kept, WORD, 1);
    let target = b.open(2);
    let inner = b.open(2);
    b.done(inner, PAIR, 3);
    let snapshot_before = vec![(WORD, 0, 1)];

    assert_eq!(b.rollback(target), Some(2));
    assert_eq!(b.done_nodes(), snapshot_before);
    assert!(!b.is_done(inner));
    assert_eq!(b.latest_done(), Some(kept));
    assert_eq!(b.rollback(target), None);
}

#[test]
fn test_rollback_restores_widened_node() {
    let mut b = Builder::new();
    let word = b.open(0);
    b.done(word, WORD, 1);
    let target = b.open(2);
    let wider = b.precede(word);
    b.done(wider, WORD, 3);
    b.drop_marker(word);
    assert_eq!(b.done_nodes(), vec![(WORD, 0, 3)]);

    assert_eq!(b.rollback(target), Some(2));
    assert!(b.is_done(word));
    assert!(!b.is_done(wider));
    assert_eq!(b.done_nodes(), vec![(WORD, 0, 1)]);
    assert_eq!(b.latest_extensible_done(), Some(word));
}

#[test]
fn test_precede_wraps_committed_marker() {
    let mut b = Builder::new();
    let first = b.open(0);
    b.done(first, WORD, 1);
    let wrapper = b.precede(first);
    b.done(wrapper, PAIR, 3);
    assert_eq!(b.start(wrapper), 0);
    assert_eq!(b.done_nodes(), vec![(PAIR, 0, 3), (WORD, 0, 1)]);
    let tree = b.build(&tokens(), &language(), ROOT);
    let pair = tree.child_nodes().next();
    assert_eq!(pair.map(SyntaxNode::kind), Some(PAIR));
    assert_eq!(pair.map(SyntaxNode::depth), Some(2));
}

#[test]
fn test_latest_extensible_done() {
    let mut b = Builder::new();
    let word = b.open(0);
    b.done(word, WORD, 1);
    assert_eq!(b.latest_extensible_done(), Some(word));

    let open = b.open(2);
    assert_eq!(b.latest_extensible_done(), None);
    assert_eq!(b.latest_done(), Some(word));

    b.drop_marker(open);
    assert_eq!(b.latest_extensible_done(), Some(word));
}

#[test]
fn test_error_nodes_keep_payload() {
    let mut b = Builder::new();
    let err = b.open(2);
    b.done_error(
        err,
        SyntaxError {
            code: ErrorCode::E1002,
            message: "unexpected 'b'".to_owned(),
            label: "found 'b'".to_owned(),
        },
        3,
    );
    assert_eq!(b.kind(err), Some(SyntaxKind::ERROR));
    assert_eq!(b.error(err).map(|e| e.code), Some(ErrorCode::E1002));

    let tree = b.build(&tokens(), &language(), ROOT);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "unexpected 'b'");
    assert_eq!(diagnostics[0].primary_span(), Some(Span::new(2, 3)));
}

#[test]
fn test_root_marker_merges_into_implicit_root() {
    let mut b = Builder::new();
    let root = b.open(0);
    let list = b.open(0);
    b.done(list, LIST, 3);
    b.done(root, ROOT, 3);
    let tree = b.build(&tokens(), &language(), ROOT);
    assert_eq!(tree.span(), Span::new(0, 5));
    assert_eq!(tree.child_nodes().map(SyntaxNode::kind).collect::<Vec<_>>(), vec![LIST]);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn test_open_markers_are_ignored() {
    let mut b = Builder::new();
    let _never_closed = b.open(0);
    let word = b.open(4);
    b.done(word, WORD, 5);
    let tree = b.build(&tokens(), &language(), ROOT);
    assert_eq!(tree.children().len(), 5);
    assert_eq!(tree.child_nodes().count(), 1);
}

/// One builder step taken after the rollback point.
#[derive(Clone, Debug)]
enum Step {
    /// Open a marker `width` tokens wide, committing it if asked.
    Open { width: usize, commit: bool },
    /// Widen an earlier committed node to the current position.
    Widen(usize),
    /// Drop an earlier committed node.
    Drop(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..3, any::<bool>()).prop_map(|(width, commit)| Step::Open { width, commit }),
        (0usize..5).prop_map(Step::Widen),
        (0usize..5).prop_map(Step::Drop),
    ]
}

proptest! {
    #[test]
    fn prop_rollback_restores_committed_nodes(
        committed in 0usize..5,
        later in proptest::collection::vec(step(), 0..12),
    ) {
        let mut b = Builder::new();
        let mut pos = 0;
        let mut earlier = Vec::new();
        for _ in 0..committed {
            let m = b.open(pos);
            pos += 1;
            b.done(m, WORD, pos);
            earlier.push(m);
        }
        let snapshot = b.done_nodes();
        let cut_at = pos;
        let cut = b.open(pos);
        for step in later {
            match step {
                Step::Open { width, commit } => {
                    let m = b.open(pos);
                    pos += width;
                    if commit {
                        b.done(m, PAIR, pos);
                    }
                }
                Step::Widen(index) => {
                    if let Some(&m) = earlier.get(index) {
                        let wider = b.precede(m);
                        b.done(wider, WORD, pos);
                        b.drop_marker(m);
                    }
                }
                Step::Drop(index) => {
                    if let Some(&m) = earlier.get(index) {
                        b.drop_marker(m);
                    }
                }
            }
        }

        prop_assert_eq!(b.rollback(cut), Some(cut_at));
        prop_assert_eq!(b.done_nodes(), snapshot);
        prop_assert!(!b.is_open(cut));
        for &m in &earlier {
            prop_assert!(b.is_done(m));
        }
    }
}
