use super::*;
use pretty_assertions::assert_eq;

const A: SyntaxKind = SyntaxKind(3);
const B: SyntaxKind = SyntaxKind(70);
const C: SyntaxKind = SyntaxKind(400);

#[test]
fn test_kind_set_empty() {
    let set = KindSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert!(!set.contains(A));
}

#[test]
fn test_kind_set_spans_words() {
    let set = KindSet::new().with(A).with(B).with(C);
    assert_eq!(set.len(), 3);
    assert!(set.contains(A));
    assert!(set.contains(B));
    assert!(set.contains(C));
    assert!(!set.contains(SyntaxKind(4)));
    assert!(!set.contains(SyntaxKind(1000)));
}

#[test]
fn test_kind_set_iter_is_ascending() {
    let set: KindSet = [C, A, B].into_iter().collect();
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![A, B, C]);
}

#[test]
fn test_kind_set_union() {
    let left = KindSet::new().with(A);
    let right = KindSet::new().with(C);
    let union = left.union(&right);
    assert!(union.contains(A));
    assert!(union.contains(C));
    assert_eq!(union, right.union(&left));
}

#[test]
fn test_reserved_kinds_debug() {
    assert_eq!(format!("{:?}", SyntaxKind::ERROR), "ERROR");
    assert_eq!(format!("{:?}", SyntaxKind::DUMMY_BLOCK), "DUMMY_BLOCK");
    assert_eq!(format!("{A:?}"), "#3");
    assert!(SyntaxKind::ERROR.is_error());
    assert!(!SyntaxKind::FIRST_USER.is_error());
}
