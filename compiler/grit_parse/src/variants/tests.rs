use super::*;
use grit_diagnostic::EnglishMessages;
use grit_ir::KindTable;
use pretty_assertions::assert_eq;

const IDENT: SyntaxKind = SyntaxKind(2);
const NUMBER: SyntaxKind = SyntaxKind(3);
const L_PAREN: SyntaxKind = SyntaxKind(4);

fn language() -> KindTable {
    KindTable::new()
        .kind(IDENT, "IDENT")
        .kind(NUMBER, "NUMBER")
        .kind(L_PAREN, "(")
}

fn at(position: usize, item: VariantItem) -> Variant {
    Variant { position, item }
}

fn render(variants: &[Variant], position: usize, max: usize) -> String {
    render_list(variants, position, &language(), &EnglishMessages, max)
}

#[test]
fn test_single_and_or_lists() {
    let variants = [
        at(1, VariantItem::Token(NUMBER)),
        at(1, VariantItem::Token(L_PAREN)),
        at(0, VariantItem::Token(NUMBER)),
        at(1, VariantItem::Token(IDENT)),
    ];
    assert_eq!(render(&variants, 0, 50), "NUMBER");
    assert_eq!(render(&variants, 1, 50), "'(', IDENT or NUMBER");
    assert_eq!(render(&variants[..1], 1, 50), "NUMBER");
    assert_eq!(render(&variants[..2], 1, 50), "'(' or NUMBER");
    assert_eq!(render(&variants, 5, 50), "");
}

#[test]
fn test_duplicates_and_empty_texts_dropped() {
    let variants = [
        at(0, VariantItem::Token(IDENT)),
        at(0, VariantItem::Text("IDENT")),
        at(0, VariantItem::Text("")),
        at(0, VariantItem::Name("<expression>")),
    ];
    assert_eq!(render(&variants, 0, 50), "<expression> or IDENT");
}

#[test]
fn test_quoting() {
    let variants = [
        at(0, VariantItem::Text("+")),
        at(0, VariantItem::Text("_hidden")),
        at(0, VariantItem::Text("$var")),
        at(0, VariantItem::Text("let")),
    ];
    assert_eq!(render(&variants, 0, 50), "$var, '+', _hidden or let");
}

#[test]
fn test_long_lists_are_summarized() {
    let variants = [
        at(0, VariantItem::Text("a")),
        at(0, VariantItem::Text("b")),
        at(0, VariantItem::Text("c")),
        at(0, VariantItem::Text("d")),
    ];
    assert_eq!(render(&variants, 0, 2), "a, b, \u{2026} and 2 more");
    assert_eq!(render(&variants, 0, 4), "a, b, c or d");
}

#[test]
fn test_eviction_drops_oldest_quarter() {
    let mut tracker = VariantTracker::new(8);
    for position in 0..8 {
        tracker.push(true, at(position, VariantItem::Token(IDENT)));
    }
    assert_eq!(tracker.expected_len(), 8);
    tracker.push(true, at(8, VariantItem::Token(IDENT)));
    assert_eq!(tracker.expected().len(), 7);
    assert_eq!(tracker.expected_len(), 9);
    assert_eq!(tracker.expected()[0].position, 2);
    assert_eq!(tracker.expected()[6].position, 8);
}

#[test]
fn test_truncate_after_eviction_uses_pushed_count() {
    let mut tracker = VariantTracker::new(8);
    for position in 0..6 {
        tracker.push(true, at(position, VariantItem::Token(IDENT)));
    }
    let baseline = tracker.expected_len();
    for _ in 0..3 {
        tracker.push(true, at(6, VariantItem::Token(NUMBER)));
    }
    tracker.truncate_expected(baseline);
    let positions: Vec<usize> = tracker.expected().iter().map(|v| v.position).collect();
    assert_eq!(positions, vec![2, 3, 4, 5]);
    assert_eq!(tracker.expected_len(), baseline);
}

#[test]
fn test_lists_are_independent() {
    let mut tracker = VariantTracker::new(16);
    tracker.push(true, at(0, VariantItem::Token(IDENT)));
    tracker.push(false, at(0, VariantItem::Token(NUMBER)));
    tracker.push(true, at(1, VariantItem::Token(L_PAREN)));
    assert_eq!(tracker.unexpected().len(), 1);
    tracker.truncate_expected(1);
    assert_eq!(tracker.expected(), &[at(0, VariantItem::Token(IDENT))]);
    tracker.clear();
    assert_eq!(tracker.expected_len(), 0);
    assert!(tracker.unexpected().is_empty());
}
