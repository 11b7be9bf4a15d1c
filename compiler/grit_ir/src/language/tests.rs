use super::*;

const IDENT: SyntaxKind = SyntaxKind(2);
const WS: SyntaxKind = SyntaxKind(3);
const L_PAREN: SyntaxKind = SyntaxKind(4);
const R_PAREN: SyntaxKind = SyntaxKind(5);
const EXPR: SyntaxKind = SyntaxKind(6);
const PLUS_EXPR: SyntaxKind = SyntaxKind(7);
const CALL: SyntaxKind = SyntaxKind(8);

fn table() -> KindTable {
    KindTable::new()
        .kind(IDENT, "IDENT")
        .kind(L_PAREN, "(")
        .trivia(WS)
        .extends([EXPR, PLUS_EXPR])
        .delimiters(L_PAREN, R_PAREN)
}

#[test]
fn test_kind_names() {
    let t = table();
    assert_eq!(t.kind_name(IDENT), "IDENT");
    assert_eq!(t.kind_name(L_PAREN), "(");
    assert_eq!(t.kind_name(SyntaxKind::ERROR), "<error>");
    assert_eq!(t.kind_name(CALL), "#8");
}

#[test]
fn test_trivia() {
    let t = table();
    assert!(t.is_trivia(WS));
    assert!(!t.is_trivia(IDENT));
}

#[test]
fn test_extends_groups_are_symmetric() {
    let t = table();
    assert!(t.is_subkind(PLUS_EXPR, EXPR));
    assert!(t.is_subkind(EXPR, PLUS_EXPR));
    assert!(t.is_subkind(CALL, CALL));
    assert!(!t.is_subkind(CALL, EXPR));
}

#[test]
fn test_delimiters_and_case() {
    let t = table();
    assert_eq!(Language::delimiters(&t), &[DelimiterPair::new(L_PAREN, R_PAREN)]);
    assert!(t.is_case_sensitive());
    assert!(!t.case_insensitive().is_case_sensitive());
}
