use super::*;

const WORD: SyntaxKind = SyntaxKind(5);
const SPACE: SyntaxKind = SyntaxKind(6);

fn two_words() -> TokenList {
    TokenList::new(
        "ab cd",
        vec![
            Token::new(WORD, Span::new(0, 2)),
            Token::new(SPACE, Span::new(2, 3)),
            Token::new(WORD, Span::new(3, 5)),
        ],
    )
}

#[test]
fn test_token_access() {
    let list = two_words();
    assert_eq!(list.len(), 3);
    assert_eq!(list.kind(1), Some(SPACE));
    assert_eq!(list.text(2), "cd");
    assert_eq!(list.start(2), 3);
    assert_eq!(list.end(0), 2);
}

#[test]
fn test_end_of_input_has_offsets() {
    let list = two_words();
    assert_eq!(list.kind(3), None);
    assert_eq!(list.start(3), 5);
    assert_eq!(list.end(7), 5);
    assert_eq!(list.text(3), "");
    assert_eq!(list.span(3), Span::point(5));
}

#[test]
fn test_empty_list() {
    let list = TokenList::new("", Vec::new());
    assert!(list.is_empty());
    assert_eq!(list.start(0), 0);
}
