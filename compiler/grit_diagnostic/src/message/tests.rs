use super::*;
use pretty_assertions::assert_eq;

fn en(message: Message<'_>) -> String {
    EnglishMessages.render(&message)
}

#[test]
fn test_syntax_texts() {
    assert_eq!(en(Message::Expected { list: "'+' or IDENT" }), "expected: '+' or IDENT");
    assert_eq!(en(Message::Unexpected { found: "@@" }), "unexpected '@@'");
    assert_eq!(en(Message::UnexpectedInput), "unexpected input");
    assert_eq!(en(Message::Found { found: ")" }), "found ')'");
    assert_eq!(en(Message::FoundEndOfInput), "found end of input");
    assert_eq!(en(Message::Or), "or");
    assert_eq!(en(Message::AndMore { count: 7 }), "\u{2026} and 7 more");
}

#[test]
fn test_engine_texts() {
    assert_eq!(
        en(Message::RecursionLimit { limit: 3, rule: "expr" }),
        "maximum recursion level (3) reached in 'expr'"
    );
    assert_eq!(
        en(Message::EmptyElement { rule: "list", offset: 4 }),
        "empty element parsed in 'list' at offset 4"
    );
    assert_eq!(
        en(Message::Unbalanced { expected: 2, found: 5 }),
        "unbalanced section: expected level 2, got 5"
    );
    assert_eq!(
        en(Message::NoProgress { rule: "stmt", offset: 0 }),
        "no progress made while recovering in 'stmt' at offset 0"
    );
    assert_eq!(
        en(Message::MissingDoneMarker { kind: "CALL", offset: 9 }),
        "no done marker for 'CALL' at offset 9"
    );
    assert!(en(Message::PredicateSign).starts_with("negative predicate"));
}

struct Shouting;

impl MessageRenderer for Shouting {
    fn render(&self, message: &Message<'_>) -> String {
        EnglishMessages.render(message).to_uppercase()
    }
}

#[test]
fn test_custom_renderer_through_reference() {
    let renderer: &dyn MessageRenderer = &Shouting;
    assert_eq!((&renderer).render(&Message::Or), "OR");
    assert_eq!(renderer.render(&Message::UnexpectedInput), "UNEXPECTED INPUT");
}
