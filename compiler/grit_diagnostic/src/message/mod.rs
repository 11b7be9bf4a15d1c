//! User-facing message texts.
//!
//! The runtime never formats a user-visible string itself. It builds a
//! [`Message`] and hands it to a [`MessageRenderer`]; [`EnglishMessages`] is
//! the renderer used unless a session installs another one.

/// Every text the runtime can show to a user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message<'a> {
    /// Header of an expected-alternatives error. `list` is already joined.
    Expected { list: &'a str },
    /// The offending token when nothing in particular was expected.
    Unexpected { found: &'a str },
    /// Like `Unexpected`, at end of input or where no token text is available.
    UnexpectedInput,
    /// Label text naming the token actually found.
    Found { found: &'a str },
    /// Label text when the input ended early.
    FoundEndOfInput,
    /// Joiner between the last two alternatives.
    Or,
    /// Tail of a truncated alternatives list.
    AndMore { count: usize },
    RecursionLimit { limit: u32, rule: &'a str },
    EmptyElement { rule: &'a str, offset: u32 },
    Unbalanced { expected: u32, found: u32 },
    NoProgress { rule: &'a str, offset: u32 },
    PredicateSign,
    MissingDoneMarker { kind: &'a str, offset: u32 },
}

/// Turns a [`Message`] into display text.
pub trait MessageRenderer {
    fn render(&self, message: &Message<'_>) -> String;
}

/// Default English texts.
#[derive(Copy, Clone, Debug, Default)]
pub struct EnglishMessages;

impl MessageRenderer for EnglishMessages {
    fn render(&self, message: &Message<'_>) -> String {
        match *message {
            Message::Expected { list } => format!("expected: {list}"),
            Message::Unexpected { found } => format!("unexpected '{found}'"),
            Message::UnexpectedInput => "unexpected input".to_owned(),
            Message::Found { found } => format!("found '{found}'"),
            Message::FoundEndOfInput => "found end of input".to_owned(),
            Message::Or => "or".to_owned(),
            Message::AndMore { count } => format!("\u{2026} and {count} more"),
            Message::RecursionLimit { limit, rule } => {
                format!("maximum recursion level ({limit}) reached in '{rule}'")
            }
            Message::EmptyElement { rule, offset } => {
                format!("empty element parsed in '{rule}' at offset {offset}")
            }
            Message::Unbalanced { expected, found } => {
                format!("unbalanced section: expected level {expected}, got {found}")
            }
            Message::NoProgress { rule, offset } => {
                format!("no progress made while recovering in '{rule}' at offset {offset}")
            }
            Message::PredicateSign => {
                "negative predicate context cannot open a positive-only predicate".to_owned()
            }
            Message::MissingDoneMarker { kind, offset } => {
                format!("no done marker for '{kind}' at offset {offset}")
            }
        }
    }
}

impl<R: MessageRenderer + ?Sized> MessageRenderer for &R {
    fn render(&self, message: &Message<'_>) -> String {
        (**self).render(message)
    }
}

#[cfg(test)]
mod tests;
