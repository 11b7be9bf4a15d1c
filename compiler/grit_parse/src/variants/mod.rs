//! Expected/unexpected variant tracking.
//!
//! Token tests record what they looked for, keyed by the raw index they
//! looked at. When an error has to be reported, the variants recorded at the
//! error position become the "expected: ..." list. Variants recorded inside
//! a `NOT` predicate go to the unexpected list instead.

use std::borrow::Cow;

use grit_diagnostic::{Message, MessageRenderer};
use grit_ir::{Language, SyntaxKind};
use rustc_hash::FxHashSet;

/// What a token test was looking for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariantItem {
    /// A token kind, rendered through [`Language::kind_name`].
    Token(SyntaxKind),
    /// A literal matched with `consume_text` or a phrase from `add_variant`.
    Text(&'static str),
    /// A frame name standing in for everything the frame looked for.
    Name(&'static str),
}

impl VariantItem {
    pub(crate) fn text<'l>(&self, language: &'l dyn Language) -> Cow<'l, str> {
        match *self {
            VariantItem::Token(kind) => language.kind_name(kind),
            VariantItem::Text(text) | VariantItem::Name(text) => Cow::Borrowed(text),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Variant {
    pub position: usize,
    pub item: VariantItem,
}

/// Bounded lists of expected and unexpected variants.
///
/// When a list reaches its capacity the oldest quarter is evicted; old
/// variants sit at positions the parser has long moved past.
///
/// Lengths handed out by [`expected_len`](Self::expected_len) count evicted
/// entries too, so a frame's baseline still marks the right cut after an
/// eviction.
#[derive(Clone, Debug)]
pub(crate) struct VariantTracker {
    expected: Vec<Variant>,
    unexpected: Vec<Variant>,
    /// Expected variants drained since the last `clear`.
    evicted: usize,
    capacity: usize,
}

impl VariantTracker {
    pub fn new(capacity: usize) -> Self {
        VariantTracker {
            expected: Vec::new(),
            unexpected: Vec::new(),
            evicted: 0,
            capacity: capacity.max(4),
        }
    }

    pub fn push(&mut self, expected: bool, variant: Variant) {
        let quarter = self.capacity / 4;
        let list = if expected {
            &mut self.expected
        } else {
            &mut self.unexpected
        };
        if list.len() >= self.capacity {
            list.drain(..quarter);
            if expected {
                self.evicted += quarter;
            }
        }
        list.push(variant);
    }

    /// Expected variants pushed since the last `clear`, evicted ones included.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.evicted + self.expected.len()
    }

    /// Cut the expected list back to a length taken from `expected_len`.
    pub fn truncate_expected(&mut self, len: usize) {
        self.expected.truncate(len.saturating_sub(self.evicted));
    }

    pub fn clear(&mut self) {
        self.expected.clear();
        self.unexpected.clear();
        self.evicted = 0;
    }

    #[inline]
    pub fn expected(&self) -> &[Variant] {
        &self.expected
    }

    #[cfg(test)]
    pub fn unexpected(&self) -> &[Variant] {
        &self.unexpected
    }
}

/// Render the variants recorded at `position` as a display list:
/// `'(', IDENT or NUMBER`.
///
/// Duplicates and empty texts are dropped and the rest sorted. Texts that
/// start with `<` or an identifier character stay bare, everything else is
/// quoted. Past `max_display` items the tail is summarized.
pub(crate) fn render_list(
    variants: &[Variant],
    position: usize,
    language: &dyn Language,
    renderer: &dyn MessageRenderer,
    max_display: usize,
) -> String {
    let mut seen = FxHashSet::default();
    let mut texts: Vec<Cow<'_, str>> = Vec::new();
    for variant in variants.iter().filter(|v| v.position == position) {
        let text = variant.item.text(language);
        if !text.is_empty() && seen.insert(text.clone()) {
            texts.push(text);
        }
    }
    texts.sort_unstable();

    let shown: Vec<String> = texts.iter().take(max_display).map(|t| quote(t)).collect();
    match shown.len() {
        0 => String::new(),
        1 if texts.len() == 1 => shown.concat(),
        n if texts.len() > n => {
            let more = renderer.render(&Message::AndMore {
                count: texts.len() - n,
            });
            format!("{}, {more}", shown.join(", "))
        }
        n => format!(
            "{} {} {}",
            shown[..n - 1].join(", "),
            renderer.render(&Message::Or),
            shown[n - 1]
        ),
    }
}

fn quote(text: &str) -> String {
    match text.chars().next() {
        Some(c) if c == '<' || c == '_' || c == '$' || c.is_alphabetic() => text.to_owned(),
        _ => format!("'{text}'"),
    }
}

#[cfg(test)]
mod tests;
