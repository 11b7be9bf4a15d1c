//! Language capabilities consumed by the parsing runtime.
//!
//! The runtime is grammar-agnostic; everything it needs to know about a
//! concrete language goes through [`Language`]:
//!
//! | Capability | Used by |
//! |------------|---------|
//! | `kind_name` | expected-token diagnostics, completion text |
//! | `is_trivia` | auto-skipping, node edge binding, collapse detection |
//! | `is_subkind` | `COLLAPSE` sections |
//! | `delimiters` | error recovery, tree balancing |
//! | `is_case_sensitive` | literal text matching |

use std::borrow::Cow;

use crate::{KindSet, SyntaxKind};

/// A matching open/close delimiter pair, e.g. `(` and `)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DelimiterPair {
    pub open: SyntaxKind,
    pub close: SyntaxKind,
}

impl DelimiterPair {
    pub const fn new(open: SyntaxKind, close: SyntaxKind) -> Self {
        DelimiterPair { open, close }
    }
}

/// What the runtime needs to know about the language being parsed.
pub trait Language {
    /// Display name of a kind as it appears in "expected" lists and
    /// completion suggestions. Literal tokens should return their text.
    fn kind_name(&self, kind: SyntaxKind) -> Cow<'_, str>;

    /// Whitespace and comments: skipped between tokens and kept out of
    /// node boundaries.
    fn is_trivia(&self, kind: SyntaxKind) -> bool;

    /// Whether a node of kind `child` may stand in for a node of kind
    /// `parent` when a `COLLAPSE` section commits.
    fn is_subkind(&self, child: SyntaxKind, parent: SyntaxKind) -> bool {
        child == parent
    }

    /// Delimiter pairs; the first pair drives recovery and balancing.
    fn delimiters(&self) -> &[DelimiterPair] {
        &[]
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }
}

/// A [`Language`] described entirely by data.
///
/// # Example
///
/// ```text
/// let table = KindTable::new()
///     .kind(IDENT, "IDENT")
///     .kind(PLUS, "+")
///     .trivia(WHITESPACE)
///     .extends([BINARY_EXPR, PLUS_EXPR, MUL_EXPR])
///     .delimiters(L_PAREN, R_PAREN);
/// ```
#[derive(Clone, Debug, Default)]
pub struct KindTable {
    names: Vec<Option<Box<str>>>,
    trivia: KindSet,
    extends: Vec<KindSet>,
    delimiters: Vec<DelimiterPair>,
    case_insensitive: bool,
}

impl KindTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the display name of a kind.
    #[must_use]
    pub fn kind(mut self, kind: SyntaxKind, name: impl Into<Box<str>>) -> Self {
        if self.names.len() <= kind.index() {
            self.names.resize(kind.index() + 1, None);
        }
        self.names[kind.index()] = Some(name.into());
        self
    }

    #[must_use]
    pub fn trivia(mut self, kind: SyntaxKind) -> Self {
        self.trivia.insert(kind);
        self
    }

    /// Declare an equivalence group: any member may collapse into any other.
    #[must_use]
    pub fn extends(mut self, group: impl IntoIterator<Item = SyntaxKind>) -> Self {
        self.extends.push(group.into_iter().collect());
        self
    }

    #[must_use]
    pub fn delimiters(mut self, open: SyntaxKind, close: SyntaxKind) -> Self {
        self.delimiters.push(DelimiterPair::new(open, close));
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

impl Language for KindTable {
    fn kind_name(&self, kind: SyntaxKind) -> Cow<'_, str> {
        match self.names.get(kind.index()).and_then(Option::as_deref) {
            Some(name) => Cow::Borrowed(name),
            None if kind == SyntaxKind::ERROR => Cow::Borrowed("<error>"),
            None if kind == SyntaxKind::DUMMY_BLOCK => Cow::Borrowed("DUMMY_BLOCK"),
            None => Cow::Owned(format!("{kind:?}")),
        }
    }

    fn is_trivia(&self, kind: SyntaxKind) -> bool {
        self.trivia.contains(kind)
    }

    fn is_subkind(&self, child: SyntaxKind, parent: SyntaxKind) -> bool {
        child == parent
            || self
                .extends
                .iter()
                .any(|group| group.contains(child) && group.contains(parent))
    }

    fn delimiters(&self) -> &[DelimiterPair] {
        &self.delimiters
    }

    fn is_case_sensitive(&self) -> bool {
        !self.case_insensitive
    }
}

#[cfg(test)]
mod tests;
