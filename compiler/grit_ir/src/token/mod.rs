//! Lexer output consumed by the parser.
//!
//! The runtime reads tokens by raw index, trivia included, so it can rewind
//! to any index it has visited before. `TokenList` owns the source text so
//! token text and inter-token fragments can be sliced without copying.

use crate::{Span, SyntaxKind};

/// A single lexed token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: SyntaxKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Random-access token stream plus the text it was lexed from.
///
/// Tokens must be contiguous and ordered: each token starts where the
/// previous one ended. Trivia are ordinary tokens classified by the
/// [`Language`](crate::Language).
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    source: String,
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(source: impl Into<String>, tokens: Vec<Token>) -> Self {
        let list = TokenList {
            source: source.into(),
            tokens,
        };
        debug_assert!(
            list.tokens
                .windows(2)
                .all(|w| w[0].span.end <= w[1].span.start),
            "tokens must be ordered"
        );
        list
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Kind of the token at `index`, `None` past the end.
    #[inline]
    pub fn kind(&self, index: usize) -> Option<SyntaxKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    /// Byte offset where the token at `index` starts.
    ///
    /// Past the end this is the length of the source, so the end-of-input
    /// position has an offset like any other.
    #[inline]
    pub fn start(&self, index: usize) -> u32 {
        self.tokens
            .get(index)
            .map_or_else(|| self.end_offset(), |t| t.span.start)
    }

    /// Byte offset where the token at `index` ends.
    #[inline]
    pub fn end(&self, index: usize) -> u32 {
        self.tokens
            .get(index)
            .map_or_else(|| self.end_offset(), |t| t.span.end)
    }

    /// Span of the token at `index`, a point span at the end of input.
    pub fn span(&self, index: usize) -> Span {
        self.tokens
            .get(index)
            .map_or_else(|| Span::point(self.end_offset()), |t| t.span)
    }

    /// Text of the token at `index`, empty past the end.
    pub fn text(&self, index: usize) -> &str {
        self.tokens
            .get(index)
            .and_then(|t| self.source.get(t.span.to_range()))
            .unwrap_or("")
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn end_offset(&self) -> u32 {
        u32::try_from(self.source.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests;
