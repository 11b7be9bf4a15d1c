//! Token cursor over a [`TokenList`].
//!
//! Positions are raw token indices, trivia included. Queries that look at
//! "the current token" skip trivia first and leave the cursor on the first
//! significant token, which is why they take `&mut self`. The `raw_*`
//! accessors never move the cursor.

use grit_ir::{Language, SyntaxKind, TokenList};

/// Cursor for navigating tokens during a parse.
pub struct TokenCursor<'a> {
    tokens: &'a TokenList,
    language: &'a dyn Language,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a TokenList, language: &'a dyn Language) -> Self {
        TokenCursor {
            tokens,
            language,
            pos: 0,
        }
    }

    #[inline]
    pub fn tokens(&self) -> &'a TokenList {
        self.tokens
    }

    #[inline]
    pub fn language(&self) -> &'a dyn Language {
        self.language
    }

    /// Raw index of the current token.
    #[inline]
    pub fn raw_index(&self) -> usize {
        self.pos
    }

    /// Rewind or fast-forward to a raw index visited before.
    pub fn set_raw_index(&mut self, index: usize) {
        debug_assert!(
            index <= self.tokens.len(),
            "cursor index {} out of bounds (max {})",
            index,
            self.tokens.len()
        );
        self.pos = index.min(self.tokens.len());
    }

    /// Trivia check that treats end of input as significant.
    #[inline]
    pub fn is_trivia(&self, kind: Option<SyntaxKind>) -> bool {
        kind.is_some_and(|kind| self.language.is_trivia(kind))
    }

    pub fn skip_trivia(&mut self) {
        while self.is_trivia(self.tokens.kind(self.pos)) {
            self.pos += 1;
        }
    }

    /// Kind of the current significant token, `None` at end of input.
    pub fn current_kind(&mut self) -> Option<SyntaxKind> {
        self.skip_trivia();
        self.tokens.kind(self.pos)
    }

    pub fn eof(&mut self) -> bool {
        self.current_kind().is_none()
    }

    /// Step over the current significant token. No-op at end of input.
    pub fn advance(&mut self) {
        if !self.eof() {
            self.pos += 1;
        }
    }

    /// Byte offset of the current significant token.
    pub fn current_offset(&mut self) -> u32 {
        self.skip_trivia();
        self.tokens.start(self.pos)
    }

    /// Byte offset of the current raw token, without skipping trivia.
    #[cfg(test)]
    pub fn raw_offset(&self) -> u32 {
        self.tokens.start(self.pos)
    }

    /// Text of the current significant token, empty at end of input.
    pub fn token_text(&mut self) -> &'a str {
        self.skip_trivia();
        self.tokens.text(self.pos)
    }

    /// Kind of the raw token `steps` away from the cursor.
    pub fn raw_lookup(&self, steps: isize) -> Option<SyntaxKind> {
        self.pos
            .checked_add_signed(steps)
            .and_then(|index| self.tokens.kind(index))
    }

    /// Start offset of the raw token `steps` away from the cursor.
    ///
    /// Saturates to 0 before the first token and to the source length past
    /// the last one.
    pub fn raw_token_start(&self, steps: isize) -> u32 {
        self.pos
            .checked_add_signed(steps)
            .map_or(0, |index| self.tokens.start(index))
    }
}
