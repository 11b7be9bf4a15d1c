//! Token-test primitives and guards called from generated rule code.
//!
//! Every test records what it looked for as a variant at the current
//! position before looking, so a later failure can say what was expected.
//! The `_fast` forms skip recording; they are for places where the grammar
//! already knows an error cannot be reported.
//!
//! After a fatal error every test fails without consuming input.

use grit_ir::SyntaxKind;

use crate::error::FatalError;
use crate::frame::Frame;
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::variants::{Variant, VariantItem, VariantTracker};

/// Where a token sequence stops being optional.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pin {
    /// Fail on the first mismatch without reporting.
    #[default]
    None,
    /// Once the token at this index is reached with everything before it
    /// matched, the sequence succeeds; later mismatches are reported.
    At(usize),
    /// Never pinned, but every mismatch is reported.
    Report,
}

/// Append a variant and move the frame's high-water mark.
fn record(
    variants: &mut VariantTracker,
    sign: bool,
    frame: Option<&mut Frame>,
    position: usize,
    item: VariantItem,
) {
    variants.push(sign, Variant { position, item });
    if let (true, Some(frame)) = (sign, frame) {
        frame.last_variant_at = frame.last_variant_at.max(Some(position));
    }
}

impl Parser<'_> {
    pub(crate) fn push_variant(&mut self, position: usize, item: VariantItem) {
        record(
            &mut self.variants,
            self.predicate.sign,
            self.frames.top_mut(),
            position,
            item,
        );
    }

    /// Record against a frame that is no longer on the stack.
    pub(crate) fn push_variant_into(&mut self, frame: Option<&mut Frame>, position: usize, item: VariantItem) {
        record(&mut self.variants, self.predicate.sign, frame, position, item);
    }

    fn add_variant_item(&mut self, item: VariantItem) {
        self.cursor.skip_trivia();
        let position = self.cursor.raw_index();
        self.push_variant(position, item);
        if self.predicate.sign {
            self.offer_completion(item);
        }
    }

    fn offer_completion(&mut self, item: VariantItem) {
        if let Some(completion) = self.completion.as_mut() {
            let text = item.text(self.cursor.language());
            completion.offer(&mut self.cursor, &text);
        }
    }

    /// Record `item` unless recording is off. Returns `false` only when
    /// completing and `force` is unset, meaning the caller should not test
    /// at all.
    fn add_variant_smart(&mut self, item: VariantItem, force: bool) -> bool {
        if self.completion.is_some() && !force {
            return false;
        }
        self.cursor.skip_trivia();
        if !self.suppress_errors && self.predicate.tracks_variants(self.config.predicate_depth_limit) {
            self.add_variant_item(item);
        }
        true
    }

    fn add_completion_variant_smart(&mut self, item: VariantItem) {
        if self.predicate.sign {
            self.offer_completion(item);
        }
    }

    /// Record a free-form phrase as expected at the current position.
    pub fn add_variant(&mut self, text: &'static str) {
        self.add_variant_item(VariantItem::Text(text));
    }

    /// Consume a `kind` token, recording it as expected.
    pub fn consume_token(&mut self, kind: SyntaxKind) -> bool {
        if self.is_fatal() {
            return false;
        }
        self.add_variant_smart(VariantItem::Token(kind), true);
        self.consume_token_fast(kind)
    }

    /// Consume a `kind` token without recording anything.
    pub fn consume_token_fast(&mut self, kind: SyntaxKind) -> bool {
        if self.is_fatal() || self.cursor.current_kind() != Some(kind) {
            return false;
        }
        self.cursor.advance();
        true
    }

    /// Like [`Parser::consume_token_fast`], but still offers `kind` as a
    /// completion candidate.
    pub fn consume_token_smart(&mut self, kind: SyntaxKind) -> bool {
        self.add_completion_variant_smart(VariantItem::Token(kind));
        self.consume_token_fast(kind)
    }

    /// Consume a literal that may span several tokens.
    ///
    /// Matches the source text at the current offset, case-insensitively if
    /// the language says so, and only succeeds when the literal ends exactly
    /// on a token boundary.
    pub fn consume_text(&mut self, text: &'static str) -> bool {
        if self.is_fatal() {
            return false;
        }
        self.add_variant_smart(VariantItem::Text(text), true);
        match usize::try_from(self.text_token_count(text)) {
            Ok(count) if count > 0 => {
                let position = self.cursor.raw_index();
                self.cursor.set_raw_index(position + count);
                true
            }
            _ => false,
        }
    }

    /// Test for `text` at the cursor without consuming it, recording it as
    /// expected. Same boundary rule as [`Parser::consume_text`].
    pub fn next_token_is_text(&mut self, text: &'static str) -> bool {
        if self.is_fatal() {
            return false;
        }
        if !self.add_variant_smart(VariantItem::Text(text), false) {
            return true;
        }
        self.text_token_count(text) > 0
    }

    /// Raw tokens covered by `text` at the cursor: 0 on a text mismatch,
    /// negative when the text ends inside a token.
    fn text_token_count(&mut self, text: &str) -> isize {
        if text.is_empty() {
            return 0;
        }
        let offset = self.cursor.current_offset() as usize;
        let source = self.cursor.tokens().source();
        let end = offset + text.len();
        let Some(found) = source.get(offset..end.min(source.len())) else {
            return 0;
        };
        let matches = if self.cursor.language().is_case_sensitive() {
            found == text
        } else {
            found.eq_ignore_ascii_case(text)
        };
        if !matches {
            return 0;
        }
        let mut count = 0;
        loop {
            count += 1;
            let next = self.cursor.raw_token_start(count) as usize;
            if next > end {
                return -count;
            }
            if next == end {
                return count;
            }
        }
    }

    /// Test for a `kind` token without consuming it. Always holds while
    /// completing, so every alternative gets a chance to offer candidates.
    pub fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        if self.is_fatal() {
            return false;
        }
        if !self.add_variant_smart(VariantItem::Token(kind), false) {
            return true;
        }
        self.next_token_is_fast(kind)
    }

    /// Test for any of `kinds`. With a `frame_name` the name is recorded
    /// instead of every kind.
    pub fn next_token_is_any(&mut self, frame_name: Option<&'static str>, kinds: &[SyntaxKind]) -> bool {
        if self.is_fatal() {
            return false;
        }
        if self.completion.is_some() {
            return true;
        }
        let track = !self.suppress_errors
            && self.predicate.tracks_variants(self.config.predicate_depth_limit)
            && self.predicate.sign;
        if !track {
            return self.next_token_is_fast_any(kinds);
        }
        self.cursor.skip_trivia();
        match frame_name {
            Some(name) => {
                let position = self.cursor.raw_index();
                self.push_variant(position, VariantItem::Name(name));
            }
            None => {
                for &kind in kinds {
                    self.add_variant_item(VariantItem::Token(kind));
                }
            }
        }
        self.cursor.current_kind().is_some_and(|kind| kinds.contains(&kind))
    }

    pub fn next_token_is_fast(&mut self, kind: SyntaxKind) -> bool {
        !self.is_fatal() && self.cursor.current_kind() == Some(kind)
    }

    pub fn next_token_is_fast_any(&mut self, kinds: &[SyntaxKind]) -> bool {
        !self.is_fatal() && self.cursor.current_kind().is_some_and(|kind| kinds.contains(&kind))
    }

    /// Consume `kinds` in order; see [`Pin`].
    pub fn consume_tokens(&mut self, pin: Pin, kinds: &[SyntaxKind]) -> bool {
        self.consume_sequence(false, pin, kinds)
    }

    /// [`Parser::consume_tokens`] that rolls back on failure.
    pub fn parse_tokens(&mut self, pin: Pin, kinds: &[SyntaxKind]) -> bool {
        self.parse_sequence(false, pin, kinds)
    }

    /// [`Parser::parse_tokens`] whose first token is tested without
    /// recording, for sequences a `next_token_is` already guarded.
    pub fn parse_tokens_smart(&mut self, pin: Pin, kinds: &[SyntaxKind]) -> bool {
        self.parse_sequence(true, pin, kinds)
    }

    fn parse_sequence(&mut self, smart: bool, pin: Pin, kinds: &[SyntaxKind]) -> bool {
        let marker = self.mark();
        let result = self.consume_sequence(smart, pin, kinds);
        if result {
            self.drop_marker(marker);
        } else {
            self.rollback_to(marker);
        }
        result
    }

    fn consume_sequence(&mut self, smart: bool, pin: Pin, kinds: &[SyntaxKind]) -> bool {
        if self.predicate.sign {
            if let Some(completion) = self.completion.as_mut() {
                let language = self.cursor.language();
                let names: Vec<_> = kinds.iter().map(|&kind| language.kind_name(kind)).collect();
                completion.offer(&mut self.cursor, &names.join(" "));
            }
        }
        // the whole sequence was offered; its tokens are not offered one by one
        let completion = self.completion.take();
        let mut result = true;
        let mut pinned = false;
        for (index, &kind) in kinds.iter().enumerate() {
            if pin == Pin::At(index) && index > 0 {
                pinned = result;
            }
            if !(result || pinned) {
                continue;
            }
            let consumed = if smart && index == 0 {
                self.consume_token_fast(kind)
            } else {
                self.consume_token(kind)
            };
            if !consumed {
                result = false;
                if pin == Pin::Report || pinned {
                    self.report_error_here(false);
                }
            }
        }
        self.completion = completion;
        pinned || result
    }

    /// Raw token index of the cursor, for [`Parser::empty_element_parsed_guard`].
    pub fn current_position(&self) -> usize {
        self.cursor.raw_index()
    }

    /// Fail, and abort the session, once `level` exceeds the configured
    /// recursion ceiling.
    pub fn recursion_guard(&mut self, level: u32, rule: &'static str) -> bool {
        if self.is_fatal() {
            return false;
        }
        let limit = self.config.max_recursion_level;
        if level > limit {
            let offset = self.cursor.current_offset();
            self.raise(FatalError::RecursionLimit { limit, rule, offset });
            return false;
        }
        true
    }

    /// Fail, and abort the session, when a loop iteration that started at
    /// `position` did not consume anything.
    pub fn empty_element_parsed_guard(&mut self, rule: &'static str, position: usize) -> bool {
        if position != self.cursor.raw_index() {
            return true;
        }
        let offset = self.cursor.current_offset();
        self.raise(FatalError::EmptyElement { rule, offset });
        false
    }

    /// Run a rule body behind the recursion guard, on a stack with enough
    /// headroom for the configured ceiling.
    pub fn guarded(&mut self, level: u32, rule: &'static str, body: impl FnOnce(&mut Self, u32) -> bool) -> bool {
        if !self.recursion_guard(level, rule) {
            return false;
        }
        ensure_sufficient_stack(|| body(self, level))
    }
}
