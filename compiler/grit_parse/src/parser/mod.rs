//! The parse session.
//!
//! A [`Parser`] owns all mutable state of one parse: the token cursor, the
//! marker builder, the frame stack, predicate state, variant lists and the
//! optional completion state. Grammar rules receive `&mut Parser` and drive
//! it through the section and token-test primitives; nothing is global, so
//! any number of sessions may run side by side.
//!
//! The primitives are spread over several modules, each adding an
//! `impl Parser` block:
//!
//! | Module | Primitives |
//! |--------|------------|
//! | `section` | `enter_section`, `exit_section` and their simple forms |
//! | `primitives` | `consume_*`, `next_token_is*`, guards |
//! | `recovery` | `report_error` and the eat-more skip |
//! | `balance` | `parse_as_tree` |
//! | `hooks` | `register_hook` |

use std::borrow::Cow;

use grit_diagnostic::{Diagnostic, EnglishMessages, Message, MessageRenderer};
use grit_ir::{Language, Span, SyntaxKind, TokenList};
use tracing::{debug, debug_span, error};

use crate::builder::{Builder, Marker};
use crate::completion::CompletionState;
use crate::config::ParserConfig;
use crate::cursor::TokenCursor;
use crate::error::FatalError;
use crate::frame::{FrameStack, Modifiers, PredicateState};
use crate::hooks::HookEntry;
use crate::tree::SyntaxNode;
use crate::variants::VariantTracker;

/// A grammar rule, an eat-more condition or a token advancer.
///
/// Implemented for every `fn(&mut Parser<'_>, u32) -> bool`, which is the
/// shape generated rule functions have.
pub trait Rule {
    fn parse(&self, p: &mut Parser<'_>, level: u32) -> bool;
}

impl<F> Rule for F
where
    F: Fn(&mut Parser<'_>, u32) -> bool,
{
    fn parse(&self, p: &mut Parser<'_>, level: u32) -> bool {
        self(p, level)
    }
}

/// Steps over one significant token; fails at end of input.
#[derive(Copy, Clone, Debug, Default)]
pub struct TokenAdvancer;

impl Rule for TokenAdvancer {
    fn parse(&self, p: &mut Parser<'_>, _level: u32) -> bool {
        if p.eof() {
            return false;
        }
        p.advance_lexer();
        true
    }
}

/// Always holds. As an eat-more condition it makes recovery swallow
/// everything up to the end of input.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrueCondition;

impl Rule for TrueCondition {
    fn parse(&self, _p: &mut Parser<'_>, _level: u32) -> bool {
        true
    }
}

/// A fatal error plus where it was raised.
#[derive(Debug)]
pub(crate) struct RaisedFatal {
    error: FatalError,
    span: Span,
    label: String,
}

/// One parse session over a token list.
pub struct Parser<'a> {
    pub(crate) cursor: TokenCursor<'a>,
    pub(crate) builder: Builder,
    pub(crate) frames: FrameStack,
    pub(crate) predicate: PredicateState,
    pub(crate) variants: VariantTracker,
    pub(crate) completion: Option<CompletionState>,
    pub(crate) config: ParserConfig,
    pub(crate) renderer: &'a dyn MessageRenderer,
    pub(crate) token_advancer: &'a dyn Rule,
    pub(crate) hooks: Vec<HookEntry<'a>>,
    /// Number of sections currently open, framed or simple.
    pub(crate) level: u32,
    /// Set while recovery runs; no variants are recorded and no errors
    /// reported.
    pub(crate) suppress_errors: bool,
    pub(crate) alt_mode: bool,
    pub(crate) fatal: Option<RaisedFatal>,
}

impl<'a> Parser<'a> {
    /// A session with [`ParserConfig::from_env`] limits and English
    /// messages.
    pub fn new(tokens: &'a TokenList, language: &'a dyn Language) -> Self {
        let config = ParserConfig::from_env();
        Parser {
            cursor: TokenCursor::new(tokens, language),
            builder: Builder::new(),
            frames: FrameStack::default(),
            predicate: PredicateState::default(),
            variants: VariantTracker::new(config.max_variants),
            completion: None,
            config,
            renderer: &EnglishMessages,
            token_advancer: &TokenAdvancer,
            hooks: Vec::new(),
            level: 0,
            suppress_errors: false,
            alt_mode: false,
            fatal: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.variants = VariantTracker::new(config.max_variants);
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: &'a dyn MessageRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Collect completion candidates for a caret at byte `offset`.
    #[must_use]
    pub fn with_completion_offset(mut self, offset: u32) -> Self {
        self.completion = Some(CompletionState::new(offset));
        self
    }

    /// Replace the strategy recovery and the balancer use to step over one
    /// token.
    #[must_use]
    pub fn with_token_advancer(mut self, advancer: &'a dyn Rule) -> Self {
        self.token_advancer = advancer;
        self
    }

    /// Widen committed nodes over recovered tokens even when the section
    /// that recovered has no kind of its own.
    #[must_use]
    pub fn with_alt_mode(mut self, alt_mode: bool) -> Self {
        self.alt_mode = alt_mode;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Run `rule` as the root rule and build the tree under a `root` node.
    ///
    /// The root section eats everything the rule left over, so every token
    /// ends up in the tree.
    pub fn parse(mut self, root: SyntaxKind, rule: &dyn Rule) -> ParseOutput {
        let span = debug_span!("parse", tokens = self.cursor.tokens().len());
        let _enter = span.enter();

        let marker = self.enter_section(0, Modifiers::COLLAPSE, None, None);
        let result = rule.parse(&mut self, 1);
        self.exit_section(0, marker, Some(root), result, true, Some(&TrueCondition as &dyn Rule));
        self.finish(root)
    }

    fn finish(self, root: SyntaxKind) -> ParseOutput {
        let tokens = self.cursor.tokens();
        let tree = self.builder.build(tokens, self.cursor.language(), root);
        let mut diagnostics = tree.diagnostics();
        let fatal = match self.fatal {
            Some(raised) => {
                diagnostics.push(raised.error.to_diagnostic(self.renderer, raised.span, raised.label));
                Some(raised.error)
            }
            None => None,
        };
        let completions = self.completion.map(CompletionState::into_items).unwrap_or_default();
        debug!(
            diagnostics = diagnostics.len(),
            fatal = fatal.is_some(),
            "parse finished"
        );
        ParseOutput {
            tree,
            diagnostics,
            fatal,
            completions,
        }
    }

    /// Abort the session. Only the first fatal error is kept.
    pub(crate) fn raise(&mut self, error: FatalError) {
        if self.fatal.is_some() {
            return;
        }
        error!(code = %error.code(), %error, "fatal parse error");
        let found = clip(self.cursor.token_text().trim(), self.config.max_error_token_text);
        let label = found_label(self.renderer, &found);
        let span = Span::point(error.offset());
        self.fatal = Some(RaisedFatal { error, span, label });
    }

    /// Whether a fatal error ended the session. Token tests fail from then
    /// on so the grammar unwinds.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    pub(crate) fn advance_token(&mut self, level: u32) -> bool {
        let advancer = self.token_advancer;
        advancer.parse(self, level)
    }

    // Builder access for grammar code and custom advancers.

    /// Open a marker at the current significant token.
    pub fn mark(&mut self) -> Marker {
        self.cursor.skip_trivia();
        self.builder.open(self.cursor.raw_index())
    }

    /// Commit `marker` as a `kind` node ending at the cursor.
    pub fn done(&mut self, marker: Marker, kind: SyntaxKind) {
        self.builder.done(marker, kind, self.cursor.raw_index());
    }

    /// Erase `marker` and everything after it, rewinding the cursor.
    pub fn rollback_to(&mut self, marker: Marker) {
        if let Some(position) = self.builder.rollback(marker) {
            self.cursor.set_raw_index(position);
        }
    }

    pub fn drop_marker(&mut self, marker: Marker) {
        self.builder.drop_marker(marker);
    }

    pub fn precede(&mut self, marker: Marker) -> Marker {
        self.builder.precede(marker)
    }

    pub fn latest_done_marker(&self) -> Option<Marker> {
        self.builder.latest_done()
    }

    /// Kind of a committed marker.
    pub fn marker_kind(&self, marker: Marker) -> Option<SyntaxKind> {
        self.builder.kind(marker)
    }

    pub fn eof(&mut self) -> bool {
        self.cursor.eof()
    }

    /// Step over the current significant token.
    pub fn advance_lexer(&mut self) {
        self.cursor.advance();
    }

    /// Kind of the current significant token.
    pub fn token_kind(&mut self) -> Option<SyntaxKind> {
        self.cursor.current_kind()
    }

    pub fn token_text(&mut self) -> &'a str {
        self.cursor.token_text()
    }

    /// Byte offset of the current significant token.
    pub fn current_offset(&mut self) -> u32 {
        self.cursor.current_offset()
    }
}

/// First `max` characters of `text`, with `...` appended if anything was
/// cut.
pub(crate) fn clip(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}

/// Label text for whatever sits at the error position.
pub(crate) fn found_label(renderer: &dyn MessageRenderer, found: &str) -> String {
    if found.is_empty() {
        renderer.render(&Message::FoundEndOfInput)
    } else {
        renderer.render(&Message::Found { found })
    }
}

/// Everything a parse produces.
#[derive(Debug)]
pub struct ParseOutput {
    pub tree: SyntaxNode,
    /// Syntax errors that survived backtracking, in source order, followed
    /// by the fatal error if there was one.
    pub diagnostics: Vec<Diagnostic>,
    pub fatal: Option<FatalError>,
    /// Sorted completion candidates; empty unless a completion offset was
    /// set.
    pub completions: Vec<String>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// `Err` when the parse was aborted by a fatal error.
    pub fn into_result(mut self) -> Result<ParseOutput, FatalError> {
        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}
