//! Section enter/exit and the node shaping policies.
//!
//! A grammar rule brackets its body with `enter_section`/`exit_section`.
//! On exit the frame's modifiers decide what the rule's marker becomes:
//!
//! | Modifier | On success |
//! |----------|------------|
//! | none | commit the marker as the kind |
//! | `COLLAPSE` | reuse a compatible single child instead of wrapping it |
//! | `LEFT` | wrap the node committed before the section |
//! | `LEFT_INNER` | commit, then widen the node committed before the section |
//! | `UPPER` | hand the kind to the nearest enclosing section without one |
//! | `AND`/`NOT` | always roll back; the result is the lookahead answer |
//!
//! On failure the marker is rolled back unless the rule was pinned.

use grit_ir::SyntaxKind;
use tracing::trace;

use crate::builder::Marker;
use crate::error::FatalError;
use crate::frame::{Frame, Modifiers};
use crate::parser::{Parser, Rule};
use crate::variants::VariantItem;

impl Parser<'_> {
    /// Open a framed section at rule `level`.
    ///
    /// If the enclosing section reported an error further ahead that has
    /// since been rolled back, it is re-reported here first.
    pub fn enter_section(
        &mut self,
        level: u32,
        modifiers: Modifiers,
        kind: Option<SyntaxKind>,
        name: Option<&'static str>,
    ) -> Marker {
        self.report_frame_error();
        let marker = self.mark();
        self.push_frame(level, modifiers, kind, name);
        marker
    }

    fn push_frame(
        &mut self,
        level: u32,
        modifiers: Modifiers,
        kind: Option<SyntaxKind>,
        name: Option<&'static str>,
    ) {
        self.level += 1;
        let offset = self.cursor.current_offset();
        let mut frame = Frame::new(
            offset,
            self.cursor.raw_index(),
            level,
            modifiers,
            name,
            self.variants.expected_len(),
        );
        frame.kind = kind;
        if modifiers.is_left() && !self.frames.is_empty() {
            frame.left_marker = self.builder.latest_done();
        }
        if !self.predicate.enter(modifiers) {
            self.raise(FatalError::PredicateSign { offset });
        }
        trace!(%frame, "enter section");
        self.frames.push(frame);
    }

    /// Close a framed section opened with [`Parser::enter_section`].
    ///
    /// `level` must be the value passed to the matching `enter_section`. A
    /// mismatch is fatal and rolls the marker back whatever `result` says.
    /// `pinned` keeps the node even though `result` is false. With
    /// `eat_more`, tokens the rule left behind are skipped while the
    /// condition holds and reported as one error.
    pub fn exit_section(
        &mut self,
        level: u32,
        marker: Marker,
        kind: Option<SyntaxKind>,
        result: bool,
        pinned: bool,
        eat_more: Option<&dyn Rule>,
    ) {
        let popped = self.frames.pop();
        let kind = popped.as_ref().and_then(|frame| frame.kind).or(kind);
        let mut frame = match popped {
            Some(frame) if frame.level == level => frame,
            mut other => {
                let found = other.as_ref().map_or(self.level, |frame| frame.level);
                let offset = self.cursor.current_offset();
                self.raise(FatalError::UnbalancedSection {
                    expected: level,
                    found,
                    offset,
                });
                self.close_marker(other.as_mut(), marker, None, false);
                self.level = self.level.saturating_sub(1);
                return;
            }
        };
        trace!(%frame, result, pinned, "exit section");

        self.close_frame(&mut frame, marker, kind, result, pinned);
        self.exit_section_impl(&mut frame, kind, result, pinned, eat_more);
        self.run_hooks(if pinned || result { kind } else { None });
        self.level = self.level.saturating_sub(1);
    }

    /// Open a section without a frame: no shaping, no recovery.
    pub fn enter_section_simple(&mut self) -> Marker {
        self.report_frame_error();
        self.level += 1;
        self.mark()
    }

    /// Close a section opened with [`Parser::enter_section_simple`]:
    /// commit as `kind` (or drop without one) on success, roll back on
    /// failure.
    pub fn exit_section_simple(&mut self, marker: Marker, kind: Option<SyntaxKind>, result: bool) {
        if result {
            self.commit_or_drop(marker, kind);
        } else {
            let start = self.builder.start(marker);
            let fallback = self.frames.parent().and_then(|frame| frame.error_reported_at);
            if let Some(frame) = self.frames.top_mut() {
                frame.forget_errors_from(start, fallback);
            }
            self.rollback_to(marker);
        }
        self.run_hooks(if result { kind } else { None });
        self.level = self.level.saturating_sub(1);
    }

    fn commit_or_drop(&mut self, marker: Marker, kind: Option<SyntaxKind>) {
        match kind {
            Some(kind) => self.done(marker, kind),
            None => self.builder.drop_marker(marker),
        }
    }

    /// `frame` has been popped; its parent, if any, is the stack top.
    fn close_marker(&mut self, frame: Option<&mut Frame>, marker: Marker, kind: Option<SyntaxKind>, result: bool) {
        if result {
            self.commit_or_drop(marker, kind);
            return;
        }
        if let Some(frame) = frame {
            let fallback = self.frames.top().and_then(|parent| parent.error_reported_at);
            frame.forget_errors_from(self.builder.start(marker), fallback);
        }
        self.rollback_to(marker);
    }

    fn close_frame(
        &mut self,
        frame: &mut Frame,
        marker: Marker,
        kind: Option<SyntaxKind>,
        result: bool,
        pinned: bool,
    ) {
        let mut marker = Some(marker);
        if frame.modifiers.is_predicate() {
            let reset_last_position = !self.suppress_errors
                && frame.last_variant_at.is_none()
                && frame.position < self.cursor.raw_index();
            if let Some(marker) = marker {
                self.close_marker(Some(&mut *frame), marker, None, false);
            }
            self.predicate.exit(frame.modifiers);
            marker = (kind.is_some() && (result || pinned)).then(|| self.mark());
            if reset_last_position {
                frame.last_variant_at = Some(self.cursor.raw_index());
            }
        }

        match (kind, marker) {
            (Some(kind), Some(marker)) if result || pinned => self.commit_section(frame, marker, kind),
            (_, marker) if result || pinned => {
                if let Some(marker) = marker {
                    self.builder.drop_marker(marker);
                }
                if let (true, Some(left)) = (frame.modifiers.contains(Modifiers::LEFT_INNER), frame.left_marker) {
                    self.extend_marker(left);
                }
            }
            (_, Some(marker)) => self.close_marker(Some(&mut *frame), marker, None, false),
            (_, None) => {}
        }
    }

    fn commit_section(&mut self, frame: &Frame, marker: Marker, kind: SyntaxKind) {
        let mut kind = kind;
        if frame.modifiers.contains(Modifiers::COLLAPSE) {
            if let Some(child) = self.collapsible_child(frame, kind) {
                if let Some(child_kind) = self.builder.kind(child) {
                    trace!(?child, "collapse");
                    kind = child_kind;
                    self.builder.drop_marker(child);
                }
            }
        }

        let modifiers = frame.modifiers;
        if modifiers.contains(Modifiers::UPPER) {
            self.builder.drop_marker(marker);
            if let Some(ancestor) = self.frames.iter_mut().find(|f| f.kind.is_none()) {
                ancestor.kind = Some(kind);
            }
        } else if let (true, Some(left)) = (modifiers.contains(Modifiers::LEFT_INNER), frame.left_marker) {
            self.done(marker, kind);
            self.extend_marker(left);
        } else if let (true, Some(left)) = (modifiers.contains(Modifiers::LEFT), frame.left_marker) {
            self.builder.drop_marker(marker);
            let parent = self.builder.precede(left);
            self.done(parent, kind);
        } else {
            if frame.level == 0 {
                self.cursor.skip_trivia();
            }
            self.done(marker, kind);
        }
    }

    /// The node committed last, if it starts where `frame` started, ends
    /// where the cursor is (trivia aside) and may stand in for `kind`.
    fn collapsible_child(&self, frame: &Frame, kind: SyntaxKind) -> Option<Marker> {
        let last = self.builder.latest_done()?;
        let language = self.cursor.language();
        let compatible = self
            .builder
            .kind(last)
            .is_some_and(|last_kind| language.is_subkind(last_kind, kind));
        let raw = self.cursor.raw_index();
        let end = self.builder.end(last);
        let only_trivia_after = (end..raw).all(|index| self.cursor.is_trivia(self.cursor.tokens().kind(index)));
        (self.builder.start(last) == frame.position && compatible && end <= raw && only_trivia_after).then_some(last)
    }

    /// Re-commit a committed node so that it ends at the cursor.
    pub(crate) fn extend_marker(&mut self, marker: Marker) {
        let Some(kind) = self.builder.kind(marker) else {
            return;
        };
        let wider = self.builder.precede(marker);
        let end = self.cursor.raw_index();
        match self.builder.error(marker).cloned() {
            Some(error) => self.builder.done_error(wider, error, end),
            None => self.builder.done(wider, kind, end),
        }
        self.builder.drop_marker(marker);
    }

    fn exit_section_impl(
        &mut self,
        frame: &mut Frame,
        kind: Option<SyntaxKind>,
        result: bool,
        pinned: bool,
        eat_more: Option<&dyn Rule>,
    ) {
        let initial = self.cursor.raw_index();
        self.replace_variants_with_name(frame, kind, result, pinned);
        let last_error = frame.last_error_position();
        match eat_more {
            Some(eat_more) if !self.suppress_errors && !self.is_fatal() => {
                self.recover(frame, kind, result, pinned, eat_more, initial, last_error);
            }
            _ if !result && pinned && frame.error_reported_at.is_none() => {
                if last_error == initial {
                    let inner = kind.is_some() && !frame.modifiers.contains(Modifiers::UPPER);
                    self.report_frame(frame, inner, false, false);
                } else if last_error > initial {
                    // errors further ahead stand for this one
                    frame.error_reported_at = Some(last_error);
                }
            }
            _ => {}
        }

        if let Some(parent) = self.frames.top_mut() {
            parent.error_reported_at = parent.error_reported_at.max(frame.error_reported_at);
            parent.last_variant_at = parent.last_variant_at.max(frame.last_variant_at);
        }
    }

    /// A named section that fails without consuming anything reports its
    /// name instead of every token it tried.
    fn replace_variants_with_name(
        &mut self,
        frame: &mut Frame,
        kind: Option<SyntaxKind>,
        result: bool,
        pinned: bool,
    ) {
        let Some(name) = frame.name else {
            return;
        };
        let position = self.cursor.raw_index();
        let slack = if kind.is_some() {
            self.config.named_frame_slack
        } else {
            0
        };
        if !result
            && !pinned
            && position == frame.position
            && frame.last_variant_at == Some(frame.position)
            && self.variants.expected_len() >= frame.variant_count + slack
        {
            self.variants.truncate_expected(frame.variant_count);
            self.push_variant_into(Some(frame), position, VariantItem::Name(name));
        }
    }
}
