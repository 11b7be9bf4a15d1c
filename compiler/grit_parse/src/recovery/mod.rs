//! Error reporting and eat-more recovery.
//!
//! Errors are reported at most once per position. Each frame remembers the
//! raw index of the last error reported inside it (`error_reported_at`) and
//! passes it up on exit, so enclosing sections do not repeat an error their
//! children already produced.
//!
//! Recovery runs when a section exits with an eat-more condition: tokens
//! are skipped up to the furthest position any variant was recorded at,
//! one error is reported for the skipped run, and whatever the condition
//! still accepts is folded into balanced `DUMMY_BLOCK` chunks.

use grit_diagnostic::{ErrorCode, Message};
use grit_ir::SyntaxKind;
use tracing::debug;

use crate::error::FatalError;
use crate::frame::Frame;
use crate::parser::{clip, found_label, Parser, Rule};
use crate::tree::SyntaxError;
use crate::variants::render_list;

/// What an error report needs to know about the section it belongs to.
#[derive(Copy, Clone, Debug)]
struct ReportSite {
    level: u32,
    position: usize,
}

impl ReportSite {
    fn of(frame: &Frame) -> Self {
        ReportSite {
            level: frame.level,
            position: frame.position,
        }
    }
}

impl Parser<'_> {
    /// Report an error at the cursor when `result` is false and the
    /// current section recorded variants here. Returns `result`.
    ///
    /// Used after a pinned sequence element fails, so the error appears at
    /// the element rather than at the end of the section.
    pub fn report_error(&mut self, result: bool) -> bool {
        if !result {
            self.report_error_here(false);
        }
        result
    }

    pub(crate) fn report_error_here(&mut self, advance: bool) {
        self.cursor.skip_trivia();
        let position = self.cursor.raw_index();
        let Some(frame) = self.frames.top() else {
            debug!("error report outside of any section");
            return;
        };
        let has_variants_here = frame.last_variant_at.is_some_and(|at| at <= position);
        if frame.error_reported_at < Some(position) && has_variants_here {
            let site = ReportSite::of(frame);
            self.report_into_top(site, false, true, advance);
        }
    }

    /// Re-report an error the current section recorded further ahead, after
    /// the input it was reported on has been rolled back.
    pub(crate) fn report_frame_error(&mut self) {
        if self.suppress_errors || self.is_fatal() {
            return;
        }
        let position = self.cursor.raw_index();
        let Some(frame) = self.frames.top() else {
            return;
        };
        if frame.error_reported_at <= Some(position) {
            return;
        }
        let site = ReportSite::of(frame);
        let mut end = self
            .builder
            .latest_done()
            .map_or(position + 1, |marker| self.builder.end(marker));
        while end <= position && self.cursor.is_trivia(self.cursor.tokens().kind(end)) {
            end += 1;
        }
        let inner = end == position;
        self.cursor.skip_trivia();
        self.report_into_top(site, inner, true, false);
    }

    fn report_into_top(&mut self, site: ReportSite, inner: bool, force: bool, advance: bool) -> bool {
        let Some(at) = self.report(site, inner, force, advance) else {
            return false;
        };
        if let Some(frame) = self.frames.top_mut() {
            frame.error_reported_at = Some(at);
        }
        true
    }

    /// Report for a frame that has already been popped.
    pub(crate) fn report_frame(&mut self, frame: &mut Frame, inner: bool, force: bool, advance: bool) -> bool {
        let Some(at) = self.report(ReportSite::of(frame), inner, force, advance) else {
            return false;
        };
        frame.error_reported_at = Some(at);
        true
    }

    /// Insert an error node at the cursor built from the variants recorded
    /// here. Returns the raw index to remember as the error position, or
    /// `None` if nothing was reported.
    ///
    /// - `force`: report even with no expected variants
    /// - `advance`: the error node swallows the current token
    /// - `inner`: widen the node just committed so the error lands inside it
    fn report(&mut self, site: ReportSite, inner: bool, force: bool, advance: bool) -> Option<usize> {
        if self.is_fatal() {
            return None;
        }
        self.cursor.skip_trivia();
        let position = self.cursor.raw_index();
        let expected = render_list(
            self.variants.expected(),
            position,
            self.cursor.language(),
            self.renderer,
            self.config.max_variants_to_display,
        );
        if !force && expected.is_empty() && !advance {
            return None;
        }

        let found = clip(self.cursor.token_text().trim(), self.config.max_error_token_text);
        let (code, message) = if !expected.is_empty() {
            (ErrorCode::E1001, Message::Expected { list: &expected })
        } else if !found.is_empty() {
            (ErrorCode::E1002, Message::Unexpected { found: &found })
        } else {
            (ErrorCode::E1003, Message::UnexpectedInput)
        };
        let error = SyntaxError {
            code,
            message: self.renderer.render(&message),
            label: found_label(self.renderer, &found),
        };
        debug!(position, code = %error.code, message = %error.message, advance, inner, "syntax error");

        if advance {
            let marker = self.mark();
            self.advance_token(site.level + 1);
            let end = self.cursor.raw_index();
            self.builder.done_error(marker, error, end);
        } else if inner {
            let latest = self.builder.latest_extensible_done();
            self.error_item(error);
            if let Some(latest) = latest {
                let covered = self.builder.start(latest)..=self.builder.end(latest);
                if covered.contains(&site.position) {
                    self.extend_marker(latest);
                }
            }
        } else {
            self.error_item(error);
        }
        self.cursor.skip_trivia();
        Some(self.cursor.raw_index())
    }

    /// An empty error node at the cursor.
    fn error_item(&mut self, error: SyntaxError) {
        let marker = self.mark();
        let position = self.cursor.raw_index();
        self.builder.done_error(marker, error, position);
    }

    /// Skip what the section left behind while `eat_more` holds, then
    /// report once and balance the rest into chunks.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the section exit state it is called with"
    )]
    pub(crate) fn recover(
        &mut self,
        frame: &mut Frame,
        kind: Option<SyntaxKind>,
        result: bool,
        pinned: bool,
        eat_more: &dyn Rule,
        initial: usize,
        last_error: usize,
    ) {
        self.suppress_errors = true;
        let level = frame.level + 1;
        let eat_more_once = !self.cursor.eof() && eat_more.parse(self, level);
        let mut eat_more_flag =
            eat_more_once || (!result && frame.position == initial && last_error > frame.position);

        let latest_done = if (pinned || result) && (self.alt_mode || kind.is_some()) && eat_more_once {
            self.builder.latest_extensible_done()
        } else {
            None
        };

        let delimiters = self.cursor.language().delimiters().first().copied();
        let mut depth = 0i32;
        while (eat_more_flag || depth > 0) && self.cursor.raw_index() < last_error {
            let token = self.cursor.current_kind();
            if let Some(pair) = delimiters {
                if token == Some(pair.open) {
                    depth += 1;
                } else if token == Some(pair.close) {
                    depth -= 1;
                }
            }
            let before = self.cursor.raw_index();
            if before >= last_error {
                break;
            }
            self.advance_token(level);
            if self.cursor.raw_index() == before {
                let offset = self.cursor.current_offset();
                self.raise(FatalError::NoProgress {
                    rule: frame.name.unwrap_or("<section>"),
                    offset,
                });
                break;
            }
            eat_more_flag = eat_more.parse(self, level);
        }
        debug!(
            skipped_to = self.cursor.raw_index(),
            last_error, eat_more_flag, "recovery skip"
        );

        let mut error_reported = frame.error_reported_at == Some(initial)
            || (!result && frame.error_reported_at >= Some(frame.position));
        if error_reported || eat_more_flag {
            if !error_reported {
                error_reported = self.report_frame(frame, false, true, true);
            } else if eat_more_flag {
                self.advance_token(level);
            }
            if !self.is_fatal() && eat_more.parse(self, level) {
                let advancer = self.token_advancer;
                self.parse_as_tree(level, SyntaxKind::DUMMY_BLOCK, true, advancer, eat_more);
            }
        } else if eat_more_once
            || (!result && frame.position != self.cursor.raw_index())
            || frame.error_reported_at > Some(initial)
        {
            error_reported = self.report_frame(frame, false, true, false);
        } else if !result && pinned && frame.error_reported_at.is_none() {
            error_reported = self.report_frame(frame, kind.is_some(), false, false);
        }

        if let Some(latest) = latest_done {
            let covered = self.builder.start(latest)..=self.builder.end(latest);
            if covered.contains(&frame.position) {
                self.extend_marker(latest);
            }
        }
        self.suppress_errors = false;

        if error_reported || result {
            self.variants.clear();
            frame.last_variant_at = None;
            if frame.variant_count > 0 {
                frame.variant_count = 0;
                for ancestor in self.frames.iter_mut() {
                    if ancestor.variant_count == 0 {
                        break;
                    }
                    ancestor.variant_count = 0;
                }
            }
        }
    }
}
