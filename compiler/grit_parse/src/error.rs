//! Fatal parse errors.
//!
//! A `FatalError` means the grammar or the engine is broken, not the input.
//! Syntax errors never show up here; they become error nodes in the tree.

use grit_diagnostic::{Diagnostic, ErrorCode, Message, MessageRenderer};
use grit_ir::Span;
use thiserror::Error;

/// Condition that aborts a parse session.
///
/// Once raised, every token-test primitive fails without consuming input so
/// the grammar unwinds, and no further recovery or error reporting happens.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("unbalanced section: expected level {expected}, got {found}")]
    UnbalancedSection { expected: u32, found: u32, offset: u32 },

    #[error("maximum recursion level ({limit}) reached in '{rule}'")]
    RecursionLimit {
        limit: u32,
        rule: &'static str,
        offset: u32,
    },

    /// A grammar loop iteration succeeded without consuming anything.
    #[error("empty element parsed in '{rule}' at offset {offset}")]
    EmptyElement { rule: &'static str, offset: u32 },

    #[error("no progress made while recovering in '{rule}' at offset {offset}")]
    NoProgress { rule: &'static str, offset: u32 },

    #[error("negative predicate context cannot open a positive-only predicate")]
    PredicateSign { offset: u32 },

    #[error("no done marker for '{kind}' at offset {offset}")]
    MissingDoneMarker { kind: String, offset: u32 },
}

impl FatalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FatalError::UnbalancedSection { .. } => ErrorCode::E9001,
            FatalError::RecursionLimit { .. } => ErrorCode::E9002,
            FatalError::EmptyElement { .. } | FatalError::NoProgress { .. } => ErrorCode::E9003,
            FatalError::PredicateSign { .. } => ErrorCode::E9004,
            FatalError::MissingDoneMarker { .. } => ErrorCode::E9005,
        }
    }

    /// Byte offset the condition was detected at.
    pub fn offset(&self) -> u32 {
        match *self {
            FatalError::UnbalancedSection { offset, .. }
            | FatalError::RecursionLimit { offset, .. }
            | FatalError::EmptyElement { offset, .. }
            | FatalError::NoProgress { offset, .. }
            | FatalError::PredicateSign { offset }
            | FatalError::MissingDoneMarker { offset, .. } => offset,
        }
    }

    pub fn message(&self) -> Message<'_> {
        match *self {
            FatalError::UnbalancedSection {
                expected, found, ..
            } => Message::Unbalanced { expected, found },
            FatalError::RecursionLimit { limit, rule, .. } => Message::RecursionLimit { limit, rule },
            FatalError::EmptyElement { rule, offset } => Message::EmptyElement { rule, offset },
            FatalError::NoProgress { rule, offset } => Message::NoProgress { rule, offset },
            FatalError::PredicateSign { .. } => Message::PredicateSign,
            FatalError::MissingDoneMarker { ref kind, offset } => Message::MissingDoneMarker {
                kind: kind.as_str(),
                offset,
            },
        }
    }

    /// Render as a diagnostic; `label` describes what was found at `span`.
    pub fn to_diagnostic(
        &self,
        renderer: &dyn MessageRenderer,
        span: Span,
        label: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(renderer.render(&self.message()))
            .with_label(span, label)
    }
}
