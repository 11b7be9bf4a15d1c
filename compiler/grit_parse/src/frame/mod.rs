//! Section frames and predicate bookkeeping.
//!
//! Every framed section pushes a [`Frame`] recording where it started and
//! how its result must be merged into the tree on exit. Predicate sections
//! (`AND`/`NOT`) additionally drive [`PredicateState`], which decides
//! whether tokens tested inside them count as expected or unexpected.

use std::fmt;

use bitflags::bitflags;
use grit_ir::SyntaxKind;

use crate::builder::Marker;

bitflags! {
    /// How a section's result is merged into the tree when it exits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        /// Reuse a single child node of a compatible kind instead of
        /// wrapping it.
        const COLLAPSE = 1 << 0;
        /// Become the parent of the node committed just before the section.
        const LEFT = 1 << 1;
        /// Re-commit the node committed before the section so that it also
        /// covers this section.
        const LEFT_INNER = 1 << 2;
        /// Positive lookahead: never consumes input.
        const AND = 1 << 3;
        /// Negative lookahead: never consumes input, flips variant sign.
        const NOT = 1 << 4;
        /// Assign the kind to the nearest enclosing section instead.
        const UPPER = 1 << 5;
    }
}

impl Modifiers {
    pub const NONE: Self = Self::empty();

    #[inline]
    pub fn is_predicate(self) -> bool {
        self.intersects(Self::AND.union(Self::NOT))
    }

    #[inline]
    pub(crate) fn is_left(self) -> bool {
        self.intersects(Self::LEFT.union(Self::LEFT_INNER))
    }
}

/// Bookkeeping for one open framed section.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    /// Kind to commit on success. `UPPER` children may fill this in.
    pub kind: Option<SyntaxKind>,
    /// Byte offset of the first significant token.
    pub offset: u32,
    /// Raw token index the section started at.
    pub position: usize,
    pub level: u32,
    pub modifiers: Modifiers,
    pub name: Option<&'static str>,
    /// Length of the expected-variant list when the section opened.
    pub variant_count: usize,
    /// Raw index of the last error reported inside the section.
    pub error_reported_at: Option<usize>,
    /// Raw index of the furthest expected variant recorded inside.
    pub last_variant_at: Option<usize>,
    /// Node committed right before a `LEFT`/`LEFT_INNER` section.
    pub left_marker: Option<Marker>,
}

impl Frame {
    pub fn new(
        offset: u32,
        position: usize,
        level: u32,
        modifiers: Modifiers,
        name: Option<&'static str>,
        variant_count: usize,
    ) -> Self {
        Frame {
            kind: None,
            offset,
            position,
            level,
            modifiers,
            name,
            variant_count,
            error_reported_at: None,
            last_variant_at: None,
            left_marker: None,
        }
    }

    /// Forget an error reported past `start`, the start of a range
    /// that is being rolled back, falling back to the parent's position.
    pub fn forget_errors_from(&mut self, start: usize, fallback: Option<usize>) {
        if self.error_reported_at > Some(start) {
            self.error_reported_at = fallback;
        }
    }

    /// Raw index errors inside this section are attributed to.
    pub fn last_error_position(&self) -> usize {
        self.last_variant_at.unwrap_or(self.position)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "<{name}>")?,
            None => write!(f, "<section>")?,
        }
        write!(f, " at {}({})", self.offset, self.level)?;
        if !self.modifiers.is_empty() {
            write!(f, " {:?}", self.modifiers)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    #[inline]
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// The frame below the top.
    #[inline]
    pub fn parent(&self) -> Option<&Frame> {
        self.frames.len().checked_sub(2).and_then(|i| self.frames.get(i))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Innermost first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        self.frames.iter_mut().rev()
    }
}

/// Predicate nesting depth and the sign of the innermost predicate.
///
/// Outside any predicate the sign is positive. A `NOT` flips it, an `AND`
/// keeps it. The state is back to `(0, positive)` whenever every predicate
/// section has exited.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PredicateState {
    pub count: u32,
    pub sign: bool,
}

impl Default for PredicateState {
    fn default() -> Self {
        PredicateState {
            count: 0,
            sign: true,
        }
    }
}

impl PredicateState {
    /// Enter a section with `modifiers`. Returns `false` when a positive
    /// predicate is opened at top level while the sign is negative, which
    /// only happens if an earlier predicate never exited.
    #[must_use]
    pub fn enter(&mut self, modifiers: Modifiers) -> bool {
        if modifiers.contains(Modifiers::AND) {
            let consistent = self.count != 0 || self.sign;
            self.count += 1;
            consistent
        } else if modifiers.contains(Modifiers::NOT) {
            self.sign = self.count != 0 && !self.sign;
            self.count += 1;
            true
        } else {
            true
        }
    }

    pub fn exit(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::AND) {
            self.count = self.count.saturating_sub(1);
        } else if modifiers.contains(Modifiers::NOT) {
            self.count = self.count.saturating_sub(1);
            self.sign = !self.sign;
        }
    }

    /// Whether variants are still recorded at this nesting depth.
    #[inline]
    pub fn tracks_variants(self, depth_limit: u32) -> bool {
        self.count < depth_limit
    }
}
