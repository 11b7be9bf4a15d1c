//! Opaque syntax kinds and kind sets.
//!
//! A [`SyntaxKind`] names both token kinds (what the lexer produced) and
//! node kinds (what a grammar rule commits). The runtime never interprets a
//! kind beyond equality, membership in a [`KindSet`], and the relations a
//! [`Language`](crate::Language) declares.

use std::fmt;

use smallvec::SmallVec;

/// Identifier of a token or node kind.
///
/// Kinds below [`SyntaxKind::FIRST_USER`] are reserved for the runtime.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SyntaxKind(pub u16);

impl SyntaxKind {
    /// Node wrapping an error message and the tokens it swallowed.
    pub const ERROR: SyntaxKind = SyntaxKind(0);
    /// Chunk node produced by the tree balancer while skipping garbage.
    pub const DUMMY_BLOCK: SyntaxKind = SyntaxKind(1);
    /// First kind available to grammars.
    pub const FIRST_USER: SyntaxKind = SyntaxKind(2);

    #[inline]
    pub const fn new(raw: u16) -> Self {
        SyntaxKind(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

impl fmt::Debug for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SyntaxKind::ERROR => write!(f, "ERROR"),
            SyntaxKind::DUMMY_BLOCK => write!(f, "DUMMY_BLOCK"),
            SyntaxKind(raw) => write!(f, "#{raw}"),
        }
    }
}

const WORD_BITS: usize = 64;

/// A set of kinds with O(1) membership testing.
///
/// Bit `i` of the backing words corresponds to `SyntaxKind(i)`. The first
/// 256 kinds live inline; larger grammars spill to the heap.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct KindSet {
    words: SmallVec<[u64; 4]>,
}

impl KindSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: SyntaxKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: SyntaxKind) {
        let (word, bit) = (kind.index() / WORD_BITS, kind.index() % WORD_BITS);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << bit;
    }

    #[inline]
    pub fn contains(&self, kind: SyntaxKind) -> bool {
        let (word, bit) = (kind.index() / WORD_BITS, kind.index() % WORD_BITS);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Union of two sets.
    #[must_use]
    pub fn union(&self, other: &KindSet) -> KindSet {
        let (long, short) = if self.words.len() >= other.words.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut words = long.words.clone();
        for (w, o) in words.iter_mut().zip(short.words.iter()) {
            *w |= o;
        }
        KindSet { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate the member kinds in ascending order.
    pub fn iter(&self) -> KindSetIter<'_> {
        KindSetIter {
            words: &self.words,
            word: 0,
            bits: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl FromIterator<SyntaxKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = SyntaxKind>>(iter: I) -> Self {
        let mut set = KindSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the kinds of a [`KindSet`].
pub struct KindSetIter<'a> {
    words: &'a [u64],
    word: usize,
    bits: u64,
}

impl Iterator for KindSetIter<'_> {
    type Item = SyntaxKind;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bits == 0 {
            self.word += 1;
            self.bits = *self.words.get(self.word)?;
        }
        let bit = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sets are only ever built from u16 kinds"
        )]
        let kind = SyntaxKind((self.word * WORD_BITS + bit) as u16);
        Some(kind)
    }
}

#[cfg(test)]
mod tests;
