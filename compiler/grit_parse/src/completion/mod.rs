//! Completion filtering.
//!
//! In completion mode the parser runs over the text up to the caret and
//! every token test offers what it looked for as a candidate. A candidate is
//! kept when the text between the parser position and the caret is a
//! camel-hump prefix of it.

use grit_ir::TokenList;
use rustc_hash::FxHashSet;

use crate::cursor::TokenCursor;

#[derive(Clone, Debug)]
pub(crate) struct CompletionState {
    /// Byte offset of the caret.
    pub offset: u32,
    items: FxHashSet<String>,
}

impl CompletionState {
    pub fn new(offset: u32) -> Self {
        CompletionState {
            offset,
            items: FxHashSet::default(),
        }
    }

    /// Offer `text` as a candidate at the cursor. Returns whether it was
    /// accepted.
    pub fn offer(&mut self, cursor: &mut TokenCursor<'_>, text: &str) -> bool {
        let here = cursor.current_offset();
        if !cursor.eof() && here == cursor.raw_token_start(1) {
            // zero-length token
            return false;
        }
        let accepted = is_candidate(text) && self.prefix_matches(cursor, here, text);
        if accepted {
            self.items.insert(text.to_owned());
        }
        accepted
    }

    /// Accepted candidates, sorted.
    pub fn into_items(self) -> Vec<String> {
        let mut items: Vec<String> = self.items.into_iter().collect();
        items.sort_unstable();
        items
    }

    fn prefix_matches(&self, cursor: &TokenCursor<'_>, here: u32, text: &str) -> bool {
        let tokens = cursor.tokens();
        let len = i64::try_from(text.len()).unwrap_or(i64::MAX);
        let mut diff = i64::from(self.offset) - i64::from(here);
        if diff == 0 {
            return true;
        }
        if diff > 0 {
            return diff <= len
                && fragment(tokens, here, self.offset).is_some_and(|prefix| prefix_matches(prefix, text));
        }
        // The parser already moved past the caret: find the token the caret
        // sits in, skipping trivia backwards.
        for steps in 1..=cursor.raw_index() {
            #[expect(
                clippy::cast_possible_wrap,
                reason = "steps is bounded by the token count"
            )]
            let back = -(steps as isize);
            let kind = cursor.raw_lookup(back);
            let start = cursor.raw_token_start(back);
            if cursor.is_trivia(kind) {
                diff = i64::from(self.offset) - i64::from(start);
            } else {
                if kind.is_some() && start < self.offset {
                    let matches = fragment(tokens, start, self.offset)
                        .is_some_and(|prefix| prefix_matches(prefix, text));
                    if matches {
                        diff = i64::from(self.offset) - i64::from(start);
                    }
                }
                break;
            }
        }
        diff >= 0 && diff < len
    }
}

/// Angle-bracketed names and short quoted literals are never offered.
fn is_candidate(text: &str) -> bool {
    let len = text.chars().count();
    len > 1
        && !(text.starts_with('<') && text.ends_with('>'))
        && !(text.starts_with('\'') && text.ends_with('\'') && len < 5)
}

fn fragment(tokens: &TokenList, start: u32, end: u32) -> Option<&str> {
    tokens.source().get(start as usize..end as usize)
}

/// Whether `prefix` is a camel-hump prefix of `variant`, case-insensitive.
///
/// Spaces count as `_` on both sides. A prefix ending in whitespace must
/// also be a literal prefix, so `"let "` does not match `"letter"`.
pub(crate) fn prefix_matches(prefix: &str, variant: &str) -> bool {
    let pattern: Vec<char> = prefix.chars().map(underscore_space).collect();
    let name: Vec<char> = variant.chars().map(underscore_space).collect();
    let matches = pattern.is_empty() || hump_match(&pattern, &name, 0);
    if matches && prefix.chars().next_back().is_some_and(char::is_whitespace) {
        return starts_with_ignore_case(variant, prefix);
    }
    matches
}

fn underscore_space(c: char) -> char {
    if c == ' ' {
        '_'
    } else {
        c
    }
}

/// `pattern[0]` must match `name[at]`; every later pattern character either
/// continues the current word or starts a later word.
fn hump_match(pattern: &[char], name: &[char], at: usize) -> bool {
    let Some((&first, rest)) = pattern.split_first() else {
        return true;
    };
    if !name.get(at).is_some_and(|&c| same_char(c, first)) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    hump_match(rest, name, at + 1)
        || (at + 2..name.len())
            .filter(|&next| is_word_start(name, next))
            .any(|next| hump_match(rest, name, next))
}

fn is_word_start(name: &[char], index: usize) -> bool {
    let Some(&c) = name.get(index) else {
        return false;
    };
    let Some(&previous) = index.checked_sub(1).and_then(|i| name.get(i)) else {
        return true;
    };
    matches!(previous, '_' | '-' | '.')
        || (c.is_uppercase() && previous.is_lowercase())
        || (c.is_ascii_digit() && !previous.is_ascii_digit())
}

fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text = text.chars();
    prefix
        .chars()
        .all(|p| text.next().is_some_and(|t| same_char(t, p)))
}
