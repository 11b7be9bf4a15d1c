//! Tree balancer for long flat sequences.
//!
//! `parse_as_tree` parses items one after another and groups them into
//! chunk nodes of at most `max_children_in_tree` items. Whenever that many
//! chunks of the same generation sit next to each other they are wrapped
//! in one chunk of the next generation, so the result is a tree of
//! logarithmic depth instead of a list.
//!
//! With delimiter checking on, every delimited region becomes its own
//! chunk and siblings are never folded across an open delimiter.

use std::collections::VecDeque;

use grit_ir::SyntaxKind;
use smallvec::SmallVec;
use tracing::debug;

use crate::builder::Marker;
use crate::parser::{Parser, Rule};

/// An open delimited region: its marker and the sibling that preceded it.
type OpenRegion = (Marker, Option<Marker>);

/// A folded sibling and its generation.
type Sibling = (Marker, u32);

impl Parser<'_> {
    /// Parse `item` repeatedly while `eat_more` holds (or inside an open
    /// delimiter), grouping the results into balanced `chunk` nodes.
    ///
    /// Returns whether at least one item was parsed.
    pub fn parse_as_tree(
        &mut self,
        level: u32,
        chunk: SyntaxKind,
        check_delimiters: bool,
        item: &dyn Rule,
        eat_more: &dyn Rule,
    ) -> bool {
        let max = self.config.max_children_in_tree;
        let delimiters = if check_delimiters {
            self.cursor.language().delimiters().first().copied()
        } else {
            None
        };
        let mut regions: SmallVec<[OpenRegion; 4]> = SmallVec::new();
        // front is the most recent sibling
        let mut siblings: VecDeque<Sibling> = VecDeque::new();
        let mut marker: Option<Marker> = None;
        let mut total = 0usize;
        let mut in_chunk = 0usize;

        if let Some(pair) = delimiters {
            // an error node that swallowed an open delimiter leaves its
            // region open
            let mut steps = -1;
            while self.cursor.is_trivia(self.cursor.raw_lookup(steps)) {
                steps -= 1;
            }
            if self.cursor.raw_lookup(steps) == Some(pair.open) {
                let open_at = self.cursor.raw_index().checked_add_signed(steps);
                if let Some(done) = self.builder.latest_done() {
                    if self.builder.kind(done) == Some(SyntaxKind::ERROR) && Some(self.builder.start(done)) == open_at {
                        regions.push((self.builder.precede(done), None));
                    }
                }
            }
        }

        let mut position = self.current_position();
        loop {
            let token = self.cursor.current_kind();
            let delimiter = delimiters
                .filter(|pair| token == Some(pair.open) || (token == Some(pair.close) && !regions.is_empty()));
            if let Some(pair) = delimiter {
                if let Some(open_chunk) = marker.take() {
                    self.done(open_chunk, chunk);
                    siblings.push_front((open_chunk, 1));
                    in_chunk = 0;
                }
                if token == Some(pair.open) {
                    let before = siblings.front().map(|&(sibling, _)| sibling);
                    let open = self.mark();
                    regions.push((open, before));
                }
                self.fold_siblings(chunk, &regions, &mut siblings);
                self.advance_token(level);
                if token == Some(pair.close) {
                    if let Some((open, before)) = regions.pop() {
                        self.done(open, chunk);
                        while siblings.front().is_some_and(|&(sibling, _)| Some(sibling) != before) {
                            siblings.pop_front();
                        }
                        siblings.push_front((open, 1));
                        self.fold_siblings(chunk, &regions, &mut siblings);
                    }
                }
            } else {
                if marker.is_none() {
                    marker = Some(self.mark());
                }
                let parsed = (!regions.is_empty() || eat_more.parse(self, level + 1)) && item.parse(self, level + 1);
                if !parsed {
                    break;
                }
                in_chunk += 1;
                total += 1;
            }

            if in_chunk >= max {
                if let Some(full) = marker.take() {
                    self.done(full, chunk);
                    siblings.push_front((full, 1));
                    self.fold_siblings(chunk, &regions, &mut siblings);
                }
                in_chunk = 0;
            }
            if !self.empty_element_parsed_guard("parse_as_tree", position) {
                break;
            }
            position = self.current_position();
        }

        if let Some(open_chunk) = marker {
            self.drop_marker(open_chunk);
        }
        for (open, _) in regions {
            self.drop_marker(open);
        }
        debug!(total, "parse_as_tree finished");
        total != 0
    }

    /// Wrap runs of `max_children_in_tree` same-generation siblings at the
    /// front of `siblings` until no such run is left. Siblings older than
    /// the innermost open region are out of reach.
    fn fold_siblings(&mut self, chunk: SyntaxKind, regions: &[OpenRegion], siblings: &mut VecDeque<Sibling>) {
        let max = self.config.max_children_in_tree;
        let boundary = regions.last().and_then(|&(_, before)| before);
        while let Some(&(_, generation)) = siblings.front() {
            let run = siblings
                .iter()
                .take_while(|&&(sibling, g)| g == generation && Some(sibling) != boundary)
                .count();
            if run < max {
                break;
            }
            let (oldest, _) = siblings[max - 1];
            let parent = self.builder.precede(oldest);
            siblings.drain(..max);
            self.done(parent, chunk);
            siblings.push_front((parent, generation + 1));
            debug!(generation = generation + 1, "folded chunk");
        }
    }
}
