//! Marker-based tree builder.
//!
//! The builder records a flat list of start/finish events keyed by
//! [`Marker`] handles and only materializes a tree at the very end. That
//! keeps every operation the grammar needs cheap:
//!
//! - `open` and `done` append one event
//! - `drop_marker` flips a state flag and logs the drop; the marker's
//!   events stay but are ignored
//! - `rollback` truncates the event list at the marker's start event and
//!   undoes every drop logged after it
//! - `precede` inserts a start event in front of an existing one
//!
//! Positions are raw token indices. Trivia at the edges of a node is trimmed
//! when the tree is built, so nodes never begin or end with whitespace or
//! comments.

use grit_ir::{Language, Span, SyntaxKind, TokenList};
use tracing::warn;

use crate::tree::{SyntaxElement, SyntaxError, SyntaxNode};

/// Handle to an open or committed span of the output tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Marker(u32);

impl Marker {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MarkerState {
    Open,
    Done,
    Dropped,
    RolledBack,
}

#[derive(Clone, Debug)]
struct MarkerData {
    start: usize,
    end: usize,
    kind: Option<SyntaxKind>,
    error: Option<Box<SyntaxError>>,
    state: MarkerState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Event {
    Start(Marker),
    Finish(Marker),
    /// The marker was dropped while in the given state.
    Drop(Marker, MarkerState),
}

#[derive(Clone, Debug, Default)]
pub struct Builder {
    markers: Vec<MarkerData>,
    events: Vec<Event>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a marker at raw index `pos`.
    pub fn open(&mut self, pos: usize) -> Marker {
        let marker = self.alloc(pos);
        self.events.push(Event::Start(marker));
        marker
    }

    /// Commit `marker` as a node of `kind` ending at `pos`.
    pub fn done(&mut self, marker: Marker, kind: SyntaxKind, pos: usize) {
        self.finish(marker, kind, None, pos);
    }

    /// Commit `marker` as an error node ending at `pos`.
    pub fn done_error(&mut self, marker: Marker, error: SyntaxError, pos: usize) {
        self.finish(marker, SyntaxKind::ERROR, Some(Box::new(error)), pos);
    }

    /// Forget `marker` without touching anything recorded after it.
    /// Works on committed markers too; their children move up one level.
    pub fn drop_marker(&mut self, marker: Marker) {
        if let Some(data) = self.markers.get_mut(marker.index()) {
            if matches!(data.state, MarkerState::Open | MarkerState::Done) {
                self.events.push(Event::Drop(marker, data.state));
                data.state = MarkerState::Dropped;
            }
        }
    }

    /// Erase `marker` and everything recorded after it. Markers that were
    /// dropped after `marker` was opened get their old state back.
    ///
    /// Returns the raw index the cursor must return to, or `None` if the
    /// marker was already gone.
    pub fn rollback(&mut self, marker: Marker) -> Option<usize> {
        let start = self.markers.get(marker.index())?.start;
        let at = self
            .events
            .iter()
            .rposition(|event| *event == Event::Start(marker))?;
        // newest first, so a drop is undone before its marker is erased
        for event in self.events.drain(at..).rev() {
            match event {
                Event::Start(m) | Event::Finish(m) => self.markers[m.index()].state = MarkerState::RolledBack,
                Event::Drop(m, prior) => self.markers[m.index()].state = prior,
            }
        }
        Some(start)
    }

    /// Open a new marker starting where `marker` starts, placed before it so
    /// that committing the new one wraps `marker`.
    pub fn precede(&mut self, marker: Marker) -> Marker {
        let start = self.markers.get(marker.index()).map_or(0, |data| data.start);
        let new = self.alloc(start);
        match self
            .events
            .iter()
            .rposition(|event| *event == Event::Start(marker))
        {
            Some(at) => self.events.insert(at, Event::Start(new)),
            None => {
                warn!(?marker, "precede on a marker with no start event");
                self.events.push(Event::Start(new));
            }
        }
        new
    }

    /// The most recently committed marker that is still alive.
    pub fn latest_done(&self) -> Option<Marker> {
        self.events.iter().rev().find_map(|event| match *event {
            Event::Finish(m) if self.is_done(m) => Some(m),
            _ => None,
        })
    }

    /// The latest committed marker, but only if nothing live was opened or
    /// committed after it. Such a node can be widened to the current
    /// position without breaking nesting.
    pub fn latest_extensible_done(&self) -> Option<Marker> {
        match self.events.iter().rev().find(|event| self.is_live(**event))? {
            Event::Finish(m) => Some(*m),
            Event::Start(_) | Event::Drop(..) => None,
        }
    }

    #[cfg(test)]
    pub fn is_open(&self, marker: Marker) -> bool {
        self.state(marker) == Some(MarkerState::Open)
    }

    pub fn is_done(&self, marker: Marker) -> bool {
        self.state(marker) == Some(MarkerState::Done)
    }

    /// Kind of a committed marker.
    pub fn kind(&self, marker: Marker) -> Option<SyntaxKind> {
        self.markers
            .get(marker.index())
            .filter(|data| data.state == MarkerState::Done)
            .and_then(|data| data.kind)
    }

    pub fn error(&self, marker: Marker) -> Option<&SyntaxError> {
        self.markers
            .get(marker.index())
            .and_then(|data| data.error.as_deref())
    }

    pub fn start(&self, marker: Marker) -> usize {
        self.markers.get(marker.index()).map_or(0, |data| data.start)
    }

    pub fn end(&self, marker: Marker) -> usize {
        self.markers.get(marker.index()).map_or(0, |data| data.end)
    }

    /// Committed nodes as `(kind, start, end)`, in event order.
    #[cfg(test)]
    pub(crate) fn done_nodes(&self) -> Vec<(SyntaxKind, usize, usize)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Event::Start(m) if self.is_done(m) => {
                    let data = &self.markers[m.index()];
                    data.kind.map(|kind| (kind, data.start, data.end))
                }
                _ => None,
            })
            .collect()
    }

    /// Build the final tree under an implicit `root` node spanning the whole
    /// input.
    ///
    /// Tokens not covered by any node, including leading and trailing ones,
    /// become children of the root. If the first committed marker is itself
    /// a `root` node it is merged into the implicit root.
    pub fn build(&self, tokens: &TokenList, language: &dyn Language, root: SyntaxKind) -> SyntaxNode {
        let merged = self
            .events
            .iter()
            .find_map(|event| match *event {
                Event::Start(m) if self.is_done(m) => Some(m),
                _ => None,
            })
            .filter(|&m| self.kind(m) == Some(root));

        let mut stack = vec![PendingNode::new(None, root, None, 0)];
        let mut next = 0;
        for event in &self.events {
            match *event {
                Event::Start(m) if self.is_done(m) && Some(m) != merged => {
                    let (start, _) = self.trimmed_range(m, tokens, language);
                    emit_tokens(&mut stack, tokens, &mut next, start);
                    let data = &self.markers[m.index()];
                    stack.push(PendingNode::new(
                        Some(m),
                        data.kind.unwrap_or(SyntaxKind::ERROR),
                        data.error.clone(),
                        tokens.start(next),
                    ));
                }
                Event::Finish(m) if self.is_done(m) && Some(m) != merged => {
                    if !stack.iter().any(|pending| pending.marker == Some(m)) {
                        continue;
                    }
                    let (_, end) = self.trimmed_range(m, tokens, language);
                    emit_tokens(&mut stack, tokens, &mut next, end);
                    while stack.len() > 1 {
                        let Some(pending) = stack.pop() else { break };
                        let closes = pending.marker == Some(m);
                        attach(&mut stack, pending.into_node());
                        if closes {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
        emit_tokens(&mut stack, tokens, &mut next, tokens.len());
        while stack.len() > 1 {
            if let Some(pending) = stack.pop() {
                attach(&mut stack, pending.into_node());
            }
        }

        let source_len = u32::try_from(tokens.source().len()).unwrap_or(u32::MAX);
        match stack.pop() {
            Some(root_pending) => SyntaxNode::new(
                root,
                Span::new(0, source_len),
                None,
                root_pending.children,
            ),
            None => SyntaxNode::new(root, Span::new(0, source_len), None, Vec::new()),
        }
    }

    fn alloc(&mut self, start: usize) -> Marker {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a parse cannot open four billion markers"
        )]
        let marker = Marker(self.markers.len() as u32);
        self.markers.push(MarkerData {
            start,
            end: start,
            kind: None,
            error: None,
            state: MarkerState::Open,
        });
        marker
    }

    fn finish(&mut self, marker: Marker, kind: SyntaxKind, error: Option<Box<SyntaxError>>, pos: usize) {
        let Some(data) = self.markers.get_mut(marker.index()) else {
            return;
        };
        if data.state != MarkerState::Open {
            warn!(?marker, state = ?data.state, "commit of a marker that is not open");
            return;
        }
        data.state = MarkerState::Done;
        data.end = pos.max(data.start);
        data.kind = Some(kind);
        data.error = error;
        self.events.push(Event::Finish(marker));
    }

    fn state(&self, marker: Marker) -> Option<MarkerState> {
        self.markers.get(marker.index()).map(|data| data.state)
    }

    fn is_live(&self, event: Event) -> bool {
        match event {
            Event::Start(m) => matches!(self.state(m), Some(MarkerState::Open | MarkerState::Done)),
            Event::Finish(m) => self.is_done(m),
            Event::Drop(..) => false,
        }
    }

    /// Marker range with leading and trailing trivia removed.
    fn trimmed_range(&self, marker: Marker, tokens: &TokenList, language: &dyn Language) -> (usize, usize) {
        let data = &self.markers[marker.index()];
        let is_trivia = |index: usize| tokens.kind(index).is_some_and(|kind| language.is_trivia(kind));
        let (mut start, mut end) = (data.start, data.end.max(data.start));
        while start < end && is_trivia(start) {
            start += 1;
        }
        while end > start && is_trivia(end - 1) {
            end -= 1;
        }
        (start, end)
    }
}

struct PendingNode {
    marker: Option<Marker>,
    kind: SyntaxKind,
    error: Option<Box<SyntaxError>>,
    offset: u32,
    children: Vec<SyntaxElement>,
}

impl PendingNode {
    fn new(marker: Option<Marker>, kind: SyntaxKind, error: Option<Box<SyntaxError>>, offset: u32) -> Self {
        PendingNode {
            marker,
            kind,
            error,
            offset,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> SyntaxNode {
        let span = match (self.children.first(), self.children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::point(self.offset),
        };
        SyntaxNode::new(self.kind, span, self.error, self.children)
    }
}

fn emit_tokens(stack: &mut [PendingNode], tokens: &TokenList, next: &mut usize, until: usize) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    while *next < until {
        let Some(token) = tokens.tokens().get(*next) else {
            break;
        };
        parent.children.push(SyntaxElement::Token(*token));
        *next += 1;
    }
}

fn attach(stack: &mut [PendingNode], node: SyntaxNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(SyntaxElement::Node(node));
    }
}

#[cfg(test)]
mod tests;
