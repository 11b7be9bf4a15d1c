//! Shared vocabulary for grit grammars and the parsing runtime.
//!
//! Everything the runtime consumes from the outside world lives here:
//! - [`TokenList`]: the lexer's output, random-access so the parser can rewind
//! - [`SyntaxKind`] / [`KindSet`]: opaque token and node kinds
//! - [`Language`]: trivia classification, kind relations, delimiter pairs
//!
//! The crate has no knowledge of any concrete grammar. A grammar allocates
//! its kinds from [`SyntaxKind::FIRST_USER`] and describes itself through a
//! [`Language`] implementation, usually a [`KindTable`].

mod kind;
mod language;
mod span;
mod token;

pub use kind::{KindSet, KindSetIter, SyntaxKind};
pub use language::{DelimiterPair, KindTable, Language};
pub use span::Span;
pub use token::{Token, TokenList};
