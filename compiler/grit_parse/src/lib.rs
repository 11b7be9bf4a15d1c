//! Backtracking parser runtime for generated recursive-descent grammars.
//!
//! Grammar rules are plain functions `fn(&mut Parser<'_>, u32) -> bool`
//! that bracket their bodies with [`Parser::enter_section`] and
//! [`Parser::exit_section`] and test tokens with the `consume_*` and
//! `next_token_is*` primitives. The runtime takes care of everything a
//! generated parser should not have to spell out:
//!
//! - building the tree through markers that can be committed, dropped,
//!   rolled back or wrapped after the fact
//! - shaping nodes on section exit (`COLLAPSE`, `LEFT`, `LEFT_INNER`,
//!   `UPPER`) and `AND`/`NOT` lookahead
//! - remembering what every failed test expected and turning it into
//!   `expected: ...` errors at the right place, once
//! - skipping garbage after a rule (eat-more recovery) and folding long
//!   runs into balanced chunks
//! - code completion candidates
//!
//! Syntax errors end up as error nodes in the tree. Grammar or engine
//! defects (unbalanced sections, runaway recursion, loops that do not
//! consume) are a [`FatalError`] that aborts the session.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=grit_parse=debug`: error reports, recovery and balancing,
//!   once [`init_tracing`] has run
//! - `RUST_LOG=grit_parse=trace`: every section enter/exit as well
//! - `GRIT_LOG_TREE=1`: indent the trace by section nesting
//! - `GRIT_MAX_RECURSION_LEVEL`: see [`ParserConfig::from_env`]

mod balance;
mod builder;
mod completion;
mod config;
mod cursor;
mod error;
mod frame;
mod hooks;
mod parser;
mod primitives;
mod recovery;
mod section;
mod stack;
mod tree;
mod variants;

#[cfg(test)]
mod test_grammar;

pub use builder::Marker;
pub use config::{ParserConfig, MAX_RECURSION_LEVEL_VAR};
pub use error::FatalError;
pub use frame::Modifiers;
pub use hooks::Hook;
pub use parser::{ParseOutput, Parser, Rule, TokenAdvancer, TrueCondition};
pub use primitives::Pin;
pub use stack::ensure_sufficient_stack;
pub use tree::{Descendants, SyntaxElement, SyntaxError, SyntaxNode};

use std::sync::Once;

use grit_ir::{Language, SyntaxKind, TokenList};

/// Parse `tokens` with `rule` as the root rule, using limits from the
/// environment and English messages.
pub fn parse(tokens: &TokenList, language: &dyn Language, root: SyntaxKind, rule: &dyn Rule) -> ParseOutput {
    Parser::new(tokens, language).parse(root, rule)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = std::env::var_os("GRIT_LOG_TREE").is_some();
            tracing_subscriber::registry()
                .with(tree.then(|| HierarchicalLayer::new(2).with_targets(true)))
                .with((!tree).then(|| fmt::layer().with_target(true).with_level(true)))
                .with(filter)
                .init();
        }
    });
}
