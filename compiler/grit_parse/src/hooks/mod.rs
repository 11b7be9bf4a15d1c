//! Section exit hooks.
//!
//! A hook is registered from inside a rule body and belongs to the section
//! level it was registered at. When that section exits, the hook receives
//! the node the section just committed (or `None` if it failed) and returns
//! the marker the next hook at the same level should see. Hooks are how
//! grammars adjust edge binding or re-tag nodes after the fact.

use grit_ir::SyntaxKind;
use tracing::trace;

use crate::builder::Marker;
use crate::error::FatalError;
use crate::parser::Parser;

/// Callback run when the section it was registered in exits.
///
/// Implemented for every `fn(&mut Parser<'_>, Option<Marker>) -> Option<Marker>`.
pub trait Hook {
    fn run(&self, p: &mut Parser<'_>, marker: Option<Marker>) -> Option<Marker>;
}

impl<F> Hook for F
where
    F: Fn(&mut Parser<'_>, Option<Marker>) -> Option<Marker>,
{
    fn run(&self, p: &mut Parser<'_>, marker: Option<Marker>) -> Option<Marker> {
        self(p, marker)
    }
}

pub(crate) struct HookEntry<'a> {
    level: u32,
    hook: Box<dyn Hook + 'a>,
}

impl<'a> Parser<'a> {
    /// Attach `hook` to the innermost open section.
    pub fn register_hook(&mut self, hook: impl Hook + 'a) {
        trace!(level = self.level, "register hook");
        self.hooks.push(HookEntry {
            level: self.level,
            hook: Box::new(hook),
        });
    }

    /// Run and discard the hooks of the section that is exiting. `kind` is
    /// what the section committed, `None` if it produced nothing.
    pub(crate) fn run_hooks(&mut self, kind: Option<SyntaxKind>) {
        if self.hooks.is_empty() {
            return;
        }
        let mut marker = kind.and(self.builder.latest_done());
        if let (Some(kind), None) = (kind, marker) {
            let kind = self.cursor.language().kind_name(kind).into_owned();
            let offset = self.cursor.current_offset();
            self.raise(FatalError::MissingDoneMarker { kind, offset });
        }
        while self.hooks.last().is_some_and(|entry| entry.level >= self.level) {
            let Some(entry) = self.hooks.pop() else {
                break;
            };
            if entry.level == self.level {
                marker = entry.hook.run(self, marker);
            }
        }
    }
}
