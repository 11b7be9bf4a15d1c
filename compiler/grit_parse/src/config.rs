//! Tunable limits of a parse session.
//!
//! Every threshold the runtime relies on lives here so grammars with unusual
//! shapes can adjust them without touching the engine. Only the recursion
//! ceiling is read from the environment.

use tracing::warn;

/// Environment variable overriding [`ParserConfig::max_recursion_level`].
pub const MAX_RECURSION_LEVEL_VAR: &str = "GRIT_MAX_RECURSION_LEVEL";

/// Limits applied by a [`Parser`](crate::Parser) session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest rule level a guarded rule may run at.
    pub max_recursion_level: u32,
    /// Live variants kept per list before the oldest quarter is evicted.
    pub max_variants: usize,
    /// Alternatives spelled out in an "expected" message.
    pub max_variants_to_display: usize,
    /// Characters of the offending token quoted in a message.
    pub max_error_token_text: usize,
    /// Fan-out of the tree balancer.
    pub max_children_in_tree: usize,
    /// Predicate nesting at which variants stop being recorded.
    pub predicate_depth_limit: u32,
    /// Extra variants a named frame with a kind must have recorded before
    /// its variants are replaced by its name.
    pub named_frame_slack: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_recursion_level: 1000,
            max_variants: 10_000,
            max_variants_to_display: 50,
            max_error_token_text: 20,
            max_children_in_tree: 10,
            predicate_depth_limit: 2,
            named_frame_slack: 2,
        }
    }
}

impl ParserConfig {
    /// Defaults, with the recursion ceiling taken from
    /// `GRIT_MAX_RECURSION_LEVEL` when it holds a valid number.
    pub fn from_env() -> Self {
        let raw = std::env::var(MAX_RECURSION_LEVEL_VAR).ok();
        ParserConfig::default().with_recursion_override(raw.as_deref())
    }

    pub(crate) fn with_recursion_override(self, raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => self,
            Some(raw) => match raw.parse::<u32>() {
                Ok(level) => self.with_max_recursion_level(level),
                Err(err) => {
                    warn!(value = raw, %err, "ignoring invalid {MAX_RECURSION_LEVEL_VAR}");
                    self
                }
            },
        }
    }

    #[must_use]
    pub fn with_max_recursion_level(mut self, level: u32) -> Self {
        self.max_recursion_level = level;
        self
    }

    /// Clamped to at least 4 so eviction always frees room.
    #[must_use]
    pub fn with_max_variants(mut self, max: usize) -> Self {
        self.max_variants = max.max(4);
        self
    }

    #[must_use]
    pub fn with_max_variants_to_display(mut self, max: usize) -> Self {
        self.max_variants_to_display = max.max(1);
        self
    }

    #[must_use]
    pub fn with_max_error_token_text(mut self, max: usize) -> Self {
        self.max_error_token_text = max;
        self
    }

    /// Clamped to at least 2; a fan-out of one would never shrink the tree.
    #[must_use]
    pub fn with_max_children_in_tree(mut self, max: usize) -> Self {
        self.max_children_in_tree = max.max(2);
        self
    }

    #[must_use]
    pub fn with_predicate_depth_limit(mut self, limit: u32) -> Self {
        self.predicate_depth_limit = limit;
        self
    }

    #[must_use]
    pub fn with_named_frame_slack(mut self, slack: usize) -> Self {
        self.named_frame_slack = slack;
        self
    }
}
