//! Ordered rule table with first-match-wins lookup.

use crate::config::ForwardRule;

/// Ordered collection of forwarding rules.
///
/// Rule order is configuration order. The table is immutable after
/// construction, so it can be shared across connection tasks without
/// locking.
pub struct RuleTable {
    rules: Vec<ForwardRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<ForwardRule>) -> Self {
        Self { rules }
    }

    /// Find the first rule whose prefix matches `path`.
    ///
    /// The scan stops at the first hit; a later rule with a longer or more
    /// specific prefix never overrides an earlier match. Returns `None`
    /// when nothing matches, including for an empty table.
    pub fn first_match(&self, path: &str) -> Option<&ForwardRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
