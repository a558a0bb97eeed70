//! Parser options

/// Limits for the ambiguity search and error recovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tokens simulated per candidate when an action cell is ambiguous
    pub ambiguity_lookahead: usize,
    /// Automaton steps allowed per simulation
    pub step_budget: usize,
    /// Tokens past the repaired one that a recovery must parse cleanly
    pub recovery_validation: usize,
    /// Missing tokens that may be inserted at one input position
    pub max_insertions: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ambiguity_lookahead: 16,
            step_budget: 512,
            recovery_validation: 2,
            max_insertions: 3,
        }
    }
}

impl ParseOptions {
    /// Options with a different ambiguity window
    pub fn with_lookahead(mut self, tokens: usize) -> Self {
        self.ambiguity_lookahead = tokens.max(1);
        self
    }

    /// Work budget for a whole simulation window
    pub(crate) fn simulation_steps(&self) -> usize {
        self.step_budget.max(self.ambiguity_lookahead)
    }
}
