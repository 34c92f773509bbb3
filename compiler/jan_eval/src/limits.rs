//! Opt-in bounds on a script run.
//!
//! The language itself has no timeout. Hosts that run untrusted scripts can
//! cap the number of calls a run may make and the depth of nested calls;
//! both are checked when a call starts, so a runaway loop without calls is
//! not caught by either.

use jan_values::{call_budget_exceeded, EvalError};

/// Limits applied to every process started from an environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunLimits {
    /// Maximum number of function and method calls per run.
    pub call_budget: Option<u32>,
    /// Maximum nesting of script function calls.
    pub max_depth: Option<usize>,
}

impl RunLimits {
    /// No call budget, and a depth limit only where the native stack
    /// cannot grow.
    pub fn unlimited() -> Self {
        RunLimits {
            call_budget: None,
            max_depth: if jan_stack::grows_stack() {
                None
            } else {
                Some(DEFAULT_MAX_DEPTH)
            },
        }
    }

    #[must_use]
    pub fn with_call_budget(mut self, budget: u32) -> Self {
        self.call_budget = Some(budget);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Depth limit used on targets without stack growth.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Largest string, in bytes, that string repetition and `format` padding
/// may produce (16 MiB). Longer results fail instead of allocating.
pub const MAX_STRING_BYTES: usize = 1 << 24;

/// Per-run call counter.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallBudget {
    calls: u32,
    budget: Option<u32>,
}

impl CallBudget {
    pub(crate) fn new(budget: Option<u32>) -> Self {
        CallBudget { calls: 0, budget }
    }

    /// Count one call, failing once the budget is spent.
    pub(crate) fn charge(&mut self) -> Result<(), EvalError> {
        self.calls = self.calls.saturating_add(1);
        match self.budget {
            Some(budget) if self.calls > budget => Err(call_budget_exceeded(self.calls, budget)),
            _ => Ok(()),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls
    }
}
