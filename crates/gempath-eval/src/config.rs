use serde::{Deserialize, Serialize};

/// Dispatch budget shared by commands, loop iterations, calls and guard
/// evaluations.
pub const DEFAULT_OPERATION_BUDGET: u32 = 10_000;

/// Iteration ceiling for a single `while` statement.
pub const DEFAULT_WHILE_ITERATION_LIMIT: u32 = 10_000;

/// Simulation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub operation_budget: u32,
    pub while_iteration_limit: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            operation_budget: DEFAULT_OPERATION_BUDGET,
            while_iteration_limit: DEFAULT_WHILE_ITERATION_LIMIT,
        }
    }
}

impl SimulationConfig {
    pub fn with_operation_budget(mut self, budget: u32) -> Self {
        self.operation_budget = budget;
        self
    }

    pub fn with_while_iteration_limit(mut self, limit: u32) -> Self {
        self.while_iteration_limit = limit;
        self
    }
}
