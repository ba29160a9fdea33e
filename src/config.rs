/// Iterations a single `%while` loop may run before the script is halted.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Nested function calls allowed before the script is halted.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Execution ceilings for one script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_iterations: usize,
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Limits {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_call_depth(mut self, n: usize) -> Self {
        self.max_call_depth = n;
        self
    }
}
