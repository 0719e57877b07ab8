/// Configuration for the table-driven parse driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Largest number of symbols the parse stack may hold
    pub max_stack_depth: usize,

    /// Record every step of the parse in the outcome
    pub trace: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 10_000,
            trace: false,
        }
    }
}

impl ParseConfig {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_stack_depth(mut self, max_stack_depth: usize) -> Self {
        self.max_stack_depth = max_stack_depth;
        self
    }
}
