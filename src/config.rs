use std::time::Duration;

pub mod defaults {
    pub const NUM_VARIABLES: usize = 10;
    pub const NUM_CLAUSES: usize = 30;
    pub const MIN_CLAUSE_LEN: usize = 2;
    pub const MAX_CLAUSE_LEN: usize = 5;
    pub const SEED: u64 = 42;
}

/// Resource limits for a single call to [`crate::Solver::solve`]. With no limits the search always
/// runs to a verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub conflict_limit: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    pub fn with_conflict_limit(mut self, limit: u64) -> Self {
        self.conflict_limit = Some(limit);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub num_variables: usize,
    pub num_clauses: usize,
    pub min_len: usize,
    /// Defaults to `max(min_len, num_variables / 2)`.
    pub max_len: Option<usize>,
}

impl GeneratorConfig {
    pub fn max_len(&self) -> usize {
        self.max_len
            .unwrap_or_else(|| self.min_len.max(self.num_variables / 2))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        use defaults::*;
        GeneratorConfig {
            num_variables: NUM_VARIABLES,
            num_clauses: NUM_CLAUSES,
            min_len: MIN_CLAUSE_LEN,
            max_len: Some(MAX_CLAUSE_LEN),
        }
    }
}
