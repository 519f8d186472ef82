use std::time::Duration;
use thiserror::Error;

/// Malformed input, reported before any search begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInstance {
    #[error("clause {clause}: literal {literal} is out of range for {num_variables} variables")]
    LiteralOutOfRange {
        clause: usize,
        literal: i64,
        num_variables: usize,
    },
    /// Only surfaced by the clause store; [`crate::Solver`] turns it into an immediate `Unsatisfiable`.
    #[error("clause {0} is empty")]
    EmptyClause(usize),
}

/// Conflict analysis derived the empty clause: the conflict does not depend on any decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnsatisfiableInstance;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceBudgetExhausted {
    #[error("conflict limit of {0} reached")]
    Conflicts(u64),
    #[error("time limit of {0:?} reached")]
    Time(Duration),
}
