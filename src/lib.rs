pub mod config;
pub mod error;
pub mod formula;
pub mod generator;
mod solver;
mod verify;

#[cfg(test)]
mod brute_force;

pub use config::{GeneratorConfig, SolverConfig};
pub use error::{InvalidInstance, ResourceBudgetExhausted};
pub use formula::dimacs;
pub use formula::{Clause, Formula, Literal, Model, Variable};
pub use generator::{Generator, GeneratorError};
pub use solver::{Solver, SolverStats};
pub use verify::verify;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Model),
    Unsatisfiable,
    /// A configured budget ran out before a verdict was reached.
    Unknown,
}

impl SatResult {
    pub fn model(&self) -> Option<&Model> {
        match self {
            SatResult::Satisfiable(model) => Some(model),
            _ => None,
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            SatResult::Satisfiable(_) => "SATISFIABLE",
            SatResult::Unsatisfiable => "UNSATISFIABLE",
            SatResult::Unknown => "UNKNOWN",
        }
    }
}

/// Solves `formula` with no resource limits.
pub fn solve(formula: &Formula) -> Result<SatResult, InvalidInstance> {
    Ok(Solver::new(formula)?.solve())
}
