mod analyze;
mod decide;
mod propagate;
mod store;

use self::analyze::Learned;
use self::propagate::Watches;
use self::store::Store;
use crate::config::SolverConfig;
use crate::error::{InvalidInstance, ResourceBudgetExhausted, UnsatisfiableInstance};
use crate::formula::Formula;
use crate::SatResult;
use log::{debug, trace};
use std::fmt::{self, Display, Formatter};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClauseIdx(pub(crate) usize);

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub(crate) struct DecisionLevel(pub(crate) usize);

impl DecisionLevel {
    fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Propagating,
    Deciding,
    Learning(ClauseIdx),
    Satisfied,
    Unsatisfiable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub learned_clauses: u64,
    pub max_decision_level: usize,
}

impl Display for SolverStats {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "decisions: {}, propagations: {}, conflicts: {}, learned clauses: {}, max level: {}",
            self.decisions, self.propagations, self.conflicts, self.learned_clauses, self.max_decision_level
        )
    }
}

/// Limits for one call to [`Solver::solve`].
struct Budget {
    conflict_limit: Option<u64>,
    conflicts_at_start: u64,
    deadline: Option<(Instant, std::time::Duration)>,
}

impl Budget {
    fn start(config: &SolverConfig, conflicts: u64) -> Self {
        Self {
            conflict_limit: config.conflict_limit,
            conflicts_at_start: conflicts,
            deadline: config.time_limit.map(|limit| (Instant::now(), limit)),
        }
    }

    fn check(&self, conflicts: u64) -> Result<(), ResourceBudgetExhausted> {
        if let Some(limit) = self.conflict_limit {
            if conflicts - self.conflicts_at_start >= limit {
                return Err(ResourceBudgetExhausted::Conflicts(limit));
            }
        }
        if let Some((started, limit)) = self.deadline {
            if started.elapsed() >= limit {
                return Err(ResourceBudgetExhausted::Time(limit));
            }
        }
        Ok(())
    }
}

/// A CDCL solver for one formula.
///
/// A `Satisfiable` or `Unsatisfiable` verdict is final and returned again by later calls to
/// [`Solver::solve`]. After `Unknown` the search state (including learned clauses) is kept, and the
/// next call continues from decision level 0.
pub struct Solver {
    store: Store,
    watches: Watches,
    /// Trail entries before this index have had their watch lists processed.
    propagated: usize,
    config: SolverConfig,
    stats: SolverStats,
    outcome: Option<SatResult>,
}

impl Solver {
    pub fn new(formula: &Formula) -> Result<Self, InvalidInstance> {
        Self::with_config(formula, SolverConfig::default())
    }

    /// Fails on literals outside `1..=formula.num_variables()`. An empty clause is not an error:
    /// the solver is created already refuted and `solve` answers without searching.
    pub fn with_config(formula: &Formula, config: SolverConfig) -> Result<Self, InvalidInstance> {
        let (store, refuted) = match Store::load(formula) {
            Ok(store) => (store, false),
            Err(InvalidInstance::EmptyClause(idx)) => {
                debug!("clause {} is empty, formula is unsatisfiable", idx);
                (Store::empty(formula.num_variables()), true)
            }
            Err(e) => return Err(e),
        };

        let mut watches = Watches::new(store.num_variables());
        for idx in store.clause_indices() {
            let clause = store.clause(idx);
            if clause.len() >= 2 {
                watches.watch(clause.watched_literal(0), idx);
                watches.watch(clause.watched_literal(1), idx);
            }
        }

        let mut solver = Self {
            store,
            watches,
            propagated: 0,
            config,
            stats: Default::default(),
            outcome: if refuted { Some(SatResult::Unsatisfiable) } else { None },
        };
        if solver.outcome.is_none() && solver.assert_units().is_err() {
            solver.outcome = Some(SatResult::Unsatisfiable);
        }
        Ok(solver)
    }

    /// Puts the literal of every unit clause on the trail at level 0.
    fn assert_units(&mut self) -> Result<(), ClauseIdx> {
        for idx in self.store.clause_indices() {
            let clause = self.store.clause(idx);
            if clause.len() != 1 {
                continue;
            }
            let literal = clause.literals()[0];
            if self.store.is_falsified(&literal) {
                debug!("unit clause {} contradicts an earlier unit", idx.0);
                return Err(idx);
            }
            if !self.store.is_satisfied(&literal) {
                self.store
                    .assign(*literal.variable(), literal.is_positive(), DecisionLevel(0), Some(idx));
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Takes effect at the next call to [`Solver::solve`].
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn solve(&mut self) -> SatResult {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let budget = Budget::start(&self.config, self.stats.conflicts);
        let mut state = State::Propagating;
        let result = loop {
            self.check_level_invariant();

            if state != State::Satisfied && state != State::Unsatisfiable {
                if let Err(exhausted) = budget.check(self.stats.conflicts) {
                    debug!("stopping search: {}", exhausted);
                    // a pending conflict or unfinished propagation is rediscovered on the next call
                    self.store.backtrack_to(DecisionLevel(0));
                    self.propagated = 0;
                    break SatResult::Unknown;
                }
            }

            state = match state {
                State::Propagating => match self.propagate() {
                    Ok(()) => State::Deciding,
                    Err(conflict) => State::Learning(conflict),
                },
                State::Deciding => match self.store.pick_branch_variable() {
                    None => State::Satisfied,
                    Some((variable, value)) => {
                        self.stats.decisions += 1;
                        self.store.decision_level = self.store.decision_level.next();
                        let level = self.store.decision_level;
                        self.stats.max_decision_level = self.stats.max_decision_level.max(level.0);
                        self.store.assign(variable, value, level, None);
                        State::Propagating
                    }
                },
                State::Learning(conflict) => {
                    self.stats.conflicts += 1;
                    match self.analyze(conflict) {
                        Err(UnsatisfiableInstance) => State::Unsatisfiable,
                        Ok(learned) => {
                            self.learn(learned);
                            State::Propagating
                        }
                    }
                }
                State::Satisfied => break SatResult::Satisfiable(self.store.model()),
                State::Unsatisfiable => break SatResult::Unsatisfiable,
            };
        };

        debug!("{}: {}", result.verdict(), self.stats);
        if result != SatResult::Unknown {
            self.outcome = Some(result.clone());
        }
        result
    }

    /// Backtracks to the learned clause's level and asserts its first literal with the clause as
    /// the reason.
    fn learn(&mut self, learned: Learned) {
        let Learned {
            clause,
            backtrack_level,
        } = learned;
        self.store.backtrack_to(backtrack_level);
        // everything up to the target level was propagated before the next decision was made
        self.propagated = self.store.trail.len();

        let asserting = clause.as_slice()[0];
        let len = clause.len();
        let idx = self.store.add_learned(clause, backtrack_level);
        if len >= 2 {
            let stored = self.store.clause(idx);
            self.watches.watch(stored.watched_literal(0), idx);
            self.watches.watch(stored.watched_literal(1), idx);
        }
        trace!(
            "installed learned clause {} ({} learned so far)",
            idx.0,
            self.store.num_learned()
        );
        self.stats.learned_clauses += 1;

        self.store
            .assign(*asserting.variable(), asserting.is_positive(), backtrack_level, Some(idx));
    }

    fn check_level_invariant(&self) {
        if let Some(v) = self.store.trail.last() {
            debug_assert_eq!(self.store.state(v).decision_level, self.store.decision_level);
        }
    }
}
