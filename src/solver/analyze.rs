use super::{ClauseIdx, DecisionLevel, Solver};
use crate::error::UnsatisfiableInstance;
use crate::formula::{Clause, Literal};

#[derive(Debug)]
pub(crate) struct Learned {
    /// The asserting literal comes first, followed by a literal from `backtrack_level` if there is one.
    pub(crate) clause: Clause,
    pub(crate) backtrack_level: DecisionLevel,
}

impl Solver {
    /// First-UIP conflict analysis.
    ///
    /// Resolves the conflicting clause with the reasons of the current level's implied literals,
    /// walking the trail backwards, until a single literal of the current level is left. Literals
    /// set at level 0 are dropped along the way, as they are false under every future assignment.
    pub(crate) fn analyze(&self, conflict: ClauseIdx) -> Result<Learned, UnsatisfiableInstance> {
        let store = &self.store;
        let current = store.decision_level;
        if current == DecisionLevel(0) {
            return Err(UnsatisfiableInstance);
        }

        let mut seen = vec![false; store.num_variables()];
        let mut learned: Vec<Literal> = vec![];
        // current-level literals still to be resolved away
        let mut frontier = 0;
        let mut trail_end = store.trail.len();
        let mut reason = conflict;

        let uip = loop {
            for l in store.clause(reason).literals() {
                let v = l.variable();
                let state = store.state(v);
                if seen[v.index()] || state.decision_level == DecisionLevel(0) {
                    continue;
                }
                seen[v.index()] = true;

                if state.decision_level < current {
                    learned.push(*l);
                } else {
                    debug_assert_eq!(state.decision_level, current);
                    frontier += 1;
                }
            }

            let v = loop {
                trail_end -= 1;
                let v = store.trail[trail_end];
                if seen[v.index()] {
                    break v;
                }
            };

            frontier -= 1;
            if frontier == 0 {
                break v;
            }
            reason = store
                .state(&v)
                .reason
                .expect("only the decision at the conflict level lacks a reason");
        };

        let level_of = |l: &Literal| store.state(l.variable()).decision_level;
        let backtrack_level = learned.iter().map(level_of).max().unwrap_or(DecisionLevel(0));
        if let Some(pos) = learned.iter().position(|l| level_of(l) == backtrack_level) {
            learned.swap(0, pos);
        }
        learned.insert(0, store.state(&uip).literal(uip).negated());

        let clause = Clause::new(learned);
        log::trace!("learned clause {}, backtrack to level {}", clause, backtrack_level.0);
        Ok(Learned {
            clause,
            backtrack_level,
        })
    }
}
