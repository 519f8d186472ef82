//! Unit propagation over two watched literals per clause.
//!
//! A clause with at least two literals is registered on the watch lists of exactly two of its
//! literals. It only needs another look when one of those becomes false: then either some other
//! non-false literal takes over the watch, the clause is already satisfied by its other watch, it
//! is unit, or it is falsified.

use super::{ClauseIdx, Solver};
use crate::formula::Literal;
use std::mem;

#[derive(Debug)]
pub(crate) struct Watches {
    lists: Vec<Vec<ClauseIdx>>,
}

impl Watches {
    pub(crate) fn new(num_variables: usize) -> Self {
        Self {
            lists: vec![vec![]; 2 * num_variables],
        }
    }

    pub(crate) fn watch(&mut self, literal: Literal, clause: ClauseIdx) {
        self.lists[literal.code()].push(clause);
    }

    #[cfg(test)]
    pub(crate) fn watching(&self, literal: Literal) -> &[ClauseIdx] {
        &self.lists[literal.code()]
    }

    fn take(&mut self, literal: Literal) -> Vec<ClauseIdx> {
        mem::take(&mut self.lists[literal.code()])
    }

    fn restore(&mut self, literal: Literal, clauses: Vec<ClauseIdx>) {
        let list = &mut self.lists[literal.code()];
        // a watch only ever moves to a non-false literal, so nothing was added here meanwhile
        debug_assert!(list.is_empty());
        *list = clauses;
    }
}

enum Visit {
    Kept,
    Moved,
    Conflict,
}

impl Solver {
    /// Propagates every trail entry not yet propagated. Stops at the first falsified clause and
    /// returns it.
    pub(crate) fn propagate(&mut self) -> Result<(), ClauseIdx> {
        while self.propagated < self.store.trail.len() {
            let v = self.store.trail[self.propagated];
            self.propagated += 1;
            let falsified = self.store.state(&v).literal(v).negated();

            let mut watchers = self.watches.take(falsified);
            let mut result = Ok(());
            let mut i = 0;
            while i < watchers.len() {
                let idx = watchers[i];
                match self.visit(idx, falsified) {
                    Visit::Kept => i += 1,
                    Visit::Moved => {
                        watchers.swap_remove(i);
                    }
                    Visit::Conflict => {
                        result = Err(idx);
                        break;
                    }
                }
            }
            self.watches.restore(falsified, watchers);
            result?;
        }
        Ok(())
    }

    fn visit(&mut self, idx: ClauseIdx, falsified: Literal) -> Visit {
        let store = &mut self.store;
        let clause = store.clause(idx);
        let slot = if clause.watched_literal(0) == falsified { 0 } else { 1 };
        debug_assert_eq!(clause.watched_literal(slot), falsified);

        let other = clause.watched_literal(1 - slot);
        if store.is_satisfied(&other) {
            return Visit::Kept;
        }

        let watched = clause.watched;
        let replacement = clause
            .literals()
            .iter()
            .enumerate()
            .find(|&(pos, l)| !watched.contains(&pos) && !store.is_falsified(l))
            .map(|(pos, l)| (pos, *l));
        if let Some((pos, literal)) = replacement {
            store.clause_mut(idx).watched[slot] = pos;
            self.watches.watch(literal, idx);
            return Visit::Moved;
        }

        if store.is_falsified(&other) {
            log::trace!("clause {} falsified at level {}", idx.0, store.decision_level.0);
            return Visit::Conflict;
        }

        let level = store.decision_level;
        store.assign(*other.variable(), other.is_positive(), level, Some(idx));
        self.stats.propagations += 1;
        Visit::Kept
    }
}
