use super::store::{Assignment, Store};
use crate::formula::Variable;

impl Store {
    /// The lowest-numbered unassigned variable, to be tried true first. `None` once every variable
    /// has a value.
    ///
    /// Always starting with `true` is still complete: if the decision takes part in a conflict, the
    /// learned clause flips it after the backtrack.
    pub(crate) fn pick_branch_variable(&self) -> Option<(Variable, bool)> {
        self.variable_states()
            .find(|(_, state)| state.assignment == Assignment::Undecided)
            .map(|(v, _)| (v, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::DecisionLevel;

    #[test]
    fn picks_first_unassigned() {
        let mut store = Store::empty(3);
        assert_eq!(store.pick_branch_variable(), Some((Variable(1), true)));
        store.assign(Variable(1), false, DecisionLevel(1), None);
        store.assign(Variable(3), true, DecisionLevel(2), None);
        assert_eq!(store.pick_branch_variable(), Some((Variable(2), true)));
        store.assign(Variable(2), true, DecisionLevel(3), None);
        assert_eq!(store.pick_branch_variable(), None);
    }

    #[test]
    fn no_variables_nothing_to_pick() {
        assert_eq!(Store::empty(0).pick_branch_variable(), None);
    }
}
