use super::{ClauseIdx, DecisionLevel};
use crate::error::InvalidInstance;
use crate::formula::{Clause, Formula, Literal, Model, Variable};
use log::trace;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Assignment {
    True,
    False,
    Undecided,
}

#[derive(Debug, Clone)]
pub(crate) struct VariableState {
    pub(crate) assignment: Assignment,
    pub(crate) reason: Option<ClauseIdx>,
    pub(crate) decision_level: DecisionLevel,
}

impl VariableState {
    pub(crate) fn literal(&self, v: Variable) -> Literal {
        match self.assignment {
            Assignment::Undecided => panic!("cannot get literal for unassigned variable"),
            Assignment::True => Literal::Positive(v),
            Assignment::False => Literal::Negative(v),
        }
    }

    fn clear(&mut self) {
        self.assignment = Assignment::Undecided;
        self.reason = None;
        self.decision_level = DecisionLevel(0);
    }
}

impl Default for VariableState {
    fn default() -> Self {
        VariableState {
            assignment: Assignment::Undecided,
            reason: None,
            decision_level: DecisionLevel(0),
        }
    }
}

#[derive(Debug)]
pub(crate) struct StoredClause {
    clause: Clause,
    /// Positions in `clause` of the two watched literals. Meaningless for unit clauses.
    pub(crate) watched: [usize; 2],
    /// The level the search backtracked to when this clause was learned. `None` for input clauses.
    pub(crate) learned_at: Option<DecisionLevel>,
}

impl StoredClause {
    fn new(clause: Clause, learned_at: Option<DecisionLevel>) -> Self {
        Self {
            clause,
            watched: [0, 1],
            learned_at,
        }
    }

    pub(crate) fn literals(&self) -> &[Literal] {
        self.clause.as_slice()
    }

    pub(crate) fn watched_literal(&self, slot: usize) -> Literal {
        self.literals()[self.watched[slot]]
    }

    pub(crate) fn len(&self) -> usize {
        self.clause.len()
    }
}

/// The clause database together with the assignment and the trail that produced it.
#[derive(Debug)]
pub(crate) struct Store {
    clauses: Vec<StoredClause>,
    variables: Vec<VariableState>,
    pub(crate) trail: Vec<Variable>,
    pub(crate) decision_level: DecisionLevel,
}

impl Store {
    /// Validates and normalizes the input clauses. Tautologies are dropped and repeated literals
    /// removed, so every stored clause has distinct variables.
    pub(crate) fn load(formula: &Formula) -> Result<Self, InvalidInstance> {
        let num_variables = formula.num_variables();

        for (idx, clause) in formula.clauses().enumerate() {
            if let Some(literal) = clause.literals().find(|l| l.idx() == 0 || l.idx() > num_variables) {
                return Err(InvalidInstance::LiteralOutOfRange {
                    clause: idx,
                    literal: literal.to_dimacs(),
                    num_variables,
                });
            }
        }

        let mut clauses = vec![];
        for (idx, clause) in formula.clauses().enumerate() {
            match clause.normalized() {
                None => trace!("dropping tautology {} ({})", idx, clause),
                Some(c) if c.is_empty() => return Err(InvalidInstance::EmptyClause(idx)),
                Some(c) => clauses.push(StoredClause::new(c, None)),
            }
        }

        Ok(Self::with_clauses(num_variables, clauses))
    }

    pub(crate) fn empty(num_variables: usize) -> Self {
        Self::with_clauses(num_variables, vec![])
    }

    fn with_clauses(num_variables: usize, clauses: Vec<StoredClause>) -> Self {
        Self {
            clauses,
            variables: vec![Default::default(); num_variables],
            trail: vec![],
            decision_level: DecisionLevel(0),
        }
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn num_learned(&self) -> usize {
        self.clauses.iter().filter(|c| c.learned_at.is_some()).count()
    }

    pub(crate) fn clause(&self, idx: ClauseIdx) -> &StoredClause {
        &self.clauses[idx.0]
    }

    pub(crate) fn clause_mut(&mut self, idx: ClauseIdx) -> &mut StoredClause {
        &mut self.clauses[idx.0]
    }

    pub(crate) fn clause_indices(&self) -> impl Iterator<Item = ClauseIdx> {
        (0..self.clauses.len()).map(ClauseIdx)
    }

    pub(crate) fn add_learned(&mut self, clause: Clause, backtrack_level: DecisionLevel) -> ClauseIdx {
        self.clauses.push(StoredClause::new(clause, Some(backtrack_level)));
        ClauseIdx(self.clauses.len() - 1)
    }

    pub(crate) fn state(&self, v: &Variable) -> &VariableState {
        &self.variables[v.index()]
    }

    pub(crate) fn variable_states(&self) -> impl Iterator<Item = (Variable, &VariableState)> {
        self.variables.iter().enumerate().map(|(i, state)| (Variable(i + 1), state))
    }

    pub(crate) fn value_of(&self, v: &Variable) -> Assignment {
        self.state(v).assignment
    }

    pub(crate) fn assignment_for(&self, literal: &Literal) -> Assignment {
        match self.value_of(literal.variable()) {
            Assignment::True => {
                if literal.is_positive() {
                    Assignment::True
                } else {
                    Assignment::False
                }
            }
            Assignment::False => {
                if literal.is_positive() {
                    Assignment::False
                } else {
                    Assignment::True
                }
            }
            Assignment::Undecided => Assignment::Undecided,
        }
    }

    pub(crate) fn is_satisfied(&self, literal: &Literal) -> bool {
        self.assignment_for(literal) == Assignment::True
    }

    pub(crate) fn is_falsified(&self, literal: &Literal) -> bool {
        self.assignment_for(literal) == Assignment::False
    }

    pub(crate) fn assign(&mut self, v: Variable, value: bool, level: DecisionLevel, reason: Option<ClauseIdx>) {
        assert_eq!(self.value_of(&v), Assignment::Undecided);
        assert!(reason.is_some() || level > DecisionLevel(0));

        trace!(
            "{} {} at level {}",
            match reason {
                Some(c) => format!("implied({})", c.0),
                None => "decision".to_string(),
            },
            Literal::new(v, value),
            level.0
        );

        self.trail.push(v);
        let var = &mut self.variables[v.index()];
        var.assignment = if value { Assignment::True } else { Assignment::False };
        var.reason = reason;
        var.decision_level = level;
    }

    pub(crate) fn unassign(&mut self, v: &Variable) {
        self.variables[v.index()].clear();
    }

    /// Pops every assignment made above `level`, newest first.
    pub(crate) fn backtrack_to(&mut self, level: DecisionLevel) {
        let keep = self
            .trail
            .iter()
            .position(|v| self.state(v).decision_level > level)
            .unwrap_or_else(|| self.trail.len());
        trace!("backtrack to level {}: dropping {} of {}", level.0, self.trail.len() - keep, self.trail.len());
        while self.trail.len() > keep {
            if let Some(v) = self.trail.pop() {
                self.unassign(&v);
            }
        }
        self.decision_level = level;
    }

    /// Only meaningful once every variable is assigned.
    pub(crate) fn model(&self) -> Model {
        Model::new(self.variables.iter().map(|v| v.assignment == Assignment::True).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};

    #[test]
    fn load_normalizes() {
        let f = Formula::from_dimacs(3, vec![vec![1, -1, 2], vec![2, 2, -3], vec![3]]).unwrap();
        let store = Store::load(&f).unwrap();
        let clauses: Vec<_> = store.clause_indices().map(|i| store.clause(i).literals().to_vec()).collect();
        assert_eq!(clauses, vec![vec![p(2), n(3)], vec![p(3)]]);
        assert_eq!(store.num_learned(), 0);
    }

    #[test]
    fn load_rejects_out_of_range() {
        let f = Formula::from_dimacs(2, vec![vec![1, 2], vec![-3]]).unwrap();
        assert_eq!(
            Store::load(&f).unwrap_err(),
            InvalidInstance::LiteralOutOfRange {
                clause: 1,
                literal: -3,
                num_variables: 2
            }
        );
        let f = Formula::new(2, vec![Clause::new(vec![p(0)])]);
        assert!(matches!(
            Store::load(&f),
            Err(InvalidInstance::LiteralOutOfRange { literal: 0, .. })
        ));
    }

    #[test]
    fn range_errors_win_over_empty_clauses() {
        let f = Formula::from_dimacs(1, vec![vec![], vec![2]]).unwrap();
        assert!(matches!(Store::load(&f), Err(InvalidInstance::LiteralOutOfRange { .. })));
        let f = Formula::from_dimacs(1, vec![vec![1], vec![]]).unwrap();
        assert_eq!(Store::load(&f).unwrap_err(), InvalidInstance::EmptyClause(1));
    }

    #[test]
    fn assign_and_query() {
        let mut store = Store::empty(2);
        store.assign(Variable(1), false, DecisionLevel(1), None);
        assert_eq!(store.value_of(&Variable(1)), Assignment::False);
        assert_eq!(store.value_of(&Variable(2)), Assignment::Undecided);
        assert!(store.is_satisfied(&n(1)));
        assert!(store.is_falsified(&p(1)));
        assert!(!store.is_satisfied(&p(2)) && !store.is_falsified(&p(2)));
        store.unassign(&Variable(1));
        assert_eq!(store.value_of(&Variable(1)), Assignment::Undecided);
    }

    #[test]
    fn backtrack_truncates_trail() {
        let f = Formula::from_dimacs(4, vec![vec![1]]).unwrap();
        let mut store = Store::load(&f).unwrap();
        store.assign(Variable(1), true, DecisionLevel(0), Some(ClauseIdx(0)));
        store.assign(Variable(2), true, DecisionLevel(1), None);
        store.assign(Variable(3), false, DecisionLevel(2), None);
        store.assign(Variable(4), true, DecisionLevel(2), Some(ClauseIdx(0)));
        store.decision_level = DecisionLevel(2);

        store.backtrack_to(DecisionLevel(1));
        assert_eq!(store.trail, vec![Variable(1), Variable(2)]);
        assert_eq!(store.decision_level, DecisionLevel(1));
        assert_eq!(store.value_of(&Variable(3)), Assignment::Undecided);
        assert_eq!(store.state(&Variable(4)).reason, None);

        store.backtrack_to(DecisionLevel(0));
        assert_eq!(store.trail, vec![Variable(1)]);
        assert_eq!(store.value_of(&Variable(1)), Assignment::True);
    }

    #[test]
    #[should_panic]
    fn decisions_need_a_level() {
        let mut store = Store::empty(1);
        store.assign(Variable(1), true, DecisionLevel(0), None);
    }
}
