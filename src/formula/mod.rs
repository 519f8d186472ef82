pub mod dimacs;

use crate::error::InvalidInstance;
use std::fmt::Debug;
use std::fmt::{self, Display, Formatter};

/// A propositional variable. Variables are numbered from 1, as in DIMACS.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

impl Variable {
    /// Dense 0-based index, for per-variable tables.
    pub(crate) fn index(self) -> usize {
        self.0 - 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    pub fn new(variable: Variable, positive: bool) -> Self {
        if positive {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        }
    }

    /// Decodes a signed integer literal. Returns `None` for 0, which DIMACS reserves as the clause terminator.
    pub fn from_dimacs(l: i64) -> Option<Self> {
        if l > 0 {
            Some(Literal::Positive(Variable(l as usize)))
        } else if l < 0 {
            Some(Literal::Negative(Variable(l.unsigned_abs() as usize)))
        } else {
            None
        }
    }

    pub fn to_dimacs(&self) -> i64 {
        match self {
            Literal::Positive(Variable(x)) => *x as i64,
            Literal::Negative(Variable(x)) => -(*x as i64),
        }
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    // Positive and negative literals of variable v sit next to each other: 2(v-1) and 2(v-1)+1.
    pub(crate) fn code(&self) -> usize {
        2 * self.variable().index() + if self.is_positive() { 0 } else { 1 }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.to_dimacs())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[Literal] {
        &self.literals
    }

    /// Drops repeated literals, keeping the first occurrence of each. Returns `None` if the clause
    /// contains a literal and its negation, as such a clause is satisfied by every assignment.
    pub fn normalized(&self) -> Option<Clause> {
        let mut literals: Vec<Literal> = Vec::with_capacity(self.literals.len());
        for literal in &self.literals {
            if literals.contains(&literal.negated()) {
                return None;
            }
            if !literals.contains(literal) {
                literals.push(*literal);
            }
        }
        Some(Clause { literals })
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let mut first_literal = true;
        for literal in &self.literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" ∨ ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

/// A CNF problem instance: a declared number of variables and a sequence of clauses over them.
#[derive(Clone, PartialEq, Eq)]
pub struct Formula {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(num_variables: usize, conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            num_variables,
            clauses: conjuncts.into_iter().collect(),
        }
    }

    /// Builds a formula from signed-integer clauses, e.g. `[[1, -2], [2]]`.
    pub fn from_dimacs<C, L>(num_variables: usize, clauses: C) -> Result<Self, InvalidInstance>
    where
        C: IntoIterator<Item = L>,
        L: IntoIterator<Item = i64>,
    {
        let mut converted = vec![];
        for (clause_idx, clause) in clauses.into_iter().enumerate() {
            let mut literals = vec![];
            for l in clause {
                let literal = Literal::from_dimacs(l).ok_or(InvalidInstance::LiteralOutOfRange {
                    clause: clause_idx,
                    literal: l,
                    num_variables,
                })?;
                literals.push(literal);
            }
            converted.push(Clause::new(literals));
        }
        Ok(Formula::new(num_variables, converted))
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            if clause.literals.len() > 1 {
                f.write_str("(")?;
            }
            let mut first_literal = true;
            for literal in &clause.literals {
                if first_literal {
                    first_literal = false;
                } else {
                    f.write_str(" | ")?;
                }
                match literal {
                    Literal::Positive(Variable(x)) => f.write_fmt(format_args!("{}", x))?,
                    Literal::Negative(Variable(x)) => f.write_fmt(format_args!("!{}", x))?,
                }
            }
            if clause.literals.len() > 1 {
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

/// A complete assignment to variables `1..=N`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, variable: Variable) -> Option<bool> {
        if variable.0 == 0 {
            return None;
        }
        self.values.get(variable.index()).copied()
    }

    pub fn satisfies(&self, literal: &Literal) -> bool {
        self.value(*literal.variable()) == Some(literal.is_positive())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.values.iter().enumerate().map(|(i, value)| (Variable(i + 1), *value))
    }

    /// The model as the list of true literals, one per variable.
    pub fn literals(&self) -> Vec<Literal> {
        self.iter().map(|(v, value)| Literal::new(v, value)).collect()
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let literals = self.literals();
        let mut first_literal = true;
        for literal in &literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// Random formulas over at most `max_vars` variables with clauses of 1 to 3 literals. Repeated and
/// complementary literals are left in, so loading has to cope with them.
#[cfg(test)]
pub(crate) fn formula_3sat_strategy(
    max_vars: usize,
    max_clauses: usize,
) -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1..=max_vars).prop_flat_map(move |num_vars| {
        let literal = (1..=num_vars, any::<bool>()).prop_map(|(v, positive)| Literal::new(Variable(v), positive));
        let clause = prop::collection::vec(literal, 1..=3).prop_map(Clause::new);
        prop::collection::vec(clause, 0..=max_clauses).prop_map(move |clauses| Formula::new(num_vars, clauses))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_literals() {
        assert_eq!(Literal::from_dimacs(3), Some(p(3)));
        assert_eq!(Literal::from_dimacs(-7), Some(n(7)));
        assert_eq!(Literal::from_dimacs(0), None);
        assert_eq!(n(7).to_dimacs(), -7);
        assert_eq!(p(2).negated(), n(2));
    }

    #[test]
    fn literal_codes_are_dense() {
        assert_eq!(p(1).code(), 0);
        assert_eq!(n(1).code(), 1);
        assert_eq!(p(2).code(), 2);
        assert_eq!(n(3).code(), 5);
    }

    #[test]
    fn normalize_drops_duplicates() {
        let c = Clause::new(vec![n(1), p(2), n(1), p(2), p(3)]);
        assert_eq!(c.normalized(), Some(Clause::new(vec![n(1), p(2), p(3)])));
    }

    #[test]
    fn normalize_drops_tautologies() {
        let c = Clause::new(vec![p(1), p(2), n(1)]);
        assert_eq!(c.normalized(), None);
    }

    #[test]
    fn from_dimacs_rejects_zero() {
        let err = Formula::from_dimacs(2, vec![vec![1, 2], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            InvalidInstance::LiteralOutOfRange {
                clause: 1,
                literal: 0,
                num_variables: 2
            }
        );
    }

    #[test]
    fn debug_format() {
        let f = Formula::from_dimacs(3, vec![vec![1, -2], vec![3]]).unwrap();
        assert_eq!(format!("{:?}", f), "(1 | !2) & 3");
    }

    #[test]
    fn model_literals() {
        let m = Model::new(vec![true, false, true]);
        assert_eq!(m.literals(), vec![p(1), n(2), p(3)]);
        assert_eq!(m.to_string(), "1 -2 3");
        assert_eq!(m.value(Variable(0)), None);
        assert_eq!(m.value(Variable(4)), None);
        assert!(m.satisfies(&n(2)));
    }
}
