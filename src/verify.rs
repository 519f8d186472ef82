use crate::formula::{Formula, Model};

/// Checks that every clause of `formula` has at least one literal made true by `model`. Variables
/// the model does not mention count as false.
pub fn verify(formula: &Formula, model: &Model) -> bool {
    formula.clauses().all(|clause| {
        clause
            .literals()
            .any(|literal| model.value(*literal.variable()).unwrap_or(false) == literal.is_positive())
    })
}
