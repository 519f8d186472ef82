//! Random CNF instances with clause lengths drawn uniformly from a range.

use crate::config::GeneratorConfig;
use crate::formula::{Clause, Formula, Literal, Variable};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("cannot generate clauses over zero variables")]
    NoVariables,
    #[error("minimum clause length must be at least 1")]
    ZeroLength,
    #[error("minimum clause length {min_len} exceeds maximum {max_len}")]
    EmptyLengthRange { min_len: usize, max_len: usize },
    #[error("clauses of length {max_len} need at least {max_len} variables, have {num_variables}")]
    TooFewVariables { max_len: usize, num_variables: usize },
}

pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    /// Fails if `config` cannot produce clauses. Without a seed the generator is seeded from the OS.
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Result<Self, GeneratorError> {
        validate(&config)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&mut self) -> Formula {
        sample(&self.config, &mut self.rng)
    }
}

/// Generates one formula from a caller-owned source of randomness.
pub fn generate_with<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Result<Formula, GeneratorError> {
    validate(config)?;
    Ok(sample(config, rng))
}

fn validate(config: &GeneratorConfig) -> Result<(), GeneratorError> {
    let max_len = config.max_len();
    if config.num_clauses == 0 {
        return Ok(());
    }
    if config.num_variables == 0 {
        return Err(GeneratorError::NoVariables);
    }
    if config.min_len == 0 {
        return Err(GeneratorError::ZeroLength);
    }
    if config.min_len > max_len {
        return Err(GeneratorError::EmptyLengthRange {
            min_len: config.min_len,
            max_len,
        });
    }
    if max_len > config.num_variables {
        return Err(GeneratorError::TooFewVariables {
            max_len,
            num_variables: config.num_variables,
        });
    }
    Ok(())
}

fn sample<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Formula {
    let max_len = config.max_len();
    let mut clauses = Vec::with_capacity(config.num_clauses);
    for _ in 0..config.num_clauses {
        let len = rng.gen_range(config.min_len, max_len + 1);
        // distinct variables per clause, so a clause is never tautological
        let vars = index::sample(&mut *rng, config.num_variables, len);
        let mut literals = Vec::with_capacity(len);
        for i in vars.into_iter() {
            literals.push(Literal::new(Variable(i + 1), rng.gen::<bool>()));
        }
        clauses.push(Clause::new(literals));
    }
    let formula = Formula::new(config.num_variables, clauses);
    log::trace!("generated {:?}", formula);
    formula
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_env_log::test;

    fn config(num_variables: usize, num_clauses: usize, min_len: usize, max_len: usize) -> GeneratorConfig {
        GeneratorConfig {
            num_variables,
            num_clauses,
            min_len,
            max_len: Some(max_len),
        }
    }

    #[test]
    fn clauses_respect_bounds() {
        let mut g = Generator::new(config(10, 200, 2, 5), Some(7)).unwrap();
        let f = g.generate();
        assert_eq!(f.num_variables(), 10);
        assert_eq!(f.num_clauses(), 200);
        for clause in f.clauses() {
            assert!(clause.len() >= 2 && clause.len() <= 5, "bad length: {}", clause);
            let vars: HashSet<_> = clause.literals().map(|l| l.idx()).collect();
            assert_eq!(vars.len(), clause.len(), "repeated variable in {}", clause);
            assert!(vars.iter().all(|&v| v >= 1 && v <= 10));
        }
    }

    #[test]
    fn same_seed_same_formula() {
        let a = Generator::new(config(8, 40, 1, 4), Some(42)).unwrap().generate();
        let b = Generator::new(config(8, 40, 1, 4), Some(42)).unwrap().generate();
        assert_eq!(a, b);
    }

    #[test]
    fn successive_formulas_differ() {
        let mut g = Generator::new(config(20, 40, 3, 3), Some(1)).unwrap();
        assert_ne!(g.generate(), g.generate());
    }

    #[test]
    fn clause_length_can_cover_all_variables() {
        let mut g = Generator::new(config(4, 10, 4, 4), Some(3)).unwrap();
        for clause in g.generate().clauses() {
            let mut vars: Vec<_> = clause.literals().map(|l| l.idx()).collect();
            vars.sort();
            assert_eq!(vars, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn default_max_len() {
        let c = GeneratorConfig {
            num_variables: 10,
            num_clauses: 5,
            min_len: 1,
            max_len: None,
        };
        assert_eq!(c.max_len(), 5);
        let c = GeneratorConfig { min_len: 7, ..c };
        assert_eq!(c.max_len(), 7);
    }

    #[test]
    fn rejects_bad_configs() {
        assert_eq!(
            Generator::new(config(0, 1, 1, 1), None).err(),
            Some(GeneratorError::NoVariables)
        );
        assert_eq!(
            Generator::new(config(5, 1, 0, 2), None).err(),
            Some(GeneratorError::ZeroLength)
        );
        assert_eq!(
            Generator::new(config(5, 1, 3, 2), None).err(),
            Some(GeneratorError::EmptyLengthRange { min_len: 3, max_len: 2 })
        );
        assert_eq!(
            Generator::new(config(3, 1, 1, 4), None).err(),
            Some(GeneratorError::TooFewVariables {
                max_len: 4,
                num_variables: 3
            })
        );
    }

    #[test]
    fn caller_owned_rng() {
        let mut rng = StdRng::seed_from_u64(9);
        let f = generate_with(&config(6, 12, 2, 3), &mut rng).unwrap();
        assert_eq!(f.num_clauses(), 12);
    }
}
