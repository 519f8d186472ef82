use crate::formula::{Clause, Formula, Literal};
use std::io::{self, BufRead, BufReader, Read, Write};
use thiserror::Error;

pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut header = None;
    let mut pending = vec![];

    'lines: for line in reader.lines() {
        let line = line?;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            Some(&"c") | None => continue,
            Some(&"%") => break,
            Some(&"p") => {
                let _ = line.next();

                if line.next() != Some("cnf") {
                    return Err(DimacsParseError::Format("missing 'cnf'".into()));
                }

                let num_variables = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format("invalid num_variables".into()))?;

                let num_clauses = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format("invalid num_clauses".into()))?;

                header = Some((num_variables, num_clauses));
            }
            Some(_) => {
                let num_clauses = match header {
                    Some((_, num_clauses)) => num_clauses,
                    None => return Err(DimacsParseError::Format("missing 'p' line before clauses".into())),
                };

                // a clause ends at 0 and may span several lines
                for x in line {
                    if clauses.len() >= num_clauses {
                        break 'lines;
                    }
                    match parse_literal(x)? {
                        Some(l) => pending.push(l),
                        None => clauses.push(Clause::new(pending.drain(..))),
                    }
                }
            }
        }
    }

    let (num_variables, _) =
        header.ok_or_else(|| DimacsParseError::Format("missing 'p' line before clauses".into()))?;

    if !pending.is_empty() {
        clauses.push(Clause::new(pending));
    }

    Ok(Formula::new(num_variables, clauses))
}

fn parse_literal(s: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = s
        .parse::<i64>()
        .map_err(|_| DimacsParseError::Format(format!("invalid literal '{}'", s)))?;
    Ok(Literal::from_dimacs(l))
}

pub fn write<W: Write>(formula: &Formula, mut writer: W) -> io::Result<()> {
    writeln!(writer, "p cnf {} {}", formula.num_variables(), formula.num_clauses())?;
    for clause in formula.clauses() {
        for literal in clause.literals() {
            write!(writer, "{} ", literal)?;
        }
        writeln!(writer, "0")?;
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum DimacsParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed DIMACS: {0}")]
    Format(String),
}
