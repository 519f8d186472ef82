use clap::{App, Arg, ArgMatches};
use satgen::config::defaults;
use satgen::dimacs::{self, DimacsParseError};
use satgen::*;
use std::fs::File;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

const EXIT_SAT: i32 = 0;
const EXIT_UNSAT: i32 = 1;
const EXIT_UNKNOWN: i32 = 2;
const EXIT_ERROR: i32 = 3;

fn main() {
    env_logger::init();

    let matches = App::new("satgen")
        .about("Generates random CNF instances and decides their satisfiability")
        .arg(
            Arg::with_name("INPUT")
                .help("input file (in CNF), '-' for stdin; a random instance is generated if absent")
                .index(1),
        )
        .arg(number_arg("vars", "number of variables of the generated instance"))
        .arg(number_arg("clauses", "number of clauses of the generated instance"))
        .arg(number_arg("min-len", "minimum clause length of the generated instance"))
        .arg(number_arg("max-len", "maximum clause length of the generated instance"))
        .arg(number_arg("seed", "random seed for the generated instance"))
        .arg(number_arg("conflict-limit", "give up after this many conflicts"))
        .arg(number_arg("time-limit", "give up after this many seconds"))
        .arg(
            Arg::with_name("emit-dimacs")
                .long("emit-dimacs")
                .help("print the instance in DIMACS format instead of as a clause list"),
        )
        .arg(Arg::with_name("stats").long("stats").help("print solver statistics"))
        .get_matches();

    match run(&matches) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn number_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).long(name).takes_value(true).help(help)
}

fn parse_number<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    matches
        .value_of(name)
        .map(|s| s.parse::<T>().map_err(|_| format!("invalid value for --{}: '{}'", name, s)))
        .transpose()
}

fn run(matches: &ArgMatches) -> Result<i32, String> {
    let formula = match matches.value_of("INPUT") {
        Some("-") => dimacs::parse(io::stdin()).map_err(|e| e.to_string())?,
        Some(path) => parse_from_file(path).map_err(|e| format!("{}: {}", path, e))?,
        None => generate(matches)?,
    };

    let emit_dimacs = matches.is_present("emit-dimacs");
    let stdout = io::stdout();
    let stderr = io::stderr();
    write_instance(&formula, emit_dimacs, &mut stdout.lock()).map_err(|e| e.to_string())?;

    let mut config = SolverConfig::default();
    if let Some(limit) = parse_number::<u64>(matches, "conflict-limit")? {
        config = config.with_conflict_limit(limit);
    }
    if let Some(seconds) = parse_number::<f64>(matches, "time-limit")? {
        config = config.with_time_limit(time_limit(seconds)?);
    }

    let mut solver = Solver::with_config(&formula, config).map_err(|e| e.to_string())?;
    let result = solver.solve();
    let stats = if matches.is_present("stats") { Some(solver.stats()) } else { None };

    // stdout carries only the instance when it is emitted as DIMACS
    let written = if emit_dimacs {
        write_report(&formula, &result, stats, &mut stderr.lock())
    } else {
        write_report(&formula, &result, stats, &mut stdout.lock())
    };
    written.map_err(|e| e.to_string())?;

    Ok(match result {
        SatResult::Satisfiable(_) => EXIT_SAT,
        SatResult::Unsatisfiable => EXIT_UNSAT,
        SatResult::Unknown => EXIT_UNKNOWN,
    })
}

fn time_limit(seconds: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("invalid value for --time-limit: '{}'", seconds))
}

fn write_instance<W: Write>(formula: &Formula, emit_dimacs: bool, out: &mut W) -> io::Result<()> {
    if emit_dimacs {
        return dimacs::write(formula, out);
    }
    writeln!(out, "Clauses ({}):", formula.num_clauses())?;
    for (i, clause) in formula.clauses().enumerate() {
        writeln!(out, "Clause {}: {}", i + 1, clause)?;
    }
    Ok(())
}

fn write_report<W: Write>(
    formula: &Formula,
    result: &SatResult,
    stats: Option<&SolverStats>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", result.verdict())?;

    if let Some(stats) = stats {
        writeln!(out, "{}", stats)?;
    }

    if let SatResult::Satisfiable(model) = result {
        writeln!(out, "Model:")?;
        for (variable, value) in model.iter() {
            writeln!(out, "Variable {}: {}", variable.0, value)?;
        }
        if verify(formula, model) {
            writeln!(out, "\nModel verified")?;
        } else {
            writeln!(out, "\nModel verification failed (this indicates a solver bug)")?;
        }
    }
    Ok(())
}

fn generate(matches: &ArgMatches) -> Result<Formula, String> {
    let config = GeneratorConfig {
        num_variables: parse_number(matches, "vars")?.unwrap_or(defaults::NUM_VARIABLES),
        num_clauses: parse_number(matches, "clauses")?.unwrap_or(defaults::NUM_CLAUSES),
        min_len: parse_number(matches, "min-len")?.unwrap_or(defaults::MIN_CLAUSE_LEN),
        max_len: Some(parse_number(matches, "max-len")?.unwrap_or(defaults::MAX_CLAUSE_LEN)),
    };
    let seed = parse_number(matches, "seed")?.unwrap_or(defaults::SEED);
    log::debug!("generating with {:?}, seed {}", config, seed);
    let mut generator = Generator::new(config, Some(seed)).map_err(|e| e.to_string())?;
    Ok(generator.generate())
}

fn parse_from_file(path: &str) -> Result<Formula, DimacsParseError> {
    let file = File::open(path)?;
    dimacs::parse(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_env_log::test;

    fn instance() -> Formula {
        Formula::from_dimacs(3, vec![vec![1, -2], vec![2, 3]]).unwrap()
    }

    #[test]
    fn time_limit_conversion() {
        assert_eq!(time_limit(1.5).unwrap(), Duration::from_millis(1500));
        assert_eq!(time_limit(0.0).unwrap(), Duration::from_secs(0));
        assert!(time_limit(1e30).is_err());
        assert!(time_limit(-1.0).is_err());
        assert!(time_limit(f64::NAN).is_err());
        assert!(time_limit(f64::INFINITY).is_err());
    }

    #[test]
    fn emitted_dimacs_parses_back() {
        let f = instance();
        let mut out = vec![];
        write_instance(&f, true, &mut out).unwrap();
        assert_eq!(dimacs::parse(&out[..]).unwrap(), f);
    }

    #[test]
    fn clause_list_report() {
        let f = instance();
        let mut out = vec![];
        write_instance(&f, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Clauses (2):\nClause 1: "));
    }

    #[test]
    fn satisfiable_report() {
        let f = instance();
        let result = solve(&f).unwrap();
        let mut out = vec![];
        write_report(&f, &result, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SATISFIABLE\nModel:\nVariable 1: "));
        assert!(text.ends_with("Model verified\n"));
    }

    #[test]
    fn unsatisfiable_report() {
        let f = Formula::from_dimacs(1, vec![vec![1], vec![-1]]).unwrap();
        let mut out = vec![];
        write_report(&f, &SatResult::Unsatisfiable, None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nUNSATISFIABLE\n");
    }
}
