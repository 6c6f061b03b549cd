/*!

A command-line demonstration of the completion engine: orients and completes the group axioms
(associativity, left/right identity, left inverse) under the standard Knuth–Bendix ordering, then
prints the resulting rewrite rules.

*/

use std::collections::{HashMap, HashSet};
use std::process::ExitCode;

use clap::Parser;
use kbc_core::error::KbcError;
use kbc_core::kbo::KboConfig;
use kbc_core::operator::Operator;
use kbc_core::system::RewriteSystem;
use kbc_core::term::Term;

/// Complete the group-theory axioms and print the resulting rewrite rules.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
  /// Increase log verbosity; repeat for more detail (-v, -vv, -vvv).
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Abort with an error instead of running completion forever.
  #[arg(long, default_value_t = 10_000)]
  max_steps: usize,
}

fn init_logging(verbosity: u8) {
  use tracing_subscriber::filter::LevelFilter;

  let level = match verbosity {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  };

  tracing_subscriber::fmt()
      .with_max_level(level)
      .with_target(false)
      .init();
}

/// The standard associativity / identity / inverse axioms for group theory, as an unoriented list
/// of equations ready for `RewriteSystem::from_equations`.
fn group_axioms() -> (KboConfig, Vec<(Term, Term)>) {
  let times = Operator::infix("*");
  let inv = Operator::function("i", 1);
  let identity = Operator::constant("e");

  let mut weights = HashMap::new();
  weights.insert(times.clone(), 0);
  weights.insert(inv.clone(), 0);
  weights.insert(identity.clone(), 1);

  let mut precedence = HashSet::new();
  precedence.insert((inv.clone(), times.clone()));
  precedence.insert((times.clone(), identity.clone()));

  let order = KboConfig::new(weights, 1, precedence).expect("built-in group order is well-formed");

  let x = Term::variable("x");
  let y = Term::variable("y");
  let z = Term::variable("z");

  let associativity = (
    Term::apply(times.clone(), vec![Term::apply(times.clone(), vec![x.clone(), y.clone()]), z.clone()]),
    Term::apply(times.clone(), vec![x.clone(), Term::apply(times.clone(), vec![y.clone(), z])]),
  );
  let left_identity = (Term::apply(times.clone(), vec![Term::constant(identity.clone()), x.clone()]), x.clone());
  let left_inverse = (
    Term::apply(times, vec![Term::apply(inv, vec![x.clone()]), x.clone()]),
    Term::constant(identity),
  );

  (order, vec![associativity, left_identity, left_inverse])
}

fn run(cli: &Cli) -> Result<(), KbcError> {
  let (order, equations) = group_axioms();
  let mut system = RewriteSystem::from_equations(&order, equations)?;
  system.complete(&order, Some(cli.max_steps))?;

  print!("{}", system.rules);
  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      kbc_abs::log::error!(%err, "completion failed");
      ExitCode::FAILURE
    }
  }
}
