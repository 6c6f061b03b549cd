/*!

The engine's only error type. Every failure mode in the system surfaces here: KBO misconfiguration,
malformed rewrite rules, orientation failures during completion, and the internal invariant
violations that unification/substitution are supposed to make impossible.

Nothing here is retried. An `Orientation` failure aborts the current `complete` call; the other
variants are raised at construction time, before any state has been mutated.

spec.md §7 also lists invariant violations inside unification/substitution (a capture-free
substitution producing something that is not a term) as a failure kind. There is no corresponding
variant here: `Term::Application` only ever holds `Term`s, so `substitute` has no code path that
could produce a non-term value to report in the first place — the tagged-enum term model makes
that failure mode statically unreachable rather than something to catch at runtime.

*/

use crate::term::Term;

#[derive(thiserror::Error, Debug, Clone)]
pub enum KbcError {
  #[error("precedence relation is reflexive on operator {operator}")]
  ReflexivePrecedence { operator: String },

  #[error("constant {constant} has weight {weight}, which is less than the variable weight {var_weight}")]
  UnderweightConstant {
    constant:   String,
    weight:     u32,
    var_weight: u32,
  },

  #[error(
    "unary operator {operator} has weight 0 but is not maximal in the precedence over {other}"
  )]
  UnaryZeroWeightNotMinimal { operator: String, other: String },

  #[error("right-hand side of rule has variable(s) {extra:?} not present on the left-hand side {left}")]
  UnboundRuleVariable { left: String, extra: Vec<String> },

  #[error("left-hand side of a rewrite rule cannot be a bare variable ({variable})")]
  VariableLeftHandSide { variable: String },

  #[error("cannot orient {left} = {right}: neither side reduces the other under the given order")]
  Orientation { left: Term, right: Term },

  #[error("completion did not reach a fixpoint within {steps} step(s)")]
  StepBudgetExceeded { steps: usize },
}

pub type KbcResult<T> = Result<T, KbcError>;
