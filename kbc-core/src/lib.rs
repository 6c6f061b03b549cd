/*!

A Knuth–Bendix completion engine: given a set of equations between first-order terms and a
reduction order, attempts to derive a confluent, terminating rewrite system that decides the
equational theory.

# Layout

- [`operator`] / [`term`] — the term model: fixed-arity function symbols and the terms built from
  them.
- [`multiset`] — the variable-occurrence multisets KBO and rule construction need.
- [`substitution`] / [`unify`] — capture-free substitution and syntactic unification, plus the
  renaming-aware equality and overlap-enumeration operations built on top of them.
- [`kbo`] — the Knuth–Bendix reduction order.
- [`rule`] / [`ruleset`] — oriented rewrite rules and an indexed collection of them.
- [`system`] — the completion driver itself.
- [`error`] — the single error type every fallible operation in this crate returns.

Semantic equality anywhere in this crate (`Operator`, `Term`, `RewriteRule`, ...) is always
structural. Nothing here relies on pointer/address identity, because nothing here needs the kind of
hash-consed, garbage-collected term DAG that pointer-identity comparisons exist to make cheap; terms
are small, immutable trees rebuilt wholesale on every rewrite.

*/

pub mod error;
pub mod kbo;
pub mod multiset;
pub mod operator;
pub mod rule;
pub mod ruleset;
pub mod substitution;
pub mod system;
pub mod term;
pub mod unify;

pub use error::{KbcError, KbcResult};
pub use kbo::KboConfig;
pub use operator::Operator;
pub use rule::RewriteRule;
pub use ruleset::RuleSet;
pub use system::RewriteSystem;
pub use term::Term;
