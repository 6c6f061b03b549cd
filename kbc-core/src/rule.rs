/*!

A rewrite rule is an oriented pair `(left, right)` with `vars(right) ⊆ vars(left)` and `left` not a
bare variable. Variables are canonically renamed at construction (in the order left's preorder
traversal first encounters them) so that alpha-equivalent rules always have identical
representation — this is what lets `RuleSet`'s trivial-redundancy check and the completion driver's
"already have this rule" checks use plain equality instead of `equal_mod_renaming` everywhere.

*/

use std::collections::HashMap;
use std::fmt;

use kbc_abs::IString;

use crate::error::{KbcError, KbcResult};
use crate::term::Term;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RewriteRule {
  pub left:  Term,
  pub right: Term,
}

impl RewriteRule {
  pub fn new(left: Term, right: Term) -> KbcResult<Self> {
    if left.is_variable() {
      return Err(KbcError::VariableLeftHandSide { variable: left.to_string() });
    }

    let left_vars = left.variables();
    let right_vars = right.variables();
    let extra: Vec<String> = right_vars
        .iter()
        .filter(|(name, _)| left_vars.count(name) == 0)
        .map(|(name, _)| name.to_string())
        .collect();
    if !extra.is_empty() {
      return Err(KbcError::UnboundRuleVariable { left: left.to_string(), extra });
    }

    let (left, right) = canonicalize(left, right);
    Ok(RewriteRule { left, right })
  }
}

fn canonicalize(left: Term, right: Term) -> (Term, Term) {
  let mut map: HashMap<IString, IString> = HashMap::new();
  let mut next = 0usize;
  for (_, sub) in left.preorder() {
    if let Term::Variable(name) = sub {
      map.entry(name.clone()).or_insert_with(|| {
        let fresh = IString::from(format!("v{next}"));
        next += 1;
        fresh
      });
    }
  }
  (left.rename(&map), right.rename(&map))
}

impl fmt::Display for RewriteRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self.left, self.right)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::operator::Operator;

  #[test]
  fn rejects_variable_left_hand_side() {
    let result = RewriteRule::new(Term::variable("x"), Term::constant(Operator::constant("e")));
    assert!(matches!(result, Err(KbcError::VariableLeftHandSide { .. })));
  }

  #[test]
  fn rejects_unbound_right_hand_variable() {
    let f = Operator::function("f", 1);
    let result = RewriteRule::new(Term::apply(f, vec![Term::variable("x")]), Term::variable("y"));
    assert!(matches!(result, Err(KbcError::UnboundRuleVariable { .. })));
  }

  #[test]
  fn alpha_equivalent_rules_are_identical() {
    let f = Operator::function("f", 1);
    let r1 = RewriteRule::new(Term::apply(f.clone(), vec![Term::variable("x")]), Term::variable("x")).unwrap();
    let r2 = RewriteRule::new(Term::apply(f, vec![Term::variable("q")]), Term::variable("q")).unwrap();
    assert_eq!(r1, r2);
  }
}
