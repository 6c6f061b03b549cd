/*!

An ordered, duplicate-aware collection of rewrite rules with a match index (by the head operator
of each rule's left-hand side) that accelerates `apply_all`/`apply_each_once`. The index is purely
an accelerator — `candidates` falls back to scanning every rule when that would still be needed for
correctness, and correctness never depends on the index being present (spec.md §9, "Match index").

Matching here is one-directional: only a rule's own variables are ever bound, the expression being
rewritten is rigid. This is deliberately not `unify::unify`, which is symmetric and would bind the
*subject's* free variables too — rewriting a term that itself contains free variables (as every
critical pair and every intermediate normalization target does throughout completion) must not
instantiate those variables just because a rule's left-hand side happens to unify with them.

*/

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::operator::Operator;
use crate::rule::RewriteRule;
use crate::substitution::{substitute, Substitution};
use crate::term::{Position, Term};
use crate::unify::match_term;

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
  rules: Vec<RewriteRule>,
  index: HashMap<Operator, Vec<usize>>,
}

impl RuleSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_rules(rules: Vec<RewriteRule>) -> Self {
    let mut set = RuleSet::new();
    for rule in rules {
      set.append(rule);
    }
    set
  }

  pub fn rules(&self) -> &[RewriteRule] {
    &self.rules
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn get(&self, index: usize) -> &RewriteRule {
    &self.rules[index]
  }

  pub fn append(&mut self, rule: RewriteRule) {
    let index = self.rules.len();
    self.index.entry(rule.left.head().expect("rule left is never a bare variable").clone()).or_default().push(index);
    self.rules.push(rule);
  }

  pub fn replace(&mut self, index: usize, rule: RewriteRule) {
    self.rules[index] = rule;
    self.rebuild_index();
  }

  pub fn delete(&mut self, index: usize) {
    self.rules.remove(index);
    self.rebuild_index();
  }

  fn rebuild_index(&mut self) {
    self.index.clear();
    for (i, rule) in self.rules.iter().enumerate() {
      let head = rule.left.head().expect("rule left is never a bare variable").clone();
      self.index.entry(head).or_default().push(i);
    }
  }

  /// Rule indices worth trying against `subterm`. A rule's left-hand side is never a bare
  /// variable (`RewriteRule::new` forbids it), so matching is structural at the root: a
  /// non-variable subterm can only match a rule whose left-hand side shares its head operator,
  /// and a variable subterm — having no operator of its own to match against a pattern that always
  /// has one — can never match any rule at all.
  fn candidates(&self, subterm: &Term) -> Vec<usize> {
    match subterm.head() {
      Some(op) => self.index.get(op).cloned().unwrap_or_default(),
      None => Vec::new(),
    }
  }

  fn matches_at(&self, subterm: &Term, only: Option<&HashSet<usize>>) -> Vec<(usize, Substitution)> {
    self
        .candidates(subterm)
        .into_iter()
        .filter(|i| only.map_or(true, |only| only.contains(i)))
        .filter_map(|i| match_term(&self.rules[i].left, subterm).map(|sigma| (i, sigma)))
        .collect()
  }

  /// Repeatedly take the first match found by preorder traversal and rewrite at that position,
  /// until no rule matches anywhere or `max_count` applications have happened. Returns the
  /// resulting (normal, if no cap was hit) form.
  pub fn apply_all(&self, expr: &Term, max_count: Option<usize>) -> Term {
    let mut expr = expr.clone();
    let mut count = 0usize;

    loop {
      if let Some(cap) = max_count {
        if count >= cap {
          break;
        }
      }

      let mut rewritten: Option<Term> = None;
      for (position, subterm) in expr.preorder() {
        if let Some((rule_index, sigma)) = self.matches_at(subterm, None).into_iter().next() {
          let new_subterm = substitute(&self.rules[rule_index].right, &sigma);
          rewritten = Some(expr.replace_at(&position, new_subterm));
          break;
        }
      }

      match rewritten {
        Some(new_expr) => {
          expr = new_expr;
          count += 1;
        }
        None => break,
      }
    }

    expr
  }

  /// For every `(subterm, position)` in preorder and every rule matching there (filtered by
  /// `only` if supplied), produce one `(rule_index, new_expr)` pair. A rule that matches at
  /// several outer positions yields once per position.
  pub fn apply_each_once(&self, expr: &Term, only: Option<&HashSet<usize>>) -> Vec<(usize, Term)> {
    let mut out = Vec::new();
    for (position, subterm) in expr.preorder() {
      for (rule_index, sigma) in self.matches_at(subterm, only) {
        let new_subterm = substitute(&self.rules[rule_index].right, &sigma);
        out.push((rule_index, expr.replace_at(&position, new_subterm)));
      }
    }
    out
  }
}

impl fmt::Display for RuleSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rule in &self.rules {
      writeln!(f, "{rule}")?;
    }
    Ok(())
  }
}

/// Re-exported so callers of `apply_all`/`apply_each_once` can name a position without reaching
/// into `crate::term`.
pub type RewritePosition = Position;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::operator::Operator;

  fn group_rules() -> RuleSet {
    let times = Operator::infix("*");
    let e = Operator::constant("e");
    let rule1 = RewriteRule::new(
      Term::apply(times.clone(), vec![Term::variable("x"), Term::constant(e.clone())]),
      Term::variable("x"),
    )
        .unwrap();
    let rule2 = RewriteRule::new(
      Term::apply(times, vec![Term::constant(e), Term::variable("x")]),
      Term::variable("x"),
    )
        .unwrap();
    RuleSet::from_rules(vec![rule1, rule2])
  }

  #[test]
  fn apply_all_normalizes_using_first_preorder_match() {
    let rules = group_rules();
    let times = Operator::infix("*");
    let e = Operator::constant("e");
    let expr = Term::apply(times, vec![Term::variable("y"), Term::constant(e)]);
    let normal = rules.apply_all(&expr, None);
    assert_eq!(normal, Term::variable("y"));
  }

  #[test]
  fn index_and_linear_scan_agree() {
    let rules = group_rules();
    let times = Operator::infix("*");
    let e = Operator::constant("e");
    let expr = Term::apply(times, vec![Term::variable("y"), Term::constant(e)]);

    let indexed = rules.matches_at(&expr, None);
    let linear: Vec<(usize, Substitution)> = (0..rules.len())
        .filter_map(|i| match_term(&rules.get(i).left, &expr).map(|sigma| (i, sigma)))
        .collect();
    assert_eq!(indexed.len(), linear.len());
  }

  #[test]
  fn apply_each_once_yields_per_outer_match() {
    let f = Operator::function("f", 1);
    let rule = RewriteRule::new(Term::apply(f.clone(), vec![Term::variable("x")]), Term::variable("x")).unwrap();
    let rules = RuleSet::from_rules(vec![rule]);
    let expr = Term::apply(f.clone(), vec![Term::apply(f, vec![Term::variable("y")])]);
    let results = rules.apply_each_once(&expr, None);
    // Two outer matches: the whole term, and the inner f(y).
    assert_eq!(results.len(), 2);
  }
}
