/*!

Syntactic most-general unification (Martelli–Montanari, work-queue style), plus the handful of
derived operations the completion driver needs: equality up to variable renaming, proper-subterm
containment modulo renaming, and overlap enumeration between two terms' left-hand sides.

This is deliberately restricted to syntactic unification. An associative-commutative variant exists
in the system this was distilled from but is flagged there as experimental and non-terminating; it
is out of scope here (spec.md §1).

*/

use std::collections::{HashMap, HashSet, VecDeque};

use kbc_abs::{log, IString};

use crate::substitution::{substitute, Substitution};
use crate::term::{Position, Term};

/// Find a substitution `σ` such that `σ(s) = σ(t)`, or `None` if `s` and `t` do not unify.
pub fn unify(s: &Term, t: &Term) -> Option<Substitution> {
  let span = log::trace_span!("unify");
  let _enter = span.enter();

  let mut sigma = Substitution::new();
  // A true FIFO queue (push_back / pop_front): children are pushed left to right and popped in
  // the same order, so there is no need for the "push reversed" trick a LIFO stack would require
  // to process the left child first.
  let mut queue: VecDeque<(Term, Term)> = VecDeque::new();
  queue.push_back((s.clone(), t.clone()));

  while let Some((a, b)) = queue.pop_front() {
    if a == b {
      continue;
    }

    let extended = match (&a, &b) {
      (Term::Variable(v), _) => Some(sigma.extend(v.clone(), b.clone())?),
      (_, Term::Variable(v)) => Some(sigma.extend(v.clone(), a.clone())?),
      (Term::Application(op1, c1), Term::Application(op2, c2)) if op1 == op2 && c1.len() == c2.len() => {
        for (x, y) in c1.iter().zip(c2.iter()) {
          queue.push_back((x.clone(), y.clone()));
        }
        None
      }
      _ => return None,
    };

    if let Some(new_sigma) = extended {
      sigma = new_sigma;
      // Eagerly normalize every still-pending pair under the new sigma (see this function's doc
      // comment for why this keeps the remaining decomposition steps consistent).
      queue = queue
          .into_iter()
          .map(|(x, y)| (substitute(&x, &sigma), substitute(&y, &sigma)))
          .collect();
    }
  }

  Some(sigma)
}

/// One-directional pattern matching: find a substitution `σ` binding only `pattern`'s variables
/// such that `σ(pattern) = subject`, treating every variable in `subject` as rigid. This is what
/// rewriting needs — `unify` is symmetric and would happily bind a subject's own (universally
/// quantified) variables to pieces of the pattern, which is wrong: a subterm that is itself a bare
/// variable, or contains one, must never be instantiated just because some rule's left-hand side
/// "unifies" with it.
pub fn match_term(pattern: &Term, subject: &Term) -> Option<Substitution> {
  let mut bindings: HashMap<IString, Term> = HashMap::new();
  if match_into(pattern, subject, &mut bindings) {
    Some(Substitution::from_bindings(bindings))
  } else {
    None
  }
}

fn match_into(pattern: &Term, subject: &Term, bindings: &mut HashMap<IString, Term>) -> bool {
  match pattern {
    Term::Variable(name) => match bindings.get(name) {
      Some(bound) => bound == subject,
      None => {
        bindings.insert(name.clone(), subject.clone());
        true
      }
    },
    Term::Constant(op) => matches!(subject, Term::Constant(s) if s == op),
    Term::Application(op, children) => match subject {
      Term::Application(s_op, s_children) if s_op == op && s_children.len() == children.len() => {
        children.iter().zip(s_children.iter()).all(|(p, s)| match_into(p, s, bindings))
      }
      _ => false,
    },
  }
}

/// Rename `term`'s variables so that none of them also occur in `avoid`.
fn disjoint_rename(term: &Term, avoid: &HashSet<IString>) -> Term {
  let mut used = avoid.clone();
  let mut map = HashMap::new();
  for (name, _) in term.variables().iter() {
    let mut candidate = name.clone();
    while used.contains(&candidate) {
      candidate = IString::from(format!("{candidate}'"));
    }
    used.insert(candidate.clone());
    map.insert(name.clone(), candidate);
  }
  term.rename(&map)
}

/// A canonical form of `term` where variables are renamed, in the order first encountered by
/// preorder traversal, to a deterministic sequence (`#0`, `#1`, ...). Two terms are equal modulo
/// renaming iff their canonical forms are syntactically equal.
fn canonicalize(term: &Term) -> Term {
  let mut map = HashMap::new();
  let mut next = 0usize;
  for (_, subterm) in term.preorder() {
    if let Term::Variable(name) = subterm {
      map.entry(name.clone()).or_insert_with(|| {
        let fresh = IString::from(format!("#{next}"));
        next += 1;
        fresh
      });
    }
  }
  term.rename(&map)
}

/// Are `t1` and `t2` equal up to a bijective renaming of variables?
pub fn equal_mod_renaming(t1: &Term, t2: &Term) -> bool {
  canonicalize(t1) == canonicalize(t2)
}

/// Does some proper (non-root) position of `within` hold a subterm equal to `sub` modulo renaming?
pub fn proper_contains(sub: &Term, within: &Term) -> bool {
  within
      .preorder()
      .into_iter()
      .any(|(position, subterm)| !position.is_empty() && equal_mod_renaming(sub, subterm))
}

/// Every unification of `term` against a non-variable subterm of `within`, expressed as
/// `σ(within)` for each such unifier `σ`. `term`'s variables are renamed first so they cannot
/// collide with `within`'s.
pub fn find_overlaps(term: &Term, within: &Term) -> Vec<Term> {
  let avoid: HashSet<IString> = within.variables().iter().map(|(name, _)| name.clone()).collect();
  let renamed_term = disjoint_rename(term, &avoid);

  let mut overlaps = Vec::new();
  for (position, subterm) in within.preorder() {
    if subterm.is_variable() {
      continue;
    }
    if let Some(sigma) = unify(&renamed_term, subterm) {
      log::trace!(?position, "found overlap");
      overlaps.push(substitute(within, &sigma));
    }
  }
  overlaps
}
