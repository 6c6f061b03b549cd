/*!

A `Substitution` is a finite, total mapping from variable names to terms: application is
capture-free, and any variable not explicitly bound maps to itself. Composing a new binding
`v ↦ t` into an existing substitution enforces the occurs-check twice — once against the new
binding, once against every existing binding it touches — so that the resulting substitution stays
idempotent (`σ ∘ σ = σ`), which is what the unifier in `unify.rs` depends on.

*/

use std::collections::HashMap;
use std::fmt;

use kbc_abs::IString;

use crate::term::Term;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Substitution {
  bindings: HashMap<IString, Term>,
}

impl Substitution {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a substitution directly from a finished binding map, bypassing `extend`'s
  /// incremental occurs-check/composition machinery. Used by one-directional pattern matching
  /// (`unify::match_term`), which builds its own consistency checks as it walks pattern and
  /// subject together and has no need to re-check bindings already established.
  pub fn from_bindings(bindings: HashMap<IString, Term>) -> Self {
    Substitution { bindings }
  }

  pub fn get(&self, name: &IString) -> Option<&Term> {
    self.bindings.get(name)
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&IString, &Term)> {
    self.bindings.iter()
  }

  /// Extend `self` with `v ↦ replacement`, enforcing the two occurs-checks from the composition
  /// contract. Returns `None` if either check fails; `self` is left untouched in that case since
  /// we only ever commit the rebuilt map on success.
  pub fn extend(&self, v: IString, replacement: Term) -> Option<Substitution> {
    if contains_variable(&replacement, &v) {
      return None;
    }

    let single = single_binding(v.clone(), replacement.clone());

    let mut new_bindings = HashMap::with_capacity(self.bindings.len() + 1);
    for (w, u) in &self.bindings {
      let updated = substitute(u, &single);
      if contains_variable(&updated, w) {
        return None;
      }
      new_bindings.insert(w.clone(), updated);
    }
    new_bindings.insert(v, replacement);

    Some(Substitution { bindings: new_bindings })
  }
}

impl fmt::Display for Substitution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts: Vec<String> = self.bindings.iter().map(|(v, t)| format!("{v}_ ↦ {t}")).collect();
    parts.sort();
    write!(f, "{{{}}}", parts.join(", "))
  }
}

fn single_binding(v: IString, replacement: Term) -> Substitution {
  let mut bindings = HashMap::with_capacity(1);
  bindings.insert(v, replacement);
  Substitution { bindings }
}

fn contains_variable(term: &Term, name: &IString) -> bool {
  match term {
    Term::Variable(n) => n == name,
    Term::Constant(_) => false,
    Term::Application(_, children) => children.iter().any(|c| contains_variable(c, name)),
  }
}

/// `term` with every variable replaced by its `σ`-image; variables absent from `sigma` are
/// preserved. Capture-free by construction: there are no binders in this term language, so there
/// is nothing for a substitution to capture.
pub fn substitute(term: &Term, sigma: &Substitution) -> Term {
  match term {
    Term::Variable(name) => sigma.get(name).cloned().unwrap_or_else(|| term.clone()),
    Term::Constant(_) => term.clone(),
    Term::Application(op, children) => {
      Term::Application(op.clone(), children.iter().map(|c| substitute(c, sigma)).collect())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::operator::Operator;

  #[test]
  fn extend_fails_occurs_check() {
    let sigma = Substitution::new();
    let g = Operator::function("g", 1);
    let x: IString = "x".into();
    let rhs = Term::apply(g, vec![Term::Variable(x.clone())]);
    assert!(sigma.extend(x, rhs).is_none());
  }

  #[test]
  fn extend_updates_existing_bindings() {
    let g = Operator::function("g", 1);
    let x: IString = "x".into();
    let y: IString = "y".into();
    let sigma = Substitution::new().extend(y.clone(), Term::Variable(x.clone())).unwrap();
    let sigma = sigma.extend(x.clone(), Term::apply(g, vec![Term::variable("z")])).unwrap();
    assert_eq!(sigma.get(&y), Some(&Term::apply(Operator::function("g", 1), vec![Term::variable("z")])));
  }

  #[test]
  fn substitute_preserves_unbound_variables() {
    let sigma = Substitution::new().extend("x".into(), Term::variable("y")).unwrap();
    let term = Term::apply(Operator::function("f", 2), vec![Term::variable("x"), Term::variable("z")]);
    let result = substitute(&term, &sigma);
    assert_eq!(
      result,
      Term::apply(Operator::function("f", 2), vec![Term::variable("y"), Term::variable("z")])
    );
  }
}
