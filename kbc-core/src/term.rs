/*!

A term is a variable, a constant, or the application of a fixed-arity operator to exactly
`arity(op)` child terms, left to right. Terms are immutable and structurally compared; there is no
mutation after construction, only rebuilding (`replace_at`, `rename`, `substitute`) into new terms.

This is a tagged enum rather than a class hierarchy with runtime type tests — exhaustive pattern
matching on `Term` is how every operation here (and in `unify`, `kbo`, `rule`) guarantees it has
handled all three shapes.

*/

use std::collections::HashMap;
use std::fmt;

use kbc_abs::IString;

use crate::multiset::VarMultiset;
use crate::operator::Operator;

/// A path from the root of a term to a subterm: a sequence of child indices, root first.
pub type Position = Vec<usize>;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Term {
  Variable(IString),
  Constant(Operator),
  Application(Operator, Vec<Term>),
}

impl Term {
  pub fn variable(name: impl Into<IString>) -> Self {
    Term::Variable(name.into())
  }

  pub fn constant(op: Operator) -> Self {
    debug_assert_eq!(op.arity(), 0, "constant term built from an operator with nonzero arity");
    Term::Constant(op)
  }

  /// Build an application, asserting the operator's declared arity matches the child count. This
  /// is a construction-time invariant, not a recoverable error: callers build terms from a fixed
  /// set of operators they control.
  pub fn apply(op: Operator, children: Vec<Term>) -> Self {
    assert_eq!(
      op.arity(),
      children.len(),
      "operator {op} has arity {} but was applied to {} children",
      op.arity(),
      children.len()
    );
    if children.is_empty() {
      Term::Constant(op)
    } else {
      Term::Application(op, children)
    }
  }

  /// The term's operator, or `None` if it is a variable.
  pub fn head(&self) -> Option<&Operator> {
    match self {
      Term::Variable(_) => None,
      Term::Constant(op) | Term::Application(op, _) => Some(op),
    }
  }

  /// The term's children: empty for a constant, `None` for a variable.
  pub fn children(&self) -> Option<&[Term]> {
    match self {
      Term::Variable(_) => None,
      Term::Constant(_) => Some(&[]),
      Term::Application(_, children) => Some(children),
    }
  }

  pub fn is_variable(&self) -> bool {
    matches!(self, Term::Variable(_))
  }

  /// The multiset of variable names occurring in this term.
  pub fn variables(&self) -> VarMultiset {
    let mut vars = VarMultiset::new();
    self.collect_variables(&mut vars);
    vars
  }

  fn collect_variables(&self, vars: &mut VarMultiset) {
    match self {
      Term::Variable(name) => vars.insert(name.clone()),
      Term::Constant(_) => {}
      Term::Application(_, children) => {
        for child in children {
          child.collect_variables(vars);
        }
      }
    }
  }

  /// Root-first preorder traversal, yielding `(position, subterm)` pairs. The root's position is
  /// the empty path.
  pub fn preorder(&self) -> Vec<(Position, &Term)> {
    let mut out = Vec::new();
    self.preorder_from(Position::new(), &mut out);
    out
  }

  fn preorder_from<'a>(&'a self, here: Position, out: &mut Vec<(Position, &'a Term)>) {
    out.push((here.clone(), self));
    if let Term::Application(_, children) = self {
      for (i, child) in children.iter().enumerate() {
        let mut child_pos = here.clone();
        child_pos.push(i);
        child.preorder_from(child_pos, out);
      }
    }
  }

  /// A new term equal to `self` except that the subterm at `position` is replaced by `replacement`.
  pub fn replace_at(&self, position: &[usize], replacement: Term) -> Term {
    match position.split_first() {
      None => replacement,
      Some((&index, rest)) => match self {
        Term::Application(op, children) => {
          let mut new_children = children.clone();
          new_children[index] = children[index].replace_at(rest, replacement);
          Term::Application(op.clone(), new_children)
        }
        _ => panic!("position {position:?} does not exist in term {self}"),
      },
    }
  }

  /// `self` with every variable name substituted according to `map`; variables absent from `map`
  /// are left as-is.
  pub fn rename(&self, map: &HashMap<IString, IString>) -> Term {
    match self {
      Term::Variable(name) => {
        Term::Variable(map.get(name).cloned().unwrap_or_else(|| name.clone()))
      }
      Term::Constant(op) => Term::Constant(op.clone()),
      Term::Application(op, children) => {
        Term::Application(op.clone(), children.iter().map(|c| c.rename(map)).collect())
      }
    }
  }

  /// Total node count (every variable, constant, and operator application counts once).
  pub fn size(&self) -> usize {
    match self {
      Term::Variable(_) | Term::Constant(_) => 1,
      Term::Application(_, children) => 1 + children.iter().map(Term::size).sum::<usize>(),
    }
  }

  fn render_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if matches!(self, Term::Application(op, _) if op.is_infix()) {
      write!(f, "({self})")
    } else {
      write!(f, "{self}")
    }
  }
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Term::Variable(name) => write!(f, "{name}_"),
      Term::Constant(op) => write!(f, "{op}"),
      Term::Application(op, children) if op.is_infix() && children.len() == 2 => {
        children[0].render_operand(f)?;
        write!(f, " {op} ")?;
        children[1].render_operand(f)
      }
      Term::Application(op, children) => {
        write!(f, "{op}(")?;
        for (i, child) in children.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{child}")?;
        }
        write!(f, ")")
      }
    }
  }
}
