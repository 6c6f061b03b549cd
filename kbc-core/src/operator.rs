/*!

An `Operator` is either a nullary constant symbol or a function symbol of fixed, non-negative
arity. Operators compare and hash structurally on `(name, arity)`, which gives them the "stable
identity usable as a map key" the term model needs without leaning on pointer identity (see the
crate-level note in `lib.rs` about why semantic equality never depends on addresses).

`infix` only affects how a binary function symbol is rendered by `Display` on `Term`; it has no
bearing on unification, KBO, or completion.

*/

use std::fmt;

use kbc_abs::IString;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
  /// A 0-arity operator symbol.
  Constant { name: IString },
  /// A function symbol with a fixed arity. Non-goal: variadic/associative/commutative operators
  /// are not representable here at all, so there is nothing to reject at this layer.
  Function {
    name:  IString,
    arity: usize,
    infix: bool,
  },
}

impl Operator {
  pub fn constant(name: impl Into<IString>) -> Self {
    Operator::Constant { name: name.into() }
  }

  pub fn function(name: impl Into<IString>, arity: usize) -> Self {
    Operator::Function { name: name.into(), arity, infix: false }
  }

  /// A binary function symbol that should render as `a op b` rather than `op(a, b)`.
  pub fn infix(name: impl Into<IString>) -> Self {
    Operator::Function { name: name.into(), arity: 2, infix: true }
  }

  pub fn name(&self) -> &IString {
    match self {
      Operator::Constant { name } => name,
      Operator::Function { name, .. } => name,
    }
  }

  pub fn arity(&self) -> usize {
    match self {
      Operator::Constant { .. } => 0,
      Operator::Function { arity, .. } => *arity,
    }
  }

  pub fn is_infix(&self) -> bool {
    matches!(self, Operator::Function { infix: true, .. })
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}
