/*!

A multiset of variable names, used for the KBO's variable-containment check (spec-wise: "the
multiset of variables of t is not contained in that of s") and for weight computation's variable
term. This plays the role `NatSet` plays in the teacher's variable bookkeeping
(`mod2-lib::core::variable_info`), generalized from small integers to interned variable names since
our variables are named rather than pre-numbered.

*/

use std::collections::HashMap;
use std::fmt;

use kbc_abs::IString;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VarMultiset {
  counts: HashMap<IString, usize>,
}

impl VarMultiset {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: IString) {
    *self.counts.entry(name).or_insert(0) += 1;
  }

  pub fn count(&self, name: &IString) -> usize {
    self.counts.get(name).copied().unwrap_or(0)
  }

  pub fn total(&self) -> usize {
    self.counts.values().sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&IString, &usize)> {
    self.counts.iter()
  }

  /// True iff `self` is contained in `other`: every variable occurs in `other` at least as many
  /// times as it occurs in `self`.
  pub fn is_subset_of(&self, other: &VarMultiset) -> bool {
    self.counts.iter().all(|(name, count)| other.count(name) >= *count)
  }
}

impl fmt::Display for VarMultiset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts: Vec<String> = self.counts.iter().map(|(n, c)| format!("{n}:{c}")).collect();
    parts.sort();
    write!(f, "{{{}}}", parts.join(", "))
  }
}
