/*!

A `NatSet` is a set of small natural numbers. The client code mostly uses it to track indices
into some indexed collection: which entries of a grammar are productive, which members of a
candidate list have been chosen, which nodes of a graph have been visited. The backing
implementation is the [`bit-set` crate](https://crates.io/crates/bit-set).

*/

use std::fmt::{Debug, Formatter};

use bit_set::BitSet;

use crate::join_iter;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct NatSet(BitSet);

impl NatSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts `value`, returning `true` if it was not already present.
  #[inline(always)]
  pub fn insert(&mut self, value: usize) -> bool {
    self.0.insert(value)
  }

  /// Removes `value`, returning `true` if it was present.
  #[inline(always)]
  pub fn remove(&mut self, value: usize) -> bool {
    self.0.remove(value)
  }

  #[inline(always)]
  pub fn contains(&self, value: usize) -> bool {
    self.0.contains(value)
  }

  /// Unions `other` into `self`.
  #[inline(always)]
  pub fn union_in_place(&mut self, other: &NatSet) {
    self.0.union_with(&other.0);
  }

  #[inline(always)]
  pub fn is_subset(&self, other: &NatSet) -> bool {
    self.0.is_subset(&other.0)
  }

  #[inline(always)]
  pub fn is_superset(&self, other: &NatSet) -> bool {
    self.0.is_superset(&other.0)
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn clear(&mut self) {
    self.0.clear();
  }

  /// Iterates over the members in increasing order.
  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.0.iter()
  }

  pub fn min_value(&self) -> Option<usize> {
    self.0.iter().next()
  }
}

impl FromIterator<usize> for NatSet {
  fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
    let mut set = NatSet::new();
    for value in iter {
      set.insert(value);
    }
    set
  }
}

impl Debug for NatSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let members = join_iter(self.iter().map(|v| v.to_string()), |_| ", ".to_string());
    write!(f, "{{{}}}", members.collect::<String>())
  }
}
