/*!

We need a version of `std::cmp::Ordering` that also has an `Incomparable` variant, because the
orders the engine works with (pointwise subtyping of argument vectors, domination between
candidate types) are partial. `Option<Ordering>` already is that type; this module just gives
its values proper names and derives one from a `≤` predicate evaluated in both directions.

*/

use std::cmp::Ordering;

#[allow(non_snake_case)]
pub mod PartialOrdering {
  #![allow(non_upper_case_globals)]

  use std::cmp::Ordering;

  pub const Greater     : Option<Ordering> = Some(Ordering::Greater);
  pub const Less        : Option<Ordering> = Some(Ordering::Less);
  pub const Equal       : Option<Ordering> = Some(Ordering::Equal);
  pub const Incomparable: Option<Ordering> = None;
}

/// Derives the partial ordering of `a` and `b` from the two directions of a `≤` predicate.
#[inline(always)]
pub fn partial_ordering_from_le(a_le_b: bool, b_le_a: bool) -> Option<Ordering> {
  match (a_le_b, b_le_a) {
    (true, true)   => PartialOrdering::Equal,
    (true, false)  => PartialOrdering::Less,
    (false, true)  => PartialOrdering::Greater,
    (false, false) => PartialOrdering::Incomparable,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_le_covers_all_cases() {
    // divisibility on {2, 3, 4, 12}
    let le = |a: u32, b: u32| b % a == 0;
    assert_eq!(partial_ordering_from_le(le(2, 4), le(4, 2)), PartialOrdering::Less);
    assert_eq!(partial_ordering_from_le(le(12, 4), le(4, 12)), PartialOrdering::Greater);
    assert_eq!(partial_ordering_from_le(le(3, 3), le(3, 3)), PartialOrdering::Equal);
    assert_eq!(partial_ordering_from_le(le(3, 4), le(4, 3)), PartialOrdering::Incomparable);
  }
}
