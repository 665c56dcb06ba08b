/*!

Order-preserving combinatorial helpers for the inhabitation engine: minimal covers of a path
list by candidate multi-arrows, maximal elements of a partially ordered collection, and the
non-empty subsets of a name list for the tag taxonomy extension.

Everything here is deterministic: output order is a function of input order alone, which the
engine relies on for reproducible grammars.

*/

use fcl_abs::{partial_ordering_from_le, NatSet, PartialOrdering};

/// Computes the inclusion-minimal covers of `to_cover` by elements of `candidates`, where
/// `contains(candidate, element)` says that a candidate accounts for an element. Each cover is
/// returned as an increasing list of candidate indices. If some element has no candidate at
/// all there is no cover and the result is empty; covering an empty list needs nothing, so the
/// single empty cover is returned.
pub fn minimal_covers<S, E, F>(candidates: &[S], to_cover: &[E], contains: F) -> Vec<Vec<usize>>
    where F: Fn(&S, &E) -> bool
{
  // Which candidates account for each element.
  let mut coverers: Vec<Vec<usize>> = Vec::with_capacity(to_cover.len());
  for element in to_cover {
    let indices: Vec<usize> = (0..candidates.len())
      .filter(|&i| contains(&candidates[i], element))
      .collect();
    if indices.is_empty() {
      return Vec::new();
    }
    coverers.push(indices);
  }

  // Grow partial covers element by element. A partial cover that already accounts for the next
  // element is carried over unchanged; otherwise it branches once per candidate coverer.
  let mut partial: Vec<NatSet> = vec![NatSet::new()];
  for indices in &coverers {
    let mut next: Vec<NatSet> = Vec::new();
    for cover in &partial {
      if indices.iter().any(|&i| cover.contains(i)) {
        push_unique(&mut next, cover.clone());
      } else {
        for &i in indices {
          let mut extended = cover.clone();
          extended.insert(i);
          push_unique(&mut next, extended);
        }
      }
    }
    partial = next;
  }

  // Keep the inclusion-minimal ones.
  partial
    .iter()
    .filter(|cover| {
      !partial
        .iter()
        .any(|other| other.len() < cover.len() && other.is_subset(cover))
    })
    .map(|cover| cover.iter().collect())
    .collect()
}

fn push_unique(covers: &mut Vec<NatSet>, cover: NatSet) {
  if !covers.contains(&cover) {
    covers.push(cover);
  }
}

/// Keeps only the maximal elements of `items` under the partial order induced by `le`; one
/// representative per equivalence class survives. Survivors keep their relative input order.
pub fn maximal_elements<T, F>(items: impl IntoIterator<Item = T>, le: F) -> Vec<T>
    where F: Fn(&T, &T) -> bool
{
  let mut result: Vec<T> = Vec::new();

  for item in items {
    let mut dominated = false;
    result.retain(|kept| {
      if dominated {
        return true;
      }
      match partial_ordering_from_le(le(kept, &item), le(&item, kept)) {
        PartialOrdering::Less => false,
        PartialOrdering::Greater | PartialOrdering::Equal => {
          dominated = true;
          true
        }
        _ => true,
      }
    });
    if !dominated {
      result.push(item);
    }
  }

  result
}

/// All non-empty subsets of `items`, each preserving the input order of its members. Subsets
/// are emitted in increasing bitmask order, so the full set comes last. Subsets are selected
/// through a `u64` bitmask, so `items` must hold fewer than 64 elements; callers cap their
/// input well below that (the output is exponential in `items.len()` regardless).
pub fn non_empty_subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
  let count = items.len();
  debug_assert!(count < 64, "subset bitmask width exceeded: {} elements", count);
  let mut subsets = Vec::with_capacity((1usize << count).saturating_sub(1));
  for mask in 1u64..(1u64 << count) {
    let subset: Vec<T> = (0..count)
      .filter(|&i| mask & (1 << i) != 0)
      .map(|i| items[i].clone())
      .collect();
    subsets.push(subset);
  }
  subsets
}
