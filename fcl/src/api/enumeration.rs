/*!

Lazy, size-ordered term enumeration over a tree grammar.

The enumerator is a pull-based producer. Internally it runs a size-bucketed dynamic program:
for every grammar nonterminal it caches the list of terms of each exact size, and computes the
size-n bucket of a nonterminal from the strictly smaller buckets of its rule arguments (all
compositions of the remaining size over the argument positions, cross products over the cached
argument buckets). Buckets are shared `Rc` lists, so a subtree is expanded once no matter how
many terms contain it.

A grammar whose reachable part (from the start symbol) is free of recursion generates finitely
many terms; the enumerator detects this case up front, derives the maximal derivation size, and
exhausts. A reachable cycle in a pruned grammar pumps arbitrarily large terms, so the iterator
is then infinite and the caller bounds it with `max_count` or by breaking.

*/

use std::borrow::Borrow;
use std::rc::Rc;

use fcl_abs::NatSet;

use crate::api::term::{RcTerm, Term};
use crate::core::grammar::TreeGrammar;
use crate::core::ty::Ty;

type Bucket<C> = Rc<Vec<RcTerm<C>>>;

/// Iterator over the terms generated by a grammar from a start symbol, in non-decreasing size
/// order. `G` is any shared handle to the grammar (`&TreeGrammar<C>`, `Rc<TreeGrammar<C>>`).
pub struct EnumeratedTerms<G, C> {
  grammar: G,
  /// Per nonterminal, the cached term lists for sizes `1..=level`.
  buckets: Vec<Vec<Bucket<C>>>,
  level: usize,
  start: Option<usize>,
  /// Largest derivation size when the reachable subgrammar is acyclic; `None` pumps forever.
  size_bound: Option<usize>,
  size: usize,
  position: usize,
  remaining: Option<usize>,
}

/// Enumerates the terms of `start`, optionally capped at `max_count` terms.
pub fn enumerate_terms<C, G>(start: &Ty, grammar: G, max_count: Option<usize>) -> EnumeratedTerms<G, C>
    where C: Clone,
          G: Borrow<TreeGrammar<C>>
{
  let (start_index, size_bound, nonterminal_count) = {
    let grammar = grammar.borrow();
    let start_index = grammar.index_of(start);
    let size_bound = start_index.and_then(|index| derivation_size_bound(grammar, index));
    (start_index, size_bound, grammar.len())
  };

  EnumeratedTerms {
    grammar,
    buckets: vec![Vec::new(); nonterminal_count],
    level: 0,
    start: start_index,
    size_bound,
    size: 1,
    position: 0,
    remaining: max_count,
  }
}

/// The uncapped iterator.
pub fn enumerate_terms_iter<C, G>(start: &Ty, grammar: G) -> EnumeratedTerms<G, C>
    where C: Clone,
          G: Borrow<TreeGrammar<C>>
{
  enumerate_terms(start, grammar, None)
}

/// All terms of `start` with exactly `size` nodes.
pub fn enumerate_terms_of_size<C, G>(start: &Ty, grammar: G, size: usize) -> Vec<RcTerm<C>>
    where C: Clone,
          G: Borrow<TreeGrammar<C>>
{
  if size == 0 {
    return Vec::new();
  }
  let mut enumerator = enumerate_terms(start, grammar, None);
  let Some(start_index) = enumerator.start else {
    return Vec::new();
  };
  if enumerator.size_bound.is_some_and(|bound| size > bound) {
    return Vec::new();
  }
  while enumerator.level < size {
    enumerator.grow();
  }
  enumerator.buckets[start_index][size - 1].to_vec()
}

impl<G, C> EnumeratedTerms<G, C>
    where C: Clone,
          G: Borrow<TreeGrammar<C>>
{
  /// Computes the size-(level+1) bucket of every nonterminal from the buckets below.
  fn grow(&mut self) {
    let next_size = self.level + 1;
    let grammar = self.grammar.borrow();

    let mut new_buckets: Vec<Bucket<C>> = Vec::with_capacity(grammar.len());
    for node in 0..grammar.len() {
      let mut terms: Vec<RcTerm<C>> = Vec::new();

      'rules: for rule in grammar.rules_at(node) {
        let arity = rule.args.len();
        if arity == 0 {
          if next_size == 1 {
            terms.push(Rc::new(Term::leaf(rule.combinator.clone())));
          }
          continue;
        }
        if next_size < arity + 1 {
          continue;
        }

        let mut argument_nodes: Vec<usize> = Vec::with_capacity(arity);
        for argument in &rule.args {
          match grammar.index_of(argument) {
            Some(index) => argument_nodes.push(index),
            // An argument that is no grammar key generates nothing.
            None => continue 'rules,
          }
        }

        for split in compositions(next_size - 1, arity) {
          cross_products(&rule.combinator, &argument_nodes, &split, &self.buckets, &mut terms);
        }
      }

      new_buckets.push(Rc::new(terms));
    }

    for (node, bucket) in new_buckets.into_iter().enumerate() {
      self.buckets[node].push(bucket);
    }
    self.level = next_size;
  }
}

impl<G, C> Iterator for EnumeratedTerms<G, C>
    where C: Clone,
          G: Borrow<TreeGrammar<C>>
{
  type Item = RcTerm<C>;

  fn next(&mut self) -> Option<RcTerm<C>> {
    if self.remaining == Some(0) {
      return None;
    }
    let start = self.start?;

    loop {
      if self.size_bound.is_some_and(|bound| self.size > bound) {
        return None;
      }
      while self.level < self.size {
        self.grow();
      }

      let bucket = &self.buckets[start][self.size - 1];
      if self.position < bucket.len() {
        let term = bucket[self.position].clone();
        self.position += 1;
        if let Some(remaining) = &mut self.remaining {
          *remaining -= 1;
        }
        return Some(term);
      }

      self.size += 1;
      self.position = 0;
    }
  }
}

/// The largest derivation size reachable from `start`, or `None` if a cycle makes term sizes
/// unbounded.
fn derivation_size_bound<C>(grammar: &TreeGrammar<C>, start: usize) -> Option<usize> {
  let mut in_progress = NatSet::new();
  let mut computed: Vec<Option<usize>> = vec![None; grammar.len()];
  visit_bound(grammar, start, &mut in_progress, &mut computed)
}

fn visit_bound<C>(
  grammar: &TreeGrammar<C>,
  node: usize,
  in_progress: &mut NatSet,
  computed: &mut Vec<Option<usize>>,
) -> Option<usize> {
  if let Some(bound) = computed[node] {
    return Some(bound);
  }
  if !in_progress.insert(node) {
    // back edge: pumping is possible
    return None;
  }

  let mut best = 0usize;
  'rules: for rule in grammar.rules_at(node) {
    let mut total = 1usize;
    for argument in &rule.args {
      match grammar.index_of(argument) {
        None => continue 'rules,
        Some(argument_node) => total += visit_bound(grammar, argument_node, in_progress, computed)?,
      }
    }
    best = best.max(total);
  }

  in_progress.remove(node);
  computed[node] = Some(best);
  Some(best)
}

/// All ways to write `total` as an ordered sum of `parts` positive integers, lexicographically.
fn compositions(total: usize, parts: usize) -> Vec<Vec<usize>> {
  let mut result = Vec::new();
  let mut current = Vec::with_capacity(parts);
  compose_into(total, parts, &mut current, &mut result);
  result
}

fn compose_into(remaining: usize, parts: usize, current: &mut Vec<usize>, result: &mut Vec<Vec<usize>>) {
  if parts == 1 {
    current.push(remaining);
    result.push(current.clone());
    current.pop();
    return;
  }
  for first in 1..=remaining.saturating_sub(parts - 1) {
    current.push(first);
    compose_into(remaining - first, parts - 1, current, result);
    current.pop();
  }
}

/// Pushes every cross product of the argument buckets selected by `split`, applied under
/// `combinator`, onto `out`.
fn cross_products<C: Clone>(
  combinator: &C,
  argument_nodes: &[usize],
  split: &[usize],
  buckets: &[Vec<Bucket<C>>],
  out: &mut Vec<RcTerm<C>>,
) {
  let parts: Vec<&[RcTerm<C>]> = argument_nodes
    .iter()
    .zip(split)
    .map(|(&node, &size)| buckets[node][size - 1].as_slice())
    .collect();
  if parts.iter().any(|part| part.is_empty()) {
    return;
  }

  let mut odometer = vec![0usize; parts.len()];
  'outer: loop {
    let arguments: Vec<RcTerm<C>> = parts
      .iter()
      .zip(&odometer)
      .map(|(part, &index)| part[index].clone())
      .collect();
    out.push(Rc::new(Term::new(combinator.clone(), arguments)));

    let mut position = parts.len() - 1;
    loop {
      odometer[position] += 1;
      if odometer[position] < parts[position].len() {
        continue 'outer;
      }
      odometer[position] = 0;
      if position == 0 {
        break 'outer;
      }
      position -= 1;
    }
  }
}
