/*!

The inhabitation engine.

`FiniteCombinatoryLogic` preprocesses a repository (combinator → type) into normalized
multi-arrow ladders and answers inhabitation queries over it. A query runs a worklist of target
types: each popped target is decomposed into its paths, every combinator's every arity level is
asked for the minimal ways its multi-arrow targets can cover those paths, and each surviving
cover contributes one grammar alternative whose argument types are pushed back onto the
worklist. Saturation is guaranteed because every generated target is built from paths of
existing types and arrow sources of the fixed repository, all in canonical form; the `seen` set
therefore closes.

The worklist pops from the back and pushes fresh subqueries to the front. Nothing semantic
hangs on that discipline; it biases exploration toward the original query targets.

*/

use std::collections::VecDeque;

use fcl_abs::{debug, trace, HashSet, IString};

use crate::core::combinatorics::{maximal_elements, minimal_covers};
use crate::core::grammar::{Rule, TreeGrammar};
use crate::core::multi_arrow::{function_types, ArgVec, MultiArrow};
use crate::core::repository::{collect_constructor_names, optimize_ty, TagExtension};
use crate::core::subtypes::Subtypes;
use crate::core::ty::Ty;

pub struct FiniteCombinatoryLogic<C> {
  /// Combinators with their ladder-decomposed, normalized types, in insertion order.
  repository: Vec<(C, Vec<Vec<MultiArrow>>)>,
  subtypes: Subtypes,
}

impl<C: Clone> FiniteCombinatoryLogic<C> {
  /// Normalizes the repository types (tag optimization), extends the taxonomy accordingly, and
  /// decomposes every entry into its multi-arrow ladder.
  pub fn new(repository: impl IntoIterator<Item = (C, Ty)>, mut subtypes: Subtypes) -> Self {
    let entries: Vec<(C, Ty)> = repository.into_iter().collect();

    let mut user_names: HashSet<IString> = HashSet::new();
    for (_, ty) in &entries {
      collect_constructor_names(ty, &mut user_names);
    }

    let mut extension = TagExtension::new(user_names);
    let repository: Vec<(C, Vec<Vec<MultiArrow>>)> = entries
      .into_iter()
      .map(|(combinator, ty)| {
        let optimized = optimize_ty(&ty, &mut extension);
        (combinator, function_types(&optimized))
      })
      .collect();
    subtypes.extend_environment(extension.into_edges());

    FiniteCombinatoryLogic { repository, subtypes }
  }

  /// The taxonomy in force, including the synthetic tag names added by normalization.
  pub fn subtypes(&self) -> &Subtypes {
    &self.subtypes
  }

  /// Constructs the tree grammar of all inhabitants of the given targets, pruned to productive
  /// rules.
  pub fn inhabit(&self, targets: &[Ty]) -> TreeGrammar<C> {
    let mut memo: TreeGrammar<C> = TreeGrammar::new();
    let mut seen: HashSet<Ty> = HashSet::new();
    let mut queue: VecDeque<Ty> = targets.iter().cloned().collect();

    while let Some(target) = queue.pop_back() {
      if !seen.insert(target.clone()) {
        continue;
      }
      // ω is inhabited by everything; as a grammar nonterminal it is junk.
      if target.is_omega() {
        continue;
      }

      debug!("inhabiting target {}", target);
      let paths: Vec<Ty> = target
        .organized()
        .atoms()
        .iter()
        .map(|atom| Ty::from_atom(atom.clone()))
        .collect();

      for (combinator, ladder) in &self.repository {
        for level in ladder {
          for subquery in self.subqueries(level, &paths) {
            for argument in &subquery {
              queue.push_front(argument.clone());
            }
            memo.add_rule(&target, Rule { combinator: combinator.clone(), args: subquery });
          }
        }
      }
    }

    memo.prune()
  }

  /// The argument vectors under which the multi-arrows of one arity level jointly produce the
  /// current target: minimal covers of its paths, argument positions intersected across each
  /// cover, dominated vectors dropped.
  fn subqueries(&self, level: &[MultiArrow], paths: &[Ty]) -> Vec<ArgVec> {
    let covers = minimal_covers(level, paths, |multi_arrow, path| {
      self.subtypes.check_subtype(&multi_arrow.target, path)
    });
    if covers.is_empty() {
      return Vec::new();
    }
    trace!("{} minimal cover(s) at arity {}", covers.len(), level.first().map_or(0, MultiArrow::arity));

    let arity = level.first().map_or(0, MultiArrow::arity);
    let intersected: Vec<ArgVec> = covers
      .iter()
      .map(|cover| {
        (0..arity)
          .map(|position| {
            Ty::intersect(cover.iter().map(|&index| level[index].args[position].clone()))
          })
          .collect()
      })
      .collect();

    // Only maximal argument vectors survive; a dominated vector asks strictly more of the
    // arguments than another alternative already does.
    maximal_elements(intersected, |left, right| {
      left
        .iter()
        .zip(right.iter())
        .all(|(left_arg, right_arg)| self.subtypes.check_subtype(left_arg, right_arg))
    })
  }
}
