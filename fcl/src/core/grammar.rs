/*!

The tree grammar produced by inhabitation.

A grammar maps each target type (a nonterminal) to the ordered list of its alternatives; an
alternative (`Rule`) is a combinator together with the argument types its application must be
given. Alternatives reference other nonterminals purely by type value, so the mutual recursion
between nonterminals needs no owning links: the `OrderedMap` storage assigns every nonterminal
a stable dense index, and all bookkeeping over the grammar (pruning, reachability) runs on
`NatSet`s of those indices.

Pruning computes the productive nonterminals as a fixed point: a rule is ground when every
argument type is itself a productive grammar entry, and an entry is productive when some rule of
it is ground. Non-productive entries are deleted outright (not merely emptied), so after
pruning every argument type occurring anywhere in the grammar is again a grammar key.

*/

use std::fmt::Write;

use fcl_abs::{debug, NatSet, OrderedMap};

use crate::core::format::{FormatStyle, Formattable};
use crate::core::multi_arrow::ArgVec;
use crate::core::ty::Ty;

/// One alternative of a nonterminal: apply `combinator` to arguments of the listed types.
#[derive(Clone, PartialEq, Eq)]
pub struct Rule<C> {
  pub combinator: C,
  pub args: ArgVec,
}

pub struct TreeGrammar<C> {
  entries: OrderedMap<Ty, Vec<Rule<C>>>,
}

impl<C> Default for TreeGrammar<C> {
  fn default() -> Self {
    TreeGrammar { entries: OrderedMap::new() }
  }
}

impl<C> TreeGrammar<C> {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn contains_target(&self, target: &Ty) -> bool {
    self.entries.contains_key(target)
  }

  pub fn get(&self, target: &Ty) -> Option<&[Rule<C>]> {
    self.entries.get(target).map(Vec::as_slice)
  }

  /// The dense index assigned to `target`, if it is a nonterminal of this grammar.
  pub fn index_of(&self, target: &Ty) -> Option<usize> {
    self.entries.index_of(target)
  }

  pub fn target_at(&self, index: usize) -> Option<&Ty> {
    self.entries.key_at(index)
  }

  pub fn rules_at(&self, index: usize) -> &[Rule<C>] {
    self.entries.value_at(index).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Iterates over `(target, rules)` entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&Ty, &[Rule<C>])> + '_ {
    self.entries.iter().map(|(target, rules)| (target, rules.as_slice()))
  }

  pub fn targets(&self) -> impl Iterator<Item = &Ty> + '_ {
    self.entries.keys()
  }

  pub(crate) fn add_rule(&mut self, target: &Ty, rule: Rule<C>) {
    self
      .entries
      .get_or_insert_with(target.clone(), Vec::new)
      .push(rule);
  }

  fn args_are_ground(&self, args: &[Ty], ground: &NatSet) -> bool {
    args
      .iter()
      .all(|arg| self.entries.index_of(arg).is_some_and(|index| ground.contains(index)))
  }
}

impl<C: Clone> TreeGrammar<C> {
  /// Deletes every non-productive nonterminal and every rule mentioning one. The productive
  /// set is the least fixed point seeded by rules with no arguments.
  pub fn prune(self) -> Self {
    let mut ground = NatSet::new();

    loop {
      let mut changed = false;
      for index in 0..self.entries.len() {
        if ground.contains(index) {
          continue;
        }
        let is_productive = self
          .rules_at(index)
          .iter()
          .any(|rule| self.args_are_ground(&rule.args, &ground));
        if is_productive {
          ground.insert(index);
          changed = true;
        }
      }
      if !changed {
        break;
      }
    }

    let removed = self.entries.len() - ground.len();
    if removed > 0 {
      debug!(removed, retained = ground.len(), "pruned non-productive grammar entries");
    }

    let mut pruned = TreeGrammar::new();
    for (index, (target, rules)) in self.entries.iter().enumerate() {
      if !ground.contains(index) {
        continue;
      }
      let kept: Vec<Rule<C>> = rules
        .iter()
        .filter(|rule| self.args_are_ground(&rule.args, &ground))
        .cloned()
        .collect();
      pruned.entries.insert(target.clone(), kept);
    }
    pruned
  }
}

impl<C: PartialEq> PartialEq for TreeGrammar<C> {
  /// Entry-order-sensitive equality; two equal grammars enumerate identically.
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len()
      && self
        .iter()
        .zip(other.iter())
        .all(|((target, rules), (other_target, other_rules))| {
          target == other_target && rules == other_rules
        })
  }
}

impl<C: PartialEq> Eq for TreeGrammar<C> {}

impl<C: std::fmt::Display> Formattable for Rule<C> {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    write!(out, "{}(", self.combinator)?;
    for (i, arg) in self.args.iter().enumerate() {
      if i > 0 {
        write!(out, ", ")?;
      }
      arg.repr(out, style)?;
    }
    write!(out, ")")
  }
}

impl<C: std::fmt::Display> Formattable for TreeGrammar<C> {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    for (target, rules) in self.iter() {
      target.repr(out, style)?;
      write!(out, " => ")?;
      for (i, rule) in rules.iter().enumerate() {
        if i > 0 {
          write!(out, "; ")?;
        }
        rule.repr(out, style)?;
      }
      writeln!(out)?;
    }
    Ok(())
  }
}

impl<C: std::fmt::Display> std::fmt::Display for TreeGrammar<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.repr(f, FormatStyle::Default)
  }
}

impl<C: std::fmt::Display> std::fmt::Debug for TreeGrammar<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.repr(f, FormatStyle::Debug)
  }
}

#[cfg(test)]
mod tests {
  use fcl_abs::smallvec;

  use super::*;

  fn ctor(name: &str) -> Ty {
    Ty::constructor(name)
  }

  fn leaf_rule(combinator: &'static str) -> Rule<&'static str> {
    Rule { combinator, args: smallvec![] }
  }

  #[test]
  fn pruning_removes_unproductive_entries() {
    let mut grammar: TreeGrammar<&str> = TreeGrammar::new();
    // a => f(b); g()   b has no rules at all
    grammar.add_rule(&ctor("a"), Rule { combinator: "f", args: smallvec![ctor("b")] });
    grammar.add_rule(&ctor("a"), leaf_rule("g"));
    grammar.add_rule(&ctor("c"), Rule { combinator: "h", args: smallvec![ctor("missing")] });

    let pruned = grammar.prune();
    assert_eq!(pruned.len(), 1);
    let rules = pruned.get(&ctor("a")).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].combinator, "g");
    assert!(!pruned.contains_target(&ctor("c")));
  }

  #[test]
  fn pruning_keeps_mutual_recursion_with_a_base_case() {
    let mut grammar: TreeGrammar<&str> = TreeGrammar::new();
    // even => zero(); succ(odd)   odd => succ(even)
    grammar.add_rule(&ctor("even"), leaf_rule("zero"));
    grammar.add_rule(&ctor("even"), Rule { combinator: "succ", args: smallvec![ctor("odd")] });
    grammar.add_rule(&ctor("odd"), Rule { combinator: "succ", args: smallvec![ctor("even")] });

    let pruned = grammar.prune();
    assert_eq!(pruned.len(), 2);
    assert_eq!(pruned.get(&ctor("even")).unwrap().len(), 2);
    assert_eq!(pruned.get(&ctor("odd")).unwrap().len(), 1);
  }

  #[test]
  fn pruning_preserves_entry_order() {
    let mut grammar: TreeGrammar<&str> = TreeGrammar::new();
    grammar.add_rule(&ctor("x"), leaf_rule("a"));
    grammar.add_rule(&ctor("dead"), Rule { combinator: "b", args: smallvec![ctor("void")] });
    grammar.add_rule(&ctor("y"), leaf_rule("c"));

    let pruned = grammar.prune();
    let targets: Vec<&Ty> = pruned.targets().collect();
    assert_eq!(targets, vec![&ctor("x"), &ctor("y")]);
    assert_eq!(pruned.index_of(&ctor("y")), Some(1));
  }

  #[test]
  fn grammar_display() {
    let mut grammar: TreeGrammar<&str> = TreeGrammar::new();
    grammar.add_rule(&ctor("a"), Rule { combinator: "f", args: smallvec![ctor("b")] });
    grammar.add_rule(&ctor("a"), leaf_rule("g"));
    grammar.add_rule(&ctor("b"), leaf_rule("h"));

    let rendered = grammar.to_string();
    assert_eq!(rendered, "a => f(b); g()\nb => h()\n");
  }
}
