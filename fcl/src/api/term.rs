/*!

Applicative terms: the things inhabitation queries are answered with.

A term applies a combinator to zero or more argument terms. Terms come out of the enumeration
layer maximally shared (`Rc` subtrees), so the structural size is computed once at construction
and cached; the enumerator buckets terms by it.

*/

use std::fmt::Write;
use std::rc::Rc;

use crate::core::format::{FormatStyle, Formattable};

pub type RcTerm<C> = Rc<Term<C>>;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Term<C> {
  combinator: C,
  arguments: Vec<RcTerm<C>>,
  size: usize,
}

impl<C> Term<C> {
  pub fn new(combinator: C, arguments: Vec<RcTerm<C>>) -> Self {
    let size = 1 + arguments.iter().map(|argument| argument.size).sum::<usize>();
    Term { combinator, arguments, size }
  }

  /// A bare combinator, applied to nothing.
  pub fn leaf(combinator: C) -> Self {
    Term::new(combinator, Vec::new())
  }

  #[inline(always)]
  pub fn combinator(&self) -> &C {
    &self.combinator
  }

  #[inline(always)]
  pub fn arguments(&self) -> &[RcTerm<C>] {
    &self.arguments
  }

  /// The number of nodes in the term tree.
  #[inline(always)]
  pub fn size(&self) -> usize {
    self.size
  }

  /// Folds the term bottom-up: every node becomes `apply(combinator, folded arguments)`.
  pub fn interpret<R>(&self, apply: &impl Fn(&C, Vec<R>) -> R) -> R {
    let arguments: Vec<R> = self
      .arguments
      .iter()
      .map(|argument| argument.interpret(apply))
      .collect();
    apply(&self.combinator, arguments)
  }
}

/// Free-function form of [`Term::interpret`].
pub fn interpret_term<C, R, F>(term: &Term<C>, apply: &F) -> R
    where F: Fn(&C, Vec<R>) -> R
{
  term.interpret(apply)
}

impl<C: std::fmt::Display> Formattable for Term<C> {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    write!(out, "{}", self.combinator)?;
    if self.arguments.is_empty() {
      return Ok(());
    }
    write!(out, "(")?;
    for (i, argument) in self.arguments.iter().enumerate() {
      if i > 0 {
        write!(out, ", ")?;
      }
      argument.repr(out, style)?;
    }
    write!(out, ")")
  }
}

impl<C: std::fmt::Display> std::fmt::Display for Term<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.repr(f, FormatStyle::Default)
  }
}

impl<C: std::fmt::Display> std::fmt::Debug for Term<C> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.repr(f, FormatStyle::Debug)
  }
}
