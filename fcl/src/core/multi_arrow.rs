/*!

Multi-arrows: flattened curried function types.

A multi-arrow of arity n is an argument list `[σ₁, …, σₙ]` together with a target `τ`, denoting
`σ₁ → … → σₙ → τ`. Every repository type is presented as its *ladder*: the list of all its
0-ary, 1-ary, … readings, obtained by repeatedly splitting one more arrow layer off the target.
The inhabitation engine consumes repository types exclusively in this form.

*/

use std::fmt::Write;

use fcl_abs::{smallvec, SmallVec};

use crate::core::format::{FormatStyle, Formattable};
use crate::core::ty::{repr_ty_list, Ty, TypeAtom};
use crate::impl_display_debug_for_formattable;

/// Argument vectors are short for any reasonable combinator arity.
pub type ArgVec = SmallVec<[Ty; 4]>;

#[derive(Clone, PartialEq, Eq)]
pub struct MultiArrow {
  pub args: ArgVec,
  pub target: Ty,
}

impl MultiArrow {
  #[inline(always)]
  pub fn arity(&self) -> usize {
    self.args.len()
  }
}

impl Formattable for MultiArrow {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    repr_ty_list(&self.args, out, style)?;
    match style {
      FormatStyle::Ascii => write!(out, " -> ")?,
      _ => write!(out, " → ")?,
    }
    self.target.repr(out, style)
  }
}

impl_display_debug_for_formattable!(MultiArrow);

/// Presents `ty` as its ladder of 0-ary, 1-ary, …, n-ary function types. Level k+1 is obtained
/// from level k by splitting each target along every arrow member whose own target is not ω;
/// the ladder ends when no member splits further.
pub fn function_types(ty: &Ty) -> Vec<Vec<MultiArrow>> {
  let mut levels: Vec<Vec<MultiArrow>> = Vec::new();
  let mut current: Vec<MultiArrow> = vec![MultiArrow { args: smallvec![], target: ty.clone() }];

  while !current.is_empty() {
    let next: Vec<MultiArrow> = current
      .iter()
      .flat_map(|multi_arrow| {
        unary_splits(&multi_arrow.target).map(move |(source, target)| {
          let mut args = multi_arrow.args.clone();
          args.push(source);
          MultiArrow { args, target }
        })
      })
      .collect();
    levels.push(current);
    current = next;
  }

  levels
}

/// The unary splittings of `ty`: each arrow member with a non-ω target, as a (source, target)
/// pair.
fn unary_splits(ty: &Ty) -> impl Iterator<Item = (Ty, Ty)> + '_ {
  ty.atoms().iter().filter_map(|atom| match atom {
    TypeAtom::Arrow { source, target } if !target.is_omega() => {
      Some((source.clone(), target.clone()))
    }
    _ => None,
  })
}
