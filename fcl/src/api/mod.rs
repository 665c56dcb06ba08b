/*!

The user-facing surface: terms, enumeration, and the one-call convenience that runs the whole
pipeline — build the engine, inhabit the queries, enumerate the inhabitants, and interpret each
term through a caller-supplied application function.

*/

use std::rc::Rc;

use crate::core::inhabitation::FiniteCombinatoryLogic;
use crate::core::subtypes::Subtypes;
use crate::core::ty::Ty;

pub mod enumeration;
pub mod term;

use self::enumeration::enumerate_terms;

/// Inhabits every query against `repository`, enumerates the resulting terms query by query
/// (each capped at `max_count` if given), and interprets them through `apply`. An absent
/// `subtypes` means the empty taxonomy.
pub fn inhabit_and_interpret<C, R, F>(
  repository: impl IntoIterator<Item = (C, Ty)>,
  queries: &[Ty],
  max_count: Option<usize>,
  subtypes: Option<Subtypes>,
  apply: F,
) -> impl Iterator<Item = R>
    where C: Clone,
          F: Fn(&C, Vec<R>) -> R
{
  let engine = FiniteCombinatoryLogic::new(repository, subtypes.unwrap_or_default());
  let grammar = Rc::new(engine.inhabit(queries));
  let apply = Rc::new(apply);
  let queries: Vec<Ty> = queries.to_vec();

  queries.into_iter().flat_map(move |query| {
    let apply = Rc::clone(&apply);
    enumerate_terms(&query, Rc::clone(&grammar), max_count)
      .map(move |term| term.interpret(apply.as_ref()))
  })
}
