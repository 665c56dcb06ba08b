/*!

Inhabitation for a finite combinatory logic with intersection types.

Given a *repository* of typed combinators and a target type, the engine decides whether
applicative terms of that type exist and produces a tree grammar generating all of them; a lazy
enumerator materializes concrete terms from the grammar in size order. Types are built from
nominal constructors (related through a user-supplied taxonomy), arrows, products, intersection,
and the top type ω. The calculus is purely propositional: no type variables, no unification.

```
use fcl::{enumerate_terms, FiniteCombinatoryLogic, Subtypes, Ty};

let repository = vec![
  ("zero", Ty::constructor("nat")),
  ("succ", Ty::arrow(Ty::constructor("nat"), Ty::constructor("nat"))),
];
let engine = FiniteCombinatoryLogic::new(repository, Subtypes::empty());

let query = Ty::constructor("nat");
let grammar = engine.inhabit(std::slice::from_ref(&query));

let terms: Vec<String> = enumerate_terms(&query, &grammar, Some(3))
  .map(|term| term.to_string())
  .collect();
assert_eq!(terms, vec!["zero", "succ(zero)", "succ(succ(zero))"]);
```

*/

pub mod api;
pub mod core;

#[cfg(test)]
mod tests;

pub use crate::api::enumeration::{
  enumerate_terms,
  enumerate_terms_iter,
  enumerate_terms_of_size,
  EnumeratedTerms,
};
pub use crate::api::inhabit_and_interpret;
pub use crate::api::term::{interpret_term, RcTerm, Term};
pub use crate::core::format::{FormatStyle, Formattable};
pub use crate::core::grammar::{Rule, TreeGrammar};
pub use crate::core::inhabitation::FiniteCombinatoryLogic;
pub use crate::core::subtypes::{environment_from, Subtypes};
pub use crate::core::ty::{Ty, TypeAtom};
