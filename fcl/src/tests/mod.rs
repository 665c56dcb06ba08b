/*!

End-to-end tests exercising the whole pipeline: repository normalization, subtyping through a
taxonomy, grammar construction and pruning, enumeration, and interpretation. Laws that concern
a single module live in that module's tests; everything here crosses at least two.

*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fcl_abs::{HashMap, HashSet, IString};

use crate::api::enumeration::{enumerate_terms, enumerate_terms_of_size};
use crate::api::inhabit_and_interpret;
use crate::core::inhabitation::FiniteCombinatoryLogic;
use crate::core::subtypes::{environment_from, Subtypes};
use crate::core::ty::{Ty, TypeAtom};

fn ctor(name: &str) -> Ty {
  Ty::constructor(name)
}

/// K and I over free atoms, plus a self-map combinator that makes `a → a` infinitely
/// inhabited.
fn ki_repository() -> Vec<(&'static str, Ty)> {
  let a_to_a = Ty::arrow(ctor("a"), ctor("a"));
  vec![
    ("K", Ty::arrows(&[ctor("a"), ctor("b"), ctor("a")])),
    ("I", a_to_a.clone()),
    ("twice", Ty::arrow(a_to_a.clone(), a_to_a)),
  ]
}

#[test]
fn identity_family_enumerates_in_size_order() {
  let engine = FiniteCombinatoryLogic::new(ki_repository(), Subtypes::empty());
  let query = Ty::arrow(ctor("a"), ctor("a"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));

  // I inhabits the query directly...
  let rules = grammar.get(&query).expect("a → a must be inhabited");
  assert!(rules.iter().any(|rule| rule.combinator == "I" && rule.args.is_empty()));
  // ...and the self-map keeps the family infinite
  assert!(rules.iter().any(|rule| rule.combinator == "twice"));

  let terms: Vec<String> = enumerate_terms(&query, &grammar, Some(3))
    .map(|term| term.to_string())
    .collect();
  assert_eq!(terms, vec!["I", "twice(I)", "twice(twice(I))"]);

  let sizes: Vec<usize> = enumerate_terms(&query, &grammar, Some(6))
    .map(|term| term.size())
    .collect();
  for window in sizes.windows(2) {
    assert!(window[0] <= window[1], "sizes must be non-decreasing: {:?}", sizes);
  }
}

#[test]
fn constant_combinator_alone_cannot_specialize() {
  // With only K and I, the sole inhabitant of a → a is I itself: K's result type b → a
  // never matches, and there is no composition operator to build new functions with.
  let repository = vec![
    ("K", Ty::arrows(&[ctor("a"), ctor("b"), ctor("a")])),
    ("I", Ty::arrow(ctor("a"), ctor("a"))),
  ];
  let engine = FiniteCombinatoryLogic::new(repository, Subtypes::empty());
  let query = Ty::arrow(ctor("a"), ctor("a"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));

  let terms: Vec<String> = enumerate_terms(&query, &grammar, None)
    .map(|term| term.to_string())
    .collect();
  assert_eq!(terms, vec!["I"]);
}

#[test]
fn enumerated_terms_respect_rule_arities() {
  let engine = FiniteCombinatoryLogic::new(ki_repository(), Subtypes::empty());
  let query = Ty::arrow(ctor("a"), ctor("a"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));

  fn check(term: &crate::api::term::Term<&'static str>) {
    match *term.combinator() {
      "I" => assert_eq!(term.arguments().len(), 0),
      "twice" => assert_eq!(term.arguments().len(), 1),
      other => panic!("unexpected combinator {}", other),
    }
    for argument in term.arguments() {
      check(argument);
    }
  }
  for term in enumerate_terms(&query, &grammar, Some(10)) {
    check(&term);
  }
}

#[test]
fn tagged_repository_end_to_end() {
  // The repository type c(A ∧ B) normalizes to c(__A_B__); both projections of the query
  // succeed through the extended taxonomy, all the way to interpretation.
  let repository = vec![("c0", Ty::constructor_arg("c", Ty::intersect([ctor("A"), ctor("B")])))];

  for query in [
    Ty::constructor_arg("c", ctor("A")),
    Ty::constructor_arg("c", ctor("B")),
  ] {
    let names: Vec<String> = inhabit_and_interpret(
      repository.clone(),
      std::slice::from_ref(&query),
      None,
      None,
      |combinator: &&str, _arguments: Vec<String>| combinator.to_string(),
    )
    .collect();
    assert_eq!(names, vec!["c0"]);
  }
}

#[test]
fn queries_left_untagged_keep_their_grammar_keys() {
  // Normalization rewrites repository types only; the grammar stays keyed by the original
  // query so callers can look their own types up.
  let repository = vec![("c0", Ty::constructor_arg("c", Ty::intersect([ctor("A"), ctor("B")])))];
  let engine = FiniteCombinatoryLogic::new(repository, Subtypes::empty());
  let query = Ty::constructor_arg("c", ctor("A"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));
  assert!(grammar.contains_target(&query));
}

#[test]
fn products_inhabit_componentwise() {
  let repository = vec![
    ("l0", ctor("L")),
    ("r0", ctor("R")),
    (
      "mk_pair",
      Ty::arrows(&[ctor("L"), ctor("R"), Ty::product(ctor("L"), ctor("R"))]),
    ),
  ];
  let engine = FiniteCombinatoryLogic::new(repository, Subtypes::empty());
  let query = Ty::product(ctor("L"), ctor("R"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));

  let terms: Vec<String> = enumerate_terms(&query, &grammar, None)
    .map(|term| term.to_string())
    .collect();
  assert_eq!(terms, vec!["mk_pair(l0, r0)"]);
}

#[test]
fn full_pipeline_is_deterministic() {
  // exercise the logging setup alongside; repeated initialization must be harmless
  fcl_abs::log::init_logging(fcl_abs::log::LoggingThreshold::Warning);

  let run = || {
    let engine = FiniteCombinatoryLogic::new(ki_repository(), Subtypes::empty());
    let query = Ty::arrow(ctor("a"), ctor("a"));
    let grammar = engine.inhabit(std::slice::from_ref(&query));
    let terms: Vec<String> = enumerate_terms(&query, &grammar, Some(8))
      .map(|term| term.to_string())
      .collect();
    (grammar, terms)
  };

  let (first_grammar, first_terms) = run();
  let (second_grammar, second_terms) = run();
  assert_eq!(first_grammar, second_grammar);
  assert_eq!(first_terms, second_terms);
}

#[test]
fn exact_size_slices_match_the_stream() {
  let engine = FiniteCombinatoryLogic::new(ki_repository(), Subtypes::empty());
  let query = Ty::arrow(ctor("a"), ctor("a"));
  let grammar = engine.inhabit(std::slice::from_ref(&query));

  for size in 1..=5 {
    let of_size = enumerate_terms_of_size(&query, &grammar, size);
    let from_stream: Vec<String> = enumerate_terms(&query, &grammar, Some(32))
      .filter(|term| term.size() == size)
      .map(|term| term.to_string())
      .collect();
    let of_size: Vec<String> = of_size.iter().map(|term| term.to_string()).collect();
    assert_eq!(of_size, from_stream, "size {} slice diverged", size);
  }
}

#[test]
fn deep_arrow_chains_with_a_shifted_taxonomy() {
  // Ten-way intersections of unary constructors under eight arrow layers; the shifted
  // taxonomy relates the argument names upward, which helps covariant positions only.
  let block = |range: std::ops::Range<u32>| {
    Ty::intersect(range.map(|i| Ty::constructor_arg("a", Ty::constructor(i.to_string()))))
  };
  let ib = block(0..10);
  let ic = block(10..20);
  let arrb = Ty::arrows(&vec![ib.clone(); 8]);
  let arrc = Ty::arrows(&vec![ic.clone(); 8]);

  let mut environment: HashMap<IString, HashSet<IString>> = HashMap::new();
  for k in 0..10u32 {
    environment
      .entry(IString::from(k.to_string()))
      .or_default()
      .insert(IString::from((k + 10).to_string()));
  }
  let subtypes = Subtypes::new(environment);

  assert!(subtypes.check_subtype(&ib, &ic));
  assert!(!subtypes.check_subtype(&ic, &ib));
  // The sources are contravariant, so the lifted arrow chains do not relate.
  assert!(!subtypes.check_subtype(&arrb, &arrc));
}

// region Randomized structural laws

fn random_ty(rng: &mut StdRng, depth: usize) -> Ty {
  let names = ["A", "B", "C", "D"];
  let name = names[rng.gen_range(0..names.len())];
  let shape = if depth == 0 { 0 } else { rng.gen_range(0..5) };
  match shape {
    0 => ctor(name),
    1 => Ty::omega(),
    2 => Ty::arrow(random_ty(rng, depth - 1), random_ty(rng, depth - 1)),
    3 => Ty::intersect([random_ty(rng, depth - 1), random_ty(rng, depth - 1)]),
    _ => Ty::constructor_arg(name, random_ty(rng, depth - 1)),
  }
}

#[test]
fn random_types_satisfy_the_subtyping_laws() {
  let subtypes = Subtypes::new(environment_from([("A", "B")]));
  let mut rng = StdRng::seed_from_u64(0x5eed);

  for _ in 0..200 {
    let ty = random_ty(&mut rng, 3);

    // reflexivity and ω as top
    assert!(subtypes.check_subtype(&ty, &ty), "{} ≰ itself", ty);
    assert!(subtypes.check_subtype(&ty, &Ty::omega()), "{} ≰ ω", ty);

    // idempotence, as values and as judgments
    let doubled = Ty::intersect([ty.clone(), ty.clone()]);
    assert_eq!(ty, doubled);
    assert!(subtypes.check_subtype(&ty, &doubled));
    assert!(subtypes.check_subtype(&doubled, &ty));

    // ω under arrow
    assert!(subtypes.check_subtype(&ty, &Ty::arrow(ctor("A"), Ty::omega())));

    // the organized form is equivalent in both directions
    let organized = ty.organized();
    assert!(subtypes.check_subtype(&ty, organized), "{} ≰ organized({})", ty, ty);
    assert!(subtypes.check_subtype(organized, &ty), "organized({}) ≰ {}", ty, ty);
  }
}

#[test]
fn direct_products_agree_with_their_encoding() {
  let subtypes = Subtypes::new(environment_from([("A", "B")]));
  let mut rng = StdRng::seed_from_u64(0xfcf);

  for _ in 0..100 {
    let (l1, r1) = (random_ty(&mut rng, 2), random_ty(&mut rng, 2));
    let (l2, r2) = (random_ty(&mut rng, 2), random_ty(&mut rng, 2));

    let encoded = subtypes.check_subtype(&Ty::product(l1.clone(), r1.clone()), &Ty::product(l2.clone(), r2.clone()));
    let direct = subtypes.check_subtype(
      &Ty::from_atom(TypeAtom::Product { left: l1, right: r1 }),
      &Ty::from_atom(TypeAtom::Product { left: l2, right: r2 }),
    );
    assert_eq!(encoded, direct);
  }
}

// endregion Randomized structural laws
