/*!

The subtype decision procedure.

`Subtypes` holds a taxonomy: a relation on nominal constructor names, supplied as a mapping from
each name to its immediate supertype names. Construction closes the relation reflexively and
transitively, so deciding whether one constructor name is below another is a single membership
test at query time.

`check_subtype` decides `σ ≤ τ` for canonical types. The procedure is target-directed: it
recurses on the structure of the supertype, collecting from the subtype the evidence each
supertype atom demands. All supertype atoms must be satisfied.

## Lifecycle and Ownership

A `Subtypes` is immutable once built, with one exception: repository normalization extends the
taxonomy with synthetic tag names and recomputes the closures before any query runs. After that
the engine and any number of callers may share it read-only.

*/

use fcl_abs::{HashMap, HashSet, IString};

use crate::core::ty::{Ty, TypeAtom};

#[derive(Default)]
pub struct Subtypes {
  /// Maps each name to every name above it, reflexively and transitively closed.
  environment: HashMap<IString, HashSet<IString>>,
}

impl Subtypes {
  /// Builds the taxonomy from a mapping of names to their immediate supertype names.
  pub fn new(environment: HashMap<IString, HashSet<IString>>) -> Self {
    Subtypes {
      environment: Self::transitive_closure(Self::reflexive_closure(&environment)),
    }
  }

  /// The empty taxonomy: every name is related only to itself.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Is `name` below `ancestor` in the closed taxonomy? Names absent from the environment are
  /// treated as having only themselves as supertype.
  #[inline(always)]
  fn has_supertype(&self, name: &IString, ancestor: &IString) -> bool {
    self
      .environment
      .get(name)
      .map_or(false, |supertypes| supertypes.contains(ancestor))
  }

  /// Decides whether `subtype ≤ supertype`.
  pub fn check_subtype(&self, subtype: &Ty, supertype: &Ty) -> bool {
    if supertype.atoms().iter().all(TypeAtom::is_omega) {
      return true;
    }

    for atom in supertype.atoms() {
      // An ω-equivalent member constrains nothing; everything is below σ → ω.
      if atom.is_omega() {
        continue;
      }
      let satisfied = match atom {
        TypeAtom::Constructor { name, arg } => {
          // Every constructor of the subtype at or below `name` contributes its argument.
          let relevant: Vec<Ty> = subtype
            .atoms()
            .iter()
            .filter_map(|sub| match sub {
              TypeAtom::Constructor { name: sub_name, arg: sub_arg }
                if sub_name == name || self.has_supertype(sub_name, name) =>
              {
                Some(sub_arg.clone())
              }
              _ => None,
            })
            .collect();
          !relevant.is_empty() && self.check_subtype(&Ty::intersect(relevant), arg)
        }

        TypeAtom::Arrow { source, target } => {
          // Arrows whose source is liberal enough contribute their target (contravariance).
          let casted = Ty::intersect(subtype.atoms().iter().filter_map(|sub| match sub {
            TypeAtom::Arrow { source: sub_source, target: sub_target }
              if self.check_subtype(source, sub_source) =>
            {
              Some(sub_target.clone())
            }
            _ => None,
          }));
          casted.atom_count() != 0 && self.check_subtype(&casted, target)
        }

        TypeAtom::Product { left, right } => {
          let lefts: Vec<Ty> = subtype
            .atoms()
            .iter()
            .filter_map(|sub| match sub {
              TypeAtom::Product { left: sub_left, .. } => Some(sub_left.clone()),
              _ => None,
            })
            .collect();
          let rights: Vec<Ty> = subtype
            .atoms()
            .iter()
            .filter_map(|sub| match sub {
              TypeAtom::Product { right: sub_right, .. } => Some(sub_right.clone()),
              _ => None,
            })
            .collect();
          !lefts.is_empty()
            && !rights.is_empty()
            && self.check_subtype(&Ty::intersect(lefts), left)
            && self.check_subtype(&Ty::intersect(rights), right)
        }
      };

      if !satisfied {
        return false;
      }
    }

    true
  }

  /// Keeps only the minimal elements of `types` under `≤`; one representative per equivalence
  /// class survives.
  pub fn minimize(&self, types: &[Ty]) -> Vec<Ty> {
    let mut result: Vec<Ty> = Vec::new();
    for ty in types {
      if result.iter().all(|kept| !self.check_subtype(kept, ty)) {
        let mut next = vec![ty.clone()];
        next.extend(result.drain(..).filter(|kept| !self.check_subtype(ty, kept)));
        result = next;
      }
    }
    result
  }

  /// Merges additional immediate-supertype edges into the taxonomy and recomputes the closures.
  /// Used by repository normalization to wire in synthetic tag names.
  pub(crate) fn extend_environment(&mut self, additional: impl IntoIterator<Item = (IString, HashSet<IString>)>) {
    let mut raw: HashMap<IString, HashSet<IString>> = self.environment.clone();
    for (name, supertypes) in additional {
      raw.entry(name).or_default().extend(supertypes);
    }
    self.environment = Self::transitive_closure(Self::reflexive_closure(&raw));
  }

  fn reflexive_closure(environment: &HashMap<IString, HashSet<IString>>) -> HashMap<IString, HashSet<IString>> {
    let mut all_names: HashSet<IString> = environment.keys().cloned().collect();
    for supertypes in environment.values() {
      all_names.extend(supertypes.iter().cloned());
    }

    all_names
      .into_iter()
      .map(|name| {
        let mut supertypes: HashSet<IString> = environment.get(&name).cloned().unwrap_or_default();
        supertypes.insert(name.clone());
        (name, supertypes)
      })
      .collect()
  }

  fn transitive_closure(environment: HashMap<IString, HashSet<IString>>) -> HashMap<IString, HashSet<IString>> {
    let mut result = environment;
    let mut changed = true;

    while changed {
      changed = false;
      let snapshot = result.clone();
      for supertypes in result.values_mut() {
        let additions: Vec<IString> = supertypes
          .iter()
          .flat_map(|supertype| snapshot.get(supertype).into_iter().flatten())
          .filter(|candidate| !supertypes.contains(*candidate))
          .cloned()
          .collect();
        if !additions.is_empty() {
          changed = true;
          supertypes.extend(additions);
        }
      }
    }

    result
  }
}

/// Builds a taxonomy environment from string pairs; test and example convenience.
pub fn environment_from<'a>(
  edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> HashMap<IString, HashSet<IString>> {
  let mut environment: HashMap<IString, HashSet<IString>> = HashMap::new();
  for (name, supertype) in edges {
    environment
      .entry(IString::from(name))
      .or_default()
      .insert(IString::from(supertype));
  }
  environment
}
