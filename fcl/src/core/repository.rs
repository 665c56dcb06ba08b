/*!

Repository normalization, known as tag optimization.

Subtyping over nullary constructors is the hottest operation the engine performs. To keep the
organized forms of repository types small, every intersection block of two or more nullary
constructors `a ∧ b ∧ …` inside a repository type is replaced by a single synthetic nullary
constructor `__a_b_…__` over the sorted names, and the taxonomy is extended so that the
inclusions the block participated in still hold:

 - the tag of a name set is below the tag of each of its non-empty subsets, and
 - each singleton tag `__n__` is below the original name `n`.

After the edges are inserted the reflexive and transitive closures are recomputed. A lone
nullary constructor stays untouched: it is already atomic, and tagging it would divorce
repository types from the untransformed queries they are compared against. Oversized blocks
stay untouched too: the extension enumerates every non-empty subset of the block, so past
`MAX_TAGGED_BLOCK` names the table dwarfs whatever the tag saves, and the untagged form is
always valid — the transform is an acceleration, never a requirement.

The transform preserves the subtyping judgments the engine makes between repository types and
the subqueries generated from them. When the user taxonomy itself relates names inside a tagged
block, the nominal encoding cannot express every consequence of the block's tag; the judgments
then err toward fewer inhabitants.

*/

use fcl_abs::{debug, warning, HashSet, IString};

use crate::core::combinatorics::non_empty_subsets;
use crate::core::ty::{Ty, TypeAtom};

/// The largest simple-atom block normalization will tag. The taxonomy extension lists every
/// non-empty subset of the block, which is exponential in its width.
const MAX_TAGGED_BLOCK: usize = 16;

/// Accumulates the taxonomy extension produced while normalizing a repository, together with
/// the user-supplied constructor names used to flag tag collisions.
pub(crate) struct TagExtension {
  user_names: HashSet<IString>,
  registered: HashSet<IString>,
  edges: Vec<(IString, HashSet<IString>)>,
}

impl TagExtension {
  pub fn new(user_names: HashSet<IString>) -> Self {
    TagExtension {
      user_names,
      registered: HashSet::new(),
      edges: Vec::new(),
    }
  }

  /// The accumulated immediate-supertype edges for `Subtypes::extend_environment`.
  pub fn into_edges(self) -> Vec<(IString, HashSet<IString>)> {
    self.edges
  }

  /// Registers a tag for the (sorted, deduplicated) name block and returns its name.
  fn register(&mut self, names: &[IString]) -> IString {
    let tag = tag_name(names);
    if !self.registered.insert(tag.clone()) {
      return tag;
    }
    if self.user_names.contains(&tag) {
      warning!("synthetic tag {} collides with a repository constructor name", tag);
    }

    // The tag sits below the tag of every non-empty subset of its block.
    let subset_tags: HashSet<IString> = non_empty_subsets(names)
      .iter()
      .map(|subset| tag_name(subset))
      .collect();
    self.edges.push((tag.clone(), subset_tags));

    // Singleton tags anchor the block back into the original nominal hierarchy.
    for name in names {
      let singleton = tag_name(std::slice::from_ref(name));
      self.edges.push((singleton, HashSet::from([name.clone()])));
    }

    tag
  }
}

fn tag_name(names: &[IString]) -> IString {
  let mut joined = String::from("__");
  for (i, name) in names.iter().enumerate() {
    if i > 0 {
      joined.push('_');
    }
    joined.push_str(name);
  }
  joined.push_str("__");
  IString::from(joined)
}

/// Rewrites one repository type, replacing every simple block by its tag and recording the
/// taxonomy extension in `extension`.
pub(crate) fn optimize_ty(ty: &Ty, extension: &mut TagExtension) -> Ty {
  let mut simple_names: Vec<IString> = Vec::new();
  let mut rewritten: Vec<TypeAtom> = Vec::new();

  for atom in ty.atoms() {
    match atom {
      TypeAtom::Constructor { name, arg } if arg.atom_count() == 0 => {
        if !simple_names.contains(name) {
          simple_names.push(name.clone());
        }
      }
      TypeAtom::Constructor { name, arg } => rewritten.push(TypeAtom::Constructor {
        name: name.clone(),
        arg: optimize_ty(arg, extension),
      }),
      TypeAtom::Arrow { source, target } => rewritten.push(TypeAtom::Arrow {
        source: optimize_ty(source, extension),
        target: optimize_ty(target, extension),
      }),
      TypeAtom::Product { left, right } => rewritten.push(TypeAtom::Product {
        left: optimize_ty(left, extension),
        right: optimize_ty(right, extension),
      }),
    }
  }

  match simple_names.len() {
    0 => Ty::new(rewritten),
    1 => {
      // A lone nullary constructor is already atomic.
      rewritten.push(TypeAtom::Constructor {
        name: simple_names.remove(0),
        arg: Ty::omega(),
      });
      Ty::new(rewritten)
    }
    count if count > MAX_TAGGED_BLOCK => {
      debug!("leaving a block of {} nullary constructors untagged", count);
      for name in simple_names {
        rewritten.push(TypeAtom::Constructor { name, arg: Ty::omega() });
      }
      Ty::new(rewritten)
    }
    _ => {
      simple_names.sort_by(|left, right| str::cmp(left, right));
      let tag = extension.register(&simple_names);
      rewritten.push(TypeAtom::Constructor { name: tag, arg: Ty::omega() });
      Ty::new(rewritten)
    }
  }
}

/// Collects every constructor name occurring in `ty`; the engine gathers these across the
/// repository before normalizing so tag collisions can be flagged.
pub(crate) fn collect_constructor_names(ty: &Ty, out: &mut HashSet<IString>) {
  for atom in ty.atoms() {
    match atom {
      TypeAtom::Constructor { name, arg } => {
        out.insert(name.clone());
        collect_constructor_names(arg, out);
      }
      TypeAtom::Arrow { source, target } => {
        collect_constructor_names(source, out);
        collect_constructor_names(target, out);
      }
      TypeAtom::Product { left, right } => {
        collect_constructor_names(left, out);
        collect_constructor_names(right, out);
      }
    }
  }
}
