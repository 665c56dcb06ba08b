/*!

Intersection types in canonical form.

A type is an unordered finite set of atomic shapes (`TypeAtom`): nominal constructors, arrows,
and products. The empty set is ω, a singleton is that atom, and a larger set is the intersection
of its members. Representing the intersection layer as a set makes the algebraic laws of `∧`
(associativity, commutativity, idempotence, ω as unit) hold definitionally: `A ∧ B`, `B ∧ A`,
and `A ∧ A ∧ B` are one value with one hash.

`Ty` is immutable and cheap to clone (`Arc` inside). Three derived attributes are computed at
construction and cached:

 - `is_omega` — the set is empty or every member is an arrow whose target is ω (ω-saturation);
 - `size` — structural size, the enumeration layer orders output by it;
 - the set hash — an order-independent combination of the member hashes.

The *organized* form (the decomposition of a type into paths whose intersection is equivalent to
it) is computed on first use and cached alongside.

## Lifecycle and Ownership

Types are plain values. Once constructed they are never mutated; every operation that "changes"
a type builds a new one. Sharing is by reference count, so subterms of large repository types
are stored once no matter how many multi-arrows mention them.

*/

use std::{
  collections::hash_map::DefaultHasher,
  fmt::Write,
  hash::{Hash, Hasher},
  sync::Arc,
};

use once_cell::sync::{Lazy, OnceCell};

use fcl_abs::IString;

use crate::core::format::{FormatStyle, Formattable};
use crate::impl_display_debug_for_formattable;

// Rendering precedences, loosest to tightest.
const ARROW_PREC       : u32 = 8;
const PRODUCT_PREC     : u32 = 9;
const INTERSECTION_PREC: u32 = 10;

static PI1: Lazy<IString> = Lazy::new(|| IString::from("Pi1"));
static PI2: Lazy<IString> = Lazy::new(|| IString::from("Pi2"));

/// One atomic shape of the intersection layer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeAtom {
  /// A nominal constructor applied to one argument; nullary constructors carry ω.
  Constructor { name: IString, arg: Ty },
  Arrow { source: Ty, target: Ty },
  Product { left: Ty, right: Ty },
}

impl TypeAtom {
  /// ω-saturation: an arrow to ω carries no information, so it counts as ω itself.
  pub fn is_omega(&self) -> bool {
    match self {
      TypeAtom::Constructor { .. } | TypeAtom::Product { .. } => false,
      TypeAtom::Arrow { target, .. } => target.is_omega(),
    }
  }

  /// Structural size: this node plus all children.
  pub fn size(&self) -> usize {
    match self {
      TypeAtom::Constructor { arg, .. } => 1 + arg.size(),
      TypeAtom::Arrow { source, target } => 1 + source.size() + target.size(),
      TypeAtom::Product { left, right } => 1 + left.size() + right.size(),
    }
  }

  /// Appends the paths of this atom to `out`: intersections are distributed through constructor
  /// arguments and arrow targets until every emitted atom has at most one member there.
  fn collect_paths(&self, out: &mut Vec<TypeAtom>) {
    match self {
      TypeAtom::Constructor { name, arg } => {
        if arg.atom_count() <= 1 {
          out.push(self.clone());
        } else {
          for path in arg.organized().atoms() {
            out.push(TypeAtom::Constructor {
              name: name.clone(),
              arg: Ty::from_atom(path.clone()),
            });
          }
        }
      }

      TypeAtom::Arrow { source, target } => match target.atom_count() {
        0 => {}
        1 => out.push(self.clone()),
        _ => {
          for path in target.organized().atoms() {
            out.push(TypeAtom::Arrow {
              source: source.clone(),
              target: Ty::from_atom(path.clone()),
            });
          }
        }
      },

      TypeAtom::Product { left, right } => {
        if left.atom_count() + right.atom_count() <= 1 {
          out.push(self.clone());
        } else {
          for path in left.organized().atoms() {
            out.push(TypeAtom::Product {
              left: Ty::from_atom(path.clone()),
              right: Ty::omega(),
            });
          }
          for path in right.organized().atoms() {
            out.push(TypeAtom::Product {
              left: Ty::omega(),
              right: Ty::from_atom(path.clone()),
            });
          }
        }
      }
    }
  }

  fn repr_prec(&self, out: &mut dyn Write, style: FormatStyle, prec: u32) -> std::fmt::Result {
    match self {
      TypeAtom::Constructor { name, arg } => {
        if arg.atom_count() == 0 {
          write!(out, "{}", name)
        } else {
          write!(out, "{}(", name)?;
          arg.repr_prec(out, style, 0)?;
          write!(out, ")")
        }
      }

      TypeAtom::Arrow { source, target } => {
        let needs_parens = prec > ARROW_PREC;
        if needs_parens {
          write!(out, "(")?;
        }
        source.repr_prec(out, style, ARROW_PREC + 1)?;
        match style {
          FormatStyle::Ascii => write!(out, " -> ")?,
          _ => write!(out, " → ")?,
        }
        // Right-associative: the target reuses this precedence level.
        target.repr_prec(out, style, ARROW_PREC)?;
        if needs_parens {
          write!(out, ")")?;
        }
        Ok(())
      }

      TypeAtom::Product { left, right } => {
        let needs_parens = prec > PRODUCT_PREC;
        if needs_parens {
          write!(out, "(")?;
        }
        left.repr_prec(out, style, PRODUCT_PREC + 1)?;
        match style {
          FormatStyle::Ascii => write!(out, " * ")?,
          _ => write!(out, " × ")?,
        }
        right.repr_prec(out, style, PRODUCT_PREC + 1)?;
        if needs_parens {
          write!(out, ")")?;
        }
        Ok(())
      }
    }
  }
}

impl Formattable for TypeAtom {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    self.repr_prec(out, style, 0)
  }
}

impl_display_debug_for_formattable!(TypeAtom);

struct TyInner {
  /// Deduplicated members in first-occurrence order.
  atoms: Vec<TypeAtom>,
  set_hash: u64,
  is_omega: bool,
  size: usize,
  organized: OnceCell<Ty>,
}

/// A canonical intersection type: an immutable, shared set of `TypeAtom`s.
#[derive(Clone)]
pub struct Ty(Arc<TyInner>);

impl Ty {
  // region Construction

  pub fn new(atoms: impl IntoIterator<Item = TypeAtom>) -> Ty {
    let mut unique: Vec<TypeAtom> = Vec::new();
    for atom in atoms {
      if !unique.contains(&atom) {
        unique.push(atom);
      }
    }

    // Order-independent: equal sets get equal hashes no matter how they were assembled.
    let set_hash = unique.iter().map(atom_hash).fold(0u64, u64::wrapping_add);
    let is_omega = unique.iter().all(TypeAtom::is_omega);
    let size = unique.iter().map(TypeAtom::size).sum();

    Ty(Arc::new(TyInner {
      atoms: unique,
      set_hash,
      is_omega,
      size,
      organized: OnceCell::new(),
    }))
  }

  /// The top type: the empty intersection.
  pub fn omega() -> Ty {
    Ty::new([])
  }

  /// A nullary nominal constructor.
  pub fn constructor(name: impl Into<IString>) -> Ty {
    Ty::constructor_arg(name, Ty::omega())
  }

  /// A nominal constructor applied to `arg`.
  pub fn constructor_arg(name: impl Into<IString>, arg: Ty) -> Ty {
    Ty::from_atom(TypeAtom::Constructor { name: name.into(), arg })
  }

  pub fn arrow(source: Ty, target: Ty) -> Ty {
    Ty::from_atom(TypeAtom::Arrow { source, target })
  }

  /// The product encoding `Pi1(left) ∧ Pi2(right)`.
  pub fn product(left: Ty, right: Ty) -> Ty {
    Ty::new([
      TypeAtom::Constructor { name: PI1.clone(), arg: left },
      TypeAtom::Constructor { name: PI2.clone(), arg: right },
    ])
  }

  /// Intersects all given types by flattening their member sets into one.
  pub fn intersect(types: impl IntoIterator<Item = Ty>) -> Ty {
    Ty::new(types.into_iter().flat_map(|ty| ty.0.atoms.clone()))
  }

  /// Folds `[t₁, …, tₙ]` into the curried function type `t₁ → t₂ → … → tₙ`.
  /// An empty slice gives ω.
  pub fn arrows(types: &[Ty]) -> Ty {
    let mut iter = types.iter().rev();
    let Some(last) = iter.next() else {
      return Ty::omega();
    };
    iter.fold(last.clone(), |target, source| Ty::arrow(source.clone(), target))
  }

  pub fn from_atom(atom: TypeAtom) -> Ty {
    Ty::new([atom])
  }

  // endregion Construction

  // region Accessors

  #[inline(always)]
  pub fn atoms(&self) -> &[TypeAtom] {
    &self.0.atoms
  }

  #[inline(always)]
  pub fn atom_count(&self) -> usize {
    self.0.atoms.len()
  }

  #[inline(always)]
  pub fn is_omega(&self) -> bool {
    self.0.is_omega
  }

  #[inline(always)]
  pub fn size(&self) -> usize {
    self.0.size
  }

  /// The path decomposition: a set of atoms whose intersection is equivalent to `self` under
  /// subtyping in both directions. Computed once and cached.
  pub fn organized(&self) -> &Ty {
    self.0.organized.get_or_init(|| {
      let mut paths = Vec::new();
      for atom in &self.0.atoms {
        atom.collect_paths(&mut paths);
      }
      Ty::new(paths)
    })
  }

  // endregion Accessors

  fn repr_prec(&self, out: &mut dyn Write, style: FormatStyle, prec: u32) -> std::fmt::Result {
    match self.0.atoms.as_slice() {
      [] => match style {
        FormatStyle::Ascii => write!(out, "omega"),
        _ => write!(out, "ω"),
      },
      [atom] => atom.repr_prec(out, style, prec),
      atoms => {
        let needs_parens = prec > INTERSECTION_PREC;
        if needs_parens {
          write!(out, "(")?;
        }
        let separator = match style {
          FormatStyle::Ascii => " & ",
          _ => " ∧ ",
        };
        for (i, atom) in atoms.iter().enumerate() {
          if i > 0 {
            write!(out, "{}", separator)?;
          }
          atom.repr_prec(out, style, INTERSECTION_PREC + 1)?;
        }
        if needs_parens {
          write!(out, ")")?;
        }
        Ok(())
      }
    }
  }
}

fn atom_hash(atom: &TypeAtom) -> u64 {
  let mut hasher = DefaultHasher::new();
  atom.hash(&mut hasher);
  hasher.finish()
}

impl PartialEq for Ty {
  /// Set equality over the members.
  fn eq(&self, other: &Self) -> bool {
    if Arc::ptr_eq(&self.0, &other.0) {
      return true;
    }
    if self.0.set_hash != other.0.set_hash || self.0.atoms.len() != other.0.atoms.len() {
      return false;
    }
    self.0.atoms.iter().all(|atom| other.0.atoms.contains(atom))
  }
}

impl Eq for Ty {}

impl Hash for Ty {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u64(self.0.set_hash);
  }
}

impl Formattable for Ty {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    self.repr_prec(out, style, 0)?;
    if style == FormatStyle::Debug {
      write!(out, "⟨size {}⟩", self.size())?;
    }
    Ok(())
  }
}

impl_display_debug_for_formattable!(Ty);

/// Renders a list of types as `[t₁, t₂, …]`; grammar and multi-arrow displays share it.
pub(crate) fn repr_ty_list(types: &[Ty], out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
  write!(out, "[")?;
  for (i, ty) in types.iter().enumerate() {
    if i > 0 {
      write!(out, ", ")?;
    }
    ty.repr_prec(out, style, 0)?;
  }
  write!(out, "]")
}

#[cfg(test)]
mod tests {
  use super::*;
  use fcl_abs::HashSet;

  fn a() -> Ty {
    Ty::constructor("a")
  }

  fn b() -> Ty {
    Ty::constructor("b")
  }

  #[test]
  fn intersection_is_a_set() {
    let ab = Ty::intersect([a(), b()]);
    let ba = Ty::intersect([b(), a()]);
    let aab = Ty::intersect([a(), a(), b()]);

    assert_eq!(ab, ba);
    assert_eq!(ab, aab);
    assert_eq!(aab.atom_count(), 2);

    // same value, same hash
    let mut seen = HashSet::new();
    seen.insert(ab.clone());
    assert!(seen.contains(&ba));
    assert!(seen.contains(&aab));
    assert_eq!(seen.len(), 1);
  }

  #[test]
  fn omega_saturation() {
    assert!(Ty::omega().is_omega());
    assert!(!a().is_omega());
    // an arrow into ω is ω
    assert!(Ty::arrow(a(), Ty::omega()).is_omega());
    // ...even through several layers
    assert!(Ty::arrow(a(), Ty::arrow(b(), Ty::omega())).is_omega());
    assert!(!Ty::arrow(a(), b()).is_omega());
  }

  #[test]
  fn structural_size() {
    assert_eq!(Ty::omega().size(), 0);
    assert_eq!(a().size(), 1);
    assert_eq!(Ty::arrow(a(), b()).size(), 3);
    assert_eq!(Ty::intersect([a(), b()]).size(), 2);
    assert_eq!(Ty::constructor_arg("c", Ty::intersect([a(), b()])).size(), 3);
  }

  #[test]
  fn organizing_distributes_constructors() {
    let c_ab = Ty::constructor_arg("c", Ty::intersect([a(), b()]));
    let organized = c_ab.organized();
    assert_eq!(organized.atom_count(), 2);
    assert!(organized.atoms().contains(&Ty::constructor_arg("c", a()).atoms()[0]));
    assert!(organized.atoms().contains(&Ty::constructor_arg("c", b()).atoms()[0]));
  }

  #[test]
  fn organizing_distributes_arrow_targets() {
    let arrow = Ty::arrow(a(), Ty::intersect([b(), Ty::constructor("d")]));
    let organized = arrow.organized();
    assert_eq!(organized.atom_count(), 2);
    assert!(organized.atoms().contains(&Ty::arrow(a(), b()).atoms()[0]));
    assert!(organized.atoms().contains(&Ty::arrow(a(), Ty::constructor("d")).atoms()[0]));
  }

  #[test]
  fn organizing_omega_and_paths() {
    assert_eq!(Ty::omega().organized().atom_count(), 0);
    // an arrow with ω target vanishes
    assert_eq!(Ty::arrow(a(), Ty::omega()).organized().atom_count(), 0);
    // a path organizes to itself
    let path = Ty::arrow(a(), b());
    assert_eq!(path.organized(), &path);
  }

  #[test]
  fn product_encodes_as_projections() {
    let pair = Ty::product(a(), b());
    assert_eq!(pair.atom_count(), 2);
    assert_eq!(pair, Ty::intersect([
      Ty::constructor_arg("Pi1", a()),
      Ty::constructor_arg("Pi2", b()),
    ]));
  }

  #[test]
  fn arrows_folds_right() {
    let abc = Ty::arrows(&[a(), b(), Ty::constructor("d")]);
    assert_eq!(abc, Ty::arrow(a(), Ty::arrow(b(), Ty::constructor("d"))));
    assert_eq!(Ty::arrows(&[]), Ty::omega());
    assert_eq!(Ty::arrows(&[a()]), a());
  }

  #[test]
  fn display_rendering() {
    assert_eq!(Ty::omega().to_string(), "ω");
    assert_eq!(a().to_string(), "a");
    assert_eq!(Ty::arrow(a(), b()).to_string(), "a → b");
    // right associativity
    assert_eq!(Ty::arrows(&[a(), b(), a()]).to_string(), "a → b → a");
    // arrow on the left is parenthesized
    assert_eq!(Ty::arrow(Ty::arrow(a(), b()), a()).to_string(), "(a → b) → a");
    assert_eq!(Ty::intersect([a(), b()]).to_string(), "a ∧ b");
    assert_eq!(Ty::constructor_arg("c", Ty::intersect([a(), b()])).to_string(), "c(a ∧ b)");

    let mut ascii = String::new();
    Ty::arrow(a(), Ty::omega()).repr(&mut ascii, FormatStyle::Ascii).unwrap();
    assert_eq!(ascii, "a -> omega");
  }
}
