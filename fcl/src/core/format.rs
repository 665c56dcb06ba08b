/*!

There is more than one useful text representation for types, multi-arrows, grammars, and terms:
mathematical notation for humans, plain ASCII for logs and machine-adjacent output, and an
annotated form for debugging. This module provides a unified API for formatting objects across
the project.

The trait such types implement is `Formattable`. It works like the standard library's `Display`
except that it threads a `FormatStyle` through the recursion. `Display` and `Debug` cannot be
blanket-implemented for every `T: Formattable`, so a convenience macro does it per type:

```rust
# use fcl::core::format::{Formattable, FormatStyle};
# use fcl::impl_display_debug_for_formattable;
struct MyStruct;
impl Formattable for MyStruct {
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result {
    write!(out, "MyStruct[{:?}]", style)
  }
}
impl_display_debug_for_formattable!(MyStruct);
```

*/

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FormatStyle {
  #[default]
  Default, // Mathematical notation: ω, ∧, →, ×
  Ascii,   // Pure ASCII: omega, &, ->, *
  Debug,   // Default notation with extra debugging information
}

pub trait Formattable {
  /// Writes a text representation of `self` according to the given `FormatStyle`.
  /// Use `format!` and friends to create a string.
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result;
}

#[macro_export]
macro_rules! impl_display_debug_for_formattable {
  ($t:ty) => {
    impl std::fmt::Display for $t {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <$t as $crate::core::format::Formattable>::repr(self, f, $crate::core::format::FormatStyle::Default)
      }
    }

    impl std::fmt::Debug for $t {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <$t as $crate::core::format::Formattable>::repr(self, f, $crate::core::format::FormatStyle::Debug)
      }
    }
  };
}
pub use impl_display_debug_for_formattable;
