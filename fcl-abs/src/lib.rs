/*!

Types/type aliases that abstract over the implementing backing type.

A motivating example is the `IString` type, an interned string type. A number of external crates
could provide this functionality. This module redirects to whatever chosen implementation we want.
To use the [`string_cache` crate](https://crates.io/crates/string_cache), we just define `IString`
as an alias for `string_cache::DefaultAtom`:

```ignore
pub use string_cache::DefaultAtom as IString;
```

The `ustr` crate could serve the same role with only the alias changing. For infrastructure whose
candidate backends differ more in their public APIs, we keep a thin module of our own and hide the
backend behind it: `NatSet` wraps a bit-vector set, `log` wraps the `tracing` macros behind a
global threshold, and `OrderedMap` is a small insertion-ordered map that no single external crate
provides in quite the shape the engine wants.

*/

mod nat_set;
mod ordered_map;
mod partial_ordering;
mod string_util;

pub mod log;

// region Hashing data structures
pub use std::collections::{HashMap, HashSet};

// For vectors that are expected to have few elements.
pub use smallvec::{smallvec, SmallVec};
// endregion

// Logging
pub use tracing;

// Interned string. `DefaultAtom` is a global cache that can be shared across threads.
pub use string_cache::DefaultAtom as IString;

// A set of (small) natural numbers
pub use nat_set::NatSet;

// Insertion-ordered maps with stable indices
pub use ordered_map::OrderedMap;

// Partial orderings
pub use partial_ordering::{partial_ordering_from_le, PartialOrdering};

// Join sequences with a separator
pub use string_util::{join_iter, join_string};
