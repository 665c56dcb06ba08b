/*!

An `OrderedMap` is a hash map that remembers the order in which keys were first inserted and
assigns each key a stable, dense index. Iteration visits entries in insertion order, so any
output derived from a walk over the map is reproducible from the construction order alone, and
the indices let client code mirror the map with index sets (`NatSet`) or parallel vectors.

Lookups go through an ordinary `HashMap`; the price of the ordering is one `Vec` of keys.

*/

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

pub struct OrderedMap<K, V>
    where K: Hash + Clone + Eq
{
  /// Maps an index to a key of the hash map below
  keys: Vec<K>,
  /// Maps a key to its index and value
  entries: HashMap<K, (usize, V)>,
}

impl<K, V> Default for OrderedMap<K, V>
    where K: Hash + Clone + Eq
{
  fn default() -> Self {
    Self {
      keys: Vec::new(),
      entries: HashMap::new(),
    }
  }
}

impl<K, V> OrderedMap<K, V>
    where K: Hash + Clone + Eq
{
  pub fn new() -> Self {
    Self::default()
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.keys.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  #[inline(always)]
  pub fn contains_key(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  /// The index assigned to `key` at first insertion.
  pub fn index_of(&self, key: &K) -> Option<usize> {
    self.entries.get(key).map(|(index, _)| *index)
  }

  pub fn get(&self, key: &K) -> Option<&V> {
    self.entries.get(key).map(|(_, value)| value)
  }

  pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
    self.entries.get_mut(key).map(|(_, value)| value)
  }

  pub fn key_at(&self, index: usize) -> Option<&K> {
    self.keys.get(index)
  }

  pub fn value_at(&self, index: usize) -> Option<&V> {
    self.keys.get(index).and_then(|key| self.get(key))
  }

  /// Inserts `value` under `key`. An existing entry keeps its index and returns the replaced
  /// value; a new entry is appended after all existing ones.
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    let index = self.keys.len();
    match self.entries.entry(key.clone()) {
      Entry::Occupied(mut occupied) => {
        let existing_index = occupied.get().0;
        let (_, old) = occupied.insert((existing_index, value));
        Some(old)
      }
      Entry::Vacant(vacant) => {
        vacant.insert((index, value));
        self.keys.push(key);
        None
      }
    }
  }

  /// Returns the value under `key`, inserting `make()` first if the key is new.
  pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
    let index = self.keys.len();
    match self.entries.entry(key.clone()) {
      Entry::Occupied(occupied) => &mut occupied.into_mut().1,
      Entry::Vacant(vacant) => {
        self.keys.push(key);
        &mut vacant.insert((index, make())).1
      }
    }
  }

  /// Iterates over `(key, value)` pairs in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
    self.keys.iter().map(move |key| {
      let (_, value) = &self.entries[key];
      (key, value)
    })
  }

  pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
    self.keys.iter()
  }
}
