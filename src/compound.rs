use std::fmt;

use indexmap::IndexMap;

use crate::{NbtString, Value};

/// An ordered mapping from string keys to tags.
///
/// Insertion order is preserved and significant for round-tripping, but
/// two compounds with the same entries in different orders are equal.
/// Keys are [`NbtString`] so that undecodable names survive a
/// decode/encode round trip; lookups take a plain `&str`.
///
/// ```
/// use nbtkit::{Compound, Value};
///
/// let mut compound = Compound::new();
/// compound.insert("counter", 0i32);
/// assert_eq!(compound.get("counter"), Some(&Value::Int(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    entries: IndexMap<NbtString, Value>,
}

impl Compound {
    pub fn new() -> Compound {
        Compound {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Lookup by full key, including malformed ones.
    pub fn get_entry(&self, key: &NbtString) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, converting raw host values into their matching
    /// variant. Returns the previous value for the key, if any. An
    /// existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<NbtString>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &NbtString> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, NbtString, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, NbtString, Value> {
        self.entries.iter_mut()
    }

    /// Recursively merge entries from another compound into this one.
    /// Nested compounds merge key by key, everything else is overwritten.
    pub fn merge(&mut self, other: &Compound) {
        for (key, value) in other.iter() {
            let merged = match (self.entries.get_mut(key), value) {
                (Some(Value::Compound(existing)), Value::Compound(incoming)) => {
                    existing.merge(incoming);
                    true
                }
                _ => false,
            };
            if !merged {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    /// A copy of `defaults` with this compound's entries layered on top,
    /// recursively. Later (self) keys win; used when consecutive path
    /// `{...}` filters collapse into one.
    pub fn with_defaults(&self, defaults: &Compound) -> Compound {
        let mut result = defaults.clone();
        for (key, value) in self.iter() {
            let value = match (result.entries.get(key), value) {
                (Some(Value::Compound(base)), Value::Compound(over)) => {
                    Value::Compound(over.with_defaults(base))
                }
                _ => value.clone(),
            };
            result.entries.insert(key.clone(), value);
        }
        result
    }

    /// Structural subset match: true iff every entry of `pattern` exists
    /// here with a recursively matching value.
    pub fn matches(&self, pattern: &Compound) -> bool {
        pattern
            .iter()
            .all(|(key, wanted)| self.get_entry(key).map_or(false, |value| value.matches(wanted)))
    }
}

impl<K: Into<NbtString>, V: Into<Value>> FromIterator<(K, V)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Compound {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a NbtString, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, NbtString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Compound {
    type Item = (NbtString, Value);
    type IntoIter = indexmap::map::IntoIter<NbtString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::Compound(self.clone()), f)
    }
}
