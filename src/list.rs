use std::fmt;

use crate::error::Result;
use crate::value::IntoTag;
use crate::{Kind, Value};

/// An ordered, homogeneous sequence of tags.
///
/// Every list carries a declared element subtype. Lists built without an
/// explicit subtype infer one from their items (see [`List::from_items`]);
/// a list that never sees a typed element keeps the `End` subtype and is
/// only valid while empty. All mutating operations route through the
/// [`IntoTag`] cast-on-insert contract against the declared subtype.
///
/// ```
/// use nbtkit::{Kind, List, Value};
///
/// let mut list = List::from_items(vec![Value::Int(1), Value::Int(2)]).unwrap();
/// assert_eq!(list.subtype(), &Kind::Int);
/// list.push(3i32).unwrap(); // raw values cast into the subtype
/// assert!(list.push("four").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct List {
    subtype: Kind,
    items: Vec<Value>,
}

impl List {
    /// An empty list with no subtype yet.
    pub fn new() -> List {
        List {
            subtype: Kind::End,
            items: Vec::new(),
        }
    }

    /// An empty list with an explicit subtype.
    pub fn with_subtype(subtype: Kind) -> List {
        List {
            subtype,
            items: Vec::new(),
        }
    }

    /// Build a list by inferring the subtype from the items, then casting
    /// each item to it.
    ///
    /// Inference looks at tag-typed items only; raw values are deferred
    /// to the cast. The first tag seen is the candidate and wins outright
    /// unless it is itself a list type, in which case later items may
    /// generalize it to the deepest common `List[List[...]]` shape.
    pub fn from_items<T: IntoTag>(items: impl IntoIterator<Item = T>) -> Result<List> {
        let items: Vec<T> = items.into_iter().collect();
        let subtype = infer_subtype(items.iter().filter_map(IntoTag::tag_kind));
        let mut list = List::with_subtype(subtype);
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Build a list with an explicit subtype, casting each item to it.
    pub fn typed<T: IntoTag>(subtype: Kind, items: impl IntoIterator<Item = T>) -> Result<List> {
        let mut list = List::with_subtype(subtype);
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Used by the binary decoder, which knows its payloads already have
    /// the declared element type.
    pub(crate) fn from_parts(subtype: Kind, items: Vec<Value>) -> List {
        List { subtype, items }
    }

    /// The declared element subtype. `Kind::End` means uninferred.
    pub fn subtype(&self) -> &Kind {
        &self.subtype
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Append an item, casting it to the declared subtype. Pushing a tag
    /// into a subtype-less list adopts the tag's kind.
    pub fn push(&mut self, item: impl IntoTag) -> Result<()> {
        let value = item.into_tag(&self.subtype)?;
        if self.subtype == Kind::End {
            self.subtype = value.kind();
        }
        self.items.push(value);
        Ok(())
    }

    /// Insert an item at `index`, casting it to the declared subtype.
    pub fn insert(&mut self, index: usize, item: impl IntoTag) -> Result<()> {
        let value = item.into_tag(&self.subtype)?;
        if self.subtype == Kind::End {
            self.subtype = value.kind();
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Overwrite the item at `index`, casting the new value to the
    /// declared subtype.
    pub fn set(&mut self, index: usize, item: impl IntoTag) -> Result<()> {
        let value = item.into_tag(&self.subtype)?;
        self.items[index] = value;
        Ok(())
    }

    /// Append every item of an iterator, casting each one.
    pub fn extend<T: IntoTag>(&mut self, items: impl IntoIterator<Item = T>) -> Result<()> {
        for item in items {
            self.push(item)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Value {
        self.items.remove(index)
    }

    /// Convert to a list of `subtype` by casting every element. Used when
    /// a whole list is inserted into a list-of-lists of a different
    /// element type; the conversion is lossless or it fails.
    pub(crate) fn recast(self, subtype: &Kind) -> Result<List> {
        let mut list = List::with_subtype(subtype.clone());
        for item in self.items {
            list.push(item)?;
        }
        Ok(list)
    }
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}

// Equality intentionally ignores the declared subtype: two empty lists
// with different inferred subtypes are the same value, and the binary
// decoder types nested lists shallower than literal inference does.
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::List(self.clone()), f)
    }
}

/// Infer a list subtype from the kinds of its tag-typed items.
fn infer_subtype(kinds: impl Iterator<Item = Kind>) -> Kind {
    let mut subtype = Kind::End;

    for kind in kinds {
        if subtype == Kind::End {
            subtype = kind;
            if !matches!(subtype, Kind::List(_)) {
                return subtype;
            }
        } else if subtype != kind {
            // Peel one list layer off both sides in lockstep to find the
            // deepest common list-of-list shape.
            let mut ours = &subtype;
            let mut theirs = &kind;
            let mut depth = 0usize;
            while let (Kind::List(s), Kind::List(i)) = (ours, theirs) {
                ours = &**s;
                theirs = &**i;
                depth += 1;
            }

            if *ours == Kind::End {
                subtype = kind;
            } else if *theirs != Kind::End {
                let mut generic = Kind::End;
                for _ in 0..depth {
                    generic = Kind::List(Box::new(generic));
                }
                return generic;
            }
        }
    }
    subtype
}
