//! Selecting and mutating deeply nested tags with NBT paths.
//!
//! A [`Path`] is a sequence of [`Accessor`]s applied left to right to a
//! multiset of candidate nodes, starting from the root. Paths parse from
//! the same token stream as SNBT literals, so quoted keys, numbers and
//! embedded `{...}` compound filters all behave like their literal
//! counterparts.
//!
//! ```
//! use nbtkit::{snbt, Path, Value};
//!
//! let root = snbt::from_str("{a: {b: [{v: 1}, {v: 2}]}}").unwrap();
//! let path = Path::parse("a.b[].v").unwrap();
//! assert_eq!(path.get_all(&root), vec![Value::Int(1), Value::Int(2)]);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::snbt::{self, Parser, TokenKind};
use crate::{Compound, Kind, NbtString, Value};

/// One step of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// Select a compound entry by exact key.
    Key(String),
    /// Select one element of a list or array by index (negative counts
    /// from the end), or every element when `None`.
    Index(Option<i64>),
    /// Keep only candidates that structurally match the pattern.
    Match(Compound),
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) => {
                let unquoted = !key.is_empty()
                    && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if unquoted {
                    f.write_str(key)
                } else {
                    write!(f, "\"{}\"", key.replace('"', "\\\""))
                }
            }
            Accessor::Index(Some(index)) => write!(f, "[{}]", index),
            Accessor::Index(None) => f.write_str("[]"),
            Accessor::Match(compound) => {
                f.write_str(&snbt::to_string(&Value::Compound(compound.clone())))
            }
        }
    }
}

/// A parsed NBT path.
///
/// Paths render back to a canonical string form, and paths parsed from
/// equivalent spellings compare equal: consecutive `{...}` filters merge
/// (later keys override, recursively), and `[{...}]` is a wildcard index
/// followed by a filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    accessors: Vec<Accessor>,
}

impl Path {
    /// The empty path, which selects the root itself.
    pub fn new() -> Path {
        Path::default()
    }

    /// Parse a path from its textual form.
    pub fn parse(input: &str) -> Result<Path> {
        input.parse()
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// This path extended with a named key.
    pub fn key(&self, key: impl Into<String>) -> Path {
        let mut path = self.clone();
        // Key accessors never invalidate a path.
        let _ = extend_accessors(&mut path.accessors, Accessor::Key(key.into()));
        path
    }

    /// This path extended with a concrete list index.
    pub fn index(&self, index: i64) -> Path {
        let mut path = self.clone();
        let _ = extend_accessors(&mut path.accessors, Accessor::Index(Some(index)));
        path
    }

    /// This path extended with the wildcard index, selecting every
    /// element.
    pub fn all(&self) -> Path {
        let mut path = self.clone();
        let _ = extend_accessors(&mut path.accessors, Accessor::Index(None));
        path
    }

    /// This path extended with a compound filter. Fails when the filter
    /// would directly follow a concrete index.
    pub fn matching(&self, pattern: Compound) -> Result<Path> {
        let mut path = self.clone();
        extend_accessors(&mut path.accessors, Accessor::Match(pattern))?;
        Ok(path)
    }

    /// Every value selected by this path, in traversal order. Array
    /// elements come back as integer tags of the element width.
    pub fn get_all(&self, root: &Value) -> Vec<Value> {
        let mut nodes: Vec<Cow<'_, Value>> = vec![Cow::Borrowed(root)];
        for accessor in &self.accessors {
            nodes = apply_accessor(accessor, nodes);
        }
        nodes.into_iter().map(Cow::into_owned).collect()
    }

    /// The first value selected by this path, if any.
    pub fn get(&self, root: &Value) -> Option<Value> {
        self.get_all(root).into_iter().next()
    }

    /// Overwrite every slot selected by this path with `value`.
    ///
    /// The last key or index accessor performs the write; trailing
    /// `{...}` filters select on the value being replaced. Writing into
    /// a typed list casts the new value against the list subtype and
    /// fails like any other incompatible insertion. A path with no key
    /// or index accessor has nothing to write to and does nothing.
    pub fn set(&self, root: &mut Value, value: &Value) -> Result<()> {
        let Some((navigation, slot, filters)) = self.split_slot() else {
            return Ok(());
        };
        descend(navigation, root, &mut |parent| {
            set_slot(slot, filters, parent, value)
        })
    }

    /// Delete every slot selected by this path. List and array slots are
    /// removed in reverse index order so earlier indices stay valid.
    pub fn delete(&self, root: &mut Value) {
        let Some((navigation, slot, filters)) = self.split_slot() else {
            return;
        };
        // Deletion never casts, so the visitor cannot fail.
        let _ = descend(navigation, root, &mut |parent| {
            delete_slot(slot, filters, parent);
            Ok(())
        });
    }

    /// Split at the last slot-bearing accessor: everything before it
    /// navigates, everything after it is a filter on the slot value.
    fn split_slot(&self) -> Option<(&[Accessor], &Accessor, &[Accessor])> {
        let position = self
            .accessors
            .iter()
            .rposition(|accessor| !matches!(accessor, Accessor::Match(_)))?;
        let (navigation, rest) = self.accessors.split_at(position);
        Some((navigation, &rest[0], &rest[1..]))
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(input: &str) -> Result<Path> {
        let mut accessors = Vec::new();
        for accessor in parse_accessors(input)? {
            extend_accessors(&mut accessors, accessor)?;
        }
        Ok(Path { accessors })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments: Vec<String> = vec![String::new()];

        for accessor in &self.accessors {
            let segment = accessor.to_string();
            let last = segments.last_mut().expect("segments starts non-empty");

            if segment.starts_with('[') {
                last.push_str(&segment);
            } else if segment.starts_with('{') {
                if last.ends_with("[]") {
                    last.truncate(last.len() - 2);
                    last.push('[');
                    last.push_str(&segment);
                    last.push(']');
                } else {
                    last.push_str(&segment);
                }
            } else {
                segments.push(segment);
            }
        }

        let joined = segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl PartialEq<str> for Path {
    fn eq(&self, other: &str) -> bool {
        Path::parse(other).map_or(false, |other| *self == other)
    }
}

impl PartialEq<&str> for Path {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

/// Append an accessor, normalizing filters: consecutive filters merge
/// into one, and a filter directly after a concrete index is invalid.
fn extend_accessors(accessors: &mut Vec<Accessor>, new: Accessor) -> Result<()> {
    if let Accessor::Match(pattern) = &new {
        match accessors.last_mut() {
            Some(Accessor::Match(previous)) => {
                *previous = pattern.with_defaults(previous);
                return Ok(());
            }
            Some(Accessor::Index(Some(index))) => {
                return Err(Error::InvalidPath(format!(
                    "Can't match a compound on list items selected with [{}]",
                    index
                )));
            }
            _ => {}
        }
    }
    accessors.push(new);
    Ok(())
}

/// Read accessors out of a path string by repeatedly parsing SNBT values
/// from its token stream.
fn parse_accessors(input: &str) -> Result<Vec<Accessor>> {
    let mut parser = match Parser::new(input) {
        Ok(parser) => parser,
        // No tokens at all: the empty path.
        Err(_) => return Ok(Vec::new()),
    };

    let mut accessors = Vec::new();
    loop {
        let value = parser.parse().map_err(|error| match error {
            Error::InvalidLiteral { span, .. } => {
                Error::InvalidPath(format!("Invalid path at position {}", span.0))
            }
            other => other,
        })?;

        match value {
            Value::String(NbtString::Text(text)) => {
                if parser.current.kind == TokenKind::QuotedString {
                    accessors.push(Accessor::Key(text));
                } else {
                    // A bare word splits on embedded dots.
                    accessors.extend(
                        text.split('.')
                            .filter(|key| !key.is_empty())
                            .map(|key| Accessor::Key(key.to_owned())),
                    );
                }
            }
            Value::List(list) => {
                if list.is_empty() {
                    accessors.push(Accessor::Index(None));
                } else if list.len() != 1 {
                    return Err(Error::InvalidPath(
                        "Brackets should only contain one element".to_owned(),
                    ));
                } else if *list.subtype() == Kind::Compound {
                    let pattern = match list.into_iter().next() {
                        Some(Value::Compound(pattern)) => pattern,
                        _ => unreachable!("compound-subtyped list holds compounds"),
                    };
                    accessors.push(Accessor::Index(None));
                    accessors.push(Accessor::Match(pattern));
                } else {
                    let index = match list.get(0) {
                        Some(Value::Int(index)) => Some(*index as i64),
                        Some(Value::String(text)) => {
                            text.as_str().and_then(|s| s.parse::<i64>().ok())
                        }
                        _ => None,
                    };
                    match index {
                        Some(index) => accessors.push(Accessor::Index(Some(index))),
                        None => {
                            return Err(Error::InvalidPath(
                                "Brackets should only contain an integer or a compound"
                                    .to_owned(),
                            ))
                        }
                    }
                }
            }
            Value::Compound(pattern) => accessors.push(Accessor::Match(pattern)),
            _ if parser.current.kind == TokenKind::Number => {
                // Numeric path segments are taken verbatim, split on
                // their dots, suffix characters included.
                accessors.extend(
                    parser
                        .current
                        .value
                        .split('.')
                        .filter(|key| !key.is_empty())
                        .map(|key| Accessor::Key(key.to_owned())),
                );
            }
            other => {
                return Err(Error::InvalidPath(format!("Invalid path element {}", other)));
            }
        }

        if parser.next().is_err() {
            break;
        }
    }
    Ok(accessors)
}

/// Apply one accessor to the candidate multiset for `get`.
fn apply_accessor<'a>(accessor: &Accessor, nodes: Vec<Cow<'a, Value>>) -> Vec<Cow<'a, Value>> {
    let mut result = Vec::new();

    for node in nodes {
        match accessor {
            Accessor::Key(key) => match node {
                Cow::Borrowed(Value::Compound(compound)) => {
                    if let Some(child) = compound.get(key) {
                        result.push(Cow::Borrowed(child));
                    }
                }
                Cow::Owned(Value::Compound(mut compound)) => {
                    if let Some(child) = compound.remove(key) {
                        result.push(Cow::Owned(child));
                    }
                }
                _ => {}
            },
            Accessor::Index(index) => collect_indexed(node, *index, &mut result),
            Accessor::Match(pattern) => {
                let keep = matches!(
                    node.as_ref(),
                    Value::Compound(compound) if compound.matches(pattern)
                );
                if keep {
                    result.push(node);
                }
            }
        }
    }
    result
}

fn collect_indexed<'a>(node: Cow<'a, Value>, index: Option<i64>, out: &mut Vec<Cow<'a, Value>>) {
    fn picked(index: Option<i64>, length: usize) -> Vec<usize> {
        match index {
            None => (0..length).collect(),
            Some(index) => resolve_index(index, length).into_iter().collect(),
        }
    }

    // Array elements are synthesized as wrapped integer tags of the
    // element width, owned whichever way the array was reached.
    match node.as_ref() {
        Value::ByteArray(array) => {
            for i in picked(index, array.len()) {
                out.push(Cow::Owned(Value::Byte(array[i])));
            }
            return;
        }
        Value::IntArray(array) => {
            for i in picked(index, array.len()) {
                out.push(Cow::Owned(Value::Int(array[i])));
            }
            return;
        }
        Value::LongArray(array) => {
            for i in picked(index, array.len()) {
                out.push(Cow::Owned(Value::Long(array[i])));
            }
            return;
        }
        Value::List(_) => {}
        _ => return,
    }

    match node {
        Cow::Borrowed(Value::List(list)) => {
            for i in picked(index, list.len()) {
                if let Some(item) = list.get(i) {
                    out.push(Cow::Borrowed(item));
                }
            }
        }
        Cow::Owned(Value::List(list)) => {
            for i in picked(index, list.len()) {
                if let Some(item) = list.get(i) {
                    out.push(Cow::Owned(item.clone()));
                }
            }
        }
        _ => {}
    }
}

/// Resolve a possibly negative index against a length, yielding `None`
/// when out of bounds.
fn resolve_index(index: i64, length: usize) -> Option<usize> {
    let length = length as i64;
    let resolved = if index < 0 { length + index } else { index };
    if (0..length).contains(&resolved) {
        Some(resolved as usize)
    } else {
        None
    }
}

/// Walk the navigation accessors, invoking the visitor on every
/// surviving candidate node.
fn descend(
    accessors: &[Accessor],
    node: &mut Value,
    visit: &mut impl FnMut(&mut Value) -> Result<()>,
) -> Result<()> {
    let Some((accessor, rest)) = accessors.split_first() else {
        return visit(node);
    };

    match accessor {
        Accessor::Key(key) => {
            if let Value::Compound(compound) = node {
                if let Some(child) = compound.get_mut(key) {
                    descend(rest, child, visit)?;
                }
            }
        }
        Accessor::Index(Some(index)) => {
            if let Value::List(list) = node {
                if let Some(resolved) = resolve_index(*index, list.len()) {
                    if let Some(child) = list.get_mut(resolved) {
                        descend(rest, child, visit)?;
                    }
                }
            }
        }
        Accessor::Index(None) => {
            if let Value::List(list) = node {
                for child in list.iter_mut() {
                    descend(rest, child, visit)?;
                }
            }
        }
        Accessor::Match(pattern) => {
            let matched = matches!(
                &*node,
                Value::Compound(compound) if compound.matches(pattern)
            );
            if matched {
                descend(rest, node, visit)?;
            }
        }
    }
    Ok(())
}

fn filters_pass(value: &Value, filters: &[Accessor]) -> bool {
    filters.iter().all(|filter| match filter {
        Accessor::Match(pattern) => {
            matches!(value, Value::Compound(compound) if compound.matches(pattern))
        }
        _ => true,
    })
}

/// Perform the terminal write for `set`.
fn set_slot(slot: &Accessor, filters: &[Accessor], parent: &mut Value, value: &Value) -> Result<()> {
    match slot {
        Accessor::Key(key) => {
            if let Value::Compound(compound) = parent {
                // Only keys already present are overwritten; the
                // traversal never creates entries.
                let overwrite = compound
                    .get(key)
                    .map_or(false, |old| filters_pass(old, filters));
                if overwrite {
                    compound.insert(key.as_str(), value.clone());
                }
            }
            Ok(())
        }
        Accessor::Index(index) => match parent {
            Value::List(list) => {
                for i in selected_indices(list.len(), *index, filters, |i| list.get(i)) {
                    list.set(i, value.clone())?;
                }
                Ok(())
            }
            Value::ByteArray(array) => {
                let element = array_element(value, Kind::ByteArray)?;
                for i in selected_indices(array.len(), *index, filters, |_| None) {
                    array[i] = element as i8;
                }
                Ok(())
            }
            Value::IntArray(array) => {
                let element = array_element(value, Kind::IntArray)?;
                for i in selected_indices(array.len(), *index, filters, |_| None) {
                    array[i] = element as i32;
                }
                Ok(())
            }
            Value::LongArray(array) => {
                let element = array_element(value, Kind::LongArray)?;
                for i in selected_indices(array.len(), *index, filters, |_| None) {
                    array[i] = element;
                }
                Ok(())
            }
            _ => Ok(()),
        },
        Accessor::Match(_) => Ok(()),
    }
}

/// Perform the terminal removal for `delete`.
fn delete_slot(slot: &Accessor, filters: &[Accessor], parent: &mut Value) {
    match slot {
        Accessor::Key(key) => {
            if let Value::Compound(compound) = parent {
                let remove = compound
                    .get(key)
                    .map_or(false, |old| filters_pass(old, filters));
                if remove {
                    compound.remove(key);
                }
            }
        }
        Accessor::Index(index) => match parent {
            Value::List(list) => {
                let indices = selected_indices(list.len(), *index, filters, |i| list.get(i));
                for i in indices.into_iter().rev() {
                    list.remove(i);
                }
            }
            Value::ByteArray(array) => {
                let indices = selected_indices(array.len(), *index, filters, |_| None);
                for i in indices.into_iter().rev() {
                    array.remove(i);
                }
            }
            Value::IntArray(array) => {
                let indices = selected_indices(array.len(), *index, filters, |_| None);
                for i in indices.into_iter().rev() {
                    array.remove(i);
                }
            }
            Value::LongArray(array) => {
                let indices = selected_indices(array.len(), *index, filters, |_| None);
                for i in indices.into_iter().rev() {
                    array.remove(i);
                }
            }
            _ => {}
        },
        Accessor::Match(_) => {}
    }
}

/// An integral value for an array slot write, range-checked against the
/// element width.
fn array_element(value: &Value, target: Kind) -> Result<i64> {
    let number = value.as_i64().ok_or_else(|| Error::Cast {
        value: value.to_string(),
        target: target.clone(),
    })?;
    let in_range = match target {
        Kind::ByteArray => i8::try_from(number).is_ok(),
        Kind::IntArray => i32::try_from(number).is_ok(),
        _ => true,
    };
    if in_range {
        Ok(number)
    } else {
        Err(Error::OutOfRange(number))
    }
}

/// The ascending in-bounds indices a slot index selects, after applying
/// filters to the current element values. Array elements are scalars, so
/// a filter never passes for them and `lookup` returns `None`.
fn selected_indices<'v>(
    length: usize,
    index: Option<i64>,
    filters: &[Accessor],
    lookup: impl Fn(usize) -> Option<&'v Value>,
) -> Vec<usize> {
    let candidates: Vec<usize> = match index {
        None => (0..length).collect(),
        Some(index) => resolve_index(index, length).into_iter().collect(),
    };

    if filters.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|&i| lookup(i).map_or(false, |value| filters_pass(value, filters)))
        .collect()
}
