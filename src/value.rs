use std::fmt;

use crate::error::{Error, Result};
use crate::{snbt, Compound, List, NbtString, Tag};

/// The type of a tag, including the element type of lists.
///
/// [`Tag`] is enough to describe a value on the wire, but a list's
/// declared subtype can itself be a list type (`List[List[Int]]`), so the
/// type lattice used by casting and subtype inference needs to recurse.
/// `Kind::End` doubles as "uninferred" for lists that have not seen a
/// typed element yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List(Box<Kind>),
    Compound,
    IntArray,
    LongArray,
}

impl Kind {
    /// The wire tag for values of this kind.
    pub fn tag(&self) -> Tag {
        match self {
            Kind::End => Tag::End,
            Kind::Byte => Tag::Byte,
            Kind::Short => Tag::Short,
            Kind::Int => Tag::Int,
            Kind::Long => Tag::Long,
            Kind::Float => Tag::Float,
            Kind::Double => Tag::Double,
            Kind::ByteArray => Tag::ByteArray,
            Kind::String => Tag::String,
            Kind::List(_) => Tag::List,
            Kind::Compound => Tag::Compound,
            Kind::IntArray => Tag::IntArray,
            Kind::LongArray => Tag::LongArray,
        }
    }

    /// Whether a value of this kind satisfies a container declared with
    /// `target` as-is. A subtype of `List[End]` accepts any list without
    /// recasting it; everything else requires an exact match.
    pub(crate) fn fits(&self, target: &Kind) -> bool {
        self == target
            || matches!(
                (self, target),
                (Kind::List(_), Kind::List(t)) if **t == Kind::End
            )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::End => f.write_str("End"),
            Kind::Byte => f.write_str("Byte"),
            Kind::Short => f.write_str("Short"),
            Kind::Int => f.write_str("Int"),
            Kind::Long => f.write_str("Long"),
            Kind::Float => f.write_str("Float"),
            Kind::Double => f.write_str("Double"),
            Kind::ByteArray => f.write_str("ByteArray"),
            Kind::String => f.write_str("String"),
            Kind::List(inner) if **inner == Kind::End => f.write_str("List"),
            Kind::List(inner) => write!(f, "List[{}]", inner),
            Kind::Compound => f.write_str("Compound"),
            Kind::IntArray => f.write_str("IntArray"),
            Kind::LongArray => f.write_str("LongArray"),
        }
    }
}

/// Value is a complete NBT value. It owns its data. This type takes care
/// to preserve all the information from the original NBT, with the
/// exception of the name of the root compound (which belongs to the file
/// layer, see [`File`](crate::File)).
///
/// There is no `End` variant: the sentinel only exists on the wire, and
/// asking the codec to produce one is [`Error::EndInstantiation`].
///
/// ```
/// use nbtkit::Value;
///
/// let v: Value = 27i8.into();
/// assert_eq!(v, Value::Byte(27));
/// assert_eq!(v.as_i64(), Some(27));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(NbtString),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    List(List),
    Compound(Compound),
}

impl Value {
    /// The wire tag of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
        }
    }

    /// The kind of this value, carrying a list's declared subtype.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::IntArray(_) => Kind::IntArray,
            Value::LongArray(_) => Kind::LongArray,
            Value::List(list) => Kind::List(Box::new(list.subtype().clone())),
            Value::Compound(_) => Kind::Compound,
        }
    }

    /// Checked Byte constructor. Fails with [`Error::OutOfRange`] rather
    /// than wrapping or clamping.
    pub fn byte(value: i64) -> Result<Value> {
        i8::try_from(value)
            .map(Value::Byte)
            .map_err(|_| Error::OutOfRange(value))
    }

    /// Checked Short constructor.
    pub fn short(value: i64) -> Result<Value> {
        i16::try_from(value)
            .map(Value::Short)
            .map_err(|_| Error::OutOfRange(value))
    }

    /// Checked Int constructor.
    pub fn int(value: i64) -> Result<Value> {
        i32::try_from(value)
            .map(Value::Int)
            .map_err(|_| Error::OutOfRange(value))
    }

    /// Long constructor. Every `i64` is a valid Long, so unlike the
    /// narrower constructors this cannot fail.
    pub fn long(value: i64) -> Value {
        Value::Long(value)
    }

    /// Reinterpret an unsigned byte as a Byte tag, two's-complement.
    pub fn byte_from_unsigned(value: u8) -> Value {
        Value::Byte(value as i8)
    }

    /// Reinterpret an unsigned short as a Short tag, two's-complement.
    pub fn short_from_unsigned(value: u16) -> Value {
        Value::Short(value as i16)
    }

    /// Reinterpret an unsigned int as an Int tag, two's-complement.
    pub fn int_from_unsigned(value: u32) -> Value {
        Value::Int(value as i32)
    }

    /// Reinterpret an unsigned long as a Long tag, two's-complement.
    pub fn long_from_unsigned(value: u64) -> Value {
        Value::Long(value as i64)
    }

    /// The unsigned reinterpretation of an integer tag, zero-extended
    /// from the tag's width: `Byte(-1)` yields 255. `None` for
    /// non-integer tags.
    pub fn as_unsigned(&self) -> Option<u64> {
        match *self {
            Value::Byte(v) => Some(v as u8 as u64),
            Value::Short(v) => Some(v as u16 as u64),
            Value::Int(v) => Some(v as u32 as u64),
            Value::Long(v) => Some(v as u64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => v.as_str(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    /// Structural subset matching, as used by path `{...}` filters.
    ///
    /// A compound matches a pattern compound iff it contains every
    /// pattern key with a recursively matching value. A list matches a
    /// pattern list iff every pattern element matches at least one of its
    /// elements; the empty pattern list matches only an empty list.
    /// Anything else matches iff equal.
    ///
    /// ```
    /// use nbtkit::snbt;
    ///
    /// let value = snbt::from_str("{foo: 1, bar: 2}").unwrap();
    /// let pattern = snbt::from_str("{foo: 1}").unwrap();
    /// assert!(value.matches(&pattern));
    /// assert!(!pattern.matches(&value));
    /// ```
    pub fn matches(&self, pattern: &Value) -> bool {
        match (self, pattern) {
            (Value::Compound(value), Value::Compound(pattern)) => value.matches(pattern),
            (Value::List(value), Value::List(pattern)) => {
                if pattern.is_empty() {
                    value.is_empty()
                } else {
                    pattern
                        .iter()
                        .all(|wanted| value.iter().any(|item| item.matches(wanted)))
                }
            }
            _ => self == pattern,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&snbt::to_string(self))
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String, .into());
from!(&str, String, .into());
from!(NbtString, String);
from!(List, List);
from!(Compound, Compound);
from!(Vec<i8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

/// Fallible conversion into a tag of a required kind.
///
/// This is the cast-on-insert contract used by every mutating [`List`]
/// operation. The two failure families are deliberately distinct:
///
/// * a value that is already a tag of a different, incompatible kind
///   fails with [`Error::IncompatibleItemType`] and is never retried as
///   a cast;
/// * a raw host value that cannot be converted fails with
///   [`Error::Cast`] (or [`Error::NoSubtype`] when the container has no
///   inferred subtype to cast into), and range violations surface as
///   [`Error::OutOfRange`].
pub trait IntoTag {
    /// The kind of this item if it already is a tag, `None` for raw host
    /// values. Subtype inference ignores raw values.
    fn tag_kind(&self) -> Option<Kind>;

    /// Convert into a tag satisfying `target`. A target of `Kind::End`
    /// stands for an uninferred subtype: tags pass through unchanged and
    /// raw values fail.
    fn into_tag(self, target: &Kind) -> Result<Value>;
}

impl IntoTag for Value {
    fn tag_kind(&self) -> Option<Kind> {
        Some(self.kind())
    }

    fn into_tag(self, target: &Kind) -> Result<Value> {
        if *target == Kind::End || self.kind().fits(target) {
            return Ok(self);
        }
        match (self, target) {
            // A list of the wrong subtype converts iff its elements do.
            (Value::List(list), Kind::List(inner)) => list.recast(inner).map(Value::List),
            (value, _) => Err(Error::IncompatibleItemType {
                item: Box::new(value),
                subtype: target.clone(),
            }),
        }
    }
}

fn cast_error(value: impl fmt::Display, target: &Kind) -> Error {
    Error::Cast {
        value: value.to_string(),
        target: target.clone(),
    }
}

fn cast_int(value: i64, target: &Kind) -> Result<Value> {
    match target {
        Kind::Byte => Value::byte(value),
        Kind::Short => Value::short(value),
        Kind::Int => Value::int(value),
        Kind::Long => Ok(Value::Long(value)),
        Kind::Float => Ok(Value::Float(value as f32)),
        Kind::Double => Ok(Value::Double(value as f64)),
        Kind::String => Ok(Value::String(value.to_string().into())),
        Kind::End => Err(Error::NoSubtype),
        _ => Err(cast_error(value, target)),
    }
}

fn cast_float(value: f64, target: &Kind) -> Result<Value> {
    match target {
        Kind::Float => Ok(Value::Float(value as f32)),
        Kind::Double => Ok(Value::Double(value)),
        Kind::Byte | Kind::Short | Kind::Int | Kind::Long => {
            let truncated = value.trunc();
            if !truncated.is_finite()
                || truncated < -9.223_372_036_854_776e18
                || truncated >= 9.223_372_036_854_776e18
            {
                return Err(cast_error(value, target));
            }
            cast_int(truncated as i64, target)
        }
        Kind::End => Err(Error::NoSubtype),
        _ => Err(cast_error(value, target)),
    }
}

fn cast_str(value: &str, target: &Kind) -> Result<Value> {
    match target {
        Kind::String => Ok(Value::String(value.into())),
        Kind::Byte | Kind::Short | Kind::Int | Kind::Long => {
            let parsed: i64 = value
                .trim()
                .parse()
                .map_err(|_| cast_error(format_args!("{:?}", value), target))?;
            cast_int(parsed, target)
        }
        Kind::Float | Kind::Double => {
            let parsed: f64 = value
                .trim()
                .parse()
                .map_err(|_| cast_error(format_args!("{:?}", value), target))?;
            cast_float(parsed, target)
        }
        Kind::End => Err(Error::NoSubtype),
        _ => Err(cast_error(format_args!("{:?}", value), target)),
    }
}

macro_rules! into_tag_int {
    ($($type:ty),+) => {
        $(
            impl IntoTag for $type {
                fn tag_kind(&self) -> Option<Kind> {
                    None
                }

                fn into_tag(self, target: &Kind) -> Result<Value> {
                    cast_int(self as i64, target)
                }
            }
        )+
    };
}
into_tag_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! into_tag_float {
    ($($type:ty),+) => {
        $(
            impl IntoTag for $type {
                fn tag_kind(&self) -> Option<Kind> {
                    None
                }

                fn into_tag(self, target: &Kind) -> Result<Value> {
                    cast_float(self as f64, target)
                }
            }
        )+
    };
}
into_tag_float!(f32, f64);

impl IntoTag for bool {
    fn tag_kind(&self) -> Option<Kind> {
        None
    }

    fn into_tag(self, target: &Kind) -> Result<Value> {
        match target {
            Kind::Byte | Kind::Short | Kind::Int | Kind::Long | Kind::Float | Kind::Double => {
                cast_int(i64::from(self), target)
            }
            Kind::End => Err(Error::NoSubtype),
            _ => Err(cast_error(self, target)),
        }
    }
}

impl IntoTag for &str {
    fn tag_kind(&self) -> Option<Kind> {
        None
    }

    fn into_tag(self, target: &Kind) -> Result<Value> {
        cast_str(self, target)
    }
}

impl IntoTag for String {
    fn tag_kind(&self) -> Option<Kind> {
        None
    }

    fn into_tag(self, target: &Kind) -> Result<Value> {
        cast_str(&self, target)
    }
}

macro_rules! into_tag_array {
    ($($type:ty => $kind:ident),+) => {
        $(
            impl IntoTag for $type {
                fn tag_kind(&self) -> Option<Kind> {
                    None
                }

                fn into_tag(self, target: &Kind) -> Result<Value> {
                    match target {
                        Kind::$kind => Ok(Value::$kind(self)),
                        Kind::End => Err(Error::NoSubtype),
                        _ => Err(cast_error(
                            format_args!("an array of {} elements", self.len()),
                            target,
                        )),
                    }
                }
            }
        )+
    };
}
into_tag_array!(Vec<i8> => ByteArray, Vec<i32> => IntArray, Vec<i64> => LongArray);
