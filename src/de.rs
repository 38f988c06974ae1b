//! Binary decoding of NBT payloads from any [`Read`] impl.
//!
//! The decoder is stateless and recursive: [`read_value`] consumes the
//! payload of one tag, descending into lists and compounds as needed.
//! Root framing (the leading tag id byte and root name) belongs to the
//! file layer, see [`File`](crate::File).
//!
//! One behavior is deliberately lenient and kept for compatibility with
//! existing data and tools: a numeric read that hits end-of-stream partway
//! through its fixed width decodes as zero instead of failing. *Only*
//! that case is tolerated; every other io error propagates. This does
//! make a cleanly-truncated stream indistinguishable from trailing
//! zeros, which callers that care must detect themselves.

use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::{ByteOrder, Compound, Kind, List, NbtString, Tag, Value};

/// Decode the payload of a tag of type `tag` from `reader`.
///
/// ```
/// use nbtkit::{de, ByteOrder, Tag, Value};
///
/// let payload = [0x00, 0x2a];
/// let value = de::read_value(&mut &payload[..], Tag::Short, ByteOrder::Big).unwrap();
/// assert_eq!(value, Value::Short(42));
/// ```
pub fn read_value<R: Read>(reader: &mut R, tag: Tag, order: ByteOrder) -> Result<Value> {
    match tag {
        Tag::End => Err(Error::EndInstantiation),
        Tag::Byte => Ok(Value::Byte(read_i8(reader)?)),
        Tag::Short => Ok(Value::Short(read_i16(reader, order)?)),
        Tag::Int => Ok(Value::Int(read_i32(reader, order)?)),
        Tag::Long => Ok(Value::Long(read_i64(reader, order)?)),
        Tag::Float => Ok(Value::Float(read_f32(reader, order)?)),
        Tag::Double => Ok(Value::Double(read_f64(reader, order)?)),
        Tag::String => Ok(Value::String(read_string(reader, order)?)),
        Tag::ByteArray => {
            let data = read_exact_prefixed(reader, order, 1)?;
            Ok(Value::ByteArray(data.into_iter().map(|b| b as i8).collect()))
        }
        Tag::IntArray => {
            let data = read_exact_prefixed(reader, order, 4)?;
            Ok(Value::IntArray(
                data.chunks_exact(4)
                    .map(|chunk| match order {
                        ByteOrder::Big => BigEndian::read_i32(chunk),
                        ByteOrder::Little => LittleEndian::read_i32(chunk),
                    })
                    .collect(),
            ))
        }
        Tag::LongArray => {
            let data = read_exact_prefixed(reader, order, 8)?;
            Ok(Value::LongArray(
                data.chunks_exact(8)
                    .map(|chunk| match order {
                        ByteOrder::Big => BigEndian::read_i64(chunk),
                        ByteOrder::Little => LittleEndian::read_i64(chunk),
                    })
                    .collect(),
            ))
        }
        Tag::List => {
            let element_tag = u8_to_tag(read_u8_lenient(reader)?)?;
            let length = read_i32(reader, order)?;
            if element_tag == Tag::End && length > 0 {
                return Err(Error::EndInstantiation);
            }
            let mut items = Vec::with_capacity(length.max(0) as usize);
            for _ in 0..length.max(0) {
                items.push(read_value(reader, element_tag, order)?);
            }
            Ok(Value::List(List::from_parts(kind_of(element_tag), items)))
        }
        Tag::Compound => {
            let mut compound = Compound::new();
            loop {
                // A truncated stream reads the id as zero, which
                // terminates the compound, mirroring the numeric
                // leniency above.
                let tag = u8_to_tag(read_u8_lenient(reader)?)?;
                if tag == Tag::End {
                    break;
                }
                let name = read_string(reader, order)?;
                compound.insert(name, read_value(reader, tag, order)?);
            }
            Ok(Value::Compound(compound))
        }
    }
}

impl Value {
    /// Decode the payload of a tag of type `tag` from `reader`. See
    /// [`read_value`].
    pub fn parse<R: Read>(reader: &mut R, tag: Tag, order: ByteOrder) -> Result<Value> {
        read_value(reader, tag, order)
    }
}

/// The shallow kind a decoded payload of `tag` gets. Nested lists come
/// off the wire as plain lists; their own element types live one level
/// down and are not lifted into the outer subtype.
fn kind_of(tag: Tag) -> Kind {
    match tag {
        Tag::End => Kind::End,
        Tag::Byte => Kind::Byte,
        Tag::Short => Kind::Short,
        Tag::Int => Kind::Int,
        Tag::Long => Kind::Long,
        Tag::Float => Kind::Float,
        Tag::Double => Kind::Double,
        Tag::ByteArray => Kind::ByteArray,
        Tag::String => Kind::String,
        Tag::List => Kind::List(Box::new(Kind::End)),
        Tag::Compound => Kind::Compound,
        Tag::IntArray => Kind::IntArray,
        Tag::LongArray => Kind::LongArray,
    }
}

pub(crate) fn u8_to_tag(tag: u8) -> Result<Tag> {
    Tag::try_from(tag).map_err(|_| Error::InvalidTag(tag))
}

macro_rules! lenient_read {
    ($name:ident, $type:ty, $method:ident) => {
        pub(crate) fn $name<R: Read>(reader: &mut R, order: ByteOrder) -> Result<$type> {
            let result = match order {
                ByteOrder::Big => reader.$method::<BigEndian>(),
                ByteOrder::Little => reader.$method::<LittleEndian>(),
            };
            match result {
                Ok(v) => Ok(v),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    Ok(<$type>::default())
                }
                Err(e) => Err(e.into()),
            }
        }
    };
}

lenient_read!(read_i16, i16, read_i16);
lenient_read!(read_i32, i32, read_i32);
lenient_read!(read_i64, i64, read_i64);
lenient_read!(read_u16, u16, read_u16);
lenient_read!(read_f32, f32, read_f32);
lenient_read!(read_f64, f64, read_f64);

fn read_i8<R: Read>(reader: &mut R) -> Result<i8> {
    match reader.read_i8() {
        Ok(v) => Ok(v),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(0),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn read_u8_lenient<R: Read>(reader: &mut R) -> Result<u8> {
    match reader.read_u8() {
        Ok(v) => Ok(v),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Read a u16-length-prefixed string. The bytes decode as Java CESU-8
/// first (the form the encoder and the game write), then as plain UTF-8;
/// bytes that are neither are preserved as-is.
pub(crate) fn read_string<R: Read>(reader: &mut R, order: ByteOrder) -> Result<NbtString> {
    let length = read_u16(reader, order)? as u64;

    let mut buf = Vec::with_capacity(length.min(4096) as usize);
    reader.take(length).read_to_end(&mut buf)?;

    if let Ok(text) = cesu8::from_java_cesu8(&buf) {
        return Ok(NbtString::Text(text.into_owned()));
    }
    match std::str::from_utf8(&buf) {
        Ok(text) => Ok(NbtString::Text(text.to_owned())),
        Err(_) => Ok(NbtString::Malformed(buf)),
    }
}

/// Read an i32-count-prefixed payload of `width`-byte elements. A
/// non-positive count is empty; whole elements of a truncated stream are
/// kept and a trailing partial element is dropped.
fn read_exact_prefixed<R: Read>(reader: &mut R, order: ByteOrder, width: usize) -> Result<Vec<u8>> {
    let count = read_i32(reader, order)?;
    if count <= 0 {
        return Ok(Vec::new());
    }
    let wanted = count as u64 * width as u64;
    let mut buf = Vec::with_capacity(wanted.min(1 << 20) as usize);
    reader.take(wanted).read_to_end(&mut buf)?;
    buf.truncate(buf.len() - buf.len() % width);
    Ok(buf)
}
