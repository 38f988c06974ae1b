//! Binary encoding of NBT payloads to any [`Write`] impl.
//!
//! Mirrors [`de`](crate::de): [`write_value`] emits the payload of one
//! tag without root framing. Lists write their element tag id and count
//! followed by the bare payloads; compounds write `(id, name, payload)`
//! triples terminated by the `End` sentinel byte.

use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{ByteOrder, NbtString, Tag, Value};

/// Encode the payload of `value` to `writer`.
///
/// ```
/// use nbtkit::{ser, ByteOrder, Value};
///
/// let mut payload = vec![];
/// ser::write_value(&mut payload, &Value::Short(42), ByteOrder::Big).unwrap();
/// assert_eq!(payload, [0x00, 0x2a]);
/// ```
pub fn write_value<W: Write>(writer: &mut W, value: &Value, order: ByteOrder) -> Result<()> {
    match value {
        Value::Byte(v) => Ok(writer.write_i8(*v)?),
        Value::Short(v) => write_i16(writer, *v, order),
        Value::Int(v) => write_i32(writer, *v, order),
        Value::Long(v) => write_i64(writer, *v, order),
        Value::Float(v) => write_f32(writer, *v, order),
        Value::Double(v) => write_f64(writer, *v, order),
        Value::String(v) => write_string(writer, v, order),
        Value::ByteArray(v) => {
            write_i32(writer, v.len() as i32, order)?;
            for b in v {
                writer.write_i8(*b)?;
            }
            Ok(())
        }
        Value::IntArray(v) => {
            write_i32(writer, v.len() as i32, order)?;
            for n in v {
                write_i32(writer, *n, order)?;
            }
            Ok(())
        }
        Value::LongArray(v) => {
            write_i32(writer, v.len() as i32, order)?;
            for n in v {
                write_i64(writer, *n, order)?;
            }
            Ok(())
        }
        Value::List(list) => {
            writer.write_u8(list.subtype().tag().into())?;
            write_i32(writer, list.len() as i32, order)?;
            for item in list {
                write_value(writer, item, order)?;
            }
            Ok(())
        }
        Value::Compound(compound) => write_compound_payload(writer, compound, order),
    }
}

/// The body of a compound: `(id, name, payload)` triples and the `End`
/// sentinel. Also the payload of a whole file after its root framing.
pub(crate) fn write_compound_payload<W: Write>(
    writer: &mut W,
    compound: &crate::Compound,
    order: ByteOrder,
) -> Result<()> {
    for (name, item) in compound {
        writer.write_u8(item.tag().into())?;
        write_string(writer, name, order)?;
        write_value(writer, item, order)?;
    }
    Ok(writer.write_u8(Tag::End.into())?)
}

impl Value {
    /// Encode this value's payload to `writer`. See [`write_value`].
    pub fn write<W: Write>(&self, writer: &mut W, order: ByteOrder) -> Result<()> {
        write_value(writer, self, order)
    }
}

macro_rules! write_numeric {
    ($name:ident, $type:ty, $method:ident) => {
        pub(crate) fn $name<W: Write>(writer: &mut W, value: $type, order: ByteOrder) -> Result<()> {
            match order {
                ByteOrder::Big => writer.$method::<BigEndian>(value)?,
                ByteOrder::Little => writer.$method::<LittleEndian>(value)?,
            }
            Ok(())
        }
    };
}

write_numeric!(write_i16, i16, write_i16);
write_numeric!(write_i32, i32, write_i32);
write_numeric!(write_i64, i64, write_i64);
write_numeric!(write_u16, u16, write_u16);
write_numeric!(write_f32, f32, write_f32);
write_numeric!(write_f64, f64, write_f64);

/// Write a u16-length-prefixed string. Text encodes as Java CESU-8, the
/// form the game itself writes; preserved malformed bytes are emitted
/// untouched so binary round trips are exact.
pub(crate) fn write_string<W: Write>(
    writer: &mut W,
    string: &NbtString,
    order: ByteOrder,
) -> Result<()> {
    let bytes = match string {
        NbtString::Text(text) => cesu8::to_java_cesu8(text),
        NbtString::Malformed(bytes) => std::borrow::Cow::Borrowed(bytes.as_slice()),
    };
    let length =
        u16::try_from(bytes.len()).map_err(|_| Error::StringTooLong(bytes.len()))?;
    write_u16(writer, length, order)?;
    Ok(writer.write_all(&bytes)?)
}
