//! nbtkit is a library for working with NBT data: a tree of type-tagged
//! nodes used by *Minecraft: Java Edition* and friends for world data,
//! player inventories and other structured blobs.
//!
//! * For the owned tree type see [`Value`], with [`List`] and [`Compound`]
//!   for the container variants.
//! * For the binary codec see [`Value::parse`] and [`Value::write`], both
//!   parameterized on [`ByteOrder`].
//! * For the textual notation ("SNBT") see [`snbt`].
//! * For selecting and mutating deeply nested tags see [`Path`].
//! * For whole files (root framing, optional gzip) see [`File`].
//!
//! # Quick example
//!
//! ```no_run
//! use nbtkit::{File, Path, Value};
//!
//! fn main() -> nbtkit::Result<()> {
//!     let file = File::load("level.dat")?;
//!
//!     let root: Value = file.root.clone().into();
//!     let spawn = Path::parse("Data.SpawnX")?;
//!     for value in spawn.get_all(&root) {
//!         println!("spawn x: {}", value);
//!     }
//!
//!     file.save("level.dat")?;
//!     Ok(())
//! }
//! ```
//!
//! Parsing a literal and rendering it back:
//!
//! ```
//! use nbtkit::snbt;
//!
//! let value = snbt::from_str("{name: \"Eggbert\", value: 0.75f}").unwrap();
//! assert_eq!(snbt::to_string(&value), "{name: \"Eggbert\", value: 0.75f}");
//! ```

pub mod de;
pub mod error;
pub mod file;
pub mod path;
pub mod ser;
pub mod snbt;

mod compound;
mod list;
mod string;
mod value;

pub use compound::Compound;
pub use error::{Error, Result};
pub use file::File;
pub use list::List;
pub use path::{Accessor, Path};
pub use string::NbtString;
pub use value::{IntoTag, Kind, Value};

#[cfg(test)]
mod test;

use std::convert::TryFrom;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents an array of Int (i32).
    IntArray = 11,
    /// Represents an array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually, the tags will very rarely
// change so isn't a massive burden, but saves a significant amount of
// compile time.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::End => 0,
            Tag::Byte => 1,
            Tag::Short => 2,
            Tag::Int => 3,
            Tag::Long => 4,
            Tag::Float => 5,
            Tag::Double => 6,
            Tag::ByteArray => 7,
            Tag::String => 8,
            Tag::List => 9,
            Tag::Compound => 10,
            Tag::IntArray => 11,
            Tag::LongArray => 12,
        }
    }
}

/// Byte order used by the binary codec.
///
/// Java Edition NBT is big-endian, which is the default everywhere a
/// default applies. Bedrock saves little-endian NBT with the same layout.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}
