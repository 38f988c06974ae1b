//! Whole-file NBT: root framing and optional gzip compression.
//!
//! A binary NBT file is a single compound wrapped in root framing: one
//! tag id byte (always `Compound`), a name, then the compound payload.
//! Files are frequently gzip-compressed; [`File::load`] sniffs the gzip
//! magic number and decompresses transparently.

use std::fs;
use std::io::{Read, Write};
use std::path::Path as FsPath;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::de::{read_string, read_u8_lenient, read_value, u8_to_tag};
use crate::error::{Error, Result};
use crate::ser::{write_compound_payload, write_string};
use crate::{ByteOrder, Compound, NbtString, Tag, Value};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A root compound together with its framing: name, compression and byte
/// order.
///
/// ```no_run
/// use nbtkit::{File, Value};
///
/// fn main() -> nbtkit::Result<()> {
///     let mut file = File::load("demo.nbt")?;
///     file.root.insert("counter", Value::Int(1));
///     file.save("demo.nbt")?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct File {
    pub root_name: NbtString,
    pub root: Compound,
    /// Whether [`File::save`] compresses the output.
    pub gzipped: bool,
    /// The byte order [`File::save`] writes with.
    pub byteorder: ByteOrder,
}

impl File {
    /// A new uncompressed, big-endian file with an empty root name.
    pub fn new(root: Compound) -> File {
        File {
            root_name: "".into(),
            root,
            gzipped: false,
            byteorder: ByteOrder::Big,
        }
    }

    /// Read root framing and the root compound from an uncompressed
    /// stream.
    pub fn parse<R: Read>(reader: &mut R, order: ByteOrder) -> Result<File> {
        let tag = u8_to_tag(read_u8_lenient(reader)?)?;
        if tag != Tag::Compound {
            return Err(Error::InvalidRoot(tag));
        }

        let root_name = read_string(reader, order)?;
        let root = match read_value(reader, Tag::Compound, order)? {
            Value::Compound(compound) => compound,
            _ => unreachable!("compound payloads decode to compounds"),
        };

        Ok(File {
            root_name,
            root,
            gzipped: false,
            byteorder: order,
        })
    }

    /// Write root framing and the root compound, uncompressed.
    pub fn write<W: Write>(&self, writer: &mut W, order: ByteOrder) -> Result<()> {
        writer.write_all(&[Tag::Compound.into()])?;
        write_string(writer, &self.root_name, order)?;
        write_compound_payload(writer, &self.root, order)
    }

    /// Load a big-endian nbt file, sniffing the gzip magic number to
    /// decide whether to decompress.
    pub fn load(path: impl AsRef<FsPath>) -> Result<File> {
        File::load_with(path, None, ByteOrder::Big)
    }

    /// Load a file with explicit control over compression and byte
    /// order. A `gzipped` of `None` sniffs the magic number.
    pub fn load_with(
        path: impl AsRef<FsPath>,
        gzipped: Option<bool>,
        order: ByteOrder,
    ) -> Result<File> {
        let data = fs::read(path)?;
        let gzipped = gzipped.unwrap_or_else(|| data.starts_with(&GZIP_MAGIC));

        let mut file = if gzipped {
            let mut decoder = GzDecoder::new(data.as_slice());
            File::parse(&mut decoder, order)?
        } else {
            File::parse(&mut data.as_slice(), order)?
        };
        file.gzipped = gzipped;
        file.byteorder = order;
        Ok(file)
    }

    /// Write the file at the given location, honoring the stored
    /// `gzipped` and `byteorder` settings.
    pub fn save(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let mut out = fs::File::create(path)?;
        if self.gzipped {
            let mut encoder = GzEncoder::new(&mut out, Compression::default());
            self.write(&mut encoder, self.byteorder)?;
            encoder.finish()?;
        } else {
            self.write(&mut out, self.byteorder)?;
        }
        Ok(())
    }
}

// Compression and byte order are transport details; two files are the
// same file when their name and contents agree.
impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.root_name == other.root_name && self.root == other.root
    }
}
