//! Contains the Error and Result type used throughout the crate.

use thiserror::Error;

use crate::{Kind, Tag, Value};

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the tag model, the binary codec, the SNBT literal
/// subsystem and the path engine.
///
/// Values are never clamped or coerced to dodge an error: an out-of-range
/// integer or an incompatible list item fails at the point of
/// construction. The one tolerated case in the binary codec is an
/// exactly-truncated numeric read, which yields zero instead of an error
/// (see [`de`](crate::de)).
#[derive(Debug, Error)]
pub enum Error {
    /// An integer value outside the range of its tag's bit width.
    #[error("{0} is out of range")]
    OutOfRange(i64),

    /// A concretely-typed tag inserted into a container whose declared
    /// subtype it cannot satisfy. Tags are never reinterpreted as one
    /// another: `Int(1)` does not become a `Byte` on insertion.
    #[error("{item} should be a {subtype} tag")]
    IncompatibleItemType {
        item: Box<Value>,
        subtype: Kind,
    },

    /// A raw (non-tag) value could not be converted to the required tag
    /// type.
    #[error("couldn't cast {value} to {target}")]
    Cast {
        value: String,
        target: Kind,
    },

    /// A raw value was pushed into a list whose subtype was never
    /// inferred, so there is no target type to cast into.
    #[error(
        "list tags without an explicit subtype must either be empty or \
         contain elements from which a subtype can be inferred"
    )]
    NoSubtype,

    /// Something asked for a value of the `End` sentinel, which only
    /// exists on the wire.
    #[error("End tags can't be instantiated")]
    EndInstantiation,

    /// SNBT syntax error. The span is the `(start, end)` character range
    /// of the offending token.
    #[error("{message} at position {}", .span.0)]
    InvalidLiteral {
        span: (usize, usize),
        message: String,
    },

    /// A syntactically valid literal that is structurally invalid as a
    /// path.
    #[error("{0}")]
    InvalidPath(String),

    /// A wire byte where a tag id was expected, outside 0..=12.
    #[error("invalid nbt tag value: {0}")]
    InvalidTag(u8),

    /// The file layer only supports compound roots.
    #[error("non-Compound root tags are not supported: {0:?}")]
    InvalidRoot(Tag),

    /// A string payload too long for its unsigned 16 bit length prefix.
    #[error("string of {0} bytes does not fit in a short length prefix")]
    StringTooLong(usize),

    /// An io error from the underlying stream. Truncation in the middle
    /// of a numeric payload is not reported here, it decodes as zero.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised by the cast-on-insert contract.
    pub fn is_cast(&self) -> bool {
        matches!(
            self,
            Error::Cast { .. } | Error::NoSubtype | Error::IncompatibleItemType { .. }
        )
    }
}
