use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::Equivalent;

/// The payload of a String tag, and the key type of [`Compound`]
/// (crate::Compound).
///
/// NBT binary data does not guarantee valid UTF-8, so a string decoded
/// from the wire is either proper text or a byte sequence we could not
/// decode. The malformed form is preserved exactly so that re-encoding
/// produces the original bytes; it is never replacement-decoded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NbtString {
    Text(String),
    Malformed(Vec<u8>),
}

impl NbtString {
    /// The text of this string, or `None` if it holds undecodable bytes.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NbtString::Text(s) => Some(s),
            NbtString::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, NbtString::Malformed(_))
    }

    /// The UTF-8 bytes of the text, or the raw undecoded bytes.
    ///
    /// Note this is *not* the wire form of the text variant, which is
    /// Java CESU-8 (see [`ser`](crate::ser)).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            NbtString::Text(s) => s.as_bytes(),
            NbtString::Malformed(b) => b,
        }
    }

    /// The text, substituting U+FFFD for undecodable sequences. Used
    /// where something printable is needed and losslessness is not.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            NbtString::Text(s) => Cow::Borrowed(s),
            NbtString::Malformed(b) => String::from_utf8_lossy(b),
        }
    }
}

impl fmt::Display for NbtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// Hashed without a variant discriminant so that a `&str` lookup into an
// IndexMap keyed by NbtString hashes to the same bucket as Text. See the
// Equivalent impl below.
impl Hash for NbtString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            NbtString::Text(s) => s.hash(state),
            NbtString::Malformed(b) => b.hash(state),
        }
    }
}

impl Equivalent<NbtString> for str {
    fn equivalent(&self, key: &NbtString) -> bool {
        key.as_str() == Some(self)
    }
}

impl From<&str> for NbtString {
    fn from(s: &str) -> Self {
        NbtString::Text(s.to_owned())
    }
}

impl From<String> for NbtString {
    fn from(s: String) -> Self {
        NbtString::Text(s)
    }
}

impl From<&NbtString> for NbtString {
    fn from(s: &NbtString) -> Self {
        s.clone()
    }
}

impl PartialEq<str> for NbtString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for NbtString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
