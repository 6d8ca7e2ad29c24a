//! Domain-specific newtypes for type safety
//!
//! These types prevent mixing up different kinds of identifiers and provide
//! self-documenting APIs.

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use read_fonts::types::Tag;

/// Index into the fonts array being merged
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIndex(pub usize);

impl FontIndex {
    pub const fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for FontIndex {
    fn from(idx: usize) -> Self {
        Self(idx)
    }
}

impl From<FontIndex> for usize {
    fn from(FontIndex(idx): FontIndex) -> Self {
        idx
    }
}

impl Display for FontIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Font[{}]", self.0)
    }
}

/// A Unicode codepoint
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn new(cp: u32) -> Self {
        Self(cp)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Convert to a Rust char if valid
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl From<u32> for Codepoint {
    fn from(cp: u32) -> Self {
        Self(cp)
    }
}

impl From<Codepoint> for u32 {
    fn from(cp: Codepoint) -> Self {
        cp.0
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// A font table tag (always 4 bytes)
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableTag(Tag);

impl TableTag {
    /// Create a TableTag from a 4-byte array
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(Tag::new(bytes))
    }

    /// Try to create a TableTag from a string
    ///
    /// Returns None if the string is longer than 4 bytes.
    /// Shorter strings are padded with spaces.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        (!bytes.is_empty() && bytes.len() <= 4).then(|| {
            let mut arr = [b' '; 4];
            arr[..bytes.len()].copy_from_slice(bytes);
            Self(Tag::new(&arr))
        })
    }

    /// Get the underlying Tag
    pub fn tag(&self) -> Tag {
        self.0
    }
}

impl From<Tag> for TableTag {
    fn from(tag: Tag) -> Self {
        Self(tag)
    }
}

impl From<TableTag> for Tag {
    fn from(tt: TableTag) -> Self {
        tt.0
    }
}

impl From<&TableTag> for Tag {
    fn from(tt: &TableTag) -> Self {
        tt.0
    }
}

impl Display for TableTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
