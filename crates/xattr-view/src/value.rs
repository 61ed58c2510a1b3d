//! crates/xattr-view/src/value.rs
//!
//! Opaque attribute values.

use std::ops::Deref;

/// Largest value the Linux VFS accepts (`XATTR_SIZE_MAX`).
///
/// Individual filesystems may store less; ext4 without `ea_inode` is bounded
/// by its block size. Views can be configured with a lower limit through
/// [`ViewOptions::max_value_size`](crate::ViewOptions::max_value_size).
pub const XATTR_SIZE_MAX: usize = 64 * 1024;

/// The bytes stored under an extended attribute.
///
/// No encoding is implied; callers decide how to interpret the contents.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct AttributeValue(Vec<u8>);

impl AttributeValue {
    /// Wraps the supplied bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the value as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the value and returns the underlying buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Interprets the value as UTF-8 text, if it is.
    #[must_use]
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for AttributeValue {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for AttributeValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<AttributeValue> for Vec<u8> {
    fn from(value: AttributeValue) -> Self {
        value.0
    }
}

impl PartialEq<[u8]> for AttributeValue {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&[u8]> for AttributeValue {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for AttributeValue {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for AttributeValue {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.0 == *other
    }
}
