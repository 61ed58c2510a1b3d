//! Restartable attribute name listings.
//!
//! [`AttributeView::list`](crate::AttributeView::list) runs `listxattr(2)`
//! once and keeps the raw names; decoding into [`AttributeName`] happens
//! lazily as the caller iterates. Every call to [`AttributeList::iter`]
//! starts again from the first name, so a listing can be walked any number
//! of times without touching the filesystem again.

use std::ffi::OsString;
use std::iter::FusedIterator;
use std::slice;

use crate::name::{AttributeName, Namespace};
use crate::trace;

/// Snapshot of the attribute names present on a path.
///
/// Order is whatever the filesystem reported. Names the kernel returns but
/// that cannot be represented as an [`AttributeName`] (non UTF-8) are
/// skipped during iteration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeList {
    raw: Vec<OsString>,
}

impl AttributeList {
    pub(crate) const fn from_raw(raw: Vec<OsString>) -> Self {
        Self { raw }
    }

    /// Iterates over the names from the start of the listing.
    #[must_use]
    pub fn iter(&self) -> AttributeNames<'_> {
        AttributeNames {
            inner: self.raw.iter(),
        }
    }

    /// Returns the number of raw entries reported by the filesystem.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Reports whether the filesystem reported no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Reports whether `name` was present when the listing was taken.
    #[must_use]
    pub fn contains(&self, name: &AttributeName) -> bool {
        self.raw.iter().any(|raw| raw.as_os_str() == name.as_os_str())
    }

    /// Keeps only names in `namespace`.
    #[must_use]
    pub fn retain_namespace(mut self, namespace: Namespace) -> Self {
        let prefix = namespace.prefix();
        self.raw.retain(|raw| {
            raw.to_str()
                .is_some_and(|name| name.starts_with(prefix) && name.len() > prefix.len())
        });
        self
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = AttributeName;
    type IntoIter = AttributeNames<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for AttributeList {
    type Item = AttributeName;
    type IntoIter = IntoAttributeNames;

    fn into_iter(self) -> Self::IntoIter {
        IntoAttributeNames {
            inner: self.raw.into_iter(),
        }
    }
}

fn decode(raw: &OsString) -> Option<AttributeName> {
    match AttributeName::from_os(raw) {
        Ok(name) => Some(name),
        Err(error) => {
            trace::trace_skipped_name(&error);
            None
        }
    }
}

/// Borrowing iterator returned by [`AttributeList::iter`].
#[derive(Clone, Debug)]
pub struct AttributeNames<'a> {
    inner: slice::Iter<'a, OsString>,
}

impl Iterator for AttributeNames<'_> {
    type Item = AttributeName;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(decode)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl FusedIterator for AttributeNames<'_> {}

/// Owning iterator returned by [`AttributeList::into_iter`].
#[derive(Debug)]
pub struct IntoAttributeNames {
    inner: std::vec::IntoIter<OsString>,
}

impl Iterator for IntoAttributeNames {
    type Item = AttributeName;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|raw| decode(&raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl FusedIterator for IntoAttributeNames {}
