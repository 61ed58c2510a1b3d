//! crates/xattr-view/src/mode.rs
//!
//! Write dispositions for [`AttributeView::set`](crate::AttributeView::set).

use std::fmt;

/// How a write treats an attribute that does or does not already exist.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SetMode {
    /// Create the attribute or overwrite its current value.
    #[default]
    CreateOrReplace,
    /// Create the attribute; fail if it exists (`XATTR_CREATE`).
    CreateOnly,
    /// Overwrite the attribute; fail if it is absent (`XATTR_REPLACE`).
    ReplaceOnly,
}

impl SetMode {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateOrReplace => "create-or-replace",
            Self::CreateOnly => "create-only",
            Self::ReplaceOnly => "replace-only",
        }
    }
}

impl fmt::Display for SetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
