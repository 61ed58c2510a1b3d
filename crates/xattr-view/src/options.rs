use crate::value::XATTR_SIZE_MAX;

/// Options that control how an [`AttributeView`](crate::AttributeView) reaches the filesystem.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewOptions {
    follow_symlinks: bool,
    max_value_size: usize,
}

impl ViewOptions {
    /// Creates a new [`ViewOptions`] value with defaults applied.
    ///
    /// By default symlinks are followed and values up to
    /// [`XATTR_SIZE_MAX`] bytes are accepted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            follow_symlinks: true,
            max_value_size: XATTR_SIZE_MAX,
        }
    }

    /// Chooses whether operations act on a symlink's target or on the link itself.
    ///
    /// When disabled the `l*xattr` family is used. Most filesystems refuse
    /// `user.` attributes on symlinks, so expect
    /// [`XattrError::PermissionDenied`](crate::XattrError::PermissionDenied)
    /// when writing them.
    #[must_use]
    #[doc(alias = "lgetxattr")]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Lowers the largest value [`AttributeView::set`](crate::AttributeView::set) accepts.
    ///
    /// The limit is clamped to [`XATTR_SIZE_MAX`]; use this for filesystems
    /// that store less than the VFS allows, such as ext4 with 4 KiB blocks.
    #[must_use]
    pub const fn max_value_size(mut self, limit: usize) -> Self {
        self.max_value_size = if limit > XATTR_SIZE_MAX {
            XATTR_SIZE_MAX
        } else {
            limit
        };
        self
    }

    /// Reports whether symlinks are followed.
    #[must_use]
    pub const fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// Returns the largest accepted value in bytes.
    #[must_use]
    pub const fn value_limit(&self) -> usize {
        self.max_value_size
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::new()
    }
}
