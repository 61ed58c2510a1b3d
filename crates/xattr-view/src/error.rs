//! crates/xattr-view/src/error.rs
//!
//! Error taxonomy for extended attribute operations.
//!
//! Every failure carries the [`Operation`] that was running and the path the
//! view is bound to, so rendered messages read like
//! `failed to read extended attribute '/srv/a.txt': attribute 'user.tag' not found`.
//! Raw OS errors are classified once, in [`XattrError::from_io`], and the
//! original [`io::Error`] is kept as the source where one exists.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::name::{AttributeName, Namespace};

/// Result type for extended attribute operations.
pub type XattrResult<T> = Result<T, XattrError>;

/// The attribute operation that was in flight when an error occurred.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    /// Binding a view to a path and probing for support.
    Open,
    /// Reading one attribute value.
    Get,
    /// Querying the size of one attribute value.
    Size,
    /// Writing one attribute value.
    Set,
    /// Deleting one attribute.
    Remove,
    /// Enumerating attribute names.
    List,
    /// Probing whether a namespace is supported by the mount.
    Probe,
}

impl Operation {
    /// Returns the verb phrase used in rendered error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open extended attribute view on",
            Self::Get => "read extended attribute of",
            Self::Size => "query extended attribute size of",
            Self::Set => "write extended attribute of",
            Self::Remove => "remove extended attribute of",
            Self::List => "list extended attributes of",
            Self::Probe => "probe extended attribute support of",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copyable discriminant of [`XattrError`] for matching without borrowing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum XattrErrorKind {
    /// The bound path does not exist.
    PathNotFound,
    /// The caller lacks the rights for the operation.
    PermissionDenied,
    /// The named attribute is absent.
    AttributeNotFound,
    /// The named attribute exists and the write required it not to.
    AttributeAlreadyExists,
    /// The value exceeds the applicable size limit.
    ValueTooLarge,
    /// The platform, mount, or namespace does not support extended attributes.
    UnsupportedFilesystem,
    /// The attribute name is malformed.
    InvalidName,
    /// Any other I/O failure.
    Io,
}

/// Errors produced by extended attribute operations.
#[derive(Debug, Error)]
pub enum XattrError {
    /// The bound path does not exist or a path component is not a directory.
    #[error("failed to {operation} '{}': no such file or directory", path.display())]
    PathNotFound {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The caller lacks read or write rights for the attribute or its namespace.
    #[error("failed to {operation} '{}': permission denied", path.display())]
    PermissionDenied {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The named attribute is not present.
    #[error("failed to {operation} '{}': attribute '{name}' not found", path.display())]
    AttributeNotFound {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Full attribute name.
        name: String,
    },
    /// A create-only write found the attribute already present.
    #[error("failed to {operation} '{}': attribute '{name}' already exists", path.display())]
    AttributeAlreadyExists {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Full attribute name.
        name: String,
    },
    /// The value is larger than the view's limit or the filesystem accepts.
    #[error(
        "failed to {operation} '{}': value of {size} bytes for '{name}' is too large{}",
        path.display(),
        limit_suffix(*limit)
    )]
    ValueTooLarge {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Full attribute name.
        name: String,
        /// Size of the rejected value in bytes.
        size: usize,
        /// Limit that was exceeded, when known before the syscall.
        limit: Option<usize>,
    },
    /// Extended attributes, or the attribute's namespace, are not supported.
    #[error(
        "failed to {operation} '{}': extended attributes{} are not supported",
        path.display(),
        namespace_suffix(*namespace)
    )]
    UnsupportedFilesystem {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Namespace that was rejected, if the failure was namespace specific.
        namespace: Option<Namespace>,
    },
    /// The attribute name does not satisfy the naming rules.
    #[error("invalid extended attribute name '{name}': {reason}")]
    InvalidName {
        /// Name as supplied by the caller (lossy for non UTF-8 input).
        name: String,
        /// Which rule the name violates.
        reason: &'static str,
    },
    /// Catch-all for failures of the underlying OS interface.
    #[error("failed to {operation} '{}': {source}", path.display())]
    Io {
        /// Operation in flight.
        operation: Operation,
        /// Path the view is bound to.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

fn limit_suffix(limit: Option<usize>) -> String {
    limit.map_or_else(String::new, |limit| format!(" (limit {limit} bytes)"))
}

fn namespace_suffix(namespace: Option<Namespace>) -> String {
    namespace.map_or_else(String::new, |namespace| format!(" in the '{namespace}' namespace"))
}

/// `ENOATTR` is spelled `ENODATA` on Linux.
#[cfg(any(target_os = "linux", target_os = "android"))]
const ENOATTR: i32 = libc::ENODATA;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
const ENOATTR: i32 = libc::ENOATTR;

/// Maps a raw errno from an attribute syscall onto the taxonomy.
///
/// `ERANGE` only means an oversized value for writes; on reads the xattr
/// crate retries with a larger buffer and never surfaces it.
#[cfg(unix)]
fn classify_errno(code: i32, operation: Operation) -> Option<XattrErrorKind> {
    let kind = if code == libc::ENOENT || code == libc::ENOTDIR {
        XattrErrorKind::PathNotFound
    } else if code == libc::EACCES || code == libc::EPERM {
        XattrErrorKind::PermissionDenied
    } else if code == ENOATTR {
        XattrErrorKind::AttributeNotFound
    } else if code == libc::EEXIST {
        XattrErrorKind::AttributeAlreadyExists
    } else if code == libc::E2BIG || (code == libc::ERANGE && operation == Operation::Set) {
        XattrErrorKind::ValueTooLarge
    } else if code == libc::ENOTSUP || code == libc::EOPNOTSUPP {
        XattrErrorKind::UnsupportedFilesystem
    } else {
        return None;
    };
    Some(kind)
}

fn classify(error: &io::Error, operation: Operation) -> XattrErrorKind {
    #[cfg(unix)]
    {
        if let Some(kind) = error
            .raw_os_error()
            .and_then(|code| classify_errno(code, operation))
        {
            return kind;
        }
    }

    #[cfg(not(unix))]
    let _ = operation;

    match error.kind() {
        io::ErrorKind::NotFound => XattrErrorKind::PathNotFound,
        io::ErrorKind::PermissionDenied => XattrErrorKind::PermissionDenied,
        io::ErrorKind::AlreadyExists => XattrErrorKind::AttributeAlreadyExists,
        io::ErrorKind::Unsupported => XattrErrorKind::UnsupportedFilesystem,
        _ => XattrErrorKind::Io,
    }
}

impl XattrError {
    /// Classifies an OS error raised while performing `operation` on `path`.
    ///
    /// `name` is the attribute involved, if any; it feeds the
    /// attribute-specific variants and the namespace of
    /// [`XattrError::UnsupportedFilesystem`].
    pub(crate) fn from_io(
        operation: Operation,
        path: &Path,
        name: Option<&AttributeName>,
        source: io::Error,
    ) -> Self {
        let path = path.to_path_buf();
        let display_name = || name.map(|name| name.as_str().to_owned()).unwrap_or_default();

        match classify(&source, operation) {
            XattrErrorKind::PathNotFound => Self::PathNotFound {
                operation,
                path,
                source,
            },
            XattrErrorKind::PermissionDenied => Self::PermissionDenied {
                operation,
                path,
                source,
            },
            XattrErrorKind::AttributeNotFound => Self::AttributeNotFound {
                operation,
                path,
                name: display_name(),
            },
            XattrErrorKind::AttributeAlreadyExists => Self::AttributeAlreadyExists {
                operation,
                path,
                name: display_name(),
            },
            XattrErrorKind::ValueTooLarge => Self::ValueTooLarge {
                operation,
                path,
                name: display_name(),
                size: 0,
                limit: None,
            },
            XattrErrorKind::UnsupportedFilesystem => Self::UnsupportedFilesystem {
                operation,
                path,
                namespace: name.map(AttributeName::namespace),
            },
            XattrErrorKind::InvalidName | XattrErrorKind::Io => Self::Io {
                operation,
                path,
                source,
            },
        }
    }

    pub(crate) fn attribute_not_found(
        operation: Operation,
        path: &Path,
        name: &AttributeName,
    ) -> Self {
        Self::AttributeNotFound {
            operation,
            path: path.to_path_buf(),
            name: name.as_str().to_owned(),
        }
    }

    pub(crate) fn value_too_large(
        path: &Path,
        name: &AttributeName,
        size: usize,
        limit: Option<usize>,
    ) -> Self {
        Self::ValueTooLarge {
            operation: Operation::Set,
            path: path.to_path_buf(),
            name: name.as_str().to_owned(),
            size,
            limit,
        }
    }

    pub(crate) fn unsupported(
        operation: Operation,
        path: &Path,
        namespace: Option<Namespace>,
    ) -> Self {
        Self::UnsupportedFilesystem {
            operation,
            path: path.to_path_buf(),
            namespace,
        }
    }

    pub(crate) fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Records the size of a value the kernel refused as too large.
    pub(crate) fn with_value_size(self, rejected: usize) -> Self {
        match self {
            Self::ValueTooLarge {
                operation,
                path,
                name,
                limit,
                ..
            } => Self::ValueTooLarge {
                operation,
                path,
                name,
                size: rejected,
                limit,
            },
            other => other,
        }
    }

    /// Returns the copyable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> XattrErrorKind {
        match self {
            Self::PathNotFound { .. } => XattrErrorKind::PathNotFound,
            Self::PermissionDenied { .. } => XattrErrorKind::PermissionDenied,
            Self::AttributeNotFound { .. } => XattrErrorKind::AttributeNotFound,
            Self::AttributeAlreadyExists { .. } => XattrErrorKind::AttributeAlreadyExists,
            Self::ValueTooLarge { .. } => XattrErrorKind::ValueTooLarge,
            Self::UnsupportedFilesystem { .. } => XattrErrorKind::UnsupportedFilesystem,
            Self::InvalidName { .. } => XattrErrorKind::InvalidName,
            Self::Io { .. } => XattrErrorKind::Io,
        }
    }

    /// Returns the operation that failed, if the error arose from one.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::PathNotFound { operation, .. }
            | Self::PermissionDenied { operation, .. }
            | Self::AttributeNotFound { operation, .. }
            | Self::AttributeAlreadyExists { operation, .. }
            | Self::ValueTooLarge { operation, .. }
            | Self::UnsupportedFilesystem { operation, .. }
            | Self::Io { operation, .. } => Some(*operation),
            Self::InvalidName { .. } => None,
        }
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::AttributeNotFound { path, .. }
            | Self::AttributeAlreadyExists { path, .. }
            | Self::ValueTooLarge { path, .. }
            | Self::UnsupportedFilesystem { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidName { .. } => None,
        }
    }

    /// Reports whether this is an [`XattrError::AttributeNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}

impl From<XattrError> for io::Error {
    fn from(error: XattrError) -> Self {
        let kind = match error.kind() {
            XattrErrorKind::PathNotFound | XattrErrorKind::AttributeNotFound => {
                io::ErrorKind::NotFound
            }
            XattrErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
            XattrErrorKind::AttributeAlreadyExists => io::ErrorKind::AlreadyExists,
            XattrErrorKind::ValueTooLarge | XattrErrorKind::InvalidName => {
                io::ErrorKind::InvalidInput
            }
            XattrErrorKind::UnsupportedFilesystem => io::ErrorKind::Unsupported,
            XattrErrorKind::Io => io::ErrorKind::Other,
        };
        Self::new(kind, error)
    }
}
