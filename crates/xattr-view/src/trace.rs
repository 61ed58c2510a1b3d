//! Attribute operation tracing.
//!
//! Each helper emits one `debug!` (or `trace!` for probes) event under the
//! `xattr_view::op` target with structured `operation`, `path` and `name`
//! fields. With the `tracing` feature disabled the helpers compile to nothing.

use std::path::Path;

use crate::error::{XattrError, XattrResult};
use crate::mode::SetMode;
use crate::name::{AttributeName, Namespace};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Trace a view being bound to a path.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_open(path: &Path, follow_symlinks: bool, supported: Namespace) {
    debug!(
        target: "xattr_view::op",
        operation = "open",
        path = %path.display(),
        follow_symlinks,
        namespace = supported.as_str(),
        "open {} (probed via {})",
        path.display(),
        supported
    );
}

/// Trace a view being bound to a path - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_open(_path: &Path, _follow_symlinks: bool, _supported: Namespace) {}

/// Trace a single namespace probe.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_probe(path: &Path, namespace: Namespace, supported: bool) {
    trace!(
        target: "xattr_view::op",
        operation = "probe",
        path = %path.display(),
        namespace = namespace.as_str(),
        supported,
        "probe {} namespace on {}: {}",
        namespace,
        path.display(),
        if supported { "supported" } else { "unsupported" }
    );
}

/// Trace a single namespace probe - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_probe(_path: &Path, _namespace: Namespace, _supported: bool) {}

/// Trace an attribute read.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_get(path: &Path, name: &AttributeName, size: usize) {
    debug!(
        target: "xattr_view::op",
        operation = "get",
        path = %path.display(),
        name = name.as_str(),
        size,
        "get {} on {} ({} bytes)",
        name,
        path.display(),
        size
    );
}

/// Trace an attribute read - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_get(_path: &Path, _name: &AttributeName, _size: usize) {}

/// Trace an attribute write.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_set(path: &Path, name: &AttributeName, size: usize, mode: SetMode) {
    debug!(
        target: "xattr_view::op",
        operation = "set",
        path = %path.display(),
        name = name.as_str(),
        size,
        mode = mode.as_str(),
        "set {} on {} ({} bytes, {})",
        name,
        path.display(),
        size,
        mode
    );
}

/// Trace an attribute write - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_set(_path: &Path, _name: &AttributeName, _size: usize, _mode: SetMode) {}

/// Trace an attribute removal.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_remove(path: &Path, name: &AttributeName) {
    debug!(
        target: "xattr_view::op",
        operation = "remove",
        path = %path.display(),
        name = name.as_str(),
        "remove {} on {}",
        name,
        path.display()
    );
}

/// Trace an attribute removal - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_remove(_path: &Path, _name: &AttributeName) {}

/// Trace a name listing.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_list(path: &Path, count: usize) {
    debug!(
        target: "xattr_view::op",
        operation = "list",
        path = %path.display(),
        count,
        "list {} ({} names)",
        path.display(),
        count
    );
}

/// Trace a name listing - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_list(_path: &Path, _count: usize) {}

/// Trace a listed name that could not be represented as an [`AttributeName`].
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_skipped_name(error: &XattrError) {
    tracing::warn!(
        target: "xattr_view::op",
        operation = "list",
        "skipping listed attribute: {}",
        error
    );
}

/// Trace a skipped listed name - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_skipped_name(_error: &XattrError) {}

/// Trace a descriptor held by a scoped view being released.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_release(path: &Path) {
    trace!(
        target: "xattr_view::op",
        operation = "release",
        path = %path.display(),
        "release descriptor for {}",
        path.display()
    );
}

/// Trace a descriptor release - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_release(_path: &Path) {}

/// Trace a failed operation before the error is handed to the caller.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_failure(error: &XattrError) {
    debug!(
        target: "xattr_view::op",
        kind = ?error.kind(),
        "{}",
        error
    );
}

/// Trace a failed operation - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_failure(_error: &XattrError) {}

/// Logs a failure on its way to the caller.
pub fn traced<T>(result: XattrResult<T>) -> XattrResult<T> {
    if let Err(error) = &result {
        trace_failure(error);
    }
    result
}
