//! Process-wide capability detection.
//!
//! Whether the platform exposes extended attributes at all, and whether the
//! process may touch the `trusted.` namespace, does not change while the
//! process runs. Both are probed once, on first use, and cached in a
//! [`OnceLock`]; the result is read-only afterwards and needs no teardown.
//! Per-mount support is a separate, per-path question answered by
//! [`AttributeView::open`](crate::AttributeView::open) and
//! [`AttributeView::supports_namespace`](crate::AttributeView::supports_namespace).

use std::sync::OnceLock;

use crate::name::Namespace;
use crate::sys;
use crate::value::XATTR_SIZE_MAX;

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// What this process can do with extended attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    platform_supported: bool,
    privileged: bool,
    max_value_size: usize,
}

impl Capabilities {
    fn detect() -> Self {
        Self {
            platform_supported: sys::PLATFORM_SUPPORTED,
            privileged: effective_uid_is_root(),
            max_value_size: XATTR_SIZE_MAX,
        }
    }

    /// Reports whether this build and platform provide an attribute backend.
    #[must_use]
    pub const fn platform_supported(&self) -> bool {
        self.platform_supported
    }

    /// Reports whether the process runs with effective UID 0.
    #[must_use]
    pub const fn privileged(&self) -> bool {
        self.privileged
    }

    /// Returns the largest value the platform accepts.
    #[must_use]
    pub const fn max_value_size(&self) -> usize {
        self.max_value_size
    }

    /// Reports whether the process may read and write `namespace` at all.
    ///
    /// `security.` and `system.` remain subject to the security module and
    /// the file's ACL rules; this only rules out `trusted.` for non-root.
    #[must_use]
    pub const fn may_access(&self, namespace: Namespace) -> bool {
        !namespace.requires_privilege() || self.privileged
    }

    /// Namespaces probed, in order, when a view is opened.
    pub(crate) fn probe_order(&self) -> impl Iterator<Item = Namespace> + '_ {
        [Namespace::User, Namespace::Security, Namespace::Trusted]
            .into_iter()
            .filter(|namespace| self.may_access(*namespace))
    }
}

/// Returns the process-wide capabilities, detecting them on first call.
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(Capabilities::detect)
}

#[cfg(unix)]
fn effective_uid_is_root() -> bool {
    rustix::process::geteuid().is_root()
}

#[cfg(not(unix))]
fn effective_uid_is_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_are_cached() {
        let first = capabilities();
        let second = capabilities();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn platform_flag_matches_backend() {
        assert_eq!(capabilities().platform_supported(), sys::PLATFORM_SUPPORTED);
        assert_eq!(capabilities().max_value_size(), XATTR_SIZE_MAX);
    }

    #[test]
    fn trusted_namespace_gated_on_privilege() {
        let unprivileged = Capabilities {
            platform_supported: true,
            privileged: false,
            max_value_size: XATTR_SIZE_MAX,
        };
        assert!(unprivileged.may_access(Namespace::User));
        assert!(unprivileged.may_access(Namespace::Security));
        assert!(!unprivileged.may_access(Namespace::Trusted));
        assert_eq!(
            unprivileged.probe_order().collect::<Vec<_>>(),
            vec![Namespace::User, Namespace::Security]
        );

        let root = Capabilities {
            privileged: true,
            ..unprivileged
        };
        assert!(root.may_access(Namespace::Trusted));
        assert_eq!(root.probe_order().count(), 3);
    }

    #[test]
    #[cfg(unix)]
    fn privilege_matches_effective_uid() {
        assert_eq!(
            capabilities().privileged(),
            rustix::process::geteuid().is_root()
        );
    }
}
