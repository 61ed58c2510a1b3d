//! crates/xattr-view/src/view.rs
//!
//! Path-bound attribute views.
//!
//! An [`AttributeView`] remembers a path and a set of [`ViewOptions`]; it
//! holds no descriptor. Every operation is one syscall against the path, so
//! nothing needs releasing and concurrent views over the same path are
//! arbitrated by the kernel (the last write wins).
//!
//! Opening a view fails fast: the process-wide [`capabilities`] are checked
//! first, then the mount is probed with a non-mutating `getxattr(2)` of a
//! sentinel name in each accessible namespace. A view is only handed out if
//! at least one namespace answers with anything other than `ENOTSUP`.

use std::path::{Path, PathBuf};

use crate::capability::capabilities;
use crate::error::{Operation, XattrError, XattrErrorKind, XattrResult};
use crate::list::AttributeList;
use crate::mode::SetMode;
use crate::name::{Namespace, ToAttributeName};
use crate::options::ViewOptions;
use crate::scoped::ScopedView;
use crate::sys;
use crate::trace::{self, traced};
use crate::value::AttributeValue;

/// Handle through which the extended attributes of one path are read and written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeView {
    path: PathBuf,
    options: ViewOptions,
}

impl AttributeView {
    /// Binds a view to `path` with default options.
    ///
    /// # Errors
    ///
    /// - [`XattrError::PathNotFound`] if `path` does not exist.
    /// - [`XattrError::UnsupportedFilesystem`] if the platform, or the
    ///   filesystem holding `path`, has no extended attribute support.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xattr_view::{AttributeView, SetMode};
    ///
    /// # fn main() -> Result<(), xattr_view::XattrError> {
    /// let view = AttributeView::open("/srv/data/report.pdf")?;
    /// view.set("user.mime_type", b"application/pdf", SetMode::CreateOrReplace)?;
    /// assert_eq!(view.get("user.mime_type")?, b"application/pdf");
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> XattrResult<Self> {
        Self::open_with(path, ViewOptions::default())
    }

    /// Binds a view to `path` with explicit options.
    pub fn open_with(path: impl AsRef<Path>, options: ViewOptions) -> XattrResult<Self> {
        traced(Self::bind(path.as_ref(), options))
    }

    fn bind(path: &Path, options: ViewOptions) -> XattrResult<Self> {
        let caps = capabilities();
        if !caps.platform_supported() {
            return Err(XattrError::unsupported(Operation::Open, path, None));
        }

        let follow = options.follows_symlinks();
        let user_applies = sys::holds_user_attributes(path, follow)
            .map_err(|error| XattrError::from_io(Operation::Open, path, None, error))?;
        let mut inconclusive = false;
        for namespace in caps.probe_order() {
            // The kernel answers `user.` reads on other file types itself.
            if namespace == Namespace::User && !user_applies {
                continue;
            }
            let probe = namespace.probe_name();
            match sys::probe(path, probe.as_os_str(), follow) {
                Ok(true) => {
                    trace::trace_probe(path, namespace, true);
                    trace::trace_open(path, follow, namespace);
                    return Ok(Self {
                        path: path.to_path_buf(),
                        options,
                    });
                }
                Ok(false) => trace::trace_probe(path, namespace, false),
                Err(error) => {
                    let error = XattrError::from_io(Operation::Open, path, Some(&probe), error);
                    // EACCES/EPERM says nothing about mount support: user.* on an
                    // unreadable file is refused regardless.
                    if error.kind() != XattrErrorKind::PermissionDenied {
                        return Err(error);
                    }
                    inconclusive = true;
                }
            }
        }

        if inconclusive {
            trace::trace_open(path, follow, Namespace::User);
            return Ok(Self {
                path: path.to_path_buf(),
                options,
            });
        }
        Err(XattrError::unsupported(Operation::Open, path, None))
    }

    /// Returns the path this view is bound to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the options this view was opened with.
    #[must_use]
    pub const fn options(&self) -> &ViewOptions {
        &self.options
    }

    const fn follow(&self) -> bool {
        self.options.follows_symlinks()
    }

    /// Reads the value of `name`.
    ///
    /// # Errors
    ///
    /// - [`XattrError::AttributeNotFound`] if the attribute is absent.
    /// - [`XattrError::PermissionDenied`] if the caller may not read it.
    /// - [`XattrError::UnsupportedFilesystem`] if the mount does not support
    ///   the attribute's namespace.
    pub fn get<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<AttributeValue> {
        traced(self.get_inner(name))
    }

    fn get_inner<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<AttributeValue> {
        let name = name.to_attribute_name()?;
        match sys::get(&self.path, name.as_os_str(), self.follow()) {
            Ok(Some(value)) => {
                trace::trace_get(&self.path, &name, value.len());
                Ok(AttributeValue::new(value))
            }
            Ok(None) => Err(XattrError::attribute_not_found(
                Operation::Get,
                &self.path,
                &name,
            )),
            Err(error) => Err(XattrError::from_io(
                Operation::Get,
                &self.path,
                Some(&*name),
                error,
            )),
        }
    }

    /// Reads the value of `name`, mapping an absent attribute to `None`.
    pub fn get_optional<N: ToAttributeName + ?Sized>(
        &self,
        name: &N,
    ) -> XattrResult<Option<AttributeValue>> {
        traced(match self.get_inner(name) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        })
    }

    /// Reports whether `name` is present.
    pub fn contains<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<bool> {
        traced(match self.value_size_inner(name) {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        })
    }

    /// Returns the length of the value of `name` without reading it.
    pub fn value_size<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<usize> {
        traced(self.value_size_inner(name))
    }

    fn value_size_inner<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<usize> {
        let name = name.to_attribute_name()?;
        sys::size(&self.path, name.as_os_str(), self.follow()).map_err(|error| {
            XattrError::from_io(Operation::Size, &self.path, Some(&*name), error)
        })
    }

    /// Writes `value` under `name` according to `mode`.
    ///
    /// Values longer than the view's limit are rejected before any syscall.
    ///
    /// # Errors
    ///
    /// - [`XattrError::AttributeAlreadyExists`] for [`SetMode::CreateOnly`]
    ///   when the attribute exists.
    /// - [`XattrError::AttributeNotFound`] for [`SetMode::ReplaceOnly`] when
    ///   it does not.
    /// - [`XattrError::ValueTooLarge`] when `value` exceeds the view's limit
    ///   or the filesystem refuses its size.
    pub fn set<N, V>(&self, name: &N, value: V, mode: SetMode) -> XattrResult<()>
    where
        N: ToAttributeName + ?Sized,
        V: AsRef<[u8]>,
    {
        traced(self.set_inner(name, value.as_ref(), mode))
    }

    fn set_inner<N: ToAttributeName + ?Sized>(
        &self,
        name: &N,
        value: &[u8],
        mode: SetMode,
    ) -> XattrResult<()> {
        let name = name.to_attribute_name()?;
        let limit = self.options.value_limit();
        if value.len() > limit {
            return Err(XattrError::value_too_large(
                &self.path,
                &name,
                value.len(),
                Some(limit),
            ));
        }

        sys::set(&self.path, name.as_os_str(), value, mode, self.follow()).map_err(|error| {
            XattrError::from_io(Operation::Set, &self.path, Some(&*name), error)
                .with_value_size(value.len())
        })?;
        trace::trace_set(&self.path, &name, value.len(), mode);
        Ok(())
    }

    /// Deletes `name`.
    ///
    /// # Errors
    ///
    /// [`XattrError::AttributeNotFound`] if the attribute is absent.
    pub fn remove<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<()> {
        traced(name.to_attribute_name().and_then(|name| {
            sys::remove(&self.path, name.as_os_str(), self.follow()).map_err(|error| {
                XattrError::from_io(Operation::Remove, &self.path, Some(&*name), error)
            })?;
            trace::trace_remove(&self.path, &name);
            Ok(())
        }))
    }

    /// Lists the names currently present, in filesystem order.
    ///
    /// The kernel hides namespaces the caller may not see (`trusted.` for
    /// non-root), so the listing reflects the caller's privileges.
    pub fn list(&self) -> XattrResult<AttributeList> {
        traced(
            sys::list(&self.path, self.follow())
                .map(|raw| {
                    trace::trace_list(&self.path, raw.len());
                    AttributeList::from_raw(raw)
                })
                .map_err(|error| XattrError::from_io(Operation::List, &self.path, None, error)),
        )
    }

    /// Lists the names currently present in `namespace`.
    pub fn list_namespace(&self, namespace: Namespace) -> XattrResult<AttributeList> {
        self.list().map(|list| list.retain_namespace(namespace))
    }

    /// Probes whether the filesystem under this path supports `namespace`.
    ///
    /// The probe reads a sentinel attribute and never writes. An absent
    /// attribute counts as support; only `ENOTSUP` counts as no support.
    /// `user.` attributes only exist on regular files and directories, so
    /// for any other target [`Namespace::User`] reports `false` unprobed.
    ///
    /// # Errors
    ///
    /// [`XattrError::PermissionDenied`] when the caller may not query the
    /// namespace at all, e.g. `trusted.` without `CAP_SYS_ADMIN`.
    pub fn supports_namespace(&self, namespace: Namespace) -> XattrResult<bool> {
        traced(self.probe_namespace(namespace))
    }

    fn probe_namespace(&self, namespace: Namespace) -> XattrResult<bool> {
        if namespace == Namespace::User {
            let applies = sys::holds_user_attributes(&self.path, self.follow())
                .map_err(|error| XattrError::from_io(Operation::Probe, &self.path, None, error))?;
            if !applies {
                trace::trace_probe(&self.path, namespace, false);
                return Ok(false);
            }
        }

        let probe = namespace.probe_name();
        let supported = sys::probe(&self.path, probe.as_os_str(), self.follow()).map_err(
            |error| XattrError::from_io(Operation::Probe, &self.path, Some(&probe), error),
        )?;
        trace::trace_probe(&self.path, namespace, supported);
        Ok(supported)
    }

    /// Opens a descriptor on the path and keeps it for several operations.
    ///
    /// The descriptor is closed when the returned [`ScopedView`] is dropped.
    /// Views that do not follow symlinks refuse to open a symlink.
    ///
    /// # Errors
    ///
    /// The descriptor is opened read-only, so a caller without read
    /// permission on the file gets [`XattrError::PermissionDenied`] here even
    /// where the path-based [`set`](Self::set) and [`remove`](Self::remove)
    /// would succeed.
    pub fn scoped(&self) -> XattrResult<ScopedView<'_>> {
        traced(ScopedView::acquire(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use test_support::xattrs_supported;

    #[test]
    fn open_missing_path_is_path_not_found() {
        let dir = tempdir().expect("create temp dir");
        let missing = dir.path().join("missing.txt");

        if !capabilities().platform_supported() {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let error = AttributeView::open(&missing).expect_err("missing path");
        assert_eq!(error.kind(), XattrErrorKind::PathNotFound);
        assert_eq!(error.path(), Some(missing.as_path()));
        assert_eq!(error.operation(), Some(Operation::Open));
    }

    #[test]
    fn open_does_not_leave_probe_attributes_behind() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("probe.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        assert!(view.list_namespace(Namespace::User).expect("list").is_empty());
    }

    #[test]
    fn set_then_get_returns_value() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("tag.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        view.set("user.tag", b"hello", SetMode::CreateOrReplace)
            .expect("set");
        assert_eq!(view.get("user.tag").expect("get"), b"hello");
    }

    #[test]
    fn get_missing_attribute_is_not_found() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("fresh.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        let error = view.get("user.missing").expect_err("absent");
        assert_eq!(error.kind(), XattrErrorKind::AttributeNotFound);
        assert_eq!(view.get_optional("user.missing").expect("optional"), None);
        assert!(!view.contains("user.missing").expect("contains"));
    }

    #[test]
    fn oversized_value_rejected_before_syscall() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("big.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        let error = view
            .set("user.big", vec![0_u8; 100_000], SetMode::CreateOrReplace)
            .expect_err("too large");
        assert!(matches!(
            error,
            XattrError::ValueTooLarge {
                size: 100_000,
                limit: Some(65_536),
                ..
            }
        ));
        assert!(!view.contains("user.big").expect("contains"));
    }

    #[test]
    fn configured_limit_applies() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("small.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open_with(&file, ViewOptions::new().max_value_size(16))
            .expect("open");
        view.set("user.fits", [1_u8; 16], SetMode::CreateOrReplace)
            .expect("at limit");
        let error = view
            .set("user.spills", [1_u8; 17], SetMode::CreateOrReplace)
            .expect_err("over limit");
        assert_eq!(error.kind(), XattrErrorKind::ValueTooLarge);
    }

    #[test]
    fn invalid_name_is_rejected_without_io() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("names.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        let error = view
            .set("tag", b"x", SetMode::CreateOrReplace)
            .expect_err("no namespace");
        assert_eq!(error.kind(), XattrErrorKind::InvalidName);
    }

    #[test]
    fn value_size_matches_written_length() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("size.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        view.set("user.sized", [0_u8; 42], SetMode::CreateOrReplace)
            .expect("set");
        assert_eq!(view.value_size("user.sized").expect("size"), 42);
        assert!(view.contains("user.sized").expect("contains"));
    }

    #[test]
    fn supports_user_namespace_on_capable_mount() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("ns.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        assert!(view.supports_namespace(Namespace::User).expect("probe"));
    }

    #[test]
    fn user_namespace_is_not_reported_on_the_link_itself() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&file, "content").expect("write file");
        std::os::unix::fs::symlink(&file, &link).expect("symlink");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let link_view = AttributeView::open_with(&link, ViewOptions::new().follow_symlinks(false))
            .expect("open link itself");
        assert!(!link_view.supports_namespace(Namespace::User).expect("namespace check"));

        let through_link = AttributeView::open(&link).expect("open through link");
        assert!(through_link.supports_namespace(Namespace::User).expect("namespace check"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn procfs_symlink_is_unsupported_without_following() {
        let link = Path::new("/proc/self/cwd");
        if fs::symlink_metadata(link).is_err() {
            eprintln!("procfs not mounted, skipping test");
            return;
        }

        let error = AttributeView::open_with(link, ViewOptions::new().follow_symlinks(false))
            .expect_err("procfs has no attribute handlers");
        assert_eq!(error.kind(), XattrErrorKind::UnsupportedFilesystem);
        assert_eq!(error.operation(), Some(Operation::Open));
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn absent_answers_are_not_logged_as_failures() {
        use test_support::capture_events;

        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("quiet.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let view = AttributeView::open(&file).expect("open");
        let events = capture_events(|| {
            assert_eq!(view.get_optional("user.absent").expect("optional"), None);
            assert!(!view.contains("user.absent").expect("contains"));
        });
        assert!(!events.contains("kind="), "{events}");

        let events = capture_events(|| {
            view.get("user.absent").expect_err("absent");
        });
        assert!(events.contains("kind=AttributeNotFound"), "{events}");
    }
}
