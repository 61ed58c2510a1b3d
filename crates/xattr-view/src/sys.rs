//! Linux backend over the `getxattr(2)` family.
//!
//! Reads, listing and removal go through the `xattr` crate. Writes go
//! through `rustix` because `setxattr(2)` flags (`XATTR_CREATE`,
//! `XATTR_REPLACE`) are not exposed by `xattr`, and a separate
//! get-then-set would race with other writers.
//!
//! Path forms pick the `l*` syscall when `follow` is false. Descriptor forms
//! operate on an already open [`File`] and never resolve paths again.

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use rustix::fs::XattrFlags;
use xattr::FileExt;

use crate::mode::SetMode;

pub(crate) const PLATFORM_SUPPORTED: bool = xattr::SUPPORTED_PLATFORM;

fn flags(mode: SetMode) -> XattrFlags {
    match mode {
        SetMode::CreateOrReplace => XattrFlags::empty(),
        SetMode::CreateOnly => XattrFlags::CREATE,
        SetMode::ReplaceOnly => XattrFlags::REPLACE,
    }
}

pub(crate) fn get(path: &Path, name: &OsStr, follow: bool) -> io::Result<Option<Vec<u8>>> {
    if follow {
        xattr::get_deref(path, name)
    } else {
        xattr::get(path, name)
    }
}

/// Asks the kernel for the value length by passing an empty buffer.
pub(crate) fn size(path: &Path, name: &OsStr, follow: bool) -> io::Result<usize> {
    let mut empty = [0_u8; 0];
    let result = if follow {
        rustix::fs::getxattr(path, name, &mut empty[..])
    } else {
        rustix::fs::lgetxattr(path, name, &mut empty[..])
    };
    result.map_err(io::Error::from)
}

pub(crate) fn set(
    path: &Path,
    name: &OsStr,
    value: &[u8],
    mode: SetMode,
    follow: bool,
) -> io::Result<()> {
    let result = if follow {
        rustix::fs::setxattr(path, name, value, flags(mode))
    } else {
        rustix::fs::lsetxattr(path, name, value, flags(mode))
    };
    result.map_err(io::Error::from)
}

pub(crate) fn remove(path: &Path, name: &OsStr, follow: bool) -> io::Result<()> {
    if follow {
        xattr::remove_deref(path, name)
    } else {
        xattr::remove(path, name)
    }
}

pub(crate) fn list(path: &Path, follow: bool) -> io::Result<Vec<OsString>> {
    let attrs = if follow {
        xattr::list_deref(path)
    } else {
        xattr::list(path)
    }?;
    Ok(attrs.collect())
}

/// Reports whether the mount accepts names like `name` without changing anything.
///
/// A missing attribute (`ENODATA`) proves the namespace is handled; only
/// `ENOTSUP` means it is not.
pub(crate) fn probe(path: &Path, name: &OsStr, follow: bool) -> io::Result<bool> {
    match size(path, name, follow) {
        Ok(_) => Ok(true),
        Err(error) => match error.raw_os_error() {
            Some(libc::ENODATA) => Ok(true),
            Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => Ok(false),
            _ => Err(error),
        },
    }
}

/// Reports whether the target can carry `user.` attributes at all.
///
/// The kernel answers `user.` reads on anything but a regular file or a
/// directory with `ENODATA` before the filesystem is consulted, so a probe
/// there proves nothing about the mount.
pub(crate) fn holds_user_attributes(path: &Path, follow: bool) -> io::Result<bool> {
    let metadata = if follow {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    }?;
    let file_type = metadata.file_type();
    Ok(file_type.is_file() || file_type.is_dir())
}

/// Opens a read-only descriptor for attribute calls; symlinks fail with `ELOOP` unless followed.
pub(crate) fn open_descriptor(path: &Path, follow: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    if !follow {
        options.custom_flags(libc::O_NOFOLLOW);
    }
    options.open(path)
}

pub(crate) fn fget(file: &File, name: &OsStr) -> io::Result<Option<Vec<u8>>> {
    file.get_xattr(name)
}

pub(crate) fn fsize(file: &File, name: &OsStr) -> io::Result<usize> {
    let mut empty = [0_u8; 0];
    rustix::fs::fgetxattr(file, name, &mut empty[..]).map_err(io::Error::from)
}

pub(crate) fn fset(file: &File, name: &OsStr, value: &[u8], mode: SetMode) -> io::Result<()> {
    rustix::fs::fsetxattr(file, name, value, flags(mode)).map_err(io::Error::from)
}

pub(crate) fn fremove(file: &File, name: &OsStr) -> io::Result<()> {
    file.remove_xattr(name)
}

pub(crate) fn flist(file: &File) -> io::Result<Vec<OsString>> {
    Ok(file.list_xattr()?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use test_support::xattrs_supported;

    #[test]
    fn create_only_refuses_existing_attribute() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("flags.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let name = OsStr::new("user.flags");
        set(&file, name, b"one", SetMode::CreateOnly, true).expect("first create");
        let error = set(&file, name, b"two", SetMode::CreateOnly, true).expect_err("exists");
        assert_eq!(error.raw_os_error(), Some(libc::EEXIST));
        assert_eq!(get(&file, name, true).expect("read"), Some(b"one".to_vec()));
    }

    #[test]
    fn replace_only_refuses_missing_attribute() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("flags.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let error = set(&file, OsStr::new("user.absent"), b"v", SetMode::ReplaceOnly, true)
            .expect_err("absent");
        assert_eq!(error.raw_os_error(), Some(libc::ENODATA));
    }

    #[test]
    fn size_reports_value_length_without_reading() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("size.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let name = OsStr::new("user.sized");
        set(&file, name, &[7_u8; 300], SetMode::CreateOrReplace, true).expect("write");
        assert_eq!(size(&file, name, true).expect("size"), 300);
    }

    #[test]
    fn probe_accepts_user_namespace_on_capable_mount() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("probe.txt");
        fs::write(&file, "content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        assert!(probe(&file, OsStr::new("user.xattr-view.probe"), true).expect("probe"));
        assert!(
            list(&file, true)
                .expect("list")
                .iter()
                .all(|name| name != "user.xattr-view.probe"),
            "probing must not create the sentinel"
        );
    }

    #[test]
    fn descriptor_forms_match_path_forms() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("fd.txt");
        fs::write(&path, "content").expect("write file");

        if !xattrs_supported(&path) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let file = open_descriptor(&path, true).expect("open");
        let name = OsStr::new("user.fd");
        fset(&file, name, b"via fd", SetMode::CreateOnly).expect("fset");
        assert_eq!(get(&path, name, true).expect("read"), Some(b"via fd".to_vec()));
        assert_eq!(fsize(&file, name).expect("fsize"), 6);
        assert!(flist(&file).expect("flist").iter().any(|n| n == "user.fd"));
        fremove(&file, name).expect("fremove");
        assert_eq!(fget(&file, name).expect("fget"), None);
    }

    #[test]
    fn user_attributes_only_live_on_files_and_directories() {
        let dir = tempdir().expect("create temp dir");
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&target, "content").expect("write file");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");

        assert!(holds_user_attributes(&target, false).expect("file"));
        assert!(holds_user_attributes(dir.path(), false).expect("directory"));
        assert!(holds_user_attributes(&link, true).expect("followed link"));
        assert!(!holds_user_attributes(&link, false).expect("link itself"));

        let error = holds_user_attributes(&dir.path().join("missing"), true)
            .expect_err("missing");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn no_follow_descriptor_refuses_symlink() {
        let dir = tempdir().expect("create temp dir");
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&target, "content").expect("write file");
        std::os::unix::fs::symlink(&target, &link).expect("symlink");

        let error = open_descriptor(&link, false).expect_err("symlink refused");
        assert_eq!(error.raw_os_error(), Some(libc::ELOOP));
        assert!(open_descriptor(&link, true).is_ok());
    }
}
