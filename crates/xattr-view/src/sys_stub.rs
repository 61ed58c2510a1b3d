//! Backend for platforms without extended attribute support.
//!
//! Used off Linux or when the `xattr` feature is disabled. Every call fails
//! with [`io::ErrorKind::Unsupported`], and [`PLATFORM_SUPPORTED`] is false so
//! [`AttributeView::open`](crate::AttributeView::open) fails fast before any
//! of these are reached.

#![allow(dead_code)]

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::mode::SetMode;

pub(crate) const PLATFORM_SUPPORTED: bool = false;

fn unsupported<T>() -> io::Result<T> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "extended attributes are not supported on this platform",
    ))
}

pub(crate) fn get(_path: &Path, _name: &OsStr, _follow: bool) -> io::Result<Option<Vec<u8>>> {
    unsupported()
}

pub(crate) fn size(_path: &Path, _name: &OsStr, _follow: bool) -> io::Result<usize> {
    unsupported()
}

pub(crate) fn set(
    _path: &Path,
    _name: &OsStr,
    _value: &[u8],
    _mode: SetMode,
    _follow: bool,
) -> io::Result<()> {
    unsupported()
}

pub(crate) fn remove(_path: &Path, _name: &OsStr, _follow: bool) -> io::Result<()> {
    unsupported()
}

pub(crate) fn list(_path: &Path, _follow: bool) -> io::Result<Vec<OsString>> {
    unsupported()
}

pub(crate) fn probe(_path: &Path, _name: &OsStr, _follow: bool) -> io::Result<bool> {
    Ok(false)
}

pub(crate) fn holds_user_attributes(_path: &Path, _follow: bool) -> io::Result<bool> {
    Ok(false)
}

pub(crate) fn open_descriptor(_path: &Path, _follow: bool) -> io::Result<File> {
    unsupported()
}

pub(crate) fn fget(_file: &File, _name: &OsStr) -> io::Result<Option<Vec<u8>>> {
    unsupported()
}

pub(crate) fn fsize(_file: &File, _name: &OsStr) -> io::Result<usize> {
    unsupported()
}

pub(crate) fn fset(_file: &File, _name: &OsStr, _value: &[u8], _mode: SetMode) -> io::Result<()> {
    unsupported()
}

pub(crate) fn fremove(_file: &File, _name: &OsStr) -> io::Result<()> {
    unsupported()
}

pub(crate) fn flist(_file: &File) -> io::Result<Vec<OsString>> {
    unsupported()
}
