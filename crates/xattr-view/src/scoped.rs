//! Descriptor-holding views for batches of operations.
//!
//! A [`ScopedView`] opens the bound path once and issues the `f*xattr`
//! syscalls against that descriptor, so a rename of the path mid-batch does
//! not redirect later calls to a different file. The descriptor lives exactly
//! as long as the `ScopedView` and is closed on drop, on every exit path.

use std::fs::File;

use crate::error::{Operation, XattrError, XattrResult};
use crate::list::AttributeList;
use crate::mode::SetMode;
use crate::name::ToAttributeName;
use crate::sys;
use crate::trace::{self, traced};
use crate::value::AttributeValue;
use crate::view::AttributeView;

/// An [`AttributeView`] with an open descriptor on its path.
#[derive(Debug)]
pub struct ScopedView<'a> {
    view: &'a AttributeView,
    file: File,
}

impl<'a> ScopedView<'a> {
    pub(crate) fn acquire(view: &'a AttributeView) -> XattrResult<Self> {
        let file = sys::open_descriptor(view.path(), view.options().follows_symlinks())
            .map_err(|error| XattrError::from_io(Operation::Open, view.path(), None, error))?;
        Ok(Self { view, file })
    }

    /// Returns the view this scope was acquired from.
    #[must_use]
    pub const fn view(&self) -> &'a AttributeView {
        self.view
    }

    /// Reads the value of `name` through the held descriptor.
    pub fn get<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<AttributeValue> {
        traced(self.get_inner(name))
    }

    fn get_inner<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<AttributeValue> {
        let name = name.to_attribute_name()?;
        let path = self.view.path();
        match sys::fget(&self.file, name.as_os_str()) {
            Ok(Some(value)) => {
                trace::trace_get(path, &name, value.len());
                Ok(AttributeValue::new(value))
            }
            Ok(None) => Err(XattrError::attribute_not_found(Operation::Get, path, &name)),
            Err(error) => Err(XattrError::from_io(Operation::Get, path, Some(&*name), error)),
        }
    }

    /// Returns the length of the value of `name` without reading it.
    pub fn value_size<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<usize> {
        traced(name.to_attribute_name().and_then(|name| {
            sys::fsize(&self.file, name.as_os_str()).map_err(|error| {
                XattrError::from_io(Operation::Size, self.view.path(), Some(&*name), error)
            })
        }))
    }

    /// Writes `value` under `name` through the held descriptor.
    ///
    /// Same limits and modes as [`AttributeView::set`].
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
        let path = self.view.path();
        let limit = self.view.options().value_limit();
        if value.len() > limit {
            return Err(XattrError::value_too_large(
                path,
                &name,
                value.len(),
                Some(limit),
            ));
        }

        sys::fset(&self.file, name.as_os_str(), value, mode).map_err(|error| {
            XattrError::from_io(Operation::Set, path, Some(&*name), error)
                .with_value_size(value.len())
        })?;
        trace::trace_set(path, &name, value.len(), mode);
        Ok(())
    }

    /// Deletes `name` through the held descriptor.
    pub fn remove<N: ToAttributeName + ?Sized>(&self, name: &N) -> XattrResult<()> {
        let path = self.view.path();
        traced(name.to_attribute_name().and_then(|name| {
            sys::fremove(&self.file, name.as_os_str()).map_err(|error| {
                XattrError::from_io(Operation::Remove, path, Some(&*name), error)
            })?;
            trace::trace_remove(path, &name);
            Ok(())
        }))
    }

    /// Lists the names present on the open file.
    pub fn list(&self) -> XattrResult<AttributeList> {
        let path = self.view.path();
        traced(
            sys::flist(&self.file)
                .map(|raw| {
                    trace::trace_list(path, raw.len());
                    AttributeList::from_raw(raw)
                })
                .map_err(|error| XattrError::from_io(Operation::List, path, None, error)),
        )
    }
}

impl Drop for ScopedView<'_> {
    fn drop(&mut self) {
        trace::trace_release(self.view.path());
    }
}
