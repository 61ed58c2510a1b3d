#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `xattr_view` reads, writes, lists and removes the extended attributes of
//! a filesystem path through the documented `getxattr(2)` family of system
//! calls. An [`AttributeView`] is bound to one path; each operation on it is
//! a single, all-or-nothing syscall and nothing is retried.
//!
//! # Design
//!
//! - [`AttributeView::open`] fails fast. It consults the process-wide
//!   [`capabilities`] (computed once) and then probes the mount without
//!   writing anything, returning [`XattrError::UnsupportedFilesystem`] up
//!   front rather than handing out a view that fails on first use.
//! - Views hold no descriptor between calls. When several operations should
//!   hit the same inode, [`AttributeView::scoped`] opens one and closes it
//!   when the [`ScopedView`] is dropped.
//! - Names are validated into [`AttributeName`] values before any I/O; the
//!   operations also accept plain strings through [`ToAttributeName`].
//! - Errors follow a fixed taxonomy, [`XattrError`], classified from the
//!   raw errno in one place.
//!
//! # Features
//!
//! - `xattr` (default): the Linux backend. Without it, or off Linux, every
//!   view reports an unsupported filesystem.
//! - `tracing` (default): structured events for each operation under the
//!   `xattr_view::op` target.
//! - `serde`: `Serialize`/`Deserialize` for [`ViewOptions`], [`SetMode`],
//!   [`Namespace`] and [`AttributeName`].
//!
//! # Examples
//!
//! ```no_run
//! use xattr_view::{AttributeView, SetMode, XattrErrorKind};
//!
//! # fn main() -> Result<(), xattr_view::XattrError> {
//! let view = AttributeView::open("/srv/archive/photo.jpg")?;
//!
//! view.set("user.checksum", b"9f86d081", SetMode::CreateOnly)?;
//! let err = view
//!     .set("user.checksum", b"00000000", SetMode::CreateOnly)
//!     .unwrap_err();
//! assert_eq!(err.kind(), XattrErrorKind::AttributeAlreadyExists);
//!
//! for name in &view.list()? {
//!     println!("{name}: {} bytes", view.value_size(&name)?);
//! }
//!
//! view.remove("user.checksum")?;
//! # Ok(())
//! # }
//! ```

pub mod capability;
mod error;
mod list;
mod mode;
mod name;
mod options;
mod scoped;
mod trace;
mod value;
mod view;

#[cfg(all(any(target_os = "linux", target_os = "android"), feature = "xattr"))]
mod sys;
#[cfg(not(all(any(target_os = "linux", target_os = "android"), feature = "xattr")))]
#[path = "sys_stub.rs"]
mod sys;

pub use capability::{Capabilities, capabilities};
pub use error::{Operation, XattrError, XattrErrorKind, XattrResult};
pub use list::{AttributeList, AttributeNames, IntoAttributeNames};
pub use mode::SetMode;
pub use name::{AttributeName, NAME_MAX, Namespace, ToAttributeName};
pub use options::ViewOptions;
pub use scoped::ScopedView;
pub use value::{AttributeValue, XATTR_SIZE_MAX};
pub use view::AttributeView;
