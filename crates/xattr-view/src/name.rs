//! crates/xattr-view/src/name.rs
//!
//! Namespaced extended attribute names.
//!
//! Linux scopes every attribute to one of four namespaces, written as a
//! dotted prefix: `user.`, `trusted.`, `security.`, `system.`. The kernel
//! rejects full names longer than [`NAME_MAX`] bytes with `ERANGE`;
//! [`AttributeName`] enforces the same bound up front so callers get
//! [`XattrError::InvalidName`](crate::XattrError::InvalidName) instead.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{XattrError, XattrResult};

/// Maximum length of a full attribute name in bytes (`XATTR_NAME_MAX`).
pub const NAME_MAX: usize = 255;

/// Extended attribute namespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Namespace {
    /// Unprivileged attributes governed by the file's permission bits.
    User,
    /// Attributes visible only to `CAP_SYS_ADMIN`.
    Trusted,
    /// Attributes owned by security modules (SELinux labels, capabilities).
    Security,
    /// Attributes interpreted by the kernel (POSIX ACLs).
    System,
}

impl Namespace {
    /// Every namespace, in probe order.
    pub const ALL: [Self; 4] = [Self::User, Self::Security, Self::Trusted, Self::System];

    /// Returns the bare namespace name, e.g. `user`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Trusted => "trusted",
            Self::Security => "security",
            Self::System => "system",
        }
    }

    /// Returns the dotted prefix used in full names, e.g. `user.`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::User => "user.",
            Self::Trusted => "trusted.",
            Self::Security => "security.",
            Self::System => "system.",
        }
    }

    /// Reports whether reading or writing this namespace needs elevated privilege.
    #[must_use]
    pub const fn requires_privilege(self) -> bool {
        matches!(self, Self::Trusted)
    }

    /// Splits a full name into its namespace and suffix.
    fn split(full: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|namespace| {
            full.strip_prefix(namespace.prefix())
                .map(|suffix| (namespace, suffix))
        })
    }

    /// Sentinel attribute used for non-mutating support probes.
    pub(crate) fn probe_name(self) -> AttributeName {
        AttributeName {
            full: format!("{}xattr-view.probe", self.prefix()),
            namespace: self,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = XattrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|namespace| namespace.as_str() == s)
            .ok_or_else(|| XattrError::invalid_name(s, "unknown namespace"))
    }
}

/// A validated, namespaced extended attribute name such as `user.mime_type`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct AttributeName {
    full: String,
    namespace: Namespace,
}

impl AttributeName {
    /// Builds a name from a namespace and the part after the dot.
    pub fn new(namespace: Namespace, suffix: &str) -> XattrResult<Self> {
        Self::parse(&format!("{}{suffix}", namespace.prefix()))
    }

    /// Builds a `user.` name, the namespace unprivileged callers can always write.
    pub fn user(suffix: &str) -> XattrResult<Self> {
        Self::new(Namespace::User, suffix)
    }

    /// Parses and validates a full name such as `security.selinux`.
    pub fn parse(full: &str) -> XattrResult<Self> {
        if full.is_empty() {
            return Err(XattrError::invalid_name(full, "name is empty"));
        }
        if full.as_bytes().contains(&0) {
            return Err(XattrError::invalid_name(
                full.replace('\0', "\\0"),
                "name contains a NUL byte",
            ));
        }
        if full.len() > NAME_MAX {
            return Err(XattrError::invalid_name(
                full,
                "name is longer than 255 bytes",
            ));
        }
        let Some((namespace, suffix)) = Namespace::split(full) else {
            return Err(XattrError::invalid_name(full, "missing namespace prefix"));
        };
        if suffix.is_empty() {
            return Err(XattrError::invalid_name(full, "name has no part after the namespace"));
        }
        Ok(Self {
            full: full.to_owned(),
            namespace,
        })
    }

    /// Parses a raw name as returned by `listxattr(2)`.
    pub(crate) fn from_os(raw: &OsStr) -> XattrResult<Self> {
        raw.to_str().map_or_else(
            || {
                Err(XattrError::invalid_name(
                    raw.to_string_lossy(),
                    "name is not valid UTF-8",
                ))
            },
            Self::parse,
        )
    }

    /// Returns the namespace this name belongs to.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the full dotted name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Returns the part after the namespace prefix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.full[self.namespace.prefix().len()..]
    }

    /// Returns the name in the form the OS interface takes.
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        OsStr::new(&self.full)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for AttributeName {
    type Err = XattrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AttributeName {
    type Error = XattrError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for AttributeName {
    type Error = XattrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AttributeName> for String {
    fn from(name: AttributeName) -> Self {
        name.full
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

impl AsRef<OsStr> for AttributeName {
    fn as_ref(&self) -> &OsStr {
        self.as_os_str()
    }
}

/// Anything view operations accept as an attribute name.
///
/// Implemented for [`AttributeName`] (borrowed as is) and for string types,
/// which are parsed and validated on each call.
pub trait ToAttributeName {
    /// Converts `self` into a validated name.
    fn to_attribute_name(&self) -> XattrResult<Cow<'_, AttributeName>>;
}

impl ToAttributeName for AttributeName {
    fn to_attribute_name(&self) -> XattrResult<Cow<'_, AttributeName>> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToAttributeName for str {
    fn to_attribute_name(&self) -> XattrResult<Cow<'_, AttributeName>> {
        AttributeName::parse(self).map(Cow::Owned)
    }
}

impl ToAttributeName for String {
    fn to_attribute_name(&self) -> XattrResult<Cow<'_, AttributeName>> {
        self.as_str().to_attribute_name()
    }
}

impl<T: ToAttributeName + ?Sized> ToAttributeName for &T {
    fn to_attribute_name(&self) -> XattrResult<Cow<'_, AttributeName>> {
        (**self).to_attribute_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XattrErrorKind;

    fn reason(result: XattrResult<AttributeName>) -> &'static str {
        match result {
            Err(XattrError::InvalidName { reason, .. }) => reason,
            other => panic!("expected invalid name, got {other:?}"),
        }
    }

    #[test]
    fn parses_each_namespace() {
        for (full, namespace, suffix) in [
            ("user.tag", Namespace::User, "tag"),
            ("trusted.overlay.opaque", Namespace::Trusted, "overlay.opaque"),
            ("security.selinux", Namespace::Security, "selinux"),
            ("system.posix_acl_access", Namespace::System, "posix_acl_access"),
        ] {
            let name = AttributeName::parse(full).expect("valid name");
            assert_eq!(name.namespace(), namespace);
            assert_eq!(name.suffix(), suffix);
            assert_eq!(name.as_str(), full);
            assert_eq!(name.to_string(), full);
        }
    }

    #[test]
    fn user_shorthand_applies_prefix() {
        let name = AttributeName::user("mime_type").expect("valid name");
        assert_eq!(name.as_str(), "user.mime_type");
        assert_eq!(name.namespace(), Namespace::User);
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(reason(AttributeName::parse("")), "name is empty");
    }

    #[test]
    fn rejects_unknown_namespace() {
        assert_eq!(
            reason(AttributeName::parse("com.apple.quarantine")),
            "missing namespace prefix"
        );
        assert_eq!(reason(AttributeName::parse("tag")), "missing namespace prefix");
    }

    #[test]
    fn rejects_bare_prefix() {
        assert_eq!(
            reason(AttributeName::parse("user.")),
            "name has no part after the namespace"
        );
        assert_eq!(
            reason(AttributeName::user("")),
            "name has no part after the namespace"
        );
    }

    #[test]
    fn rejects_interior_nul() {
        assert_eq!(
            reason(AttributeName::parse("user.a\0b")),
            "name contains a NUL byte"
        );
    }

    #[test]
    fn enforces_length_limit_on_full_name() {
        let at_limit = format!("user.{}", "a".repeat(NAME_MAX - "user.".len()));
        assert!(AttributeName::parse(&at_limit).is_ok());

        let over_limit = format!("user.{}", "a".repeat(NAME_MAX - "user.".len() + 1));
        assert_eq!(
            reason(AttributeName::parse(&over_limit)),
            "name is longer than 255 bytes"
        );
    }

    #[test]
    fn namespace_parses_from_bare_name() {
        assert_eq!("security".parse::<Namespace>().ok(), Some(Namespace::Security));
        let error = "apple".parse::<Namespace>().expect_err("unknown namespace");
        assert_eq!(error.kind(), XattrErrorKind::InvalidName);
    }

    #[test]
    fn only_trusted_requires_privilege() {
        let privileged: Vec<_> = Namespace::ALL
            .into_iter()
            .filter(|namespace| namespace.requires_privilege())
            .collect();
        assert_eq!(privileged, vec![Namespace::Trusted]);
    }

    #[test]
    fn string_types_convert_through_trait() {
        let parsed = "user.tag".to_attribute_name().expect("valid");
        assert!(matches!(parsed, Cow::Owned(_)));

        let owned = AttributeName::user("tag").expect("valid");
        let borrowed = owned.to_attribute_name().expect("valid");
        assert!(matches!(borrowed, Cow::Borrowed(_)));

        let error = String::from("bogus").to_attribute_name().expect_err("invalid");
        assert_eq!(error.kind(), XattrErrorKind::InvalidName);
    }

    #[test]
    fn probe_names_live_in_their_namespace() {
        for namespace in Namespace::ALL {
            let probe = namespace.probe_name();
            assert_eq!(probe.namespace(), namespace);
            assert_eq!(
                AttributeName::parse(probe.as_str()).expect("probe name is valid"),
                probe
            );
        }
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_round_trips_through_string() {
        let name = AttributeName::user("tag").expect("valid");
        let json = serde_json::to_string(&name).expect("serialize");
        assert_eq!(json, "\"user.tag\"");
        let invalid = serde_json::from_str::<AttributeName>("\"tag\"");
        assert!(invalid.is_err());
    }
}
