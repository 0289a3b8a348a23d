//! Comparison of anything that carries a [`Version`].
//!
//! The release decision compares two very different things (a JAR on disk and
//! a directory in a remote repository). Both implement [`VersionedEntity`], and
//! the free functions in this module compare them purely by their normalized
//! version. No other field takes part in ordering or equality.

use super::Version;

/// Something whose version can be derived and compared.
///
/// Implementations may compute the version on every call (the installed
/// application re-reads its archive each time), so callers should bind the
/// result when they need it more than once.
pub trait VersionedEntity {
    /// The normalized version of this entity. Never fails; unknown is `0.0.0`.
    fn version(&self) -> Version;
}

impl VersionedEntity for Version {
    fn version(&self) -> Version {
        self.clone()
    }
}

/// `true` when `a` is strictly newer than `b`.
pub fn is_newer<A, B>(a: &A, b: &B) -> bool
where
    A: VersionedEntity + ?Sized,
    B: VersionedEntity + ?Sized,
{
    a.version() > b.version()
}

/// `true` when both sides have the same normalized version.
///
/// An absent counterpart is never equal.
pub fn same_version<A, B>(a: &A, b: Option<&B>) -> bool
where
    A: VersionedEntity + ?Sized,
    B: VersionedEntity + ?Sized,
{
    b.is_some_and(|other| a.version() == other.version())
}

/// `true` when the versions differ. An absent counterpart always differs.
pub fn differs<A, B>(a: &A, b: Option<&B>) -> bool
where
    A: VersionedEntity + ?Sized,
    B: VersionedEntity + ?Sized,
{
    !same_version(a, b)
}
