//! Version string normalization and the comparable [`Version`] triple.
//!
//! Version strings reach this tool from three places that never agree on a
//! format: JAR build metadata (`build.version=release-1.180.3`), repository
//! directory names (`1.180.7`, `master.100-SNAPSHOT`) and file names. Every
//! raw string goes through the same two steps before it is compared:
//!
//! 1. [`clean`] lower-cases the string and strips the known noise tokens
//!    (`release-`, `-snapshot`, `master.`).
//! 2. [`normalize`] turns the cleaned string into an exact `major.minor.patch`
//!    triple, or `0.0.0` when the string is not purely numeric.
//!
//! `0.0.0` doubles as "unknown": an installed application whose version cannot
//! be read always compares as different from any published artifact, so a
//! first-time release is never blocked.
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_agent::version::{Version, clean, normalize};
//!
//! let version = normalize(&clean("Release-1.180"));
//! assert_eq!(version, Version::new(1, 180, 0));
//!
//! assert_eq!(normalize("not-a-version"), Version::zero());
//! ```
//!
//! # Module Organization
//!
//! - [`comparison`] - the [`VersionedEntity`] capability and free comparison
//!   functions used by the release decision

pub mod comparison;

use std::fmt;

pub use comparison::{VersionedEntity, differs, is_newer, same_version};

/// Tokens removed from raw version strings by [`clean`].
///
/// Matching happens after lower-casing, anywhere in the string.
pub const NOISE_TOKENS: [&str; 3] = ["release-", "-snapshot", "master."];

/// Number of numeric components in a normalized version.
const COMPONENTS: usize = 3;

/// A normalized `major.minor.patch` version.
///
/// Backed by [`semver::Version`] with empty pre-release and build metadata, so
/// ordering and equality reduce to the numeric triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    /// Build a version from its three components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// The `0.0.0` version used for anything that could not be determined.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Whether this is the `0.0.0` "unknown" version.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    #[must_use]
    pub const fn major(&self) -> u64 {
        self.0.major
    }

    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0.minor
    }

    #[must_use]
    pub const fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns `true` iff every `.`-separated component of `s` is a non-empty run
/// of ASCII decimal digits.
///
/// The empty string, empty components (`"1..2"`, `"1."`) and any non-digit
/// character all yield `false`.
///
/// # Examples
///
/// ```rust,no_run
/// use release_agent::version::is_numeric_dotted;
///
/// assert!(is_numeric_dotted("1.2.3.4.5.6"));
/// assert!(is_numeric_dotted("1"));
/// assert!(!is_numeric_dotted("z.1.1"));
/// assert!(!is_numeric_dotted(""));
/// ```
#[must_use]
pub fn is_numeric_dotted(s: &str) -> bool {
    s.split('.')
        .all(|component| !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit()))
}

/// Normalize a cleaned version string to an exact three-component [`Version`].
///
/// - Non-numeric input (see [`is_numeric_dotted`]) becomes `0.0.0`.
/// - Missing components are padded with zeros on the right (`"1.2"` is `1.2.0`).
/// - Components beyond the third are truncated (`"1.2.3.4"` is `1.2.3`).
/// - One of the first three components not fitting in a `u64` makes the whole
///   input `0.0.0`.
#[must_use]
pub fn normalize(s: &str) -> Version {
    if !is_numeric_dotted(s) {
        return Version::zero();
    }

    let mut parts = [0u64; COMPONENTS];
    for (slot, component) in parts.iter_mut().zip(s.split('.')) {
        match component.parse::<u64>() {
            Ok(value) => *slot = value,
            Err(_) => return Version::zero(),
        }
    }

    Version::new(parts[0], parts[1], parts[2])
}

/// Lower-case `s` and strip every occurrence of the [`NOISE_TOKENS`].
///
/// # Examples
///
/// ```rust,no_run
/// use release_agent::version::clean;
///
/// assert_eq!(clean("release-1.1.1"), "1.1.1");
/// assert_eq!(clean("master.100-SNAPSHOT"), "100");
/// ```
#[must_use]
pub fn clean(s: &str) -> String {
    NOISE_TOKENS
        .iter()
        .fold(s.to_lowercase(), |acc, token| acc.replace(token, ""))
}

/// Shorthand for `normalize(&clean(raw))`, the full pipeline applied to every
/// raw version string regardless of where it came from.
#[must_use]
pub fn parse_raw(raw: &str) -> Version {
    normalize(&clean(raw.trim()))
}
