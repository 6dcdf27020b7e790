//! Version parsing and comparison
//!
//! Release versions are plain `MAJOR.MINOR.PATCH` triples. Anything else,
//! including pre-release or build suffixes, is rejected by [`SemVer::parse`];
//! callers on the read-only check path substitute [`SemVer::SENTINEL`].

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Release version, ordered lexicographically on (major, minor, patch)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemVer(Version);

impl SemVer {
    /// `0.0.0`, the oldest possible version
    pub const SENTINEL: SemVer = SemVer(Version::new(0, 0, 0));

    /// Build a version from its components
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parse a trimmed `X.Y.Z` string
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let version = Version::parse(trimmed).map_err(|_| Error::version_format(trimmed))?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(Error::version_format(trimmed));
        }

        Ok(Self(version))
    }

    /// Parse, falling back to [`SemVer::SENTINEL`] on malformed input
    pub fn parse_or_sentinel(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|e| {
            warn!("{}; treating it as {}", e, Self::SENTINEL);
            Self::SENTINEL
        })
    }

    /// Major component
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component
    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Whether this is the sentinel version
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl FromStr for SemVer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

/// Total order between two versions
pub fn compare(a: &SemVer, b: &SemVer) -> Ordering {
    a.cmp(b)
}

/// Whether `remote` is strictly newer than `local`
pub fn is_newer(remote: &SemVer, local: &SemVer) -> bool {
    compare(remote, local) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let v = SemVer::parse("  1.0.8\n").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 0, 8));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "1", "1.2", "1.2.3.4", "a.b.c", "1.-2.3", "v1.2.3", "1.2.3-beta"] {
            let err = SemVer::parse(input).unwrap_err();
            assert!(
                matches!(err, Error::VersionFormat { .. }),
                "expected format error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_or_sentinel() {
        assert_eq!(SemVer::parse_or_sentinel("garbage"), SemVer::SENTINEL);
        assert_eq!(SemVer::parse_or_sentinel("2.1.0"), SemVer::new(2, 1, 0));
        assert!(SemVer::parse_or_sentinel("").is_sentinel());
    }

    #[test]
    fn test_display_matches_canonical_input() {
        for input in ["0.0.0", "1.0.7", "10.20.30", "3.0.112"] {
            assert_eq!(SemVer::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn test_compare_is_lexicographic() {
        let versions = [
            SemVer::new(0, 0, 0),
            SemVer::new(0, 0, 9),
            SemVer::new(0, 1, 0),
            SemVer::new(1, 0, 7),
            SemVer::new(1, 0, 8),
            SemVer::new(1, 10, 0),
            SemVer::new(2, 0, 0),
        ];

        for (i, a) in versions.iter().enumerate() {
            assert_eq!(compare(a, a), Ordering::Equal);
            for b in &versions[i + 1..] {
                assert_eq!(compare(a, b), Ordering::Less, "{} < {}", a, b);
                assert_eq!(compare(b, a), Ordering::Greater, "{} > {}", b, a);
            }
        }
    }

    #[test]
    fn test_numeric_not_textual_ordering() {
        assert!(is_newer(&SemVer::new(1, 10, 0), &SemVer::new(1, 9, 0)));
    }

    #[test]
    fn test_is_newer() {
        let local = SemVer::parse("1.0.7").unwrap();
        let remote = SemVer::parse("1.0.8").unwrap();

        assert!(is_newer(&remote, &local));
        assert!(!is_newer(&local, &remote));
        assert!(!is_newer(&local, &local));
        assert!(!is_newer(&SemVer::SENTINEL, &local));
    }
}
