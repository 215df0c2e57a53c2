use crate::error::{MreleaserError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation (`MAJOR.MINOR.PATCH`)
///
/// Field order drives the derived ordering, which matches semver precedence
/// for release versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemVer {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release version, accepting an optional `v`/`V` prefix.
    ///
    /// Pre-release and build metadata are rejected: only plain release
    /// versions count as version tags.
    pub fn parse(text: &str) -> Result<Self> {
        let clean = text.strip_prefix(['v', 'V']).unwrap_or(text);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            MreleaserError::version(format!("Invalid version '{}': {}", text, e))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(MreleaserError::version(format!(
                "'{}' is not a release version",
                text
            )));
        }

        Ok(SemVer::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Bump version according to bump type
    ///
    /// Fails when the bumped component would overflow.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow =
            || MreleaserError::version(format!("Cannot apply {} bump to {}", bump_type, self));

        Ok(match bump_type {
            VersionBump::Major => {
                SemVer::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => {
                SemVer::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            VersionBump::Patch => SemVer::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }
}

impl FromStr for SemVer {
    type Err = MreleaserError;

    fn from_str(s: &str) -> Result<Self> {
        SemVer::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
///
/// Variants are ordered by magnitude so the largest bump can be picked with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}
