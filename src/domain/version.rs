use crate::error::{GitverError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Ordering is lexicographic over (major, minor, patch), which is what the
/// derived `Ord` gives us from the field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemanticVersion {
    #[serde(rename = "Major")]
    pub major: u32,
    #[serde(rename = "Minor")]
    pub minor: u32,
    #[serde(rename = "Patch")]
    pub patch: u32,
}

impl SemanticVersion {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse a plain `X.Y.Z` version string.
    ///
    /// Pre-release and build suffixes are rejected: the version history only
    /// ever records release triples.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = semver::Version::parse(input.trim()).map_err(|e| {
            GitverError::version(format!("'{}' is not a X.Y.Z version: {}", input, e))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(GitverError::version(format!(
                "'{}' carries a pre-release or build suffix",
                input
            )));
        }

        let component = |value: u64, name: &str| {
            u32::try_from(value).map_err(|_| {
                GitverError::version(format!("{} component of '{}' is too large", name, input))
            })
        };

        Ok(SemanticVersion {
            major: component(parsed.major, "major")?,
            minor: component(parsed.minor, "minor")?,
            patch: component(parsed.patch, "patch")?,
        })
    }

    /// Bump version according to bump type
    ///
    /// Returns an error instead of wrapping when a component is already at
    /// `u32::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || GitverError::ledger(format!("cannot {} bump {}", bump_type, self));

        let bumped = match bump_type {
            VersionBump::Major => SemanticVersion {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => SemanticVersion {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => SemanticVersion {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };

        Ok(bumped)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = GitverError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}
