use crate::domain::SemanticVersion;
use crate::error::{GitverError, Result};
use regex::Regex;

const PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "r{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a new tag pattern
    ///
    /// The pattern must contain the `{version}` placeholder exactly once.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();

        if pattern.matches(PLACEHOLDER).count() != 1 {
            return Err(GitverError::config(format!(
                "Tag pattern '{}' must contain {} exactly once",
                pattern, PLACEHOLDER
            )));
        }

        // Escape everything, then swap the escaped placeholder for a capture group
        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| GitverError::config(format!("Invalid tag pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    /// The raw pattern string
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }

    /// Validate if a tag matches this pattern
    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }

    /// Extract the version a tag of this pattern refers to
    pub fn version_of(&self, tag: &str) -> Option<SemanticVersion> {
        let captures = self.matcher.captures(tag)?;
        SemanticVersion::parse(captures.get(1)?.as_str()).ok()
    }
}

/// The two tag families gitver writes: one on bump commits, one on releases.
#[derive(Debug, Clone)]
pub struct TagFormats {
    pub version: TagPattern,
    pub release: TagPattern,
}

impl TagFormats {
    /// Build both families from their pattern strings
    pub fn new(version: &str, release: &str) -> Result<Self> {
        Ok(TagFormats {
            version: TagPattern::new(version)?,
            release: TagPattern::new(release)?,
        })
    }

    /// Tag placed on the commit that performed the bump to `version`
    pub fn version_tag(&self, version: &SemanticVersion) -> String {
        self.version.format(version)
    }

    /// Tag marking the publication of `version`
    pub fn release_tag(&self, version: &SemanticVersion) -> String {
        self.release.format(version)
    }

    /// Describe which family a tag belongs to, for diagnostics
    pub fn describe(&self, tag: &str) -> String {
        if let Some(version) = self.release.version_of(tag) {
            format!("release tag for {}", version)
        } else if let Some(version) = self.version.version_of(tag) {
            format!("version tag for {}", version)
        } else {
            "tag outside both naming families".to_string()
        }
    }
}
