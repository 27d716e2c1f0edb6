use crate::analyzer::{BumpRules, CommitMarkers, DirectiveMarkers};
use crate::domain::{SemanticVersion, TagFormats, TagPattern};
use crate::error::{GitverError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-project directory holding the version file and config
pub const PROJECT_DIR_NAME: &str = ".gitver";
/// Version file inside [`PROJECT_DIR_NAME`]
pub const VERSION_FILE_NAME: &str = ".version";
/// Config file inside [`PROJECT_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Represents the complete configuration for gitver.
///
/// Contains the initial version, commit and directive markers, and the
/// settings used when committing, tagging and pushing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub markers: MarkersConfig,

    #[serde(default)]
    pub directives: DirectivesConfig,

    #[serde(default)]
    pub vcs: VcsConfig,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Settings used when a project is initialised
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultConfig {
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        DefaultConfig {
            version: default_version(),
        }
    }
}

fn default_breaking_marker() -> String {
    CommitMarkers::default().breaking
}

fn default_feature_marker() -> String {
    CommitMarkers::default().feature
}

fn default_fix_marker() -> String {
    CommitMarkers::default().fix
}

/// Substrings that classify a commit message.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarkersConfig {
    #[serde(default = "default_breaking_marker")]
    pub breaking: String,

    #[serde(default = "default_feature_marker")]
    pub feature: String,

    #[serde(default = "default_fix_marker")]
    pub fix: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        MarkersConfig {
            breaking: default_breaking_marker(),
            feature: default_feature_marker(),
            fix: default_fix_marker(),
        }
    }
}

impl From<&MarkersConfig> for CommitMarkers {
    fn from(config: &MarkersConfig) -> Self {
        CommitMarkers {
            breaking: config.breaking.clone(),
            feature: config.feature.clone(),
            fix: config.fix.clone(),
        }
    }
}

fn default_major_directive() -> String {
    DirectiveMarkers::default().major
}

fn default_minor_directive() -> String {
    DirectiveMarkers::default().minor
}

fn default_patch_directive() -> String {
    DirectiveMarkers::default().patch
}

fn default_auto_directive() -> String {
    DirectiveMarkers::default().auto
}

/// Markers looked for in the HEAD commit by `bump --commit`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DirectivesConfig {
    #[serde(default = "default_major_directive")]
    pub major: String,

    #[serde(default = "default_minor_directive")]
    pub minor: String,

    #[serde(default = "default_patch_directive")]
    pub patch: String,

    #[serde(default = "default_auto_directive")]
    pub auto: String,
}

impl Default for DirectivesConfig {
    fn default() -> Self {
        DirectivesConfig {
            major: default_major_directive(),
            minor: default_minor_directive(),
            patch: default_patch_directive(),
            auto: default_auto_directive(),
        }
    }
}

impl From<&DirectivesConfig> for DirectiveMarkers {
    fn from(config: &DirectivesConfig) -> Self {
        DirectiveMarkers {
            major: config.major.clone(),
            minor: config.minor.clone(),
            patch: config.patch.clone(),
            auto: config.auto.clone(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "Bump Version [{previous}] -> [{current}]".to_string()
}

fn default_tag_message() -> String {
    "Tagged by gitver".to_string()
}

fn default_version_tag() -> String {
    "v{version}".to_string()
}

fn default_release_tag() -> String {
    "r{version}".to_string()
}

/// Settings for the commits, tags and pushes gitver performs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VcsConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Message of the bump commit; `{previous}` and `{current}` are substituted
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    #[serde(default = "default_version_tag")]
    pub version_tag: String,

    #[serde(default = "default_release_tag")]
    pub release_tag: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            remote: default_remote(),
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
            version_tag: default_version_tag(),
            release_tag: default_release_tag(),
        }
    }
}

impl VcsConfig {
    /// Render the bump commit message
    pub fn render_commit_message(
        &self,
        previous: &SemanticVersion,
        current: &SemanticVersion,
    ) -> String {
        self.commit_message
            .replace("{previous}", &previous.to_string())
            .replace("{current}", &current.to_string())
    }
}

impl Config {
    /// Check the values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        SemanticVersion::parse(&self.default.version).map_err(|e| {
            GitverError::config(format!("[default] version is invalid: {}", e))
        })?;

        TagPattern::new(self.vcs.version_tag.as_str())?;
        TagPattern::new(self.vcs.release_tag.as_str())?;

        if self.vcs.version_tag == self.vcs.release_tag {
            return Err(GitverError::config(
                "version_tag and release_tag must differ",
            ));
        }

        let markers = [
            ("markers.breaking", &self.markers.breaking),
            ("markers.feature", &self.markers.feature),
            ("markers.fix", &self.markers.fix),
            ("directives.major", &self.directives.major),
            ("directives.minor", &self.directives.minor),
            ("directives.patch", &self.directives.patch),
            ("directives.auto", &self.directives.auto),
        ];
        if let Some((key, _)) = markers.iter().find(|(_, value)| value.is_empty()) {
            return Err(GitverError::config(format!("{} must not be empty", key)));
        }

        if self.vcs.remote.is_empty() {
            return Err(GitverError::config("vcs.remote must not be empty"));
        }

        Ok(())
    }

    pub fn default_version(&self) -> Result<SemanticVersion> {
        SemanticVersion::parse(&self.default.version)
    }

    pub fn tag_formats(&self) -> Result<TagFormats> {
        TagFormats::new(&self.vcs.version_tag, &self.vcs.release_tag)
    }

    /// The rule set handed to the bump engine
    pub fn bump_rules(&self) -> Result<BumpRules> {
        Ok(BumpRules::new(
            CommitMarkers::from(&self.markers),
            DirectiveMarkers::from(&self.directives),
            self.tag_formats()?,
        ))
    }
}

/// Contents written to `.gitver/config.toml` by `gitver init`
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&Config::default())
        .map_err(|e| GitverError::config(format!("cannot render default config: {}", e)))
}

/// Write the default config into `<project>/.gitver/config.toml` unless one exists.
///
/// Returns whether a file was written.
pub fn write_default_config(project_dir: &Path) -> Result<bool> {
    let path = project_config_path(project_dir);
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, default_config_toml()?)?;
    Ok(true)
}

/// Walk up from `start` to the first directory holding a `.gitver` directory.
///
/// Falls back to `start` itself when no ancestor has one.
pub fn find_project_dir(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR_NAME).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

pub fn version_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_DIR_NAME).join(VERSION_FILE_NAME)
}

pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.gitver/config.toml` in the project directory
/// 3. `gitver/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_dir` - Project root as returned by [`find_project_dir`]
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated, or default, configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if project_config_path(project_dir).exists() {
        Some(project_config_path(project_dir))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join("gitver").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    };

    let Some(path) = path else {
        debug!("no config file found; using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        GitverError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GitverError::config(format!("{}: {}", path.display(), e)))?;
    config.validate()?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
