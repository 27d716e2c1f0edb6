use thiserror::Error;

/// Unified error type for gitver operations
#[derive(Error, Debug)]
pub enum GitverError {
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    #[error("Working tree is not clean; commit or stash your changes first")]
    WorkingTreeDirty,

    #[error(
        "No version bump possible: latest tag '{tag}' does not correspond to the recorded version {version}"
    )]
    InconsistentTagState { tag: String, version: String },

    #[error("No bump directive found in the head commit message")]
    NoDirectiveFound,

    #[error("Malformed version string: {0}")]
    MalformedVersion(String),

    #[error("Version history error: {0}")]
    Ledger(String),

    #[error("Version file error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience type alias for Results in gitver
pub type Result<T> = std::result::Result<T, GitverError>;

impl GitverError {
    /// Create a repository-unavailable error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        GitverError::RepositoryUnavailable(msg.into())
    }

    /// Create a malformed-version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitverError::MalformedVersion(msg.into())
    }

    /// Create a ledger error with context
    pub fn ledger(msg: impl Into<String>) -> Self {
        GitverError::Ledger(msg.into())
    }

    /// Create a version file error with context
    pub fn store(msg: impl Into<String>) -> Self {
        GitverError::Store(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitverError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitverError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitverError::Remote(msg.into())
    }

    /// Create an inconsistent-tag-state error
    pub fn inconsistent_tag(tag: impl Into<String>, version: impl Into<String>) -> Self {
        GitverError::InconsistentTagState {
            tag: tag.into(),
            version: version.into(),
        }
    }
}
