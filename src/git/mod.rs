//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations
//! gitver needs, so the bump engine can run against a real repository or an
//! in-memory one.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for tests
//!
//! # Usage
//!
//! Code that makes decisions should depend on the [Repository] trait rather
//! than a concrete implementation.
//!
//! ```rust
//! # use gitver::git::{Repository, Revision};
//! # fn example<R: Repository>(repo: &R) -> gitver::Result<()> {
//! let latest = repo.latest_tag()?;
//! let to = latest.map(Revision::Tag);
//! let commits = repo.commits_between(&Revision::Head, to.as_ref())?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::fmt;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// A point in history a commit window can start or stop at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    Tag(String),
}

impl Revision {
    pub fn tag(name: impl Into<String>) -> Self {
        Revision::Tag(name.into())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Head => f.write_str("HEAD"),
            Revision::Tag(name) => f.write_str(name),
        }
    }
}

/// Source-control capabilities the bump engine consumes
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::GitverError]
/// variants; callers treat every failure as fatal.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): In-memory implementation for tests
pub trait Repository {
    /// The most recently created tag
    ///
    /// Recency is the tagger date for annotated tags and the committer date of
    /// the tagged commit for lightweight tags. Timestamps have one-second
    /// resolution, so a release tag and the next version tag created within
    /// the same second tie. A tie goes to the tag whose commit descends from
    /// the other's; otherwise the first tag in alphabetical order wins.
    ///
    /// # Returns
    /// * `Ok(Some(name))` - Name of the newest tag
    /// * `Ok(None)` - If the repository has no tags
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Commit messages in a window, most recent first
    ///
    /// The walk starts at `from` (included) and stops before `to`: the `to`
    /// commit and everything reachable from it are excluded. With `to = None`
    /// the walk runs to the root. A `to` tag that does not exist puts no
    /// bound on the walk.
    ///
    /// # Arguments
    /// * `from` - Newest end of the window (included)
    /// * `to` - Boundary of the window (excluded)
    ///
    /// # Returns
    /// * `Ok(Vec<CommitInfo>)` - Commits in traversal order (newest first)
    /// * `Err` - If `from` cannot be resolved or the walk fails
    fn commits_between(&self, from: &Revision, to: Option<&Revision>) -> Result<Vec<CommitInfo>>;

    /// Message of the commit HEAD points at
    fn head_commit_message(&self) -> Result<String>;

    /// Whether the working tree has no staged, unstaged or untracked changes
    fn is_working_tree_clean(&self) -> Result<bool>;

    /// Stage every change in the working tree
    fn add_all(&self) -> Result<()>;

    /// Commit the index on HEAD
    ///
    /// With `amend` the HEAD commit is replaced and keeps its own message;
    /// `message` is only used for new commits.
    fn commit(&self, message: &str, amend: bool) -> Result<()>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push the current branch and the given tags to a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    /// * `tags` - Tag names to push alongside the branch
    fn push(&self, remote: &str, tags: &[&str]) -> Result<()>;
}
