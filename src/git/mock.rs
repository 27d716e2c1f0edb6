use crate::error::{GitverError, Result};
use crate::git::{CommitInfo, Repository, Revision};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone)]
struct MockTag {
    name: String,
    commit: usize,
    created_at: i64,
    message: Option<String>,
}

/// In-memory repository for testing without actual git operations
///
/// History is a single straight line of commits; HEAD is always the last
/// one. Mutating operations (`commit`, `create_tag`, `push`) take `&self`
/// like the real implementation and are recorded for inspection.
#[derive(Debug, Default)]
pub struct MockRepository {
    commits: RefCell<Vec<CommitInfo>>,
    tags: RefCell<Vec<MockTag>>,
    clock: Cell<i64>,
    dirty: Cell<bool>,
    pushes: RefCell<Vec<(String, Vec<String>)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from commit messages, oldest first
    pub fn with_history<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::new();
        for message in messages {
            repo.add_commit(message);
        }
        repo
    }

    /// Append a commit on top of HEAD and return its position
    pub fn add_commit(&self, message: impl Into<String>) -> usize {
        let mut commits = self.commits.borrow_mut();
        let position = commits.len();
        commits.push(CommitInfo {
            hash: format!("{:040x}", position + 1),
            message: message.into(),
            author: "Mock Author".to_string(),
        });
        position
    }

    /// Tag the current HEAD; later calls count as newer tags
    pub fn add_tag(&self, name: impl Into<String>) {
        let head = self.head_position().unwrap_or(0);
        let created_at = self.tick();
        self.add_tag_at(name, head, created_at);
    }

    /// Tag an arbitrary commit with an explicit creation time
    pub fn add_tag_at(&self, name: impl Into<String>, commit: usize, created_at: i64) {
        self.tags.borrow_mut().push(MockTag {
            name: name.into(),
            commit,
            created_at,
            message: None,
        });
        if created_at > self.clock.get() {
            self.clock.set(created_at);
        }
    }

    /// Mark the working tree as having uncommitted changes
    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
    }

    /// Messages of every commit, oldest first
    pub fn commit_messages(&self) -> Vec<String> {
        self.commits
            .borrow()
            .iter()
            .map(|c| c.message.clone())
            .collect()
    }

    /// Names of every tag in creation order
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.borrow().iter().map(|t| t.name.clone()).collect()
    }

    /// Annotation message of a tag created through [`Repository::create_tag`]
    pub fn tag_message(&self, name: &str) -> Option<String> {
        self.tags
            .borrow()
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.message.clone())
    }

    /// Every push performed, as (remote, tags)
    pub fn pushes(&self) -> Vec<(String, Vec<String>)> {
        self.pushes.borrow().clone()
    }

    fn tick(&self) -> i64 {
        let next = self.clock.get() + 1;
        self.clock.set(next);
        next
    }

    fn head_position(&self) -> Option<usize> {
        self.commits.borrow().len().checked_sub(1)
    }

    fn tag_position(&self, name: &str) -> Option<usize> {
        self.tags
            .borrow()
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.commit)
    }
}

impl Repository for MockRepository {
    fn latest_tag(&self) -> Result<Option<String>> {
        let tags = self.tags.borrow();
        let mut ordered: Vec<&MockTag> = tags.iter().collect();
        ordered.sort_by(|a, b| a.name.cmp(&b.name));

        let mut newest: Option<&MockTag> = None;
        for tag in ordered {
            let newer = newest.map_or(true, |n| {
                tag.created_at > n.created_at
                    || (tag.created_at == n.created_at && tag.commit > n.commit)
            });
            if newer {
                newest = Some(tag);
            }
        }

        Ok(newest.map(|t| t.name.clone()))
    }

    fn commits_between(&self, from: &Revision, to: Option<&Revision>) -> Result<Vec<CommitInfo>> {
        let from_position = match from {
            Revision::Head => self
                .head_position()
                .ok_or_else(|| GitverError::tag("HEAD does not point at a commit"))?,
            Revision::Tag(name) => self
                .tag_position(name)
                .ok_or_else(|| GitverError::tag(format!("Tag '{}' does not exist", name)))?,
        };

        // Everything at or below the boundary is excluded
        let start = match to {
            Some(Revision::Head) => self.head_position().map_or(0, |p| p + 1),
            Some(Revision::Tag(name)) => self.tag_position(name).map_or(0, |p| p + 1),
            None => 0,
        };

        if start > from_position {
            return Ok(Vec::new());
        }

        let commits = self.commits.borrow();
        Ok(commits[start..=from_position].iter().rev().cloned().collect())
    }

    fn head_commit_message(&self) -> Result<String> {
        let commits = self.commits.borrow();
        commits
            .last()
            .map(|c| c.message.clone())
            .ok_or_else(|| GitverError::tag("HEAD does not point at a commit"))
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(!self.dirty.get())
    }

    fn add_all(&self) -> Result<()> {
        Ok(())
    }

    fn commit(&self, message: &str, amend: bool) -> Result<()> {
        if amend {
            // The amended commit keeps its message and position
            if self.head_position().is_none() {
                return Err(GitverError::tag("nothing to amend"));
            }
        } else {
            self.add_commit(message);
        }

        self.dirty.set(false);
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tag_position(name).is_some())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(GitverError::tag(format!("Tag '{}' already exists", name)));
        }

        let head = self
            .head_position()
            .ok_or_else(|| GitverError::tag("HEAD does not point at a commit"))?;
        let created_at = self.tick();

        self.tags.borrow_mut().push(MockTag {
            name: name.to_string(),
            commit: head,
            created_at,
            message: Some(message.to_string()),
        });
        Ok(())
    }

    fn push(&self, remote: &str, tags: &[&str]) -> Result<()> {
        self.pushes.borrow_mut().push((
            remote.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(commits: &[CommitInfo]) -> Vec<&str> {
        commits.iter().map(|c| c.message.as_str()).collect()
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert_eq!(repo.latest_tag().unwrap(), None);
        assert!(repo.head_commit_message().is_err());
        assert!(repo.is_working_tree_clean().unwrap());
    }

    #[test]
    fn test_commits_from_head_to_root_newest_first() {
        let repo = MockRepository::with_history(["init", "feat: x"]);
        let commits = repo.commits_between(&Revision::Head, None).unwrap();
        assert_eq!(messages(&commits), vec!["feat: x", "init"]);
    }

    #[test]
    fn test_commits_exclude_boundary_tag() {
        let repo = MockRepository::with_history(["init", "feat: a"]);
        repo.add_tag("v1.0.0");
        repo.add_commit("fix: b");
        repo.add_commit("docs: c");

        let commits = repo
            .commits_between(&Revision::Head, Some(&Revision::tag("v1.0.0")))
            .unwrap();
        assert_eq!(messages(&commits), vec!["docs: c", "fix: b"]);
    }

    #[test]
    fn test_commits_between_two_tags() {
        let repo = MockRepository::with_history(["init"]);
        repo.add_tag("r0.9.0");
        repo.add_commit("feat: a");
        repo.add_commit("bump");
        repo.add_tag("v1.0.0");

        let commits = repo
            .commits_between(&Revision::tag("v1.0.0"), Some(&Revision::tag("r0.9.0")))
            .unwrap();
        assert_eq!(messages(&commits), vec!["bump", "feat: a"]);
    }

    #[test]
    fn test_missing_boundary_walks_to_root() {
        let repo = MockRepository::with_history(["init", "fix: a"]);
        let commits = repo
            .commits_between(&Revision::Head, Some(&Revision::tag("r0.0.0")))
            .unwrap();
        assert_eq!(commits.len(), 2);
    }

    #[test]
    fn test_missing_start_tag_is_an_error() {
        let repo = MockRepository::with_history(["init"]);
        assert!(repo
            .commits_between(&Revision::tag("v1.0.0"), None)
            .is_err());
    }

    #[test]
    fn test_latest_tag_by_creation_time() {
        let repo = MockRepository::with_history(["init", "more"]);
        repo.add_tag_at("v2.0.0", 1, 10);
        repo.add_tag_at("r1.0.0", 0, 20);

        assert_eq!(repo.latest_tag().unwrap(), Some("r1.0.0".to_string()));
    }

    #[test]
    fn test_latest_tag_tie_goes_to_first_alphabetically() {
        let repo = MockRepository::with_history(["init"]);
        repo.add_tag_at("v1.0.0", 0, 5);
        repo.add_tag_at("r1.0.0", 0, 5);

        assert_eq!(repo.latest_tag().unwrap(), Some("r1.0.0".to_string()));
    }

    #[test]
    fn test_latest_tag_tie_goes_to_later_commit() {
        let repo = MockRepository::with_history(["init", "Bump Version [0.1.0] -> [0.1.1]"]);
        repo.add_tag_at("v0.1.1", 1, 5);
        repo.add_tag_at("r0.1.0", 0, 5);

        assert_eq!(repo.latest_tag().unwrap(), Some("v0.1.1".to_string()));
    }

    #[test]
    fn test_commit_and_tag_are_recorded() {
        let repo = MockRepository::with_history(["init"]);
        repo.set_dirty(true);
        repo.add_all().unwrap();
        repo.commit("Bump Version [0.0.0] -> [0.1.0]", false).unwrap();
        repo.create_tag("v0.1.0", "Tagged by gitver").unwrap();

        assert!(repo.is_working_tree_clean().unwrap());
        assert_eq!(
            repo.head_commit_message().unwrap(),
            "Bump Version [0.0.0] -> [0.1.0]"
        );
        assert_eq!(repo.latest_tag().unwrap(), Some("v0.1.0".to_string()));
        assert_eq!(
            repo.tag_message("v0.1.0"),
            Some("Tagged by gitver".to_string())
        );
        assert!(repo.tag_exists("v0.1.0").unwrap());
        assert!(!repo.tag_exists("r0.1.0").unwrap());
        assert!(repo.create_tag("v0.1.0", "again").is_err());
    }

    #[test]
    fn test_amend_keeps_history_length() {
        let repo = MockRepository::with_history(["feat: x [bump]"]);
        repo.commit("ignored", true).unwrap();
        assert_eq!(repo.commit_messages(), vec!["feat: x [bump]"]);
    }

    #[test]
    fn test_push_is_recorded() {
        let repo = MockRepository::with_history(["init"]);
        repo.push("origin", &["v0.1.0"]).unwrap();
        assert_eq!(
            repo.pushes(),
            vec![("origin".to_string(), vec!["v0.1.0".to_string()])]
        );
    }
}
