use crate::error::{GitverError, Result};
use crate::git::{CommitInfo, Revision};
use git2::{Commit, ErrorCode, Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            GitverError::repository(format!(
                "no git repository at or above {}: {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit(&self) -> Result<Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }

    /// Resolve a tag name to the commit it marks, if the tag exists
    fn find_tag_commit(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let commit = reference.peel_to_commit().map_err(|e| {
                    GitverError::tag(format!("Cannot peel tag '{}': {}", tag_name, e))
                })?;
                Ok(Some(commit.id()))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitverError::tag(format!(
                "Cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    /// Seconds since the epoch a tag counts as created at, with its commit
    fn tag_time(&self, tag_name: &str) -> Option<(i64, Oid)> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .ok()?;
        let target = reference.target()?;
        let commit = reference.peel_to_commit().ok()?;

        if let Ok(tag) = self.repo.find_tag(target) {
            if let Some(tagger) = tag.tagger() {
                return Some((tagger.when().seconds(), commit.id()));
            }
        }

        // Lightweight tag, or an annotated one without a tagger
        let seconds = commit.committer().when().seconds();
        Some((seconds, commit.id()))
    }

    fn credentials_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
        let mut callbacks = git2::RemoteCallbacks::new();

        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn latest_tag(&self) -> Result<Option<String>> {
        let tag_names = self.repo.tag_names(None)?;
        let mut names: Vec<&str> = tag_names.iter().flatten().collect();
        names.sort_unstable();

        let mut newest: Option<(i64, Oid, &str)> = None;
        for name in names {
            let Some((when, commit)) = self.tag_time(name) else {
                debug!(tag = name, "skipping tag that does not point at a commit");
                continue;
            };

            let newer = match newest {
                None => true,
                Some((seconds, _, _)) if when != seconds => when > seconds,
                // Same second: the tag further along the history wins
                Some((_, other, _)) => {
                    commit != other && self.repo.graph_descendant_of(commit, other)?
                }
            };
            if newer {
                newest = Some((when, commit, name));
            }
        }

        Ok(newest.map(|(_, _, name)| name.to_string()))
    }

    fn commits_between(&self, from: &Revision, to: Option<&Revision>) -> Result<Vec<CommitInfo>> {
        let from_oid = match from {
            Revision::Head => self.head_commit()?.id(),
            Revision::Tag(name) => self
                .find_tag_commit(name)?
                .ok_or_else(|| GitverError::tag(format!("Tag '{}' does not exist", name)))?,
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(from_oid)?;

        match to {
            Some(Revision::Head) => revwalk.hide(self.head_commit()?.id())?,
            Some(Revision::Tag(name)) => match self.find_tag_commit(name)? {
                Some(oid) => revwalk.hide(oid)?,
                None => warn!(tag = %name, "boundary tag not found; walking to the first commit"),
            },
            None => {}
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        debug!(%from, to = ?to.map(|r| r.to_string()), count = commits.len(), "collected commit window");
        Ok(commits)
    }

    fn head_commit_message(&self) -> Result<String> {
        let commit = self.head_commit()?;
        Ok(String::from_utf8_lossy(commit.message_bytes()).into_owned())
    }

    fn is_working_tree_clean(&self) -> Result<bool> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn add_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        // picks up deletions, which add_all leaves alone
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str, amend: bool) -> Result<()> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        if amend {
            let head = self.head_commit()?;
            head.amend(Some("HEAD"), None, Some(&signature), None, None, Some(&tree))?;
            return Ok(());
        }

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitverError::tag(format!("Cannot find tag '{}': {}", name, e))),
        }
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let signature = self.repo.signature()?;
        let head = self.head_commit()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| GitverError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push(&self, remote: &str, tags: &[&str]) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitverError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(GitverError::remote("HEAD is detached; no branch to push"));
        }
        let branch = head
            .name()
            .ok_or_else(|| GitverError::remote("Branch name is not valid UTF-8"))?
            .to_string();

        let mut refspecs = vec![format!("{}:{}", branch, branch)];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag)));
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::credentials_callbacks());

        remote_handle
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    GitverError::remote(format!("Network error during push: {}", e))
                } else {
                    GitverError::remote(format!("Push to '{}' failed: {}", remote, e))
                }
            })?;

        Ok(())
    }
}
