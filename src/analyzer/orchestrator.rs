use crate::analyzer::classifier::{CommitClassifier, CommitMarkers};
use crate::analyzer::range::{self, AnalysisPlan, Window};
use crate::domain::{CommitPriority, TagFormats, VersionBump};
use crate::error::{GitverError, Result};
use crate::git::Repository;
use crate::ledger::{HistoryEntry, LedgerStore, VersionLedger};
use std::fmt;
use tracing::{debug, info};

/// How the next bump is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpMode {
    /// Derive the bump from commit messages since the last tag
    Automatic,
    /// Take the bump from a marker in the HEAD commit message
    Directive,
}

/// Outcome of [`BumpOrchestrator::decide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpDecision {
    Bump(VersionBump),
    NoBumpRequired,
}

impl BumpDecision {
    fn from_priority(priority: CommitPriority) -> Self {
        match priority.to_bump() {
            Some(bump) => BumpDecision::Bump(bump),
            None => BumpDecision::NoBumpRequired,
        }
    }

    pub fn bump(&self) -> Option<VersionBump> {
        match self {
            BumpDecision::Bump(bump) => Some(*bump),
            BumpDecision::NoBumpRequired => None,
        }
    }
}

impl fmt::Display for BumpDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpDecision::Bump(bump) => write!(f, "{} bump", bump),
            BumpDecision::NoBumpRequired => f.write_str("no bump required"),
        }
    }
}

/// Markers recognised in the HEAD commit message by directive mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMarkers {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub auto: String,
}

impl Default for DirectiveMarkers {
    fn default() -> Self {
        DirectiveMarkers {
            major: "[bump major]".to_string(),
            minor: "[bump minor]".to_string(),
            patch: "[bump patch]".to_string(),
            auto: "[bump]".to_string(),
        }
    }
}

/// What a HEAD commit message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Bump(VersionBump),
    Automatic,
}

impl DirectiveMarkers {
    /// Find the directive in `message`; explicit levels win over the bare marker
    pub fn parse(&self, message: &str) -> Option<Directive> {
        if message.contains(&self.major) {
            Some(Directive::Bump(VersionBump::Major))
        } else if message.contains(&self.minor) {
            Some(Directive::Bump(VersionBump::Minor))
        } else if message.contains(&self.patch) {
            Some(Directive::Bump(VersionBump::Patch))
        } else if message.contains(&self.auto) {
            Some(Directive::Automatic)
        } else {
            None
        }
    }
}

/// Everything configurable about how a bump is decided
#[derive(Debug, Clone)]
pub struct BumpRules {
    pub markers: CommitMarkers,
    pub directives: DirectiveMarkers,
    pub formats: TagFormats,
}

impl BumpRules {
    pub fn new(markers: CommitMarkers, directives: DirectiveMarkers, formats: TagFormats) -> Self {
        BumpRules {
            markers,
            directives,
            formats,
        }
    }
}

/// Decides the next bump from repository state and the version history
///
/// The orchestrator only reads: [`decide`](Self::decide) never touches the
/// ledger, and [`apply`] is the single place a decision is written back.
pub struct BumpOrchestrator<'a, R: Repository> {
    repo: &'a R,
    ledger: &'a VersionLedger,
    rules: &'a BumpRules,
    classifier: CommitClassifier,
}

impl<'a, R: Repository> BumpOrchestrator<'a, R> {
    pub fn new(repo: &'a R, ledger: &'a VersionLedger, rules: &'a BumpRules) -> Self {
        BumpOrchestrator {
            repo,
            ledger,
            rules,
            classifier: CommitClassifier::new(rules.markers.clone()),
        }
    }

    /// Decide which bump, if any, the repository calls for
    ///
    /// # Errors
    /// * [`GitverError::WorkingTreeDirty`] - uncommitted changes are present
    /// * [`GitverError::InconsistentTagState`] - the newest tag does not match the ledger
    /// * [`GitverError::NoDirectiveFound`] - directive mode found no marker
    /// * any repository failure, unchanged
    pub fn decide(&self, mode: BumpMode) -> Result<BumpDecision> {
        if !self.repo.is_working_tree_clean()? {
            return Err(GitverError::WorkingTreeDirty);
        }

        let decision = match mode {
            BumpMode::Automatic => self.decide_automatic()?,
            BumpMode::Directive => self.decide_directive()?,
        };

        info!(?mode, %decision, current = %self.ledger.current_version(), "bump decided");
        Ok(decision)
    }

    fn decide_automatic(&self) -> Result<BumpDecision> {
        let latest_tag = self.repo.latest_tag()?;
        let plan = range::select(latest_tag.as_deref(), self.ledger, &self.rules.formats)?;

        let priority = match plan {
            AnalysisPlan::Single(window) => self.classify_window(&window)?,
            AnalysisPlan::Compare { old, new } => {
                let old_priority = self.classify_window(&old)?;
                let new_priority = self.classify_window(&new)?;
                range::combine(old_priority, new_priority)
            }
        };

        Ok(BumpDecision::from_priority(priority))
    }

    fn decide_directive(&self) -> Result<BumpDecision> {
        let message = self.repo.head_commit_message()?;

        match self.rules.directives.parse(&message) {
            Some(Directive::Bump(bump)) => Ok(BumpDecision::Bump(bump)),
            Some(Directive::Automatic) => {
                debug!("bare directive found; falling back to automatic mode");
                self.decide_automatic()
            }
            None => Err(GitverError::NoDirectiveFound),
        }
    }

    fn classify_window(&self, window: &Window) -> Result<CommitPriority> {
        let commits = self.repo.commits_between(&window.from, window.to.as_ref())?;
        let priority = self.classifier.classify_commits(&commits);

        debug!(%window, commits = commits.len(), %priority, "classified window");
        Ok(priority)
    }
}

/// Append `bump` to the ledger and persist it
///
/// One append and one save; if the append fails nothing is written.
pub fn apply<S: LedgerStore>(
    ledger: &mut VersionLedger,
    store: &S,
    bump: VersionBump,
) -> Result<HistoryEntry> {
    let entry = ledger.bump(bump)?.clone();
    store.save(ledger)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::ledger::MemoryStore;

    fn rules() -> BumpRules {
        BumpRules::new(
            CommitMarkers::default(),
            DirectiveMarkers::default(),
            TagFormats::new("v{version}", "r{version}").unwrap(),
        )
    }

    #[test]
    fn test_directive_parse_order() {
        let markers = DirectiveMarkers::default();
        assert_eq!(
            markers.parse("[bump patch] [bump major]"),
            Some(Directive::Bump(VersionBump::Major))
        );
        assert_eq!(
            markers.parse("[bump] [bump minor]"),
            Some(Directive::Bump(VersionBump::Minor))
        );
        assert_eq!(markers.parse("release [bump]"), Some(Directive::Automatic));
        assert_eq!(markers.parse("[Bump Minor]"), None);
        assert_eq!(markers.parse("plain commit"), None);
    }

    #[test]
    fn test_dirty_tree_is_rejected_before_reading_history() {
        let repo = MockRepository::with_history(["feat: x"]);
        repo.set_dirty(true);
        let ledger = VersionLedger::new();
        let rules = rules();
        let orchestrator = BumpOrchestrator::new(&repo, &ledger, &rules);

        for mode in [BumpMode::Automatic, BumpMode::Directive] {
            let err = orchestrator.decide(mode).unwrap_err();
            assert!(matches!(err, GitverError::WorkingTreeDirty));
        }
    }

    #[test]
    fn test_automatic_on_fresh_repository() {
        let repo = MockRepository::with_history(["init", "fix: y"]);
        let ledger = VersionLedger::new();
        let rules = rules();

        let decision = BumpOrchestrator::new(&repo, &ledger, &rules)
            .decide(BumpMode::Automatic)
            .unwrap();
        assert_eq!(decision, BumpDecision::Bump(VersionBump::Patch));
    }

    #[test]
    fn test_automatic_without_markers_needs_no_bump() {
        let repo = MockRepository::with_history(["init", "docs: readme"]);
        let ledger = VersionLedger::new();
        let rules = rules();

        let decision = BumpOrchestrator::new(&repo, &ledger, &rules)
            .decide(BumpMode::Automatic)
            .unwrap();
        assert_eq!(decision, BumpDecision::NoBumpRequired);
        assert_eq!(decision.bump(), None);
    }

    #[test]
    fn test_directive_without_marker() {
        let repo = MockRepository::with_history(["feat: no directive here"]);
        let ledger = VersionLedger::new();
        let rules = rules();

        let err = BumpOrchestrator::new(&repo, &ledger, &rules)
            .decide(BumpMode::Directive)
            .unwrap_err();
        assert!(matches!(err, GitverError::NoDirectiveFound));
    }

    #[test]
    fn test_bare_directive_runs_automatic_mode() {
        let repo = MockRepository::with_history(["init", "feat: widget [bump]"]);
        let ledger = VersionLedger::new();
        let rules = rules();

        let decision = BumpOrchestrator::new(&repo, &ledger, &rules)
            .decide(BumpMode::Directive)
            .unwrap();
        assert_eq!(decision, BumpDecision::Bump(VersionBump::Minor));
    }

    #[test]
    fn test_apply_appends_once_and_saves_once() {
        let mut ledger = VersionLedger::new();
        let store = MemoryStore::new();

        let entry = apply(&mut ledger, &store, VersionBump::Minor).unwrap();

        assert_eq!(entry.version().to_string(), "0.1.0");
        assert_eq!(ledger.len(), 2);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot(), Some(ledger));
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(BumpDecision::Bump(VersionBump::Major).to_string(), "major bump");
        assert_eq!(BumpDecision::NoBumpRequired.to_string(), "no bump required");
    }
}
