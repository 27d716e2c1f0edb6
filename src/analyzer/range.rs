//! Commit window selection
//!
//! Which commits count towards the next bump depends on where the newest tag
//! sits relative to the recorded version:
//!
//! | latest tag                 | windows analysed                                  |
//! |----------------------------|---------------------------------------------------|
//! | none                       | `HEAD` back to the first commit                   |
//! | release tag of current     | `HEAD` back to that tag                           |
//! | version tag of current     | old: version tag back to release tag of previous  |
//! |                            | new: `HEAD` back to the version tag               |
//! | anything else              | error                                             |
//!
//! In the last analysable case the version was bumped but never released, so
//! a new bump is only warranted when the commits since the bump ask for more
//! than the bump already delivered.

use crate::domain::{CommitPriority, TagFormats};
use crate::error::{GitverError, Result};
use crate::git::Revision;
use crate::ledger::VersionLedger;
use std::fmt;
use tracing::debug;

/// A range of commits: `from` is included, `to` and its ancestors are not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub from: Revision,
    pub to: Option<Revision>,
}

impl Window {
    /// From HEAD back to the first commit
    pub fn whole_history() -> Self {
        Window {
            from: Revision::Head,
            to: None,
        }
    }

    /// From HEAD back to (excluding) `tag`
    pub fn since_tag(tag: impl Into<String>) -> Self {
        Window {
            from: Revision::Head,
            to: Some(Revision::tag(tag)),
        }
    }

    pub fn between(from: Revision, to: Option<Revision>) -> Self {
        Window { from, to }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.to {
            Some(to) => write!(f, "{}..{}", to, self.from),
            None => write!(f, "{} (whole history)", self.from),
        }
    }
}

/// The windows to classify for an automatic bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPlan {
    /// Classify one window; its priority decides the bump
    Single(Window),
    /// Classify both; only a strict increase from `old` to `new` bumps
    Compare { old: Window, new: Window },
}

/// Choose the windows to classify given the newest tag in the repository
pub fn select(
    latest_tag: Option<&str>,
    ledger: &VersionLedger,
    formats: &TagFormats,
) -> Result<AnalysisPlan> {
    let current = ledger.current_version();

    let Some(tag) = latest_tag else {
        debug!(%current, "no tags yet; analysing the whole history");
        return Ok(AnalysisPlan::Single(Window::whole_history()));
    };

    let release_tag = formats.release_tag(&current);
    if tag == release_tag {
        debug!(%tag, "latest tag is the current release");
        return Ok(AnalysisPlan::Single(Window::since_tag(tag)));
    }

    let version_tag = formats.version_tag(&current);
    if tag == version_tag {
        // Seed-only history: nothing was released before the first bump
        let previous_release = ledger
            .previous_version()
            .ok()
            .map(|previous| Revision::Tag(formats.release_tag(&previous)));

        debug!(
            %tag,
            previous_release = ?previous_release.as_ref().map(|r| r.to_string()),
            "current version is tagged but unreleased; comparing windows"
        );

        return Ok(AnalysisPlan::Compare {
            old: Window::between(Revision::tag(tag), previous_release),
            new: Window::since_tag(tag),
        });
    }

    debug!(%tag, kind = %formats.describe(tag), %current, "latest tag does not match the ledger");
    Err(GitverError::inconsistent_tag(tag, current.to_string()))
}

/// Final priority of a compare plan: `new` only if it strictly exceeds `old`
pub fn combine(old: CommitPriority, new: CommitPriority) -> CommitPriority {
    if new > old {
        new
    } else {
        CommitPriority::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SemanticVersion;
    use crate::ledger::HistoryEntry;

    fn formats() -> TagFormats {
        TagFormats::new("v{version}", "r{version}").unwrap()
    }

    fn ledger_of(versions: &[(u32, u32, u32)]) -> VersionLedger {
        let entries = versions
            .iter()
            .map(|&(ma, mi, pa)| HistoryEntry::new(SemanticVersion::new(ma, mi, pa), "2024-02-04"))
            .collect();
        VersionLedger::from_entries(entries).unwrap()
    }

    #[test]
    fn test_no_tag_uses_whole_history() {
        let plan = select(None, &VersionLedger::new(), &formats()).unwrap();
        assert_eq!(plan, AnalysisPlan::Single(Window::whole_history()));
    }

    #[test]
    fn test_release_tag_of_current() {
        let ledger = ledger_of(&[(0, 0, 0), (1, 0, 0)]);
        let plan = select(Some("r1.0.0"), &ledger, &formats()).unwrap();
        assert_eq!(plan, AnalysisPlan::Single(Window::since_tag("r1.0.0")));
    }

    #[test]
    fn test_version_tag_of_current_compares() {
        let ledger = ledger_of(&[(0, 9, 0), (1, 0, 0)]);
        let plan = select(Some("v1.0.0"), &ledger, &formats()).unwrap();
        assert_eq!(
            plan,
            AnalysisPlan::Compare {
                old: Window::between(Revision::tag("v1.0.0"), Some(Revision::tag("r0.9.0"))),
                new: Window::since_tag("v1.0.0"),
            }
        );
    }

    #[test]
    fn test_version_tag_without_previous_has_open_old_window() {
        let plan = select(Some("v0.0.0"), &VersionLedger::new(), &formats()).unwrap();
        assert_eq!(
            plan,
            AnalysisPlan::Compare {
                old: Window::between(Revision::tag("v0.0.0"), None),
                new: Window::since_tag("v0.0.0"),
            }
        );
    }

    #[test]
    fn test_mismatched_tag_is_inconsistent() {
        let ledger = ledger_of(&[(0, 0, 0), (1, 0, 0)]);
        for tag in ["v9.9.9", "r0.0.0", "nightly"] {
            let err = select(Some(tag), &ledger, &formats()).unwrap_err();
            match err {
                GitverError::InconsistentTagState { tag: t, version } => {
                    assert_eq!(t, tag);
                    assert_eq!(version, "1.0.0");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_custom_formats() {
        let formats = TagFormats::new("bump-{version}", "release/{version}").unwrap();
        let ledger = ledger_of(&[(2, 0, 0)]);
        let plan = select(Some("release/2.0.0"), &ledger, &formats).unwrap();
        assert_eq!(plan, AnalysisPlan::Single(Window::since_tag("release/2.0.0")));
        assert!(select(Some("r2.0.0"), &ledger, &formats).is_err());
    }

    #[test]
    fn test_combine_requires_strict_increase() {
        use CommitPriority as P;
        assert_eq!(combine(P::Feature, P::Feature), P::None);
        assert_eq!(combine(P::Feature, P::Fix), P::None);
        assert_eq!(combine(P::Fix, P::Feature), P::Feature);
        assert_eq!(combine(P::None, P::Fix), P::Fix);
        assert_eq!(combine(P::Feature, P::BreakingChange), P::BreakingChange);
        assert_eq!(combine(P::None, P::None), P::None);
    }

    #[test]
    fn test_window_display() {
        assert_eq!(Window::whole_history().to_string(), "HEAD (whole history)");
        assert_eq!(Window::since_tag("r1.0.0").to_string(), "r1.0.0..HEAD");
    }
}
