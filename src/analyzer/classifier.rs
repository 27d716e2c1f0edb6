use crate::domain::CommitPriority;
use crate::git::CommitInfo;
use tracing::debug;

/// Substrings that raise a commit's priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMarkers {
    pub breaking: String,
    pub feature: String,
    pub fix: String,
}

impl Default for CommitMarkers {
    fn default() -> Self {
        CommitMarkers {
            breaking: "BREAKING CHANGE:".to_string(),
            feature: "feat:".to_string(),
            fix: "fix:".to_string(),
        }
    }
}

/// Reduces a window of commit messages to a single priority
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    markers: CommitMarkers,
}

impl CommitClassifier {
    /// Create a new classifier
    pub fn new(markers: CommitMarkers) -> Self {
        CommitClassifier { markers }
    }

    pub fn markers(&self) -> &CommitMarkers {
        &self.markers
    }

    /// Priority carried by a single message
    ///
    /// Markers are matched case-sensitively anywhere in the message.
    pub fn priority_of(&self, message: &str) -> CommitPriority {
        if message.contains(&self.markers.breaking) {
            CommitPriority::BreakingChange
        } else if message.contains(&self.markers.feature) {
            CommitPriority::Feature
        } else if message.contains(&self.markers.fix) {
            CommitPriority::Fix
        } else {
            CommitPriority::None
        }
    }

    /// Highest priority found in `messages`
    ///
    /// Messages are visited in the order given (most recent first) and the
    /// scan stops at the first breaking change.
    pub fn classify<I, S>(&self, messages: I) -> CommitPriority
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut highest = CommitPriority::None;

        for message in messages {
            let priority = self.priority_of(message.as_ref());
            if priority == CommitPriority::BreakingChange {
                return priority;
            }
            if priority > highest {
                highest = priority;
            }
        }

        highest
    }

    /// Same reduction as [`classify`](Self::classify), tracing the commits
    /// that raised the priority
    pub fn classify_commits(&self, commits: &[CommitInfo]) -> CommitPriority {
        let mut highest = CommitPriority::None;

        for commit in commits {
            let priority = self.priority_of(&commit.message);
            if priority > highest {
                debug!(hash = %short_hash(&commit.hash), %priority, "commit raised priority");
                highest = priority;
            }
            if highest == CommitPriority::BreakingChange {
                break;
            }
        }

        highest
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(messages: &[&str]) -> CommitPriority {
        CommitClassifier::default().classify(messages)
    }

    fn commit(hash: &str, message: &str) -> CommitInfo {
        CommitInfo {
            hash: hash.to_string(),
            message: message.to_string(),
            author: "Test".to_string(),
        }
    }

    #[test]
    fn test_empty_window_is_none() {
        assert_eq!(classify(&[]), CommitPriority::None);
    }

    #[test]
    fn test_no_markers_is_none() {
        assert_eq!(
            classify(&["docs: readme", "chore: deps", "Merge branch 'main'"]),
            CommitPriority::None
        );
    }

    #[test]
    fn test_feature_beats_fix_regardless_of_order() {
        assert_eq!(classify(&["fix: a", "feat: b"]), CommitPriority::Feature);
        assert_eq!(classify(&["feat: b", "fix: a"]), CommitPriority::Feature);
    }

    #[test]
    fn test_fix_only() {
        assert_eq!(classify(&["fix: a", "docs: b"]), CommitPriority::Fix);
    }

    #[test]
    fn test_breaking_change_anywhere_wins() {
        assert_eq!(
            classify(&["fix: a", "feat: b", "refactor: c\n\nBREAKING CHANGE: removed x"]),
            CommitPriority::BreakingChange
        );
    }

    #[test]
    fn test_markers_match_inside_message() {
        assert_eq!(classify(&["Merge: feat: add x"]), CommitPriority::Feature);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(classify(&["Feat: x", "FIX: y"]), CommitPriority::None);
        assert_eq!(classify(&["breaking change: z"]), CommitPriority::None);
    }

    #[test]
    fn test_breaking_marker_takes_precedence_within_a_message() {
        let classifier = CommitClassifier::default();
        assert_eq!(
            classifier.priority_of("feat: x\n\nBREAKING CHANGE: y"),
            CommitPriority::BreakingChange
        );
    }

    #[test]
    fn test_custom_markers() {
        let classifier = CommitClassifier::new(CommitMarkers {
            breaking: "[major]".to_string(),
            feature: "[feature]".to_string(),
            fix: "[bugfix]".to_string(),
        });
        assert_eq!(classifier.classify(["[bugfix] x"]), CommitPriority::Fix);
        assert_eq!(classifier.classify(["feat: x"]), CommitPriority::None);
        assert_eq!(
            classifier.classify(["[feature] x", "[major] y"]),
            CommitPriority::BreakingChange
        );
    }

    #[test]
    fn test_classify_commits_matches_classify() {
        let classifier = CommitClassifier::default();
        let commits = vec![
            commit("a1b2c3d4e5", "fix: one"),
            commit("f6", "feat: two"),
            commit("0000000000", "docs: three"),
        ];
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();

        assert_eq!(
            classifier.classify_commits(&commits),
            classifier.classify(messages)
        );
        assert_eq!(classifier.classify_commits(&[]), CommitPriority::None);
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456");
        assert_eq!(short_hash("abc"), "abc");
    }
}
