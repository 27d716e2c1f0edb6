use crate::domain::VersionBump;
use std::fmt;

/// How strongly a set of commits asks for a release.
///
/// Variants are declared weakest first so the derived `Ord` gives
/// `None < Fix < Feature < BreakingChange`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitPriority {
    #[default]
    None,
    Fix,
    Feature,
    BreakingChange,
}

impl CommitPriority {
    /// The bump this priority calls for, if any
    pub fn to_bump(self) -> Option<VersionBump> {
        match self {
            CommitPriority::BreakingChange => Some(VersionBump::Major),
            CommitPriority::Feature => Some(VersionBump::Minor),
            CommitPriority::Fix => Some(VersionBump::Patch),
            CommitPriority::None => None,
        }
    }
}

impl fmt::Display for CommitPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitPriority::None => "none",
            CommitPriority::Fix => "fix",
            CommitPriority::Feature => "feature",
            CommitPriority::BreakingChange => "breaking change",
        };
        f.write_str(name)
    }
}
