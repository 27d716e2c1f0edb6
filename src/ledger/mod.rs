//! Version history ledger
//!
//! The ledger is the durable record of every version the project has had.
//! It is append-only: the only way to change it is one of the three bump
//! operations, plus [`VersionLedger::seed_default`] which may rewrite the seed
//! entry before anything has been appended.
//!
//! Persistence lives in [`store`]; the ledger itself never touches disk.

pub mod store;

pub use store::{LedgerStore, MemoryStore, YamlFileStore};

use crate::domain::{SemanticVersion, VersionBump};
use crate::error::{GitverError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One recorded version and the day it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "Version")]
    version: SemanticVersion,
    #[serde(rename = "Date")]
    date: String,
}

impl HistoryEntry {
    pub fn new(version: SemanticVersion, date: impl Into<String>) -> Self {
        HistoryEntry {
            version,
            date: date.into(),
        }
    }

    pub fn version(&self) -> SemanticVersion {
        self.version
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Today's date in the format written to the history
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Ordered, append-only history of versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLedger {
    entries: Vec<HistoryEntry>,
}

impl VersionLedger {
    /// A fresh ledger holding the single `0.0.0` seed entry
    pub fn new() -> Self {
        VersionLedger {
            entries: vec![HistoryEntry::new(SemanticVersion::default(), today())],
        }
    }

    /// Rebuild a ledger from persisted entries.
    ///
    /// Rejects an empty history and any entry that does not strictly exceed
    /// its predecessor.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(GitverError::ledger("history is empty"));
        }

        for pair in entries.windows(2) {
            if pair[1].version <= pair[0].version {
                return Err(GitverError::ledger(format!(
                    "history is out of order: {} is recorded after {}",
                    pair[1].version, pair[0].version
                )));
            }
        }

        Ok(VersionLedger { entries })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed ledger; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn last(&self) -> &HistoryEntry {
        // non-empty by construction
        &self.entries[self.entries.len() - 1]
    }

    pub fn current_version(&self) -> SemanticVersion {
        self.last().version
    }

    /// The version recorded before the current one
    pub fn previous_version(&self) -> Result<SemanticVersion> {
        if self.entries.len() < 2 {
            return Err(GitverError::ledger(format!(
                "no previous version recorded before {}",
                self.current_version()
            )));
        }
        Ok(self.entries[self.entries.len() - 2].version)
    }

    pub fn current_version_string(&self) -> String {
        self.current_version().to_string()
    }

    pub fn previous_version_string(&self) -> Result<String> {
        self.previous_version().map(|v| v.to_string())
    }

    /// Append the next version, dated today
    pub fn bump(&mut self, bump: VersionBump) -> Result<&HistoryEntry> {
        self.bump_on(bump, today())
    }

    /// Append the next version with an explicit date
    pub fn bump_on(&mut self, bump: VersionBump, date: impl Into<String>) -> Result<&HistoryEntry> {
        let previous = self.current_version();
        let next = previous.bump(bump)?;

        self.entries.push(HistoryEntry::new(next, date));
        info!(%previous, current = %next, %bump, "appended version to history");

        Ok(self.last())
    }

    pub fn bump_major(&mut self) -> Result<&HistoryEntry> {
        self.bump(VersionBump::Major)
    }

    pub fn bump_minor(&mut self) -> Result<&HistoryEntry> {
        self.bump(VersionBump::Minor)
    }

    pub fn bump_patch(&mut self) -> Result<&HistoryEntry> {
        self.bump(VersionBump::Patch)
    }

    /// Overwrite the seed entry's version.
    ///
    /// Only allowed while the seed is the sole entry.
    pub fn seed_default(&mut self, version: SemanticVersion) -> Result<()> {
        if self.entries.len() != 1 {
            return Err(GitverError::ledger(format!(
                "cannot reseed a history that already holds {} entries",
                self.entries.len()
            )));
        }

        self.entries[0].version = version;
        Ok(())
    }
}

impl Default for VersionLedger {
    fn default() -> Self {
        Self::new()
    }
}
