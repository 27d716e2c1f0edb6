use crate::error::{GitverError, Result};
use crate::ledger::{HistoryEntry, VersionLedger};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Revision of the on-disk layout, written into every version file
pub const FILE_FORMAT_REVISION: &str = "2024-02-04";

/// On-disk layout of the version file
#[derive(Debug, Serialize, Deserialize)]
struct VersionFile {
    #[serde(rename = "Version")]
    format: String,
    #[serde(rename = "History")]
    history: Vec<HistoryEntry>,
}

impl VersionFile {
    fn from_ledger(ledger: &VersionLedger) -> Self {
        VersionFile {
            format: FILE_FORMAT_REVISION.to_string(),
            history: ledger.entries().to_vec(),
        }
    }
}

/// Where the version history is kept between runs
pub trait LedgerStore {
    /// Read the persisted history
    fn load(&self) -> Result<VersionLedger>;

    /// Overwrite the persisted history
    fn save(&self, ledger: &VersionLedger) -> Result<()>;

    /// Persist a history for the first time, refusing to replace an existing one
    fn create(&self, ledger: &VersionLedger) -> Result<()>;
}

/// YAML version file on disk
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        YamlFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl LedgerStore for YamlFileStore {
    fn load(&self) -> Result<VersionLedger> {
        let data = fs::read_to_string(&self.path).map_err(|e| {
            GitverError::store(format!(
                "cannot read version file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let file: VersionFile = serde_yaml::from_str(&data).map_err(|e| {
            GitverError::store(format!(
                "version file {} is not valid: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), entries = file.history.len(), "loaded version file");
        VersionLedger::from_entries(file.history)
    }

    fn save(&self, ledger: &VersionLedger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_yaml::to_string(&VersionFile::from_ledger(ledger))?;
        fs::write(&self.path, data)?;

        debug!(path = %self.path.display(), entries = ledger.len(), "wrote version file");
        Ok(())
    }

    fn create(&self, ledger: &VersionLedger) -> Result<()> {
        if self.exists() {
            return Err(GitverError::store(format!(
                "version file {} already exists",
                self.path.display()
            )));
        }
        self.save(ledger)
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RefCell<Option<VersionLedger>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    /// An empty store; `load` fails until something is saved
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `ledger`
    pub fn with_ledger(ledger: VersionLedger) -> Self {
        MemoryStore {
            ledger: RefCell::new(Some(ledger)),
            saves: RefCell::new(0),
        }
    }

    /// Number of successful `save`/`create` calls
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    /// The last persisted ledger, if any
    pub fn snapshot(&self) -> Option<VersionLedger> {
        self.ledger.borrow().clone()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<VersionLedger> {
        self.ledger
            .borrow()
            .clone()
            .ok_or_else(|| GitverError::store("no version history has been stored"))
    }

    fn save(&self, ledger: &VersionLedger) -> Result<()> {
        *self.ledger.borrow_mut() = Some(ledger.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn create(&self, ledger: &VersionLedger) -> Result<()> {
        if self.ledger.borrow().is_some() {
            return Err(GitverError::store("version history already exists"));
        }
        self.save(ledger)
    }
}
