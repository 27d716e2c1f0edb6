//! Domain logic - pure business rules independent of git operations

pub mod priority;
pub mod tag;
pub mod version;

pub use priority::CommitPriority;
pub use tag::{TagFormats, TagPattern};
pub use version::{SemanticVersion, VersionBump};
