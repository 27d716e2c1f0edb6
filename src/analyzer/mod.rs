//! Bump-decision engine
//!
//! [`classifier`] reduces commit messages to a priority, [`range`] picks the
//! commit windows to look at, and [`orchestrator`] ties both to the version
//! history to produce a single decision.

pub mod classifier;
pub mod orchestrator;
pub mod range;

pub use classifier::{CommitClassifier, CommitMarkers};
pub use orchestrator::{
    apply, BumpDecision, BumpMode, BumpOrchestrator, BumpRules, Directive, DirectiveMarkers,
};
pub use range::{AnalysisPlan, Window};
