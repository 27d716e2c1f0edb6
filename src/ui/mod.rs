//! User interface module.
//!
//! gitver never prompts; every choice comes from flags or config. This module
//! only presents results, through the functions in [`formatter`].

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_decision, display_error, display_history, display_manual_push_instruction,
    display_status, display_success, display_version_change, format_decision, format_history,
    format_push_command,
};
