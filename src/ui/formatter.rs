//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text; `display_*` functions print it.

use console::style;

use crate::analyzer::BumpDecision;
use crate::ledger::VersionLedger;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the version change a bump produced (or would produce).
///
/// # Arguments
/// * `previous` - Version before the bump
/// * `current` - Version after the bump
/// * `dry_run` - Whether the change was only previewed
pub fn display_version_change(previous: &str, current: &str, dry_run: bool) {
    let heading = if dry_run {
        "Proposed Version Change:"
    } else {
        "Version Change:"
    };
    println!("\n{}", style(heading).bold());
    println!("  From: {}", style(previous).red());
    println!("  To:   {}", style(current).green());
}

/// One-line summary of a bump decision.
pub fn format_decision(decision: &BumpDecision) -> String {
    match decision {
        BumpDecision::Bump(_) => format!("Decision: {}", decision),
        BumpDecision::NoBumpRequired => {
            "No bump required; nothing changed since the last version".to_string()
        }
    }
}

/// Display what the bump engine decided.
pub fn display_decision(decision: &BumpDecision) {
    match decision {
        BumpDecision::Bump(_) => display_status(&format_decision(decision)),
        BumpDecision::NoBumpRequired => display_success(&format_decision(decision)),
    }
}

/// Render the history, newest entry first, one line per entry.
pub fn format_history(ledger: &VersionLedger) -> Vec<String> {
    let current = ledger.current_version();
    ledger
        .entries()
        .iter()
        .rev()
        .map(|entry| {
            let marker = if entry.version() == current { "*" } else { " " };
            format!("{} {:<12} {}", marker, entry.version(), entry.date())
        })
        .collect()
}

/// Display the current and previous versions followed by the full history.
pub fn display_history(ledger: &VersionLedger) {
    println!(
        "{} {}",
        style("Current version:").bold(),
        style(ledger.current_version()).green()
    );
    if let Ok(previous) = ledger.previous_version() {
        println!("{} {}", style("Previous version:").bold(), previous);
    }

    println!("\n{}", style(format!("History ({} entries):", ledger.len())).underlined());
    for line in format_history(ledger) {
        println!("  {}", line);
    }
}

/// The git command that pushes HEAD and a tag.
pub fn format_push_command(tag: &str, remote: &str) -> String {
    format!("git push {} HEAD {}", remote, tag)
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format_push_command(tag, remote)).cyan()
    );
}
