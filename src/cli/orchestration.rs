//! Command workflows
//!
//! Each `gitver` subcommand is a function here taking plain argument structs,
//! a [`Repository`] and a [`LedgerStore`]. `main.rs` only parses flags, builds
//! the collaborators and prints the result, so every workflow runs without
//! `clap` and against in-memory collaborators in tests.

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::analyzer::{self, BumpDecision, BumpMode, BumpOrchestrator};
use crate::config::Config;
use crate::domain::{SemanticVersion, VersionBump};
use crate::error::GitverError;
use crate::git::Repository;
use crate::ledger::{LedgerStore, VersionLedger};

/// Which of the mutually exclusive `bump` modes was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpCommand {
    /// `--auto`
    Auto,
    /// `--commit`
    Commit,
    /// `--major`, `--minor` or `--patch`
    Explicit(VersionBump),
}

/// Arguments for the bump workflow
///
/// Mirrors the CLI flags in a format suitable for orchestration logic.
/// Mode flags are kept as separate booleans so that conflicting combinations
/// can be reported by [`validate`](Self::validate) rather than by the parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpWorkflowArgs {
    pub auto: bool,
    pub commit: bool,
    pub major: bool,
    pub minor: bool,
    pub patch: bool,

    /// Commit the version file and create the version tag
    pub tag: bool,

    /// Push the branch and the new tag; requires `tag`
    pub push: bool,

    /// Amend HEAD instead of creating a bump commit; requires `tag`
    pub amend: bool,

    /// Decide and report without touching the ledger or the repository
    pub dry_run: bool,
}

impl BumpWorkflowArgs {
    /// Check flag combinations and resolve the requested mode
    pub fn validate(&self) -> Result<BumpCommand> {
        if self.push && !self.tag {
            bail!("--push requires --tag");
        }
        if self.amend && !self.tag {
            bail!("--amend requires --tag");
        }

        let modes = [
            (self.auto, BumpCommand::Auto),
            (self.commit, BumpCommand::Commit),
            (self.major, BumpCommand::Explicit(VersionBump::Major)),
            (self.minor, BumpCommand::Explicit(VersionBump::Minor)),
            (self.patch, BumpCommand::Explicit(VersionBump::Patch)),
        ];
        let mut selected = modes.iter().filter(|(set, _)| *set).map(|(_, mode)| *mode);

        match (selected.next(), selected.next()) {
            (Some(mode), None) => Ok(mode),
            _ => bail!("exactly one of --auto, --commit, --major, --minor or --patch is required"),
        }
    }
}

/// Result of a bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub decision: BumpDecision,

    /// Version before the workflow ran
    pub previous: SemanticVersion,

    /// Version after the workflow (equal to `previous` when nothing was bumped)
    pub current: SemanticVersion,

    /// The version tag that was created
    pub tag: Option<String>,

    /// Whether the branch and tag were pushed to the remote
    pub pushed: bool,

    pub dry_run: bool,
}

/// Main bump workflow
///
/// 1. Validate flags and load the version history
/// 2. Decide the bump (automatic, directive or explicit)
/// 3. With `tag`, make sure the version tag is still free
/// 4. Append the bump to the history and save
/// 5. Optionally commit, tag and push
///
/// # Arguments
///
/// * `repo` - Repository the decision is read from and written to
/// * `store` - Where the version history is persisted
/// * `config` - Loaded gitver configuration
/// * `args` - Workflow arguments
pub fn run_bump_workflow<R, S>(
    repo: &R,
    store: &S,
    config: &Config,
    args: &BumpWorkflowArgs,
) -> Result<WorkflowResult>
where
    R: Repository,
    S: LedgerStore,
{
    let command = args.validate()?;
    let rules = config.bump_rules()?;
    let mut ledger = store.load().context("Failed to load version history")?;
    let previous = ledger.current_version();

    let decision = match command {
        BumpCommand::Auto => {
            BumpOrchestrator::new(repo, &ledger, &rules).decide(BumpMode::Automatic)?
        }
        BumpCommand::Commit => {
            BumpOrchestrator::new(repo, &ledger, &rules).decide(BumpMode::Directive)?
        }
        BumpCommand::Explicit(bump) => {
            // Only the tagging path writes to the repository
            if args.tag && !repo.is_working_tree_clean()? {
                return Err(GitverError::WorkingTreeDirty.into());
            }
            BumpDecision::Bump(bump)
        }
    };

    let Some(bump) = decision.bump() else {
        return Ok(WorkflowResult {
            decision,
            previous,
            current: previous,
            tag: None,
            pushed: false,
            dry_run: args.dry_run,
        });
    };

    let target = previous.bump(bump)?;
    let tag = args.tag.then(|| rules.formats.version_tag(&target));

    // Nothing is written when the tag name is taken
    if let Some(tag) = &tag {
        if repo.tag_exists(tag)? {
            return Err(GitverError::tag(format!("Tag '{}' already exists", tag)).into());
        }
    }

    if args.dry_run {
        return Ok(WorkflowResult {
            decision,
            previous,
            current: target,
            tag,
            pushed: false,
            dry_run: true,
        });
    }

    let current = analyzer::apply(&mut ledger, store, bump)
        .context("Failed to record the new version")?
        .version();

    let mut result = WorkflowResult {
        decision,
        previous,
        current,
        tag: None,
        pushed: false,
        dry_run: false,
    };

    let Some(tag) = tag else {
        return Ok(result);
    };

    let message = config.vcs.render_commit_message(&previous, &current);

    repo.add_all().context("Failed to stage changes")?;
    repo.commit(&message, args.amend)
        .context("Failed to commit the version bump")?;
    repo.create_tag(&tag, &config.vcs.tag_message)
        .with_context(|| format!("Failed to create tag '{}'", tag))?;
    info!(%tag, amend = args.amend, "bump committed and tagged");

    if args.push {
        repo.push(&config.vcs.remote, &[tag.as_str()])
            .with_context(|| format!("Failed to push '{}' to '{}'", tag, config.vcs.remote))?;
        result.pushed = true;
    }

    result.tag = Some(tag);
    Ok(result)
}

/// Arguments for the release workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWorkflowArgs {
    pub push: bool,
}

/// Result of a release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseResult {
    pub version: SemanticVersion,
    pub tag: String,
    pub pushed: bool,
}

/// Tag HEAD as the release of the current version
pub fn run_release_workflow<R, S>(
    repo: &R,
    store: &S,
    config: &Config,
    args: &ReleaseWorkflowArgs,
) -> Result<ReleaseResult>
where
    R: Repository,
    S: LedgerStore,
{
    if !repo.is_working_tree_clean()? {
        return Err(GitverError::WorkingTreeDirty.into());
    }

    let ledger = store.load().context("Failed to load version history")?;
    let version = ledger.current_version();
    let tag = config.tag_formats()?.release_tag(&version);

    repo.create_tag(&tag, &config.vcs.tag_message)
        .with_context(|| format!("Failed to create tag '{}'", tag))?;
    info!(%tag, "release tagged");

    if args.push {
        repo.push(&config.vcs.remote, &[tag.as_str()])
            .with_context(|| format!("Failed to push '{}' to '{}'", tag, config.vcs.remote))?;
    }

    Ok(ReleaseResult {
        version,
        tag,
        pushed: args.push,
    })
}

/// Arguments for the init workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitWorkflowArgs {
    /// Initial version; the configured default when absent
    pub version: Option<String>,

    /// Replace an existing version file
    pub force: bool,
}

/// Create a fresh version history seeded with the initial version
pub fn run_init_workflow<S: LedgerStore>(
    store: &S,
    config: &Config,
    args: &InitWorkflowArgs,
) -> Result<VersionLedger> {
    let version = match &args.version {
        Some(raw) => SemanticVersion::parse(raw)?,
        None => config.default_version()?,
    };

    let mut ledger = VersionLedger::new();
    ledger.seed_default(version)?;

    if args.force {
        store.save(&ledger)?;
    } else {
        store
            .create(&ledger)
            .context("Project is already initialised; use --force to start over")?;
    }

    info!(%version, "version history initialised");
    Ok(ledger)
}
