use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gitver::analyzer::BumpDecision;
use gitver::cli::{self, BumpWorkflowArgs, InitWorkflowArgs, ReleaseWorkflowArgs};
use gitver::config;
use gitver::git::Git2Repository;
use gitver::ledger::{LedgerStore, YamlFileStore};
use gitver::ui;

#[derive(Parser)]
#[command(
    name = "gitver",
    version,
    about = "Semantic versioning driven by commit messages and tags"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Print diagnostic output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the version file for this project
    Init {
        #[arg(long = "version", value_name = "X.Y.Z", help = "Initial version")]
        initial: Option<String>,

        #[arg(long, help = "Overwrite an existing version file")]
        force: bool,
    },

    /// Bump the version
    Bump {
        #[arg(long, help = "Derive the bump from commit messages since the last tag")]
        auto: bool,

        #[arg(long, help = "Take the bump from a directive in the HEAD commit")]
        commit: bool,

        #[arg(long, help = "Bump the major version")]
        major: bool,

        #[arg(long, help = "Bump the minor version")]
        minor: bool,

        #[arg(long, help = "Bump the patch version")]
        patch: bool,

        #[arg(long, help = "Commit the version file and create the version tag")]
        tag: bool,

        #[arg(long, help = "Push the branch and the new tag (requires --tag)")]
        push: bool,

        #[arg(long, help = "Amend HEAD instead of creating a commit (requires --tag)")]
        amend: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Tag HEAD as the release of the current version
    Release {
        #[arg(long, help = "Push the release tag")]
        push: bool,
    },

    /// Show the current version and the version history
    Show,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    // Diagnostics go to stderr so stdout stays readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    let project_dir = config::find_project_dir(&cwd);
    let config = config::load_config(args.config.as_deref(), &project_dir)?;
    let store = YamlFileStore::new(config::version_file_path(&project_dir));

    match args.command {
        Command::Init { initial, force } => {
            let ledger = cli::run_init_workflow(
                &store,
                &config,
                &InitWorkflowArgs {
                    version: initial,
                    force,
                },
            )?;
            ui::display_success(&format!(
                "Initialised {} at version {}",
                store.path().display(),
                ledger.current_version()
            ));

            if config::write_default_config(&project_dir)? {
                ui::display_success(&format!(
                    "Wrote {}",
                    config::project_config_path(&project_dir).display()
                ));
            }
        }

        Command::Bump {
            auto,
            commit,
            major,
            minor,
            patch,
            tag,
            push,
            amend,
            dry_run,
        } => {
            let workflow_args = BumpWorkflowArgs {
                auto,
                commit,
                major,
                minor,
                patch,
                tag,
                push,
                amend,
                dry_run,
            };
            // Flag errors are reported before the repository is opened
            workflow_args.validate()?;

            let repo = Git2Repository::open(&project_dir)?;
            let result = cli::run_bump_workflow(&repo, &store, &config, &workflow_args)?;

            ui::display_decision(&result.decision);
            if let BumpDecision::Bump(_) = result.decision {
                ui::display_version_change(
                    &result.previous.to_string(),
                    &result.current.to_string(),
                    result.dry_run,
                );
            }

            if let Some(tag) = &result.tag {
                if result.dry_run {
                    ui::display_status(&format!("Would create tag: {}", tag));
                } else if result.pushed {
                    ui::display_success(&format!("Pushed {} to {}", tag, config.vcs.remote));
                } else {
                    ui::display_success(&format!("Created tag: {}", tag));
                    ui::display_manual_push_instruction(tag, &config.vcs.remote);
                }
            }
        }

        Command::Release { push } => {
            let repo = Git2Repository::open(&project_dir)?;
            let result =
                cli::run_release_workflow(&repo, &store, &config, &ReleaseWorkflowArgs { push })?;

            ui::display_success(&format!("Tagged release {}", result.tag));
            if result.pushed {
                ui::display_success(&format!("Pushed {} to {}", result.tag, config.vcs.remote));
            } else {
                ui::display_manual_push_instruction(&result.tag, &config.vcs.remote);
            }
        }

        Command::Show => {
            let ledger = store.load()?;
            ui::display_history(&ledger);
        }
    }

    Ok(())
}
