//! Command-line workflows, independent of argument parsing

pub mod orchestration;

pub use orchestration::{
    run_bump_workflow, run_init_workflow, run_release_workflow, BumpCommand, BumpWorkflowArgs,
    InitWorkflowArgs, ReleaseResult, ReleaseWorkflowArgs, WorkflowResult,
};
