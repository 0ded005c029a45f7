//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.
//! Execute methods return the process exit code.

pub mod bench;
pub mod clean;
pub mod compile;

use crate::build::ProjectLayout;
use crate::error::FoundryError;
use crate::exec::SystemRunner;
use crate::orchestrator::{Action, Orchestrator, Outcome};
use crate::utils::tools::ToolchainEnvironment;

/// Run an action against the real process runner
fn run_action(
    layout: &ProjectLayout,
    environment: &ToolchainEnvironment,
    action: Action,
) -> Result<Outcome, FoundryError> {
    let mut orchestrator = Orchestrator::new(layout, environment, SystemRunner::new());
    let outcome = orchestrator.execute(&action);
    tracing::debug!(stage = ?orchestrator.stage(), "action finished");
    outcome
}
