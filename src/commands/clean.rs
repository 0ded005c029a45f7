//! Clean command implementation

use anyhow::Result;
use clap::Args;

use crate::build::{ConfigurationSelection, ProjectLayout};
use crate::orchestrator::Action;
use crate::utils::terminal;
use crate::utils::tools::ToolchainEnvironment;

/// Delete and recreate build directories
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Build type to clean (Debug, Release or All)
    #[arg(value_enum, ignore_case = true)]
    pub build_type: ConfigurationSelection,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, layout: &ProjectLayout, environment: &ToolchainEnvironment) -> Result<i32> {
        terminal::print_header(&format!("Cleaning {} build directories", self.build_type));

        let outcome = super::run_action(layout, environment, Action::Clean(self.build_type))?;

        terminal::print_success(&format!(
            "{} build director{} ready",
            outcome.reports.len(),
            if outcome.reports.len() == 1 { "y" } else { "ies" }
        ));
        Ok(outcome.exit_code())
    }
}
