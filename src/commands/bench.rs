//! Run-benchmarks command implementation

use anyhow::Result;
use clap::Args;

use crate::build::{Configuration, ProjectLayout};
use crate::orchestrator::Action;
use crate::utils::tools::ToolchainEnvironment;

/// Run the Google Benchmark suite of a compiled configuration
#[derive(Args, Debug)]
pub struct RunBenchmarksCommand {
    /// Build type whose benchmarks to run (Debug or Release)
    #[arg(value_enum, ignore_case = true)]
    pub build_type: Configuration,

    /// Benchmark filter regex passed as --benchmark_filter (e.g., "BM_Sort.*")
    #[arg(short, long, allow_hyphen_values = true)]
    pub filter: Option<String>,
}

impl RunBenchmarksCommand {
    /// Execute the run_benchmarks command
    pub fn execute(self, layout: &ProjectLayout, environment: &ToolchainEnvironment) -> Result<i32> {
        let action = Action::RunBenchmarks {
            configuration: self.build_type,
            filter: self.filter,
        };
        let outcome = super::run_action(layout, environment, action)?;
        Ok(outcome.exit_code())
    }
}
