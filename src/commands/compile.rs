//! Compile command implementation

use anyhow::Result;
use clap::Args;
use console::style;

use crate::build::{ConfigurationSelection, ProjectLayout};
use crate::orchestrator::{Action, Outcome};
use crate::utils::terminal;
use crate::utils::tools::ToolchainEnvironment;

/// Configure and build the library with CMake, Ninja and vcpkg
///
/// Requires CXX and VCPKG_ROOT to be set and cmake, ninja and vcpkg to be on
/// PATH.
#[derive(Args, Debug)]
pub struct CompileCommand {
    /// Build type to compile (Debug, Release or All)
    #[arg(value_enum, ignore_case = true)]
    pub build_type: ConfigurationSelection,
}

impl CompileCommand {
    /// Execute the compile command
    pub fn execute(self, layout: &ProjectLayout, environment: &ToolchainEnvironment) -> Result<i32> {
        terminal::print_header(&format!("Compiling {}", self.build_type));

        let outcome = super::run_action(layout, environment, Action::Compile(self.build_type))?;

        print_summary(&outcome);
        Ok(outcome.exit_code())
    }
}

fn print_summary(outcome: &Outcome) {
    terminal::print_header("Compile Summary");

    for report in &outcome.reports {
        let marker = if report.succeeded() {
            style("ok").green().bold()
        } else {
            style("FAILED").red().bold()
        };
        println!("  {:<8} {:<10} {}", report.configuration, report.step, marker);
    }
    println!();

    if outcome.succeeded() {
        terminal::print_success("all configurations built");
    } else {
        for failure in outcome.failures() {
            terminal::print_error(&failure.to_string());
        }
    }
}
