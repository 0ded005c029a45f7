//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::build::ProjectLayout;
use crate::commands::{
    bench::RunBenchmarksCommand, clean::CleanCommand, compile::CompileCommand,
    test::RunTestCommand,
};
use crate::config::FoundryConfig;
use crate::utils::tools::ToolchainEnvironment;

/// Foundry - source management and build system for the libfoundation project
///
/// Wraps CMake, Ninja and vcpkg and keeps one build directory per
/// configuration under <root>/build.
#[derive(Parser, Debug)]
#[command(name = "foundry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root containing CMakeLists.txt (defaults to the current directory)
    #[arg(long, global = true, env = "FOUNDRY_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the build directories
    Clean(CleanCommand),

    /// Compile the library
    Compile(CompileCommand),

    /// Run the unit tests
    #[command(name = "run_test")]
    RunTest(RunTestCommand),

    /// Run the benchmarks
    #[command(name = "run_benchmarks")]
    RunBenchmarks(RunBenchmarksCommand),
}

impl Cli {
    /// Resolve the project root once; everything downstream receives it by argument
    fn project_root(&self) -> Result<PathBuf> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        let root = match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => current_dir.join(root),
            None => current_dir,
        };

        if !root.is_dir() {
            bail!("Project root {} is not a directory", root.display());
        }
        Ok(root)
    }

    /// Execute the CLI command, returning the process exit code
    pub fn execute(self) -> Result<i32> {
        // Set up terminal colors
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let root = self.project_root()?;
        let config = FoundryConfig::load(&root)?;
        let layout = ProjectLayout::new(root, config);
        let environment = ToolchainEnvironment::capture();

        // Execute the subcommand
        match self.command {
            Commands::Clean(cmd) => cmd.execute(&layout, &environment),
            Commands::Compile(cmd) => cmd.execute(&layout, &environment),
            Commands::RunTest(cmd) => cmd.execute(&layout, &environment),
            Commands::RunBenchmarks(cmd) => cmd.execute(&layout, &environment),
        }
    }
}
