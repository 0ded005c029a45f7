//! Action dispatch
//!
//! Maps an [`Action`] onto validation, directory preparation, command
//! composition and execution, in that order. Errors while validating or
//! preparing directories stop the action before anything runs. A non-zero
//! exit from an external tool is recorded in the [`Outcome`] instead.

use std::fmt;

use crate::build::cmake::{self, ComposedCommand};
use crate::build::{dirs, Configuration, ConfigurationSelection, ProjectLayout};
use crate::error::FoundryError;
use crate::exec::{ExecutionResult, ProcessRunner, INTERRUPTED_EXIT_CODE};
use crate::utils::terminal;
use crate::utils::tools::{Toolchain, ToolchainEnvironment};

/// A requested action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Clean(ConfigurationSelection),
    Compile(ConfigurationSelection),
    RunTest {
        configuration: Configuration,
        filter: Option<String>,
    },
    RunBenchmarks {
        configuration: Configuration,
        filter: Option<String>,
    },
}

/// Orchestrator progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    PreparingDirectories,
    Composing,
    Executing,
    Done,
}

/// Kind of step recorded in an [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    Configure,
    Build,
    Test,
    Benchmark,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Clean => "clean",
            Step::Configure => "configure",
            Step::Build => "build",
            Step::Test => "tests",
            Step::Benchmark => "benchmarks",
        };
        f.pad(name)
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub configuration: Configuration,
    pub step: Step,
    /// Exit code of the external command, `None` for steps that run nothing
    pub exit_code: Option<i32>,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code.map_or(true, |code| code == 0)
    }
}

/// Terminal result of an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub reports: Vec<StepReport>,
}

impl Outcome {
    /// Exit status of the last external command, 0 if none ran
    pub fn exit_code(&self) -> i32 {
        self.reports
            .iter()
            .rev()
            .find_map(|report| report.exit_code)
            .unwrap_or(0)
    }

    pub fn succeeded(&self) -> bool {
        self.reports.iter().all(StepReport::succeeded)
    }

    /// The last external command was stopped by Ctrl-C
    pub fn interrupted(&self) -> bool {
        self.exit_code() == INTERRUPTED_EXIT_CODE
    }

    /// Failed external commands, in execution order
    pub fn failures(&self) -> Vec<FoundryError> {
        self.reports
            .iter()
            .filter_map(|report| match report.exit_code {
                Some(code) if code != 0 => Some(FoundryError::ExternalCommandFailed {
                    step: report.step.to_string(),
                    configuration: report.configuration.to_string(),
                    code,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Drives one action against a project
pub struct Orchestrator<'a, R: ProcessRunner> {
    layout: &'a ProjectLayout,
    environment: &'a ToolchainEnvironment,
    runner: R,
    stage: Stage,
}

impl<'a, R: ProcessRunner> Orchestrator<'a, R> {
    pub fn new(layout: &'a ProjectLayout, environment: &'a ToolchainEnvironment, runner: R) -> Self {
        Self {
            layout,
            environment,
            runner,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[cfg(test)]
    pub fn into_runner(self) -> R {
        self.runner
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
    }

    /// Run an action to completion
    pub fn execute(&mut self, action: &Action) -> Result<Outcome, FoundryError> {
        tracing::info!(?action, root = %self.layout.root().display(), "executing action");

        let outcome = match action {
            Action::Clean(selection) => self.clean(*selection)?,
            Action::Compile(selection) => self.compile(*selection)?,
            Action::RunTest {
                configuration,
                filter,
            } => self.run_artifact(*configuration, Step::Test, filter.as_deref())?,
            Action::RunBenchmarks {
                configuration,
                filter,
            } => self.run_artifact(*configuration, Step::Benchmark, filter.as_deref())?,
        };

        self.enter(Stage::Done);
        Ok(outcome)
    }

    fn clean(&mut self, selection: ConfigurationSelection) -> Result<Outcome, FoundryError> {
        let mut outcome = Outcome::default();

        self.enter(Stage::PreparingDirectories);
        for configuration in selection.expand() {
            let prepared = dirs::ensure_clean(self.layout, configuration)?;
            match prepared.removed_bytes {
                Some(bytes) => terminal::print_info(&format!(
                    "Cleaned {} ({} freed)",
                    prepared.path.display(),
                    dirs::format_size(bytes)
                )),
                None => terminal::print_info(&format!("Created {}", prepared.path.display())),
            }
            outcome.reports.push(StepReport {
                configuration,
                step: Step::Clean,
                exit_code: None,
            });
        }

        Ok(outcome)
    }

    fn compile(&mut self, selection: ConfigurationSelection) -> Result<Outcome, FoundryError> {
        self.enter(Stage::Validating);
        let toolchain = self.environment.validate()?;
        tracing::info!(compiler = %toolchain.compiler, vcpkg_root = %toolchain.vcpkg_root.display(), "toolchain validated");

        let mut outcome = Outcome::default();
        for configuration in selection.expand() {
            self.compile_one(&toolchain, configuration, &mut outcome)?;
            if outcome.interrupted() {
                terminal::print_warning("interrupted, not starting further steps");
                break;
            }
        }

        Ok(outcome)
    }

    /// Configure then build one configuration
    ///
    /// The build runs even after a failed configure, so its exit status is the
    /// one reported. Only an interrupt stops before the build.
    fn compile_one(
        &mut self,
        toolchain: &Toolchain,
        configuration: Configuration,
        outcome: &mut Outcome,
    ) -> Result<(), FoundryError> {
        self.enter(Stage::PreparingDirectories);
        let prepared = dirs::ensure_exists(self.layout, configuration)?;
        tracing::debug!(path = %prepared.path.display(), created = prepared.created, "build directory ready");

        self.enter(Stage::Composing);
        let configure = cmake::compose_configure(self.layout, toolchain, configuration);
        let result = self.run_step(&configure, &format!("Configuring {} with", configuration))?;
        outcome.reports.push(StepReport {
            configuration,
            step: Step::Configure,
            exit_code: Some(result.exit_code),
        });

        if result.interrupted() {
            return Ok(());
        }
        if !result.success {
            terminal::print_warning(&format!(
                "configure failed for {} (exit code {})",
                configuration, result.exit_code
            ));
        }

        self.enter(Stage::Composing);
        let build = cmake::compose_build(&prepared.path);
        let result = self.run_step(&build, &format!("Building {} with", configuration))?;
        outcome.reports.push(StepReport {
            configuration,
            step: Step::Build,
            exit_code: Some(result.exit_code),
        });

        Ok(())
    }

    fn run_artifact(
        &mut self,
        configuration: Configuration,
        step: Step,
        filter: Option<&str>,
    ) -> Result<Outcome, FoundryError> {
        self.enter(Stage::Composing);
        let build_dir = self.layout.build_dir(configuration);
        let command = match step {
            Step::Benchmark => cmake::compose_benchmark_run(self.layout, &build_dir, filter),
            _ => cmake::compose_test_run(self.layout, &build_dir, filter),
        };

        let title = format!("Running the {} {}", configuration, step);
        let result = self.run_step(&command, &title)?;

        Ok(Outcome {
            reports: vec![StepReport {
                configuration,
                step,
                exit_code: Some(result.exit_code),
            }],
        })
    }

    fn run_step(
        &mut self,
        command: &ComposedCommand,
        title: &str,
    ) -> Result<ExecutionResult, FoundryError> {
        self.enter(Stage::Executing);
        terminal::print_command(title, command);
        let result = self.runner.run(command)?;
        tracing::info!(command = %command, exit_code = result.exit_code, "step finished");
        Ok(result)
    }
}
