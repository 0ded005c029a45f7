//! Synchronous subprocess execution with inherited stdio

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::build::cmake::ComposedCommand;
use crate::error::FoundryError;

/// Result of a subprocess execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code, `128 + signal` when killed by a signal
    pub exit_code: i32,

    /// Execution duration
    pub duration: Duration,
}

impl ExecutionResult {
    /// Create an ExecutionResult from an exit status
    pub fn from_status(status: ExitStatus, duration: Duration) -> Self {
        Self {
            success: status.success(),
            exit_code: exit_code(status),
            duration,
        }
    }

    /// The child stopped because of a terminal interrupt (`128 + SIGINT`)
    pub fn interrupted(&self) -> bool {
        self.exit_code == INTERRUPTED_EXIT_CODE
    }
}

/// Shell convention for a process ended by SIGINT
pub const INTERRUPTED_EXIT_CODE: i32 = 128 + 2;

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Runs composed commands
///
/// A non-zero exit is a normal result. Only failing to start the program at
/// all is an error.
pub trait ProcessRunner {
    fn run(&mut self, command: &ComposedCommand) -> Result<ExecutionResult, FoundryError>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Resolve the program to an existing executable path
///
/// Programs with a directory component are checked as paths, bare names are
/// looked up on PATH.
pub fn resolve_program(program: &Path) -> Result<PathBuf, FoundryError> {
    let has_dir = program
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());

    if has_dir {
        if program.is_file() {
            Ok(program.to_path_buf())
        } else {
            Err(FoundryError::launch(
                program.display().to_string(),
                "no such file",
            ))
        }
    } else {
        which::which(program).map_err(|e| {
            FoundryError::launch(program.display().to_string(), format!("not found in PATH ({})", e))
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, command: &ComposedCommand) -> Result<ExecutionResult, FoundryError> {
        let program = resolve_program(command.program())?;
        tracing::debug!(program = %program.display(), args = ?command.args(), "spawning");

        let _interrupts = interrupt::InterruptGuard::install();
        let start = Instant::now();
        let status = Command::new(&program)
            .args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| launch_error(command.program(), e))?;

        let result = ExecutionResult::from_status(status, start.elapsed());
        tracing::debug!(
            program = %program.display(),
            exit_code = result.exit_code,
            elapsed_ms = result.duration.as_millis() as u64,
            "process finished"
        );
        Ok(result)
    }
}

fn launch_error(program: &Path, error: io::Error) -> FoundryError {
    FoundryError::launch(program.display().to_string(), error.to_string())
}

/// Ctrl-C handling while a child owns the terminal
///
/// The child shares foundry's foreground process group, so the terminal
/// delivers SIGINT and SIGQUIT to both. While the guard is alive foundry
/// catches them with a no-op handler and keeps waiting, so the child's own
/// exit status is what gets reported. Caught (not ignored) signals are reset
/// to their defaults across `exec`, so the child still reacts normally.
#[cfg(unix)]
mod interrupt {
    use nix::libc;
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    const FORWARDED: [Signal; 2] = [Signal::SIGINT, Signal::SIGQUIT];

    extern "C" fn wait_for_child(_: libc::c_int) {}

    pub struct InterruptGuard {
        previous: Vec<(Signal, SigAction)>,
    }

    impl InterruptGuard {
        pub fn install() -> Self {
            let action = SigAction::new(
                SigHandler::Handler(wait_for_child),
                SaFlags::SA_RESTART,
                SigSet::empty(),
            );

            let mut previous = Vec::with_capacity(FORWARDED.len());
            for signal in FORWARDED {
                // SAFETY: the handler is empty and therefore async-signal-safe.
                match unsafe { sigaction(signal, &action) } {
                    Ok(old) if old.handler() == SigHandler::SigIgn => {
                        // An ignored signal stays ignored for foundry and its child.
                        // SAFETY: restores a disposition the kernel just returned.
                        let _ = unsafe { sigaction(signal, &old) };
                    }
                    Ok(old) => previous.push((signal, old)),
                    Err(e) => tracing::warn!(?signal, error = %e, "cannot catch signal"),
                }
            }

            Self { previous }
        }
    }

    impl Drop for InterruptGuard {
        fn drop(&mut self) {
            for (signal, old) in self.previous.drain(..) {
                // SAFETY: restores a disposition the kernel returned earlier.
                if let Err(e) = unsafe { sigaction(signal, &old) } {
                    tracing::warn!(?signal, error = %e, "cannot restore signal handler");
                }
            }
        }
    }
}

#[cfg(not(unix))]
mod interrupt {
    /// Windows delivers Ctrl-C to every console process; nothing to set up
    pub struct InterruptGuard;

    impl InterruptGuard {
        pub fn install() -> Self {
            Self
        }
    }
}
