//! Error types and helpers for user-friendly error messages
//!
//! Every failure the orchestrator can hit maps onto one variant here, and
//! each variant knows how to print an actionable hint.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or launching a build step
#[derive(Error, Debug)]
pub enum FoundryError {
    /// An environment precondition for compiling is not met
    #[error("Missing toolchain dependency: {requirement}")]
    MissingToolchainDependency {
        requirement: String,
        hint: &'static str,
    },

    /// Creating or removing a build directory failed
    #[error("Failed to {operation} {}: {source}", .path.display())]
    DirectoryOperationFailed {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// The program of a composed command could not be started
    #[error("Failed to launch {program}: {reason}")]
    ProcessLaunchFailed { program: String, reason: String },

    /// An external tool ran and exited with a non-zero status
    #[error("{step} failed for {configuration} (exit code {code})")]
    ExternalCommandFailed {
        step: String,
        configuration: String,
        code: i32,
    },

    /// Foundry.toml could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl FoundryError {
    /// Create a missing toolchain dependency error
    pub fn missing_dependency(requirement: impl Into<String>, hint: &'static str) -> Self {
        Self::MissingToolchainDependency {
            requirement: requirement.into(),
            hint,
        }
    }

    /// Create a directory operation error
    pub fn directory(path: impl Into<PathBuf>, operation: &'static str, source: io::Error) -> Self {
        Self::DirectoryOperationFailed {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a process launch error
    pub fn launch(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProcessLaunchFailed {
            program: program.into(),
            reason: reason.into(),
        }
    }

    fn hint(&self) -> Option<&str> {
        match self {
            FoundryError::MissingToolchainDependency { hint, .. } => Some(*hint),
            FoundryError::DirectoryOperationFailed { .. } => Some(hints::directory()),
            FoundryError::ProcessLaunchFailed { .. } => Some(hints::launch()),
            FoundryError::ExternalCommandFailed { .. } => None,
            FoundryError::Config { .. } => Some(hints::foundry_toml()),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let Some(hint) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for an unset CXX variable
    pub fn cxx() -> &'static str {
        "Set CXX to the C++ compiler to build with, for example:\n\
         • export CXX=clang++\n\
         • export CXX=/usr/bin/g++"
    }

    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake"
    }

    /// Get hint for missing Ninja
    pub fn ninja() -> &'static str {
        "Install Ninja from https://ninja-build.org/ or use your package manager:\n\
         • macOS: brew install ninja\n\
         • Ubuntu: sudo apt install ninja-build\n\
         • Windows: winget install Ninja-build.Ninja"
    }

    /// Get hint for missing vcpkg
    pub fn vcpkg() -> &'static str {
        "Install vcpkg and add it to your PATH:\n\
         1. git clone https://github.com/microsoft/vcpkg\n\
         2. ./vcpkg/bootstrap-vcpkg.sh\n\
         3. export PATH=\"$PWD/vcpkg:$PATH\""
    }

    /// Get hint for an unset VCPKG_ROOT variable
    pub fn vcpkg_root() -> &'static str {
        "Set VCPKG_ROOT to your vcpkg checkout so the toolchain file\n\
         scripts/buildsystems/vcpkg.cmake can be found:\n\
         • export VCPKG_ROOT=$HOME/vcpkg"
    }

    /// Get hint for directory failures
    pub fn directory() -> &'static str {
        "Check that the build/ directory is writable and not held open by\n\
         another process (another foundry run, an IDE, a shell)."
    }

    /// Get hint for a program that could not be launched
    pub fn launch() -> &'static str {
        "The executable was not found. If this is a test or benchmark binary,\n\
         build it first:\n\
         • Run: foundry compile <Debug|Release>"
    }

    /// Get hint for invalid Foundry.toml
    pub fn foundry_toml() -> &'static str {
        "Foundry.toml is invalid. Supported sections:\n\
         • [artifacts] dir, test_binary, benchmark_binary\n\
         • [cmake.variables] NAME = \"VALUE\""
    }
}
