//! CMake command composition
//!
//! Builds the argument vectors for the configure, build, test-run and
//! benchmark-run steps. Nothing here touches the filesystem or spawns
//! processes; the commands are handed to [`crate::exec::ProcessRunner`].

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use super::{Configuration, ProjectLayout};
use crate::utils::tools::Toolchain;

/// CMake executable name
pub const CMAKE: &str = "cmake";

/// Single-config generator producing a dependency-ordered build
pub const GENERATOR: &str = "Ninja";

/// Toolchain file inside the vcpkg root
const VCPKG_TOOLCHAIN_FILE: [&str; 3] = ["scripts", "buildsystems", "vcpkg.cmake"];

/// A fully formed external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ComposedCommand {
    pub(crate) fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for ComposedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// `<vcpkg_root>/scripts/buildsystems/vcpkg.cmake`
pub fn vcpkg_toolchain_file(vcpkg_root: &Path) -> PathBuf {
    VCPKG_TOOLCHAIN_FILE
        .iter()
        .fold(vcpkg_root.to_path_buf(), |path, part| path.join(part))
}

/// CMake configure step for one configuration
pub fn compose_configure(
    layout: &ProjectLayout,
    toolchain: &Toolchain,
    configuration: Configuration,
) -> ComposedCommand {
    let mut args = vec![
        OsString::from("-G"),
        OsString::from(GENERATOR),
        define("CMAKE_CXX_COMPILER", &toolchain.compiler),
        define("CMAKE_BUILD_TYPE", configuration.as_str()),
        define("CMAKE_EXPORT_COMPILE_COMMANDS", "ON"),
        define(
            "CMAKE_TOOLCHAIN_FILE",
            vcpkg_toolchain_file(&toolchain.vcpkg_root),
        ),
    ];

    for (name, value) in &layout.config().cmake.variables {
        args.push(define(name, value));
    }

    args.push(OsString::from("-S"));
    args.push(layout.root().as_os_str().to_os_string());
    args.push(OsString::from("-B"));
    args.push(layout.build_dir(configuration).into_os_string());

    ComposedCommand::new(CMAKE, args)
}

/// `-D<name>=<value>` without going through a lossy string conversion
fn define(name: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut arg = OsString::from(format!("-D{}=", name));
    arg.push(value);
    arg
}

/// CMake build step against an already configured directory
pub fn compose_build(build_dir: &Path) -> ComposedCommand {
    ComposedCommand::new(
        CMAKE,
        vec![OsString::from("--build"), build_dir.as_os_str().to_os_string()],
    )
}

/// GoogleTest runner with an optional `--gtest_filter`
pub fn compose_test_run(
    layout: &ProjectLayout,
    build_dir: &Path,
    pattern: Option<&str>,
) -> ComposedCommand {
    let artifacts = &layout.config().artifacts;
    compose_artifact_run(
        build_dir.join(&artifacts.dir).join(&artifacts.test_binary),
        "--gtest_filter",
        pattern,
    )
}

/// Google Benchmark runner with an optional `--benchmark_filter`
pub fn compose_benchmark_run(
    layout: &ProjectLayout,
    build_dir: &Path,
    pattern: Option<&str>,
) -> ComposedCommand {
    let artifacts = &layout.config().artifacts;
    compose_artifact_run(
        build_dir.join(&artifacts.dir).join(&artifacts.benchmark_binary),
        "--benchmark_filter",
        pattern,
    )
}

fn compose_artifact_run(program: PathBuf, filter_flag: &str, pattern: Option<&str>) -> ComposedCommand {
    let args = match pattern {
        Some(pattern) if !pattern.is_empty() => {
            vec![OsString::from(format!("{}={}", filter_flag, pattern))]
        }
        _ => Vec::new(),
    };
    ComposedCommand::new(program, args)
}
