//! Toolchain detection and validation
//!
//! The environment is captured once per invocation into a
//! [`ToolchainEnvironment`] snapshot. [`ToolchainEnvironment::validate`] walks
//! the requirements in a fixed order and stops at the first one that is not
//! met.

use std::path::PathBuf;

use which::which;

use crate::error::{hints, FoundryError};

/// Variable naming the C++ compiler
pub const CXX_VAR: &str = "CXX";

/// Variable pointing at the vcpkg checkout
pub const VCPKG_ROOT_VAR: &str = "VCPKG_ROOT";

/// Executables that must be resolvable on PATH, in check order
pub const REQUIRED_TOOLS: [&str; 3] = ["cmake", "ninja", "vcpkg"];

/// Tool lookup result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Resolved executable, `None` when not on PATH
    pub path: Option<PathBuf>,
}

/// Read-only snapshot of everything compile depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnvironment {
    /// Value of `CXX`
    pub compiler: Option<String>,
    /// Value of `VCPKG_ROOT`
    pub vcpkg_root: Option<PathBuf>,
    /// PATH lookups for [`REQUIRED_TOOLS`]
    pub tools: Vec<ToolInfo>,
}

/// A validated environment, ready to configure with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler passed as `CMAKE_CXX_COMPILER`
    pub compiler: String,
    /// Root of the vcpkg checkout
    pub vcpkg_root: PathBuf,
}

/// Check if a tool exists on PATH
pub fn check_tool(tool_name: &str) -> ToolInfo {
    ToolInfo {
        name: tool_name.to_string(),
        path: which(tool_name).ok(),
    }
}

/// Get installation hint for a tool
fn get_tool_hint(tool_name: &str) -> &'static str {
    match tool_name {
        "cmake" => hints::cmake(),
        "ninja" => hints::ninja(),
        "vcpkg" => hints::vcpkg(),
        _ => "Install this tool and ensure it's in your PATH",
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl ToolchainEnvironment {
    /// Capture the current process environment
    pub fn capture() -> Self {
        let env = Self {
            compiler: non_empty_var(CXX_VAR),
            vcpkg_root: non_empty_var(VCPKG_ROOT_VAR).map(PathBuf::from),
            tools: REQUIRED_TOOLS.iter().map(|name| check_tool(name)).collect(),
        };
        tracing::debug!(?env, "captured toolchain environment");
        env
    }

    fn tool(&self, name: &str) -> Option<&PathBuf> {
        self.tools
            .iter()
            .find(|tool| tool.name == name)
            .and_then(|tool| tool.path.as_ref())
    }

    /// Check the requirements in order, failing on the first one missing:
    /// `CXX`, `cmake`, `ninja`, `vcpkg`, `VCPKG_ROOT`
    pub fn validate(&self) -> Result<Toolchain, FoundryError> {
        let compiler = self.compiler.clone().ok_or_else(|| {
            FoundryError::missing_dependency(format!("{} not set", CXX_VAR), hints::cxx())
        })?;

        for name in REQUIRED_TOOLS {
            match self.tool(name) {
                Some(path) => tracing::debug!(tool = name, path = %path.display(), "found tool"),
                None => {
                    return Err(FoundryError::missing_dependency(
                        format!("{} not in PATH", name),
                        get_tool_hint(name),
                    ))
                }
            }
        }

        let vcpkg_root = self.vcpkg_root.clone().ok_or_else(|| {
            FoundryError::missing_dependency(
                format!("{} not set", VCPKG_ROOT_VAR),
                hints::vcpkg_root(),
            )
        })?;

        Ok(Toolchain {
            compiler,
            vcpkg_root,
        })
    }
}
