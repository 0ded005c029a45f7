//! Foundry.toml parsing
//!
//! The file is optional. Without it the libfoundation defaults apply:
//! artifacts live in `libfoundation/` inside each build directory and are
//! named `foundation-tests` and `foundation-benchmarks`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::FoundryError;

/// File name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "Foundry.toml";

/// Root structure of Foundry.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FoundryConfig {
    /// Locations of the test and benchmark executables
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// Extra CMake configure settings
    #[serde(default)]
    pub cmake: CMakeSection,
}

/// Where the built test and benchmark binaries are found
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Subdirectory of the build directory holding the binaries
    #[serde(default = "default_artifacts_dir")]
    pub dir: String,

    /// GoogleTest runner name
    #[serde(default = "default_test_binary")]
    pub test_binary: String,

    /// Google Benchmark runner name
    #[serde(default = "default_benchmark_binary")]
    pub benchmark_binary: String,
}

fn default_artifacts_dir() -> String {
    "libfoundation".to_string()
}

fn default_test_binary() -> String {
    "foundation-tests".to_string()
}

fn default_benchmark_binary() -> String {
    "foundation-benchmarks".to_string()
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            test_binary: default_test_binary(),
            benchmark_binary: default_benchmark_binary(),
        }
    }
}

/// `[cmake]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CMakeSection {
    /// Additional `-D<NAME>=<VALUE>` definitions, passed in name order
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl FoundryConfig {
    /// Load `Foundry.toml` from the project root, falling back to defaults
    /// when the file does not exist
    pub fn load(project_root: &Path) -> Result<Self, FoundryError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, project_root.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| FoundryError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|message| FoundryError::Config {
            path: path.clone(),
            message,
        })?;
        config.validate().map_err(|message| FoundryError::Config { path, message })?;

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Reject values that would produce a broken path or argument
    fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("artifacts.test_binary", &self.artifacts.test_binary),
            ("artifacts.benchmark_binary", &self.artifacts.benchmark_binary),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", key));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(format!("{} must be a file name, got '{}'", key, value));
            }
        }

        if Path::new(&self.artifacts.dir).is_absolute() {
            return Err(format!(
                "artifacts.dir must be relative to the build directory, got '{}'",
                self.artifacts.dir
            ));
        }

        for name in self.cmake.variables.keys() {
            if name.is_empty() || name.contains('=') || name.chars().any(char::is_whitespace) {
                return Err(format!("invalid CMake variable name '{}'", name));
            }
        }

        Ok(())
    }
}
