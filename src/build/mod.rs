//! Build configurations and the on-disk project layout
//!
//! Every build directory path is derived here from the project root and a
//! concrete [`Configuration`]. `All` only exists as a [`ConfigurationSelection`]
//! and has to be expanded before it can name a directory or a build type.

pub mod cmake;
pub mod dirs;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::config::FoundryConfig;

/// Name of the directory holding all per-configuration build trees
pub const BUILD_ROOT_DIR: &str = "build";

/// A concrete CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Configuration {
    #[value(name = "Debug")]
    Debug,
    #[value(name = "Release")]
    Release,
}

impl Configuration {
    /// CMake build type string, case preserved
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }

    /// Lower-cased label used as the build directory name
    pub fn dir_name(&self) -> &'static str {
        match self {
            Configuration::Debug => "debug",
            Configuration::Release => "release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Configuration argument of actions that accept `All`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigurationSelection {
    #[value(name = "Debug")]
    Debug,
    #[value(name = "Release")]
    Release,
    #[value(name = "All")]
    All,
}

impl ConfigurationSelection {
    /// Expand into concrete configurations, Debug first
    pub fn expand(self) -> Vec<Configuration> {
        match self {
            ConfigurationSelection::Debug => vec![Configuration::Debug],
            ConfigurationSelection::Release => vec![Configuration::Release],
            ConfigurationSelection::All => vec![Configuration::Debug, Configuration::Release],
        }
    }
}

impl fmt::Display for ConfigurationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationSelection::Debug => f.pad("Debug"),
            ConfigurationSelection::Release => f.pad("Release"),
            ConfigurationSelection::All => f.pad("All"),
        }
    }
}

/// Project root plus the settings that shape paths and commands
///
/// Built once at program entry and passed by reference to every component.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    config: FoundryConfig,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, config: FoundryConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Project source root (where CMakeLists.txt lives)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FoundryConfig {
        &self.config
    }

    /// `<root>/build`
    pub fn build_root(&self) -> PathBuf {
        self.root.join(BUILD_ROOT_DIR)
    }

    /// `<root>/build/<debug|release>`
    pub fn build_dir(&self, configuration: Configuration) -> PathBuf {
        self.build_root().join(configuration.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ProjectLayout {
        ProjectLayout::new("/work/libfoundation", FoundryConfig::default())
    }

    #[test]
    fn test_build_dir_is_lowercase_label_under_build() {
        let layout = layout();
        for configuration in [Configuration::Debug, Configuration::Release] {
            let expected = PathBuf::from("/work/libfoundation")
                .join("build")
                .join(configuration.as_str().to_lowercase());
            assert_eq!(layout.build_dir(configuration), expected);
        }
    }

    #[test]
    fn test_all_expands_to_debug_then_release() {
        assert_eq!(
            ConfigurationSelection::All.expand(),
            vec![Configuration::Debug, Configuration::Release]
        );
        assert_eq!(
            ConfigurationSelection::Release.expand(),
            vec![Configuration::Release]
        );
    }

    #[test]
    fn test_build_type_case_is_preserved() {
        assert_eq!(Configuration::Debug.to_string(), "Debug");
        assert_eq!(Configuration::Release.as_str(), "Release");
    }

    #[test]
    fn test_selection_parses_cli_names() {
        let all = ConfigurationSelection::from_str("All", false).unwrap();
        assert_eq!(all, ConfigurationSelection::All);
        let debug = ConfigurationSelection::from_str("debug", true).unwrap();
        assert_eq!(debug, ConfigurationSelection::Debug);
        assert!(Configuration::from_str("All", false).is_err());
    }
}
