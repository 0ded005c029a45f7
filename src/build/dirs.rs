//! Per-configuration build directory management
//!
//! Only directories computed by [`ProjectLayout::build_dir`] are ever touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{Configuration, ProjectLayout};
use crate::error::FoundryError;

/// Result of preparing one build directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDir {
    pub path: PathBuf,
    /// Bytes of previous contents removed (clean only)
    pub removed_bytes: Option<u64>,
    /// Whether the directory had to be created
    pub created: bool,
}

/// Delete the configuration's build directory if present, then recreate it empty
pub fn ensure_clean(
    layout: &ProjectLayout,
    configuration: Configuration,
) -> Result<PreparedDir, FoundryError> {
    let path = layout.build_dir(configuration);
    check_inside_build_root(layout, &path)?;

    let mut removed_bytes = None;
    if path.is_dir() {
        let size = dir_size(&path);
        tracing::info!(path = %path.display(), bytes = size, "deleting build directory");
        fs::remove_dir_all(&path).map_err(|e| FoundryError::directory(&path, "remove", e))?;
        removed_bytes = Some(size);
    } else if path.exists() {
        // A stray file where the directory belongs
        fs::remove_file(&path).map_err(|e| FoundryError::directory(&path, "remove", e))?;
    }

    tracing::info!(path = %path.display(), "creating build directory");
    fs::create_dir_all(&path).map_err(|e| FoundryError::directory(&path, "create", e))?;

    Ok(PreparedDir {
        path,
        removed_bytes,
        created: true,
    })
}

/// Create the configuration's build directory if it does not exist yet
///
/// Existing contents are kept so incremental builds stay incremental.
pub fn ensure_exists(
    layout: &ProjectLayout,
    configuration: Configuration,
) -> Result<PreparedDir, FoundryError> {
    let path = layout.build_dir(configuration);
    check_inside_build_root(layout, &path)?;

    if path.is_dir() {
        tracing::debug!(path = %path.display(), "build directory already exists");
        return Ok(PreparedDir {
            path,
            removed_bytes: None,
            created: false,
        });
    }

    if path.exists() {
        return Err(FoundryError::directory(
            &path,
            "create",
            io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
        ));
    }

    tracing::info!(path = %path.display(), "creating build directory");
    fs::create_dir_all(&path).map_err(|e| FoundryError::directory(&path, "create", e))?;

    Ok(PreparedDir {
        path,
        removed_bytes: None,
        created: true,
    })
}

/// Refuse anything that is not a direct child of `<root>/build`
fn check_inside_build_root(layout: &ProjectLayout, path: &Path) -> Result<(), FoundryError> {
    let build_root = layout.build_root();
    let is_direct_child = path.parent() == Some(build_root.as_path())
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| !name.is_empty() && name != "." && name != "..");

    if is_direct_child {
        Ok(())
    } else {
        Err(FoundryError::directory(
            path,
            "prepare",
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to touch a path outside {}", build_root.display()),
            ),
        ))
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

/// Human readable byte count
pub fn format_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FoundryConfig;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ProjectLayout) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(tmp.path(), FoundryConfig::default());
        (tmp, layout)
    }

    fn is_empty_dir(path: &Path) -> bool {
        path.is_dir() && fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn test_ensure_clean_creates_missing_directory() {
        let (_tmp, layout) = setup();

        let prepared = ensure_clean(&layout, Configuration::Debug).unwrap();

        assert_eq!(prepared.path, layout.build_dir(Configuration::Debug));
        assert_eq!(prepared.removed_bytes, None);
        assert!(is_empty_dir(&prepared.path));
    }

    #[test]
    fn test_ensure_clean_is_idempotent() {
        let (_tmp, layout) = setup();
        let dir = layout.build_dir(Configuration::Release);

        ensure_clean(&layout, Configuration::Release).unwrap();
        assert!(is_empty_dir(&dir));
        ensure_clean(&layout, Configuration::Release).unwrap();
        assert!(is_empty_dir(&dir));
    }

    #[test]
    fn test_ensure_clean_removes_previous_contents() {
        let (_tmp, layout) = setup();
        let dir = layout.build_dir(Configuration::Debug);
        fs::create_dir_all(dir.join("libfoundation")).unwrap();
        fs::write(dir.join("libfoundation/foundation-tests"), b"0123456789").unwrap();
        fs::write(dir.join("build.ninja"), b"rule cc").unwrap();

        let prepared = ensure_clean(&layout, Configuration::Debug).unwrap();

        assert_eq!(prepared.removed_bytes, Some(17));
        assert!(is_empty_dir(&dir));
    }

    #[test]
    fn test_ensure_clean_leaves_other_configuration_alone() {
        let (_tmp, layout) = setup();
        let release = layout.build_dir(Configuration::Release);
        fs::create_dir_all(&release).unwrap();
        fs::write(release.join("CMakeCache.txt"), b"cache").unwrap();

        ensure_clean(&layout, Configuration::Debug).unwrap();

        assert!(release.join("CMakeCache.txt").exists());
    }

    #[test]
    fn test_ensure_exists_keeps_existing_files() {
        let (_tmp, layout) = setup();
        let dir = layout.build_dir(Configuration::Debug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("CMakeCache.txt"), b"cache").unwrap();

        let prepared = ensure_exists(&layout, Configuration::Debug).unwrap();

        assert!(!prepared.created);
        assert_eq!(fs::read(dir.join("CMakeCache.txt")).unwrap(), b"cache");
    }

    #[test]
    fn test_ensure_exists_creates_missing_directory() {
        let (_tmp, layout) = setup();

        let prepared = ensure_exists(&layout, Configuration::Release).unwrap();

        assert!(prepared.created);
        assert!(prepared.path.is_dir());
    }

    #[test]
    fn test_ensure_exists_fails_when_build_root_is_a_file() {
        let (_tmp, layout) = setup();
        fs::write(layout.build_root(), b"not a directory").unwrap();

        let err = ensure_exists(&layout, Configuration::Debug).unwrap_err();

        assert!(matches!(err, FoundryError::DirectoryOperationFailed { .. }));
    }

    #[test]
    fn test_ensure_exists_refuses_file_at_build_dir_and_keeps_it() {
        let (_tmp, layout) = setup();
        let path = layout.build_dir(Configuration::Debug);
        fs::create_dir_all(layout.build_root()).unwrap();
        fs::write(&path, b"stray output").unwrap();

        let err = ensure_exists(&layout, Configuration::Debug).unwrap_err();

        match err {
            FoundryError::DirectoryOperationFailed {
                path: failed,
                operation,
                ..
            } => {
                assert_eq!(failed, path);
                assert_eq!(operation, "create");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(path.is_file());
        assert_eq!(fs::read(&path).unwrap(), b"stray output");
    }

    #[test]
    fn test_ensure_clean_replaces_file_at_build_dir() {
        let (_tmp, layout) = setup();
        let path = layout.build_dir(Configuration::Release);
        fs::create_dir_all(layout.build_root()).unwrap();
        fs::write(&path, b"stray output").unwrap();

        let prepared = ensure_clean(&layout, Configuration::Release).unwrap();

        assert_eq!(prepared.path, path);
        assert!(is_empty_dir(&path));
    }

    #[test]
    fn test_guard_rejects_paths_outside_build_root() {
        let (tmp, layout) = setup();
        assert!(check_inside_build_root(&layout, tmp.path()).is_err());
        assert!(check_inside_build_root(&layout, &layout.build_root()).is_err());
        assert!(check_inside_build_root(&layout, &layout.build_root().join("debug/nested")).is_err());
        assert!(check_inside_build_root(&layout, &layout.build_root().join("debug")).is_ok());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(2048), "2.00 KB");
    }
}
