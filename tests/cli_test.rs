//! Integration tests for the foundry binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to run foundry against a project root
fn foundry(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("foundry").expect("foundry binary should be built");
    cmd.arg("--no-color")
        .arg("--root")
        .arg(root)
        .env_remove("FOUNDRY_ROOT")
        .env_remove("FOUNDRY_LOG");
    cmd
}

fn is_empty_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_help_lists_subcommands() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("run_test"))
        .stdout(predicate::str::contains("run_benchmarks"));
}

#[test]
fn test_clean_all_creates_empty_directories() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .args(["clean", "All"])
        .assert()
        .success();

    assert!(is_empty_dir(&project.path().join("build/debug")));
    assert!(is_empty_dir(&project.path().join("build/release")));
}

#[test]
fn test_clean_twice_succeeds() {
    let project = TempDir::new().unwrap();
    let debug = project.path().join("build/debug");

    foundry(project.path()).args(["clean", "Debug"]).assert().success();
    fs::write(debug.join("build.ninja"), "rule cc\n").unwrap();
    foundry(project.path()).args(["clean", "Debug"]).assert().success();

    assert!(is_empty_dir(&debug));
    assert!(!project.path().join("build/release").exists());
}

#[test]
fn test_clean_rejects_unknown_configuration() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .args(["clean", "Profile"])
        .assert()
        .failure();

    assert!(!project.path().join("build").exists());
}

#[test]
fn test_compile_without_compiler_fails_before_any_work() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .args(["compile", "Release"])
        .env_remove("CXX")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing toolchain dependency: CXX not set"));

    assert!(!project.path().join("build").exists());
}

#[test]
fn test_run_test_requires_single_configuration() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .args(["run_test", "All"])
        .assert()
        .failure();
}

#[test]
fn test_run_test_without_build_is_launch_failure() {
    let project = TempDir::new().unwrap();

    foundry(project.path())
        .args(["run_test", "Debug"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to launch"))
        .stderr(predicate::str::contains("foundation-tests"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("Foundry.toml"), "[artifacts\n").unwrap();

    foundry(project.path())
        .args(["clean", "Debug"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Install a shell script where the build would put an artifact
    fn stub_binary(path: &Path, exit_code: i32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!("#!/bin/sh\necho \"stub args: $*\"\nexit {}\n", exit_code),
        )
        .unwrap();
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn test_run_test_passes_filter_and_exit_code() {
        let project = TempDir::new().unwrap();
        stub_binary(
            &project.path().join("build/debug/libfoundation/foundation-tests"),
            7,
        );

        foundry(project.path())
            .args(["run_test", "Debug", "--filter", "Foo*"])
            .assert()
            .code(7)
            .stdout(predicate::str::contains("stub args: --gtest_filter=Foo*"));
    }

    #[test]
    fn test_run_test_accepts_negative_filter() {
        let project = TempDir::new().unwrap();
        stub_binary(
            &project.path().join("build/debug/libfoundation/foundation-tests"),
            0,
        );

        foundry(project.path())
            .args(["run_test", "Debug", "--filter", "-Slow.*"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stub args: --gtest_filter=-Slow.*"));
    }

    #[test]
    fn test_run_benchmarks_without_filter_passes_no_arguments() {
        let project = TempDir::new().unwrap();
        stub_binary(
            &project
                .path()
                .join("build/release/libfoundation/foundation-benchmarks"),
            0,
        );

        foundry(project.path())
            .args(["run_benchmarks", "Release"])
            .assert()
            .success()
            .stdout(predicate::str::contains("stub args: \n"));
    }

    #[test]
    fn test_artifact_names_come_from_config_file() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("Foundry.toml"),
            "[artifacts]\ndir = \"bin\"\ntest_binary = \"unit-tests\"\n",
        )
        .unwrap();
        stub_binary(&project.path().join("build/release/bin/unit-tests"), 0);

        foundry(project.path())
            .args(["run_test", "Release", "-f", "Heap*"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--gtest_filter=Heap*"));
    }
}
