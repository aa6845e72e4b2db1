//! CLI contract tests.
//!
//! These exercise the binary's failure paths that need no external tooling:
//! prerequisite checks must fail before anything under the project root is
//! modified.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn exprac_release() -> Command {
    Command::cargo_bin("exprac_release").expect("binary built")
}

/// Creates a minimal project root with a version file.
fn project_with_version(version: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("packaging")).expect("packaging dir");
    std::fs::write(dir.path().join("packaging/VERSION"), version).expect("version file");
    dir
}

#[test]
fn help_lists_all_subcommands() {
    exprac_release()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("appimage")
                .and(predicate::str::contains("windows"))
                .and(predicate::str::contains("release")),
        );
}

#[test]
fn windows_without_container_engine_fails_before_touching_dist() {
    let project = project_with_version("v1.3\n");

    // Scrubbed PATH: neither docker nor podman resolvable
    exprac_release()
        .args(["windows", "--project-root"])
        .arg(project.path())
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no container engine found"));

    assert!(
        !project.path().join("dist").exists(),
        "dist/ must not be created when the engine check fails"
    );
    assert!(
        !project.path().join("build").exists(),
        "build/ must not be touched when the engine check fails"
    );
}

#[test]
fn windows_without_version_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");

    exprac_release()
        .args(["windows", "--project-root"])
        .arg(dir.path())
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VERSION"));
}

#[test]
fn release_rejects_malformed_version_file() {
    // Missing the leading 'v'
    let project = project_with_version("1.3\n");

    exprac_release()
        .args(["release", "--project-root"])
        .arg(project.path())
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version tag"));

    // The malformed source is left as-is, not rewritten
    let content = std::fs::read_to_string(project.path().join("packaging/VERSION")).unwrap();
    assert_eq!(content, "1.3\n");
}

#[test]
fn rejects_nonexistent_project_root() {
    let project = project_with_version("v1.3\n");
    let missing = project.path().join("not-here");
    assert!(!Path::new(&missing).exists());

    exprac_release()
        .args(["windows", "--project-root"])
        .arg(&missing)
        .env("PATH", "")
        .assert()
        .failure();
}

#[test]
fn rejects_manifest_with_unknown_keys() {
    let project = project_with_version("v1.3\n");
    std::fs::write(
        project.path().join("packaging/exprac.toml"),
        "[package]\nproduct = \"typo\"\n",
    )
    .unwrap();

    exprac_release()
        .args(["windows", "--project-root"])
        .arg(project.path())
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest error"));
}
