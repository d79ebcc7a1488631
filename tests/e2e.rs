//! End-to-end tests for the jszip CLI
//!
//! These tests run the actual binary against a manifest on disk.

mod common;

use common::*;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn jszip_bin() -> &'static str {
    env!("CARGO_BIN_EXE_jszip")
}

fn run_jszip(dir: &Path, args: &[&str]) -> Output {
    Command::new(jszip_bin())
        .current_dir(dir)
        .env_remove("JSZIP_MANIFEST")
        .env_remove("JSZIP_FINAL_NAME")
        .env_remove("JSZIP_INCLUDE_EMPTY_DIRS")
        .env_remove("JSZIP_FORCE_CREATION")
        .args(args)
        .output()
        .expect("Failed to execute jszip")
}

/// Project with one runtime jszip dependency and some content.
fn create_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write_file(&root.join("pom.xml"), POM_XML);
    write_file(&root.join("src/main/js/app.js"), "app();");
    write_zip(
        &root.join("repo/lib-2.1.zip"),
        &[("lib/", ""), ("lib/lib.js", "lib();")],
    );
    write_zip(&root.join("repo/tool-1.0.zip"), &[("tool.js", "tool();")]);
    write_file(
        &root.join("jszip.toml"),
        r#"
[project]
group_id = "com.example"
artifact_id = "widgets"
version = "1.0"

[build]
final_name = "widgets"

[[dependency]]
group_id = "org.example"
artifact_id = "lib"
version = "2.1"
type = "jszip"
scope = "runtime"
file = "repo/lib-2.1.zip"

[[dependency]]
group_id = "org.example"
artifact_id = "tool"
version = "1.0"
type = "jszip"
scope = "test"
file = "repo/tool-1.0.zip"
"#,
    );
    dir
}

#[test]
fn test_help() {
    let output = Command::new(jszip_bin()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unpack"));
    assert!(stdout.contains("package"));
}

#[test]
fn test_unpack_command() {
    let dir = create_workspace();
    let output = run_jszip(dir.path(), &["unpack"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let target = dir.path().join("target/widgets");
    assert_eq!(
        std::fs::read_to_string(target.join("lib/lib.js")).unwrap(),
        "lib();"
    );
    assert!(!target.join("tool.js").exists());
}

#[test]
fn test_unpack_command_with_excludes() {
    let dir = create_workspace();
    let output = run_jszip(
        dir.path(),
        &["unpack", "--target-dir", "staging", "--excludes", "lib/"],
    );
    assert!(output.status.success());
    assert!(dir.path().join("staging").is_dir());
    assert!(!dir.path().join("staging/lib/lib.js").exists());
    assert!(!dir.path().join("staging/lib").exists());
}

#[test]
fn test_package_command() {
    let dir = create_workspace();
    let output = run_jszip(dir.path(), &["package", "--classifier", "min"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let zip = dir.path().join("target/widgets-min.zip");
    let entries = zip_entries(&zip);
    assert!(entries.contains(&"app.js".to_string()));
    assert!(entries.contains(&"META-INF/maven/com.example/widgets/pom.properties".to_string()));
}

#[test]
fn test_deps_command_marks_selection() {
    let dir = create_workspace();
    let output = run_jszip(dir.path(), &["deps"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 of 2 dependencies selected"));
    assert!(stdout.contains("org.example:lib:jszip:2.1:runtime"));
}

#[test]
fn test_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_jszip(dir.path(), &["unpack"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jszip.toml"), "stderr: {stderr}");
}

#[test]
fn test_package_without_descriptor_reports_cause() {
    let dir = create_workspace();
    std::fs::remove_file(dir.path().join("pom.xml")).unwrap();

    let output = run_jszip(dir.path(), &["package"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error assembling ZIP"), "stderr: {stderr}");
    assert!(stderr.contains("pom.xml"), "stderr: {stderr}");
    assert!(!dir.path().join("target/widgets.zip").exists());
}
