//! Shared test helpers for mergeline integration tests.
//!
//! All tests use temp directories, so nothing touches the real repo.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub const TWO_WAY: &str = "\
header
<<<<<<< HEAD
ours line
=======
theirs line
>>>>>>> feature
middle
<<<<<<< HEAD
second ours
=======
second theirs
>>>>>>> feature
footer
";

/// Write `text` to `name` inside a fresh temp directory
pub fn temp_file(name: &str, text: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, text).expect("failed to write test file");
    (dir, path)
}

/// Run the mergeline binary in `dir`
pub fn mergeline_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mergeline"))
        .args(args)
        .current_dir(dir)
        .env_remove("MERGELINE_LOG")
        .output()
        .expect("failed to run mergeline")
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Run git in `dir` with user config isolated from the machine
pub fn git(dir: &Path, args: &[&str]) -> Output {
    Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "merge.conflictStyle=merge", "-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .output()
        .expect("failed to run git")
}

pub fn git_ok(dir: &Path, args: &[&str]) {
    let out = git(dir, args);
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Create a repo where merging `feature` into `main` conflicts in `file.txt`.
///
/// The merge is left in progress.
pub fn setup_conflicted_repo() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    let root = dir.path();

    git_ok(root, &["init", "-q"]);
    git_ok(root, &["checkout", "-q", "-b", "main"]);
    std::fs::write(root.join("file.txt"), "start\nshared\nend\n").unwrap();
    git_ok(root, &["add", "file.txt"]);
    git_ok(root, &["commit", "-q", "-m", "base"]);

    git_ok(root, &["checkout", "-q", "-b", "feature"]);
    std::fs::write(root.join("file.txt"), "start\nfrom feature\nend\n").unwrap();
    git_ok(root, &["commit", "-q", "-am", "feature change"]);

    git_ok(root, &["checkout", "-q", "main"]);
    std::fs::write(root.join("file.txt"), "start\nfrom main\nend\n").unwrap();
    git_ok(root, &["commit", "-q", "-am", "main change"]);

    let out = git(root, &["merge", "feature"]);
    assert!(!out.status.success(), "merge was expected to conflict");

    dir
}
