//! Patch capture and multi-patch composition against throwaway git repos.

use faultline::{apply_patches, get_patch, RepoError, TEMP_PATCH};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed in {repo:?}");
}

/// Create a repository with one committed file and a clean tree.
fn init_repo(dir: &TempDir) -> PathBuf {
    let repo = dir.path().join("checkout");
    fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);
    git(&repo, &["config", "user.email", "ci@example.com"]);
    git(&repo, &["config", "user.name", "ci"]);
    fs::write(repo.join("app.py"), "def run():\n    return 1\n").unwrap();
    fs::write(repo.join("lib.py"), "def helper():\n    return 2\n").unwrap();
    git(&repo, &["add", "-A"]);
    git(&repo, &["commit", "-q", "-m", "init"]);
    repo
}

fn porcelain_status(repo: &Path) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["status", "--porcelain"])
        .output()
        .expect("failed to run git");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn clean_tree_yields_no_patch() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    let patch = get_patch(&repo, false).unwrap();
    assert!(patch.is_none());
    assert!(porcelain_status(&repo).is_empty());
}

#[test]
fn captured_patch_reflects_working_tree() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    fs::write(repo.join("app.py"), "def run():\n    return 99\n").unwrap();
    let patch = get_patch(&repo, false).unwrap().expect("expected a patch");

    assert!(patch.contains("-    return 1"));
    assert!(patch.contains("+    return 99"));
    // reset_changes=false leaves the re-applied changes in the tree
    let content = fs::read_to_string(repo.join("app.py")).unwrap();
    assert_eq!(content, "def run():\n    return 99\n");
    // transient patch file is cleaned up
    assert!(!repo.join(TEMP_PATCH).exists());
}

#[test]
fn reset_changes_leaves_pristine_tree() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    fs::write(repo.join("app.py"), "def run():\n    return 99\n").unwrap();
    fs::write(repo.join("scratch.txt"), "untracked\n").unwrap();
    let patch = get_patch(&repo, true).unwrap().expect("expected a patch");

    assert!(patch.contains("scratch.txt"));
    let content = fs::read_to_string(repo.join("app.py")).unwrap();
    assert_eq!(content, "def run():\n    return 1\n");
    assert!(!repo.join("scratch.txt").exists());
    assert!(porcelain_status(&repo).is_empty());
}

#[test]
fn patches_compose_into_one_validated_patch() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    fs::write(repo.join("app.py"), "def run():\n    return 99\n").unwrap();
    let first = get_patch(&repo, true).unwrap().unwrap();

    fs::write(repo.join("lib.py"), "def helper():\n    return -2\n").unwrap();
    let second = get_patch(&repo, true).unwrap().unwrap();

    let patch_a = dir.path().join("first.patch");
    let patch_b = dir.path().join("second.patch");
    fs::write(&patch_a, &first).unwrap();
    fs::write(&patch_b, &second).unwrap();

    let combined = apply_patches(&repo, &[patch_a, patch_b])
        .unwrap()
        .expect("patches should compose");

    assert!(combined.contains("app.py"));
    assert!(combined.contains("lib.py"));
    assert!(combined.contains("+    return 99"));
    assert!(combined.contains("+    return -2"));

    // tree is rolled back to pristine after composition
    assert!(porcelain_status(&repo).is_empty());
    let content = fs::read_to_string(repo.join("app.py")).unwrap();
    assert_eq!(content, "def run():\n    return 1\n");
}

#[test]
fn failing_patch_rolls_back_everything() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    fs::write(repo.join("app.py"), "def run():\n    return 99\n").unwrap();
    let good = get_patch(&repo, true).unwrap().unwrap();

    let patch_good = dir.path().join("good.patch");
    let patch_bad = dir.path().join("bad.patch");
    fs::write(&patch_good, &good).unwrap();
    fs::write(&patch_bad, "this is not a unified diff\n").unwrap();

    let result = apply_patches(&repo, &[patch_good, patch_bad]).unwrap();
    assert!(result.is_none());

    // the first patch must not remain half-applied
    assert!(porcelain_status(&repo).is_empty());
    let content = fs::read_to_string(repo.join("app.py")).unwrap();
    assert_eq!(content, "def run():\n    return 1\n");
    assert!(!repo.join(TEMP_PATCH).exists());
}

#[test]
fn conflicting_patches_are_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = init_repo(&dir);

    fs::write(repo.join("app.py"), "def run():\n    return 99\n").unwrap();
    let patch = get_patch(&repo, true).unwrap().unwrap();

    let patch_a = dir.path().join("a.patch");
    let patch_b = dir.path().join("b.patch");
    fs::write(&patch_a, &patch).unwrap();
    fs::write(&patch_b, &patch).unwrap();

    // the same patch twice: the second apply fails against the mutated tree
    let result = apply_patches(&repo, &[patch_a, patch_b]).unwrap();
    assert!(result.is_none());
    assert!(porcelain_status(&repo).is_empty());
}

#[test]
fn non_repository_is_rejected() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("plain");
    fs::create_dir_all(&plain).unwrap();

    assert!(matches!(
        get_patch(&plain, false),
        Err(RepoError::InvalidRepository(_))
    ));
    assert!(matches!(
        apply_patches(&plain, &[]),
        Err(RepoError::InvalidRepository(_))
    ));
}
