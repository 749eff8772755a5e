use crate::repo::errors::RepoError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Fixed, well-known patch file name inside the repository root, used
/// transiently while validating a captured diff. Must not collide with
/// tracked content.
pub const TEMP_PATCH: &str = ".faultline.patch";

/// Capture the working tree's changes relative to the last clean commit.
///
/// Stages everything and reads the staged diff. An empty diff returns
/// `Ok(None)` without touching the tree. Otherwise the tree is reset to the
/// clean state and the captured diff is re-applied through `git apply`;
/// the round-trip guards against whitespace and line-ending normalization
/// drift between what was diffed and what a later apply would produce.
/// With `reset_changes` the re-applied changes are discarded again, leaving
/// the tree pristine while the patch text is returned.
pub fn get_patch(repo: &Path, reset_changes: bool) -> Result<Option<String>, RepoError> {
    if !is_git_repo(repo) {
        return Err(RepoError::InvalidRepository(repo.to_path_buf()));
    }

    git(repo, &["add", "-A"])?;
    let patch = git_capture(repo, &["diff", "--staged"])?;
    if patch.trim().is_empty() {
        return Ok(None);
    }

    git(repo, &["restore", "--staged", "."])?;
    git(repo, &["reset", "--hard"])?;
    git(repo, &["clean", "-fdx"])?;

    let _temp = TempPatch::write(repo, &patch)?;
    git(repo, &["apply", TEMP_PATCH])?;

    if reset_changes {
        git(repo, &["reset", "--hard"])?;
        git(repo, &["clean", "-fdx"])?;
    }

    Ok(Some(patch))
}

/// Apply `patch_files` in order and return the combined patch.
///
/// Any single failed apply aborts the whole operation with `Ok(None)`; a
/// hard reset plus clean runs unconditionally on every exit path, so the
/// tree never retains a partial multi-patch application. On success the
/// combined patch is captured and then re-validated in isolation against
/// the pristine tree (patches that individually apply can still conflict
/// once merged).
pub fn apply_patches(repo: &Path, patch_files: &[PathBuf]) -> Result<Option<String>, RepoError> {
    if !is_git_repo(repo) {
        return Err(RepoError::InvalidRepository(repo.to_path_buf()));
    }

    let outcome = compose_patches(repo, patch_files);
    rollback(repo)?;

    match outcome {
        Ok(combined) => Ok(combined),
        Err(RepoError::Command { args, code }) => {
            debug!(%args, ?code, "patch composition failed, tree rolled back");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

fn compose_patches(repo: &Path, patch_files: &[PathBuf]) -> Result<Option<String>, RepoError> {
    for patch_file in patch_files {
        // Absolute path: git resolves apply arguments relative to the
        // repository, not our caller.
        let absolute = std::path::absolute(patch_file)?;
        if !git_ok(repo, &["apply", &absolute.to_string_lossy()])? {
            debug!(patch = %absolute.display(), "patch failed to apply");
            return Ok(None);
        }
    }

    let Some(combined) = get_patch(repo, true)? else {
        return Ok(None);
    };

    // Sanity check that the merged patch applies cleanly on its own.
    let _temp = TempPatch::write(repo, &combined)?;
    if !git_ok(repo, &["apply", TEMP_PATCH])? {
        debug!("combined patch does not apply in isolation");
        return Ok(None);
    }

    Ok(Some(combined))
}

fn rollback(repo: &Path) -> Result<(), RepoError> {
    git(repo, &["reset", "--hard"])?;
    git(repo, &["clean", "-fdx"])
}

fn is_git_repo(repo: &Path) -> bool {
    repo.is_dir() && git_ok(repo, &["status"]).unwrap_or(false)
}

/// Run a git command against `repo`, requiring success.
fn git(repo: &Path, args: &[&str]) -> Result<(), RepoError> {
    let status = run_git(repo, args)?;
    if status.success() {
        Ok(())
    } else {
        Err(RepoError::Command {
            args: args.join(" "),
            code: status.code(),
        })
    }
}

/// Run a git command against `repo`, reporting success as a bool.
fn git_ok(repo: &Path, args: &[&str]) -> Result<bool, RepoError> {
    Ok(run_git(repo, args)?.success())
}

fn run_git(repo: &Path, args: &[&str]) -> Result<std::process::ExitStatus, RepoError> {
    Ok(Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?)
}

/// Run a git command against `repo`, capturing stdout.
fn git_capture(repo: &Path, args: &[&str]) -> Result<String, RepoError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(RepoError::Command {
            args: args.join(" "),
            code: output.status.code(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Scoped temp patch file: removed on every exit path.
struct TempPatch {
    path: PathBuf,
}

impl TempPatch {
    fn write(repo: &Path, patch: &str) -> Result<Self, RepoError> {
        let path = repo.join(TEMP_PATCH);
        fs::write(&path, patch)?;
        Ok(Self { path })
    }
}

impl Drop for TempPatch {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_patch_rejects_non_repository() {
        let dir = TempDir::new().unwrap();
        let result = get_patch(dir.path(), false);
        assert!(matches!(result, Err(RepoError::InvalidRepository(_))));
    }

    #[test]
    fn apply_patches_rejects_missing_directory() {
        let result = apply_patches(Path::new("/nonexistent/checkout"), &[]);
        assert!(matches!(result, Err(RepoError::InvalidRepository(_))));
    }
}
