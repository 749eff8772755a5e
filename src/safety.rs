//! Checkout boundary enforcement for mutation targets.
//!
//! A rewrite must only ever land inside the checkout being mutated, and
//! never inside its version-control metadata: a stray write into `.git`
//! corrupts the very repository the patch pipeline diffs against.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Validates that candidate mutation targets stay inside one checkout.
#[derive(Debug, Clone)]
pub struct CheckoutGuard {
    /// Canonicalized checkout root
    root: PathBuf,
    /// Canonical paths writes may never touch
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("path is outside the checkout: {path} (checkout: {root})")]
    OutsideCheckout { path: PathBuf, root: PathBuf },

    #[error("path is in a protected directory: {path} (protected: {forbidden})")]
    ProtectedPath { path: PathBuf, forbidden: PathBuf },

    #[error("failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl CheckoutGuard {
    /// Create a guard for the given checkout root.
    ///
    /// The root is canonicalized so symlinked checkouts behave; `.git` and
    /// `target` under the root are registered as protected.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let root = root.as_ref().canonicalize()?;

        let mut forbidden_paths = Vec::new();
        for name in [".git", "target"] {
            if let Ok(protected) = root.join(name).canonicalize() {
                forbidden_paths.push(protected);
            }
        }

        Ok(Self {
            root,
            forbidden_paths,
        })
    }

    /// Check that a candidate file may be mutated.
    ///
    /// Relative paths resolve against the checkout root; the canonicalized
    /// absolute path is returned when it passes.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        // Canonicalize to resolve symlinks and `..` components
        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.root) {
            return Err(SafetyError::OutsideCheckout {
                path: canonical,
                root: self.root.clone(),
            });
        }

        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ProtectedPath {
                    path: canonical,
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(canonical)
    }

    /// The canonicalized checkout root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn accepts_file_inside_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("src").join("lib.py");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"").unwrap();

        let guard = CheckoutGuard::new(dir.path()).unwrap();
        assert!(guard.validate_path(&file).is_ok());
        assert!(guard.validate_path("src/lib.py").is_ok());
    }

    #[test]
    fn rejects_file_outside_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let checkout = dir.path().join("checkout");
        fs::create_dir_all(&checkout).unwrap();
        let outside = dir.path().join("outside.py");
        fs::write(&outside, b"").unwrap();

        let guard = CheckoutGuard::new(&checkout).unwrap();
        let result = guard.validate_path(&outside);
        assert!(matches!(result, Err(SafetyError::OutsideCheckout { .. })));
    }

    #[test]
    fn rejects_git_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let git_file = dir.path().join(".git").join("config");
        fs::create_dir_all(git_file.parent().unwrap()).unwrap();
        fs::write(&git_file, b"").unwrap();

        let guard = CheckoutGuard::new(dir.path()).unwrap();
        let result = guard.validate_path(&git_file);
        assert!(matches!(result, Err(SafetyError::ProtectedPath { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn rejects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let checkout = dir.path().join("checkout");
        fs::create_dir_all(&checkout).unwrap();
        let outside = dir.path().join("outside.py");
        fs::write(&outside, b"").unwrap();

        let link = checkout.join("escape.py");
        symlink(&outside, &link).unwrap();

        let guard = CheckoutGuard::new(&checkout).unwrap();
        let result = guard.validate_path(&link);
        assert!(matches!(result, Err(SafetyError::OutsideCheckout { .. })));
    }
}
