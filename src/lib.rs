//! Faultline: multi-language fault injection through structural rewrites.
//!
//! A pipeline for synthesizing controlled code mutations built on three
//! primitives: grammar-based entity extraction, line-range splicing, and
//! git patch capture/validation.
//!
//! # Architecture
//!
//! Extraction walks a file tree, parses each recognized source file with
//! its tree-sitter grammar, and collects [`CodeEntity`] values: functions,
//! methods, and constructors with exact location and indentation metadata.
//! An external proposer turns an entity into a [`BugRewrite`];
//! [`apply_code_change`] splices the replacement over the entity's line
//! range preserving the file's formatting; the [`repo`] module captures the
//! resulting diff as a patch, composes several patches into one, and
//! validates that the composition applies cleanly, rolling back the
//! checkout on any failure.
//!
//! # Safety
//!
//! - Whole-file rewrites are atomic (tempfile + fsync + rename)
//! - Checkout boundary enforcement for mutation targets
//! - Failed multi-patch application never leaves partial state behind
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), faultline::ChangeError> {
//! use faultline::{apply_code_change, extract_entities_from_directory, BugRewrite};
//! use std::path::Path;
//!
//! let entities = extract_entities_from_directory(Path::new("checkout"), true, None);
//! for entity in &entities {
//!     let bug = BugRewrite::stub_of(entity);
//!     apply_code_change(entity, &bug.rewrite)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod change;
pub mod combos;
pub mod entity;
pub mod extract;
pub mod pool;
pub mod repo;
pub mod safety;
pub mod ts;

// Re-exports
pub use change::{apply_code_change, ChangeError};
pub use combos::combos;
pub use entity::{bug_artifact_dir, BugRewrite, CodeEntity};
pub use extract::extract_entities_from_directory;
pub use repo::{apply_patches, get_patch, RepoError, TEMP_PATCH};
pub use safety::{CheckoutGuard, SafetyError};
pub use ts::{extract_from_file, EntityParser, GrammarError, Lang};
