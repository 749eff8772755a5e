//! Language-agnostic representation of extracted code units.
//!
//! Entities are plain data: location, indentation metrics, and the derived
//! name/signature/complexity are all computed at extraction time, so no
//! parse-tree handle outlives the extraction pass.

use crate::ts::lang::Lang;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// One extracted syntactic unit (function, method, or constructor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntity {
    pub file_path: PathBuf,
    /// 1-based inclusive line span of the unit in its file.
    pub line_start: usize,
    pub line_end: usize,
    /// Nesting depth of the unit, in indent units.
    pub indent_level: usize,
    /// Characters per indent unit: 1 for tab-indented code, else the
    /// measured space run (4 when the unit has no leading indentation).
    pub indent_size: usize,
    /// Grammar that produced the unit.
    pub lang: Lang,
    /// Dedented raw source of the unit, newline-joined.
    pub src_code: String,
    /// Declared identifier; empty when the grammar exposes none.
    pub name: String,
    /// Declaration text up to (excluding) the body, whitespace-normalized.
    pub signature: String,
    /// Coarse branch-count complexity score.
    pub complexity: u32,
}

impl CodeEntity {
    /// The signature paired with a placeholder body, usable as a rewrite
    /// template. Comment marker and block terminator come from the grammar.
    pub fn stub(&self) -> String {
        self.lang.stub(&self.signature)
    }
}

/// A proposed replacement for one [`CodeEntity`].
///
/// Produced by an external proposer (rule catalog, LLM, or the built-in stub
/// strategy) and consumed exactly once by the change applier. The `rewrite`
/// text carries no surrounding indentation; the applier re-indents it to the
/// entity's nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRewrite {
    pub rewrite: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub strategy: String,
}

impl BugRewrite {
    /// The trivial in-crate proposer: replace the body with a stub.
    pub fn stub_of(entity: &CodeEntity) -> Self {
        Self {
            rewrite: entity.stub(),
            explanation: "function body replaced with a placeholder stub".to_string(),
            strategy: "stub".to_string(),
        }
    }
}

/// Artifact directory for one mutated entity: the owning file path with
/// separators flattened, then `<name>_<fingerprint>` where the fingerprint
/// is a short hash of the signature to disambiguate overloads.
pub fn bug_artifact_dir(log_dir: &Path, entity: &CodeEntity) -> PathBuf {
    let flat = entity
        .file_path
        .to_string_lossy()
        .replace(['/', '\\'], "__");
    let fingerprint = xxh3_64(entity.signature.as_bytes()) & 0xffff_ffff;
    log_dir
        .join(flat)
        .join(format!("{}_{:08x}", entity.name, fingerprint))
}
